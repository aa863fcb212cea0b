//! Per-entry outcomes and the batch summary built from them

use std::fmt::Write as _;
use std::process::ExitCode;

/// Terminal classification of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped { reason: String },
    Succeeded,
    Failed(String),
}

impl Outcome {
    pub fn already_present() -> Self {
        Outcome::Skipped {
            reason: "already present".to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// Outcome of one entry plus any warnings raised while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryResult {
    pub label: String,
    pub outcome: Outcome,
    pub warnings: Vec<String>,
}

impl EntryResult {
    pub fn new(label: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            label: label.into(),
            outcome,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Counts and failure details of one batch, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    /// `(label, error detail)` in the order entries failed
    pub failed: Vec<(String, String)>,
    /// `(label, warning)`; warnings never count as failures
    pub warnings: Vec<(String, String)>,
    pub entries: Vec<EntryResult>,
}

impl BatchSummary {
    /// True when no entry failed. Skips and successes are both clean.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn exit_status(&self) -> u8 {
        if self.is_clean() {
            0
        } else {
            1
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    /// Human-readable summary; `noun` names the entries (e.g. "models").
    pub fn render(&self, noun: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "🎉 {} complete! {}/{} successful ({} skipped)",
            capitalize(noun),
            self.succeeded + self.skipped,
            self.total,
            self.skipped
        );

        if !self.failed.is_empty() {
            let labels: Vec<&str> = self.failed.iter().map(|(l, _)| l.as_str()).collect();
            let _ = writeln!(out, "⚠ Failed {}: {}", noun, labels.join(", "));
            for (label, detail) in &self.failed {
                let _ = writeln!(out, "  ✗ {}: {}", label, detail);
            }
        }

        for (label, warning) in &self.warnings {
            let _ = writeln!(out, "  ⚠ {}: {}", label, warning);
        }

        out
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Collects entry results as they complete.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    summary: BatchSummary,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: EntryResult) {
        let summary = &mut self.summary;
        summary.total += 1;

        match result.outcome {
            Outcome::Succeeded => summary.succeeded += 1,
            Outcome::Skipped { .. } => summary.skipped += 1,
            Outcome::Failed(ref detail) => {
                summary.failed.push((result.label.clone(), detail.clone()));
            }
        }

        for warning in &result.warnings {
            summary
                .warnings
                .push((result.label.clone(), warning.clone()));
        }

        summary.entries.push(result);
    }

    pub fn finish(self) -> BatchSummary {
        self.summary
    }
}
