//! Sequential batch processing shared by the model and extension pipelines

use crate::core::ProvisionResult;
use crate::manifest::EntrySlot;
use crate::provision::gate::ExistenceGate;
use crate::provision::summary::{BatchSummary, EntryResult, Outcome, ResultAggregator};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// What a successful acquisition reports back.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Acquired {
    pub warnings: Vec<String>,
}

/// One kind of manifest entry and how to provision it.
#[async_trait]
pub trait Acquirer: Send + Sync {
    type Entry: Send + Sync;
    type Target: Send + Sync;

    /// Name used in messages and in the failed list
    fn label(&self, entry: &Self::Entry) -> String;

    /// Compute where the entry goes. No I/O.
    fn resolve(&self, entry: &Self::Entry) -> ProvisionResult<Self::Target>;

    /// Path whose existence means the entry is already provisioned.
    /// `None` means the entry is always attempted.
    fn presence_path(&self, target: &Self::Target) -> Option<PathBuf>;

    async fn acquire(&self, entry: &Self::Entry, target: &Self::Target)
        -> ProvisionResult<Acquired>;
}

/// Runs entries one at a time in manifest order.
///
/// Every error is converted into that entry's outcome; nothing one entry
/// does can stop the entries after it.
pub struct BatchRunner<'a, A: Acquirer> {
    acquirer: &'a A,
}

impl<'a, A: Acquirer> BatchRunner<'a, A> {
    pub fn new(acquirer: &'a A) -> Self {
        Self { acquirer }
    }

    pub async fn run(&self, entries: Vec<EntrySlot<A::Entry>>) -> BatchSummary {
        let mut aggregator = ResultAggregator::new();

        for slot in entries {
            let result = match slot {
                Ok(entry) => self.process(&entry).await,
                Err(invalid) => {
                    EntryResult::new(invalid.label, Outcome::Failed(invalid.error.to_string()))
                }
            };
            report(&result);
            aggregator.record(result);
        }

        aggregator.finish()
    }

    async fn process(&self, entry: &A::Entry) -> EntryResult {
        let label = self.acquirer.label(entry);

        let target = match self.acquirer.resolve(entry) {
            Ok(target) => target,
            Err(e) => return EntryResult::new(label, Outcome::Failed(e.to_string())),
        };

        if let Some(path) = self.acquirer.presence_path(&target) {
            if ExistenceGate::is_satisfied(&path) {
                debug!("{} already present at {}", label, path.display());
                return EntryResult::new(label, Outcome::already_present());
            }
        }

        match self.acquirer.acquire(entry, &target).await {
            Ok(acquired) => {
                EntryResult::new(label, Outcome::Succeeded).with_warnings(acquired.warnings)
            }
            Err(e) => EntryResult::new(label, Outcome::Failed(e.to_string())),
        }
    }
}

fn report(result: &EntryResult) {
    match result.outcome {
        Outcome::Succeeded => println!("✓ {}", result.label),
        Outcome::Skipped { ref reason } => println!("⏭ {} ({}), skipping", result.label, reason),
        Outcome::Failed(ref detail) => println!("✗ {}: {}", result.label, detail),
    }
    for warning in &result.warnings {
        println!("⚠ {}: {}", result.label, warning);
    }
}
