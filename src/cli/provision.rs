use provision::config::Config;
use provision::core::ProvisionResult;
use provision::di::ServiceContainer;
use provision::provision::{provision_extensions, provision_models, BatchSummary};
use std::path::PathBuf;
use std::process::ExitCode;

pub async fn models(config: &Config, manifest: Option<PathBuf>) -> ProvisionResult<ExitCode> {
    let manifest = manifest.unwrap_or_else(|| config.models_manifest.clone());
    let container = ServiceContainer::new(config).await?;

    let summary = provision_models(&container, &manifest).await?;
    Ok(finish(&summary, "models"))
}

pub async fn extensions(config: &Config, manifest: Option<PathBuf>) -> ProvisionResult<ExitCode> {
    let manifest = manifest.unwrap_or_else(|| config.extensions_manifest.clone());
    let container = ServiceContainer::anonymous(config)?;

    let summary = provision_extensions(&container, &manifest).await?;
    Ok(finish(&summary, "extensions"))
}

/// Extensions first, then models. Both batches always run; a manifest that
/// cannot be read fails its own batch only.
pub async fn all(config: &Config) -> ProvisionResult<ExitCode> {
    let container = ServiceContainer::new(config).await?;

    let extensions = provision_extensions(&container, &config.extensions_manifest).await;
    let extensions_ok = report(extensions, "extensions");

    let models = provision_models(&container, &config.models_manifest).await;
    let models_ok = report(models, "models");

    if extensions_ok && models_ok {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Print a batch outcome; true when the batch ran without failures.
fn report(outcome: ProvisionResult<BatchSummary>, noun: &str) -> bool {
    match outcome {
        Ok(summary) => {
            print!("{}", summary.render(noun));
            summary.is_clean()
        }
        Err(e) => {
            eprintln!("\n❌ {}", e);
            false
        }
    }
}

fn finish(summary: &BatchSummary, noun: &str) -> ExitCode {
    print!("{}", summary.render(noun));
    summary.exit_code()
}
