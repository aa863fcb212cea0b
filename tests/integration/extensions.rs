use super::common::{failed_labels, Fixture};
use provision::di::mocks::{MockCommandRunner, MockResponse};
use provision::provision::provision_extensions;

#[tokio::test]
async fn clone_failure_fails_entry_and_batch_continues() {
    let fx = Fixture::with_runner(MockCommandRunner::new().on(
        "org/plugin.git",
        MockResponse::Exit {
            code: 128,
            stderr: "fatal: repository not found".to_string(),
        },
    ));
    let manifest = fx.manifest(
        r#"{"nodes": [
            {"type": "git", "name": "Plugin", "repo_url": "https://host/org/plugin.git"},
            {"type": "git", "name": "Other", "repo_url": "https://host/org/other.git"}
        ]}"#,
    );

    let summary = provision_extensions(&fx.container(), &manifest)
        .await
        .unwrap();

    assert_eq!(failed_labels(&summary), vec!["Plugin"]);
    assert!(summary.failed[0].1.contains("repository not found"));
    assert_eq!(summary.succeeded, 1);
    assert!(fx.extensions_root().join("other").is_dir());
    assert_eq!(summary.exit_status(), 1);
}

#[tokio::test]
async fn dependency_failure_is_warning_not_failure() {
    let fx = Fixture::with_runner(
        MockCommandRunner::new()
            .on(
                "clone",
                MockResponse::Clone {
                    dependency_manifest: Some("requirements.txt".to_string()),
                },
            )
            .on(
                "requirements.txt",
                MockResponse::Exit {
                    code: 1,
                    stderr: "could not build wheels".to_string(),
                },
            ),
    );
    let manifest = fx.manifest(
        r#"{"nodes": [{"name": "Plugin", "repo_url": "https://host/org/plugin.git"}]}"#,
    );

    let summary = provision_extensions(&fx.container(), &manifest)
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert!(summary.is_clean());
    assert_eq!(summary.warnings.len(), 1);
    assert_eq!(summary.warnings[0].0, "Plugin");
    assert!(summary.render("extensions").contains("could not build wheels"));
}

#[tokio::test]
async fn dependency_timeout_is_warning() {
    let fx = Fixture::with_runner(
        MockCommandRunner::new()
            .on(
                "clone",
                MockResponse::Clone {
                    dependency_manifest: Some("requirements.txt".to_string()),
                },
            )
            .on("requirements.txt", MockResponse::Timeout),
    );
    let manifest = fx.manifest(
        r#"{"nodes": [{"name": "Plugin", "repo_url": "https://host/org/plugin.git"}]}"#,
    );

    let summary = provision_extensions(&fx.container(), &manifest)
        .await
        .unwrap();

    assert!(summary.is_clean());
    assert!(summary.warnings[0].1.contains("Timed out after 600s"));
}

#[tokio::test]
async fn clone_timeout_fails_entry() {
    let fx = Fixture::with_runner(MockCommandRunner::new().on("clone", MockResponse::Timeout));
    let manifest = fx.manifest(
        r#"{"nodes": [{"name": "Slow", "repo_url": "https://host/org/slow.git"}]}"#,
    );

    let summary = provision_extensions(&fx.container(), &manifest)
        .await
        .unwrap();

    assert_eq!(failed_labels(&summary), vec!["Slow"]);
    assert!(summary.failed[0].1.contains("Timed out after 300s"));
}

#[tokio::test]
async fn unknown_kind_fails_without_io() {
    let fx = Fixture::new();
    let manifest = fx.manifest(
        r#"{"nodes": [{"type": "svn", "name": "Legacy", "repo_url": "svn://host/legacy"}]}"#,
    );

    let summary = provision_extensions(&fx.container(), &manifest)
        .await
        .unwrap();

    assert_eq!(summary.failed, vec![("Legacy".to_string(), "unknown type".to_string())]);
    assert!(fx.runner.invocations().is_empty());
}

#[tokio::test]
async fn second_run_skips_checkouts() {
    let fx = Fixture::new();
    let manifest = fx.manifest(
        r#"{"nodes": [
            {"name": "A", "repo_url": "https://host/org/a.git"},
            {"name": "B", "repo_url": "https://host/org/b"}
        ]}"#,
    );

    let first = provision_extensions(&fx.container(), &manifest)
        .await
        .unwrap();
    assert_eq!(first.succeeded, 2);
    assert_eq!(fx.runner.invocations().len(), 2);

    let second = provision_extensions(&fx.container(), &manifest)
        .await
        .unwrap();
    assert_eq!(second.skipped, 2);
    assert_eq!(fx.runner.invocations().len(), 2);
}

#[tokio::test]
async fn package_entries_install_by_name() {
    let fx = Fixture::with_runner(MockCommandRunner::new().on(
        "missing-pkg",
        MockResponse::Exit {
            code: 1,
            stderr: "No matching distribution found".to_string(),
        },
    ));
    let manifest = fx.manifest(
        r#"{"nodes": [
            {"type": "pip", "name": "Good", "package_name": "good-pkg"},
            {"type": "pip", "name": "Bad", "package_name": "missing-pkg"}
        ]}"#,
    );

    let summary = provision_extensions(&fx.container(), &manifest)
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(failed_labels(&summary), vec!["Bad"]);
    let lines: Vec<String> = fx.runner.invocations().iter().map(|c| c.display()).collect();
    assert_eq!(
        lines,
        vec![
            "python3 -m pip install good-pkg",
            "python3 -m pip install missing-pkg"
        ]
    );
}
