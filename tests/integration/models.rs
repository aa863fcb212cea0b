use super::common::{failed_labels, touch, Fixture};
use provision::core::ProvisionError;
use provision::provision::{provision_models, Outcome};
use std::fs;

#[tokio::test]
async fn fetches_into_category_directory() {
    let fx = Fixture::new();
    fx.store.add_file("org/repo", "model.safetensors", b"weights");
    let manifest = fx.manifest(
        r#"{"models": [{"repo_id": "org/repo", "filename": "model.safetensors", "type": "vae"}]}"#,
    );

    let summary = provision_models(&fx.container(), &manifest).await.unwrap();

    let path = fx.models_root().join("vae").join("model.safetensors");
    assert_eq!(fs::read(path).unwrap(), b"weights");
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.exit_status(), 0);
}

#[tokio::test]
async fn existing_file_is_skipped_without_fetch() {
    let fx = Fixture::new();
    touch(&fx.models_root().join("vae").join("model.safetensors"));
    let manifest = fx.manifest(
        r#"{"models": [{"repo_id": "org/repo", "filename": "model.safetensors", "type": "vae"}]}"#,
    );

    let summary = provision_models(&fx.container(), &manifest).await.unwrap();

    assert_eq!(fx.store.call_count(), 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.entries[0].outcome, Outcome::already_present());
    assert_eq!(summary.exit_status(), 0);
}

#[tokio::test]
async fn subfolder_and_rename_land_flat() {
    let fx = Fixture::new();
    fx.store.add_file("org/repo", "fp16/model.bin", b"half");
    let manifest = fx.manifest(
        r#"{"models": [{"repo_id": "org/repo", "filename": "model.bin", "subfolder": "fp16",
            "rename_to": "v1.bin", "type": "controlnet"}]}"#,
    );

    let summary = provision_models(&fx.container(), &manifest).await.unwrap();

    let dir = fx.models_root().join("controlnet");
    assert!(summary.is_clean());
    assert_eq!(fs::read(dir.join("v1.bin")).unwrap(), b"half");
    assert!(!dir.join("fp16").exists());
    let names: Vec<_> = fs::read_dir(&dir).unwrap().collect();
    assert_eq!(names.len(), 1);
}

#[tokio::test]
async fn second_run_is_all_skips() {
    let fx = Fixture::new();
    fx.store.serve_any(b"data");
    let manifest = fx.manifest(
        r#"{"models": [
            {"repo_id": "org/a", "filename": "a.bin"},
            {"repo_id": "org/b", "filename": "b.bin", "type": "loras"},
            {"repo_id": "org/c", "filename": "c.bin", "subfolder": "x", "rename_to": "c2.bin"}
        ]}"#,
    );

    let first = provision_models(&fx.container(), &manifest).await.unwrap();
    assert_eq!(first.succeeded, 3);
    assert_eq!(fx.store.call_count(), 3);

    let second = provision_models(&fx.container(), &manifest).await.unwrap();
    assert_eq!(second.skipped, 3);
    assert_eq!(second.succeeded, 0);
    assert_eq!(fx.store.call_count(), 3);
}

#[tokio::test]
async fn failures_are_isolated_and_ordered() {
    let fx = Fixture::new();
    fx.store.serve_any(b"data");
    fx.store.fail("second.bin", "HTTP 500");
    fx.store.fail("fourth.bin", "connection reset");
    let manifest = fx.manifest(
        r#"{"models": [
            {"repo_id": "org/r", "filename": "first.bin"},
            {"repo_id": "org/r", "filename": "second.bin"},
            {"repo_id": "org/r", "filename": "third.bin"},
            {"repo_id": "org/r", "filename": "fourth.bin"},
            {"repo_id": "org/r", "filename": "fifth.bin"}
        ]}"#,
    );

    let summary = provision_models(&fx.container(), &manifest).await.unwrap();

    assert_eq!(summary.total, 5);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(failed_labels(&summary), vec!["second.bin", "fourth.bin"]);
    assert_eq!(summary.exit_status(), 1);

    let attempted: Vec<String> = fx.store.calls().into_iter().map(|c| c.file_name).collect();
    assert_eq!(
        attempted,
        vec!["first.bin", "second.bin", "third.bin", "fourth.bin", "fifth.bin"]
    );
    assert!(!fx.models_root().join("checkpoints/second.bin").exists());
}

#[tokio::test]
async fn malformed_entry_fails_alone() {
    let fx = Fixture::new();
    fx.store.serve_any(b"data");
    let manifest = fx.manifest(
        r#"{"models": [
            {"repo_id": "org/r", "filename": "ok.bin"},
            {"repo_id": "org/r"},
            {"filename": "../escape.bin", "repo_id": "org/r"},
            {"repo_id": "org/r", "filename": "also-ok.bin"}
        ]}"#,
    );

    let summary = provision_models(&fx.container(), &manifest).await.unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(failed_labels(&summary), vec!["unknown", "../escape.bin"]);
    assert_eq!(fx.store.call_count(), 2);
}

#[tokio::test]
async fn missing_manifest_is_empty_batch() {
    let fx = Fixture::new();
    let summary = provision_models(&fx.container(), &fx.temp.path().join("absent.json"))
        .await
        .unwrap();

    assert_eq!(summary.total, 0);
    assert_eq!(summary.exit_status(), 0);
}

#[tokio::test]
async fn invalid_manifest_is_fatal() {
    let fx = Fixture::new();
    let manifest = fx.manifest("{not json");

    let err = provision_models(&fx.container(), &manifest)
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisionError::Manifest(_)));
}

#[tokio::test]
async fn unknown_category_passes_through() {
    let fx = Fixture::new();
    fx.store.serve_any(b"data");
    let manifest = fx.manifest(
        r#"{"models": [{"repo_id": "org/r", "filename": "x.pth", "type": "upscale_models"}]}"#,
    );

    provision_models(&fx.container(), &manifest).await.unwrap();
    assert!(fx.models_root().join("upscale_models/x.pth").exists());
}
