use super::*;

#[test]
fn missing_manifest_exits_zero() {
    let ctx = TestContext::new();
    ctx.provision()
        .arg("models")
        .arg("--manifest")
        .arg(ctx.temp.child("absent.json").path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No manifest found"));
}

#[test]
fn invalid_manifest_exits_nonzero() {
    let ctx = TestContext::new();
    let manifest = ctx.write("models.json", "{\"models\": [");

    ctx.provision()
        .arg("models")
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest error"));
}

#[test]
fn already_present_files_are_skipped() {
    let ctx = TestContext::new();
    let existing = ctx.models_root().join("vae").join("model.safetensors");
    std::fs::create_dir_all(existing.parent().unwrap()).unwrap();
    std::fs::write(&existing, b"weights").unwrap();
    let manifest = ctx.write(
        "models.json",
        r#"{"models": [{"repo_id": "org/repo", "filename": "model.safetensors", "type": "vae"}]}"#,
    );

    ctx.provision()
        .arg("models")
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("already present"))
        .stdout(predicate::str::contains("1/1 successful (1 skipped)"));
}

#[test]
fn malformed_entry_fails_the_run() {
    let ctx = TestContext::new();
    let manifest = ctx.write("models.json", r#"{"models": [{"repo_id": "org/repo"}]}"#);

    ctx.provision()
        .arg("models")
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed models: unknown"));
}
