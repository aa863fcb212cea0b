use super::*;

#[test]
fn show_reflects_environment_overrides() {
    let ctx = TestContext::new();
    ctx.provision()
        .arg("config")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            ctx.models_root().to_string_lossy().to_string(),
        ))
        .stdout(predicate::str::contains("dependency_manifest: requirements.txt"));
}

#[test]
fn explicit_config_file_is_used() {
    let ctx = TestContext::new();
    let config = ctx.write("custom.yaml", "clone_timeout_secs: 42\nhub_token: hf_secret\n");

    ctx.provision()
        .arg("--config")
        .arg(&config)
        .arg("config")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("clone_timeout_secs: 42"))
        .stdout(predicate::str::contains("hf_secret").not());
}

#[test]
fn broken_config_file_exits_nonzero() {
    let ctx = TestContext::new();
    let config = ctx.write("broken.yaml", "clone_timeout_secs: [\n");

    ctx.provision()
        .arg("--config")
        .arg(&config)
        .arg("config")
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
