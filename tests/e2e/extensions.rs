use super::*;

#[test]
fn unknown_type_exits_nonzero() {
    let ctx = TestContext::new();
    let manifest = ctx.write(
        "nodes.json",
        r#"{"nodes": [{"type": "svn", "name": "Legacy", "repo_url": "svn://host/legacy"}]}"#,
    );

    ctx.provision()
        .arg("extensions")
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Legacy: unknown type"));
}

#[test]
fn existing_checkout_is_skipped() {
    let ctx = TestContext::new();
    std::fs::create_dir_all(ctx.extensions_root().join("plugin")).unwrap();
    let manifest = ctx.write(
        "nodes.json",
        r#"{"nodes": [{"type": "git", "name": "Plugin", "repo_url": "https://host/org/plugin.git"}]}"#,
    );

    ctx.provision()
        .arg("extensions")
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Plugin (already present), skipping"));
}

#[test]
fn empty_node_list_exits_zero() {
    let ctx = TestContext::new();
    let manifest = ctx.write("nodes.json", r#"{"nodes": []}"#);

    ctx.provision()
        .arg("extensions")
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("0/0 successful"));
}
