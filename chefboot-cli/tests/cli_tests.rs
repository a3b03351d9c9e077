use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

fn chefboot() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("chefboot"));
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn seeded_ca() -> TempDir {
    let ca = TempDir::new().expect("ca");
    fs::write(ca.path().join("a.crt"), "AAA\n").expect("a");
    fs::write(ca.path().join("b.txt"), "skip").expect("b");
    fs::write(ca.path().join("c.crt"), "CCC\n").expect("c");
    ca
}

fn certs_var(ca: &Path) -> String {
    format!("trusted_certs_path={}", ca.display())
}

#[test]
fn render_prints_client_rb() {
    let assert = chefboot()
        .args([
            "render",
            "kickstart-client",
            "--var",
            "chef_url=https://chef.example.com",
            "--var",
            "proxy=",
            "--var",
            "chef_node_name=node1",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    assert_eq!(
        stdout,
        "log_level        :info\n\
         log_location     '/dev/null'\n\
         chef_server_url  'https://chef.example.com'\n\
         node_name        'node1'\n\
         validation_client_name 'chef-validator'\n\
         json_attribs nil\n\
         pid_file '/var/run/chef-client.pid'\n\
         # Using default node name (fqdn)\n\
         no_lazy_load true\n"
    );
}

#[test]
fn render_reads_context_file_and_var_overrides_it() {
    let dir = TempDir::new().expect("dir");
    let ctx = dir.path().join("host.yaml");
    fs::write(&ctx, "os_version: rhel7\nchef_url: https://from-file\n").expect("write");

    chefboot()
        .args(["render", "admin-knife", "--context"])
        .arg(&ctx)
        .args(["--var", "chef_url=https://from-flag"])
        .assert()
        .success()
        .stdout(contains("verify_api_cert false"))
        .stdout(contains("chef_server_url  'https://from-flag'"))
        .stdout(contains("from-file").not());
}

#[test]
fn render_missing_server_fails_with_variable_name() {
    chefboot()
        .args(["render", "fallback-client"])
        .assert()
        .failure()
        .stderr(contains("server"));
}

#[test]
fn unknown_kind_is_rejected() {
    chefboot()
        .args(["render", "chef-solo"])
        .assert()
        .failure()
        .stderr(contains("unknown template kind"));
}

#[test]
fn bad_var_assignment_is_rejected() {
    chefboot()
        .args(["render", "kickstart-client", "--var", "proxy"])
        .assert()
        .failure()
        .stderr(contains("KEY=VALUE"));
}

#[test]
fn render_user_template_by_name() {
    let dir = TempDir::new().expect("dir");
    fs::write(
        dir.path().join("solo.rb.tmpl"),
        "#if $chef_node_name\nnode_name '$chef_node_name'\n#end if\ncookbook_path '/srv'\n",
    )
    .expect("write");

    chefboot()
        .args(["render", "--template", "solo.rb.tmpl", "--template-dir"])
        .arg(dir.path())
        .args(["--var", "chef_node_name=n1"])
        .assert()
        .success()
        .stdout("node_name 'n1'\ncookbook_path '/srv'\n");
}

#[test]
fn provision_writes_config_and_certs() {
    let root = TempDir::new().expect("root");
    let ca = seeded_ca();

    chefboot()
        .args(["provision", "fallback-client", "--root"])
        .arg(root.path())
        .args(["--var", "compass_server=10.1.0.12", "--var"])
        .arg(certs_var(ca.path()))
        .assert()
        .success()
        .stdout(contains("provisioned"))
        .stdout(contains("a.crt"))
        .stdout(contains("b.txt").not());

    let client = fs::read_to_string(root.path().join("etc/chef/client.rb")).expect("client.rb");
    assert!(client.contains("chef_server_url  'https://10.1.0.12'"));
    let certs = root.path().join("etc/chef/trusted_certs");
    assert_eq!(fs::read_to_string(certs.join("c.crt")).expect("cert"), "CCC\n");
    assert!(!certs.join("b.txt").exists());
}

#[test]
fn provision_dry_run_writes_nothing() {
    let root = TempDir::new().expect("root");

    chefboot()
        .args(["provision", "kickstart-client", "--dry-run", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("[dry-run]"))
        .stdout(contains("client.rb"));

    assert!(fs::read_dir(root.path()).expect("ls").next().is_none());
}

#[test]
fn provision_json_report() {
    let root = TempDir::new().expect("root");
    let ca = seeded_ca();

    let assert = chefboot()
        .args(["provision", "admin-knife", "--json", "--root"])
        .arg(root.path())
        .arg("--var")
        .arg(certs_var(ca.path()))
        .assert()
        .success();
    let report: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("json report");

    assert_eq!(report["kind"], "admin-knife");
    assert_eq!(report["config"]["status"], "written");
    assert_eq!(report["certs"].as_array().expect("certs").len(), 2);
    assert!(report["started_at"].is_string());
}

#[test]
fn provision_missing_ca_dir_fails() {
    let root = TempDir::new().expect("root");
    let missing = root.path().join("no-ca");

    chefboot()
        .args(["provision", "admin-knife", "--root"])
        .arg(root.path())
        .arg("--var")
        .arg(certs_var(&missing))
        .assert()
        .failure()
        .stderr(contains("no-ca"));

    assert!(!root.path().join("root/.chef/knife.rb").exists());
}

#[test]
fn certs_command_copies_only_crt() {
    let ca = seeded_ca();
    let dest = TempDir::new().expect("dest");
    let target = dest.path().join("trusted_certs");

    chefboot()
        .arg("certs")
        .arg(ca.path())
        .arg(&target)
        .assert()
        .success()
        .stdout(contains("2 certificate(s)"));

    assert_eq!(fs::read_to_string(target.join("a.crt")).expect("a"), "AAA\n");
    assert!(!target.join("b.txt").exists());
}

#[test]
fn diff_is_empty_after_provision_and_shows_changes() {
    let root = TempDir::new().expect("root");

    chefboot()
        .args(["provision", "server-knife", "--root"])
        .arg(root.path())
        .assert()
        .success();

    chefboot()
        .args(["diff", "server-knife", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("No differences"));

    let assert = chefboot()
        .args(["diff", "server-knife", "--var", "chef_url=https://10.1.0.12:443", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("--- a/root/.chef/knife.rb"));
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    assert!(stdout
        .lines()
        .any(|l| l.starts_with('+') && l.contains("https://10.1.0.12:443")));
    assert!(stdout
        .lines()
        .any(|l| l.starts_with('-') && l.contains("https://localhost:443")));
}

#[test]
fn list_json_names_every_kind() {
    let assert = chefboot().args(["list", "--json"]).assert().success();
    let rows: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("json");
    let kinds: Vec<&str> = rows
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["kind"].as_str().expect("kind"))
        .collect();
    assert_eq!(
        kinds,
        vec![
            "kickstart-client",
            "preseed-client",
            "fallback-client",
            "admin-knife",
            "server-knife"
        ]
    );
    assert_eq!(rows[1]["output"], "/target/etc/chef/client.rb");
    assert_eq!(rows[3]["variables"], "chef_url, os_version");
}

#[test]
fn list_table_renders() {
    chefboot()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("fallback-client"))
        .stdout(contains("trusted certs"));
}
