use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("adapter-directives").unwrap()
}

#[test]
fn init_then_check_then_compile() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .current_dir(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains(".adptool.yaml"));

    assert!(dir.path().join(".adptool.yaml").exists());

    let source = dir.path().join("wrapper.go");
    fs::write(
        &source,
        "// go:adapter:type MyStruct\n// go:adapter:type:rename NewStruct\npackage wrapper\n",
    )
    .unwrap();

    cmd()
        .current_dir(&dir)
        .args(["check", "--source"])
        .arg(source.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("directives: ok"));

    cmd()
        .current_dir(&dir)
        .args(["compile", "--source"])
        .arg(source.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("global"));
}

#[test]
fn check_reports_directive_errors_and_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("bad.go");
    fs::write(&source, "// go:adapter:done\n").unwrap();

    cmd()
        .current_dir(&dir)
        .args(["check", "--source"])
        .arg(source.to_str().unwrap())
        .assert()
        .failure()
        .stdout(predicate::str::contains("directive error"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".adptool.yaml"), "ignores: []\n").unwrap();

    cmd().current_dir(&dir).arg("init").assert().failure();
}

#[test]
fn compile_with_explicit_config_merges_with_sources() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rules.yaml");
    fs::write(
        &config,
        "packages:\n  - import: p/v3\n    alias: v3\n",
    )
    .unwrap();

    let source = dir.path().join("wrapper.go");
    fs::write(&source, "// go:adapter:type Foo\n").unwrap();

    cmd()
        .current_dir(&dir)
        .args(["compile", "--config"])
        .arg(config.to_str().unwrap())
        .args(["--source"])
        .arg(source.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("p/v3"));
}
