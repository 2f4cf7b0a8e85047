use std::fs;

use crate::cli::support::{rcc, TestEnv};
use predicates::prelude::*;
use tempfile::tempdir;

// ============================================================================
// init
// ============================================================================

#[test]
fn test_init_creates_layout() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("rcc");

    rcc()
        .arg("--cache-dir")
        .arg(&root)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized rcc"));

    for sub in ["cache", "permanent", "templates", "pch_probe"] {
        assert!(root.join(sub).is_dir(), "missing {sub}");
    }
    assert!(root.join("templates/rcc_template.cpp").is_file());
    assert!(root.join("templates/rcc_template.hpp").is_file());
    assert!(root.join("config.toml").is_file());
}

#[test]
fn test_init_keeps_customized_template_unless_forced() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("templates/rcc_template.cpp");

    rcc().env("RCC_CACHE_DIR", dir.path()).arg("init").assert().success();
    fs::write(&template, "custom").unwrap();

    rcc().env("RCC_CACHE_DIR", dir.path()).arg("init").assert().success();
    assert_eq!(fs::read_to_string(&template).unwrap(), "custom");

    rcc()
        .env("RCC_CACHE_DIR", dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(&template)
        .unwrap()
        .contains("{{RCC_CODES}}"));
}

#[test]
fn test_broken_template_is_an_installation_error() {
    let env = TestEnv::new();
    fs::write(
        env.root().join("templates/rcc_template.cpp"),
        "{{RCC_CODES}} {{RCC_CODES}}",
    )
    .unwrap();

    env.rcc()
        .arg("int x;")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("{{RCC_INCLUDES}} (found 0)"))
        .stderr(predicate::str::contains("{{RCC_CODES}} (found 2)"));
}

// ============================================================================
// clean
// ============================================================================

#[test]
fn test_clean_keeps_permanents() {
    let env = TestEnv::new();

    env.rcc().arg("int x;").assert().success();
    env.rcc()
        .args(["create", "keep", "int y;"])
        .assert()
        .success();
    assert_eq!(env.cache_files().len(), 2);

    env.rcc()
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 cached file(s)."));
    assert!(env.cache_files().is_empty());

    env.rcc().args(["run", "keep"]).assert().success();
}

#[test]
fn test_clean_cache_flag_then_runs_code() {
    let env = TestEnv::new();

    env.rcc().arg("int x;").assert().success();
    env.rcc()
        .args(["--clean-cache", "int x;"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 cached file(s)."));
    assert_eq!(env.compile_count(), 2);
}
