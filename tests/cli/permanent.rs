use std::fs;

use crate::cli::support::TestEnv;
use predicates::prelude::*;

// ============================================================================
// Permanent programs
// ============================================================================

#[test]
fn test_create_list_run_remove() {
    let env = TestEnv::new();

    env.rcc()
        .args(["create", "demo", "--desc", "a demo", "int x;"])
        .assert()
        .success();

    env.rcc()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo: a demo"));

    env.rcc()
        .args(["run", "demo", "--", "one", "two words"])
        .assert()
        .success()
        .stdout(predicate::str::contains("args: one two words"));

    env.rcc()
        .args(["rm", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 permanent(s), 0 failed."));

    env.rcc()
        .arg("--list-permanent")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_legacy_flags() {
    let env = TestEnv::new();

    env.rcc()
        .args(["--permanent", "legacy", "int y;"])
        .assert()
        .success();
    env.rcc()
        .args(["--run-permanent", "legacy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("int y;"));
    env.rcc()
        .args(["--remove-permanent", "legacy", "ghost"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Removed 1 permanent(s), 1 failed."))
        .stderr(predicate::str::contains("'ghost' does not exist"));
}

#[test]
fn test_create_recompiles_every_time() {
    let env = TestEnv::new();

    for _ in 0..2 {
        env.rcc()
            .args(["create", "pinned", "int x;"])
            .assert()
            .success();
    }
    assert_eq!(env.compile_count(), 2);

    env.rcc()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("pinned: No description provided"));
}

#[test]
fn test_description_survives_failed_rebuild() {
    let env = TestEnv::new();

    env.rcc()
        .args(["create", "foo", "--desc", "bar", "int x;"])
        .assert()
        .success();
    env.rcc()
        .args(["create", "foo", "--desc", "baz", "RCC_TEST_BREAK;"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("COMPILATION FAILED!"));

    let desc = fs::read_to_string(env.root().join("permanent").join("foo.desc")).unwrap();
    assert_eq!(desc, "bar");
}

#[test]
fn test_rebuild_without_desc_keeps_description() {
    let env = TestEnv::new();

    env.rcc()
        .args(["create", "foo", "--desc", "bar", "int x;"])
        .assert()
        .success();
    env.rcc()
        .args(["create", "foo", "int y;"])
        .assert()
        .success();

    let desc = fs::read_to_string(env.root().join("permanent").join("foo.desc")).unwrap();
    assert_eq!(desc, "bar");
}

#[test]
fn test_failed_first_build_is_listed_and_not_suggested() {
    let env = TestEnv::new();

    env.rcc()
        .args(["create", "broken", "--desc", "wip", "RCC_TEST_BREAK;"])
        .assert()
        .code(1);

    env.rcc()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("broken: wip (build failed)"));

    env.rcc()
        .args(["run", "broken"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("compilation failure"));
}

#[test]
fn test_unknown_permanent_suggests_close_name() {
    let env = TestEnv::new();

    env.rcc().args(["create", "abcd", "int a;"]).assert().success();
    env.rcc().args(["create", "xyz", "int a;"]).assert().success();

    env.rcc()
        .args(["run", "abc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("did you mean 'abcd'?"));

    env.rcc()
        .args(["run", "a"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("permanent 'a' does not exist."));
}

#[test]
fn test_zsh_completion_listing() {
    let env = TestEnv::new();

    env.rcc()
        .args(["create", "sorter", "--desc", "sorts things", "int x;"])
        .assert()
        .success();

    env.rcc()
        .args(["list", "--fetch-autocompletion-zsh"])
        .assert()
        .success()
        .stdout(predicate::str::diff("sorter:sorts things\n"));
}

#[test]
fn test_create_without_code_fails() {
    let env = TestEnv::new();

    env.rcc()
        .args(["create", "empty"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no code"));
}

#[test]
fn test_invalid_name_is_rejected() {
    let env = TestEnv::new();

    env.rcc()
        .args(["create", "../escape", "int x;"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid permanent name"));
    assert!(!env.root().join("escape.cpp").exists());
}
