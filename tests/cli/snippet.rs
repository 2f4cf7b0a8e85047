use crate::cli::support::TestEnv;
use predicates::prelude::*;

// ============================================================================
// Build and run
// ============================================================================

#[test]
fn test_snippet_compiles_and_runs() {
    let env = TestEnv::new();

    env.rcc()
        .arg("int x = 1;")
        .assert()
        .success()
        .stdout(predicate::str::contains("int x = 1;"))
        .stdout(predicate::str::contains("rcc identifier:"));

    assert_eq!(env.compile_count(), 1);
}

#[test]
fn test_identical_snippet_is_cached() {
    let env = TestEnv::new();

    for _ in 0..3 {
        env.rcc().arg("int x = 1;").assert().success();
    }
    assert_eq!(env.compile_count(), 1);

    // A different flag is a different build
    env.rcc().args(["-O2", "int x = 1;"]).assert().success();
    assert_eq!(env.compile_count(), 2);
}

#[test]
fn test_expression_is_auto_wrapped() {
    let env = TestEnv::new();

    env.rcc()
        .arg("2+3*5")
        .assert()
        .success()
        .stdout(predicate::str::contains("cout << (2+3*5) << endl;"));
    assert_eq!(env.compile_count(), 1);
}

#[test]
fn test_statement_is_not_wrapped() {
    let env = TestEnv::new();

    env.rcc()
        .arg("int x=5;")
        .assert()
        .success()
        .stdout(predicate::str::contains("cout << (").not());
}

#[test]
fn test_program_arguments_pass_through() {
    let env = TestEnv::new();

    env.rcc()
        .args(["int x;", "--", "hello", "world"])
        .assert()
        .success()
        .stdout(predicate::str::contains("args: hello world"));
}

#[test]
fn test_program_arguments_do_not_change_cache_key() {
    let env = TestEnv::new();

    env.rcc()
        .args(["int x;", "--", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("args: a"));
    env.rcc()
        .args(["int x;", "--", "b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("args: b"));
    env.rcc().arg("int x;").assert().success();

    assert_eq!(env.compile_count(), 1);
    assert_eq!(env.cache_files().len(), 2);
}

#[test]
fn test_program_exit_code_propagates() {
    let env = TestEnv::new();

    env.rcc().arg("/* RCC_TEST_EXIT_3 */;").assert().code(3);
}

#[test]
fn test_killed_program_reports_signal() {
    let env = TestEnv::new();

    env.rcc()
        .arg("/* RCC_TEST_SIGNAL */;")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Killed by signal 9"));
}

#[test]
fn test_compile_failure_reports_commands() {
    let env = TestEnv::new();

    env.rcc()
        .arg("RCC_TEST_BREAK;")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("COMPILATION FAILED!"))
        .stderr(predicate::str::contains("COMPILE COMMAND:"))
        .stderr(predicate::str::contains("EXECUTE COMMAND:"));

    assert!(env
        .cache_files()
        .iter()
        .all(|p| p.extension().is_some_and(|e| e == "cpp")));
}

#[test]
fn test_includes_and_functions_are_rendered() {
    let env = TestEnv::new();

    env.rcc()
        .args([
            "--include",
            "vector",
            "--function",
            "int twice(int v) { return 2 * v; }",
            "--put-above-main",
            "int global = 4;",
            "twice(global)",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("#include <vector>"))
        .stdout(predicate::str::contains("int twice(int v) { return 2 * v; }"))
        .stdout(predicate::str::contains("int global = 4;"));
}

#[test]
fn test_compile_with_missing_file() {
    let env = TestEnv::new();

    env.rcc()
        .args(["--compile-with", "/nonexistent/util.cpp", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_unsupported_compiler() {
    let env = TestEnv::new();

    env.rcc()
        .args(["--compiler", "tcc", "int x;"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unsupported compiler"));
}

#[test]
fn test_no_code_prints_hint() {
    let env = TestEnv::new();

    env.rcc()
        .assert()
        .success()
        .stdout(predicate::str::contains("rcc --help"));
}
