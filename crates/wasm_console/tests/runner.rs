//! Tests for the command-line runner.

use console_bridge::{BridgeConfig, ConsoleHandle, ConsoleRecord, Severity};
use std::fs;
use std::process::Command;
use tempfile::TempDir;
use wasm_console::{DEFAULT_ENTRY, RunArgs, run};

/// Helper: write `source` into a fresh directory and return its path.
fn write_module(dir: &TempDir, file_name: &str, source: &str) -> String {
    let path = dir.path().join(file_name);
    fs::write(&path, source).unwrap();
    path.to_string_lossy().into_owned()
}

fn args(module_path: String, entry: &str) -> RunArgs {
    RunArgs {
        module_path,
        entry: entry.to_owned(),
    }
}

#[test]
fn parse_defaults_entry_to_start() {
    let parsed = RunArgs::parse(vec!["app.wasm".to_owned()]).unwrap();
    assert_eq!(parsed.module_path, "app.wasm");
    assert_eq!(parsed.entry, DEFAULT_ENTRY);

    let custom = RunArgs::parse(vec!["app.wat".to_owned(), "hello".to_owned()]).unwrap();
    assert_eq!(custom.entry, "hello");
}

#[test]
fn parse_rejects_missing_and_extra_arguments() {
    assert!(RunArgs::parse(Vec::<String>::new()).is_err());
    assert!(RunArgs::parse(vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]).is_err());
}

#[test]
fn runs_start_and_flushes_partial_output() {
    let dir = TempDir::new().unwrap();
    let path = write_module(
        &dir,
        "greeter.wat",
        r#"
        (module
          (import "env" "__window_console_log" (func $log (param i32)))
          (import "odin_env" "write" (func $write (param i32 i32 i32)))
          (memory (export "memory") 1)
          (data (i32.const 0) "hi\00no newline")
          (func (export "_start")
            (call $log (i32.const 0))
            (call $write (i32.const 2) (i32.const 3) (i32.const 10))))
        "#,
    );
    let (handle, recorder) = ConsoleHandle::recording();
    run(&args(path, DEFAULT_ENTRY), handle, &BridgeConfig::default()).unwrap();
    assert_eq!(
        recorder.records(),
        vec![
            ConsoleRecord::new(Severity::Info, "hi"),
            ConsoleRecord::new(Severity::Error, "no newline"),
        ]
    );
}

#[test]
fn single_parameter_entry_receives_window_pointer() {
    let dir = TempDir::new().unwrap();
    let path = write_module(
        &dir,
        "window.wat",
        r#"
        (module
          (import "env" "__window_console_log_int" (func $log_int (param i32)))
          (import "env" "memory" (memory 1))
          (func (export "hello") (param $window i32)
            (call $log_int (local.get $window))
            (call $log_int (i32.load (local.get $window)))))
        "#,
    );
    let (handle, recorder) = ConsoleHandle::recording();
    run(&args(path, "hello"), handle, &BridgeConfig::default()).unwrap();
    assert_eq!(recorder.info_lines(), vec!["4", "8"]);
}

#[test]
fn trap_is_reported_after_flushing() {
    let dir = TempDir::new().unwrap();
    let path = write_module(
        &dir,
        "trap.wat",
        r#"
        (module
          (import "odin_env" "write" (func $write (param i32 i32 i32)))
          (memory (export "memory") 1)
          (data (i32.const 0) "before")
          (func (export "_start")
            (call $write (i32.const 1) (i32.const 0) (i32.const 6))
            unreachable))
        "#,
    );
    let (handle, recorder) = ConsoleHandle::recording();
    assert!(run(&args(path, DEFAULT_ENTRY), handle, &BridgeConfig::default()).is_err());
    assert_eq!(recorder.info_lines(), vec!["before"]);
}

#[test]
fn missing_file_and_entry_are_errors() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.wasm").to_string_lossy().into_owned();
    let (handle, _recorder) = ConsoleHandle::recording();
    assert!(run(&args(missing, DEFAULT_ENTRY), handle.clone(), &BridgeConfig::default()).is_err());

    let path = write_module(&dir, "empty.wat", "(module)");
    assert!(run(&args(path, DEFAULT_ENTRY), handle, &BridgeConfig::default()).is_err());
}

#[test]
fn entries_with_many_parameters_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_module(
        &dir,
        "pair.wat",
        r#"(module (func (export "pair") (param i32 i32)))"#,
    );
    let (handle, recorder) = ConsoleHandle::recording();
    let error = run(&args(path, "pair"), handle, &BridgeConfig::default()).unwrap_err();
    assert!(error.to_string().contains("takes 2 parameters"));
    assert!(recorder.is_empty());
}

#[test]
fn binary_prints_module_output_without_rust_log() {
    let dir = TempDir::new().unwrap();
    let path = write_module(
        &dir,
        "hello.wat",
        r#"
        (module
          (import "env" "__window_console_log" (func $log (param i32)))
          (memory (export "memory") 1)
          (data (i32.const 16) "hello from module\00")
          (func (export "_start")
            (call $log (i32.const 16))))
        "#,
    );
    let output = Command::new(env!("CARGO_BIN_EXE_wasm_console"))
        .arg(&path)
        .env_remove("RUST_LOG")
        .env_remove("CONSOLE_BRIDGE_LABEL")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("[WASM]: hello from module"),
        "module output missing from stderr: {stderr}"
    );
}
