//! Tests for the import table and argument decoding.
//!
//! These drive `HostFnKind::invoke` with a plain byte slice standing in for
//! guest memory, the same way a runtime adapter does.

use console_bridge::bindings::{ENV_MODULE, STREAM_MODULE, WEB_MODULE};
use console_bridge::{
    BridgeError, ConsoleHandle, ConsoleRecord, HostContext, HostFnKind, RecordingConsole, Severity,
    build_default_bindings,
};
use std::sync::Arc;

/// Integer imports never touch guest memory.
const NO_MEMORY: &[u8] = &[];

/// Helper: a context wired to a fresh recorder.
fn make_context() -> (HostContext, Arc<RecordingConsole>) {
    let (handle, recorder) = ConsoleHandle::recording();
    (HostContext::new(handle), recorder)
}

/// Helper: guest memory with `text` placed at `offset`.
fn memory_with(offset: usize, text: &[u8]) -> Vec<u8> {
    let mut memory = vec![0_u8; 256];
    memory[offset..offset + text.len()].copy_from_slice(text);
    memory
}

#[test]
fn default_bindings_expose_every_import() {
    let bindings = build_default_bindings();
    let names: Vec<(String, String)> = bindings
        .iter()
        .map(|(module, name, _)| (module.to_owned(), name.to_owned()))
        .collect();
    assert_eq!(
        names,
        vec![
            (ENV_MODULE.to_owned(), "__window_console_error".to_owned()),
            (ENV_MODULE.to_owned(), "__window_console_log".to_owned()),
            (ENV_MODULE.to_owned(), "__window_console_log_int".to_owned()),
            (STREAM_MODULE.to_owned(), "write".to_owned()),
            (WEB_MODULE.to_owned(), "log_int".to_owned()),
            (WEB_MODULE.to_owned(), "log_str".to_owned()),
        ]
    );
    assert_eq!(
        bindings.lookup("env", "__window_console_error"),
        Ok(HostFnKind::CString(Severity::Error))
    );
    assert_eq!(
        bindings.lookup("env", "missing"),
        Err(BridgeError::UnknownFunction {
            module: "env".to_owned(),
            name: "missing".to_owned(),
        })
    );
}

#[test]
fn c_string_log_and_error_route_by_severity() {
    let bindings = build_default_bindings();
    let (mut context, recorder) = make_context();
    let memory = memory_with(16, b"hello\0");

    let log = bindings.lookup("env", "__window_console_log").unwrap();
    let error = bindings.lookup("env", "__window_console_error").unwrap();
    log.invoke("__window_console_log", &mut context, &memory, &[16]).unwrap();
    error.invoke("__window_console_error", &mut context, &memory, &[16]).unwrap();

    assert_eq!(
        recorder.records(),
        vec![
            ConsoleRecord::new(Severity::Info, "hello"),
            ConsoleRecord::new(Severity::Error, "hello"),
        ]
    );
}

#[test]
fn int_import_renders_signed_decimal() {
    let (mut context, recorder) = make_context();
    for value in [0, -1, i32::MIN, i32::MAX] {
        HostFnKind::Int
            .invoke("log_int", &mut context, NO_MEMORY, &[value])
            .unwrap();
    }
    assert_eq!(
        recorder.info_lines(),
        vec!["0", "-1", "-2147483648", "2147483647"]
    );
}

#[test]
fn sized_string_reads_exact_length() {
    let (mut context, recorder) = make_context();
    let memory = memory_with(8, "héllo wörld".as_bytes());
    let len = "héllo".len() as i32;
    HostFnKind::Sized(Severity::Info)
        .invoke("log_str", &mut context, &memory, &[8, len])
        .unwrap();
    assert_eq!(recorder.info_lines(), vec!["héllo"]);
}

#[test]
fn negative_pointer_decodes_as_empty_text() {
    let (mut context, recorder) = make_context();
    HostFnKind::CString(Severity::Info)
        .invoke("__window_console_log", &mut context, &[0_u8; 16], &[-4])
        .unwrap();
    assert_eq!(recorder.records(), vec![ConsoleRecord::new(Severity::Info, "")]);
}

#[test]
fn wrong_arity_is_a_plumbing_error() {
    let (mut context, recorder) = make_context();
    let result = HostFnKind::Write.invoke("write", &mut context, NO_MEMORY, &[1]);
    assert_eq!(
        result,
        Err(BridgeError::Arity {
            function: "write".to_owned(),
            expected: 3,
            actual: 1,
        })
    );
    assert!(recorder.is_empty());
}

#[test]
fn every_kind_rejects_mismatched_argument_counts() {
    let (mut context, recorder) = make_context();
    let cases: [(HostFnKind, &str, Vec<i32>); 5] = [
        (HostFnKind::CString(Severity::Info), "__window_console_log", vec![]),
        (HostFnKind::CString(Severity::Error), "__window_console_error", vec![0, 0]),
        (HostFnKind::Sized(Severity::Info), "log_str", vec![0]),
        (HostFnKind::Int, "log_int", vec![]),
        (HostFnKind::Write, "write", vec![1, 0, 0, 0]),
    ];
    for (kind, name, args) in cases {
        let result = kind.invoke(name, &mut context, NO_MEMORY, &args);
        assert_eq!(
            result,
            Err(BridgeError::Arity {
                function: name.to_owned(),
                expected: kind.arity(),
                actual: args.len(),
            })
        );
    }
    assert!(recorder.is_empty());
}

#[test]
fn write_keeps_multibyte_characters_split_across_calls() {
    let (mut context, recorder) = make_context();
    let memory = "\u{e9}\n".as_bytes();
    HostFnKind::Write
        .invoke("write", &mut context, memory, &[1, 0, 1])
        .unwrap();
    HostFnKind::Write
        .invoke("write", &mut context, memory, &[1, 1, 2])
        .unwrap();
    assert_eq!(recorder.info_lines(), vec!["\u{e9}"]);
}

#[test]
fn write_buffers_until_newline() {
    let (mut context, recorder) = make_context();
    let memory = memory_with(0, b"one\ntw");
    HostFnKind::Write
        .invoke("write", &mut context, &memory, &[1, 0, 6])
        .unwrap();
    assert_eq!(recorder.info_lines(), vec!["one"]);

    let rest = memory_with(0, b"o\n");
    HostFnKind::Write
        .invoke("write", &mut context, &rest, &[1, 0, 2])
        .unwrap();
    assert_eq!(recorder.info_lines(), vec!["one", "two"]);
}

#[test]
fn write_to_unknown_descriptor_fails() {
    let (mut context, recorder) = make_context();
    let memory = memory_with(0, b"x\n");
    let result = HostFnKind::Write.invoke("write", &mut context, &memory, &[3, 0, 2]);
    assert_eq!(result, Err(BridgeError::InvalidDescriptor(3)));
    assert!(recorder.is_empty());
}

#[test]
fn context_flush_emits_partial_lines() {
    let (mut context, recorder) = make_context();
    let memory = memory_with(0, b"partial");
    HostFnKind::Write
        .invoke("write", &mut context, &memory, &[2, 0, 7])
        .unwrap();
    assert!(recorder.is_empty());
    context.flush();
    assert_eq!(recorder.error_lines(), vec!["partial"]);
}

#[test]
fn bridge_errors_describe_the_call() {
    let arity = BridgeError::Arity {
        function: "log_str".to_owned(),
        expected: 2,
        actual: 0,
    };
    assert_eq!(arity.to_string(), "log_str takes 2 argument(s), got 0");
    assert_eq!(
        BridgeError::InvalidDescriptor(9).to_string(),
        "invalid descriptor 9 passed to write"
    );
}
