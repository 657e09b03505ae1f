use std::ffi::CString;

use host::MemoryHost;
use loader::BootstrapError;
use loader::args::build_arguments;
use manifest::Manifest;

fn cs(s: &str) -> CString {
    CString::new(s).unwrap()
}

fn manifest(text: &str) -> Manifest {
    Manifest::parse(text).expect("manifest should parse")
}

#[test]
fn test_no_manifest_rejects_arguments_beyond_slot_zero() {
    let mut host = MemoryHost::new();
    let err = build_arguments(&mut host, None, vec![cs("app"), cs("--flag")]).unwrap_err();
    assert!(matches!(err, BootstrapError::PolicyViolation(_)));
}

#[test]
fn test_no_manifest_accepts_slot_zero_alone() {
    let mut host = MemoryHost::new();
    let args = build_arguments(&mut host, None, vec![cs("app")]).unwrap();
    assert_eq!(args, vec![cs("app")]);
    let args = build_arguments(&mut host, None, Vec::new()).unwrap();
    assert!(args.is_empty());
}

#[test]
fn test_argv0_override_rewrites_slot_zero_only() {
    let mut host = MemoryHost::new();
    let m = manifest("[loader]\nargv0_override = \"renamed\"\n");
    let args = build_arguments(&mut host, Some(&m), vec![cs("app")]).unwrap();
    assert_eq!(args, vec![cs("renamed")]);
}

#[test]
fn test_argv0_override_synthesizes_when_no_arguments_existed() {
    let mut host = MemoryHost::new();
    let m = manifest("[loader]\nargv0_override = \"renamed\"\n");
    let args = build_arguments(&mut host, Some(&m), Vec::new()).unwrap();
    assert_eq!(args, vec![cs("renamed")]);
}

#[test]
fn test_argv0_override_does_not_authorize_further_arguments() {
    let mut host = MemoryHost::new();
    let m = manifest("[loader]\nargv0_override = \"renamed\"\n");
    let err = build_arguments(&mut host, Some(&m), vec![cs("app"), cs("--flag")]).unwrap_err();
    assert!(matches!(err, BootstrapError::PolicyViolation(_)));
}

#[test]
fn test_cmdline_opt_in_keeps_host_arguments_verbatim() {
    let mut host = MemoryHost::new();
    let m = manifest("[loader]\ninsecure__use_cmdline_argv = 1\n");
    let args =
        build_arguments(&mut host, Some(&m), vec![cs("app"), cs("a"), cs("b")]).unwrap();
    assert_eq!(args, vec![cs("app"), cs("a"), cs("b")]);
}

#[test]
fn test_malformed_switch_value_is_fatal() {
    let mut host = MemoryHost::new();
    let m = manifest("[loader]\ninsecure__use_cmdline_argv = 2\n");
    let err = build_arguments(&mut host, Some(&m), vec![cs("app")]).unwrap_err();
    assert!(matches!(err, BootstrapError::Configuration(_)));
}

#[test]
fn test_source_file_replaces_arguments() {
    let mut host = MemoryHost::new();
    host.insert_file("file:argv", b"a\0b\0".to_vec());
    let m = manifest("[loader]\nargv_src_file = \"file:argv\"\n");
    let args =
        build_arguments(&mut host, Some(&m), vec![cs("app"), cs("ignored")]).unwrap();
    assert_eq!(args, vec![cs("a"), cs("b")]);
}

#[test]
fn test_empty_source_file_yields_empty_vector() {
    let mut host = MemoryHost::new();
    host.insert_file("file:argv", Vec::new());
    let m = manifest("[loader]\nargv_src_file = \"file:argv\"\n");
    let args = build_arguments(&mut host, Some(&m), Vec::new()).unwrap();
    assert!(args.is_empty());
}

#[test]
fn test_source_file_wins_over_cmdline_opt_in() {
    let mut host = MemoryHost::new();
    host.insert_file("file:argv", b"from-file\0".to_vec());
    let m = manifest(
        "[loader]\ninsecure__use_cmdline_argv = 1\nargv_src_file = \"file:argv\"\n",
    );
    let args = build_arguments(&mut host, Some(&m), vec![cs("app"), cs("x")]).unwrap();
    assert_eq!(args, vec![cs("from-file")]);
}

#[test]
fn test_unreadable_source_file_is_fatal() {
    let mut host = MemoryHost::new();
    let m = manifest("[loader]\nargv_src_file = \"file:absent\"\n");
    let err = build_arguments(&mut host, Some(&m), Vec::new()).unwrap_err();
    match err {
        BootstrapError::Resource(message) => {
            assert!(message.contains("loader.argv_src_file"), "message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_malformed_source_file_is_fatal() {
    let mut host = MemoryHost::new();
    host.insert_file("file:argv", b"missing terminator".to_vec());
    let m = manifest("[loader]\nargv_src_file = \"file:argv\"\n");
    let err = build_arguments(&mut host, Some(&m), Vec::new()).unwrap_err();
    assert!(matches!(err, BootstrapError::Format(_)));
}
