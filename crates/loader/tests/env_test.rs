use std::ffi::CString;

use host::MemoryHost;
use loader::BootstrapError;
use loader::env::build_environment;
use manifest::Manifest;

fn cs(s: &str) -> CString {
    CString::new(s).unwrap()
}

fn manifest(text: &str) -> Manifest {
    Manifest::parse(text).expect("manifest should parse")
}

#[test]
fn test_inherited_environment_is_cleared_by_default() {
    let mut host = MemoryHost::new();
    let env = build_environment(&mut host, None, vec![cs("SECRET=1"), cs("PATH=/bin")]).unwrap();
    assert!(env.is_empty());

    let m = manifest("[loader]\n");
    let env =
        build_environment(&mut host, Some(&m), vec![cs("SECRET=1"), cs("PATH=/bin")]).unwrap();
    assert!(env.is_empty());
}

#[test]
fn test_host_env_opt_in_forwards_unchanged() {
    let mut host = MemoryHost::new();
    let m = manifest("[loader]\ninsecure__use_host_env = 1\n");
    let env =
        build_environment(&mut host, Some(&m), vec![cs("A=1"), cs("B=2")]).unwrap();
    assert_eq!(env, vec![cs("A=1"), cs("B=2")]);
}

#[test]
fn test_host_env_and_source_file_are_mutually_exclusive() {
    let mut host = MemoryHost::new();
    host.insert_file("file:env", b"A=1\0".to_vec());
    let m = manifest(
        "[loader]\ninsecure__use_host_env = 1\nenv_src_file = \"file:env\"\n",
    );
    let err = build_environment(&mut host, Some(&m), Vec::new()).unwrap_err();
    assert!(matches!(err, BootstrapError::Configuration(_)));
}

#[test]
fn test_source_file_seeds_the_environment() {
    let mut host = MemoryHost::new();
    host.insert_file("file:env", b"A=1\0B=2\0".to_vec());
    let m = manifest("[loader]\nenv_src_file = \"file:env\"\n");
    let env =
        build_environment(&mut host, Some(&m), vec![cs("HOST=dropped")]).unwrap();
    assert_eq!(env, vec![cs("A=1"), cs("B=2")]);
}

#[test]
fn test_manifest_wins_on_key_conflict() {
    let mut host = MemoryHost::new();
    let m = manifest(
        "[loader]\ninsecure__use_host_env = 1\n[loader.env]\nFOO = \"bar\"\n",
    );
    let env = build_environment(
        &mut host,
        Some(&m),
        vec![cs("FOO=baz"), cs("KEEP=1")],
    )
    .unwrap();
    // The overridden entry is dropped; the manifest value is appended after
    // the survivors. Exactly one FOO remains.
    assert_eq!(env, vec![cs("KEEP=1"), cs("FOO=bar")]);
}

#[test]
fn test_manifest_only_entries_append_in_declaration_order() {
    let mut host = MemoryHost::new();
    let m = manifest(
        "[loader]\ninsecure__use_host_env = 1\n[loader.env]\nNEW = \"x\"\nALSO = \"y\"\n",
    );
    let env =
        build_environment(&mut host, Some(&m), vec![cs("A=1"), cs("B=2")]).unwrap();
    assert_eq!(env, vec![cs("A=1"), cs("B=2"), cs("NEW=x"), cs("ALSO=y")]);
}

#[test]
fn test_slot_count_arithmetic() {
    let mut host = MemoryHost::new();
    let m = manifest(
        "[loader]\ninsecure__use_host_env = 1\n[loader.env]\nB = \"new\"\nC = \"add\"\n",
    );
    let env = build_environment(
        &mut host,
        Some(&m),
        vec![cs("A=1"), cs("B=old"), cs("D=4")],
    )
    .unwrap();
    // 3 original + 2 manifest - 1 overwritten.
    assert_eq!(env.len(), 4);
    assert_eq!(env, vec![cs("A=1"), cs("D=4"), cs("B=new"), cs("C=add")]);
}

#[test]
fn test_file_sourced_entries_get_no_special_override_treatment() {
    // Entries materialized from the environment file are overridden by the
    // manifest exactly like host-original entries would be.
    let mut host = MemoryHost::new();
    host.insert_file("file:env", b"FOO=from-file\0OTHER=1\0".to_vec());
    let m = manifest(
        "[loader]\nenv_src_file = \"file:env\"\n[loader.env]\nFOO = \"from-manifest\"\n",
    );
    let env = build_environment(&mut host, Some(&m), Vec::new()).unwrap();
    assert_eq!(env, vec![cs("OTHER=1"), cs("FOO=from-manifest")]);
}

#[test]
fn test_slot_without_separator_is_malformed() {
    let mut host = MemoryHost::new();
    let m = manifest(
        "[loader]\ninsecure__use_host_env = 1\n[loader.env]\nX = \"1\"\n",
    );
    let err = build_environment(&mut host, Some(&m), vec![cs("NOEQUALS")]).unwrap_err();
    assert!(matches!(err, BootstrapError::Format(_)));
}

#[test]
fn test_merge_without_manifest_entries_is_identity() {
    let mut host = MemoryHost::new();
    let m = manifest("[loader]\ninsecure__use_host_env = 1\n");
    // No loader.env table at all: slots are passed through, even odd ones.
    let env = build_environment(&mut host, Some(&m), vec![cs("NOEQUALS")]).unwrap();
    assert_eq!(env, vec![cs("NOEQUALS")]);
}
