use host::MemoryHost;
use loader::strtab::{StringTable, load_string_table};
use loader::BootstrapError;

#[test]
fn test_two_entries() {
    let table = StringTable::parse(b"a\0b\0".to_vec()).unwrap();
    assert_eq!(table.len(), 2);
    let entries: Vec<&str> = table.iter().map(|e| e.to_str().unwrap()).collect();
    assert_eq!(entries, ["a", "b"]);
    assert_eq!(table.get(1).unwrap().to_bytes(), b"b");
    assert!(table.get(2).is_none());
}

#[test]
fn test_empty_file_is_valid_and_holds_no_entries() {
    let table = StringTable::parse(Vec::new()).unwrap();
    assert!(table.is_empty());
    assert!(table.to_vector().is_empty());
}

#[test]
fn test_missing_terminator_is_a_format_error() {
    assert!(matches!(
        StringTable::parse(b"a\0b".to_vec()),
        Err(BootstrapError::Format(_))
    ));
    assert!(matches!(
        StringTable::parse(b"x".to_vec()),
        Err(BootstrapError::Format(_))
    ));
}

#[test]
fn test_empty_segments_are_entries() {
    // Unlike the comma list of preload objects, NUL-delimited tables keep
    // empty strings: they are legitimate argument values.
    let table = StringTable::parse(b"a\0\0b\0".to_vec()).unwrap();
    let entries: Vec<&[u8]> = table.iter().map(|e| e.to_bytes()).collect();
    assert_eq!(entries, [b"a".as_slice(), b"".as_slice(), b"b".as_slice()]);
}

#[test]
fn test_load_from_host() {
    let mut host = MemoryHost::new();
    host.insert_file("file:argv", b"one\0two\0".to_vec());
    let table = load_string_table(&mut host, "file:argv").unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn test_load_failures_propagate() {
    let mut host = MemoryHost::new();
    assert!(matches!(
        load_string_table(&mut host, "file:absent"),
        Err(BootstrapError::Resource(_))
    ));

    host.insert_file("file:bad", b"no terminator".to_vec());
    assert!(matches!(
        load_string_table(&mut host, "file:bad"),
        Err(BootstrapError::Format(_))
    ));
}
