use alnum7_rainbow::domain::table_format::{TableFormatError, parse_table};
use alnum7_rainbow::infra::table_io::load_table;
use alnum7_rainbow::{ChainEntry, Error, Password, Reducer};
use std::fs;
use tempfile::TempDir;

fn pw(s: &str) -> Password {
    s.parse().unwrap()
}

#[test]
fn test_hand_written_endpoint_table() {
    let text = "0000000\nzzzzzzz\n\n0000001\nZZZZZZZ\n\n";
    let parsed = parse_table(text.as_bytes(), 2048).unwrap();

    assert_eq!(
        parsed.entries,
        vec![
            ChainEntry::new(pw("0000000"), pw("zzzzzzz")),
            ChainEntry::new(pw("0000001"), pw("ZZZZZZZ")),
        ]
    );
}

#[test]
fn test_mixed_block_sizes_rejected() {
    // Three lines is neither the two-line nor the full form for t = 5
    let text = "0000000\n0000001\n0000002\n\n";
    assert!(matches!(
        parse_table(text.as_bytes(), 5),
        Err(TableFormatError::ChainLengthMismatch {
            line: 1,
            expected: 6,
            found: 3
        })
    ));
}

#[test]
fn test_invalid_symbol_reports_line() {
    let text = "0000000\n0000001\n\nabc_def\n0000002\n\n";
    let err = parse_table(text.as_bytes(), 10).unwrap_err();
    assert!(matches!(err, TableFormatError::InvalidPassword { line: 4, .. }));
    assert!(err.to_string().starts_with("line 4:"));
}

#[test]
fn test_load_reports_format_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.txt");
    fs::write(&path, "0000000\n\n").unwrap();

    let result = load_table(&path, 10, Reducer::Fixed);
    assert!(matches!(
        result,
        Err(Error::TableFormat(TableFormatError::MissingEndpoint { line: 1 }))
    ));
}

#[test]
fn test_load_windows_line_endings() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("crlf.txt");
    fs::write(&path, "0000000\r\naaaaaaa\r\n\r\n").unwrap();

    let table = load_table(&path, 10, Reducer::Fixed).unwrap();
    assert_eq!(table.lookup(&pw("aaaaaaa")).count(), 1);
}
