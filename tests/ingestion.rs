use alphastudio::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn native_file_loads_in_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "native.csv",
        "ts_ms,open,high,low,close,volume\n\
         1000,10,10,10,10,0\n\
         2000,11,11.5,10.5,11,250\n\
         3000,12,12,12,12,0\n",
    );

    let loaded = load(&path).unwrap();

    assert_eq!(loaded.schema, Schema::Native);
    assert!(loaded.diagnostics.is_clean());
    assert_eq!(
        loaded.bars[1],
        Bar::new(2000, 11.0, 11.5, 10.5, 11.0, 250.0)
    );
    let ts: Vec<i64> = loaded.bars.iter().map(|b| b.ts_ms).collect();
    assert_eq!(ts, vec![1000, 2000, 3000]);
}

#[test]
fn unrecognized_header_yields_error_and_no_bars() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "weird.csv", "foo,bar,baz\n1,2,3\n");

    let err = load(&path).unwrap_err();

    assert!(matches!(err, LoadError::UnrecognizedHeader(_)));
    assert!(!err.to_string().is_empty());
    assert!(err.to_string().contains("foo,bar,baz"));
}

#[test]
fn empty_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "empty.csv", "");

    assert!(matches!(load(&path), Err(LoadError::EmptyFile(_))));
}

#[test]
fn defective_rows_leave_one_warning_and_a_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "defects.csv",
        "ts_ms,open,high,low,close,volume\n\
         1000,10,10,10,10,0\n\
         2000,11,11\n\
         500,12,12,12,12,0\n\
         abc,1,1,1,1,1\n",
    );

    let loaded = load(&path).unwrap();

    //the non-monotonic row is kept, the malformed and non-numeric ones are not
    let ts: Vec<i64> = loaded.bars.iter().map(|b| b.ts_ms).collect();
    assert_eq!(ts, vec![1000, 500]);
    assert_eq!(loaded.diagnostics.warning_count, 3);
    assert_eq!(loaded.warning(), Some(RowWarning::BadNumeric { line: 5 }));
}

const VENDOR_HEADER: &str = "Date,Close/Last,Volume,Open,High,Low\n";

const VENDOR_ROWS_NEWEST_FIRST: [&str; 4] = [
    "09/12/2025,$395.94,\"168,156,400\",$370.94,$396.6899,$370.24",
    "09/11/2025,$368.81,\"103,756,000\",$350.17,$369.99,$346.53",
    "09/10/2025,$347.79,\"72,820,220\",$350.55,$350.6999,$336.70",
    "09/09/2025,$346.97,\"53,816,100\",$344.40,$348.91,$340.88",
];

#[test]
fn vendor_descending_and_ascending_load_identically() {
    let dir = tempfile::tempdir().unwrap();

    let descending = format!("{}{}\n", VENDOR_HEADER, VENDOR_ROWS_NEWEST_FIRST.join("\n"));
    let mut rows = VENDOR_ROWS_NEWEST_FIRST.to_vec();
    rows.reverse();
    let ascending = format!("{}{}\n", VENDOR_HEADER, rows.join("\n"));

    let desc = load(write_csv(dir.path(), "desc.csv", &descending)).unwrap();
    let asc = load(write_csv(dir.path(), "asc.csv", &ascending)).unwrap();

    assert_eq!(desc.schema, Schema::VendorDaily);
    assert_eq!(desc.bars, asc.bars);
    assert_eq!(desc.bars.len(), 4);
    assert_eq!(desc.bars[0].ts_ms, 1_757_376_000_000);
    assert_eq!(desc.bars[3].ts_ms, 1_757_635_200_000);
    assert_eq!(desc.bars[3].close, 395.94);
    assert_eq!(desc.bars[3].volume, 168_156_400.0);
}

#[test]
fn vendor_bad_dates_are_skipped_with_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let contents = format!(
        "{}02/31/2025,$1,1,$1,$1,$1\n01/02/2025,$2,2,$2,$2,$2\n",
        VENDOR_HEADER
    );

    let loaded = load(write_csv(dir.path(), "dates.csv", &contents)).unwrap();

    assert_eq!(loaded.bars.len(), 1);
    assert_eq!(loaded.warning(), Some(RowWarning::BadDate { line: 2 }));
}

#[test]
fn blank_lines_are_skipped_without_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "blanks.csv",
        "ts_ms,open,high,low,close,volume\n\n1000,1,1,1,1,1\n\n\n2000,2,2,2,2,2\n\n",
    );

    let loaded = load(&path).unwrap();
    assert_eq!(loaded.bars.len(), 2);
    assert!(loaded.diagnostics.is_clean());
}

#[test]
fn delimiter_only_lines_are_reported() {
    let native = load_from_reader(
        "ts_ms,open,high,low,close,volume
1000,1,1,1,1,1
,,,,,
2000,2,2,2,2,2
".as_bytes(),
    )
    .unwrap();
    assert_eq!(native.bars.len(), 2);
    assert_eq!(native.diagnostics.warning_count, 1);
    assert_eq!(native.warning(), Some(RowWarning::BadNumeric { line: 3 }));

    let vendor = load_from_reader(
        "Date,Close/Last,Volume,Open,High,Low
09/12/2025,$1,1,$1,$1,$1
 , , , , , 
"
            .as_bytes(),
    )
    .unwrap();
    assert_eq!(vendor.bars.len(), 1);
    assert_eq!(vendor.diagnostics.warning_count, 1);
    assert_eq!(vendor.warning(), Some(RowWarning::BadDate { line: 3 }));
}

#[test]
fn header_detection_ignores_case_and_spaces() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "spaced.csv",
        " TS_MS , Open , High , Low , Close , Volume \n1000, 1, 1, 1, 1, 1\n",
    );

    let loaded = load(&path).unwrap();
    assert_eq!(loaded.schema, Schema::Native);
    assert_eq!(loaded.bars.len(), 1);
}
