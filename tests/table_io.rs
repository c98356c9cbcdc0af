//! 배치 표 입출력 테스트.
use std::fs;
use std::path::Path;

use rust_xlsxwriter::Workbook;

use machining_cost_toolbox::machining::{compute_batch, BatchParams, DegenerateCutPolicy};
use machining_cost_toolbox::table_io::{
    read_csv_records, read_records, save_batch_csv, write_batch_csv, TableError, BATCH_HEADERS,
};

fn params() -> BatchParams {
    BatchParams {
        density_g_per_cm3: 7.85,
        cost_per_kg: 55.0,
        feed_rate_mm_per_rev: 0.20,
        cutting_speed_m_per_min: 20.0,
        machine_hour_rate: 800.0,
        policy: DegenerateCutPolicy::Infinity,
        parallel: false,
    }
}

#[test]
fn csv_headers_are_trimmed_and_blank_rows_skipped() {
    let data = "Length , Dia,chamfer\n250,36,5\n,,\n300, 30 ,8\n";
    let records = read_csv_records(data.as_bytes()).expect("csv");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("Length").map(String::as_str), Some("250"));
    assert_eq!(records[1].get("Dia").map(String::as_str), Some("30"));
}

#[test]
fn read_records_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("parts.csv");
    fs::write(&path, "length,dia,chamfer\n250,36,5\nabc,36,5\n").expect("write");
    let records = read_records(&path).expect("read");
    assert_eq!(records.len(), 2);

    let result = compute_batch(&params(), 38.0, &records);
    assert_eq!(result.summary().failed, 1);
}

#[test]
fn unsupported_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("parts.txt");
    fs::write(&path, "length,dia,chamfer\n").expect("write");
    assert!(matches!(
        read_records(&path),
        Err(TableError::UnsupportedFormat(ext)) if ext == "txt"
    ));
}

#[test]
fn batch_csv_keeps_failed_rows() {
    let records =
        read_csv_records("length,dia,chamfer\n250,36,5\nabc,36,5\n".as_bytes()).expect("csv");
    let result = compute_batch(&params(), 38.0, &records);

    let mut buf = Vec::new();
    write_batch_csv(&mut buf, &records, &result).expect("write");
    let text = String::from_utf8(buf).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], BATCH_HEADERS.join(","));
    assert!(lines[1].starts_with("0,250,36,5,122.41"));
    assert!(lines[1].ends_with(','));
    assert!(lines[2].starts_with("1,abc,36,5,,,,,,"));
    assert!(lines[2].contains("length"));
}

#[test]
fn save_batch_csv_writes_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.csv");
    let records = read_csv_records("length,dia,chamfer\n250,36,5\n".as_bytes()).expect("csv");
    let result = compute_batch(&params(), 38.0, &records);
    save_batch_csv(&path, &records, &result).expect("save");
    let text = fs::read_to_string(&path).expect("read back");
    assert_eq!(text.lines().count(), 2);
}

fn write_parts_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, " Length ").expect("header");
    sheet.write_string(0, 1, "DIA").expect("header");
    sheet.write_string(0, 2, "chamfer").expect("header");
    sheet.write_number(1, 0, 250.0).expect("cell");
    sheet.write_number(1, 1, 36.0).expect("cell");
    sheet.write_number(1, 2, 5.0).expect("cell");
    // 2행은 비워 둔다.
    sheet.write_number(3, 0, 300.0).expect("cell");
    sheet.write_number(3, 1, 30.5).expect("cell");
    sheet.write_number(3, 2, 8.0).expect("cell");
    workbook.save(path).expect("save workbook");
}

#[test]
fn xlsx_first_sheet_is_read() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("parts.xlsx");
    write_parts_workbook(&path);

    let records = read_records(&path).expect("xlsx");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("Length").map(String::as_str), Some("250"));
    assert_eq!(records[0].get("DIA").map(String::as_str), Some("36"));
    assert_eq!(records[1].get("DIA").map(String::as_str), Some("30.5"));

    let result = compute_batch(&params(), 38.0, &records);
    assert_eq!(result.summary().succeeded, 2);
}

#[test]
fn empty_sheet_has_no_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.xlsx");
    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    workbook.save(&path).expect("save workbook");
    assert!(matches!(read_records(&path), Err(TableError::MissingHeader)));
}

#[test]
fn empty_csv_has_no_header() {
    assert!(matches!(
        read_csv_records("".as_bytes()),
        Err(TableError::MissingHeader)
    ));
    assert!(matches!(
        read_csv_records(" , \n".as_bytes()),
        Err(TableError::MissingHeader)
    ));
}
