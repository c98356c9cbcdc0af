//! 배치 입력 표(CSV/엑셀) 읽기와 결과 CSV 내보내기.
//!
//! 계산 모듈 바깥의 입출력 어댑터이다. 내보내기 실패는 이미 계산된 결과에 영향을 주지 않는다.

use calamine::{open_workbook_auto, Reader};
use csv::{ReaderBuilder, Writer};
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::machining::batch::find_column;
use crate::machining::{
    BatchRecord, BatchResult, RollingMaterial, ThreadJobInput, ThreadJobOutput, TurningJobInput,
    TurningJobOutput, TurningProcess, DIAMETER_COLUMN, EXTRA_TIME_COLUMN, LENGTH_COLUMN,
};

/// 표 입출력 오류.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] io::Error),
    #[error("CSV 처리 오류: {0}")]
    Csv(#[from] csv::Error),
    #[error("엑셀 파싱 오류: {0}")]
    Excel(String),
    #[error("지원하지 않는 파일 형식: {0} (.csv/.xlsx/.xls 만 지원)")]
    UnsupportedFormat(String),
    #[error("표에 머리글 행이 없습니다")]
    MissingHeader,
}

/// 확장자에 따라 CSV 또는 엑셀(첫 시트)을 읽어 행 목록으로 돌려준다.
pub fn read_records(path: &Path) -> Result<Vec<BatchRecord>, TableError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let records = match ext.as_str() {
        "csv" => read_csv_records(File::open(path)?)?,
        "xlsx" | "xls" => read_excel_records(path)?,
        _ => return Err(TableError::UnsupportedFormat(ext)),
    };
    info!(path = %path.display(), rows = records.len(), "배치 입력 파일 로드");
    Ok(records)
}

/// CSV를 읽는다. 첫 행은 머리글이며 완전히 빈 행은 건너뛴다.
pub fn read_csv_records<R: io::Read>(reader: R) -> Result<Vec<BatchRecord>, TableError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(TableError::MissingHeader);
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row = to_record(&headers, record.iter().map(str::to_string));
        if row.values().all(|v| v.is_empty()) {
            continue;
        }
        records.push(row);
    }
    Ok(records)
}

fn read_excel_records(path: &Path) -> Result<Vec<BatchRecord>, TableError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| TableError::Excel(e.to_string()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| TableError::Excel("시트가 없습니다".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| TableError::Excel(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(TableError::MissingHeader)?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(TableError::MissingHeader);
    }

    let mut records = Vec::new();
    for data_row in rows {
        let row = to_record(&headers, data_row.iter().map(|cell| cell.to_string()));
        if row.values().all(|v| v.is_empty()) {
            continue;
        }
        records.push(row);
    }
    Ok(records)
}

fn to_record(headers: &[String], cells: impl Iterator<Item = String>) -> BatchRecord {
    let mut row = HashMap::new();
    for (header, value) in headers.iter().zip(cells) {
        if !header.is_empty() {
            row.insert(header.clone(), value.trim().to_string());
        }
    }
    row
}

/// 배치 결과 CSV 머리글.
pub const BATCH_HEADERS: [&str; 10] = [
    "row",
    LENGTH_COLUMN,
    DIAMETER_COLUMN,
    EXTRA_TIME_COLUMN,
    "Material Cost",
    "Machining Cost",
    "Total Cost",
    "Machining Time (min)",
    "Total Time (min)",
    "Error",
];

/// 배치 결과를 CSV로 쓴다. 입력 열은 원본 문자열을 옮기고(중복 열은 빈칸), 실패 행은 Error 열만 채운다.
pub fn write_batch_csv<W: io::Write>(
    writer: W,
    records: &[BatchRecord],
    result: &BatchResult,
) -> Result<(), TableError> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(BATCH_HEADERS)?;
    for entry in &result.entries {
        let source = |column: &'static str| -> String {
            records
                .get(entry.index)
                .and_then(|r| find_column(r, column).ok().flatten())
                .unwrap_or_default()
                .to_string()
        };
        let mut line = vec![
            entry.index.to_string(),
            source(LENGTH_COLUMN),
            source(DIAMETER_COLUMN),
            source(EXTRA_TIME_COLUMN),
        ];
        match &entry.outcome {
            Ok(s) => {
                line.extend([
                    s.output.material_cost.to_string(),
                    s.output.machining_cost.to_string(),
                    s.output.total_cost.to_string(),
                    s.output.machining_time_min.to_string(),
                    s.output.total_time_min.to_string(),
                    String::new(),
                ]);
            }
            Err(e) => {
                line.extend(std::iter::repeat(String::new()).take(5));
                line.push(e.reason.to_string());
            }
        }
        wtr.write_record(&line)?;
    }
    wtr.flush()?;
    Ok(())
}

/// 단건 선삭 결과를 CSV(머리글 + 1행)로 쓴다.
pub fn write_turning_csv<W: io::Write>(
    writer: W,
    process: TurningProcess,
    input: &TurningJobInput,
    output: &TurningJobOutput,
) -> Result<(), TableError> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record([
        "Process",
        "Rod Length (mm)",
        "Available Rod Dia (mm)",
        "Required Dia (mm)",
        "Density (g/cm3)",
        "Cost/kg",
        "Feed Rate (mm/rev)",
        "Cutting Speed (m/min)",
        "MHR (per hr)",
        "Extra Time (min)",
        "Machining Time (min)",
        "Total Time (min)",
        "Material Cost",
        "Machining Cost",
        "Total Cost",
    ])?;
    wtr.write_record([
        process.label().to_string(),
        input.raw_length_mm.to_string(),
        input.raw_diameter_mm.to_string(),
        input.final_diameter_mm.to_string(),
        input.density_g_per_cm3.to_string(),
        input.cost_per_kg.to_string(),
        input.feed_rate_mm_per_rev.to_string(),
        input.cutting_speed_m_per_min.to_string(),
        input.machine_hour_rate.to_string(),
        input.extra_time_min.to_string(),
        output.machining_time_min.to_string(),
        output.total_time_min.to_string(),
        output.material_cost.to_string(),
        output.machining_cost.to_string(),
        output.total_cost.to_string(),
    ])?;
    wtr.flush()?;
    Ok(())
}

/// 단건 나사 전조 결과를 CSV로 쓴다.
pub fn write_thread_csv<W: io::Write>(
    writer: W,
    material: RollingMaterial,
    input: &ThreadJobInput,
    output: &ThreadJobOutput,
) -> Result<(), TableError> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record([
        "Material",
        "Major Dia (mm)",
        "Pitch (mm)",
        "Thread Length (mm)",
        "Rolling Speed (m/min)",
        "Spindle RPM",
        "Feed Rate (mm/min)",
        "Rolling Time (min)",
        "Material Cost",
        "Machine Cost",
        "Labor Cost",
        "Tooling Cost per Part",
        "Total Cost",
    ])?;
    wtr.write_record([
        material.label().to_string(),
        input.major_diameter_mm.to_string(),
        input.pitch_mm.to_string(),
        input.length_mm.to_string(),
        input.rolling_speed_m_per_min.to_string(),
        output.spindle_speed_rpm.to_string(),
        output.feed_rate_mm_per_min.to_string(),
        output.rolling_time_min.to_string(),
        output.material_cost.to_string(),
        output.machine_cost.to_string(),
        output.labor_cost.to_string(),
        output.tooling_cost_per_part.to_string(),
        output.total_cost.to_string(),
    ])?;
    wtr.flush()?;
    Ok(())
}

/// 배치 결과를 파일로 저장한다.
pub fn save_batch_csv(
    path: &Path,
    records: &[BatchRecord],
    result: &BatchResult,
) -> Result<(), TableError> {
    write_batch_csv(File::create(path)?, records, result)?;
    info!(path = %path.display(), rows = result.len(), "배치 결과 저장");
    Ok(())
}

/// 단건 선삭 결과를 파일로 저장한다.
pub fn save_turning_csv(
    path: &Path,
    process: TurningProcess,
    input: &TurningJobInput,
    output: &TurningJobOutput,
) -> Result<(), TableError> {
    write_turning_csv(File::create(path)?, process, input, output)?;
    info!(path = %path.display(), "선삭 결과 저장");
    Ok(())
}

/// 단건 나사 전조 결과를 파일로 저장한다.
pub fn save_thread_csv(
    path: &Path,
    material: RollingMaterial,
    input: &ThreadJobInput,
    output: &ThreadJobOutput,
) -> Result<(), TableError> {
    write_thread_csv(File::create(path)?, material, input, output)?;
    info!(path = %path.display(), "나사 전조 결과 저장");
    Ok(())
}
