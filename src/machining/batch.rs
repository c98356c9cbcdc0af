//! 여러 부품 행에 선삭 계산을 독립적으로 적용하는 배치 계산.
//!
//! 공통 소재 지름과 기본 파라미터를 모든 행에 공유하고, 행마다 길이·완성 지름·
//! 추가 시간만 다르다. 잘못된 행은 해당 행의 오류로 기록되고 나머지 행은 계속 계산된다.

use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{info, warn};

use super::error::{BatchRowError, BatchRowFailure};
use super::turning::{
    compute_turning_job_with, validate_turning_job, DegenerateCutPolicy, TurningJobInput,
    TurningJobOutput,
};

/// 업로드된 표의 한 행. 키는 열 머리글이다.
pub type BatchRecord = HashMap<String, String>;

/// 소재 봉 길이 열
pub const LENGTH_COLUMN: &str = "length";
/// 완성 지름 열
pub const DIAMETER_COLUMN: &str = "dia";
/// 추가(챔퍼) 시간 열
pub const EXTRA_TIME_COLUMN: &str = "chamfer";

/// 모든 행이 공유하는 기본 파라미터.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchParams {
    pub density_g_per_cm3: f64,
    pub cost_per_kg: f64,
    pub feed_rate_mm_per_rev: f64,
    pub cutting_speed_m_per_min: f64,
    pub machine_hour_rate: f64,
    pub policy: DegenerateCutPolicy,
    /// true면 rayon으로 병렬 계산한다. 결과 순서는 동일하다.
    pub parallel: bool,
}

/// 파싱된 배치 행.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchRow {
    pub length_mm: f64,
    pub final_diameter_mm: f64,
    pub extra_time_min: f64,
}

impl BatchRow {
    /// 표 행에서 `length`, `dia`, `chamfer` 열을 읽는다. 머리글은 대소문자/공백을 무시한다.
    pub fn from_record(record: &BatchRecord) -> Result<Self, BatchRowFailure> {
        Ok(Self {
            length_mm: parse_column(record, LENGTH_COLUMN)?,
            final_diameter_mm: parse_column(record, DIAMETER_COLUMN)?,
            extra_time_min: parse_column(record, EXTRA_TIME_COLUMN)?,
        })
    }

    /// 공통 소재 지름과 기본 파라미터를 합쳐 단건 입력을 만든다.
    pub fn to_input(&self, params: &BatchParams, raw_diameter_mm: f64) -> TurningJobInput {
        TurningJobInput {
            raw_length_mm: self.length_mm,
            raw_diameter_mm,
            final_diameter_mm: self.final_diameter_mm,
            density_g_per_cm3: params.density_g_per_cm3,
            cost_per_kg: params.cost_per_kg,
            feed_rate_mm_per_rev: params.feed_rate_mm_per_rev,
            cutting_speed_m_per_min: params.cutting_speed_m_per_min,
            machine_hour_rate: params.machine_hour_rate,
            extra_time_min: self.extra_time_min,
        }
    }
}

/// 머리글을 대소문자/공백 무시로 찾는다. 같은 이름으로 읽히는 열이 둘 이상이면 실패이다.
pub(crate) fn find_column<'a>(
    record: &'a BatchRecord,
    column: &'static str,
) -> Result<Option<&'a str>, BatchRowFailure> {
    let mut matches = record
        .iter()
        .filter(|(k, _)| k.trim().eq_ignore_ascii_case(column))
        .map(|(_, v)| v.trim());
    match (matches.next(), matches.next()) {
        (Some(_), Some(_)) => Err(BatchRowFailure::DuplicateColumn(column)),
        (found, _) => Ok(found),
    }
}

fn parse_column(record: &BatchRecord, column: &'static str) -> Result<f64, BatchRowFailure> {
    let raw = find_column(record, column)?
        .filter(|v| !v.is_empty())
        .ok_or(BatchRowFailure::MissingField(column))?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(BatchRowFailure::NotNumeric {
            field: column,
            value: raw.to_string(),
        }),
    }
}

/// 성공한 행의 입력과 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSuccess {
    pub row: BatchRow,
    pub output: TurningJobOutput,
}

/// 입력 순서의 한 행에 대한 계산 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub index: usize,
    pub outcome: Result<BatchSuccess, BatchRowError>,
}

/// 배치 집계.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSummary {
    pub rows: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 가공 시간이 무한대인 성공 행 수
    pub unbounded: usize,
    /// 유한한 성공 행의 총원가 합
    pub total_cost: f64,
    /// 유한한 성공 행의 총시간 합 [min]
    pub total_time_min: f64,
}

/// 입력과 같은 순서의 배치 결과.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchResult {
    pub entries: Vec<BatchEntry>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (usize, &BatchSuccess)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().ok().map(|s| (e.index, s)))
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchRowError> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().err())
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            rows: self.entries.len(),
            succeeded: 0,
            failed: 0,
            unbounded: 0,
            total_cost: 0.0,
            total_time_min: 0.0,
        };
        for entry in &self.entries {
            match &entry.outcome {
                Ok(s) if s.output.is_unbounded() => {
                    summary.succeeded += 1;
                    summary.unbounded += 1;
                }
                Ok(s) => {
                    summary.succeeded += 1;
                    summary.total_cost += s.output.total_cost;
                    summary.total_time_min += s.output.total_time_min;
                }
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// 표 행(`BatchRecord`)들을 계산한다. 어떤 행이 실패해도 전체 호출은 실패하지 않는다.
pub fn compute_batch(
    params: &BatchParams,
    raw_diameter_mm: f64,
    records: &[BatchRecord],
) -> BatchResult {
    run_batch(params, raw_diameter_mm, records, BatchRow::from_record)
}

/// 이미 파싱된 행들을 계산한다.
pub fn compute_batch_rows(
    params: &BatchParams,
    raw_diameter_mm: f64,
    rows: &[BatchRow],
) -> BatchResult {
    run_batch(params, raw_diameter_mm, rows, |row| Ok(*row))
}

fn run_batch<T, F>(params: &BatchParams, raw_diameter_mm: f64, items: &[T], parse: F) -> BatchResult
where
    T: Sync,
    F: Fn(&T) -> Result<BatchRow, BatchRowFailure> + Sync,
{
    let evaluate = |(index, item): (usize, &T)| {
        let outcome = compute_row(params, raw_diameter_mm, parse(item))
            .map_err(|reason| BatchRowError { index, reason });
        BatchEntry { index, outcome }
    };
    let entries: Vec<BatchEntry> = if params.parallel {
        items.par_iter().enumerate().map(evaluate).collect()
    } else {
        items.iter().enumerate().map(evaluate).collect()
    };

    let result = BatchResult { entries };
    for err in result.failed() {
        warn!(index = err.index, reason = %err.reason, "배치 행 계산 실패");
    }
    let summary = result.summary();
    info!(
        rows = summary.rows,
        succeeded = summary.succeeded,
        failed = summary.failed,
        unbounded = summary.unbounded,
        "배치 계산 완료"
    );
    result
}

fn compute_row(
    params: &BatchParams,
    raw_diameter_mm: f64,
    parsed: Result<BatchRow, BatchRowFailure>,
) -> Result<BatchSuccess, BatchRowFailure> {
    let row = parsed?;
    let input = row.to_input(params, raw_diameter_mm);
    validate_turning_job(&input)?;
    let output = compute_turning_job_with(input, params.policy)?;
    Ok(BatchSuccess { row, output })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> BatchRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn header_lookup_ignores_case_and_padding() {
        let rec = record(&[(" Length ", "250"), ("DIA", " 36 "), ("Chamfer", "5")]);
        let row = BatchRow::from_record(&rec).expect("row");
        assert_eq!(row.length_mm, 250.0);
        assert_eq!(row.final_diameter_mm, 36.0);
        assert_eq!(row.extra_time_min, 5.0);
    }

    #[test]
    fn case_variant_headers_are_ambiguous() {
        let rec = record(&[
            ("Length", "250"),
            ("length", "300"),
            ("dia", "36"),
            ("chamfer", "5"),
        ]);
        for _ in 0..8 {
            assert_eq!(
                BatchRow::from_record(&rec),
                Err(BatchRowFailure::DuplicateColumn(LENGTH_COLUMN))
            );
        }
    }

    #[test]
    fn empty_cell_counts_as_missing() {
        let rec = record(&[("length", "250"), ("dia", ""), ("chamfer", "5")]);
        assert_eq!(
            BatchRow::from_record(&rec),
            Err(BatchRowFailure::MissingField(DIAMETER_COLUMN))
        );
    }

    #[test]
    fn nan_text_is_not_numeric() {
        let rec = record(&[("length", "NaN"), ("dia", "36"), ("chamfer", "5")]);
        assert!(matches!(
            BatchRow::from_record(&rec),
            Err(BatchRowFailure::NotNumeric { field: "length", .. })
        ));
    }
}
