use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::i18n::{self, Translator};
use crate::machining::{
    compute_batch, evaluate_thread_job, evaluate_turning_job, DegenerateCutPolicy,
    MachiningError, RollingMaterial, ThreadJobInput, TurningJobInput, TurningProcess,
};
use crate::table_io::{self, TableError};
use crate::ui_cli;
use crate::ui_cli::MenuChoice;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 표 입출력 오류
    #[error("표 입출력 오류: {0}")]
    Table(#[from] TableError),
    /// 가공 계산 오류
    #[error("계산 오류: {0}")]
    Machining(#[from] MachiningError),
}

impl AppError {
    /// 표준 입력이 닫혀 더 읽을 것이 없는 경우.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, AppError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

/// CLI 애플리케이션의 메인 루프를 실행한다. 입력이 끝나면 설정을 저장하고 종료한다.
pub fn run(config: &mut Config, config_path: &Path, tr: &Translator) -> Result<(), AppError> {
    loop {
        let step = match ui_cli::main_menu(tr)? {
            MenuChoice::Turning => ui_cli::handle_turning(tr, config),
            MenuChoice::ThreadRolling => ui_cli::handle_thread_rolling(tr, config),
            MenuChoice::Batch => ui_cli::handle_batch(tr, config),
            MenuChoice::Settings => ui_cli::handle_settings(tr, config).and_then(|()| {
                config.save(config_path)?;
                println!("{}", tr.t(i18n::keys::SETTINGS_SAVED));
                Ok(())
            }),
            MenuChoice::Exit => break,
        };
        match step {
            Ok(()) => {}
            Err(e) if e.is_end_of_input() => break,
            Err(e) => return Err(e),
        }
    }
    config.save(config_path)?;
    println!("{}", tr.t(i18n::keys::APP_EXIT));
    Ok(())
}

/// 비대화식 선삭 단건 계산. 계산 실패는 오류로 돌려준다.
pub fn run_turning(
    tr: &Translator,
    cfg: &Config,
    process: TurningProcess,
    input: TurningJobInput,
    policy: DegenerateCutPolicy,
    export: Option<&Path>,
) -> Result<(), AppError> {
    info!(process = %process, ?policy, "선삭 단건 계산");
    let out = evaluate_turning_job(input, policy)?;
    ui_cli::print_turning_result(tr, &cfg.currency, &out);
    if let Some(path) = export {
        table_io::save_turning_csv(path, process, &input, &out)?;
        println!("{} {}", tr.t(i18n::keys::EXPORT_SAVED), path.display());
    }
    Ok(())
}

/// 비대화식 나사 전조 계산.
pub fn run_thread(
    tr: &Translator,
    cfg: &Config,
    material: RollingMaterial,
    input: ThreadJobInput,
    export: Option<&Path>,
) -> Result<(), AppError> {
    info!(material = %material, "나사 전조 계산");
    if let Some(warning) = material.check_speed(input.rolling_speed_m_per_min) {
        println!("{}: {warning}", tr.t(i18n::keys::WARNING_PREFIX));
    }
    let out = evaluate_thread_job(input)?;
    ui_cli::print_thread_result(tr, &cfg.currency, &out);
    if let Some(path) = export {
        table_io::save_thread_csv(path, material, &input, &out)?;
        println!("{} {}", tr.t(i18n::keys::EXPORT_SAVED), path.display());
    }
    Ok(())
}

/// 비대화식 배치 계산. 행 단위 실패는 결과에 기록될 뿐 전체 실패로 이어지지 않는다.
pub fn run_batch(
    tr: &Translator,
    cfg: &Config,
    input_path: &Path,
    raw_diameter_mm: f64,
    output: Option<&Path>,
) -> Result<(), AppError> {
    let records = table_io::read_records(input_path)?;
    let result = compute_batch(&cfg.batch_params(), raw_diameter_mm, &records);
    ui_cli::print_batch_result(tr, &cfg.currency, &result);
    if let Some(path) = output {
        table_io::save_batch_csv(path, &records, &result)?;
        println!("{} {}", tr.t(i18n::keys::EXPORT_SAVED), path.display());
    }
    Ok(())
}
