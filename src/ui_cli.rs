use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::app::AppError;
use crate::config::Config;
use crate::i18n::{keys, Translator};
use crate::machining::{
    compute_batch, evaluate_thread_job, evaluate_turning_job, BatchResult,
    DegenerateCutPolicy, RollingMaterial, ThreadJobInput, ThreadJobOutput, TurningJobInput,
    TurningJobOutput, TurningProcess,
};
use crate::table_io;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Turning,
    ThreadRolling,
    Batch,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    main_menu_from(tr, &mut io::stdin().lock())
}

/// 주어진 입력에서 메뉴 선택을 읽는다. 입력이 끝나면 종료로 본다.
pub fn main_menu_from<R: BufRead>(
    tr: &Translator,
    input: &mut R,
) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_TURNING));
    println!("{}", tr.t(keys::MAIN_MENU_THREAD_ROLLING));
    println!("{}", tr.t(keys::MAIN_MENU_BATCH));
    println!("{}", tr.t(keys::MAIN_MENU_SETTINGS));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = match read_line_from(input, &tr.t(keys::PROMPT_MENU_SELECT)) {
            Ok(sel) => sel,
            Err(e) if e.is_end_of_input() => return Ok(MenuChoice::Exit),
            Err(e) => return Err(e),
        };
        match sel.trim() {
            "1" => return Ok(MenuChoice::Turning),
            "2" => return Ok(MenuChoice::ThreadRolling),
            "3" => return Ok(MenuChoice::Batch),
            "4" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 선삭 단건 메뉴를 처리한다.
pub fn handle_turning(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::TURNING_HEADING));
    println!("{}", tr.t(keys::TURNING_PROCESS_OPTIONS));
    let sel = read_line(&tr.t(keys::PROMPT_SELECT))?;
    let process = match sel.trim() {
        "2" => TurningProcess::ChamferDrillSlot,
        "3" => TurningProcess::ChamferGrooveSlot,
        "4" => TurningProcess::ChamferGrooveDrill,
        _ => TurningProcess::Chamfer,
    };
    println!("> {process}");

    let d = &cfg.turning;
    let input = TurningJobInput {
        raw_length_mm: read_f64_or(tr, keys::PROMPT_ROD_LENGTH, d.raw_length_mm)?,
        raw_diameter_mm: read_f64_or(tr, keys::PROMPT_RAW_DIAMETER, d.raw_diameter_mm)?,
        final_diameter_mm: read_f64_or(tr, keys::PROMPT_FINAL_DIAMETER, d.final_diameter_mm)?,
        extra_time_min: read_f64_or(
            tr,
            keys::PROMPT_EXTRA_TIME,
            process.default_extra_time_min(),
        )?,
        ..d.to_input(0.0)
    };
    if let Some(depth) = process.default_depth_mm() {
        let depth = read_f64_or(tr, keys::PROMPT_DEPTH, depth)?;
        tracing::debug!(process = %process, depth, "깊이 입력 (시간 모델 미반영)");
    }

    match evaluate_turning_job(input, cfg.degenerate_cut) {
        Ok(out) => {
            print_turning_result(tr, &cfg.currency, &out);
            if let Some(path) = read_export_path(tr)? {
                let result = table_io::save_turning_csv(Path::new(&path), process, &input, &out);
                report_export(tr, &path, result);
            }
        }
        Err(e) => println!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
    }
    Ok(())
}

/// 나사 전조 메뉴를 처리한다.
pub fn handle_thread_rolling(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::THREAD_HEADING));
    let d = &cfg.thread_rolling;
    for (i, m) in RollingMaterial::ALL.iter().enumerate() {
        let (lo, hi) = m.speed_range();
        let (c_lo, c_hi) = m.taylor_constant_range();
        println!(
            "{}) {} ({lo}~{hi} m/min, Taylor n={}, C={c_lo}~{c_hi})",
            i + 1,
            m.label(),
            m.taylor_exponent()
        );
    }
    let default_pos = RollingMaterial::ALL
        .iter()
        .position(|m| *m == d.material)
        .unwrap_or(0);
    let sel = read_u32_or(tr, keys::THREAD_MATERIAL_PROMPT, (default_pos + 1) as u32)?;
    let material = RollingMaterial::from_menu_index(sel).unwrap_or(d.material);
    let default_speed = if material == d.material {
        d.rolling_speed()
    } else {
        material.speed_range().0
    };

    let input = ThreadJobInput {
        major_diameter_mm: read_f64_or(tr, keys::PROMPT_MAJOR_DIAMETER, d.major_diameter_mm)?,
        pitch_mm: read_f64_or(tr, keys::PROMPT_PITCH, d.pitch_mm)?,
        length_mm: read_f64_or(tr, keys::PROMPT_THREAD_LENGTH, d.length_mm)?,
        rolling_speed_m_per_min: read_f64_or(tr, keys::PROMPT_ROLLING_SPEED, default_speed)?,
        density_g_per_cm3: read_f64_or(tr, keys::PROMPT_DENSITY, d.density_g_per_cm3)?,
        cost_per_kg: read_f64_or(tr, keys::PROMPT_COST_PER_KG, d.cost_per_kg)?,
        material_volume_cm3: read_f64_or(tr, keys::PROMPT_VOLUME, d.material_volume_cm3)?,
        machine_hourly_rate: read_f64_or(tr, keys::PROMPT_MACHINE_RATE, d.machine_hourly_rate)?,
        operator_hourly_rate: read_f64_or(
            tr,
            keys::PROMPT_OPERATOR_RATE,
            d.operator_hourly_rate,
        )?,
        tool_cost: read_f64_or(tr, keys::PROMPT_TOOL_COST, d.tool_cost)?,
        tool_life_parts: read_u32_or(tr, keys::PROMPT_TOOL_LIFE, d.tool_life_parts)?,
    };
    if let Some(warning) = material.check_speed(input.rolling_speed_m_per_min) {
        println!("{}: {warning}", tr.t(keys::WARNING_PREFIX));
    }

    match evaluate_thread_job(input) {
        Ok(out) => {
            print_thread_result(tr, &cfg.currency, &out);
            if let Some(path) = read_export_path(tr)? {
                let result = table_io::save_thread_csv(Path::new(&path), material, &input, &out);
                report_export(tr, &path, result);
            }
        }
        Err(e) => println!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
    }
    Ok(())
}

/// 선삭 일괄 계산 메뉴를 처리한다.
pub fn handle_batch(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::BATCH_HEADING));
    println!("{}", tr.t(keys::BATCH_NOTE_COLUMNS));
    let path = read_line(&tr.t(keys::PROMPT_INPUT_FILE))?;
    let path = path.trim();
    if path.is_empty() {
        return Ok(());
    }
    let records = match table_io::read_records(Path::new(path)) {
        Ok(records) => records,
        Err(e) => {
            println!("{}: {e}", tr.t(keys::ERROR_PREFIX));
            return Ok(());
        }
    };
    println!("{} {}", tr.t(keys::BATCH_LOADED_ROWS), records.len());
    let raw_diameter = read_f64_or(
        tr,
        keys::PROMPT_RAW_DIAMETER_BULK,
        cfg.turning.raw_diameter_mm,
    )?;

    let result = compute_batch(&cfg.batch_params(), raw_diameter, &records);
    print_batch_result(tr, &cfg.currency, &result);
    if let Some(out_path) = read_export_path(tr)? {
        let written = table_io::save_batch_csv(Path::new(&out_path), &records, &result);
        report_export(tr, &out_path, written);
    }
    Ok(())
}

/// 설정 메뉴를 처리한다.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!("{} {:?}", tr.t(keys::SETTINGS_CURRENT_POLICY), cfg.degenerate_cut);
    println!("{}", tr.t(keys::SETTINGS_POLICY_OPTIONS));
    let sel = read_line(&tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    match sel.trim() {
        "" => {}
        "1" => cfg.degenerate_cut = DegenerateCutPolicy::Infinity,
        "2" => cfg.degenerate_cut = DegenerateCutPolicy::Reject,
        _ => println!("{}", tr.t(keys::SETTINGS_INVALID)),
    }

    println!("{} {}", tr.t(keys::SETTINGS_CURRENT_PARALLEL), cfg.parallel_batch);
    let sel = read_line(&tr.t(keys::SETTINGS_PROMPT_PARALLEL))?;
    match sel.trim().to_lowercase().as_str() {
        "" => {}
        "y" | "yes" => cfg.parallel_batch = true,
        "n" | "no" => cfg.parallel_batch = false,
        _ => println!("{}", tr.t(keys::SETTINGS_INVALID)),
    }
    Ok(())
}

/// 선삭 결과를 출력한다.
pub fn print_turning_result(tr: &Translator, currency: &str, out: &TurningJobOutput) {
    println!("{} {:.2} rpm", tr.t(keys::RESULT_SPINDLE_SPEED), out.spindle_speed_rpm);
    println!("{} {:.4} kg", tr.t(keys::RESULT_WEIGHT), out.weight_kg);
    println!("{} {:.3} min", tr.t(keys::RESULT_MACHINING_TIME), out.machining_time_min);
    println!("{} {:.3} min", tr.t(keys::RESULT_TOTAL_TIME), out.total_time_min);
    println!("{} {:.2} {currency}", tr.t(keys::RESULT_MATERIAL_COST), out.material_cost);
    println!("{} {:.2} {currency}", tr.t(keys::RESULT_MACHINING_COST), out.machining_cost);
    println!("{} {:.2} {currency}", tr.t(keys::RESULT_TOTAL_COST), out.total_cost);
    if out.is_unbounded() {
        println!("{}: {}", tr.t(keys::WARNING_PREFIX), tr.t(keys::RESULT_UNBOUNDED));
    }
}

/// 나사 전조 결과를 출력한다.
pub fn print_thread_result(tr: &Translator, currency: &str, out: &ThreadJobOutput) {
    println!("{} {:.2} rpm", tr.t(keys::RESULT_SPINDLE_SPEED), out.spindle_speed_rpm);
    println!("{} {:.2} mm/min", tr.t(keys::RESULT_FEED_RATE), out.feed_rate_mm_per_min);
    println!("{} {:.4} min", tr.t(keys::RESULT_ROLLING_TIME), out.rolling_time_min);
    println!("{} {:.2} {currency}", tr.t(keys::RESULT_MATERIAL_COST), out.material_cost);
    println!("{} {:.4} {currency}", tr.t(keys::RESULT_MACHINE_COST), out.machine_cost);
    println!("{} {:.4} {currency}", tr.t(keys::RESULT_LABOR_COST), out.labor_cost);
    println!(
        "{} {:.4} {currency}",
        tr.t(keys::RESULT_TOOLING_COST),
        out.tooling_cost_per_part
    );
    println!("{} {:.2} {currency}", tr.t(keys::RESULT_TOTAL_PER_PART), out.total_cost);
}

/// 배치 결과 표와 요약을 출력한다.
pub fn print_batch_result(tr: &Translator, currency: &str, result: &BatchResult) {
    for line in batch_result_lines(tr, currency, result) {
        println!("{line}");
    }
}

/// 배치 결과를 입력 행 순서대로 표 형태의 줄로 만든다. 마지막 줄은 요약이다.
pub fn batch_result_lines(tr: &Translator, currency: &str, result: &BatchResult) -> Vec<String> {
    let mut lines = Vec::with_capacity(result.len() + 2);
    lines.push(format!(
        "{:>4} {:>9} {:>8} {:>8} {:>12} {:>12} {:>12} {:>10}",
        "#", "length", "dia", "extra", "material", "machining", "total", "time"
    ));
    for entry in &result.entries {
        match &entry.outcome {
            Ok(s) => lines.push(format!(
                "{:>4} {:>9.1} {:>8.2} {:>8.2} {:>12.2} {:>12.2} {:>12.2} {:>10.3}",
                entry.index,
                s.row.length_mm,
                s.row.final_diameter_mm,
                s.row.extra_time_min,
                s.output.material_cost,
                s.output.machining_cost,
                s.output.total_cost,
                s.output.total_time_min
            )),
            Err(err) => lines.push(format!(
                "{:>4} {} {err}",
                entry.index,
                tr.t(keys::BATCH_FAILED_ROW)
            )),
        }
    }
    let summary = result.summary();
    lines.push(format!(
        "{} {}/{}/{}  Σ {:.2} {currency}, Σ {:.3} min",
        tr.t(keys::BATCH_SUMMARY),
        summary.succeeded,
        summary.failed,
        summary.unbounded,
        summary.total_cost,
        summary.total_time_min
    ));
    lines
}

fn read_export_path(tr: &Translator) -> Result<Option<String>, AppError> {
    let path = read_line(&tr.t(keys::PROMPT_EXPORT_PATH))?;
    let path = path.trim();
    Ok(if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    })
}

fn report_export(tr: &Translator, path: &str, result: Result<(), table_io::TableError>) {
    match result {
        Ok(()) => println!("{} {path}", tr.t(keys::EXPORT_SAVED)),
        Err(e) => println!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
    }
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    read_line_from(&mut io::stdin().lock(), prompt)
}

/// 프롬프트를 출력하고 한 줄을 읽는다. 0바이트 읽기(EOF)는 `UnexpectedEof` 오류이다.
pub fn read_line_from<R: BufRead>(input: &mut R, prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "입력이 끝났습니다").into());
    }
    Ok(buf)
}

/// 값을 읽는다. 빈 입력이면 기본값을 쓴다.
fn read_f64_or(tr: &Translator, label_key: &str, default: f64) -> Result<f64, AppError> {
    let prompt = format!(
        "{} {} {default}): ",
        tr.t(label_key),
        tr.t(keys::DEFAULT_HINT)
    );
    loop {
        let s = read_line(&prompt)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(default);
        }
        match s.parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_u32_or(tr: &Translator, label_key: &str, default: u32) -> Result<u32, AppError> {
    let prompt = format!(
        "{} {} {default}): ",
        tr.t(label_key),
        tr.t(keys::DEFAULT_HINT)
    );
    loop {
        let s = read_line(&prompt)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(default);
        }
        match s.parse::<u32>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}
