use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use machining_cost_toolbox::machining::{DegenerateCutPolicy, RollingMaterial, TurningProcess};
use machining_cost_toolbox::{app, config, i18n, logging};

/// 선삭/나사 전조 가공 비용 계산기.
#[derive(Parser)]
#[command(name = "machining_cost_toolbox", version)]
#[command(about = "선삭/나사 전조 가공 시간과 비용 계산기", long_about = None)]
struct Cli {
    /// 설정 파일 경로
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// 표시 언어(auto/ko/en)
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,

    /// 로그 상세도(-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// 없으면 대화형 메뉴를 띄운다.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// 선삭 단건 계산
    Turning(TurningArgs),
    /// 나사 전조 단건 계산
    Thread(ThreadArgs),
    /// CSV/엑셀 파일로 선삭 일괄 계산
    Batch(BatchArgs),
}

#[derive(Args)]
struct TurningArgs {
    /// 공정 종류(chamfer, chamfer-drill-slot, chamfer-groove-slot, chamfer-groove-drill)
    #[arg(long, default_value = "chamfer")]
    process: TurningProcess,
    /// 봉재 길이 [mm]
    #[arg(long)]
    length: Option<f64>,
    /// 소재 지름 [mm]
    #[arg(long)]
    raw_dia: Option<f64>,
    /// 완성 지름 [mm]
    #[arg(long)]
    final_dia: Option<f64>,
    /// 밀도 [g/cm³]
    #[arg(long)]
    density: Option<f64>,
    #[arg(long)]
    cost_per_kg: Option<f64>,
    /// 이송 [mm/rev]
    #[arg(long)]
    feed: Option<f64>,
    /// 절삭속도 [m/min]
    #[arg(long)]
    speed: Option<f64>,
    /// 기계 시간당 비용
    #[arg(long)]
    mhr: Option<f64>,
    /// 부가 시간 [min]. 없으면 공정 기본값.
    #[arg(long)]
    extra_time: Option<f64>,
    /// 절삭 불가 조건 처리(infinity/reject)
    #[arg(long)]
    policy: Option<DegenerateCutPolicy>,
    /// 결과 CSV 경로
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Args)]
struct ThreadArgs {
    /// 소재 종류(mild-steel, stainless-steel 등)
    #[arg(long)]
    material: Option<RollingMaterial>,
    /// 호칭 지름 [mm]
    #[arg(long)]
    major_dia: Option<f64>,
    /// 피치 [mm]
    #[arg(long)]
    pitch: Option<f64>,
    /// 나사 길이 [mm]
    #[arg(long)]
    length: Option<f64>,
    /// 전조 속도 [m/min]
    #[arg(long)]
    speed: Option<f64>,
    #[arg(long)]
    density: Option<f64>,
    #[arg(long)]
    cost_per_kg: Option<f64>,
    /// 소재 부피 [cm³]
    #[arg(long)]
    volume: Option<f64>,
    #[arg(long)]
    machine_rate: Option<f64>,
    #[arg(long)]
    operator_rate: Option<f64>,
    #[arg(long)]
    tool_cost: Option<f64>,
    /// 공구 수명 [개]
    #[arg(long)]
    tool_life: Option<u32>,
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Args)]
struct BatchArgs {
    /// 입력 파일(.csv/.xlsx/.xls)
    #[arg(short, long)]
    input: PathBuf,
    /// 공통 소재 지름 [mm]
    #[arg(long)]
    raw_diameter: Option<f64>,
    /// 결과 CSV 경로
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// 행 단위 병렬 계산
    #[arg(long)]
    parallel: bool,
    #[arg(long)]
    policy: Option<DegenerateCutPolicy>,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 하위 명령 또는 대화형 메뉴를 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match try_run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "실행 실패");
            eprintln!("오류: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: Cli) -> Result<(), app::AppError> {
    let mut cfg = config::load_or_default(&cli.config)?;
    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let tr = i18n::Translator::new_with_pack(&lang, None);

    match cli.command {
        None => app::run(&mut cfg, &cli.config, &tr),
        Some(Command::Turning(args)) => {
            let d = &cfg.turning;
            let extra = args
                .extra_time
                .unwrap_or_else(|| args.process.default_extra_time_min());
            let mut input = d.to_input(extra);
            input.raw_length_mm = args.length.unwrap_or(input.raw_length_mm);
            input.raw_diameter_mm = args.raw_dia.unwrap_or(input.raw_diameter_mm);
            input.final_diameter_mm = args.final_dia.unwrap_or(input.final_diameter_mm);
            input.density_g_per_cm3 = args.density.unwrap_or(input.density_g_per_cm3);
            input.cost_per_kg = args.cost_per_kg.unwrap_or(input.cost_per_kg);
            input.feed_rate_mm_per_rev = args.feed.unwrap_or(input.feed_rate_mm_per_rev);
            input.cutting_speed_m_per_min = args.speed.unwrap_or(input.cutting_speed_m_per_min);
            input.machine_hour_rate = args.mhr.unwrap_or(input.machine_hour_rate);
            let policy = args.policy.unwrap_or(cfg.degenerate_cut);
            app::run_turning(
                &tr,
                &cfg,
                args.process,
                input,
                policy,
                args.export.as_deref(),
            )
        }
        Some(Command::Thread(args)) => {
            let d = &cfg.thread_rolling;
            let material = args.material.unwrap_or(d.material);
            let mut input = d.to_input();
            if material != d.material && d.rolling_speed_m_per_min.is_none() {
                input.rolling_speed_m_per_min = material.speed_range().0;
            }
            input.major_diameter_mm = args.major_dia.unwrap_or(input.major_diameter_mm);
            input.pitch_mm = args.pitch.unwrap_or(input.pitch_mm);
            input.length_mm = args.length.unwrap_or(input.length_mm);
            input.rolling_speed_m_per_min = args.speed.unwrap_or(input.rolling_speed_m_per_min);
            input.density_g_per_cm3 = args.density.unwrap_or(input.density_g_per_cm3);
            input.cost_per_kg = args.cost_per_kg.unwrap_or(input.cost_per_kg);
            input.material_volume_cm3 = args.volume.unwrap_or(input.material_volume_cm3);
            input.machine_hourly_rate = args.machine_rate.unwrap_or(input.machine_hourly_rate);
            input.operator_hourly_rate =
                args.operator_rate.unwrap_or(input.operator_hourly_rate);
            input.tool_cost = args.tool_cost.unwrap_or(input.tool_cost);
            input.tool_life_parts = args.tool_life.unwrap_or(input.tool_life_parts);
            app::run_thread(&tr, &cfg, material, input, args.export.as_deref())
        }
        Some(Command::Batch(args)) => {
            if args.parallel {
                cfg.parallel_batch = true;
            }
            if let Some(policy) = args.policy {
                cfg.degenerate_cut = policy;
            }
            let raw = args.raw_diameter.unwrap_or(cfg.turning.raw_diameter_mm);
            app::run_batch(&tr, &cfg, &args.input, raw, args.output.as_deref())
        }
    }
}
