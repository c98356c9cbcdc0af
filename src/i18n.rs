use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const WARNING_PREFIX: &str = "general.warning_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const DEFAULT_HINT: &str = "general.default_hint";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_TURNING: &str = "main_menu.turning";
    pub const MAIN_MENU_THREAD_ROLLING: &str = "main_menu.thread_rolling";
    pub const MAIN_MENU_BATCH: &str = "main_menu.batch";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const PROMPT_SELECT: &str = "prompt.select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const TURNING_HEADING: &str = "turning.heading";
    pub const TURNING_PROCESS_OPTIONS: &str = "turning.process_options";
    pub const PROMPT_ROD_LENGTH: &str = "prompt.rod_length";
    pub const PROMPT_RAW_DIAMETER: &str = "prompt.raw_diameter";
    pub const PROMPT_FINAL_DIAMETER: &str = "prompt.final_diameter";
    pub const PROMPT_EXTRA_TIME: &str = "prompt.extra_time";
    pub const PROMPT_DEPTH: &str = "prompt.depth";
    pub const RESULT_SPINDLE_SPEED: &str = "result.spindle_speed";
    pub const RESULT_WEIGHT: &str = "result.weight";
    pub const RESULT_MACHINING_TIME: &str = "result.machining_time";
    pub const RESULT_TOTAL_TIME: &str = "result.total_time";
    pub const RESULT_MATERIAL_COST: &str = "result.material_cost";
    pub const RESULT_MACHINING_COST: &str = "result.machining_cost";
    pub const RESULT_TOTAL_COST: &str = "result.total_cost";
    pub const RESULT_UNBOUNDED: &str = "result.unbounded";

    pub const THREAD_HEADING: &str = "thread.heading";
    pub const THREAD_MATERIAL_PROMPT: &str = "thread.material_prompt";
    pub const PROMPT_MAJOR_DIAMETER: &str = "prompt.major_diameter";
    pub const PROMPT_PITCH: &str = "prompt.pitch";
    pub const PROMPT_THREAD_LENGTH: &str = "prompt.thread_length";
    pub const PROMPT_ROLLING_SPEED: &str = "prompt.rolling_speed";
    pub const PROMPT_DENSITY: &str = "prompt.density";
    pub const PROMPT_COST_PER_KG: &str = "prompt.cost_per_kg";
    pub const PROMPT_VOLUME: &str = "prompt.volume";
    pub const PROMPT_MACHINE_RATE: &str = "prompt.machine_rate";
    pub const PROMPT_OPERATOR_RATE: &str = "prompt.operator_rate";
    pub const PROMPT_TOOL_COST: &str = "prompt.tool_cost";
    pub const PROMPT_TOOL_LIFE: &str = "prompt.tool_life";
    pub const RESULT_FEED_RATE: &str = "result.feed_rate";
    pub const RESULT_ROLLING_TIME: &str = "result.rolling_time";
    pub const RESULT_MACHINE_COST: &str = "result.machine_cost";
    pub const RESULT_LABOR_COST: &str = "result.labor_cost";
    pub const RESULT_TOOLING_COST: &str = "result.tooling_cost";
    pub const RESULT_TOTAL_PER_PART: &str = "result.total_per_part";

    pub const BATCH_HEADING: &str = "batch.heading";
    pub const BATCH_NOTE_COLUMNS: &str = "batch.note_columns";
    pub const PROMPT_INPUT_FILE: &str = "prompt.input_file";
    pub const PROMPT_RAW_DIAMETER_BULK: &str = "prompt.raw_diameter_bulk";
    pub const BATCH_LOADED_ROWS: &str = "batch.loaded_rows";
    pub const BATCH_SUMMARY: &str = "batch.summary";
    pub const BATCH_FAILED_ROW: &str = "batch.failed_row";

    pub const PROMPT_EXPORT_PATH: &str = "prompt.export_path";
    pub const EXPORT_SAVED: &str = "export.saved";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_POLICY: &str = "settings.current_policy";
    pub const SETTINGS_POLICY_OPTIONS: &str = "settings.policy_options";
    pub const SETTINGS_CURRENT_PARALLEL: &str = "settings.current_parallel";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_PROMPT_PARALLEL: &str = "settings.prompt_parallel";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Ko
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 ko로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&Path>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides(Path::new("locales"), lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 번역을 가져온다. 언어팩 > 내장 영어 > 내장 한국어 순이다.
    pub fn t(&self, key: &str) -> Cow<'_, str> {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return Cow::Borrowed(v.as_str());
        }
        Cow::Borrowed(match self.lang {
            Language::En => en(key).unwrap_or_else(|| ko(key)),
            Language::Ko => ko(key),
        })
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [section] 아래 key = "value".
fn load_overrides(dir: &Path, lang: &str) -> Option<HashMap<String, String>> {
    let path = dir.join(format!("{lang}.toml"));
    let content = fs::read_to_string(path).ok()?;
    parse_toml_to_map(&content)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "오류",
        WARNING_PREFIX => "주의",
        APP_EXIT => "프로그램을 종료합니다.",
        DEFAULT_HINT => "(엔터 = 기본값",
        MAIN_MENU_TITLE => "\n=== 가공 원가 계산기 ===",
        MAIN_MENU_TURNING => "1) 선삭 원가 (단건)",
        MAIN_MENU_THREAD_ROLLING => "2) 나사 전조 원가",
        MAIN_MENU_BATCH => "3) 선삭 일괄 계산 (CSV/엑셀)",
        MAIN_MENU_SETTINGS => "4) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        PROMPT_SELECT => "선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        TURNING_HEADING => "\n-- 선삭 원가 --",
        TURNING_PROCESS_OPTIONS => {
            "공정: 1) Chamfer  2) Chamfer Drill Slot  3) Chamfer Groove Slot  4) Chamfer Groove Drill"
        }
        PROMPT_ROD_LENGTH => "봉 길이 [mm]",
        PROMPT_RAW_DIAMETER => "소재 봉 지름 [mm]",
        PROMPT_FINAL_DIAMETER => "완성 지름 [mm]",
        PROMPT_EXTRA_TIME => "추가 공정 시간 [min]",
        PROMPT_DEPTH => "드릴/홈 깊이 [mm] (기록용)",
        RESULT_SPINDLE_SPEED => "주축 회전수:",
        RESULT_WEIGHT => "소재 중량:",
        RESULT_MACHINING_TIME => "가공 시간:",
        RESULT_TOTAL_TIME => "총 시간:",
        RESULT_MATERIAL_COST => "재료비:",
        RESULT_MACHINING_COST => "가공비:",
        RESULT_TOTAL_COST => "총원가:",
        RESULT_UNBOUNDED => "절삭 조건이 성립하지 않아 가공 시간이 무한대입니다 (이송/절삭속도 확인).",
        THREAD_HEADING => "\n-- 나사 전조 원가 --",
        THREAD_MATERIAL_PROMPT => "소재 번호",
        PROMPT_MAJOR_DIAMETER => "나사 외경 [mm]",
        PROMPT_PITCH => "피치 [mm]",
        PROMPT_THREAD_LENGTH => "나사 길이 [mm]",
        PROMPT_ROLLING_SPEED => "전조 속도 [m/min]",
        PROMPT_DENSITY => "밀도 [g/cm³]",
        PROMPT_COST_PER_KG => "소재 단가 [/kg]",
        PROMPT_VOLUME => "소재 체적 [cm³]",
        PROMPT_MACHINE_RATE => "기계 시간당 비용 [/h]",
        PROMPT_OPERATOR_RATE => "작업자 시간당 비용 [/h]",
        PROMPT_TOOL_COST => "공구(다이스) 가격",
        PROMPT_TOOL_LIFE => "공구 수명 [부품 수]",
        RESULT_FEED_RATE => "이송속도:",
        RESULT_ROLLING_TIME => "전조 시간:",
        RESULT_MACHINE_COST => "기계비:",
        RESULT_LABOR_COST => "인건비:",
        RESULT_TOOLING_COST => "부품당 공구비:",
        RESULT_TOTAL_PER_PART => "부품당 총원가:",
        BATCH_HEADING => "\n-- 선삭 일괄 계산 --",
        BATCH_NOTE_COLUMNS => {
            "입력 파일은 length(봉 길이 mm), dia(완성 지름 mm), chamfer(추가 시간 min) 열을 가져야 합니다."
        }
        PROMPT_INPUT_FILE => "입력 파일 경로 (.csv/.xlsx): ",
        PROMPT_RAW_DIAMETER_BULK => "일괄 계산용 소재 봉 지름 [mm]",
        BATCH_LOADED_ROWS => "불러온 행 수:",
        BATCH_SUMMARY => "성공/실패/무한대:",
        BATCH_FAILED_ROW => "실패 행",
        PROMPT_EXPORT_PATH => "CSV로 저장할 경로 (건너뛰려면 엔터): ",
        EXPORT_SAVED => "저장 완료:",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_CURRENT_POLICY => "현재 절삭 불가 처리:",
        SETTINGS_POLICY_OPTIONS => "1) 무한대 시간으로 계산  2) 오류로 거부",
        SETTINGS_CURRENT_PARALLEL => "배치 병렬 계산:",
        SETTINGS_PROMPT_CHANGE => "변경할 번호(취소하려면 엔터): ",
        SETTINGS_PROMPT_PARALLEL => "병렬 계산 사용? (y/n, 엔터 = 유지): ",
        SETTINGS_INVALID => "잘못된 입력이므로 변경하지 않습니다.",
        SETTINGS_SAVED => "설정이 저장되었습니다.",
        _ => "[missing translation]",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        WARNING_PREFIX => "Warning",
        APP_EXIT => "Exiting application.",
        DEFAULT_HINT => "(enter = default",
        MAIN_MENU_TITLE => "\n=== Machining Cost Calculator ===",
        MAIN_MENU_TURNING => "1) Turning cost (single part)",
        MAIN_MENU_THREAD_ROLLING => "2) Thread rolling cost",
        MAIN_MENU_BATCH => "3) Turning batch (CSV/Excel)",
        MAIN_MENU_SETTINGS => "4) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        PROMPT_SELECT => "Select: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please select again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        TURNING_HEADING => "\n-- Turning Cost --",
        TURNING_PROCESS_OPTIONS => {
            "Process: 1) Chamfer  2) Chamfer Drill Slot  3) Chamfer Groove Slot  4) Chamfer Groove Drill"
        }
        PROMPT_ROD_LENGTH => "Rod length [mm]",
        PROMPT_RAW_DIAMETER => "Available rod diameter [mm]",
        PROMPT_FINAL_DIAMETER => "Required diameter [mm]",
        PROMPT_EXTRA_TIME => "Operation time [min]",
        PROMPT_DEPTH => "Drill/groove depth [mm] (record only)",
        RESULT_SPINDLE_SPEED => "Spindle speed:",
        RESULT_WEIGHT => "Rod weight:",
        RESULT_MACHINING_TIME => "Machining time:",
        RESULT_TOTAL_TIME => "Total time:",
        RESULT_MATERIAL_COST => "Material cost:",
        RESULT_MACHINING_COST => "Machining cost:",
        RESULT_TOTAL_COST => "Total cost:",
        RESULT_UNBOUNDED => "Cut is not feasible; machining time is unbounded (check feed/cutting speed).",
        THREAD_HEADING => "\n-- Thread Rolling Cost --",
        THREAD_MATERIAL_PROMPT => "Material number",
        PROMPT_MAJOR_DIAMETER => "Thread major diameter [mm]",
        PROMPT_PITCH => "Thread pitch [mm]",
        PROMPT_THREAD_LENGTH => "Thread length [mm]",
        PROMPT_ROLLING_SPEED => "Rolling speed [m/min]",
        PROMPT_DENSITY => "Material density [g/cm³]",
        PROMPT_COST_PER_KG => "Material cost [/kg]",
        PROMPT_VOLUME => "Material volume [cm³]",
        PROMPT_MACHINE_RATE => "Machine hourly rate [/h]",
        PROMPT_OPERATOR_RATE => "Operator hourly rate [/h]",
        PROMPT_TOOL_COST => "Tool cost",
        PROMPT_TOOL_LIFE => "Tool life [parts]",
        RESULT_FEED_RATE => "Feed rate:",
        RESULT_ROLLING_TIME => "Thread rolling time:",
        RESULT_MACHINE_COST => "Machine cost:",
        RESULT_LABOR_COST => "Labor cost:",
        RESULT_TOOLING_COST => "Tooling cost per part:",
        RESULT_TOTAL_PER_PART => "Total cost per part:",
        BATCH_HEADING => "\n-- Turning Batch --",
        BATCH_NOTE_COLUMNS => {
            "The input file must contain the columns length (rod length mm), dia (required diameter mm), chamfer (time min)."
        }
        PROMPT_INPUT_FILE => "Input file path (.csv/.xlsx): ",
        PROMPT_RAW_DIAMETER_BULK => "Available rod diameter for bulk data [mm]",
        BATCH_LOADED_ROWS => "Rows loaded:",
        BATCH_SUMMARY => "Succeeded/failed/unbounded:",
        BATCH_FAILED_ROW => "Failed row",
        PROMPT_EXPORT_PATH => "Save as CSV to (enter to skip): ",
        EXPORT_SAVED => "Saved:",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_POLICY => "Degenerate cut handling:",
        SETTINGS_POLICY_OPTIONS => "1) Unbounded (infinite) time  2) Reject as error",
        SETTINGS_CURRENT_PARALLEL => "Parallel batch:",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_PROMPT_PARALLEL => "Use parallel batch? (y/n, enter = keep): ",
        SETTINGS_INVALID => "Invalid input; setting unchanged.",
        SETTINGS_SAVED => "Settings saved.",
        _ => return None,
    })
}
