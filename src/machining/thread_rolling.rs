//! 나사 전조 회전수·시간·원가 계산.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;
use tracing::debug;

use super::error::{DomainError, MachiningError, ValidationError};

/// 전조 소재 분류. 권장 전조 속도와 Taylor 공구수명 상수 참고치를 가진다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollingMaterial {
    AluminiumAlloys,
    BrassCopper,
    #[default]
    MildSteel,
    MediumCarbonSteel,
    HighCarbonSteel,
    AlloySteel,
    StainlessSteel,
    TitaniumAlloys,
}

impl RollingMaterial {
    pub const ALL: [RollingMaterial; 8] = [
        RollingMaterial::AluminiumAlloys,
        RollingMaterial::BrassCopper,
        RollingMaterial::MildSteel,
        RollingMaterial::MediumCarbonSteel,
        RollingMaterial::HighCarbonSteel,
        RollingMaterial::AlloySteel,
        RollingMaterial::StainlessSteel,
        RollingMaterial::TitaniumAlloys,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RollingMaterial::AluminiumAlloys => "Aluminium Alloys",
            RollingMaterial::BrassCopper => "Brass & Copper",
            RollingMaterial::MildSteel => "Mild Steel",
            RollingMaterial::MediumCarbonSteel => "Medium Carbon Steel",
            RollingMaterial::HighCarbonSteel => "High Carbon Steel",
            RollingMaterial::AlloySteel => "Alloy Steel",
            RollingMaterial::StainlessSteel => "Stainless Steel",
            RollingMaterial::TitaniumAlloys => "Titanium Alloys",
        }
    }

    /// 권장 전조 속도 범위 [m/min]
    pub fn speed_range(&self) -> (f64, f64) {
        match self {
            RollingMaterial::AluminiumAlloys => (20.0, 60.0),
            RollingMaterial::BrassCopper => (15.0, 40.0),
            RollingMaterial::MildSteel => (10.0, 30.0),
            RollingMaterial::MediumCarbonSteel => (8.0, 25.0),
            RollingMaterial::HighCarbonSteel => (5.0, 15.0),
            RollingMaterial::AlloySteel => (5.0, 15.0),
            RollingMaterial::StainlessSteel => (4.0, 12.0),
            RollingMaterial::TitaniumAlloys => (3.0, 8.0),
        }
    }

    /// Taylor 공구수명 지수 n
    pub fn taylor_exponent(&self) -> f64 {
        match self {
            RollingMaterial::AluminiumAlloys => 0.3,
            RollingMaterial::BrassCopper => 0.25,
            RollingMaterial::MildSteel => 0.2,
            RollingMaterial::MediumCarbonSteel => 0.18,
            RollingMaterial::HighCarbonSteel => 0.15,
            RollingMaterial::AlloySteel => 0.13,
            RollingMaterial::StainlessSteel => 0.12,
            RollingMaterial::TitaniumAlloys => 0.1,
        }
    }

    /// Taylor 상수 C 범위
    pub fn taylor_constant_range(&self) -> (f64, f64) {
        match self {
            RollingMaterial::AluminiumAlloys => (80.0, 120.0),
            RollingMaterial::BrassCopper => (60.0, 100.0),
            RollingMaterial::MildSteel => (40.0, 80.0),
            RollingMaterial::MediumCarbonSteel => (30.0, 70.0),
            RollingMaterial::HighCarbonSteel => (20.0, 60.0),
            RollingMaterial::AlloySteel => (15.0, 50.0),
            RollingMaterial::StainlessSteel => (10.0, 40.0),
            RollingMaterial::TitaniumAlloys => (5.0, 25.0),
        }
    }

    /// 1부터 시작하는 메뉴 번호로 소재를 고른다. 범위 밖이면 None.
    pub fn from_menu_index(n: u32) -> Option<RollingMaterial> {
        let index = usize::try_from(n).ok()?.checked_sub(1)?;
        RollingMaterial::ALL.get(index).copied()
    }

    /// 전조 속도가 권장 범위를 벗어나면 경고 문구를 돌려준다. 계산을 막지는 않는다.
    pub fn check_speed(&self, speed_m_per_min: f64) -> Option<String> {
        let (min, max) = self.speed_range();
        if speed_m_per_min < min || speed_m_per_min > max {
            Some(format!(
                "{} 권장 전조 속도 {min}~{max} m/min 범위를 벗어남 (입력 {speed_m_per_min} m/min)",
                self.label()
            ))
        } else {
            None
        }
    }
}

impl std::fmt::Display for RollingMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RollingMaterial {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalize = |v: &str| -> String {
            v.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        };
        let key = normalize(s);
        RollingMaterial::ALL
            .into_iter()
            .find(|m| normalize(m.label()) == key)
            .ok_or_else(|| format!("알 수 없는 전조 소재: {s}"))
    }
}

/// 나사 전조 계산 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreadJobInput {
    /// 나사 외경 D [mm]
    pub major_diameter_mm: f64,
    /// 피치 P [mm]
    pub pitch_mm: f64,
    /// 나사 길이 L [mm]
    pub length_mm: f64,
    /// 전조 속도 S [m/min]
    pub rolling_speed_m_per_min: f64,
    /// 밀도 [g/cm³]
    pub density_g_per_cm3: f64,
    /// 소재 단가 [통화/kg]
    pub cost_per_kg: f64,
    /// 소재 체적 [cm³]
    pub material_volume_cm3: f64,
    /// 기계 시간당 비용 [통화/h]
    pub machine_hourly_rate: f64,
    /// 작업자 시간당 비용 [통화/h]
    pub operator_hourly_rate: f64,
    /// 전조 다이스 가격
    pub tool_cost: f64,
    /// 공구 수명 [부품 수]
    pub tool_life_parts: u32,
}

/// 나사 전조 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreadJobOutput {
    pub spindle_speed_rpm: f64,
    pub feed_rate_mm_per_min: f64,
    pub rolling_time_min: f64,
    pub material_cost: f64,
    pub machine_cost: f64,
    pub labor_cost: f64,
    pub tooling_cost_per_part: f64,
    pub total_cost: f64,
}

/// 호출 전 단계의 입력 검증.
pub fn validate_thread_job(input: &ThreadJobInput) -> Result<(), ValidationError> {
    ValidationError::require_positive("major_diameter_mm", input.major_diameter_mm)?;
    ValidationError::require_positive("pitch_mm", input.pitch_mm)?;
    ValidationError::require_positive("length_mm", input.length_mm)?;
    ValidationError::require_positive("rolling_speed_m_per_min", input.rolling_speed_m_per_min)?;
    ValidationError::require_positive("density_g_per_cm3", input.density_g_per_cm3)?;
    ValidationError::require_positive("material_volume_cm3", input.material_volume_cm3)?;
    ValidationError::require_non_negative("cost_per_kg", input.cost_per_kg)?;
    ValidationError::require_non_negative("machine_hourly_rate", input.machine_hourly_rate)?;
    ValidationError::require_non_negative("operator_hourly_rate", input.operator_hourly_rate)?;
    ValidationError::require_non_negative("tool_cost", input.tool_cost)?;
    ValidationError::require_positive("tool_life_parts", f64::from(input.tool_life_parts))?;
    Ok(())
}

/// 나사 전조 회전수, 이송, 시간, 원가를 계산한다.
///
/// 선삭과 달리 무한대 가드가 없다. 분모가 0이면 `DomainError` 이다.
pub fn compute_thread_job(input: ThreadJobInput) -> Result<ThreadJobOutput, DomainError> {
    // N = 1000·S / (π·D)
    let circumference = PI * input.major_diameter_mm;
    if circumference == 0.0 {
        return Err(DomainError::ZeroMajorDiameter);
    }
    let spindle_speed_rpm = (1000.0 * input.rolling_speed_m_per_min) / circumference;

    // F = N·P [mm/min], T = L / F [min]
    let feed_rate_mm_per_min = spindle_speed_rpm * input.pitch_mm;
    if feed_rate_mm_per_min == 0.0 {
        return Err(DomainError::ZeroRollingFeed);
    }
    let rolling_time_min = input.length_mm / feed_rate_mm_per_min;

    // g -> kg 단일 /1000 환산
    let material_cost =
        input.material_volume_cm3 * input.density_g_per_cm3 * input.cost_per_kg / 1000.0;
    let machine_cost = (input.machine_hourly_rate / 60.0) * rolling_time_min;
    let labor_cost = (input.operator_hourly_rate / 60.0) * rolling_time_min;

    if input.tool_life_parts == 0 {
        return Err(DomainError::ZeroToolLife);
    }
    let tooling_cost_per_part = input.tool_cost / f64::from(input.tool_life_parts);

    let total_cost = material_cost + machine_cost + labor_cost + tooling_cost_per_part;

    debug!(
        spindle_speed_rpm,
        rolling_time_min, total_cost, "나사 전조 원가 계산 완료"
    );

    Ok(ThreadJobOutput {
        spindle_speed_rpm,
        feed_rate_mm_per_min,
        rolling_time_min,
        material_cost,
        machine_cost,
        labor_cost,
        tooling_cost_per_part,
        total_cost,
    })
}

/// 검증 후 계산한다.
pub fn evaluate_thread_job(input: ThreadJobInput) -> Result<ThreadJobOutput, MachiningError> {
    validate_thread_job(&input)?;
    Ok(compute_thread_job(input)?)
}
