//! 봉재 외경 선삭의 재료비·가공시간·가공비 계산.
//!
//! 길이 [mm], 밀도 [g/cm³], 절삭속도 [m/min], 이송 [mm/rev] 기준이다.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;
use tracing::{debug, warn};

use super::error::{Constraint, DomainError, MachiningError, ValidationError};

/// 주축 회전수나 이송이 0 이하라 절삭이 성립하지 않을 때의 처리 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateCutPolicy {
    /// 가공 시간을 +∞로 두고 계산을 계속한다.
    #[default]
    Infinity,
    /// `DomainError::DegenerateCut` 으로 거부한다.
    Reject,
}

impl FromStr for DegenerateCutPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "infinity" | "inf" => Ok(DegenerateCutPolicy::Infinity),
            "reject" => Ok(DegenerateCutPolicy::Reject),
            other => Err(format!("알 수 없는 정책: {other} (infinity/reject)")),
        }
    }
}

/// 선삭 후 추가되는 2차 가공 공정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurningProcess {
    #[default]
    Chamfer,
    ChamferDrillSlot,
    ChamferGrooveSlot,
    ChamferGrooveDrill,
}

impl TurningProcess {
    pub const ALL: [TurningProcess; 4] = [
        TurningProcess::Chamfer,
        TurningProcess::ChamferDrillSlot,
        TurningProcess::ChamferGrooveSlot,
        TurningProcess::ChamferGrooveDrill,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TurningProcess::Chamfer => "Chamfer",
            TurningProcess::ChamferDrillSlot => "Chamfer Drill Slot",
            TurningProcess::ChamferGrooveSlot => "Chamfer Groove Slot",
            TurningProcess::ChamferGrooveDrill => "Chamfer Groove Drill",
        }
    }

    /// 공정별 기본 추가 시간 [min]
    pub fn default_extra_time_min(&self) -> f64 {
        match self {
            TurningProcess::Chamfer => 5.0,
            TurningProcess::ChamferDrillSlot => 10.0,
            TurningProcess::ChamferGrooveSlot => 8.0,
            TurningProcess::ChamferGrooveDrill => 12.0,
        }
    }

    /// 드릴/홈 깊이 기본값 [mm]. 기록용이며 시간 모델에는 들어가지 않는다.
    pub fn default_depth_mm(&self) -> Option<f64> {
        match self {
            TurningProcess::Chamfer => None,
            TurningProcess::ChamferDrillSlot => Some(20.0),
            TurningProcess::ChamferGrooveSlot => Some(15.0),
            TurningProcess::ChamferGrooveDrill => Some(25.0),
        }
    }
}

impl std::fmt::Display for TurningProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TurningProcess {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        TurningProcess::ALL
            .into_iter()
            .find(|p| p.label().replace(' ', "").to_lowercase() == key)
            .ok_or_else(|| format!("알 수 없는 공정: {s}"))
    }
}

/// 선삭 원가 계산 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurningJobInput {
    /// 소재 봉 길이 [mm]
    pub raw_length_mm: f64,
    /// 소재 봉 지름 [mm]
    pub raw_diameter_mm: f64,
    /// 완성 지름 [mm]
    pub final_diameter_mm: f64,
    /// 소재 밀도 [g/cm³]
    pub density_g_per_cm3: f64,
    /// 소재 단가 [통화/kg]
    pub cost_per_kg: f64,
    /// 이송량 [mm/rev]
    pub feed_rate_mm_per_rev: f64,
    /// 절삭속도 [m/min]
    pub cutting_speed_m_per_min: f64,
    /// 기계 시간당 비용 [통화/h]
    pub machine_hour_rate: f64,
    /// 챔퍼/드릴/홈 등 추가 고정 시간 [min]
    pub extra_time_min: f64,
}

/// 선삭 원가 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurningJobOutput {
    pub material_cost: f64,
    pub machining_cost: f64,
    pub total_cost: f64,
    /// 선삭 시간 [min]. 절삭이 성립하지 않으면 +∞
    pub machining_time_min: f64,
    /// 선삭 + 추가 시간 [min]
    pub total_time_min: f64,
    /// 완성 지름 기준 주축 회전수 [rpm]
    pub spindle_speed_rpm: f64,
    /// 소재 중량 [kg]
    pub weight_kg: f64,
}

impl TurningJobOutput {
    /// 가공 시간이 유한하지 않은(절삭 불가) 결과인지 여부.
    pub fn is_unbounded(&self) -> bool {
        !self.machining_time_min.is_finite()
    }
}

/// 호출 전 단계의 입력 검증. 위반한 첫 필드를 돌려준다.
pub fn validate_turning_job(input: &TurningJobInput) -> Result<(), ValidationError> {
    ValidationError::require_positive("raw_length_mm", input.raw_length_mm)?;
    ValidationError::require_positive("raw_diameter_mm", input.raw_diameter_mm)?;
    ValidationError::require_positive("final_diameter_mm", input.final_diameter_mm)?;
    ValidationError::require_positive("density_g_per_cm3", input.density_g_per_cm3)?;
    ValidationError::require_positive("cost_per_kg", input.cost_per_kg)?;
    // 이송/절삭속도 0은 +∞ 가공시간 경로로 넘긴다.
    ValidationError::require_non_negative("feed_rate_mm_per_rev", input.feed_rate_mm_per_rev)?;
    ValidationError::require_non_negative(
        "cutting_speed_m_per_min",
        input.cutting_speed_m_per_min,
    )?;
    ValidationError::require_positive("machine_hour_rate", input.machine_hour_rate)?;
    ValidationError::require_non_negative("extra_time_min", input.extra_time_min)?;
    if input.final_diameter_mm >= input.raw_diameter_mm {
        return Err(ValidationError {
            field: "final_diameter_mm",
            constraint: Constraint::LessThan("raw_diameter_mm"),
            value: input.final_diameter_mm,
        });
    }
    Ok(())
}

/// 기본 정책(`DegenerateCutPolicy::Infinity`)으로 선삭 원가를 계산한다.
pub fn compute_turning_job(input: TurningJobInput) -> Result<TurningJobOutput, DomainError> {
    compute_turning_job_with(input, DegenerateCutPolicy::Infinity)
}

/// 선삭 원가를 계산한다. 입력 검증은 하지 않는다.
///
/// 완성 지름 0은 정책과 무관하게 `DomainError::ZeroFinalDiameter` 이다.
pub fn compute_turning_job_with(
    input: TurningJobInput,
    policy: DegenerateCutPolicy,
) -> Result<TurningJobOutput, DomainError> {
    // 재료비: mm³ -> cm³ -> g -> kg 순서로 나눈다(두 단계 /1000 유지).
    let volume_mm3 = PI * (input.raw_diameter_mm / 2.0).powi(2) * input.raw_length_mm;
    let volume_cm3 = volume_mm3 / 1000.0;
    let weight_kg = (volume_cm3 * input.density_g_per_cm3) / 1000.0;
    let material_cost = weight_kg * input.cost_per_kg;

    // 주축 회전수 N = 1000·Vc / (π·D)
    if input.final_diameter_mm == 0.0 {
        return Err(DomainError::ZeroFinalDiameter);
    }
    let spindle_speed_rpm =
        (1000.0 * input.cutting_speed_m_per_min) / (PI * input.final_diameter_mm);

    // 가공 시간 Tm = L / (f·N)
    let machining_time_min = if spindle_speed_rpm > 0.0 && input.feed_rate_mm_per_rev > 0.0 {
        input.raw_length_mm / (input.feed_rate_mm_per_rev * spindle_speed_rpm)
    } else {
        match policy {
            DegenerateCutPolicy::Infinity => {
                warn!(
                    spindle_speed_rpm,
                    feed_rate = input.feed_rate_mm_per_rev,
                    "절삭 불가 조건: 가공 시간을 무한대로 둔다"
                );
                f64::INFINITY
            }
            DegenerateCutPolicy::Reject => return Err(DomainError::DegenerateCut),
        }
    };

    let total_time_min = machining_time_min + input.extra_time_min;
    // 무한대 시간이면 시간당 비용과 무관하게 +∞
    let machining_cost = if total_time_min.is_infinite() {
        f64::INFINITY
    } else {
        (total_time_min / 60.0) * input.machine_hour_rate
    };
    let total_cost = material_cost + machining_cost;

    debug!(
        material_cost,
        machining_cost, total_cost, total_time_min, "선삭 원가 계산 완료"
    );

    Ok(TurningJobOutput {
        material_cost,
        machining_cost,
        total_cost,
        machining_time_min,
        total_time_min,
        spindle_speed_rpm,
        weight_kg,
    })
}

/// 검증 후 계산한다. 단건 입력 화면에서 사용한다.
pub fn evaluate_turning_job(
    input: TurningJobInput,
    policy: DegenerateCutPolicy,
) -> Result<TurningJobOutput, MachiningError> {
    validate_turning_job(&input)?;
    Ok(compute_turning_job_with(input, policy)?)
}
