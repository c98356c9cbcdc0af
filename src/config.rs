use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::machining::{
    BatchParams, DegenerateCutPolicy, RollingMaterial, ThreadJobInput, TurningJobInput,
};

/// 설정 파일 기본 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 선삭 계산 기본값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurningDefaults {
    pub raw_length_mm: f64,
    pub raw_diameter_mm: f64,
    pub final_diameter_mm: f64,
    /// 밀도 [g/cm³]
    pub density_g_per_cm3: f64,
    pub cost_per_kg: f64,
    /// 이송 [mm/rev]
    pub feed_rate_mm_per_rev: f64,
    /// 절삭속도 [m/min]
    pub cutting_speed_m_per_min: f64,
    /// 기계 시간당 비용
    pub machine_hour_rate: f64,
}

impl Default for TurningDefaults {
    fn default() -> Self {
        Self {
            raw_length_mm: 250.0,
            raw_diameter_mm: 38.0,
            final_diameter_mm: 36.0,
            density_g_per_cm3: 7.85,
            cost_per_kg: 55.0,
            feed_rate_mm_per_rev: 0.20,
            cutting_speed_m_per_min: 20.0,
            machine_hour_rate: 800.0,
        }
    }
}

impl TurningDefaults {
    /// 기본값으로 단건 입력을 만든다.
    pub fn to_input(&self, extra_time_min: f64) -> TurningJobInput {
        TurningJobInput {
            raw_length_mm: self.raw_length_mm,
            raw_diameter_mm: self.raw_diameter_mm,
            final_diameter_mm: self.final_diameter_mm,
            density_g_per_cm3: self.density_g_per_cm3,
            cost_per_kg: self.cost_per_kg,
            feed_rate_mm_per_rev: self.feed_rate_mm_per_rev,
            cutting_speed_m_per_min: self.cutting_speed_m_per_min,
            machine_hour_rate: self.machine_hour_rate,
            extra_time_min,
        }
    }
}

/// 나사 전조 계산 기본값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadRollingDefaults {
    pub material: RollingMaterial,
    pub major_diameter_mm: f64,
    pub pitch_mm: f64,
    pub length_mm: f64,
    /// None이면 소재 권장 범위 하한을 쓴다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rolling_speed_m_per_min: Option<f64>,
    pub density_g_per_cm3: f64,
    pub cost_per_kg: f64,
    pub material_volume_cm3: f64,
    pub machine_hourly_rate: f64,
    pub operator_hourly_rate: f64,
    pub tool_cost: f64,
    pub tool_life_parts: u32,
}

impl Default for ThreadRollingDefaults {
    fn default() -> Self {
        Self {
            material: RollingMaterial::default(),
            major_diameter_mm: 10.0,
            pitch_mm: 1.5,
            length_mm: 20.0,
            rolling_speed_m_per_min: None,
            density_g_per_cm3: 7.85,
            cost_per_kg: 1.0,
            material_volume_cm3: 100.0,
            machine_hourly_rate: 20.0,
            operator_hourly_rate: 15.0,
            tool_cost: 100.0,
            tool_life_parts: 1000,
        }
    }
}

impl ThreadRollingDefaults {
    pub fn rolling_speed(&self) -> f64 {
        self.rolling_speed_m_per_min
            .unwrap_or_else(|| self.material.speed_range().0)
    }

    pub fn to_input(&self) -> ThreadJobInput {
        ThreadJobInput {
            major_diameter_mm: self.major_diameter_mm,
            pitch_mm: self.pitch_mm,
            length_mm: self.length_mm,
            rolling_speed_m_per_min: self.rolling_speed(),
            density_g_per_cm3: self.density_g_per_cm3,
            cost_per_kg: self.cost_per_kg,
            material_volume_cm3: self.material_volume_cm3,
            machine_hourly_rate: self.machine_hourly_rate,
            operator_hourly_rate: self.operator_hourly_rate,
            tool_cost: self.tool_cost,
            tool_life_parts: self.tool_life_parts,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드(auto/ko/en)
    pub language: String,
    /// 결과 표시용 통화 표기
    pub currency: String,
    /// 선삭 절삭 불가 조건 처리 방식
    pub degenerate_cut: DegenerateCutPolicy,
    /// 배치 계산 병렬 처리 여부
    pub parallel_batch: bool,
    pub turning: TurningDefaults,
    pub thread_rolling: ThreadRollingDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            currency: "Rs".to_string(),
            degenerate_cut: DegenerateCutPolicy::default(),
            parallel_batch: false,
            turning: TurningDefaults::default(),
            thread_rolling: ThreadRollingDefaults::default(),
        }
    }
}

impl Config {
    /// 설정 파일에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 배치 계산에 쓰는 공통 파라미터.
    pub fn batch_params(&self) -> BatchParams {
        BatchParams {
            density_g_per_cm3: self.turning.density_g_per_cm3,
            cost_per_kg: self.turning.cost_per_kg,
            feed_rate_mm_per_rev: self.turning.feed_rate_mm_per_rev,
            cutting_speed_m_per_min: self.turning.cutting_speed_m_per_min,
            machine_hour_rate: self.turning.machine_hour_rate,
            policy: self.degenerate_cut,
            parallel: self.parallel_batch,
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "설정 로드");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        tracing::info!(path = %path.display(), "기본 설정 파일 생성");
        Ok(cfg)
    }
}
