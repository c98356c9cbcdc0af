use thiserror::Error;

/// 입력값이 만족해야 하는 제약 조건.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// 0보다 커야 한다.
    Positive,
    /// 0 이상이어야 한다.
    NonNegative,
    /// 지정한 필드 값보다 작아야 한다.
    LessThan(&'static str),
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Positive => write!(f, "0보다 커야 합니다"),
            Constraint::NonNegative => write!(f, "0 이상이어야 합니다"),
            Constraint::LessThan(other) => write!(f, "{other} 보다 작아야 합니다"),
        }
    }
}

/// 계산 전에 걸러야 하는 입력 오류. 어떤 필드가 어떤 제약을 어겼는지 담는다.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("입력 오류: {field} = {value} 은(는) {constraint}")]
pub struct ValidationError {
    pub field: &'static str,
    pub constraint: Constraint,
    pub value: f64,
}

impl ValidationError {
    /// NaN도 위반으로 취급한다.
    pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), Self> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(Self {
                field,
                constraint: Constraint::Positive,
                value,
            })
        }
    }

    pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<(), Self> {
        if value >= 0.0 {
            Ok(())
        } else {
            Err(Self {
                field,
                constraint: Constraint::NonNegative,
                value,
            })
        }
    }
}

/// 0으로 나누기 등 수식 자체가 성립하지 않는 경우.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 주축 회전수 계산의 분모(π × 완성 지름)가 0
    #[error("0으로 나누기: 완성 지름(final_diameter_mm)이 0입니다")]
    ZeroFinalDiameter,
    /// 전조 회전수 계산의 분모(π × 나사 외경)가 0
    #[error("0으로 나누기: 나사 외경(major_diameter_mm)이 0입니다")]
    ZeroMajorDiameter,
    /// 전조 이송속도 F = N × P 가 0
    #[error("0으로 나누기: 전조 이송속도가 0입니다 (전조 속도와 피치를 확인하세요)")]
    ZeroRollingFeed,
    /// 공구 수명(부품 수)이 0
    #[error("0으로 나누기: 공구 수명(tool_life_parts)이 0입니다")]
    ZeroToolLife,
    /// 주축 회전수 또는 이송량이 0 이하라 절삭이 성립하지 않음 (Reject 정책에서만 발생)
    #[error("절삭 불가: 주축 회전수 또는 이송량이 0 이하입니다")]
    DegenerateCut,
}

/// 단건 계산(검증 + 계산) 오류.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MachiningError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// 배치 한 행이 실패한 사유.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchRowFailure {
    /// 필수 열이 없거나 비어 있음
    #[error("필수 열 누락: {0}")]
    MissingField(&'static str),
    /// 대소문자/공백만 다른 같은 이름의 열이 여럿
    #[error("열 이름 중복: {0}")]
    DuplicateColumn(&'static str),
    /// 숫자로 해석할 수 없는 값
    #[error("{field} 열의 값 '{value}' 은(는) 숫자가 아닙니다")]
    NotNumeric { field: &'static str, value: String },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<MachiningError> for BatchRowFailure {
    fn from(value: MachiningError) -> Self {
        match value {
            MachiningError::Validation(e) => BatchRowFailure::Invalid(e),
            MachiningError::Domain(e) => BatchRowFailure::Domain(e),
        }
    }
}

/// 배치에서 특정 행(0부터 시작하는 인덱스)의 실패. 나머지 행 계산은 계속된다.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{index}번 행: {reason}")]
pub struct BatchRowError {
    pub index: usize,
    pub reason: BatchRowFailure,
}
