//! 선삭·나사 전조 가공 원가/시간 계산 모듈 모음.
//! 두 계산기는 서로 호출하지 않는 순수 함수이며, 배치 계산은 선삭 계산을 행마다 적용한다.

pub mod batch;
pub mod error;
pub mod thread_rolling;
pub mod turning;

pub use batch::*;
pub use error::*;
pub use thread_rolling::*;
pub use turning::*;
