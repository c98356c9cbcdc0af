//! 선삭·나사 전조 가공 시간/원가 계산 로직을 라이브러리로 분리하여 CLI 외의 호출자도 같은 계산을 쓰게 한다.

pub mod app;
pub mod config;
pub mod i18n;
pub mod logging;
pub mod machining;
pub mod table_io;
pub mod ui_cli;
