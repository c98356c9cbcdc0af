//! tracing 기반 로그 초기화.
//!
//! RUST_LOG 환경변수가 있으면 그 필터를 그대로 쓰고, 없으면 `-v` 횟수로 수준을 정한다.
//! 로그는 표준 오류로 내보내 CLI 결과 출력과 섞이지 않게 한다.

use tracing_subscriber::{fmt, EnvFilter};

/// 로그 시스템을 초기화한다. 0=warn, 1=info, 2 이상=debug.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 테스트용 초기화. 여러 번 호출해도 된다.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
