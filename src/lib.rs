pub mod features;
pub mod server;
pub mod shared;

#[cfg(test)]
mod test_support;

use features::billing::FeeSchedule;
use log::{error, info};
use rusqlite::Connection;
use shared::errors::{AppError, AppResult};
use shared::utils::{Clock, SystemClock};
use std::sync::{Arc, Mutex, MutexGuard};

/// 애플리케이션 상태
pub struct AppState {
    /// 데이터베이스 연결
    pub db: Mutex<Connection>,
    /// 요금표
    pub fees: FeeSchedule,
    /// 현재 시각 공급자
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(db: Connection, fees: FeeSchedule, clock: Arc<dyn Clock>) -> Self {
        Self {
            db: Mutex::new(db),
            fees,
            clock,
        }
    }

    /// 데이터베이스 연결 잠금을 얻는다
    pub fn connection(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|e| AppError::concurrency(format!("데이터베이스 잠금 획득 실패: {e}")))
    }
}

/// 서버를 초기화하고 실행한다
///
/// # 처리 내용
/// 1. 환경 변수 로드 / 로그 초기화
/// 2. 데이터 디렉터리와 데이터베이스 준비
/// 3. 요금표 로드
/// 4. HTTP 서버 실행 (Ctrl-C까지)
pub fn run() -> AppResult<()> {
    shared::load_environment_variables();
    shared::initialize_logging_system();

    info!("애플리케이션 초기화를 시작합니다...");

    let config = shared::EnvironmentConfig::from_env();
    let init_result = shared::initialize_application(&config)?;

    let db_conn = shared::initialize_database(&init_result.database_path).map_err(|e| {
        error!("데이터베이스 초기화에 실패했습니다: {e}");
        e
    })?;
    shared::log_initialization_complete(&init_result);

    let fees = FeeSchedule::from_env().map_err(|e| {
        error!("요금 설정을 읽을 수 없습니다: {e}");
        e
    })?;
    info!(
        "요금표: 데이케어 구간 {}개, 호텔링 1일 {}원 / 30분 {}원",
        fees.daycare_bands.len(),
        fees.hoteling.price_per_day,
        fees.hoteling.price_per_30min
    );

    let state = Arc::new(AppState::new(db_conn, fees, Arc::new(SystemClock)));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::serve(state, &config.bind_address()))?;

    info!("서버를 종료했습니다");
    Ok(())
}
