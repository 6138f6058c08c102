/// 공통 에러 타입과 에러 처리
pub mod errors;

/// 데이터베이스 연결 관리
pub mod database;

/// 설정 관리
pub mod config;

/// 공통 유틸리티
pub mod utils;

pub use config::{
    get_database_filename, get_environment, initialize_application, initialize_logging_system,
    load_environment_variables, log_initialization_complete, Environment, EnvironmentConfig,
    InitializationResult,
};
pub use database::{create_tables, initialize_database};
pub use errors::{AppError, AppResult, ErrorSeverity};
