/// 환경 설정
pub mod environment;

/// 시작 시 초기화
pub mod initialization;

pub use environment::{
    get_database_filename, get_environment, initialize_logging_system,
    load_environment_variables, Environment, EnvironmentConfig,
};
pub use initialization::{
    initialize_application, log_initialization_complete, resolve_database_path,
    InitializationResult,
};
