use std::path::PathBuf;

/// 기본 수신 주소
const DEFAULT_HOST: &str = "0.0.0.0";

/// 기본 포트
const DEFAULT_PORT: u16 = 3001;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// 개발 환경
    Development,
    /// 운영 환경
    Production,
}

/// 환경 설정
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// 실행 환경 ("development" / "production")
    pub environment: String,
    /// 디버그 모드 여부
    pub debug_mode: bool,
    /// 로그 레벨
    pub log_level: String,
    /// HTTP 서버 수신 주소
    pub host: String,
    /// HTTP 서버 포트
    pub port: u16,
    /// 데이터베이스 파일 경로 (DB_PATH, 지정하지 않으면 데이터 디렉터리 사용)
    pub database_path: Option<PathBuf>,
}

impl EnvironmentConfig {
    /// 환경 변수에서 설정을 읽는다
    ///
    /// # 반환값
    /// 환경 설정 (잘못된 값은 기본값으로 대체하고 경고를 남긴다)
    pub fn from_env() -> Self {
        let environment = get_environment();
        let debug_mode = environment == Environment::Development;
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if debug_mode {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

        let host = std::env::var("HOST")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match std::env::var("PORT") {
            Ok(value) => value.trim().parse::<u16>().unwrap_or_else(|_| {
                log::warn!("PORT 값이 올바르지 않아 기본값을 사용합니다: {value} -> {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let database_path = std::env::var("DB_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Self {
            environment: format!("{environment:?}").to_lowercase(),
            debug_mode,
            log_level,
            host,
            port,
            database_path,
        }
    }

    /// 서버 수신 주소 ("host:port")
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 현재 실행 환경을 판정한다
///
/// # 판정 순서
/// 1. 실행 시 환경 변수 ENVIRONMENT
/// 2. 디버그 빌드면 Development, 릴리스 빌드면 Production
pub fn get_environment() -> Environment {
    if let Ok(env_var) = std::env::var("ENVIRONMENT") {
        let env = parse_environment(&env_var);
        log::debug!("환경 판정: 실행 시 환경 변수 사용 -> {env_var} -> {env:?}");
        return env;
    }

    let env = if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    };
    log::debug!(
        "환경 판정: 빌드 설정 사용 -> debug_assertions={} -> {env:?}",
        cfg!(debug_assertions)
    );
    env
}

fn parse_environment(value: &str) -> Environment {
    match value {
        "production" => Environment::Production,
        _ => Environment::Development,
    }
}

/// 환경별 데이터베이스 파일 이름
///
/// - 개발 환경: "dev_daycare.db"
/// - 운영 환경: "daycare.db"
pub fn get_database_filename(env: Environment) -> &'static str {
    match env {
        Environment::Development => "dev_daycare.db",
        Environment::Production => "daycare.db",
    }
}

/// 환경에 맞는 .env 파일을 읽는다
///
/// ENVIRONMENT=production 이면 .env.production, 그 외에는 .env를 읽는다.
/// 환경 전용 파일이 없으면 기본 .env로 대체한다.
pub fn load_environment_variables() {
    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    let env_file = match environment.as_str() {
        "production" => ".env.production",
        _ => ".env",
    };

    match dotenv::from_filename(env_file) {
        Ok(_) => {
            log::info!("{env_file} 파일을 읽었습니다");
        }
        Err(_) => {
            if env_file != ".env" && dotenv::dotenv().is_ok() {
                log::warn!("{env_file} 파일이 없어 기본 .env 파일을 읽었습니다");
            } else {
                log::warn!(
                    "환경 변수 파일이 없습니다. 직접 설정된 환경 변수를 사용합니다."
                );
            }
        }
    }
}

/// 로그 시스템을 초기화한다
///
/// # 처리 내용
/// 1. 환경 설정 조회
/// 2. 로그 레벨 결정
/// 3. env_logger 초기화 (이미 초기화된 경우 무시)
pub fn initialize_logging_system() {
    let env_config = EnvironmentConfig::from_env();

    let log_level = match env_config.log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    let initialized = env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .try_init();

    if initialized.is_ok() {
        log::info!(
            "로그 시스템을 초기화했습니다: level={}, environment={}",
            env_config.log_level,
            env_config.environment
        );
    }
}
