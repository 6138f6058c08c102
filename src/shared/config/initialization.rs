use crate::shared::config::environment::{
    get_database_filename, get_environment, Environment, EnvironmentConfig,
};
use crate::shared::errors::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// 데이터 디렉터리 아래에 만드는 애플리케이션 폴더 이름
const APP_DIR_NAME: &str = "daycare-manager";

/// 애플리케이션 초기화 결과
#[derive(Debug)]
pub struct InitializationResult {
    /// 최초 실행 여부
    pub is_first_run: bool,
    /// 데이터베이스 파일이 있는 디렉터리
    pub data_dir: PathBuf,
    /// 데이터베이스 파일 경로
    pub database_path: PathBuf,
    /// 실행 환경
    pub environment: Environment,
}

/// 애플리케이션 초기화를 수행한다
///
/// # 인자
/// * `config` - 환경 설정
///
/// # 반환값
/// 초기화 결과, 실패 시 설정 에러
///
/// # 처리 내용
/// 1. 데이터베이스 파일 경로 결정 (DB_PATH 우선)
/// 2. 상위 디렉터리 생성
/// 3. 최초 실행 판정 (파일 존재 여부)
pub fn initialize_application(config: &EnvironmentConfig) -> AppResult<InitializationResult> {
    let environment = get_environment();
    let database_path = resolve_database_path(config, environment)?;

    let data_dir = database_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    ensure_directory(&data_dir)?;

    let is_first_run = !database_path.exists();
    if is_first_run {
        log_first_run_initialization(&environment, &data_dir, &database_path);
    }

    Ok(InitializationResult {
        is_first_run,
        data_dir,
        database_path,
        environment,
    })
}

/// 데이터베이스 파일 경로를 결정한다
///
/// DB_PATH가 설정되어 있으면 그대로 쓰고, 없으면
/// `<데이터 디렉터리>/daycare-manager/<환경별 파일 이름>`을 쓴다.
pub fn resolve_database_path(
    config: &EnvironmentConfig,
    environment: Environment,
) -> AppResult<PathBuf> {
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    let base_dir = dirs::data_dir()
        .ok_or_else(|| AppError::configuration("데이터 디렉터리를 찾을 수 없습니다."))?;

    Ok(base_dir
        .join(APP_DIR_NAME)
        .join(get_database_filename(environment)))
}

fn ensure_directory(dir: &Path) -> AppResult<()> {
    if dir.as_os_str().is_empty() || dir.exists() {
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|e| {
        AppError::configuration(format!("데이터 디렉터리 생성에 실패했습니다: {e}"))
    })?;
    log::info!("데이터 디렉터리를 만들었습니다: {dir:?}");

    Ok(())
}

fn log_first_run_initialization(environment: &Environment, data_dir: &Path, database_path: &Path) {
    log::info!("=== 최초 실행 ===");
    log::info!("실행 환경: {environment:?}");
    log::info!("데이터 디렉터리: {data_dir:?}");
    log::info!("데이터베이스 파일: {database_path:?}");
}

/// 초기화 완료 로그를 남긴다
pub fn log_initialization_complete(result: &InitializationResult) {
    if result.is_first_run {
        log::info!("최초 실행 초기화를 완료했습니다");
    } else {
        log::info!("기존 데이터베이스로 시작합니다");
    }
    log::info!(
        "환경: {:?}, 데이터베이스: {:?}",
        result.environment,
        result.database_path
    );
}
