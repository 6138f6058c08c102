use thiserror::Error;

/// 애플리케이션 전체에서 사용하는 통합 에러 타입
#[derive(Debug, Error)]
pub enum AppError {
    /// 데이터베이스 관련 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 입력값 검증 에러
    #[error("검증 에러: {0}")]
    Validation(String),

    /// 리소스를 찾을 수 없는 경우의 에러
    #[error("리소스를 찾을 수 없습니다: {0}")]
    NotFound(String),

    /// 현재 상태와 충돌하는 요청 (이미 체크아웃된 방문 등)
    #[error("상태 충돌: {0}")]
    Conflict(String),

    /// 설정 관련 에러
    #[error("설정 에러: {0}")]
    Configuration(String),

    /// I/O 관련 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 해석 에러
    #[error("JSON 해석 에러: {0}")]
    Json(#[from] serde_json::Error),

    /// 동시성 관련 에러
    #[error("동시성 에러: {0}")]
    Concurrency(String),

    /// 내보내기 파일 생성 에러
    #[error("내보내기 에러: {0}")]
    Export(String),
}

/// 에러의 중요도
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// 낮음 (사용자 입력 에러 등)
    Low,
    /// 중간 (일시적인 처리 실패 등)
    Medium,
    /// 높음 (데이터베이스 에러 등)
    High,
}

impl AppError {
    /// 사용자에게 표시할 메시지를 반환한다
    ///
    /// # 반환값
    /// 사용자에게 보여줄 수 있는 에러 메시지
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Database(_) => "데이터베이스 처리 중 오류가 발생했습니다.",
            AppError::Validation(msg) => msg,
            AppError::NotFound(msg) => msg,
            AppError::Conflict(msg) => msg,
            AppError::Configuration(_) => "설정 오류가 발생했습니다.",
            AppError::Io(_) => "파일 처리 중 오류가 발생했습니다.",
            AppError::Json(_) => "요청 데이터 형식이 올바르지 않습니다.",
            AppError::Concurrency(_) => "요청을 처리하는 중 오류가 발생했습니다.",
            AppError::Export(_) => "내보내기 파일 생성 중 오류가 발생했습니다.",
        }
    }

    /// 로그 출력용 상세 정보를 반환한다
    pub fn details(&self) -> String {
        format!("{self}")
    }

    /// 에러의 중요도를 반환한다
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Validation(_) | AppError::NotFound(_) | AppError::Conflict(_) => {
                ErrorSeverity::Low
            }
            AppError::Io(_) | AppError::Json(_) | AppError::Export(_) => ErrorSeverity::Medium,
            AppError::Database(_) | AppError::Configuration(_) | AppError::Concurrency(_) => {
                ErrorSeverity::High
            }
        }
    }

    /// HTTP 응답 상태 코드로 변환한다
    ///
    /// # 반환값
    /// 검증 400, 미존재 404, 상태 충돌 409, 그 외 500
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) | AppError::Json(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            _ => 500,
        }
    }

    /// 검증 에러를 생성한다
    pub fn validation<S: Into<String>>(message: S) -> Self {
        AppError::Validation(message.into())
    }

    /// 미존재 에러를 생성한다
    ///
    /// # 인자
    /// * `resource` - 찾지 못한 리소스 이름 (예: "고객")
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        AppError::NotFound(format!("{}을(를) 찾을 수 없습니다.", resource.into()))
    }

    /// 상태 충돌 에러를 생성한다
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        AppError::Conflict(message.into())
    }

    /// 설정 에러를 생성한다
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// 동시성 에러를 생성한다
    pub fn concurrency<S: Into<String>>(message: S) -> Self {
        AppError::Concurrency(message.into())
    }

    /// 내보내기 에러를 생성한다
    pub fn export<S: Into<String>>(message: S) -> Self {
        AppError::Export(message.into())
    }
}

/// rusqlite::Error에서 AppError로 변환
impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        AppError::Database(error.to_string())
    }
}

/// 애플리케이션 전체에서 사용하는 Result 별칭
pub type AppResult<T> = Result<T, AppError>;
