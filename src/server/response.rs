use crate::features::export::ExportFile;
use crate::shared::errors::{AppError, ErrorSeverity};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{header, Response, StatusCode};
use serde::Serialize;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// 라우터가 돌려주는 응답
///
/// hyper 타입과 분리해 두어 소켓 없이 라우터를 테스트할 수 있다.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    /// 추가 헤더 (Content-Disposition 등)
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// JSON 응답을 만든다
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                content_type: JSON_CONTENT_TYPE,
                headers: Vec::new(),
                body,
            },
            Err(e) => {
                log::error!("응답 직렬화에 실패했습니다: {e}");
                let mut response = Self::error(&AppError::Json(e));
                response.status = 500;
                response
            }
        }
    }

    /// 200 JSON 응답
    pub fn ok<T: Serialize>(value: &T) -> Self {
        Self::json(200, value)
    }

    /// 에러 응답 (`{"error": "<메시지>"}`)
    pub fn error(error: &AppError) -> Self {
        let status = error.status_code();
        let body = serde_json::json!({ "error": error.user_message() });

        Self {
            status,
            content_type: JSON_CONTENT_TYPE,
            headers: Vec::new(),
            body: body.to_string().into_bytes(),
        }
    }

    /// 없는 경로
    pub fn route_not_found() -> Self {
        Self::error(&AppError::NotFound(
            "요청한 경로를 찾을 수 없습니다.".to_string(),
        ))
    }

    /// CORS 사전 요청 응답
    pub fn preflight() -> Self {
        Self {
            status: 204,
            content_type: "text/plain; charset=utf-8",
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// 다운로드 파일 응답
    pub fn file(file: ExportFile) -> Self {
        let disposition = format!(
            "attachment; filename*=UTF-8''{}",
            urlencoding::encode(&file.file_name)
        );

        Self {
            status: 200,
            content_type: file.content_type,
            headers: vec![("content-disposition", disposition)],
            body: file.bytes,
        }
    }

    /// 응답 본문을 JSON 값으로 읽는다
    pub fn json_body(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// hyper 응답으로 변환한다
    pub fn into_hyper(self) -> Response<Full<Bytes>> {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut builder = Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, self.content_type)
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
            .header(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                "GET, POST, PUT, DELETE, OPTIONS",
            )
            .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type");
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }

        builder
            .body(Full::new(Bytes::from(self.body)))
            .unwrap_or_else(|e| {
                log::error!("응답 생성에 실패했습니다: {e}");
                fallback_response()
            })
    }
}

/// 응답 생성 자체가 실패했을 때 돌려주는 500 응답
fn fallback_response() -> Response<Full<Bytes>> {
    let body = r#"{"error":"응답 생성 중 오류가 발생했습니다."}"#;
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, header::HeaderValue::from_static(JSON_CONTENT_TYPE));
    response
}

/// 에러를 중요도에 맞는 레벨로 기록한다
pub fn log_error(method: &str, path: &str, error: &AppError) {
    match error.severity() {
        ErrorSeverity::Low => log::debug!("{method} {path} -> {}", error.details()),
        ErrorSeverity::Medium => log::warn!("{method} {path} -> {}", error.details()),
        ErrorSeverity::High => log::error!("{method} {path} -> {}", error.details()),
    }
}
