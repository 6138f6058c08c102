//! HTTP API 서버
//!
//! tokio 위에서 hyper HTTP/1 연결을 받아 연결마다 태스크를 띄운다.
//! 실제 처리는 `router::dispatch`가 맡는다.

pub mod response;
pub mod router;

use crate::shared::errors::{AppError, AppResult};
use crate::AppState;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use response::ApiResponse;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// 요청 본문 최대 크기 (바이트)
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// 서버를 시작하고 Ctrl-C를 받을 때까지 요청을 처리한다
///
/// # 인자
/// * `state` - 애플리케이션 상태
/// * `addr` - 수신 주소 ("host:port")
pub async fn serve(state: Arc<AppState>, addr: &str) -> AppResult<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("HTTP 서버를 시작했습니다: http://{}", listener.local_addr()?);

    tokio::select! {
        result = serve_listener(listener, state) => result,
        _ = tokio::signal::ctrl_c() => {
            log::info!("종료 신호를 받아 서버를 멈춥니다");
            Ok(())
        }
    }
}

/// 이미 열린 리스너로 연결을 받는다
///
/// 수락 에러는 기록하고 잠시 기다린 뒤 계속 받는다.
pub async fn serve_listener(listener: TcpListener, state: Arc<AppState>) -> AppResult<()> {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                log::debug!("연결을 받았습니다: {peer}");
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    handle_connection(stream, state).await;
                });
            }
            Err(e) => {
                let delay = accept_error_backoff(&e);
                log::error!("연결 수락 에러: {e} ({}ms 후 다시 시도)", delay.as_millis());
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// 연결 수락 실패 후 다시 시도하기까지 기다릴 시간
///
/// 파일 디스크립터가 모자란 경우 (EMFILE / ENFILE) 에는 더 오래 기다린다.
fn accept_error_backoff(error: &std::io::Error) -> Duration {
    const ENFILE: i32 = 23;
    const EMFILE: i32 = 24;

    match error.raw_os_error() {
        Some(ENFILE | EMFILE) => Duration::from_secs(1),
        _ => Duration::from_millis(100),
    }
}

/// TCP 연결 하나를 처리한다
async fn handle_connection(stream: TcpStream, state: Arc<AppState>) {
    let io = TokioIo::new(stream);
    let service = service_fn(move |req| handle_request(req, Arc::clone(&state)));

    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
        log::warn!("HTTP 연결 처리 에러: {err}");
    }
}

/// HTTP 요청을 처리한다
///
/// 본문을 모두 읽은 뒤 데이터베이스 작업은 블로킹 스레드에서 실행한다.
async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let body = match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            log::warn!("요청 본문 읽기 실패: {} {} ({e})", parts.method, parts.uri.path());
            let error = AppError::validation("요청 본문을 읽을 수 없습니다.");
            return Ok(ApiResponse::error(&error).into_hyper());
        }
    };

    let method = parts.method;
    let path = parts.uri.path().to_string();
    let query = parts.uri.query().map(str::to_string);

    let response = tokio::task::spawn_blocking(move || {
        router::dispatch(&state, &method, &path, query.as_deref(), &body)
    })
    .await
    .unwrap_or_else(|e| {
        log::error!("요청 처리 태스크가 실패했습니다: {e}");
        ApiResponse::error(&AppError::concurrency(e.to_string()))
    });

    Ok(response.into_hyper())
}
