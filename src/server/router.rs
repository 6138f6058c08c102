use crate::features::{customers, export, reservations, trash, visits};
use crate::features::customers::CustomerDto;
use crate::features::reservations::{CreateReservationDto, ReservationQuery, UpdateReservationDto};
use crate::features::visits::{CheckInDto, CheckoutDto, HistoryFilter, UpdateCheckInTimeDto};
use crate::server::response::{log_error, ApiResponse};
use crate::shared::errors::{AppError, AppResult};
use crate::AppState;
use hyper::Method;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashMap;

/// 요청 하나를 처리한다
///
/// # 인자
/// * `state` - 애플리케이션 상태
/// * `method` - HTTP 메서드
/// * `path` - 요청 경로 (쿼리 제외)
/// * `query` - 쿼리 문자열 (`?` 제외)
/// * `body` - 요청 본문
///
/// # 반환값
/// 응답. 처리 중 에러는 `{"error": ...}` 응답으로 바뀐다.
pub fn dispatch(
    state: &AppState,
    method: &Method,
    path: &str,
    query: Option<&str>,
    body: &[u8],
) -> ApiResponse {
    log::debug!("{method} {path}");

    if *method == Method::OPTIONS {
        return ApiResponse::preflight();
    }

    let segments = match split_path(path) {
        Ok(segments) => segments,
        Err(e) => return ApiResponse::error(&e),
    };
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
    let params = parse_query(query);

    match route(state, method, &segments, &params, body) {
        Ok(Some(response)) => response,
        Ok(None) => ApiResponse::route_not_found(),
        Err(e) => {
            log_error(method.as_str(), path, &e);
            ApiResponse::error(&e)
        }
    }
}

/// 경로별 처리. 일치하는 경로가 없으면 None
fn route(
    state: &AppState,
    method: &Method,
    segments: &[&str],
    params: &HashMap<String, String>,
    body: &[u8],
) -> AppResult<Option<ApiResponse>> {
    let response = match (method, segments) {
        (&Method::GET, ["api", "health"]) => ApiResponse::ok(&json!({ "status": "ok" })),

        // 고객
        (&Method::POST, ["api", "customers"]) => {
            let customer = customers::create_customer(state, parse_body::<CustomerDto>(body)?)?;
            ApiResponse::ok(&json!({
                "success": true,
                "id": customer.id,
                "customer": customer,
                "message": "고객이 등록되었습니다.",
            }))
        }
        (&Method::GET, ["api", "customers"]) => ApiResponse::ok(&customers::get_customers(state)?),
        (&Method::GET, ["api", "customers", "export"]) => {
            ApiResponse::file(export::export_customers(state)?)
        }
        (&Method::GET, ["api", "customers", "autocomplete"]) => {
            let term = params.get("q").map(String::as_str).unwrap_or("");
            ApiResponse::ok(&customers::autocomplete_customers(state, term)?)
        }
        (&Method::GET, ["api", "customers", "search", dog_name]) => {
            ApiResponse::ok(&customers::find_customers_by_dog_name(state, dog_name)?)
        }
        (&Method::PUT, ["api", "customers", id]) => {
            let customer =
                customers::update_customer(state, parse_id(id)?, parse_body::<CustomerDto>(body)?)?;
            ApiResponse::ok(&json!({
                "success": true,
                "customer": customer,
                "message": "고객 정보가 수정되었습니다.",
            }))
        }
        (&Method::DELETE, ["api", "customers", id]) => {
            customers::delete_customer(state, parse_id(id)?)?;
            success_message("고객이 삭제되었습니다.")
        }
        (&Method::GET, ["api", "customers", id, "visits"]) => {
            ApiResponse::ok(&visits::get_customer_visits(state, parse_id(id)?)?)
        }
        (&Method::GET, ["api", "customers", id, "reservations"]) => {
            ApiResponse::ok(&reservations::get_customer_reservations(state, parse_id(id)?)?)
        }

        // 체크인 / 체크아웃
        (&Method::POST, ["api", "checkin"]) => {
            let result = visits::check_in(state, parse_body::<CheckInDto>(body)?)?;
            ApiResponse::ok(&json!({
                "success": true,
                "visit_id": result.visit.id,
                "visit": result.visit,
                "customer": result.customer,
                "message": result.message,
            }))
        }
        (&Method::POST, ["api", "checkout", "calculate"]) => {
            let fee_info = visits::calculate_fee(state, parse_body::<CheckoutDto>(body)?)?;
            ApiResponse::ok(&json!({ "success": true, "fee_info": fee_info }))
        }
        (&Method::POST, ["api", "checkout"]) => {
            let fee_info = visits::check_out(state, parse_body::<CheckoutDto>(body)?)?;
            ApiResponse::ok(&json!({
                "success": true,
                "message": "체크아웃 완료!",
                "fee_info": fee_info,
            }))
        }
        (&Method::PUT, ["api", "visits", id, "checkin-time"]) => {
            let visit = visits::update_check_in_time(
                state,
                parse_id(id)?,
                parse_body::<UpdateCheckInTimeDto>(body)?,
            )?;
            ApiResponse::ok(&json!({
                "success": true,
                "visit": visit,
                "message": "체크인 시간이 수정되었습니다.",
            }))
        }
        (&Method::DELETE, ["api", "visits", id]) => {
            visits::delete_visit(state, parse_id(id)?)?;
            success_message("방문 기록이 삭제되었습니다.")
        }
        (&Method::GET, ["api", "current-visits"]) => {
            ApiResponse::ok(&visits::get_current_visits(state)?)
        }
        (&Method::GET, ["api", "visit-history"]) => {
            let filter = history_filter(params)?;
            ApiResponse::ok(&visits::get_visit_history(state, filter)?)
        }
        (&Method::GET, ["api", "visit-dates"]) => ApiResponse::ok(&visits::get_visit_dates(state)?),

        // 호텔링 예약
        (&Method::GET, ["api", "reservations"]) => {
            let query = reservation_query(params)?;
            ApiResponse::ok(&reservations::get_reservations(state, query)?)
        }
        (&Method::POST, ["api", "reservations"]) => {
            let reservation = reservations::create_reservation(
                state,
                parse_body::<CreateReservationDto>(body)?,
            )?;
            ApiResponse::ok(&json!({
                "success": true,
                "id": reservation.reservation.id,
                "reservation": reservation,
                "message": "예약이 등록되었습니다.",
            }))
        }
        (&Method::GET, ["api", "reservations", id]) => {
            ApiResponse::ok(&reservations::get_reservation(state, parse_id(id)?)?)
        }
        (&Method::PUT, ["api", "reservations", id]) => {
            let reservation = reservations::update_reservation(
                state,
                parse_id(id)?,
                parse_body::<UpdateReservationDto>(body)?,
            )?;
            ApiResponse::ok(&json!({
                "success": true,
                "reservation": reservation,
                "message": "예약이 수정되었습니다.",
            }))
        }
        (&Method::DELETE, ["api", "reservations", id]) => {
            reservations::delete_reservation(state, parse_id(id)?)?;
            success_message("예약이 삭제되었습니다.")
        }

        // 휴지통
        (&Method::GET, ["api", "trash", "customers"]) => {
            ApiResponse::ok(&trash::get_deleted_customers(state)?)
        }
        (&Method::GET, ["api", "trash", "visits"]) => {
            ApiResponse::ok(&trash::get_deleted_visits(state)?)
        }
        (&Method::POST, ["api", "trash", "customers", id, "restore"]) => {
            trash::restore_customer(state, parse_id(id)?)?;
            success_message("고객이 복구되었습니다.")
        }
        (&Method::POST, ["api", "trash", "visits", id, "restore"]) => {
            trash::restore_visit(state, parse_id(id)?)?;
            success_message("방문 기록이 복구되었습니다.")
        }

        _ => return Ok(None),
    };

    Ok(Some(response))
}

fn success_message(message: &str) -> ApiResponse {
    ApiResponse::ok(&json!({ "success": true, "message": message }))
}

/// 경로를 나누고 각 조각을 퍼센트 디코딩한다
fn split_path(path: &str) -> AppResult<Vec<String>> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|decoded| decoded.into_owned())
                .map_err(|_| AppError::validation("요청 경로를 해석할 수 없습니다."))
        })
        .collect()
}

/// 쿼리 문자열을 키-값으로 해석한다
fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return HashMap::new();
    };

    match url::Url::parse(&format!("http://localhost/?{query}")) {
        Ok(url) => url.query_pairs().into_owned().collect(),
        Err(e) => {
            log::warn!("쿼리 문자열 해석 실패: {e}");
            HashMap::new()
        }
    }
}

fn parse_id(value: &str) -> AppResult<i64> {
    value
        .parse::<i64>()
        .map_err(|_| AppError::validation(format!("잘못된 ID입니다: {value}")))
}

/// 요청 본문을 JSON으로 해석한다
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::validation("요청 본문이 비어 있습니다."));
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::validation(format!("요청 데이터 형식이 올바르지 않습니다: {e}")))
}

fn non_empty<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// 방문 기록 조회 조건 (`date`, `startDate` + `endDate`)
fn history_filter(params: &HashMap<String, String>) -> AppResult<HistoryFilter> {
    if let Some(date) = non_empty(params, "date") {
        return Ok(HistoryFilter::Date(date.to_string()));
    }

    match (non_empty(params, "startDate"), non_empty(params, "endDate")) {
        (Some(start), Some(end)) => Ok(HistoryFilter::Range {
            start: start.to_string(),
            end: end.to_string(),
        }),
        (None, None) => Ok(HistoryFilter::All),
        _ => Err(AppError::validation(
            "시작일과 종료일을 모두 입력해주세요.",
        )),
    }
}

/// 예약 조회 조건 (`date`, `start_date` + `end_date`)
fn reservation_query(params: &HashMap<String, String>) -> AppResult<ReservationQuery> {
    if let Some(date) = non_empty(params, "date") {
        return Ok(ReservationQuery::Date(date.to_string()));
    }

    match (non_empty(params, "start_date"), non_empty(params, "end_date")) {
        (Some(start), Some(end)) => Ok(ReservationQuery::Range {
            start: start.to_string(),
            end: end.to_string(),
        }),
        (None, None) => Ok(ReservationQuery::All),
        _ => Err(AppError::validation(
            "시작일과 종료일을 모두 입력해주세요.",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_customer, test_state};
    use serde_json::Value;

    fn call(state: &AppState, method: Method, target: &str, body: Value) -> (u16, Value) {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };
        let body = if body.is_null() {
            Vec::new()
        } else {
            body.to_string().into_bytes()
        };

        let response = dispatch(state, &method, path, query, &body);
        let json = response.json_body().unwrap_or(Value::Null);
        (response.status, json)
    }

    #[test]
    fn test_health_and_unknown_route() {
        let state = test_state("2024-03-09 10:00:00");

        let (status, body) = call(&state, Method::GET, "/api/health", Value::Null);
        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");

        let (status, body) = call(&state, Method::GET, "/api/unknown", Value::Null);
        assert_eq!(status, 404);
        assert!(body["error"].is_string());

        let response = dispatch(&state, &Method::OPTIONS, "/api/customers", None, &[]);
        assert_eq!(response.status, 204);
    }

    #[test]
    fn test_customer_routes() {
        let state = test_state("2024-03-09 10:00:00");

        let (status, body) = call(
            &state,
            Method::POST,
            "/api/customers",
            json!({
                "customer_name": "김보호",
                "phone": "010-1234-5678",
                "dog_name": "초코",
                "breed": "푸들",
                "birth_date": "2021-01-15",
                "weight": 7.0
            }),
        );
        assert_eq!(status, 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "고객이 등록되었습니다.");
        let id = body["id"].as_i64().unwrap();
        assert_eq!(body["customer"]["age_years"], 3);

        // 한글 이름은 퍼센트 인코딩되어 들어온다
        let encoded = format!("/api/customers/search/{}", urlencoding::encode("초코"));
        let (status, body) = call(&state, Method::GET, &encoded, Value::Null);
        assert_eq!(status, 200);
        assert_eq!(body[0]["id"], id);

        let (status, body) = call(&state, Method::GET, "/api/customers/autocomplete?q=%EC%B4%88", Value::Null);
        assert_eq!(status, 200);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = call(
            &state,
            Method::GET,
            &format!("/api/customers/search/{}", urlencoding::encode("없음")),
            Value::Null,
        );
        assert_eq!(status, 404);
        assert_eq!(body["error"], "등록되지 않은 반려견입니다.");

        let (status, _) = call(&state, Method::DELETE, &format!("/api/customers/{id}"), Value::Null);
        assert_eq!(status, 200);

        let (_, body) = call(&state, Method::GET, "/api/trash/customers", Value::Null);
        assert_eq!(body[0]["id"], id);

        let (status, body) = call(
            &state,
            Method::POST,
            &format!("/api/trash/customers/{id}/restore"),
            Value::Null,
        );
        assert_eq!(status, 200);
        assert_eq!(body["message"], "고객이 복구되었습니다.");
    }

    #[test]
    fn test_checkin_checkout_routes() {
        let state = test_state("2024-03-09 11:30:00");
        let customer_id = insert_customer(&state, "초코", Some(7.0));

        let (status, body) = call(
            &state,
            Method::POST,
            "/api/checkin",
            json!({ "customer_id": customer_id }),
        );
        assert_eq!(status, 200);
        let visit_id = body["visit_id"].as_i64().unwrap();

        let (status, body) = call(
            &state,
            Method::POST,
            "/api/checkin",
            json!({ "customer_id": customer_id }),
        );
        assert_eq!(status, 409);
        assert_eq!(body["error"], "이미 체크인 중입니다.");

        let (status, _) = call(
            &state,
            Method::PUT,
            &format!("/api/visits/{visit_id}/checkin-time"),
            json!({ "check_in_time": "2024-03-09 10:00:00" }),
        );
        assert_eq!(status, 200);

        let (status, body) = call(
            &state,
            Method::POST,
            "/api/checkout/calculate",
            json!({ "visit_id": visit_id }),
        );
        assert_eq!(status, 200);
        assert_eq!(body["fee_info"]["visit_type"], "daycare");
        assert_eq!(body["fee_info"]["fee"], 10000);

        let (status, body) = call(
            &state,
            Method::POST,
            "/api/checkout",
            json!({ "visit_id": visit_id }),
        );
        assert_eq!(status, 200);
        assert_eq!(body["message"], "체크아웃 완료!");
        assert_eq!(body["fee_info"]["duration_minutes"], 90);

        let (_, body) = call(&state, Method::GET, "/api/visit-history?date=2024-03-09", Value::Null);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = call(&state, Method::GET, "/api/visit-dates", Value::Null);
        assert_eq!(body, json!(["2024-03-09"]));

        let (status, _) = call(
            &state,
            Method::GET,
            "/api/visit-history?startDate=2024-03-01",
            Value::Null,
        );
        assert_eq!(status, 400);
    }

    #[test]
    fn test_reservation_routes() {
        let state = test_state("2024-03-09 10:00:00");
        let customer_id = insert_customer(&state, "보리", Some(4.0));

        let (status, body) = call(
            &state,
            Method::POST,
            "/api/reservations",
            json!({
                "customer_id": customer_id,
                "start_date": "2024-03-10",
                "end_date": "2024-03-12",
                "notes": "사료 지참"
            }),
        );
        assert_eq!(status, 200);
        let id = body["id"].as_i64().unwrap();
        assert_eq!(body["reservation"]["status"], "confirmed");

        let (_, body) = call(&state, Method::GET, "/api/reservations?date=2024-03-11", Value::Null);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = call(
            &state,
            Method::GET,
            "/api/reservations?start_date=2024-03-13&end_date=2024-03-20",
            Value::Null,
        );
        assert!(body.as_array().unwrap().is_empty());

        let (status, body) = call(
            &state,
            Method::PUT,
            &format!("/api/reservations/{id}"),
            json!({ "start_date": "2024-03-12", "end_date": "2024-03-10" }),
        );
        assert_eq!(status, 400);
        assert_eq!(body["error"], "종료일은 시작일 이후여야 합니다.");

        let (status, _) = call(&state, Method::DELETE, &format!("/api/reservations/{id}"), Value::Null);
        assert_eq!(status, 200);

        let (status, _) = call(&state, Method::GET, &format!("/api/reservations/{id}"), Value::Null);
        assert_eq!(status, 404);
    }

    #[test]
    fn test_bad_requests() {
        let state = test_state("2024-03-09 10:00:00");

        let (status, body) = call(&state, Method::POST, "/api/checkin", Value::Null);
        assert_eq!(status, 400);
        assert_eq!(body["error"], "요청 본문이 비어 있습니다.");

        let (status, _) = call(&state, Method::DELETE, "/api/customers/abc", Value::Null);
        assert_eq!(status, 400);

        let (status, _) = call(
            &state,
            Method::POST,
            "/api/checkout",
            json!({ "visit_id": 999 }),
        );
        assert_eq!(status, 404);
    }

    #[test]
    fn test_export_route() {
        let state = test_state("2024-03-09 10:00:00");

        let (status, body) = call(&state, Method::GET, "/api/customers/export", Value::Null);
        assert_eq!(status, 400);
        assert_eq!(body["error"], "다운로드할 고객 데이터가 없습니다.");

        insert_customer(&state, "초코", Some(7.0));
        let response = dispatch(&state, &Method::GET, "/api/customers/export", None, &[]);
        assert_eq!(response.status, 200);
        assert!(response.content_type.starts_with("text/csv"));
        assert!(response.body.starts_with(&[0xEF, 0xBB, 0xBF]));
    }
}
