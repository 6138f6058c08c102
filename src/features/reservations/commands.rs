use crate::features::customers::repository as customer_repository;
use crate::features::reservations::{models::*, repository};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{
    format_civil_timestamp, normalize_string, validate_date, validate_required_field,
    validate_text_length,
};
use crate::AppState;

/// 메모 최대 글자 수
const MAX_NOTES_LENGTH: usize = 500;

/// 상태 최대 글자 수
const MAX_STATUS_LENGTH: usize = 20;

/// 예약을 만든다
///
/// # 인자
/// * `state` - 애플리케이션 상태
/// * `dto` - 예약 정보
///
/// # 반환값
/// 만들어진 예약. 고객이 없으면 NotFound, 날짜가 잘못되면 검증 에러
pub fn create_reservation(
    state: &AppState,
    dto: CreateReservationDto,
) -> AppResult<ReservationDetail> {
    let dto = CreateReservationDto {
        start_date: normalize_string(&dto.start_date),
        end_date: normalize_string(&dto.end_date),
        notes: normalize_string(&dto.notes),
        ..dto
    };
    validate_period(&dto.start_date, &dto.end_date)?;
    validate_text_length(&dto.notes, MAX_NOTES_LENGTH, "메모")?;

    let now = state.clock.now_civil();
    let db = state.connection()?;
    customer_repository::find_by_id(&db, dto.customer_id, now.date())?;

    let reservation = repository::create(&db, &dto, &format_civil_timestamp(&now))?;

    log::info!(
        "예약을 등록했습니다: id={}, customer_id={}, {}~{}",
        reservation.reservation.id,
        dto.customer_id,
        dto.start_date,
        dto.end_date
    );
    Ok(reservation)
}

/// 조건에 맞는 예약 목록
pub fn get_reservations(
    state: &AppState,
    query: ReservationQuery,
) -> AppResult<Vec<ReservationDetail>> {
    match &query {
        ReservationQuery::All => {}
        ReservationQuery::Date(date) => validate_date(date)?,
        ReservationQuery::Range { start, end } => validate_period(start, end)?,
    }

    let db = state.connection()?;
    repository::find(&db, &query)
}

/// ID로 예약을 조회한다
pub fn get_reservation(state: &AppState, id: i64) -> AppResult<ReservationDetail> {
    let db = state.connection()?;
    repository::find_by_id(&db, id)
}

/// 고객의 예약 목록
pub fn get_customer_reservations(state: &AppState, customer_id: i64) -> AppResult<Vec<Reservation>> {
    let db = state.connection()?;
    repository::find_by_customer(&db, customer_id)
}

/// 예약을 수정한다
pub fn update_reservation(
    state: &AppState,
    id: i64,
    dto: UpdateReservationDto,
) -> AppResult<ReservationDetail> {
    let dto = UpdateReservationDto {
        start_date: normalize_string(&dto.start_date),
        end_date: normalize_string(&dto.end_date),
        notes: normalize_string(&dto.notes),
        status: normalize_string(&dto.status),
    };
    validate_period(&dto.start_date, &dto.end_date)?;
    validate_text_length(&dto.notes, MAX_NOTES_LENGTH, "메모")?;
    validate_required_field(&dto.status, "예약 상태")?;
    validate_text_length(&dto.status, MAX_STATUS_LENGTH, "예약 상태")?;

    let db = state.connection()?;
    let reservation = repository::update(&db, id, &dto)?;

    log::info!("예약을 수정했습니다: id={id}");
    Ok(reservation)
}

/// 예약을 삭제한다 (소프트 삭제)
pub fn delete_reservation(state: &AppState, id: i64) -> AppResult<()> {
    let deleted_at = format_civil_timestamp(&state.clock.now_civil());
    let db = state.connection()?;
    repository::soft_delete(&db, id, &deleted_at)?;

    log::info!("예약을 삭제했습니다: id={id}");
    Ok(())
}

/// 기간 검증 (시작일 ≤ 종료일)
fn validate_period(start_date: &str, end_date: &str) -> AppResult<()> {
    validate_date(start_date)?;
    validate_date(end_date)?;

    // YYYY-MM-DD 형식은 문자열 비교가 날짜 비교와 같다
    if start_date > end_date {
        return Err(AppError::validation("종료일은 시작일 이후여야 합니다."));
    }

    Ok(())
}
