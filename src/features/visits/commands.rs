use crate::features::billing::{
    compute_daycare_fee, compute_hoteling_fee, minutes_between, FeeQuote, FeeSchedule,
};
use crate::features::customers::repository as customer_repository;
use crate::features::visits::{models::*, repository};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{
    format_civil_timestamp, parse_civil_timestamp, validate_date, validate_non_negative_amount,
};
use crate::AppState;
use chrono::NaiveDateTime;
use rusqlite::Connection;

/// 체크인한다
///
/// # 인자
/// * `state` - 애플리케이션 상태
/// * `dto` - 체크인 요청
///
/// # 반환값
/// 체크인 결과. 고객이 없으면 NotFound, 이미 체크인 중이면 Conflict
///
/// # 처리 내용
/// 1. 선결제 금액 검증 (호텔링만 기록, 데이케어는 미결제로 맞춤)
/// 2. 고객 확인과 이용 중 방문 확인
/// 3. 현재 시각으로 방문 기록 생성
pub fn check_in(state: &AppState, dto: CheckInDto) -> AppResult<CheckInResult> {
    let (prepaid, prepaid_amount) = normalize_prepaid(&dto)?;

    let now = state.clock.now_civil();
    let db = state.connection()?;

    let customer = customer_repository::find_by_id(&db, dto.customer_id, now.date())?;
    if repository::find_open_visit_id(&db, customer.id)?.is_some() {
        return Err(AppError::conflict("이미 체크인 중입니다."));
    }

    let visit = repository::insert(
        &db,
        customer.id,
        dto.visit_type,
        &format_civil_timestamp(&now),
        prepaid,
        prepaid_amount,
    )?;

    log::info!(
        "체크인: visit_id={}, customer_id={}, type={}",
        visit.id,
        customer.id,
        visit.visit_type.as_str()
    );

    let message = format!(
        "{} ({}님) 체크인 완료!",
        customer.dog_name, customer.customer_name
    );
    Ok(CheckInResult {
        visit,
        customer,
        message,
    })
}

fn normalize_prepaid(dto: &CheckInDto) -> AppResult<(bool, i64)> {
    if dto.visit_type != VisitType::Hoteling || !dto.prepaid {
        return Ok((false, 0));
    }

    let amount = dto.prepaid_amount.unwrap_or(0.0);
    validate_non_negative_amount(amount, "선결제 금액")?;

    Ok((true, amount.round() as i64))
}

/// 체크인 시각을 수정한다 (체크아웃 전 방문만)
pub fn update_check_in_time(
    state: &AppState,
    visit_id: i64,
    dto: UpdateCheckInTimeDto,
) -> AppResult<Visit> {
    let check_in = parse_civil_timestamp(&dto.check_in_time)?;

    let db = state.connection()?;
    let visit = repository::update_check_in_time(&db, visit_id, &format_civil_timestamp(&check_in))?;

    log::info!("체크인 시간을 수정했습니다: visit_id={visit_id}, check_in={}", visit.check_in);
    Ok(visit)
}

/// 체크아웃 전 요금을 계산한다 (저장하지 않음)
pub fn calculate_fee(state: &AppState, dto: CheckoutDto) -> AppResult<FeeCalculation> {
    let checkout = resolve_checkout_time(state, dto.checkout_time.as_deref())?;

    let db = state.connection()?;
    quote_open_visit(&db, &state.fees, dto.visit_id, checkout)
}

/// 체크아웃한다
///
/// 요금을 계산해 체크아웃 시각, 이용 시간과 함께 한 번에 저장한다.
pub fn check_out(state: &AppState, dto: CheckoutDto) -> AppResult<FeeCalculation> {
    let checkout = resolve_checkout_time(state, dto.checkout_time.as_deref())?;

    let db = state.connection()?;
    let calculation = quote_open_visit(&db, &state.fees, dto.visit_id, checkout)?;

    repository::close(
        &db,
        calculation.visit_id,
        &calculation.check_out,
        calculation.quote.duration_minutes(),
        calculation.quote.billed_amount(),
    )?;

    log::info!(
        "체크아웃: visit_id={}, duration={}분, fee={}",
        calculation.visit_id,
        calculation.quote.duration_minutes(),
        calculation.quote.billed_amount()
    );
    Ok(calculation)
}

fn resolve_checkout_time(state: &AppState, checkout_time: Option<&str>) -> AppResult<NaiveDateTime> {
    match checkout_time {
        Some(value) if !value.trim().is_empty() => parse_civil_timestamp(value),
        _ => Ok(state.clock.now_civil()),
    }
}

/// 이용 중인 방문의 요금 견적
fn quote_open_visit(
    conn: &Connection,
    fees: &FeeSchedule,
    visit_id: i64,
    checkout: NaiveDateTime,
) -> AppResult<FeeCalculation> {
    let detail = repository::find_detail_by_id(conn, visit_id)?;
    let visit = &detail.visit;
    if !visit.is_open() {
        return Err(AppError::conflict("이미 체크아웃된 방문입니다."));
    }

    let check_in = parse_civil_timestamp(&visit.check_in)?;
    let duration_minutes = minutes_between(check_in, checkout);

    let quote = match visit.visit_type {
        VisitType::Daycare => {
            FeeQuote::Daycare(compute_daycare_fee(fees, detail.weight, duration_minutes))
        }
        VisitType::Hoteling => FeeQuote::Hoteling(compute_hoteling_fee(
            &fees.hoteling,
            duration_minutes,
            visit.prepaid_amount,
        )),
    };

    Ok(FeeCalculation {
        visit_id: visit.id,
        check_in: visit.check_in.clone(),
        check_out: format_civil_timestamp(&checkout),
        quote,
    })
}

/// 이용 중인 방문 목록
pub fn get_current_visits(state: &AppState) -> AppResult<Vec<VisitDetail>> {
    let db = state.connection()?;
    repository::find_open(&db)
}

/// 방문 기록 조회
pub fn get_visit_history(state: &AppState, filter: HistoryFilter) -> AppResult<Vec<VisitDetail>> {
    match &filter {
        HistoryFilter::All => {}
        HistoryFilter::Date(date) => validate_date(date)?,
        HistoryFilter::Range { start, end } => {
            validate_date(start)?;
            validate_date(end)?;
        }
    }

    let db = state.connection()?;
    repository::find_history(&db, &filter)
}

/// 방문 기록이 있는 날짜 목록
pub fn get_visit_dates(state: &AppState) -> AppResult<Vec<String>> {
    let db = state.connection()?;
    repository::find_visit_dates(&db)
}

/// 고객의 방문 기록
pub fn get_customer_visits(state: &AppState, customer_id: i64) -> AppResult<Vec<Visit>> {
    let db = state.connection()?;
    repository::find_by_customer(&db, customer_id)
}

/// 방문 기록을 삭제한다 (소프트 삭제)
pub fn delete_visit(state: &AppState, visit_id: i64) -> AppResult<()> {
    let deleted_at = format_civil_timestamp(&state.clock.now_civil());
    let db = state.connection()?;
    repository::soft_delete(&db, visit_id, &deleted_at)?;

    log::info!("방문 기록을 삭제했습니다: visit_id={visit_id}");
    Ok(())
}
