use crate::features::customers::{models::*, repository};
use crate::shared::errors::AppResult;
use crate::shared::utils::{
    format_civil_timestamp, normalize_string, validate_date, validate_phone,
    validate_required_field, validate_text_length, validate_weight,
};
use crate::AppState;

/// 이름 / 견종 최대 글자 수
const MAX_NAME_LENGTH: usize = 50;

/// 고객을 등록한다
///
/// # 인자
/// * `state` - 애플리케이션 상태
/// * `dto` - 고객 정보
///
/// # 반환값
/// 등록된 고객, 검증 실패 시 검증 에러
pub fn create_customer(state: &AppState, dto: CustomerDto) -> AppResult<Customer> {
    let dto = normalize_customer_dto(dto);
    validate_customer_dto(&dto)?;

    let now = state.clock.now_civil();
    let db = state.connection()?;
    let customer = repository::create(&db, &dto, &format_civil_timestamp(&now), now.date())?;

    log::info!(
        "고객을 등록했습니다: id={}, dog_name={}",
        customer.id,
        customer.dog_name
    );
    Ok(customer)
}

/// 고객 정보를 수정한다
pub fn update_customer(state: &AppState, id: i64, dto: CustomerDto) -> AppResult<Customer> {
    let dto = normalize_customer_dto(dto);
    validate_customer_dto(&dto)?;

    let today = state.clock.today();
    let db = state.connection()?;
    let customer = repository::update(&db, id, &dto, today)?;

    log::info!("고객 정보를 수정했습니다: id={id}");
    Ok(customer)
}

/// 전체 고객 목록
pub fn get_customers(state: &AppState) -> AppResult<Vec<Customer>> {
    let today = state.clock.today();
    let db = state.connection()?;
    repository::find_all(&db, today)
}

/// 반려견 이름으로 고객을 찾는다 (정확히 일치)
pub fn find_customers_by_dog_name(state: &AppState, dog_name: &str) -> AppResult<Vec<Customer>> {
    let today = state.clock.today();
    let db = state.connection()?;
    repository::find_by_dog_name(&db, dog_name.trim(), today)
}

/// 자동완성 검색 (부분 일치, 최대 20건)
pub fn autocomplete_customers(state: &AppState, term: &str) -> AppResult<Vec<Customer>> {
    let today = state.clock.today();
    let db = state.connection()?;
    repository::search(&db, term, today)
}

/// 고객을 삭제한다 (방문 기록 포함 소프트 삭제)
pub fn delete_customer(state: &AppState, id: i64) -> AppResult<()> {
    let deleted_at = format_civil_timestamp(&state.clock.now_civil());
    let db = state.connection()?;
    repository::soft_delete(&db, id, &deleted_at)?;

    log::info!("고객을 삭제했습니다: id={id}");
    Ok(())
}

fn normalize_customer_dto(dto: CustomerDto) -> CustomerDto {
    CustomerDto {
        customer_name: normalize_string(&dto.customer_name),
        phone: normalize_string(&dto.phone),
        dog_name: normalize_string(&dto.dog_name),
        breed: normalize_string(&dto.breed),
        birth_date: normalize_string(&dto.birth_date),
        weight: dto.weight,
    }
}

/// 고객 DTO 검증
fn validate_customer_dto(dto: &CustomerDto) -> AppResult<()> {
    validate_required_field(&dto.customer_name, "보호자 이름")?;
    validate_text_length(&dto.customer_name, MAX_NAME_LENGTH, "보호자 이름")?;

    validate_phone(&dto.phone)?;

    validate_required_field(&dto.dog_name, "반려견 이름")?;
    validate_text_length(&dto.dog_name, MAX_NAME_LENGTH, "반려견 이름")?;

    validate_required_field(&dto.breed, "견종")?;
    validate_text_length(&dto.breed, MAX_NAME_LENGTH, "견종")?;

    validate_required_field(&dto.birth_date, "생년월일")?;
    validate_date(&dto.birth_date)?;

    validate_weight(dto.weight)
}
