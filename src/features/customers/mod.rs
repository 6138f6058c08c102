/// 고객 기능 모듈
///
/// - 고객 등록, 수정, 조회
/// - 반려견 이름 정확 일치 조회와 자동완성 검색
/// - 생년월일 기반 나이 계산
/// - 소프트 삭제와 복구 (방문 기록 포함)
pub mod commands;
pub mod models;
pub mod repository;

pub use models::{calculate_age, Customer, CustomerDto};

pub use commands::{
    autocomplete_customers, create_customer, delete_customer, find_customers_by_dog_name,
    get_customers, update_customer,
};
