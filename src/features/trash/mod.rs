/// 휴지통 기능 모듈
///
/// 소프트 삭제된 고객과 방문 기록을 조회하고 복구한다.
pub mod commands;

pub use commands::{get_deleted_customers, get_deleted_visits, restore_customer, restore_visit};
