/// 방문 (체크인 / 체크아웃) 기능 모듈
///
/// - 체크인, 체크인 시각 수정
/// - 체크아웃 전 요금 견적과 체크아웃 확정
/// - 이용 중 목록, 방문 기록, 방문 날짜 조회
/// - 소프트 삭제와 복구
pub mod commands;
pub mod models;
pub mod repository;

#[cfg(test)]
mod integration_tests;

pub use models::{
    CheckInDto, CheckInResult, CheckoutDto, FeeCalculation, HistoryFilter, UpdateCheckInTimeDto,
    Visit, VisitDetail, VisitType,
};

pub use commands::{
    calculate_fee, check_in, check_out, delete_visit, get_current_visits, get_customer_visits,
    get_visit_dates, get_visit_history, update_check_in_time,
};
