/// 요금 계산 모듈
///
/// - 이용 시간 계산 (KST 현지 시각 기준)
/// - 몸무게 구간별 데이케어 요금
/// - 1일 단위 호텔링 요금과 선결제 잔액
pub mod calculator;
pub mod models;
pub mod schedule;

pub use calculator::{
    compute_daycare_fee, compute_duration_minutes, compute_hoteling_fee, minutes_between,
};
pub use models::{AdditionalUnit, DaycareFee, FeeQuote, HotelingFee};
pub use schedule::{FeeSchedule, HotelingRates, RateBand};
