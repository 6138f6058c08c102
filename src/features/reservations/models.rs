use serde::{Deserialize, Serialize};

/// 예약 기본 상태
pub const DEFAULT_STATUS: &str = "confirmed";

/// 호텔링 예약 데이터 모델
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Reservation {
    pub id: i64,
    pub customer_id: i64,
    /// 시작일 (YYYY-MM-DD)
    pub start_date: String,
    /// 종료일 (YYYY-MM-DD, 포함)
    pub end_date: String,
    pub notes: String,
    pub status: String,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

/// 고객 정보가 붙은 예약
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub customer_name: String,
    pub dog_name: String,
    pub phone: String,
    pub breed: String,
}

/// 예약 생성용 DTO
#[derive(Debug, Deserialize, Clone)]
pub struct CreateReservationDto {
    pub customer_id: i64,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub notes: String,
}

/// 예약 수정용 DTO
#[derive(Debug, Deserialize, Clone)]
pub struct UpdateReservationDto {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

/// 예약 조회 조건
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationQuery {
    /// 전체 (최근 시작일 순 500건)
    All,
    /// 특정 날짜에 걸친 예약
    Date(String),
    /// 기간과 겹치는 예약
    Range { start: String, end: String },
}
