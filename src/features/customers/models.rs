use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::shared::utils::parse_date;

/// 고객 (보호자와 반려견) 데이터 모델
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub customer_name: String,
    pub phone: String,
    pub dog_name: String,
    pub breed: String,
    /// 생년월일 (YYYY-MM-DD)
    pub birth_date: String,
    /// 몸무게 (kg)
    pub weight: Option<f64>,
    pub created_at: String,
    pub deleted_at: Option<String>,
    /// 생년월일로 계산한 나이 (년)
    pub age_years: i32,
    /// 생년월일로 계산한 나이 (개월)
    pub age_months: i32,
}

/// 고객 등록 / 수정용 DTO
#[derive(Debug, Deserialize, Clone)]
pub struct CustomerDto {
    pub customer_name: String,
    pub phone: String,
    pub dog_name: String,
    pub breed: String,
    pub birth_date: String,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// 나이를 계산한다 (년, 개월)
///
/// 일(day)은 보지 않고 연/월 차이만 센다. 생년월일을 해석할 수 없거나
/// 미래 날짜이면 (0, 0).
pub fn calculate_age(birth_date: &str, today: NaiveDate) -> (i32, i32) {
    let Ok(birth) = parse_date(birth_date) else {
        return (0, 0);
    };

    let mut years = today.year() - birth.year();
    let mut months = today.month() as i32 - birth.month() as i32;

    if months < 0 {
        years -= 1;
        months += 12;
    }

    if years < 0 {
        return (0, 0);
    }

    (years, months)
}
