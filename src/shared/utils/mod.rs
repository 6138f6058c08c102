use crate::shared::errors::{AppError, AppResult};
use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;

/// 시각 / 시계 관련 유틸리티
pub mod time;

pub use time::{
    format_civil_timestamp, parse_civil_timestamp, parse_date, Clock, FixedClock, SystemClock,
};

/// 연락처 형식 (숫자, 하이픈, 공백, 앞자리 +)
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9\- ]{6,18}[0-9]$").expect("연락처 정규식"));

/// 날짜 문자열 검증
///
/// # 인자
/// * `date_str` - 날짜 문자열 (YYYY-MM-DD)
///
/// # 반환값
/// 유효하면 Ok(()), 아니면 검증 에러
///
/// # 검증 규칙
/// - YYYY-MM-DD 형식일 것
/// - 실제로 존재하는 날짜일 것
/// - 1900년 이후, 2100년 이전일 것
pub fn validate_date(date_str: &str) -> AppResult<()> {
    if date_str.len() != 10 {
        return Err(AppError::validation("날짜는 YYYY-MM-DD 형식으로 입력해주세요."));
    }

    let date = parse_date(date_str)?;

    if !(1900..=2100).contains(&date.year()) {
        return Err(AppError::validation(
            "날짜는 1900년부터 2100년 사이로 입력해주세요.",
        ));
    }

    Ok(())
}

/// 필수 항목 검증
///
/// # 인자
/// * `text` - 검증할 문자열
/// * `field_name` - 항목 이름 (에러 메시지용)
pub fn validate_required_field(text: &str, field_name: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::validation(format!("{field_name}은(는) 필수 항목입니다.")));
    }
    Ok(())
}

/// 문자열 길이 검증
///
/// # 인자
/// * `text` - 검증할 문자열
/// * `max_length` - 최대 글자 수
/// * `field_name` - 항목 이름 (에러 메시지용)
pub fn validate_text_length(text: &str, max_length: usize, field_name: &str) -> AppResult<()> {
    let char_count = text.chars().count();
    if char_count > max_length {
        return Err(AppError::validation(format!(
            "{field_name}은(는) {max_length}자 이내로 입력해주세요. (현재: {char_count}자)"
        )));
    }
    Ok(())
}

/// 연락처 검증
pub fn validate_phone(phone: &str) -> AppResult<()> {
    validate_required_field(phone, "연락처")?;
    if !PHONE_PATTERN.is_match(phone.trim()) {
        return Err(AppError::validation("연락처 형식이 올바르지 않습니다."));
    }
    Ok(())
}

/// 몸무게 검증 (입력된 경우에만)
///
/// # 검증 규칙
/// - 유한한 수일 것
/// - 0보다 클 것
pub fn validate_weight(weight: Option<f64>) -> AppResult<()> {
    if let Some(w) = weight {
        if !w.is_finite() || w <= 0.0 {
            return Err(AppError::validation("몸무게는 0보다 큰 숫자로 입력해주세요."));
        }
    }
    Ok(())
}

/// 금액 검증 (0 이상)
pub fn validate_non_negative_amount(amount: f64, field_name: &str) -> AppResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::validation(format!(
            "{field_name}은(는) 0 이상의 숫자로 입력해주세요."
        )));
    }
    if amount >= 10_000_000_000.0 {
        return Err(AppError::validation(format!(
            "{field_name}은(는) 10자리 이내로 입력해주세요."
        )));
    }
    Ok(())
}

/// 앞뒤 공백 제거
pub fn normalize_string(text: &str) -> String {
    text.trim().to_string()
}
