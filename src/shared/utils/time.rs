use crate::shared::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// 시설 현지 시간 (KST) 의 UTC 오프셋 (시간)
///
/// 서머타임이 없는 고정 오프셋이며, "현재 시각"을 구할 때만 더한다.
pub const KST_OFFSET_HOURS: i64 = 9;

/// 저장/표시에 쓰는 시각 문자열 형식
pub const CIVIL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 날짜 문자열 형식
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 입력으로 허용하는 시각 형식 (앞에서부터 순서대로 시도)
const ACCEPTED_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// 현재 시각 공급자
///
/// 요금 계산과 체크인/체크아웃은 이 트레이트를 통해서만 현재 시각을 얻는다.
/// 테스트에서는 `FixedClock`으로 교체한다.
pub trait Clock: Send + Sync {
    /// 현재 UTC 시각
    fn now_utc(&self) -> DateTime<Utc>;

    /// 현재 KST 현지 시각 (UTC + 9시간, 시간대 규칙 없음)
    fn now_civil(&self) -> NaiveDateTime {
        self.now_utc().naive_utc() + Duration::hours(KST_OFFSET_HOURS)
    }

    /// 오늘 날짜 (KST 기준)
    fn today(&self) -> NaiveDate {
        self.now_civil().date()
    }
}

/// 시스템 시계
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 고정된 시각을 돌려주는 시계
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    civil_now: NaiveDateTime,
}

impl FixedClock {
    /// KST 현지 시각으로 고정 시계를 만든다
    pub fn new(civil_now: NaiveDateTime) -> Self {
        Self { civil_now }
    }

    /// KST 현지 시각 문자열로 고정 시계를 만든다
    ///
    /// # 인자
    /// * `civil_now` - `YYYY-MM-DD HH:MM:SS` 형식의 현지 시각
    pub fn from_civil(civil_now: &str) -> AppResult<Self> {
        Ok(Self::new(parse_civil_timestamp(civil_now)?))
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        (self.civil_now - Duration::hours(KST_OFFSET_HOURS)).and_utc()
    }

    fn now_civil(&self) -> NaiveDateTime {
        self.civil_now
    }
}

/// 현지 시각 문자열을 해석한다
///
/// # 인자
/// * `value` - `YYYY-MM-DD HH:MM:SS` (또는 `T` 구분자, 초 생략 형식)
///
/// # 반환값
/// 시간대 정보가 없는 현지 시각, 형식이 틀리면 검증 에러
pub fn parse_civil_timestamp(value: &str) -> AppResult<NaiveDateTime> {
    let trimmed = value.trim();

    ACCEPTED_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            AppError::validation(format!(
                "시각은 YYYY-MM-DD HH:MM:SS 형식으로 입력해주세요: {value}"
            ))
        })
}

/// 현지 시각을 저장용 문자열로 변환한다
pub fn format_civil_timestamp(value: &NaiveDateTime) -> String {
    value.format(CIVIL_TIMESTAMP_FORMAT).to_string()
}

/// 날짜 문자열을 해석한다
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::validation(format!("날짜는 YYYY-MM-DD 형식으로 입력해주세요: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_parse_civil_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        assert_eq!(parse_civil_timestamp("2024-01-01 09:30:00").unwrap(), expected);
        assert_eq!(parse_civil_timestamp("2024-01-01T09:30:00").unwrap(), expected);
        assert_eq!(parse_civil_timestamp("2024-01-01 09:30").unwrap(), expected);
        assert_eq!(parse_civil_timestamp("2024-01-01T09:30").unwrap(), expected);
        assert_eq!(parse_civil_timestamp(" 2024-01-01 09:30:00 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_civil_timestamp_invalid() {
        assert!(parse_civil_timestamp("").is_err());
        assert!(parse_civil_timestamp("2024/01/01 09:30:00").is_err());
        assert!(parse_civil_timestamp("2024-13-01 09:30:00").is_err());
        assert!(parse_civil_timestamp("오늘 아침").is_err());
    }

    #[test]
    fn test_system_clock_adds_fixed_offset() {
        let clock = SystemClock;
        let utc = clock.now_utc().naive_utc();
        let civil = clock.now_civil();

        // 두 호출 사이의 경과 시간을 감안해 9시간 ± 몇 초 이내인지 확인
        let diff = (civil - utc).num_seconds();
        assert!((9 * 3600..9 * 3600 + 5).contains(&diff));
    }

    #[test]
    fn test_fixed_clock_round_trips_civil_time() {
        let clock = FixedClock::from_civil("2024-03-10 23:30:00").unwrap();

        assert_eq!(format_civil_timestamp(&clock.now_civil()), "2024-03-10 23:30:00");
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());

        // UTC로는 같은 날 14:30
        let utc = clock.now_utc();
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 3, 10, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_today_crosses_midnight_with_offset() {
        // UTC 2024-12-31 20:00 → KST 2025-01-01 05:00
        struct UtcClock;
        impl Clock for UtcClock {
            fn now_utc(&self) -> DateTime<Utc> {
                Utc.with_ymd_and_hms(2024, 12, 31, 20, 0, 0).unwrap()
            }
        }

        let today = UtcClock.today();
        assert_eq!((today.year(), today.month(), today.day()), (2025, 1, 1));
        assert_eq!(UtcClock.now_civil().hour(), 5);
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("2024/02/01").is_err());
    }
}
