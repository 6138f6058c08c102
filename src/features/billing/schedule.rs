use crate::shared::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// 몸무게 구간별 데이케어 요금
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateBand {
    /// 구간 하한 (kg, 포함)
    pub min_weight: f64,
    /// 구간 상한 (kg, 포함). 없으면 상한 없음
    #[serde(default)]
    pub max_weight: Option<f64>,
    pub hourly_rate: i64,
    pub half_hour_rate: i64,
}

impl RateBand {
    /// 몸무게가 이 구간에 속하는지 판정
    pub fn contains(&self, weight: f64) -> bool {
        weight >= self.min_weight && self.max_weight.map_or(true, |max| weight <= max)
    }
}

/// 호텔링 요금
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelingRates {
    pub price_per_day: i64,
    pub price_per_30min: i64,
}

impl Default for HotelingRates {
    fn default() -> Self {
        Self {
            price_per_day: 50_000,
            price_per_30min: 4_000,
        }
    }
}

/// 요금표
///
/// 데이케어 구간은 앞에서부터 검사해 처음 일치하는 구간을 쓴다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub daycare_bands: Vec<RateBand>,
    pub hoteling: HotelingRates,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            daycare_bands: vec![
                RateBand {
                    min_weight: 2.0,
                    max_weight: Some(7.0),
                    hourly_rate: 5_000,
                    half_hour_rate: 2_500,
                },
                RateBand {
                    min_weight: 7.0,
                    max_weight: Some(15.0),
                    hourly_rate: 6_000,
                    half_hour_rate: 3_000,
                },
                RateBand {
                    min_weight: 15.0,
                    max_weight: None,
                    hourly_rate: 7_000,
                    half_hour_rate: 3_500,
                },
            ],
            hoteling: HotelingRates::default(),
        }
    }
}

impl FeeSchedule {
    /// 환경 변수에서 요금표를 읽는다
    ///
    /// # 환경 변수
    /// * `HOTELING_PRICE_PER_DAY` - 호텔링 1일 요금
    /// * `HOTELING_PRICE_PER_30MIN` - 호텔링 30분 초과 요금
    /// * `DAYCARE_RATE_BANDS` - 데이케어 구간 (JSON 배열)
    ///
    /// 설정되지 않은 항목은 기본값을 쓴다.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 조회 함수로 요금표를 만든다
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut schedule = Self::default();

        if let Some(value) = lookup("HOTELING_PRICE_PER_DAY") {
            schedule.hoteling.price_per_day = parse_amount("HOTELING_PRICE_PER_DAY", &value)?;
        }
        if let Some(value) = lookup("HOTELING_PRICE_PER_30MIN") {
            schedule.hoteling.price_per_30min =
                parse_amount("HOTELING_PRICE_PER_30MIN", &value)?;
        }
        if let Some(value) = lookup("DAYCARE_RATE_BANDS") {
            schedule.daycare_bands = serde_json::from_str(&value).map_err(|e| {
                AppError::configuration(format!("DAYCARE_RATE_BANDS 해석에 실패했습니다: {e}"))
            })?;
        }

        schedule.validate()?;
        Ok(schedule)
    }

    /// 요금표 검증
    ///
    /// # 검증 규칙
    /// - 데이케어 구간이 하나 이상일 것
    /// - 모든 요금이 0보다 클 것
    /// - 구간 하한이 유한하고 상한 이하일 것
    pub fn validate(&self) -> AppResult<()> {
        if self.daycare_bands.is_empty() {
            return Err(AppError::configuration("데이케어 요금 구간이 비어 있습니다."));
        }

        for (index, band) in self.daycare_bands.iter().enumerate() {
            if band.hourly_rate <= 0 || band.half_hour_rate <= 0 {
                return Err(AppError::configuration(format!(
                    "데이케어 요금은 0보다 커야 합니다. (구간 {})",
                    index + 1
                )));
            }
            if !band.min_weight.is_finite() || band.max_weight.is_some_and(|max| max < band.min_weight)
            {
                return Err(AppError::configuration(format!(
                    "데이케어 몸무게 구간이 올바르지 않습니다. (구간 {})",
                    index + 1
                )));
            }
        }

        if self.hoteling.price_per_day <= 0 || self.hoteling.price_per_30min <= 0 {
            return Err(AppError::configuration("호텔링 요금은 0보다 커야 합니다."));
        }

        Ok(())
    }

    /// 몸무게에 해당하는 구간
    pub fn band_for(&self, weight: f64) -> Option<&RateBand> {
        self.daycare_bands.iter().find(|band| band.contains(weight))
    }

    /// 요금이 적용되는 최소 몸무게 (첫 구간의 하한)
    pub fn minimum_weight(&self) -> f64 {
        self.daycare_bands
            .first()
            .map(|band| band.min_weight)
            .unwrap_or_default()
    }
}

fn parse_amount(key: &str, value: &str) -> AppResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::configuration(format!("{key} 값이 정수가 아닙니다: {value}")))
}
