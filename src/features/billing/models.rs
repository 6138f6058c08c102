use serde::{Deserialize, Serialize};

/// 데이케어 추가 요금 단위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AdditionalUnit {
    /// 추가 요금 없음
    #[default]
    #[serde(rename = "")]
    None,
    /// 30분 미만 잔여 시간
    #[serde(rename = "30분")]
    HalfHour,
    /// 30분 이상 잔여 시간
    #[serde(rename = "1시간")]
    Hour,
}

/// 데이케어 요금 계산 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaycareFee {
    /// 총 요금 (원)
    pub fee: i64,
    /// 요금을 계산할 수 없을 때의 안내 문구
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub full_hours: i64,
    pub remaining_minutes: i64,
    pub additional_fee: i64,
    pub additional_unit: AdditionalUnit,
    pub price_per_hour: i64,
    pub price_per_30min: i64,
    pub duration_minutes: i64,
    pub weight: Option<f64>,
}

/// 호텔링 요금 계산 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelingFee {
    /// 총 요금 (원)
    pub total_fee: i64,
    pub full_days: i64,
    pub remaining_minutes: i64,
    /// 1일 미만 잔여 시간의 초과 요금 (30분 단위 올림)
    pub overtime_fee: i64,
    pub price_per_day: i64,
    pub price_per_30min: i64,
    pub prepaid_amount: i64,
    /// 잔액 (선결제가 더 많으면 음수)
    pub remaining_fee: i64,
    pub duration_minutes: i64,
}

/// 방문 유형별 요금 견적
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "visit_type", rename_all = "lowercase")]
pub enum FeeQuote {
    Daycare(DaycareFee),
    Hoteling(HotelingFee),
}

impl FeeQuote {
    /// 방문 기록에 저장할 최종 요금
    ///
    /// 데이케어는 총 요금, 호텔링은 총 요금 (선결제 차감 전)
    pub fn billed_amount(&self) -> i64 {
        match self {
            FeeQuote::Daycare(fee) => fee.fee,
            FeeQuote::Hoteling(fee) => fee.total_fee,
        }
    }

    /// 견적에 쓴 이용 시간 (분)
    pub fn duration_minutes(&self) -> i64 {
        match self {
            FeeQuote::Daycare(fee) => fee.duration_minutes,
            FeeQuote::Hoteling(fee) => fee.duration_minutes,
        }
    }
}
