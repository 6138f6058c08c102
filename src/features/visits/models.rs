use crate::features::billing::FeeQuote;
use crate::features::customers::Customer;
use crate::shared::errors::{AppError, AppResult};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// 방문 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisitType {
    /// 시간 단위 데이케어
    #[default]
    Daycare,
    /// 1일 단위 호텔링
    Hoteling,
}

impl VisitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitType::Daycare => "daycare",
            VisitType::Hoteling => "hoteling",
        }
    }

    /// 문자열에서 방문 유형을 해석한다
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "daycare" => Ok(VisitType::Daycare),
            "hoteling" => Ok(VisitType::Hoteling),
            other => Err(AppError::validation(format!(
                "방문 유형은 daycare 또는 hoteling 이어야 합니다: {other}"
            ))),
        }
    }
}

impl ToSql for VisitType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for VisitType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        VisitType::parse(text).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// 방문 기록 데이터 모델
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Visit {
    pub id: i64,
    pub customer_id: i64,
    pub visit_type: VisitType,
    /// 체크인 시각 (KST 현지 시각)
    pub check_in: String,
    /// 체크아웃 시각. 없으면 이용 중
    pub check_out: Option<String>,
    pub duration_minutes: Option<i64>,
    /// 선결제 여부 (호텔링만)
    pub prepaid: bool,
    pub prepaid_amount: i64,
    /// 체크아웃 시 확정된 요금
    pub fee: Option<i64>,
    pub deleted_at: Option<String>,
}

impl Visit {
    /// 이용 중 (체크아웃 전) 인지 판정
    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }
}

/// 고객 정보가 붙은 방문 기록
///
/// 휴지통 조회는 고객이 없을 수도 있어 고객 항목이 모두 선택 값이다.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VisitDetail {
    #[serde(flatten)]
    pub visit: Visit,
    pub customer_name: Option<String>,
    pub dog_name: Option<String>,
    pub phone: Option<String>,
    pub breed: Option<String>,
    pub weight: Option<f64>,
}

/// 체크인 요청
#[derive(Debug, Deserialize, Clone)]
pub struct CheckInDto {
    pub customer_id: i64,
    #[serde(default)]
    pub visit_type: VisitType,
    #[serde(default)]
    pub prepaid: bool,
    #[serde(default)]
    pub prepaid_amount: Option<f64>,
}

/// 체크인 결과
#[derive(Debug, Serialize, Clone)]
pub struct CheckInResult {
    pub visit: Visit,
    pub customer: Customer,
    pub message: String,
}

/// 요금 계산 / 체크아웃 요청
#[derive(Debug, Deserialize, Clone)]
pub struct CheckoutDto {
    pub visit_id: i64,
    /// 체크아웃 시각. 없으면 현재 시각
    #[serde(default)]
    pub checkout_time: Option<String>,
}

/// 체크인 시각 수정 요청
#[derive(Debug, Deserialize, Clone)]
pub struct UpdateCheckInTimeDto {
    pub check_in_time: String,
}

/// 요금 계산 결과
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FeeCalculation {
    pub visit_id: i64,
    pub check_in: String,
    pub check_out: String,
    /// 요금 견적 (이용 시간 포함)
    #[serde(flatten)]
    pub quote: FeeQuote,
}

/// 방문 기록 조회 조건
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryFilter {
    /// 전체 (최근 1000건)
    All,
    /// 특정 체크인 날짜
    Date(String),
    /// 체크인 날짜 범위 (양 끝 포함)
    Range { start: String, end: String },
}
