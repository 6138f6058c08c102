use crate::features::customers::Customer;
use crate::features::export::models::{ExportFile, CSV_CONTENT_TYPE};
use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDate;

/// 엑셀이 UTF-8 한글을 올바르게 열도록 붙이는 BOM
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const HEADERS: [&str; 8] = [
    "번호",
    "반려견 이름",
    "보호자 이름",
    "연락처",
    "견종",
    "나이",
    "몸무게",
    "등록일",
];

/// 고객 목록을 CSV 파일로 만든다
///
/// # 인자
/// * `customers` - 내보낼 고객 목록 (순서대로 번호를 매긴다)
/// * `today` - 파일 이름에 넣을 날짜
///
/// # 반환값
/// CSV 파일. 고객이 없으면 검증 에러
pub fn build_customer_csv(customers: &[Customer], today: NaiveDate) -> AppResult<ExportFile> {
    if customers.is_empty() {
        return Err(AppError::validation("다운로드할 고객 데이터가 없습니다."));
    }

    let mut writer = csv::WriterBuilder::new().from_writer(UTF8_BOM.to_vec());
    writer.write_record(HEADERS).map_err(csv_error)?;

    for (index, customer) in customers.iter().enumerate() {
        writer
            .write_record([
                (index + 1).to_string(),
                customer.dog_name.clone(),
                customer.customer_name.clone(),
                customer.phone.clone(),
                customer.breed.clone(),
                format_age(customer),
                format_weight(customer.weight),
                registration_date(&customer.created_at).to_string(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::export(format!("CSV 버퍼 정리에 실패했습니다: {e}")))?;

    Ok(ExportFile {
        file_name: format!("데이케어_고객목록_{}.csv", today.format("%Y%m%d")),
        content_type: CSV_CONTENT_TYPE,
        bytes,
    })
}

fn csv_error(error: csv::Error) -> AppError {
    AppError::export(format!("CSV 작성에 실패했습니다: {error}"))
}

fn format_age(customer: &Customer) -> String {
    format!("{}살 {}개월", customer.age_years, customer.age_months)
}

fn format_weight(weight: Option<f64>) -> String {
    weight.map(|w| format!("{w}kg")).unwrap_or_default()
}

/// 등록 시각에서 날짜 부분만 꺼낸다
fn registration_date(created_at: &str) -> &str {
    created_at.get(..10).unwrap_or(created_at)
}
