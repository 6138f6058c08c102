/// 고객 목록 내보내기 모듈
///
/// 엑셀에서 바로 열 수 있는 UTF-8 (BOM) CSV를 만든다.
pub mod commands;
pub mod models;
pub mod service;

pub use commands::export_customers;
pub use models::{ExportFile, CSV_CONTENT_TYPE};
