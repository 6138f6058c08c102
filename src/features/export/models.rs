/// CSV 응답의 Content-Type
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// 내보내기 파일
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// 다운로드 파일 이름
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}
