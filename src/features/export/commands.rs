use crate::features::customers::repository as customer_repository;
use crate::features::export::{models::ExportFile, service};
use crate::shared::errors::AppResult;
use crate::AppState;

/// 현재 고객 목록을 CSV로 내보낸다
pub fn export_customers(state: &AppState) -> AppResult<ExportFile> {
    let today = state.clock.today();
    let customers = {
        let db = state.connection()?;
        customer_repository::find_all(&db, today)?
    };

    let file = service::build_customer_csv(&customers, today)?;
    log::info!(
        "고객 목록을 내보냈습니다: {}명, file={}",
        customers.len(),
        file.file_name
    );
    Ok(file)
}
