use crate::features::customers::{repository as customer_repository, Customer};
use crate::features::visits::{repository as visit_repository, VisitDetail};
use crate::shared::errors::AppResult;
use crate::AppState;

/// 삭제된 고객 목록 (최근 10건)
pub fn get_deleted_customers(state: &AppState) -> AppResult<Vec<Customer>> {
    let today = state.clock.today();
    let db = state.connection()?;
    customer_repository::find_deleted(&db, today)
}

/// 삭제된 방문 기록 (최근 10건)
pub fn get_deleted_visits(state: &AppState) -> AppResult<Vec<VisitDetail>> {
    let db = state.connection()?;
    visit_repository::find_deleted(&db)
}

/// 고객을 복구한다 (방문 기록 포함)
pub fn restore_customer(state: &AppState, customer_id: i64) -> AppResult<()> {
    let db = state.connection()?;
    customer_repository::restore(&db, customer_id)?;

    log::info!("고객을 복구했습니다: id={customer_id}");
    Ok(())
}

/// 방문 기록을 복구한다
pub fn restore_visit(state: &AppState, visit_id: i64) -> AppResult<()> {
    let db = state.connection()?;
    visit_repository::restore(&db, visit_id)?;

    log::info!("방문 기록을 복구했습니다: visit_id={visit_id}");
    Ok(())
}
