//! 테스트 공용 도우미

use crate::features::billing::FeeSchedule;
use crate::shared::database::create_tables;
use crate::shared::utils::FixedClock;
use crate::AppState;
use rusqlite::{params, Connection};
use std::sync::Arc;

/// 메모리 DB와 고정 시계로 상태를 만든다
pub fn test_state(now: &str) -> AppState {
    test_state_with_fees(now, FeeSchedule::default())
}

pub fn test_state_with_fees(now: &str, fees: FeeSchedule) -> AppState {
    let conn = Connection::open_in_memory().unwrap();
    create_tables(&conn).unwrap();
    let clock = FixedClock::from_civil(now).unwrap();

    AppState::new(conn, fees, Arc::new(clock))
}

/// 고객을 직접 넣고 ID를 돌려준다 (보호자 이름은 "보호자")
pub fn insert_customer(state: &AppState, dog_name: &str, weight: Option<f64>) -> i64 {
    let db = state.connection().unwrap();
    db.execute(
        "INSERT INTO customers (customer_name, phone, dog_name, breed, birth_date, weight)
         VALUES ('보호자', '010-0000-0000', ?1, '믹스', '2020-01-01', ?2)",
        params![dog_name, weight],
    )
    .unwrap();
    db.last_insert_rowid()
}
