use crate::shared::errors::AppResult;
use rusqlite::Connection;
use std::path::Path;

/// 데이터베이스 연결을 열고 스키마를 준비한다
///
/// # 인자
/// * `database_path` - 데이터베이스 파일 경로
///
/// # 반환값
/// 데이터베이스 연결, 실패 시 에러
///
/// # 처리 내용
/// 1. 데이터베이스 파일 열기 (없으면 생성)
/// 2. 테이블 생성과 오래된 스키마 보정
pub fn initialize_database(database_path: &Path) -> AppResult<Connection> {
    let conn = Connection::open(database_path)?;

    create_tables(&conn)?;

    log::info!("데이터베이스를 초기화했습니다: {database_path:?}");

    Ok(conn)
}

/// 테이블을 생성한다
///
/// 이미 있는 테이블은 그대로 두고, 빠진 컬럼만 추가한다.
pub fn create_tables(conn: &Connection) -> AppResult<()> {
    create_customers_table(conn)?;
    create_visits_table(conn)?;
    create_reservations_table(conn)?;

    migrate_existing_tables(conn)?;
    create_indexes(conn)?;

    Ok(())
}

fn create_customers_table(conn: &Connection) -> AppResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS customers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            dog_name TEXT NOT NULL,
            breed TEXT NOT NULL,
            birth_date TEXT NOT NULL,
            weight REAL DEFAULT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now', '+9 hours')),
            deleted_at TEXT DEFAULT NULL
        )",
        [],
    )?;

    Ok(())
}

fn create_visits_table(conn: &Connection) -> AppResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS visits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id INTEGER NOT NULL,
            visit_type TEXT NOT NULL DEFAULT 'daycare',
            check_in TEXT NOT NULL,
            check_out TEXT,
            duration_minutes INTEGER,
            prepaid INTEGER NOT NULL DEFAULT 0,
            prepaid_amount INTEGER NOT NULL DEFAULT 0,
            fee INTEGER,
            deleted_at TEXT DEFAULT NULL,
            FOREIGN KEY (customer_id) REFERENCES customers (id)
        )",
        [],
    )?;

    Ok(())
}

fn create_reservations_table(conn: &Connection) -> AppResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS hoteling_reservations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id INTEGER NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'confirmed',
            created_at TEXT NOT NULL DEFAULT (datetime('now', '+9 hours')),
            deleted_at TEXT DEFAULT NULL,
            FOREIGN KEY (customer_id) REFERENCES customers (id)
        )",
        [],
    )?;

    Ok(())
}

/// 이전 버전 파일에 없는 컬럼을 추가한다
fn migrate_existing_tables(conn: &Connection) -> AppResult<()> {
    let additions = [
        ("customers", "weight", "REAL DEFAULT NULL"),
        ("visits", "prepaid", "INTEGER NOT NULL DEFAULT 0"),
        ("visits", "prepaid_amount", "INTEGER NOT NULL DEFAULT 0"),
        ("visits", "fee", "INTEGER"),
    ];

    for (table, column, definition) in additions {
        if !check_column_exists(conn, table, column) {
            log::info!("{table}.{column} 컬럼을 추가합니다");
            conn.execute(
                &format!("ALTER TABLE {table} ADD COLUMN {column} {definition}"),
                [],
            )?;
        }
    }

    Ok(())
}

fn create_indexes(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_dog_name ON customers(dog_name);
         CREATE INDEX IF NOT EXISTS idx_customers_deleted ON customers(deleted_at);
         CREATE INDEX IF NOT EXISTS idx_visits_customer ON visits(customer_id);
         CREATE INDEX IF NOT EXISTS idx_visits_type ON visits(visit_type);
         CREATE INDEX IF NOT EXISTS idx_visits_deleted ON visits(deleted_at);
         CREATE INDEX IF NOT EXISTS idx_reservations_dates ON hoteling_reservations(start_date, end_date);
         CREATE INDEX IF NOT EXISTS idx_reservations_deleted ON hoteling_reservations(deleted_at);",
    )?;

    Ok(())
}

/// 테이블에 컬럼이 있는지 확인한다
///
/// # 인자
/// * `conn` - 데이터베이스 연결
/// * `table_name` - 테이블 이름
/// * `column_name` - 컬럼 이름
///
/// # 반환값
/// 컬럼이 있으면 true, 없거나 조회에 실패하면 false
fn check_column_exists(conn: &Connection, table_name: &str, column_name: &str) -> bool {
    let query = format!("PRAGMA table_info({table_name})");

    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(rows) = stmt.query_map([], |row| row.get::<_, String>(1)) else {
        return false;
    };

    let exists = rows.flatten().any(|name| name == column_name);
    exists
}
