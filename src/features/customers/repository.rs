use crate::features::customers::models::{calculate_age, Customer, CustomerDto};
use crate::features::visits::repository as visit_repository;
use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

/// 자동완성 검색 결과 최대 건수
const SEARCH_LIMIT: i64 = 20;

/// 휴지통에 보여주는 최대 건수
const TRASH_LIMIT: i64 = 10;

const CUSTOMER_COLUMNS: &str =
    "id, customer_name, phone, dog_name, breed, birth_date, weight, created_at, deleted_at";

fn map_customer(row: &Row<'_>, today: NaiveDate) -> rusqlite::Result<Customer> {
    let birth_date: String = row.get(5)?;
    let (age_years, age_months) = calculate_age(&birth_date, today);

    Ok(Customer {
        id: row.get(0)?,
        customer_name: row.get(1)?,
        phone: row.get(2)?,
        dog_name: row.get(3)?,
        breed: row.get(4)?,
        birth_date,
        weight: row.get(6)?,
        created_at: row.get(7)?,
        deleted_at: row.get(8)?,
        age_years,
        age_months,
    })
}

fn query_customers(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
    today: NaiveDate,
) -> AppResult<Vec<Customer>> {
    let mut stmt = conn.prepare(sql)?;
    let customers = stmt.query_map(params, |row| map_customer(row, today))?;

    customers
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::from)
}

/// 고객을 등록한다
///
/// # 인자
/// * `conn` - 데이터베이스 연결
/// * `dto` - 검증을 마친 고객 정보
/// * `created_at` - 등록 시각 (KST 현지 시각 문자열)
/// * `today` - 나이 계산 기준일
///
/// # 반환값
/// 등록된 고객
pub fn create(
    conn: &Connection,
    dto: &CustomerDto,
    created_at: &str,
    today: NaiveDate,
) -> AppResult<Customer> {
    conn.execute(
        "INSERT INTO customers (customer_name, phone, dog_name, breed, birth_date, weight, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            dto.customer_name,
            dto.phone,
            dto.dog_name,
            dto.breed,
            dto.birth_date,
            dto.weight,
            created_at
        ],
    )?;

    let id = conn.last_insert_rowid();
    find_by_id(conn, id, today)
}

/// 고객 정보를 수정한다 (편집 가능한 항목 전체 교체)
pub fn update(
    conn: &Connection,
    id: i64,
    dto: &CustomerDto,
    today: NaiveDate,
) -> AppResult<Customer> {
    let affected_rows = conn.execute(
        "UPDATE customers
         SET customer_name = ?1, phone = ?2, dog_name = ?3, breed = ?4, birth_date = ?5, weight = ?6
         WHERE id = ?7 AND deleted_at IS NULL",
        params![
            dto.customer_name,
            dto.phone,
            dto.dog_name,
            dto.breed,
            dto.birth_date,
            dto.weight,
            id
        ],
    )?;

    if affected_rows == 0 {
        return Err(AppError::not_found("고객"));
    }

    find_by_id(conn, id, today)
}

/// ID로 고객을 조회한다 (삭제되지 않은 고객만)
pub fn find_by_id(conn: &Connection, id: i64, today: NaiveDate) -> AppResult<Customer> {
    conn.query_row(
        &format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1 AND deleted_at IS NULL"),
        params![id],
        |row| map_customer(row, today),
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::not_found("고객"),
        _ => AppError::from(e),
    })
}

/// 반려견 이름으로 고객을 조회한다 (정확히 일치)
///
/// # 반환값
/// 일치하는 고객 목록. 한 명도 없으면 NotFound
pub fn find_by_dog_name(
    conn: &Connection,
    dog_name: &str,
    today: NaiveDate,
) -> AppResult<Vec<Customer>> {
    let customers = query_customers(
        conn,
        &format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers
             WHERE dog_name = ?1 AND deleted_at IS NULL
             ORDER BY created_at DESC"
        ),
        params![dog_name],
        today,
    )?;

    if customers.is_empty() {
        return Err(AppError::NotFound("등록되지 않은 반려견입니다.".to_string()));
    }

    Ok(customers)
}

/// 반려견 이름, 보호자 이름, 연락처로 부분 일치 검색한다
///
/// 검색어가 비어 있으면 빈 목록을 돌려준다.
pub fn search(conn: &Connection, term: &str, today: NaiveDate) -> AppResult<Vec<Customer>> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(Vec::new());
    }

    let pattern = format!("%{term}%");
    query_customers(
        conn,
        &format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers
             WHERE (dog_name LIKE ?1 OR customer_name LIKE ?1 OR phone LIKE ?1)
               AND deleted_at IS NULL
             ORDER BY dog_name
             LIMIT ?2"
        ),
        params![pattern, SEARCH_LIMIT],
        today,
    )
}

/// 전체 고객 목록 (최근 등록 순)
pub fn find_all(conn: &Connection, today: NaiveDate) -> AppResult<Vec<Customer>> {
    query_customers(
        conn,
        &format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers
             WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC"
        ),
        [],
        today,
    )
}

/// 삭제된 고객 목록 (최근 삭제 순 10건)
pub fn find_deleted(conn: &Connection, today: NaiveDate) -> AppResult<Vec<Customer>> {
    query_customers(
        conn,
        &format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers
             WHERE deleted_at IS NOT NULL
             ORDER BY deleted_at DESC, id DESC
             LIMIT ?1"
        ),
        params![TRASH_LIMIT],
        today,
    )
}

/// 고객을 삭제한다 (소프트 삭제, 방문 기록도 함께)
///
/// # 인자
/// * `conn` - 데이터베이스 연결
/// * `id` - 고객 ID
/// * `deleted_at` - 삭제 시각 (KST 현지 시각 문자열)
///
/// # 반환값
/// 성공 시 Ok(()). 고객이 없으면 NotFound, 체크인 중이면 Conflict
pub fn soft_delete(conn: &Connection, id: i64, deleted_at: &str) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    let exists: bool = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM customers WHERE id = ?1 AND deleted_at IS NULL)",
        params![id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(AppError::not_found("고객"));
    }

    if visit_repository::find_open_visit_id(&tx, id)?.is_some() {
        return Err(AppError::conflict(
            "체크인 중인 고객은 삭제할 수 없습니다. 먼저 체크아웃을 해주세요.",
        ));
    }

    tx.execute(
        "UPDATE customers SET deleted_at = ?1 WHERE id = ?2",
        params![deleted_at, id],
    )?;
    tx.execute(
        "UPDATE visits SET deleted_at = ?1 WHERE customer_id = ?2 AND deleted_at IS NULL",
        params![deleted_at, id],
    )?;

    tx.commit()?;
    Ok(())
}

/// 삭제된 고객을 복구한다 (방문 기록도 함께)
///
/// 종료된 방문은 모두 복구한다. 이용 중인 방문은 고객당 하나만 둘 수 있으므로
/// 이미 이용 중인 방문이 없을 때 가장 최근 것 하나만 복구하고 나머지는 휴지통에 남긴다.
pub fn restore(conn: &Connection, id: i64) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    let affected_rows = tx.execute(
        "UPDATE customers SET deleted_at = NULL WHERE id = ?1",
        params![id],
    )?;
    if affected_rows == 0 {
        return Err(AppError::not_found("고객"));
    }

    tx.execute(
        "UPDATE visits SET deleted_at = NULL
         WHERE customer_id = ?1 AND check_out IS NOT NULL",
        params![id],
    )?;

    if visit_repository::find_open_visit_id(&tx, id)?.is_none() {
        tx.execute(
            "UPDATE visits SET deleted_at = NULL
             WHERE id = (
                 SELECT id FROM visits
                 WHERE customer_id = ?1 AND check_out IS NULL AND deleted_at IS NOT NULL
                 ORDER BY check_in DESC, id DESC
                 LIMIT 1
             )",
            params![id],
        )?;
    }

    let left_open: i64 = tx.query_row(
        "SELECT COUNT(*) FROM visits
         WHERE customer_id = ?1 AND check_out IS NULL AND deleted_at IS NOT NULL",
        params![id],
        |row| row.get(0),
    )?;
    if left_open > 0 {
        log::warn!("이용 중 방문 {left_open}건은 휴지통에 남겼습니다: customer_id={id}");
    }

    tx.commit()?;
    Ok(())
}
