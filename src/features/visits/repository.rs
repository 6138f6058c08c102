use crate::features::visits::models::{HistoryFilter, Visit, VisitDetail, VisitType};
use crate::shared::errors::{AppError, AppResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// 방문 기록 조회 최대 건수
const HISTORY_LIMIT: i64 = 1_000;

/// 방문 날짜 목록 최대 건수
const VISIT_DATES_LIMIT: i64 = 90;

/// 휴지통에 보여주는 최대 건수
const TRASH_LIMIT: i64 = 10;

const VISIT_COLUMNS: &str = "v.id, v.customer_id, v.visit_type, v.check_in, v.check_out, \
     v.duration_minutes, v.prepaid, v.prepaid_amount, v.fee, v.deleted_at";

const DETAIL_COLUMNS: &str = "c.customer_name, c.dog_name, c.phone, c.breed, c.weight";

fn map_visit(row: &Row<'_>) -> rusqlite::Result<Visit> {
    Ok(Visit {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        visit_type: row.get(2)?,
        check_in: row.get(3)?,
        check_out: row.get(4)?,
        duration_minutes: row.get(5)?,
        prepaid: row.get(6)?,
        prepaid_amount: row.get(7)?,
        fee: row.get(8)?,
        deleted_at: row.get(9)?,
    })
}

fn map_visit_detail(row: &Row<'_>) -> rusqlite::Result<VisitDetail> {
    Ok(VisitDetail {
        visit: map_visit(row)?,
        customer_name: row.get(10)?,
        dog_name: row.get(11)?,
        phone: row.get(12)?,
        breed: row.get(13)?,
        weight: row.get(14)?,
    })
}

fn query_details(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> AppResult<Vec<VisitDetail>> {
    let mut stmt = conn.prepare(sql)?;
    let visits = stmt.query_map(params, map_visit_detail)?;

    visits.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
}

/// 방문 기록을 만든다 (체크인)
///
/// # 인자
/// * `conn` - 데이터베이스 연결
/// * `customer_id` - 고객 ID
/// * `visit_type` - 방문 유형
/// * `check_in` - 체크인 시각 (KST 현지 시각 문자열)
/// * `prepaid` - 선결제 여부
/// * `prepaid_amount` - 선결제 금액
///
/// # 반환값
/// 만들어진 방문 기록
pub fn insert(
    conn: &Connection,
    customer_id: i64,
    visit_type: VisitType,
    check_in: &str,
    prepaid: bool,
    prepaid_amount: i64,
) -> AppResult<Visit> {
    conn.execute(
        "INSERT INTO visits (customer_id, visit_type, check_in, prepaid, prepaid_amount)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![customer_id, visit_type, check_in, prepaid, prepaid_amount],
    )?;

    let id = conn.last_insert_rowid();
    find_by_id(conn, id)
}

/// ID로 방문 기록을 조회한다 (삭제되지 않은 것만)
pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Visit> {
    conn.query_row(
        &format!("SELECT {VISIT_COLUMNS} FROM visits v WHERE v.id = ?1 AND v.deleted_at IS NULL"),
        params![id],
        map_visit,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::not_found("방문 기록"),
        _ => AppError::from(e),
    })
}

/// 고객 정보와 함께 방문 기록을 조회한다
///
/// 방문과 고객이 모두 삭제되지 않은 경우만 찾는다.
pub fn find_detail_by_id(conn: &Connection, id: i64) -> AppResult<VisitDetail> {
    conn.query_row(
        &format!(
            "SELECT {VISIT_COLUMNS}, {DETAIL_COLUMNS}
             FROM visits v
             JOIN customers c ON v.customer_id = c.id
             WHERE v.id = ?1 AND v.deleted_at IS NULL AND c.deleted_at IS NULL"
        ),
        params![id],
        map_visit_detail,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::not_found("방문 기록"),
        _ => AppError::from(e),
    })
}

/// 고객의 이용 중인 방문 ID
pub fn find_open_visit_id(conn: &Connection, customer_id: i64) -> AppResult<Option<i64>> {
    conn.query_row(
        "SELECT id FROM visits
         WHERE customer_id = ?1 AND check_out IS NULL AND deleted_at IS NULL
         ORDER BY check_in DESC
         LIMIT 1",
        params![customer_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(AppError::from)
}

/// 조건부 갱신이 0건일 때 원인을 판별한다
fn resolve_unchanged_visit(conn: &Connection, id: i64, conflict_message: &str) -> AppError {
    match find_by_id(conn, id) {
        Ok(visit) if !visit.is_open() => AppError::conflict(conflict_message),
        Ok(_) => AppError::concurrency(format!("방문 기록 갱신에 실패했습니다: id={id}")),
        Err(e) => e,
    }
}

/// 체크인 시각을 수정한다 (이용 중인 방문만)
pub fn update_check_in_time(conn: &Connection, id: i64, check_in: &str) -> AppResult<Visit> {
    let affected_rows = conn.execute(
        "UPDATE visits SET check_in = ?1
         WHERE id = ?2 AND check_out IS NULL AND deleted_at IS NULL",
        params![check_in, id],
    )?;

    if affected_rows == 0 {
        return Err(resolve_unchanged_visit(
            conn,
            id,
            "체크아웃된 방문의 체크인 시간은 수정할 수 없습니다.",
        ));
    }

    find_by_id(conn, id)
}

/// 방문을 종료한다 (체크아웃)
///
/// `check_out IS NULL` 조건으로 한 번만 성공하도록 갱신한다.
///
/// # 반환값
/// 종료된 방문 기록. 없으면 NotFound, 이미 종료되었으면 Conflict
pub fn close(
    conn: &Connection,
    id: i64,
    check_out: &str,
    duration_minutes: i64,
    fee: i64,
) -> AppResult<Visit> {
    let affected_rows = conn.execute(
        "UPDATE visits SET check_out = ?1, duration_minutes = ?2, fee = ?3
         WHERE id = ?4 AND check_out IS NULL AND deleted_at IS NULL",
        params![check_out, duration_minutes, fee, id],
    )?;

    if affected_rows == 0 {
        return Err(resolve_unchanged_visit(conn, id, "이미 체크아웃된 방문입니다."));
    }

    find_by_id(conn, id)
}

/// 이용 중인 방문 목록 (최근 체크인 순)
pub fn find_open(conn: &Connection) -> AppResult<Vec<VisitDetail>> {
    query_details(
        conn,
        &format!(
            "SELECT {VISIT_COLUMNS}, {DETAIL_COLUMNS}
             FROM visits v
             JOIN customers c ON v.customer_id = c.id
             WHERE v.check_out IS NULL AND v.deleted_at IS NULL AND c.deleted_at IS NULL
             ORDER BY v.check_in DESC"
        ),
        [],
    )
}

/// 종료된 방문 기록 (최근 체크인 순, 최대 1000건)
///
/// 날짜 조건은 체크인 날짜에 적용한다.
pub fn find_history(conn: &Connection, filter: &HistoryFilter) -> AppResult<Vec<VisitDetail>> {
    let base = format!(
        "SELECT {VISIT_COLUMNS}, {DETAIL_COLUMNS}
         FROM visits v
         JOIN customers c ON v.customer_id = c.id
         WHERE v.check_out IS NOT NULL AND v.deleted_at IS NULL AND c.deleted_at IS NULL"
    );
    let order = "ORDER BY v.check_in DESC LIMIT";

    match filter {
        HistoryFilter::All => query_details(
            conn,
            &format!("{base} {order} ?1"),
            params![HISTORY_LIMIT],
        ),
        HistoryFilter::Date(date) => query_details(
            conn,
            &format!("{base} AND date(v.check_in) = ?1 {order} ?2"),
            params![date, HISTORY_LIMIT],
        ),
        HistoryFilter::Range { start, end } => query_details(
            conn,
            &format!("{base} AND date(v.check_in) BETWEEN ?1 AND ?2 {order} ?3"),
            params![start, end, HISTORY_LIMIT],
        ),
    }
}

/// 종료된 방문이 있는 날짜 목록 (최근 순, 최대 90일)
pub fn find_visit_dates(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT date(check_in) AS visit_date
         FROM visits
         WHERE check_out IS NOT NULL AND deleted_at IS NULL
         ORDER BY visit_date DESC
         LIMIT ?1",
    )?;
    let dates = stmt.query_map(params![VISIT_DATES_LIMIT], |row| row.get(0))?;

    dates.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
}

/// 고객의 종료된 방문 기록 (최근 순)
pub fn find_by_customer(conn: &Connection, customer_id: i64) -> AppResult<Vec<Visit>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {VISIT_COLUMNS} FROM visits v
         WHERE v.customer_id = ?1 AND v.check_out IS NOT NULL AND v.deleted_at IS NULL
         ORDER BY v.check_in DESC"
    ))?;
    let visits = stmt.query_map(params![customer_id], map_visit)?;

    visits.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
}

/// 방문 기록을 삭제한다 (소프트 삭제)
pub fn soft_delete(conn: &Connection, id: i64, deleted_at: &str) -> AppResult<()> {
    let affected_rows = conn.execute(
        "UPDATE visits SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
        params![deleted_at, id],
    )?;

    if affected_rows == 0 {
        return Err(AppError::not_found("방문 기록"));
    }

    Ok(())
}

/// 삭제된 방문 기록을 복구한다
///
/// 이용 중이던 방문을 복구할 때 같은 고객의 다른 방문이 이용 중이면 Conflict.
pub fn restore(conn: &Connection, id: i64) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    let target: Option<(i64, Option<String>)> = tx
        .query_row(
            "SELECT customer_id, check_out FROM visits WHERE id = ?1",
            params![id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    let Some((customer_id, check_out)) = target else {
        return Err(AppError::not_found("방문 기록"));
    };

    if check_out.is_none() {
        if let Some(open_id) = find_open_visit_id(&tx, customer_id)? {
            if open_id != id {
                return Err(AppError::conflict(
                    "같은 고객이 이미 체크인 중이라 복구할 수 없습니다.",
                ));
            }
        }
    }

    tx.execute("UPDATE visits SET deleted_at = NULL WHERE id = ?1", params![id])?;
    tx.commit()?;

    Ok(())
}

/// 삭제된 방문 기록 (최근 삭제 순 10건)
pub fn find_deleted(conn: &Connection) -> AppResult<Vec<VisitDetail>> {
    query_details(
        conn,
        &format!(
            "SELECT {VISIT_COLUMNS}, {DETAIL_COLUMNS}
             FROM visits v
             LEFT JOIN customers c ON v.customer_id = c.id
             WHERE v.deleted_at IS NOT NULL
             ORDER BY v.deleted_at DESC, v.id DESC
             LIMIT ?1"
        ),
        params![TRASH_LIMIT],
    )
}
