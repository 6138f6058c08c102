use crate::features::reservations::models::{
    CreateReservationDto, Reservation, ReservationDetail, ReservationQuery, UpdateReservationDto,
    DEFAULT_STATUS,
};
use crate::shared::errors::{AppError, AppResult};
use rusqlite::{params, Connection, Row};

/// 전체 예약 조회 최대 건수
const ALL_LIMIT: i64 = 500;

const RESERVATION_COLUMNS: &str = "r.id, r.customer_id, r.start_date, r.end_date, r.notes, \
     r.status, r.created_at, r.deleted_at";

fn map_reservation(row: &Row<'_>) -> rusqlite::Result<Reservation> {
    Ok(Reservation {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        start_date: row.get(2)?,
        end_date: row.get(3)?,
        notes: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
        deleted_at: row.get(7)?,
    })
}

fn map_reservation_detail(row: &Row<'_>) -> rusqlite::Result<ReservationDetail> {
    Ok(ReservationDetail {
        reservation: map_reservation(row)?,
        customer_name: row.get(8)?,
        dog_name: row.get(9)?,
        phone: row.get(10)?,
        breed: row.get(11)?,
    })
}

fn detail_query(condition: &str, tail: &str) -> String {
    format!(
        "SELECT {RESERVATION_COLUMNS}, c.customer_name, c.dog_name, c.phone, c.breed
         FROM hoteling_reservations r
         JOIN customers c ON r.customer_id = c.id
         WHERE r.deleted_at IS NULL AND c.deleted_at IS NULL {condition}
         {tail}"
    )
}

/// 예약을 만든다
///
/// # 인자
/// * `conn` - 데이터베이스 연결
/// * `dto` - 검증을 마친 예약 정보
/// * `created_at` - 생성 시각 (KST 현지 시각 문자열)
pub fn create(
    conn: &Connection,
    dto: &CreateReservationDto,
    created_at: &str,
) -> AppResult<ReservationDetail> {
    conn.execute(
        "INSERT INTO hoteling_reservations (customer_id, start_date, end_date, notes, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            dto.customer_id,
            dto.start_date,
            dto.end_date,
            dto.notes,
            DEFAULT_STATUS,
            created_at
        ],
    )?;

    let id = conn.last_insert_rowid();
    find_by_id(conn, id)
}

/// ID로 예약을 조회한다
pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<ReservationDetail> {
    conn.query_row(
        &detail_query("AND r.id = ?1", ""),
        params![id],
        map_reservation_detail,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::not_found("예약"),
        _ => AppError::from(e),
    })
}

/// 조건에 맞는 예약 목록
///
/// - 날짜: 시작일 ≤ 날짜 ≤ 종료일
/// - 기간: 기간과 하루라도 겹치는 예약
/// - 전체: 최근 시작일 순 500건
pub fn find(conn: &Connection, query: &ReservationQuery) -> AppResult<Vec<ReservationDetail>> {
    let (sql, values): (String, Vec<&dyn rusqlite::ToSql>) = match query {
        ReservationQuery::All => (
            detail_query("", "ORDER BY r.start_date DESC, r.id DESC LIMIT ?1"),
            vec![&ALL_LIMIT as &dyn rusqlite::ToSql],
        ),
        ReservationQuery::Date(date) => (
            detail_query(
                "AND r.start_date <= ?1 AND r.end_date >= ?1",
                "ORDER BY r.start_date ASC, r.id ASC",
            ),
            vec![date as &dyn rusqlite::ToSql],
        ),
        ReservationQuery::Range { start, end } => (
            detail_query(
                "AND r.start_date <= ?2 AND r.end_date >= ?1",
                "ORDER BY r.start_date ASC, r.id ASC",
            ),
            vec![start as &dyn rusqlite::ToSql, end],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let reservations = stmt.query_map(values.as_slice(), map_reservation_detail)?;

    reservations
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::from)
}

/// 고객의 예약 목록 (최근 시작일 순)
pub fn find_by_customer(conn: &Connection, customer_id: i64) -> AppResult<Vec<Reservation>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RESERVATION_COLUMNS} FROM hoteling_reservations r
         WHERE r.customer_id = ?1 AND r.deleted_at IS NULL
         ORDER BY r.start_date DESC"
    ))?;
    let reservations = stmt.query_map(params![customer_id], map_reservation)?;

    reservations
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::from)
}

/// 예약을 수정한다
pub fn update(
    conn: &Connection,
    id: i64,
    dto: &UpdateReservationDto,
) -> AppResult<ReservationDetail> {
    let affected_rows = conn.execute(
        "UPDATE hoteling_reservations
         SET start_date = ?1, end_date = ?2, notes = ?3, status = ?4
         WHERE id = ?5 AND deleted_at IS NULL",
        params![dto.start_date, dto.end_date, dto.notes, dto.status, id],
    )?;

    if affected_rows == 0 {
        return Err(AppError::not_found("예약"));
    }

    find_by_id(conn, id)
}

/// 예약을 삭제한다 (소프트 삭제)
pub fn soft_delete(conn: &Connection, id: i64, deleted_at: &str) -> AppResult<()> {
    let affected_rows = conn.execute(
        "UPDATE hoteling_reservations SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
        params![deleted_at, id],
    )?;

    if affected_rows == 0 {
        return Err(AppError::not_found("예약"));
    }

    Ok(())
}
