//! Shift Repository

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{DateRange, Shift, ShiftCreate, ShiftDetail};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, restaurant_id, employee_id, shift_date, role, period, start_time, end_time, notes, created_at";

const DETAIL_SELECT: &str = "SELECT s.id, s.restaurant_id, s.employee_id, s.shift_date, s.role, s.period, \
     s.start_time, s.end_time, s.notes, s.created_at, \
     e.name AS employee_name, r.name AS restaurant_name \
     FROM shift s \
     JOIN employee e ON e.id = s.employee_id \
     JOIN restaurant r ON r.id = s.restaurant_id";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Shift>> {
    let row = sqlx::query_as::<_, Shift>(&format!("SELECT {COLUMNS} FROM shift WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Shifts of a restaurant inside an inclusive date window
pub async fn find_by_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
    range: DateRange,
) -> RepoResult<Vec<Shift>> {
    let rows = sqlx::query_as::<_, Shift>(&format!(
        "SELECT {COLUMNS} FROM shift \
         WHERE restaurant_id = ? AND shift_date >= ? AND shift_date <= ? \
         ORDER BY shift_date, start_time"
    ))
    .bind(restaurant_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// All shifts of an employee on one date, across restaurants
pub async fn find_by_employee_on(
    pool: &SqlitePool,
    employee_id: i64,
    date: NaiveDate,
) -> RepoResult<Vec<ShiftDetail>> {
    let rows = sqlx::query_as::<_, ShiftDetail>(&format!(
        "{DETAIL_SELECT} WHERE s.employee_id = ? AND s.shift_date = ? ORDER BY r.name"
    ))
    .bind(employee_id)
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Shifts of an employee from `from` (inclusive) onwards
pub async fn find_upcoming_for_employee(
    pool: &SqlitePool,
    employee_id: i64,
    from: NaiveDate,
) -> RepoResult<Vec<ShiftDetail>> {
    let rows = sqlx::query_as::<_, ShiftDetail>(&format!(
        "{DETAIL_SELECT} WHERE s.employee_id = ? AND s.shift_date >= ? \
         ORDER BY s.shift_date, s.start_time, r.name"
    ))
    .bind(employee_id)
    .bind(from)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert a shift
///
/// The `(employee_id, restaurant_id, shift_date)` unique constraint surfaces
/// as `RepoError::Duplicate`.
pub async fn create(pool: &SqlitePool, data: ShiftCreate) -> RepoResult<Shift> {
    let shift = Shift {
        id: shared::util::snowflake_id(),
        restaurant_id: data.restaurant_id,
        employee_id: data.employee_id,
        shift_date: data.shift_date,
        role: data.role,
        period: data.period,
        start_time: data.start_time,
        end_time: data.end_time,
        notes: data.notes,
        created_at: shared::util::now_millis(),
    };
    sqlx::query(&format!(
        "INSERT INTO shift ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(shift.id)
    .bind(shift.restaurant_id)
    .bind(shift.employee_id)
    .bind(shift.shift_date)
    .bind(shift.role)
    .bind(shift.period)
    .bind(&shift.start_time)
    .bind(&shift.end_time)
    .bind(&shift.notes)
    .bind(shift.created_at)
    .execute(pool)
    .await?;
    Ok(shift)
}

/// Delete a shift, returning the deleted row
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<Shift> {
    let row = sqlx::query_as::<_, Shift>(&format!(
        "DELETE FROM shift WHERE id = ? RETURNING {COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::NotFound(format!("Shift {id} not found")))
}
