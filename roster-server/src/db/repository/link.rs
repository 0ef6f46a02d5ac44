//! Employee-Restaurant Link Repository
//!
//! Each linked employee has exactly one primary location. The first link
//! becomes primary; removing the primary promotes the oldest remaining link.

use super::{RepoError, RepoResult};
use shared::models::{EmployeeRestaurant, UnlinkOutcome};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "employee_id, restaurant_id, primary_location, created_at";

pub async fn find_by_employee(
    pool: &SqlitePool,
    employee_id: i64,
) -> RepoResult<Vec<EmployeeRestaurant>> {
    let rows = sqlx::query_as::<_, EmployeeRestaurant>(&format!(
        "SELECT {COLUMNS} FROM employee_restaurant WHERE employee_id = ? \
         ORDER BY primary_location DESC, created_at"
    ))
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn count_for_employee(conn: &mut SqliteConnection, employee_id: i64) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employee_restaurant WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_one(conn)
            .await?;
    Ok(count)
}

/// Link an employee to a restaurant
///
/// Fails with `Duplicate` when the link already exists.
pub async fn create(
    pool: &SqlitePool,
    employee_id: i64,
    restaurant_id: i64,
    primary_location: bool,
) -> RepoResult<EmployeeRestaurant> {
    let mut tx = pool.begin().await?;

    let primary = primary_location || count_for_employee(&mut tx, employee_id).await? == 0;
    if primary {
        sqlx::query("UPDATE employee_restaurant SET primary_location = 0 WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
    }

    let link = EmployeeRestaurant {
        employee_id,
        restaurant_id,
        primary_location: primary,
        created_at: shared::util::now_millis(),
    };
    sqlx::query(
        "INSERT INTO employee_restaurant (employee_id, restaurant_id, primary_location, created_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(link.employee_id)
    .bind(link.restaurant_id)
    .bind(link.primary_location)
    .bind(link.created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(link)
}

/// Remove a link
///
/// The employee's shifts at that restaurant go with it. Removing the last
/// link deletes the employee (shifts cascade through the foreign key).
pub async fn remove(
    pool: &SqlitePool,
    employee_id: i64,
    restaurant_id: i64,
) -> RepoResult<UnlinkOutcome> {
    let mut tx = pool.begin().await?;

    let was_primary: Option<bool> = sqlx::query_scalar(
        "DELETE FROM employee_restaurant WHERE employee_id = ? AND restaurant_id = ? \
         RETURNING primary_location",
    )
    .bind(employee_id)
    .bind(restaurant_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(was_primary) = was_primary else {
        return Err(RepoError::NotFound(format!(
            "Employee {employee_id} is not linked to restaurant {restaurant_id}"
        )));
    };

    sqlx::query("DELETE FROM shift WHERE employee_id = ? AND restaurant_id = ?")
        .bind(employee_id)
        .bind(restaurant_id)
        .execute(&mut *tx)
        .await?;

    let outcome = if count_for_employee(&mut tx, employee_id).await? == 0 {
        sqlx::query("DELETE FROM employee WHERE id = ?")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
        UnlinkOutcome::EmployeeDeleted
    } else {
        if was_primary {
            sqlx::query(
                "UPDATE employee_restaurant SET primary_location = 1 \
                 WHERE employee_id = ?1 AND restaurant_id = ( \
                     SELECT restaurant_id FROM employee_restaurant \
                     WHERE employee_id = ?1 ORDER BY created_at, restaurant_id LIMIT 1)",
            )
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
        }
        UnlinkOutcome::LinkRemoved
    };

    tx.commit().await?;
    Ok(outcome)
}
