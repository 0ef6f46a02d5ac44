//! Employee Repository

use super::{RepoError, RepoResult};
use crate::store::NewEmployee;
use shared::models::Employee;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, email, phone, roles, username, hash_pass, created_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let rows = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Employees linked to a restaurant
pub async fn find_by_restaurant(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<Employee>> {
    let rows = sqlx::query_as::<_, Employee>(
        "SELECT e.id, e.name, e.email, e.phone, e.roles, e.username, e.hash_pass, e.created_at \
         FROM employee e JOIN employee_restaurant er ON er.employee_id = e.id \
         WHERE er.restaurant_id = ? ORDER BY e.name",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let row = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Employee>> {
    let row = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE username = ? LIMIT 1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_without_account(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let rows = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE username IS NULL OR hash_pass IS NULL ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert the employee and its restaurant links in one transaction
pub async fn create(pool: &SqlitePool, data: NewEmployee) -> RepoResult<Employee> {
    let roles = serde_json::to_string(&data.roles)
        .map_err(|e| RepoError::Validation(format!("Invalid roles: {e}")))?;
    let employee = Employee {
        id: shared::util::snowflake_id(),
        name: data.name,
        email: data.email,
        phone: data.phone,
        roles: data.roles,
        username: data.username,
        hash_pass: data.hash_pass,
        created_at: shared::util::now_millis(),
    };

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO employee (id, name, email, phone, roles, username, hash_pass, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(employee.id)
    .bind(&employee.name)
    .bind(&employee.email)
    .bind(&employee.phone)
    .bind(&roles)
    .bind(&employee.username)
    .bind(&employee.hash_pass)
    .bind(employee.created_at)
    .execute(&mut *tx)
    .await?;

    for link in &data.links {
        sqlx::query(
            "INSERT INTO employee_restaurant (employee_id, restaurant_id, primary_location, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(employee.id)
        .bind(link.restaurant_id)
        .bind(link.primary_location)
        .bind(employee.created_at)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(employee)
}

/// Set login credentials; only succeeds for an employee without an account
pub async fn set_credentials(
    pool: &SqlitePool,
    id: i64,
    username: &str,
    hash_pass: &str,
) -> RepoResult<Employee> {
    let rows = sqlx::query(
        "UPDATE employee SET username = ?, hash_pass = ? \
         WHERE id = ? AND (username IS NULL OR hash_pass IS NULL)",
    )
    .bind(username)
    .bind(hash_pass)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return match find_by_id(pool, id).await? {
            Some(_) => Err(RepoError::Validation(format!(
                "Employee {id} already has an account"
            ))),
            None => Err(RepoError::NotFound(format!("Employee {id} not found"))),
        };
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}
