//! Restaurant Repository

use super::RepoResult;
use shared::models::{Restaurant, RestaurantCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, address, phone, created_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Restaurant>> {
    let rows = sqlx::query_as::<_, Restaurant>(&format!(
        "SELECT {COLUMNS} FROM restaurant ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Restaurant>> {
    let row = sqlx::query_as::<_, Restaurant>(&format!(
        "SELECT {COLUMNS} FROM restaurant WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Restaurants an employee is linked to, primary location first
pub async fn find_by_employee(pool: &SqlitePool, employee_id: i64) -> RepoResult<Vec<Restaurant>> {
    let rows = sqlx::query_as::<_, Restaurant>(
        "SELECT r.id, r.name, r.address, r.phone, r.created_at FROM restaurant r \
         JOIN employee_restaurant er ON er.restaurant_id = r.id \
         WHERE er.employee_id = ? ORDER BY er.primary_location DESC, r.name",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: RestaurantCreate) -> RepoResult<Restaurant> {
    let restaurant = Restaurant {
        id: shared::util::snowflake_id(),
        name: data.name.trim().to_string(),
        address: data.address,
        phone: data.phone,
        created_at: shared::util::now_millis(),
    };
    sqlx::query("INSERT INTO restaurant (id, name, address, phone, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(restaurant.id)
        .bind(&restaurant.name)
        .bind(&restaurant.address)
        .bind(&restaurant.phone)
        .bind(restaurant.created_at)
        .execute(pool)
        .await?;
    Ok(restaurant)
}
