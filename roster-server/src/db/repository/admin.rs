//! Admin Repository

use super::RepoResult;
use shared::models::Admin;
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Admin>> {
    let row = sqlx::query_as::<_, Admin>(
        "SELECT id, username, hash_pass, created_at FROM admin WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Admin>> {
    let row = sqlx::query_as::<_, Admin>(
        "SELECT id, username, hash_pass, created_at FROM admin WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert the admin if the username is free, otherwise return the existing row
///
/// An existing admin keeps its password; rotating it is a manual operation.
pub async fn ensure(pool: &SqlitePool, username: &str, hash_pass: &str) -> RepoResult<Admin> {
    sqlx::query(
        "INSERT INTO admin (id, username, hash_pass, created_at) VALUES (?, ?, ?, ?) \
         ON CONFLICT(username) DO NOTHING",
    )
    .bind(shared::util::snowflake_id())
    .bind(username)
    .bind(hash_pass)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;

    find_by_username(pool, username)
        .await?
        .ok_or_else(|| super::RepoError::Database(format!("Failed to create admin {username}")))
}
