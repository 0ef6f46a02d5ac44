//! Staff self-service handlers

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::models::{Restaurant, ShiftDetail};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::time::parse_date;
use crate::utils::{AppError, AppResult, ErrorCode};

fn employee_id(user: &CurrentUser) -> AppResult<i64> {
    user.employee_id()
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeRequired))
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    /// YYYY-MM-DD, defaults to today
    pub from: Option<String>,
}

/// My shifts from a date on, across all restaurants
pub async fn shifts(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<UpcomingQuery>,
) -> AppResult<Json<Vec<ShiftDetail>>> {
    let id = employee_id(&user)?;
    let from = match query.from.as_deref() {
        Some(date) => parse_date(date)?,
        None => shared::util::today(),
    };
    Ok(Json(
        state.store.list_upcoming_shifts_for_employee(id, from).await?,
    ))
}

/// Restaurants I work at, primary location first
pub async fn restaurants(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Restaurant>>> {
    let id = employee_id(&user)?;
    Ok(Json(state.store.list_restaurants_for_employee(id).await?))
}
