//! Restaurant API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{Restaurant, RestaurantCreate, Shift, ShiftDetail};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::RepoError;
use crate::scheduling::{CalendarGrid, CalendarMode, CalendarView};
use crate::utils::time::{parse_date, parse_date_range};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "restaurant";

fn restaurant_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::RestaurantNotFound, format!("Restaurant {id} not found"))
        .with_detail("restaurant_id", id)
}

/// Load a restaurant the caller may view
///
/// Employees only see restaurants they are linked to.
async fn load_visible(state: &ServerState, user: &CurrentUser, id: i64) -> AppResult<Restaurant> {
    let restaurant = state
        .store
        .get_restaurant(id)
        .await?
        .ok_or_else(|| restaurant_not_found(id))?;

    if let Some(employee_id) = user.employee_id()
        && !state.schedule.is_linked(employee_id, id).await?
    {
        return Err(AppError::permission_denied(format!(
            "You are not assigned to {}",
            restaurant.name
        )));
    }
    Ok(restaurant)
}

/// List restaurants visible to the caller
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Restaurant>>> {
    let restaurants = match user.employee_id() {
        Some(id) => state.store.list_restaurants_for_employee(id).await?,
        None => state.store.list_restaurants().await?,
    };
    Ok(Json(restaurants))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Restaurant>> {
    Ok(Json(load_visible(&state, &user, id).await?))
}

/// Create a restaurant (admin)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<(StatusCode, Json<Restaurant>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let name = payload.name.trim().to_string();
    let restaurant = state
        .store
        .create_restaurant(payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::with_message(
                ErrorCode::RestaurantNameExists,
                format!("Restaurant '{name}' already exists"),
            ),
            other => other.into(),
        })?;

    tracing::info!(resource = RESOURCE, id = restaurant.id, name = %restaurant.name, "Created");
    Ok((StatusCode::CREATED, Json(restaurant)))
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    #[serde(default)]
    pub mode: CalendarMode,
    /// Reference date (YYYY-MM-DD); defaults to today
    pub date: Option<String>,
}

/// Month/week grid with shifts bucketed by date and role
pub async fn calendar(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<CalendarGrid<ShiftDetail>>> {
    load_visible(&state, &user, id).await?;

    let today = shared::util::today();
    let reference = match query.date.as_deref() {
        Some(date) => parse_date(date)?,
        None => today,
    };
    let view = CalendarView::new(query.mode, reference);
    let grid = state.schedule.calendar(id, view, today).await?;
    Ok(Json(grid))
}

#[derive(Debug, Deserialize)]
pub struct ShiftRangeQuery {
    pub start_date: String,
    pub end_date: String,
}

/// Shifts in an inclusive date range
pub async fn shifts(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Query(query): Query<ShiftRangeQuery>,
) -> AppResult<Json<Vec<Shift>>> {
    let range = parse_date_range(&query.start_date, &query.end_date)?;
    load_visible(&state, &user, id).await?;
    let shifts = state.schedule.list_shifts(id, range).await?;
    Ok(Json(shifts.as_ref().clone()))
}
