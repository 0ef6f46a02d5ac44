//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use shared::models::{
    Employee, EmployeeAccountSet, EmployeeCreate, EmployeeRestaurant, LinkRequest, Role,
    UnlinkOutcome,
};

use crate::auth::password::hash_password;
use crate::core::ServerState;
use crate::db::repository::RepoError;
use crate::store::{EmployeeFilter, NewEmployee, NewLink};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_email, validate_optional_text,
    validate_password, validate_required_text, validate_username,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "employee";

fn employee_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found"))
        .with_detail("employee_id", id)
}

fn restaurant_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::RestaurantNotFound, format!("Restaurant {id} not found"))
        .with_detail("restaurant_id", id)
}

fn username_taken(username: &str) -> AppError {
    AppError::with_message(
        ErrorCode::EmployeeUsernameExists,
        format!("Username '{username}' is already taken"),
    )
}

async fn load_employee(state: &ServerState, id: i64) -> AppResult<Employee> {
    state
        .store
        .get_employee(id)
        .await?
        .ok_or_else(|| employee_not_found(id))
}

/// Validate username/password and hash the password
///
/// Admin usernames are reserved since login checks admins first.
async fn prepare_account(
    state: &ServerState,
    username: &str,
    password: &str,
) -> AppResult<(String, String)> {
    let username = username.trim();
    validate_username(username)?;
    validate_password(password)?;
    if state.store.find_admin_by_username(username).await?.is_some() {
        return Err(username_taken(username));
    }
    Ok((username.to_string(), hash_password(password)?))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub restaurant_id: Option<i64>,
}

/// List employees, optionally only those linked to one restaurant
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Employee>>> {
    let filter = match query.restaurant_id {
        Some(id) => EmployeeFilter::ByRestaurant(id),
        None => EmployeeFilter::All,
    };
    Ok(Json(state.store.list_employees(filter).await?))
}

pub async fn list_without_account(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Employee>>> {
    Ok(Json(state.store.list_employees_without_account().await?))
}

#[derive(Debug, Serialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub links: Vec<EmployeeRestaurant>,
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EmployeeDetail>> {
    let employee = load_employee(&state, id).await?;
    let links = state.store.list_employee_links(id).await?;
    Ok(Json(EmployeeDetail { employee, links }))
}

/// Create an employee with optional account, linked to at least one restaurant
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_email(&payload.email)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let mut roles: Vec<Role> = Vec::with_capacity(payload.roles.len());
    for role in payload.roles {
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    if roles.is_empty() {
        return Err(AppError::validation("at least one role is required"));
    }

    let (username, hash_pass) = match (&payload.username, &payload.password) {
        (Some(username), Some(password)) => {
            let (username, hash) = prepare_account(&state, username, password).await?;
            (Some(username), Some(hash))
        }
        (None, None) => (None, None),
        _ => {
            return Err(AppError::validation(
                "username and password must be provided together",
            ));
        }
    };

    let mut restaurant_ids: Vec<i64> = Vec::with_capacity(payload.restaurant_ids.len());
    for id in payload.restaurant_ids {
        if !restaurant_ids.contains(&id) {
            restaurant_ids.push(id);
        }
    }
    // 无关联的员工无法通过解除关联删除
    if restaurant_ids.is_empty() {
        return Err(AppError::validation("at least one restaurant is required"));
    }
    for id in &restaurant_ids {
        if state.store.get_restaurant(*id).await?.is_none() {
            return Err(restaurant_not_found(*id));
        }
    }
    let primary = match payload.primary_restaurant_id {
        Some(id) if restaurant_ids.contains(&id) => Some(id),
        Some(id) => {
            return Err(AppError::validation(format!(
                "primary_restaurant_id {id} is not in restaurant_ids"
            )));
        }
        None => restaurant_ids.first().copied(),
    };
    let links = restaurant_ids
        .into_iter()
        .map(|restaurant_id| NewLink {
            restaurant_id,
            primary_location: Some(restaurant_id) == primary,
        })
        .collect();

    let new_employee = NewEmployee {
        name: payload.name.trim().to_string(),
        email: payload.email.map(|e| e.trim().to_string()),
        phone: payload.phone,
        roles,
        username: username.clone(),
        hash_pass,
        links,
    };

    let employee = state
        .store
        .create_employee(new_employee)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => username_taken(username.as_deref().unwrap_or_default()),
            other => other.into(),
        })?;

    tracing::info!(resource = RESOURCE, id = employee.id, name = %employee.name, "Created");
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Create a login account for an employee that has none
pub async fn set_account(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeAccountSet>,
) -> AppResult<Json<Employee>> {
    let employee = load_employee(&state, id).await?;
    if employee.has_account() {
        return Err(AppError::new(ErrorCode::EmployeeHasAccount).with_detail("employee_id", id));
    }

    let (username, hash) = prepare_account(&state, &payload.username, &payload.password).await?;
    let employee = state
        .store
        .set_employee_credentials(id, &username, &hash)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => username_taken(&username),
            RepoError::NotFound(_) => employee_not_found(id),
            // Lost a race with another account creation
            RepoError::Validation(_) => {
                AppError::new(ErrorCode::EmployeeHasAccount).with_detail("employee_id", id)
            }
            other => other.into(),
        })?;

    tracing::info!(resource = RESOURCE, id, username = %username, "Account created");
    Ok(Json(employee))
}

/// Link an employee to a restaurant
pub async fn link(
    State(state): State<ServerState>,
    Path((id, restaurant_id)): Path<(i64, i64)>,
    Json(payload): Json<LinkRequest>,
) -> AppResult<(StatusCode, Json<EmployeeRestaurant>)> {
    load_employee(&state, id).await?;
    if state.store.get_restaurant(restaurant_id).await?.is_none() {
        return Err(restaurant_not_found(restaurant_id));
    }

    let link = state
        .store
        .link_employee_to_restaurant(id, restaurant_id, payload.primary_location)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::AlreadyLinked)
                .with_detail("employee_id", id)
                .with_detail("restaurant_id", restaurant_id),
            other => other.into(),
        })?;

    tracing::info!(employee_id = id, restaurant_id, primary = link.primary_location, "Employee linked");
    Ok((StatusCode::CREATED, Json(link)))
}

#[derive(Debug, Serialize)]
pub struct UnlinkResponse {
    pub outcome: UnlinkOutcome,
}

/// Remove a link; the last link deletes the employee
pub async fn unlink(
    State(state): State<ServerState>,
    Path((id, restaurant_id)): Path<(i64, i64)>,
) -> AppResult<Json<UnlinkResponse>> {
    load_employee(&state, id).await?;

    let outcome = state
        .store
        .unlink_employee_from_restaurant(id, restaurant_id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::new(ErrorCode::NotLinked)
                .with_detail("employee_id", id)
                .with_detail("restaurant_id", restaurant_id),
            other => other.into(),
        })?;

    // The employee's shifts at this restaurant are gone
    state.schedule.invalidate_restaurant(restaurant_id);

    tracing::info!(employee_id = id, restaurant_id, ?outcome, "Employee unlinked");
    Ok(Json(UnlinkResponse { outcome }))
}
