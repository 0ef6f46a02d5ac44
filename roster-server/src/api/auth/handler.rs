//! Authentication Handlers

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::Serialize;
use shared::models::{Employee, Identity, LoginRequest, LoginResponse, Restaurant};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, AppResult};

/// Fixed delay applied to failed logins
const AUTH_FAILURE_DELAY_MS: u64 = 300;

/// Login handler
///
/// Admin accounts are checked before employee accounts. Both failure modes
/// (unknown user, wrong password) return the same error.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::validation("username and password are required"));
    }

    let verified = state
        .identity
        .verify_credentials(&req.username, &req.password)
        .await?;

    let Some((identity, username)) = verified else {
        tokio::time::sleep(Duration::from_millis(AUTH_FAILURE_DELAY_MS)).await;
        security_log!("WARN", "login_failed", username = req.username.clone());
        return Err(AppError::invalid_credentials());
    };

    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(identity, &username)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    security_log!(
        "INFO",
        "login_success",
        username = username.clone(),
        admin = identity.is_admin()
    );

    Ok(Json(LoginResponse {
        token,
        identity,
        expires_in: jwt_service.config.expiration_minutes * 60,
    }))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub identity: Identity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,
    /// Restaurants the caller may view; every restaurant for admins
    pub restaurants: Vec<Restaurant>,
}

/// Current identity with its employee record
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<MeResponse>> {
    let (employee, restaurants) = match user.identity {
        Identity::Employee { id } => (
            state.store.get_employee(id).await?,
            state.store.list_restaurants_for_employee(id).await?,
        ),
        _ => (None, state.store.list_restaurants().await?),
    };

    Ok(Json(MeResponse {
        username: user.username,
        identity: user.identity,
        employee,
        restaurants,
    }))
}
