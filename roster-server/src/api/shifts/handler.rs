//! Shift API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{Shift, ShiftCreate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::scheduling::{AssignmentDecision, ShiftProposal};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct CreateShiftRequest {
    #[serde(flatten)]
    pub shift: ShiftCreate,
    /// Accept same-day shifts at other restaurants
    #[serde(default)]
    pub confirm: bool,
}

/// Dry-run the assignment rules
pub async fn check(
    State(state): State<ServerState>,
    Json(payload): Json<ShiftCreate>,
) -> AppResult<Json<AssignmentDecision>> {
    Ok(Json(state.schedule.check_assignment(payload).await?))
}

/// Create a shift
///
/// `201` with the shift when written, `200` with the conflicts when the
/// request needs `confirm: true`.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateShiftRequest>,
) -> AppResult<(StatusCode, Json<ShiftProposal>)> {
    let proposal = state
        .schedule
        .propose_shift(payload.shift, payload.confirm)
        .await?;
    let status = match proposal {
        ShiftProposal::Created { .. } => StatusCode::CREATED,
        ShiftProposal::ConfirmationRequired { .. } => StatusCode::OK,
    };
    Ok((status, Json(proposal)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Shift>> {
    let not_found =
        || AppError::with_message(ErrorCode::ShiftNotFound, format!("Shift {id} not found"));
    let shift = state.store.get_shift(id).await?.ok_or_else(not_found)?;

    if let Some(employee_id) = user.employee_id()
        && !state.schedule.is_linked(employee_id, shift.restaurant_id).await?
    {
        // Same answer as a missing shift
        return Err(not_found());
    }
    Ok(Json(shift))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Shift>> {
    Ok(Json(state.schedule.delete_shift(id).await?))
}
