//! HTTP status for each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// No wildcard arm, every code maps explicitly
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::ValidationFailed | Self::InvalidShiftTime | Self::InvalidDateRange => {
                StatusCode::BAD_REQUEST
            }

            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied | Self::AdminRequired | Self::EmployeeRequired => {
                StatusCode::FORBIDDEN
            }

            Self::NotFound
            | Self::RestaurantNotFound
            | Self::ShiftNotFound
            | Self::EmployeeNotFound
            | Self::NotLinked => StatusCode::NOT_FOUND,

            Self::AlreadyExists
            | Self::RestaurantNameExists
            | Self::DuplicateShift
            | Self::EmployeeUsernameExists
            | Self::AlreadyLinked
            | Self::EmployeeHasAccount => StatusCode::CONFLICT,

            // 业务规则拒绝
            Self::RoleMismatch | Self::RoleNotOffered => StatusCode::UNPROCESSABLE_ENTITY,

            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
