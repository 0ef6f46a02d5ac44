//! Roster error codes
//!
//! Grouped by range:
//! - 0xxx: General
//! - 1xxx: Authentication
//! - 2xxx: Permission
//! - 4xxx: Restaurant
//! - 5xxx: Schedule (shift)
//! - 8xxx: Employee
//! - 9xxx: System

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code carried in every error response
///
/// Serialized as a bare number so clients can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    ValidationFailed = 2,
    /// Storage-level miss with no more specific code
    NotFound = 3,
    /// Storage-level uniqueness violation with no more specific code
    AlreadyExists = 4,

    // ==================== 1xxx: Auth ====================
    NotAuthenticated = 1001,
    InvalidCredentials = 1002,
    TokenExpired = 1003,
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Employee touching a restaurant they are not linked to
    PermissionDenied = 2001,
    AdminRequired = 2003,
    /// Caller must be mapped to an employee record
    EmployeeRequired = 2006,

    // ==================== 4xxx: Restaurant ====================
    RestaurantNotFound = 4001,
    RestaurantNameExists = 4002,

    // ==================== 5xxx: Schedule ====================
    ShiftNotFound = 5001,
    /// Employee does not hold the requested role
    RoleMismatch = 5002,
    /// Role is restricted to other restaurants
    RoleNotOffered = 5003,
    /// One shift per employee per restaurant per day
    DuplicateShift = 5004,
    InvalidShiftTime = 5006,
    InvalidDateRange = 5007,

    // ==================== 8xxx: Employee ====================
    EmployeeNotFound = 8001,
    EmployeeUsernameExists = 8002,
    AlreadyLinked = 8003,
    NotLinked = 8004,
    EmployeeHasAccount = 8005,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Every code, in numeric order
    pub const ALL: [ErrorCode; 25] = [
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::NotAuthenticated,
        ErrorCode::InvalidCredentials,
        ErrorCode::TokenExpired,
        ErrorCode::TokenInvalid,
        ErrorCode::PermissionDenied,
        ErrorCode::AdminRequired,
        ErrorCode::EmployeeRequired,
        ErrorCode::RestaurantNotFound,
        ErrorCode::RestaurantNameExists,
        ErrorCode::ShiftNotFound,
        ErrorCode::RoleMismatch,
        ErrorCode::RoleNotOffered,
        ErrorCode::DuplicateShift,
        ErrorCode::InvalidShiftTime,
        ErrorCode::InvalidDateRange,
        ErrorCode::EmployeeNotFound,
        ErrorCode::EmployeeUsernameExists,
        ErrorCode::AlreadyLinked,
        ErrorCode::NotLinked,
        ErrorCode::EmployeeHasAccount,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default message, used when no more specific one is given
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::EmployeeRequired => "Caller is not linked to an employee",

            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::RestaurantNameExists => "Restaurant name already exists",

            ErrorCode::ShiftNotFound => "Shift not found",
            ErrorCode::RoleMismatch => "Employee does not have the requested role",
            ErrorCode::RoleNotOffered => "Role is not offered at this restaurant",
            ErrorCode::DuplicateShift => {
                "Employee already has a shift at this restaurant on this date"
            }
            ErrorCode::InvalidShiftTime => "Shift start and end time must differ",
            ErrorCode::InvalidDateRange => "Start date must not be after end date",

            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeUsernameExists => "Employee username already exists",
            ErrorCode::AlreadyLinked => "Employee is already linked to this restaurant",
            ErrorCode::NotLinked => "Employee is not linked to this restaurant",
            ErrorCode::EmployeeHasAccount => "Employee already has an account",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Unknown numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ErrorCode::ALL
            .into_iter()
            .find(|c| c.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
