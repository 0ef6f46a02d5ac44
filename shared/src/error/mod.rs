//! Unified error system
//!
//! - [`ErrorCode`]: numeric code per failure, grouped by range
//! - [`ErrorCategory`]: range → domain
//! - [`AppError`]: code + message + optional structured details
//! - [`ErrorResponse`]: the JSON body of every failed request
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::RoleMismatch).with_detail("role", "door");
//! assert_eq!(err.code.code(), 5002);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorResponse};
