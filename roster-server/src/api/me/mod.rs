//! 员工自助 API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/me/shifts | GET | 今天起的班次 (`?from=` 可选) |
//! | /api/me/restaurants | GET | 关联餐厅 (主店优先) |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_employee;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/me", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/shifts", get(handler::shifts))
        .route("/restaurants", get(handler::restaurants))
        .layer(middleware::from_fn(require_employee))
}
