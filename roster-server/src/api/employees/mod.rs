//! 员工 API 模块
//!
//! 员工管理与餐厅关联，仅管理员可用。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/employees", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/without-account", get(handler::list_without_account))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/account", put(handler::set_account))
        .route(
            "/{id}/restaurants/{restaurant_id}",
            post(handler::link).delete(handler::unlink),
        )
        .layer(middleware::from_fn(require_admin))
}
