//! 餐厅 API 模块
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/restaurants | GET | 登录 (员工只看到关联餐厅) |
//! | /api/restaurants | POST | 管理员 |
//! | /api/restaurants/{id} | GET | 登录 + 关联 |
//! | /api/restaurants/{id}/calendar | GET | 登录 + 关联 |
//! | /api/restaurants/{id}/shifts | GET | 登录 + 关联 |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/calendar", get(handler::calendar))
        .route("/{id}/shifts", get(handler::shifts));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
