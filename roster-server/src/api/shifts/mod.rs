//! 班次 API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/shifts/check | POST | 试算，不写入 |
//! | /api/shifts | POST | 创建 (`confirm` 接受跨店冲突) |
//! | /api/shifts/{id} | GET | 查看 (员工限关联餐厅) |
//! | /api/shifts/{id} | DELETE | 删除 |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/shifts", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/check", post(handler::check))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
