//! API 路由模块
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录与当前身份
//! - [`restaurants`] - 餐厅、日历、班次查询
//! - [`employees`] - 员工与餐厅关联管理
//! - [`shifts`] - 排班校验、创建、删除
//! - [`me`] - 员工本人视图

pub mod auth;
pub mod employees;
pub mod health;
pub mod me;
pub mod restaurants;
pub mod shifts;

use std::time::Duration;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Auth API - login is public, /me requires authentication
        .merge(auth::router())
        // Restaurants - read: authenticated, write: admin
        .merge(restaurants::router())
        // Employees - admin only
        .merge(employees::router())
        // Shifts - read: authenticated, write: admin
        .merge(shifts::router())
        // Staff self-service - employee only
        .merge(me::router())
}

/// Build a fully configured application with all middleware
///
/// Used by both the HTTP server and in-process tests
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    let x_request_id = HeaderName::from_static("x-request-id");

    build_router()
        // ========== Application Middleware ==========
        // JWT authentication - injects CurrentUser
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        // ========== Tower HTTP Middleware ==========
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_millis(state.config.request_timeout_ms),
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        // Request ID - outermost so every log line carries it
        .layer(SetRequestIdLayer::new(x_request_id, XRequestId))
}
