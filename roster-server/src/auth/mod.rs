//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`IdentityResolver`] - 凭据 → 身份
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] / [`require_admin`] / [`require_employee`] - 中间件
//! - [`password`] - Argon2 哈希

pub mod extractor;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use identity::IdentityResolver;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_employee};
