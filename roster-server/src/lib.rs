//! Roster Server - 餐厅员工排班服务
//!
//! # 架构概述
//!
//! - **排班规则** (`scheduling`): 分配校验、日历投影、窗口缓存
//! - **存储** (`store`): `ScheduleStore` 端口，SQLite 与内存两种实现
//! - **数据库** (`db`): SQLite 连接池、迁移、仓储函数
//! - **认证** (`auth`): JWT + Argon2，本地账号身份解析
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! roster-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、身份解析、中间件
//! ├── scheduling/    # 规则校验、日历、缓存、排班服务
//! ├── store/         # 持久化端口及实现
//! ├── db/            # SQLite 仓储
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、校验、时间工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod scheduling;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use scheduling::{AssignmentDecision, CalendarGrid, CalendarMode, ScheduleService};
pub use store::{MemoryStore, ScheduleStore, SqliteStore};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorCategory, ErrorCode, ErrorResponse};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 .env、初始化日志
///
/// 日志级别与目录在 `Config` 之前读取，保证配置加载过程本身也有日志输出。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let log_dir = std::env::var("LOG_DIR").ok();
    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    init_logger_with_file(Some(&log_level), json, log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____             __
   / __ \____  _____/ /____  _____
  / /_/ / __ \/ ___/ __/ _ \/ ___/
 / _, _/ /_/ (__  ) /_/  __/ /
/_/ |_|\____/____/\__/\___/_/
    "#
    );
}
