use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::core::ServerError;
use crate::scheduling::RoleRestrictions;

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    /// 进程内存储，重启后数据丢失
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(ServerError::Config(format!(
                "STORE_BACKEND must be `sqlite` or `memory`, got `{other}`"
            ))),
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_URL | <WORK_DIR>/database/roster.db | SQLite 路径或 `sqlite:` URL |
/// | STORE_BACKEND | sqlite | `sqlite` \| `memory` |
/// | ENVIRONMENT | development | 运行环境 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | ADMIN_USERNAME | admin | 初始管理员 |
/// | ADMIN_PASSWORD | - | 初始管理员密码 (生产环境必填) |
/// | ROLE_RESTRICTIONS | - | 例如 `gelato=Gelateria Centrale;door=Trattoria` |
/// | JWT_SECRET / JWT_EXPIRATION_MINUTES / JWT_ISSUER / JWT_AUDIENCE | - | 见 [`JwtConfig`] |
///
/// `LOG_LEVEL` / `LOG_DIR` / `LOG_FORMAT` 由 [`crate::setup_environment`] 在加载配置之前读取。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/roster HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存放数据库和日志
    pub work_dir: String,
    pub http_port: u16,
    pub database_url: String,
    pub store_backend: StoreBackend,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    pub admin_username: String,
    pub admin_password: Option<String>,
    pub role_restrictions: RoleRestrictions,
    /// JWT 认证配置
    pub jwt: JwtConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的项使用默认值；格式错误的 `ROLE_RESTRICTIONS` /
    /// `STORE_BACKEND` 以及生产环境缺失的密钥返回错误。
    pub fn from_env() -> Result<Self, ServerError> {
        let work_dir = env_or("WORK_DIR", "./data");
        let environment = env_or("ENVIRONMENT", "development");
        let production = environment == "production";

        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("database")
                .join("roster.db")
                .to_string_lossy()
                .into_owned()
        });

        let store_backend = match std::env::var("STORE_BACKEND") {
            Ok(v) => v.parse()?,
            Err(_) => StoreBackend::Sqlite,
        };

        let role_restrictions = match std::env::var("ROLE_RESTRICTIONS") {
            Ok(v) => RoleRestrictions::parse(&v)
                .map_err(|e| ServerError::Config(format!("ROLE_RESTRICTIONS: {e}")))?,
            Err(_) => RoleRestrictions::default(),
        };

        let admin_password = std::env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty());
        if production && admin_password.is_none() {
            return Err(ServerError::Config(
                "ADMIN_PASSWORD must be set in production".to_string(),
            ));
        }

        let jwt = JwtConfig::from_env(production).map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(Self {
            work_dir,
            http_port: env_parse("HTTP_PORT", 3000),
            database_url,
            store_backend,
            environment,
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30_000),
            admin_username: env_or("ADMIN_USERNAME", "admin"),
            admin_password,
            role_restrictions,
            jwt,
        })
    }

    /// 不读取环境变量的配置 (内存存储)
    ///
    /// 常用于测试场景
    pub fn for_tests(jwt_secret: impl Into<String>) -> Self {
        Self {
            work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
            http_port: 0,
            database_url: "sqlite::memory:".to_string(),
            store_backend: StoreBackend::Memory,
            environment: "test".to_string(),
            request_timeout_ms: 30_000,
            admin_username: "admin".to_string(),
            admin_password: None,
            role_restrictions: RoleRestrictions::default(),
            jwt: JwtConfig::with_secret(jwt_secret),
        }
    }

    /// 数据库目录 (`DATABASE_URL` 为文件路径时其父目录)
    pub fn database_dir(&self) -> Option<PathBuf> {
        let path = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))
            .unwrap_or(&self.database_url);
        if path.starts_with(':') {
            return None;
        }
        PathBuf::from(path).parent().map(PathBuf::from)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("sqlite".parse::<StoreBackend>().unwrap(), StoreBackend::Sqlite);
        assert_eq!(" Memory ".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("postgres".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_database_dir() {
        let mut config = Config::for_tests("x".repeat(32));
        assert_eq!(config.database_dir(), None);

        config.database_url = "data/database/roster.db".into();
        assert_eq!(config.database_dir(), Some(PathBuf::from("data/database")));

        config.database_url = "sqlite://var/roster.db".into();
        assert_eq!(config.database_dir(), Some(PathBuf::from("var")));
    }

    #[test]
    fn test_environment_flags() {
        let mut config = Config::for_tests("x".repeat(32));
        assert!(!config.is_production());
        config.environment = "production".into();
        assert!(config.is_production());
        assert!(!config.is_development());
    }
}
