use std::sync::Arc;

use crate::auth::password::hash_password;
use crate::auth::{IdentityResolver, JwtService};
use crate::core::{Config, ServerError, StoreBackend};
use crate::db::DbService;
use crate::scheduling::{AssignmentChecker, ScheduleService};
use crate::store::{MemoryStore, ScheduleStore, SqliteStore};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<dyn ScheduleStore> | 持久化端口 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | identity | IdentityResolver | 凭据 → 身份 |
/// | schedule | ScheduleService | 排班校验、缓存 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: Arc<dyn ScheduleStore>,
    pub jwt_service: Arc<JwtService>,
    pub identity: IdentityResolver,
    pub schedule: ScheduleService,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("environment", &self.config.environment)
            .field("store_backend", &self.config.store_backend)
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 使用给定存储组装状态 (不做 admin 引导)
    pub fn with_store(config: Config, store: Arc<dyn ScheduleStore>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let identity = IdentityResolver::new(jwt_service.clone(), store.clone());
        let schedule = ScheduleService::new(
            store.clone(),
            AssignmentChecker::new(config.role_restrictions.clone()),
        );
        Self {
            config,
            store,
            jwt_service,
            identity,
            schedule,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序：
    /// 1. 存储 (SQLite: 创建目录、连接、迁移)
    /// 2. 管理员账号引导 (`ADMIN_USERNAME` / `ADMIN_PASSWORD`)
    pub async fn initialize(config: &Config) -> Result<Self, ServerError> {
        let store: Arc<dyn ScheduleStore> = match config.store_backend {
            StoreBackend::Sqlite => {
                if let Some(dir) = config.database_dir() {
                    std::fs::create_dir_all(&dir)?;
                }
                let db = DbService::new(&config.database_url)
                    .await
                    .map_err(|e| ServerError::Database(e.message))?;
                Arc::new(SqliteStore::new(db.pool))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store, data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let state = Self::with_store(config.clone(), store);
        state.bootstrap_admin().await?;
        Ok(state)
    }

    /// 确保初始管理员存在；已存在时不修改密码
    async fn bootstrap_admin(&self) -> Result<(), ServerError> {
        let username = self.config.admin_username.trim();
        if self.store.find_admin_by_username(username).await?.is_some() {
            return Ok(());
        }

        let password = match &self.config.admin_password {
            Some(p) => p.clone(),
            None => {
                // 仅开发环境会走到这里 (生产环境在 Config 中已校验)
                let generated = uuid::Uuid::new_v4().simple().to_string();
                tracing::warn!(
                    username,
                    password = %generated,
                    "ADMIN_PASSWORD not set, generated a one-time admin password"
                );
                generated
            }
        };

        let hash = hash_password(&password).map_err(|e| ServerError::Config(e.message))?;
        let admin = self.store.ensure_admin(username, &hash).await?;
        tracing::info!(admin_id = admin.id, username = %admin.username, "Admin account created");
        Ok(())
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
