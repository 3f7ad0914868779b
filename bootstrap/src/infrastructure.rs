//! 基础设施资源管理

use courier_adapter_postgres::{PostgresConfig, create_pool};
use courier_config::{AppConfig, StorageBackend};
use courier_errors::{AppError, AppResult};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use crate::retry::{RetryPolicy, with_retry};

/// 基础设施资源容器
///
/// 由 bootstrap 统一初始化后交给服务构建路由
#[derive(Clone)]
pub struct Infrastructure {
    /// 应用配置
    config: AppConfig,
    /// PostgreSQL 连接池（内存存储时为空）
    postgres_pool: Option<PgPool>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let postgres_pool = match (config.storage.backend, &config.database) {
            (StorageBackend::Postgres, Some(db)) => {
                let pg_config = PostgresConfig::new(db.url.expose_secret())
                    .with_max_connections(db.max_connections)
                    .with_application_name(config.app_name.clone());
                let policy = RetryPolicy::for_database(db);
                let pool = with_retry(&policy, "PostgreSQL connection", || {
                    let cfg = pg_config.clone();
                    async move { create_pool(&cfg).await }
                })
                .await?;
                info!(
                    "PostgreSQL connection pool created (max_connections: {})",
                    db.max_connections
                );
                Some(pool)
            }
            (StorageBackend::Postgres, None) => {
                return Err(AppError::internal("PostgreSQL backend selected without [database]"));
            }
            (StorageBackend::Memory, _) => {
                info!("In-memory storage selected, skipping PostgreSQL");
                None
            }
        };

        Ok(Self {
            config,
            postgres_pool,
        })
    }

    /// 不连接外部资源的基础设施（内存存储 / 测试）
    pub fn in_memory(config: AppConfig) -> Self {
        Self {
            config,
            postgres_pool: None,
        }
    }

    /// 获取应用配置
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取 PostgreSQL 连接池
    pub fn postgres_pool(&self) -> Option<PgPool> {
        self.postgres_pool.clone()
    }

    /// 获取 PostgreSQL 连接池，未配置时报错
    pub fn require_postgres_pool(&self) -> AppResult<PgPool> {
        self.postgres_pool
            .clone()
            .ok_or_else(|| AppError::internal("PostgreSQL pool is not initialized"))
    }
}
