//! PostgreSQL 连接管理

use std::str::FromStr;
use std::time::Duration;

use courier_errors::{AppError, AppResult};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::debug;

/// 连接池配置
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    /// 写入 `pg_stat_activity.application_name`，便于在数据库侧区分服务
    pub application_name: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    /// 单条语句超时；`None` 使用服务器默认值
    pub statement_timeout: Option<Duration>,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            application_name: None,
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            statement_timeout: Some(Duration::from_secs(15)),
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self.min_connections = self.min_connections.min(max);
        self
    }

    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    pub fn with_statement_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.statement_timeout = timeout;
        self
    }

    fn connect_options(&self) -> AppResult<PgConnectOptions> {
        let mut options = PgConnectOptions::from_str(&self.url)
            .map_err(|e| AppError::database(format!("Invalid database url: {}", e)))?;
        if let Some(name) = &self.application_name {
            options = options.application_name(name);
        }
        if let Some(timeout) = self.statement_timeout {
            options = options.options([("statement_timeout", timeout.as_millis().to_string())]);
        }
        Ok(options)
    }
}

/// 创建连接池
pub async fn create_pool(config: &PostgresConfig) -> AppResult<PgPool> {
    let options = config.connect_options()?;
    debug!(
        application_name = config.application_name.as_deref().unwrap_or("-"),
        max_connections = config.max_connections,
        "Connecting to PostgreSQL"
    );
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect_with(options)
        .await
        .map_err(|e| AppError::database(format!("Failed to create pool: {}", e)))
}

/// 就绪检查用的连通性探测
pub async fn check_connection(pool: &PgPool) -> AppResult<()> {
    let one: i32 = sqlx::query_scalar("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database(format!("Database health check failed: {}", e)))?;
    if one != 1 {
        return Err(AppError::database("Database health check returned an unexpected value"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_min_below_max() {
        let config = PostgresConfig::new("postgres://localhost/postal").with_max_connections(0);
        assert_eq!(config.max_connections, 0);
        assert_eq!(config.min_connections, 0);
    }

    #[test]
    fn test_connect_options_apply_application_name() {
        let options = PostgresConfig::new("postgres://postal@localhost:5432/postal")
            .with_application_name("postal")
            .connect_options()
            .unwrap();
        assert_eq!(options.get_application_name(), Some("postal"));
        assert_eq!(options.get_database(), Some("postal"));
    }

    #[test]
    fn test_invalid_url_is_database_error() {
        let err = PostgresConfig::new("not a url").connect_options().unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}
