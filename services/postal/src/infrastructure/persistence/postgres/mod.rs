//! PostgreSQL 仓储实现

mod converters;
mod postcode_pool;
mod reference;
mod rows;
mod shipment;

pub use postcode_pool::PostgresPostcodePoolRepository;
pub use reference::*;
pub use shipment::{PostgresParcelRepository, PostgresShipmentRepository};

use std::sync::Arc;

use courier_adapter_postgres::{Migration, MigrationManager};
use courier_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::info;

use crate::application::Repositories;

/// 按唯一约束与外键约束区分冲突，其余归为数据库错误
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() || db.is_foreign_key_violation() => {
            AppError::conflict(format!("{}: {}", context, db.message()))
        }
        _ => AppError::database(format!("{}: {}", context, e)),
    }
}

/// 服务的 schema 迁移
pub fn migrations() -> Vec<Migration> {
    vec![Migration::new(
        1,
        "init_schema",
        include_str!("../../../../migrations/0001_init_schema.sql"),
    )]
}

pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    let applied = MigrationManager::new(pool.clone())
        .migrate(&migrations())
        .await?
        .into_result()?;
    info!("Applied {} migration(s)", applied);
    Ok(())
}

pub fn repositories(pool: PgPool) -> Repositories {
    Repositories {
        addresses: Arc::new(PostgresAddressRepository::new(pool.clone())),
        postcode_pools: Arc::new(PostgresPostcodePoolRepository::new(pool.clone())),
        counterparties: Arc::new(PostgresCounterpartyRepository::new(pool.clone())),
        clients: Arc::new(PostgresClientRepository::new(pool.clone())),
        parcels: Arc::new(PostgresParcelRepository::new(pool.clone())),
        shipments: Arc::new(PostgresShipmentRepository::new(pool.clone())),
        post_offices: Arc::new(PostgresPostOfficeRepository::new(pool.clone())),
        tracking: Arc::new(PostgresTrackingRepository::new(pool.clone())),
        tariffs: Arc::new(PostgresTariffGridRepository::new(pool)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_versioned_in_order() {
        let migrations = migrations();
        assert_eq!(migrations[0].version, 1);
        assert!(migrations[0].sql.contains("CREATE TABLE IF NOT EXISTS shipments"));
        assert!(!migrations[0].checksum.is_empty());
    }
}
