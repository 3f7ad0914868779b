//! 版本化、带校验和的 schema 迁移
//!
//! 已执行的迁移记录在 `_courier_migrations` 表中。每次执行都持有事务级
//! advisory lock，多个实例同时启动时只有一个会真正执行迁移。

use chrono::{DateTime, Utc};
use courier_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::transaction::TransactionManager;

const MIGRATIONS_TABLE: &str = "_courier_migrations";
/// `pg_advisory_xact_lock` 的键
const MIGRATION_LOCK_KEY: i64 = 0x636f_7572_6965_72;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
    pub checksum: String,
}

/// 一条迁移脚本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub sql: String,
    pub checksum: String,
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let checksum = checksum(&sql);
        Self {
            version,
            name: name.into(),
            sql,
            checksum,
        }
    }
}

/// FNV-1a；与编译器版本无关，记录在库里的值长期有效
fn checksum(sql: &str) -> String {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let hash = sql
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME));
    format!("{:016x}", hash)
}

pub struct MigrationManager {
    pool: PgPool,
    tx_manager: TransactionManager,
}

impl MigrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tx_manager: TransactionManager::new(pool.clone()),
            pool,
        }
    }

    async fn ensure_table(&self) -> AppResult<()> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {MIGRATIONS_TABLE} (
                version BIGINT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                checksum VARCHAR(64) NOT NULL
            )
            "#
        );
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create migration table: {}", e)))?;
        Ok(())
    }

    pub async fn applied(&self) -> AppResult<Vec<MigrationRecord>> {
        let sql = format!(
            "SELECT version, name, applied_at, checksum FROM {MIGRATIONS_TABLE} ORDER BY version"
        );
        sqlx::query_as::<_, MigrationRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to read applied migrations: {}", e)))
    }

    /// 在锁内执行一条迁移；另一个实例已执行过时返回 `false`
    async fn apply(&self, migration: &Migration) -> AppResult<bool> {
        let mut uow = self.tx_manager.begin("migration").await?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *uow)
            .await
            .map_err(|e| AppError::database(format!("Failed to take migration lock: {}", e)))?;

        let exists_sql = format!("SELECT EXISTS (SELECT 1 FROM {MIGRATIONS_TABLE} WHERE version = $1)");
        let already: bool = sqlx::query_scalar(&exists_sql)
            .bind(migration.version)
            .fetch_one(&mut *uow)
            .await
            .map_err(|e| AppError::database(format!("Failed to check migration: {}", e)))?;
        if already {
            uow.abort().await?;
            return Ok(false);
        }

        sqlx::raw_sql(&migration.sql)
            .execute(&mut *uow)
            .await
            .map_err(|e| {
                AppError::database(format!(
                    "Failed to apply migration {} ({}): {}",
                    migration.version, migration.name, e
                ))
            })?;

        let insert_sql =
            format!("INSERT INTO {MIGRATIONS_TABLE} (version, name, checksum) VALUES ($1, $2, $3)");
        sqlx::query(&insert_sql)
            .bind(migration.version)
            .bind(&migration.name)
            .bind(&migration.checksum)
            .execute(&mut *uow)
            .await
            .map_err(|e| AppError::database(format!("Failed to record migration: {}", e)))?;

        uow.commit().await?;
        info!(version = migration.version, name = %migration.name, "Migration applied");
        Ok(true)
    }

    /// 按版本顺序执行待处理的迁移，遇到第一个失败即停止
    pub async fn migrate(&self, migrations: &[Migration]) -> AppResult<MigrationReport> {
        self.ensure_table().await?;
        let applied = self.applied().await?;
        let plan = plan_migrations(&applied, migrations);

        let mut report = MigrationReport {
            applied: Vec::new(),
            skipped: plan.skipped,
            failures: plan.failures,
        };
        if !report.failures.is_empty() {
            return Ok(report);
        }

        for migration in plan.pending {
            match self.apply(migration).await {
                Ok(true) => report.applied.push(migration.version),
                Ok(false) => report.skipped.push(migration.version),
                Err(e) => {
                    warn!(version = migration.version, error = %e, "Migration failed");
                    report.failures.push(MigrationFailure::new(migration, e.to_string()));
                    break;
                }
            }
        }
        Ok(report)
    }
}

#[derive(Debug)]
pub struct MigrationPlan<'a> {
    pub pending: Vec<&'a Migration>,
    pub skipped: Vec<i64>,
    pub failures: Vec<MigrationFailure>,
}

/// 对比已执行记录得出待执行的迁移（版本升序）；已执行但内容被改动的迁移记为失败
pub fn plan_migrations<'a>(
    applied: &[MigrationRecord],
    migrations: &'a [Migration],
) -> MigrationPlan<'a> {
    let mut sorted: Vec<&Migration> = migrations.iter().collect();
    sorted.sort_by_key(|m| m.version);

    let mut plan = MigrationPlan {
        pending: Vec::new(),
        skipped: Vec::new(),
        failures: Vec::new(),
    };
    for migration in sorted {
        match applied.iter().find(|r| r.version == migration.version) {
            Some(record) if record.checksum != migration.checksum => plan.failures.push(
                MigrationFailure::new(migration, "checksum mismatch, applied script was modified"),
            ),
            Some(_) => plan.skipped.push(migration.version),
            None => plan.pending.push(migration),
        }
    }
    plan
}

#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    pub applied: Vec<i64>,
    pub skipped: Vec<i64>,
    pub failures: Vec<MigrationFailure>,
}

impl MigrationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// 成功时返回本次执行的迁移数量
    pub fn into_result(self) -> AppResult<usize> {
        match self.failures.first() {
            None => Ok(self.applied.len()),
            Some(first) => Err(AppError::internal(format!(
                "Migration {} ({}) failed: {}",
                first.version, first.name, first.reason
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFailure {
    pub version: i64,
    pub name: String,
    pub reason: String,
}

impl MigrationFailure {
    fn new(migration: &Migration, reason: impl Into<String>) -> Self {
        Self {
            version: migration.version,
            name: migration.name.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applied(migration: &Migration, checksum: &str) -> MigrationRecord {
        MigrationRecord {
            version: migration.version,
            name: migration.name.clone(),
            applied_at: Utc::now(),
            checksum: checksum.to_string(),
        }
    }

    #[test]
    fn test_checksum_is_stable() {
        // 固定值：改动算法会让已部署数据库的校验全部失败
        assert_eq!(checksum(""), "cbf29ce484222325");
        assert_eq!(checksum("a"), "af63dc4c8601ec8c");
        assert_ne!(
            Migration::new(1, "one", "CREATE TABLE a (id INT)").checksum,
            Migration::new(1, "one", "CREATE TABLE b (id INT)").checksum
        );
    }

    #[test]
    fn test_plan_orders_pending_and_skips_applied() {
        let migrations = vec![
            Migration::new(3, "parcels_index", "SELECT 3"),
            Migration::new(1, "init_schema", "SELECT 1"),
            Migration::new(2, "tariff_index", "SELECT 2"),
        ];
        let records = vec![applied(&migrations[1], &migrations[1].checksum)];

        let plan = plan_migrations(&records, &migrations);
        let pending: Vec<i64> = plan.pending.iter().map(|m| m.version).collect();

        assert_eq!(pending, vec![2, 3]);
        assert_eq!(plan.skipped, vec![1]);
        assert!(plan.failures.is_empty());
    }

    #[test]
    fn test_plan_flags_modified_migration() {
        let migrations = vec![Migration::new(1, "init_schema", "SELECT 1")];
        let records = vec![applied(&migrations[0], "deadbeef")];

        let plan = plan_migrations(&records, &migrations);

        assert!(plan.pending.is_empty());
        assert_eq!(plan.failures.len(), 1);
        assert_eq!(plan.failures[0].version, 1);
    }

    #[test]
    fn test_report_into_result() {
        let ok = MigrationReport {
            applied: vec![1, 2],
            ..Default::default()
        };
        assert_eq!(ok.into_result().unwrap(), 2);

        let failed = MigrationReport {
            failures: vec![MigrationFailure::new(&Migration::new(1, "init_schema", ""), "boom")],
            ..Default::default()
        };
        assert!(!failed.is_success());
        assert_eq!(failed.into_result().unwrap_err().status_code(), 500);
    }
}
