//! 聚合写入的工作单元
//!
//! 一个聚合（运单 + 包裹 + 物品、邮编池 + 条码）的写入在同一事务内完成。
//! `UnitOfWork` 未提交即被丢弃时，sqlx 会自动回滚。

use std::ops::{Deref, DerefMut};

use courier_errors::{AppError, AppResult};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::debug;

#[derive(Clone)]
pub struct TransactionManager {
    pool: PgPool,
}

impl TransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 为名为 `aggregate` 的聚合开启一次写入
    pub async fn begin(&self, aggregate: &'static str) -> AppResult<UnitOfWork> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::database(format!("Failed to begin {} write: {}", aggregate, e))
        })?;
        Ok(UnitOfWork { tx, aggregate })
    }
}

/// 进行中的聚合写入
pub struct UnitOfWork {
    tx: Transaction<'static, Postgres>,
    aggregate: &'static str,
}

impl UnitOfWork {
    pub fn aggregate(&self) -> &'static str {
        self.aggregate
    }

    pub async fn commit(self) -> AppResult<()> {
        let aggregate = self.aggregate;
        self.tx.commit().await.map_err(|e| {
            AppError::database(format!("Failed to commit {} write: {}", aggregate, e))
        })?;
        debug!("{} write committed", aggregate);
        Ok(())
    }

    /// 放弃本次写入
    pub async fn abort(self) -> AppResult<()> {
        let aggregate = self.aggregate;
        self.tx.rollback().await.map_err(|e| {
            AppError::database(format!("Failed to roll back {} write: {}", aggregate, e))
        })?;
        debug!("{} write rolled back", aggregate);
        Ok(())
    }
}

impl Deref for UnitOfWork {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        &self.tx
    }
}

impl DerefMut for UnitOfWork {
    fn deref_mut(&mut self) -> &mut PgConnection {
        &mut self.tx
    }
}
