//! 邮编池 PostgreSQL 仓储（池与条码一起读取，条码单独写入）

use async_trait::async_trait;
use courier_adapter_postgres::TransactionManager;
use courier_errors::{AppError, AppResult};
use courier_ports::Repository;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{BarcodeInnerNumber, PostcodePool};
use crate::domain::repositories::PostcodePoolRepository;
use crate::domain::value_objects::{BarcodeInnerNumberId, Postcode, PostcodePoolId};

use super::converters::pools_from_rows;
use super::db_error;
use super::rows::{BarcodeInnerNumberRow, PostcodePoolRow};

pub struct PostgresPostcodePoolRepository {
    pool: PgPool,
    tx_manager: TransactionManager,
}

impl PostgresPostcodePoolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tx_manager: TransactionManager::new(pool.clone()),
            pool,
        }
    }

    async fn load(&self, rows: Vec<PostcodePoolRow>) -> AppResult<Vec<PostcodePool>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let barcodes = sqlx::query_as::<_, BarcodeInnerNumberRow>(
            r#"
            SELECT id, postcode_pool_id, number, status
            FROM barcode_inner_numbers
            WHERE postcode_pool_id = ANY($1)
            ORDER BY number
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("查询条码失败"))?;

        pools_from_rows(rows, barcodes)
    }

    async fn insert_barcode<'e>(
        executor: impl sqlx::PgExecutor<'e>,
        barcode: &BarcodeInnerNumber,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO barcode_inner_numbers (id, postcode_pool_id, number, status)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(barcode.id.0)
        .bind(barcode.postcode_pool_id.0)
        .bind(barcode.number.as_str())
        .bind(i16::from(barcode.status))
        .execute(executor)
        .await
        .map_err(db_error("保存条码失败"))?;

        Ok(())
    }
}

#[async_trait]
impl Repository<PostcodePool, PostcodePoolId> for PostgresPostcodePoolRepository {
    async fn find_all(&self) -> AppResult<Vec<PostcodePool>> {
        let rows = sqlx::query_as::<_, PostcodePoolRow>(
            "SELECT id, postcode, closed FROM postcode_pools ORDER BY postcode",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("查询邮编池列表失败"))?;

        self.load(rows).await
    }

    async fn find_by_id(&self, id: &PostcodePoolId) -> AppResult<Option<PostcodePool>> {
        let rows = sqlx::query_as::<_, PostcodePoolRow>(
            "SELECT id, postcode, closed FROM postcode_pools WHERE id = $1",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("查询邮编池失败"))?;

        Ok(self.load(rows).await?.into_iter().next())
    }

    async fn save(&self, pool: &PostcodePool) -> AppResult<()> {
        let mut tx = self.tx_manager.begin("postcode pool").await?;
        sqlx::query("INSERT INTO postcode_pools (id, postcode, closed) VALUES ($1, $2, $3)")
            .bind(pool.id().0)
            .bind(pool.postcode().as_str())
            .bind(pool.is_closed())
            .execute(&mut *tx)
            .await
            .map_err(db_error("保存邮编池失败"))?;
        for barcode in pool.barcode_inner_numbers() {
            Self::insert_barcode(&mut *tx, barcode).await?;
        }
        tx.commit().await
    }

    /// 只更新邮编与关闭标志，条码由单独的语句维护
    async fn update(&self, pool: &PostcodePool) -> AppResult<()> {
        let result = sqlx::query("UPDATE postcode_pools SET postcode = $2, closed = $3 WHERE id = $1")
            .bind(pool.id().0)
            .bind(pool.postcode().as_str())
            .bind(pool.is_closed())
            .execute(&self.pool)
            .await
            .map_err(db_error("更新邮编池失败"))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Postcode pool {} not found", pool.id())));
        }
        Ok(())
    }

    async fn delete(&self, id: &PostcodePoolId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM postcode_pools WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error("删除邮编池失败"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PostcodePoolRepository for PostgresPostcodePoolRepository {
    async fn find_by_postcode(&self, postcode: &Postcode) -> AppResult<Option<PostcodePool>> {
        let rows = sqlx::query_as::<_, PostcodePoolRow>(
            "SELECT id, postcode, closed FROM postcode_pools WHERE postcode = $1",
        )
        .bind(postcode.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("按邮编查询邮编池失败"))?;

        Ok(self.load(rows).await?.into_iter().next())
    }

    async fn add_barcode(&self, barcode: &BarcodeInnerNumber) -> AppResult<()> {
        Self::insert_barcode(&self.pool, barcode).await
    }

    async fn add_barcodes(&self, barcodes: &[BarcodeInnerNumber]) -> AppResult<()> {
        let mut tx = self.tx_manager.begin("postcode pool").await?;
        for barcode in barcodes {
            Self::insert_barcode(&mut *tx, barcode).await?;
        }
        tx.commit().await
    }

    async fn update_barcode(&self, barcode: &BarcodeInnerNumber) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE barcode_inner_numbers SET number = $3, status = $4
            WHERE id = $1 AND postcode_pool_id = $2
            "#,
        )
        .bind(barcode.id.0)
        .bind(barcode.postcode_pool_id.0)
        .bind(barcode.number.as_str())
        .bind(i16::from(barcode.status))
        .execute(&self.pool)
        .await
        .map_err(db_error("更新条码失败"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_barcode(
        &self,
        pool_id: &PostcodePoolId,
        barcode_id: &BarcodeInnerNumberId,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM barcode_inner_numbers WHERE id = $1 AND postcode_pool_id = $2",
        )
        .bind(barcode_id.0)
        .bind(pool_id.0)
        .execute(&self.pool)
        .await
        .map_err(db_error("删除条码失败"))?;

        Ok(result.rows_affected() > 0)
    }
}
