//! 运单与包裹的 PostgreSQL 仓储
//!
//! 运单、包裹、物品作为一个聚合在同一事务内写入；包裹按 `position` 保持运单内顺序。

use async_trait::async_trait;
use courier_adapter_postgres::{TransactionManager, UnitOfWork};
use courier_errors::{AppError, AppResult};
use courier_ports::Repository;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Parcel, Shipment};
use crate::domain::repositories::{ParcelRepository, ShipmentRepository};
use crate::domain::value_objects::{ClientId, ParcelId, ShipmentId};
use crate::error::PostalError;

use super::converters::{parcels_from_rows, shipments_from_rows};
use super::db_error;
use super::rows::{ParcelItemRow, ParcelRow, ShipmentRow};

const SHIPMENT_SELECT: &str = r#"
    SELECT s.id, s.sender_id, s.recipient_id, s.delivery_type, s.price, s.barcode_id,
           b.number AS barcode_number, p.postcode AS barcode_postcode,
           s.created_at, s.updated_at
    FROM shipments s
    LEFT JOIN barcode_inner_numbers b ON b.id = s.barcode_id
    LEFT JOIN postcode_pools p ON p.id = b.postcode_pool_id
"#;

const PARCEL_COLUMNS: &str =
    "id, shipment_id, weight, length, width, height, declared_price, price";

/// 包裹查询范围
enum ParcelFilter<'a> {
    All,
    Ids(&'a [Uuid]),
    Shipments(&'a [Uuid]),
}

/// 读取包裹及其物品，按运单内顺序排列
async fn fetch_parcels(pool: &PgPool, filter: ParcelFilter<'_>) -> AppResult<Vec<Parcel>> {
    let (condition, ids) = match filter {
        ParcelFilter::All => ("", None),
        ParcelFilter::Ids(ids) => ("WHERE id = ANY($1)", Some(ids)),
        ParcelFilter::Shipments(ids) => ("WHERE shipment_id = ANY($1)", Some(ids)),
    };
    let sql = format!(
        "SELECT {} FROM parcels {} ORDER BY shipment_id, position",
        PARCEL_COLUMNS, condition
    );
    let mut query = sqlx::query_as::<_, ParcelRow>(&sql);
    if let Some(ids) = ids {
        query = query.bind(ids);
    }
    let parcels = query
        .fetch_all(pool)
        .await
        .map_err(db_error("查询包裹失败"))?;

    let parcel_ids: Vec<Uuid> = parcels.iter().map(|p| p.id).collect();
    let items = if parcel_ids.is_empty() {
        Vec::new()
    } else {
        sqlx::query_as::<_, ParcelItemRow>(
            r#"
            SELECT id, parcel_id, name, quantity, weight, price
            FROM parcel_items
            WHERE parcel_id = ANY($1)
            ORDER BY parcel_id, position
            "#,
        )
        .bind(&parcel_ids)
        .fetch_all(pool)
        .await
        .map_err(db_error("查询包裹物品失败"))?
    };

    Ok(parcels_from_rows(parcels, items))
}

async fn insert_parcel(
    tx: &mut UnitOfWork,
    shipment_id: &ShipmentId,
    position: i32,
    parcel: &Parcel,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO parcels (
            id, shipment_id, position, weight, length, width, height, declared_price, price
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(parcel.id.0)
    .bind(shipment_id.0)
    .bind(position)
    .bind(parcel.weight)
    .bind(parcel.length)
    .bind(parcel.width)
    .bind(parcel.height)
    .bind(parcel.declared_price.amount())
    .bind(parcel.price.amount())
    .execute(&mut **tx)
    .await
    .map_err(db_error("保存包裹失败"))?;

    insert_items(tx, parcel).await
}

async fn insert_items(tx: &mut UnitOfWork, parcel: &Parcel) -> AppResult<()> {
    for (position, item) in parcel.parcel_items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO parcel_items (id, parcel_id, position, name, quantity, weight, price)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item.id.0)
        .bind(parcel.id.0)
        .bind(position as i32)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.weight)
        .bind(item.price.amount())
        .execute(&mut **tx)
        .await
        .map_err(db_error("保存包裹物品失败"))?;
    }
    Ok(())
}

// ============================================================================
// ShipmentRepository
// ============================================================================

pub struct PostgresShipmentRepository {
    pool: PgPool,
    tx_manager: TransactionManager,
}

impl PostgresShipmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tx_manager: TransactionManager::new(pool.clone()),
            pool,
        }
    }

    async fn load(&self, rows: Vec<ShipmentRow>) -> AppResult<Vec<Shipment>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let parcels = fetch_parcels(&self.pool, ParcelFilter::Shipments(&ids)).await?;
        shipments_from_rows(rows, parcels)
    }

    async fn write_parcels(tx: &mut UnitOfWork, shipment: &Shipment) -> AppResult<()> {
        for (position, parcel) in shipment.parcels().iter().enumerate() {
            insert_parcel(tx, shipment.id(), position as i32, parcel).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Repository<Shipment, ShipmentId> for PostgresShipmentRepository {
    async fn find_all(&self) -> AppResult<Vec<Shipment>> {
        let rows = sqlx::query_as::<_, ShipmentRow>(&format!(
            "{} ORDER BY s.created_at, s.id",
            SHIPMENT_SELECT
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("查询运单列表失败"))?;

        self.load(rows).await
    }

    async fn find_by_id(&self, id: &ShipmentId) -> AppResult<Option<Shipment>> {
        let rows = sqlx::query_as::<_, ShipmentRow>(&format!("{} WHERE s.id = $1", SHIPMENT_SELECT))
            .bind(id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("查询运单失败"))?;

        Ok(self.load(rows).await?.into_iter().next())
    }

    async fn save(&self, shipment: &Shipment) -> AppResult<()> {
        let mut tx = self.tx_manager.begin("shipment").await?;
        sqlx::query(
            r#"
            INSERT INTO shipments (
                id, sender_id, recipient_id, delivery_type, price, barcode_id,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(shipment.id().0)
        .bind(shipment.sender_id().0)
        .bind(shipment.recipient_id().0)
        .bind(i16::from(shipment.delivery_type()))
        .bind(shipment.price().amount())
        .bind(shipment.barcode().map(|b| b.id.0))
        .bind(shipment.audit_info().created_at)
        .bind(shipment.audit_info().updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error("保存运单失败"))?;

        Self::write_parcels(&mut tx, shipment).await?;
        tx.commit().await
    }

    async fn update(&self, shipment: &Shipment) -> AppResult<()> {
        let mut tx = self.tx_manager.begin("shipment").await?;
        let result = sqlx::query(
            r#"
            UPDATE shipments SET
                sender_id = $2, recipient_id = $3, delivery_type = $4, price = $5,
                barcode_id = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(shipment.id().0)
        .bind(shipment.sender_id().0)
        .bind(shipment.recipient_id().0)
        .bind(i16::from(shipment.delivery_type()))
        .bind(shipment.price().amount())
        .bind(shipment.barcode().map(|b| b.id.0))
        .bind(shipment.audit_info().updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error("更新运单失败"))?;

        if result.rows_affected() == 0 {
            tx.abort().await?;
            return Err(AppError::not_found(format!("Shipment {} not found", shipment.id())));
        }

        // 包裹整体重写（物品随包裹级联删除）
        sqlx::query("DELETE FROM parcels WHERE shipment_id = $1")
            .bind(shipment.id().0)
            .execute(&mut *tx)
            .await
            .map_err(db_error("清理运单包裹失败"))?;
        Self::write_parcels(&mut tx, shipment).await?;
        tx.commit().await
    }

    async fn delete(&self, id: &ShipmentId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM shipments WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error("删除运单失败"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ShipmentRepository for PostgresShipmentRepository {
    async fn find_all_by_sender(&self, sender_id: &ClientId) -> AppResult<Vec<Shipment>> {
        let rows = sqlx::query_as::<_, ShipmentRow>(&format!(
            "{} WHERE s.sender_id = $1 ORDER BY s.created_at, s.id",
            SHIPMENT_SELECT
        ))
        .bind(sender_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("按寄件人查询运单失败"))?;

        self.load(rows).await
    }
}

// ============================================================================
// ParcelRepository
// ============================================================================

pub struct PostgresParcelRepository {
    pool: PgPool,
    tx_manager: TransactionManager,
}

impl PostgresParcelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tx_manager: TransactionManager::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl Repository<Parcel, ParcelId> for PostgresParcelRepository {
    async fn find_all(&self) -> AppResult<Vec<Parcel>> {
        fetch_parcels(&self.pool, ParcelFilter::All).await
    }

    async fn find_by_id(&self, id: &ParcelId) -> AppResult<Option<Parcel>> {
        let parcels = fetch_parcels(&self.pool, ParcelFilter::Ids(&[id.0])).await?;
        Ok(parcels.into_iter().next())
    }

    /// 追加到所属运单的包裹列表末尾
    async fn save(&self, parcel: &Parcel) -> AppResult<()> {
        let shipment_id = parcel.shipment_id.ok_or(PostalError::ParcelWithoutShipment)?;
        let mut tx = self.tx_manager.begin("shipment").await?;
        let (position,): (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM parcels WHERE shipment_id = $1",
        )
        .bind(shipment_id.0)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("查询包裹位置失败"))?;

        insert_parcel(&mut tx, &shipment_id, position, parcel).await?;
        tx.commit().await
    }

    async fn update(&self, parcel: &Parcel) -> AppResult<()> {
        let shipment_id = parcel.shipment_id.ok_or(PostalError::ParcelWithoutShipment)?;
        let mut tx = self.tx_manager.begin("shipment").await?;
        let result = sqlx::query(
            r#"
            UPDATE parcels SET
                shipment_id = $2, weight = $3, length = $4, width = $5, height = $6,
                declared_price = $7, price = $8
            WHERE id = $1
            "#,
        )
        .bind(parcel.id.0)
        .bind(shipment_id.0)
        .bind(parcel.weight)
        .bind(parcel.length)
        .bind(parcel.width)
        .bind(parcel.height)
        .bind(parcel.declared_price.amount())
        .bind(parcel.price.amount())
        .execute(&mut *tx)
        .await
        .map_err(db_error("更新包裹失败"))?;

        if result.rows_affected() == 0 {
            tx.abort().await?;
            return Err(AppError::not_found(format!("Parcel {} not found", parcel.id)));
        }

        sqlx::query("DELETE FROM parcel_items WHERE parcel_id = $1")
            .bind(parcel.id.0)
            .execute(&mut *tx)
            .await
            .map_err(db_error("清理包裹物品失败"))?;
        insert_items(&mut tx, parcel).await?;
        tx.commit().await
    }

    async fn delete(&self, id: &ParcelId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM parcels WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error("删除包裹失败"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ParcelRepository for PostgresParcelRepository {
    async fn find_by_shipment(&self, shipment_id: &ShipmentId) -> AppResult<Vec<Parcel>> {
        fetch_parcels(&self.pool, ParcelFilter::Shipments(&[shipment_id.0])).await
    }
}
