//! 地址、合作方、客户、邮局、资费表、跟踪记录的 PostgreSQL 仓储

use async_trait::async_trait;
use courier_errors::{AppError, AppResult};
use courier_ports::Repository;
use sqlx::PgPool;

use crate::domain::entities::{
    Address, Client, Counterparty, PostOffice, ShipmentTrackingDetail, TariffGrid,
};
use crate::domain::enums::W2wVariation;
use crate::domain::repositories::{
    AddressRepository, ClientRepository, CounterpartyRepository, PostOfficeRepository,
    ShipmentTrackingDetailRepository, TariffGridRepository,
};
use crate::domain::value_objects::{
    AddressId, ClientId, CounterpartyId, PostOfficeId, ShipmentId, ShipmentTrackingDetailId,
    TariffGridId,
};

use super::converters::*;
use super::db_error;
use super::rows::*;

fn ensure_affected(rows: u64, kind: &str, id: impl std::fmt::Display) -> AppResult<()> {
    if rows == 0 {
        return Err(AppError::not_found(format!("{} {} not found", kind, id)));
    }
    Ok(())
}

// ============================================================================
// Address
// ============================================================================

const ADDRESS_COLUMNS: &str =
    "id, postcode, region, district, city, street, house_number, apartment_number";

pub struct PostgresAddressRepository {
    pool: PgPool,
}

impl PostgresAddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Address, AddressId> for PostgresAddressRepository {
    async fn find_all(&self) -> AppResult<Vec<Address>> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {} FROM addresses ORDER BY id",
            ADDRESS_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("查询地址列表失败"))?;

        rows.into_iter().map(address_from_row).collect()
    }

    async fn find_by_id(&self, id: &AddressId) -> AppResult<Option<Address>> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {} FROM addresses WHERE id = $1",
            ADDRESS_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("查询地址失败"))?;

        row.map(address_from_row).transpose()
    }

    async fn save(&self, address: &Address) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO addresses (
                id, postcode, region, district, city, street, house_number, apartment_number
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(address.id.0)
        .bind(address.postcode.as_str())
        .bind(&address.region)
        .bind(&address.district)
        .bind(&address.city)
        .bind(&address.street)
        .bind(&address.house_number)
        .bind(&address.apartment_number)
        .execute(&self.pool)
        .await
        .map_err(db_error("保存地址失败"))?;

        Ok(())
    }

    async fn update(&self, address: &Address) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE addresses SET
                postcode = $2, region = $3, district = $4, city = $5,
                street = $6, house_number = $7, apartment_number = $8
            WHERE id = $1
            "#,
        )
        .bind(address.id.0)
        .bind(address.postcode.as_str())
        .bind(&address.region)
        .bind(&address.district)
        .bind(&address.city)
        .bind(&address.street)
        .bind(&address.house_number)
        .bind(&address.apartment_number)
        .execute(&self.pool)
        .await
        .map_err(db_error("更新地址失败"))?;

        ensure_affected(result.rows_affected(), "Address", address.id)
    }

    async fn delete(&self, id: &AddressId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error("删除地址失败"))?;

        Ok(result.rows_affected() > 0)
    }
}

impl AddressRepository for PostgresAddressRepository {}

// ============================================================================
// Counterparty
// ============================================================================

pub struct PostgresCounterpartyRepository {
    pool: PgPool,
}

impl PostgresCounterpartyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Counterparty, CounterpartyId> for PostgresCounterpartyRepository {
    async fn find_all(&self) -> AppResult<Vec<Counterparty>> {
        let rows = sqlx::query_as::<_, CounterpartyRow>(
            "SELECT id, name, postcode_pool_id FROM counterparties ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("查询合作方列表失败"))?;

        Ok(rows.into_iter().map(counterparty_from_row).collect())
    }

    async fn find_by_id(&self, id: &CounterpartyId) -> AppResult<Option<Counterparty>> {
        let row = sqlx::query_as::<_, CounterpartyRow>(
            "SELECT id, name, postcode_pool_id FROM counterparties WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("查询合作方失败"))?;

        Ok(row.map(counterparty_from_row))
    }

    async fn save(&self, counterparty: &Counterparty) -> AppResult<()> {
        sqlx::query("INSERT INTO counterparties (id, name, postcode_pool_id) VALUES ($1, $2, $3)")
            .bind(counterparty.id.0)
            .bind(&counterparty.name)
            .bind(counterparty.postcode_pool_id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error("保存合作方失败"))?;

        Ok(())
    }

    async fn update(&self, counterparty: &Counterparty) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE counterparties SET name = $2, postcode_pool_id = $3 WHERE id = $1")
                .bind(counterparty.id.0)
                .bind(&counterparty.name)
                .bind(counterparty.postcode_pool_id.0)
                .execute(&self.pool)
                .await
                .map_err(db_error("更新合作方失败"))?;

        ensure_affected(result.rows_affected(), "Counterparty", counterparty.id)
    }

    async fn delete(&self, id: &CounterpartyId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM counterparties WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error("删除合作方失败"))?;

        Ok(result.rows_affected() > 0)
    }
}

impl CounterpartyRepository for PostgresCounterpartyRepository {}

// ============================================================================
// Client
// ============================================================================

const CLIENT_COLUMNS: &str =
    "id, name, unique_registration_number, address_id, counterparty_id, created_at, updated_at";

pub struct PostgresClientRepository {
    pool: PgPool,
}

impl PostgresClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Client, ClientId> for PostgresClientRepository {
    async fn find_all(&self) -> AppResult<Vec<Client>> {
        let rows = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {} FROM clients ORDER BY created_at, id",
            CLIENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("查询客户列表失败"))?;

        Ok(rows.into_iter().map(client_from_row).collect())
    }

    async fn find_by_id(&self, id: &ClientId) -> AppResult<Option<Client>> {
        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {} FROM clients WHERE id = $1",
            CLIENT_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("查询客户失败"))?;

        Ok(row.map(client_from_row))
    }

    async fn save(&self, client: &Client) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO clients (
                id, name, unique_registration_number, address_id, counterparty_id,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(client.id.0)
        .bind(&client.name)
        .bind(&client.unique_registration_number)
        .bind(client.address_id.0)
        .bind(client.counterparty_id.0)
        .bind(client.audit_info.created_at)
        .bind(client.audit_info.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("保存客户失败"))?;

        Ok(())
    }

    async fn update(&self, client: &Client) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE clients SET
                name = $2, unique_registration_number = $3, address_id = $4,
                counterparty_id = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(client.id.0)
        .bind(&client.name)
        .bind(&client.unique_registration_number)
        .bind(client.address_id.0)
        .bind(client.counterparty_id.0)
        .bind(client.audit_info.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("更新客户失败"))?;

        ensure_affected(result.rows_affected(), "Client", client.id)
    }

    async fn delete(&self, id: &ClientId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error("删除客户失败"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
    async fn find_all_by_counterparty(&self, counterparty_id: &CounterpartyId) -> AppResult<Vec<Client>> {
        let rows = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {} FROM clients WHERE counterparty_id = $1 ORDER BY created_at, id",
            CLIENT_COLUMNS
        ))
        .bind(counterparty_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("按合作方查询客户失败"))?;

        Ok(rows.into_iter().map(client_from_row).collect())
    }
}

// ============================================================================
// PostOffice
// ============================================================================

pub struct PostgresPostOfficeRepository {
    pool: PgPool,
}

impl PostgresPostOfficeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<PostOffice, PostOfficeId> for PostgresPostOfficeRepository {
    async fn find_all(&self) -> AppResult<Vec<PostOffice>> {
        let rows = sqlx::query_as::<_, PostOfficeRow>(
            "SELECT id, name, address_id, postcode_pool_id FROM post_offices ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("查询邮局列表失败"))?;

        Ok(rows.into_iter().map(post_office_from_row).collect())
    }

    async fn find_by_id(&self, id: &PostOfficeId) -> AppResult<Option<PostOffice>> {
        let row = sqlx::query_as::<_, PostOfficeRow>(
            "SELECT id, name, address_id, postcode_pool_id FROM post_offices WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("查询邮局失败"))?;

        Ok(row.map(post_office_from_row))
    }

    async fn save(&self, office: &PostOffice) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO post_offices (id, name, address_id, postcode_pool_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(office.id.0)
        .bind(&office.name)
        .bind(office.address_id.0)
        .bind(office.postcode_pool_id.0)
        .execute(&self.pool)
        .await
        .map_err(db_error("保存邮局失败"))?;

        Ok(())
    }

    async fn update(&self, office: &PostOffice) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE post_offices SET name = $2, address_id = $3, postcode_pool_id = $4 WHERE id = $1",
        )
        .bind(office.id.0)
        .bind(&office.name)
        .bind(office.address_id.0)
        .bind(office.postcode_pool_id.0)
        .execute(&self.pool)
        .await
        .map_err(db_error("更新邮局失败"))?;

        ensure_affected(result.rows_affected(), "Post office", office.id)
    }

    async fn delete(&self, id: &PostOfficeId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM post_offices WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error("删除邮局失败"))?;

        Ok(result.rows_affected() > 0)
    }
}

impl PostOfficeRepository for PostgresPostOfficeRepository {}

// ============================================================================
// ShipmentTrackingDetail
// ============================================================================

pub struct PostgresTrackingRepository {
    pool: PgPool,
}

impl PostgresTrackingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<ShipmentTrackingDetail, ShipmentTrackingDetailId> for PostgresTrackingRepository {
    async fn find_all(&self) -> AppResult<Vec<ShipmentTrackingDetail>> {
        let rows = sqlx::query_as::<_, ShipmentTrackingDetailRow>(
            "SELECT id, shipment_id, post_office_id, status, date FROM shipment_tracking_details ORDER BY date, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("查询跟踪记录列表失败"))?;

        rows.into_iter().map(tracking_from_row).collect()
    }

    async fn find_by_id(&self, id: &ShipmentTrackingDetailId) -> AppResult<Option<ShipmentTrackingDetail>> {
        let row = sqlx::query_as::<_, ShipmentTrackingDetailRow>(
            "SELECT id, shipment_id, post_office_id, status, date FROM shipment_tracking_details WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("查询跟踪记录失败"))?;

        row.map(tracking_from_row).transpose()
    }

    async fn save(&self, detail: &ShipmentTrackingDetail) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO shipment_tracking_details (id, shipment_id, post_office_id, status, date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(detail.id.0)
        .bind(detail.shipment_id.0)
        .bind(detail.post_office_id.0)
        .bind(i16::from(detail.status))
        .bind(detail.date)
        .execute(&self.pool)
        .await
        .map_err(db_error("保存跟踪记录失败"))?;

        Ok(())
    }

    async fn update(&self, detail: &ShipmentTrackingDetail) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE shipment_tracking_details SET
                shipment_id = $2, post_office_id = $3, status = $4, date = $5
            WHERE id = $1
            "#,
        )
        .bind(detail.id.0)
        .bind(detail.shipment_id.0)
        .bind(detail.post_office_id.0)
        .bind(i16::from(detail.status))
        .bind(detail.date)
        .execute(&self.pool)
        .await
        .map_err(db_error("更新跟踪记录失败"))?;

        ensure_affected(result.rows_affected(), "Tracking detail", detail.id)
    }

    async fn delete(&self, id: &ShipmentTrackingDetailId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM shipment_tracking_details WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error("删除跟踪记录失败"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ShipmentTrackingDetailRepository for PostgresTrackingRepository {
    async fn find_by_shipment(&self, shipment_id: &ShipmentId) -> AppResult<Vec<ShipmentTrackingDetail>> {
        let rows = sqlx::query_as::<_, ShipmentTrackingDetailRow>(
            r#"
            SELECT id, shipment_id, post_office_id, status, date
            FROM shipment_tracking_details
            WHERE shipment_id = $1
            ORDER BY date, id
            "#,
        )
        .bind(shipment_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("按运单查询跟踪记录失败"))?;

        rows.into_iter().map(tracking_from_row).collect()
    }
}

// ============================================================================
// TariffGrid
// ============================================================================

pub struct PostgresTariffGridRepository {
    pool: PgPool,
}

impl PostgresTariffGridRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<TariffGrid, TariffGridId> for PostgresTariffGridRepository {
    async fn find_all(&self) -> AppResult<Vec<TariffGrid>> {
        let rows = sqlx::query_as::<_, TariffGridRow>(
            "SELECT id, weight, length, w2w_variation, price FROM tariff_grids ORDER BY w2w_variation, weight, length",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("查询资费表失败"))?;

        rows.into_iter().map(tariff_from_row).collect()
    }

    async fn find_by_id(&self, id: &TariffGridId) -> AppResult<Option<TariffGrid>> {
        let row = sqlx::query_as::<_, TariffGridRow>(
            "SELECT id, weight, length, w2w_variation, price FROM tariff_grids WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("查询资费行失败"))?;

        row.map(tariff_from_row).transpose()
    }

    async fn save(&self, tariff: &TariffGrid) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO tariff_grids (id, weight, length, w2w_variation, price) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(tariff.id.0)
        .bind(tariff.weight)
        .bind(tariff.length)
        .bind(i16::from(tariff.w2w_variation))
        .bind(tariff.price.amount())
        .execute(&self.pool)
        .await
        .map_err(db_error("保存资费行失败"))?;

        Ok(())
    }

    async fn update(&self, tariff: &TariffGrid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE tariff_grids SET weight = $2, length = $3, w2w_variation = $4, price = $5 WHERE id = $1",
        )
        .bind(tariff.id.0)
        .bind(tariff.weight)
        .bind(tariff.length)
        .bind(i16::from(tariff.w2w_variation))
        .bind(tariff.price.amount())
        .execute(&self.pool)
        .await
        .map_err(db_error("更新资费行失败"))?;

        ensure_affected(result.rows_affected(), "Tariff row", tariff.id)
    }

    async fn delete(&self, id: &TariffGridId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tariff_grids WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error("删除资费行失败"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TariffGridRepository for PostgresTariffGridRepository {
    async fn find_by_variation(&self, variation: W2wVariation) -> AppResult<Vec<TariffGrid>> {
        let rows = sqlx::query_as::<_, TariffGridRow>(
            r#"
            SELECT id, weight, length, w2w_variation, price
            FROM tariff_grids
            WHERE w2w_variation = $1
            ORDER BY weight, length
            "#,
        )
        .bind(i16::from(variation))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("按档位查询资费表失败"))?;

        rows.into_iter().map(tariff_from_row).collect()
    }

    async fn count(&self) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tariff_grids")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("统计资费行失败"))?;

        Ok(count)
    }
}
