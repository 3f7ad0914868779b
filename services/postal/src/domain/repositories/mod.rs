//! 仓储接口
//!
//! 每个聚合一个仓储，均在 `courier_ports::Repository` 的基础 CRUD 上扩展专用查询。

use async_trait::async_trait;
use courier_errors::AppResult;
use courier_ports::Repository;

use crate::domain::entities::{
    Address, BarcodeInnerNumber, Client, Counterparty, Parcel, PostOffice, PostcodePool, Shipment,
    ShipmentTrackingDetail, TariffGrid,
};
use crate::domain::enums::W2wVariation;
use crate::domain::value_objects::{
    AddressId, BarcodeInnerNumberId, ClientId, CounterpartyId, ParcelId, PostOfficeId, Postcode,
    PostcodePoolId, ShipmentId, ShipmentTrackingDetailId, TariffGridId,
};

/// 地址仓储
pub trait AddressRepository: Repository<Address, AddressId> {}

/// 合作方仓储
pub trait CounterpartyRepository: Repository<Counterparty, CounterpartyId> {}

/// 邮局仓储
pub trait PostOfficeRepository: Repository<PostOffice, PostOfficeId> {}

/// 邮编池仓储（连同池内条码一起读写）
#[async_trait]
pub trait PostcodePoolRepository: Repository<PostcodePool, PostcodePoolId> {
    async fn find_by_postcode(&self, postcode: &Postcode) -> AppResult<Option<PostcodePool>>;

    /// 单独持久化一个新发放的条码
    async fn add_barcode(&self, barcode: &BarcodeInnerNumber) -> AppResult<()>;

    /// 在同一事务中追加一批条码，不改动池中已有条码
    async fn add_barcodes(&self, barcodes: &[BarcodeInnerNumber]) -> AppResult<()>;

    /// 只改写单个条码；条码不存在于该池时返回 `false`
    async fn update_barcode(&self, barcode: &BarcodeInnerNumber) -> AppResult<bool>;

    async fn delete_barcode(
        &self,
        pool_id: &PostcodePoolId,
        barcode_id: &BarcodeInnerNumberId,
    ) -> AppResult<bool>;
}

/// 客户仓储
#[async_trait]
pub trait ClientRepository: Repository<Client, ClientId> {
    async fn find_all_by_counterparty(&self, counterparty_id: &CounterpartyId) -> AppResult<Vec<Client>>;
}

/// 包裹仓储
///
/// 包裹必须挂在某个运单下才能持久化。
#[async_trait]
pub trait ParcelRepository: Repository<Parcel, ParcelId> {
    /// 按运单内顺序返回包裹
    async fn find_by_shipment(&self, shipment_id: &ShipmentId) -> AppResult<Vec<Parcel>>;
}

/// 运单仓储（运单、包裹、物品作为一个聚合写入）
#[async_trait]
pub trait ShipmentRepository: Repository<Shipment, ShipmentId> {
    async fn find_all_by_sender(&self, sender_id: &ClientId) -> AppResult<Vec<Shipment>>;
}

/// 运单跟踪仓储
#[async_trait]
pub trait ShipmentTrackingDetailRepository:
    Repository<ShipmentTrackingDetail, ShipmentTrackingDetailId>
{
    async fn find_by_shipment(&self, shipment_id: &ShipmentId) -> AppResult<Vec<ShipmentTrackingDetail>>;
}

/// 资费表仓储
#[async_trait]
pub trait TariffGridRepository: Repository<TariffGrid, TariffGridId> {
    async fn find_by_variation(&self, variation: W2wVariation) -> AppResult<Vec<TariffGrid>>;

    async fn count(&self) -> AppResult<i64>;
}
