//! 内存仓储实现
//!
//! 所有仓储共享一份状态，保持与数据库实现一致的级联语义：
//! 包裹存放在运单内部，删除运单时同时删除其跟踪记录，删除邮编池时同时删除池内条码。

use std::sync::Arc;

use async_trait::async_trait;
use courier_errors::{AppError, AppResult};
use courier_ports::Repository;
use tokio::sync::RwLock;

use crate::application::Repositories;
use crate::domain::entities::{
    Address, BarcodeInnerNumber, Client, Counterparty, Parcel, PostOffice, PostcodePool, Shipment,
    ShipmentTrackingDetail, TariffGrid,
};
use crate::domain::enums::W2wVariation;
use crate::domain::repositories::{
    AddressRepository, ClientRepository, CounterpartyRepository, ParcelRepository,
    PostOfficeRepository, PostcodePoolRepository, ShipmentRepository,
    ShipmentTrackingDetailRepository, TariffGridRepository,
};
use crate::domain::value_objects::{
    AddressId, BarcodeInnerNumberId, ClientId, CounterpartyId, ParcelId, PostOfficeId, Postcode,
    PostcodePoolId, ShipmentId, ShipmentTrackingDetailId, TariffGridId,
};
use crate::error::PostalError;

#[derive(Debug, Default)]
struct MemoryState {
    addresses: Vec<Address>,
    postcode_pools: Vec<PostcodePool>,
    counterparties: Vec<Counterparty>,
    clients: Vec<Client>,
    shipments: Vec<Shipment>,
    post_offices: Vec<PostOffice>,
    tracking: Vec<ShipmentTrackingDetail>,
    tariffs: Vec<TariffGrid>,
}

type SharedState = Arc<RwLock<MemoryState>>;

/// 内存存储
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: SharedState,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> Repositories {
        let state = || self.state.clone();
        Repositories {
            addresses: Arc::new(InMemoryAddressRepository { state: state() }),
            postcode_pools: Arc::new(InMemoryPostcodePoolRepository { state: state() }),
            counterparties: Arc::new(InMemoryCounterpartyRepository { state: state() }),
            clients: Arc::new(InMemoryClientRepository { state: state() }),
            parcels: Arc::new(InMemoryParcelRepository { state: state() }),
            shipments: Arc::new(InMemoryShipmentRepository { state: state() }),
            post_offices: Arc::new(InMemoryPostOfficeRepository { state: state() }),
            tracking: Arc::new(InMemoryTrackingRepository { state: state() }),
            tariffs: Arc::new(InMemoryTariffGridRepository { state: state() }),
        }
    }
}

fn not_found(kind: &str, id: impl std::fmt::Display) -> AppError {
    AppError::not_found(format!("{} {} not found", kind, id))
}

/// 以公开 `id` 字段为主键的简单集合
macro_rules! vec_repository {
    ($repo:ident, $entity:ty, $id:ty, $field:ident, $kind:literal) => {
        pub struct $repo {
            state: SharedState,
        }

        #[async_trait]
        impl Repository<$entity, $id> for $repo {
            async fn find_all(&self) -> AppResult<Vec<$entity>> {
                Ok(self.state.read().await.$field.clone())
            }

            async fn find_by_id(&self, id: &$id) -> AppResult<Option<$entity>> {
                let state = self.state.read().await;
                Ok(state.$field.iter().find(|e| &e.id == id).cloned())
            }

            async fn save(&self, entity: &$entity) -> AppResult<()> {
                let mut state = self.state.write().await;
                if state.$field.iter().any(|e| e.id == entity.id) {
                    return Err(AppError::conflict(format!(
                        "{} {} already exists",
                        $kind, entity.id
                    )));
                }
                state.$field.push(entity.clone());
                Ok(())
            }

            async fn update(&self, entity: &$entity) -> AppResult<()> {
                let mut state = self.state.write().await;
                let slot = state
                    .$field
                    .iter_mut()
                    .find(|e| e.id == entity.id)
                    .ok_or_else(|| not_found($kind, entity.id))?;
                *slot = entity.clone();
                Ok(())
            }

            async fn delete(&self, id: &$id) -> AppResult<bool> {
                let mut state = self.state.write().await;
                let before = state.$field.len();
                state.$field.retain(|e| &e.id != id);
                Ok(before != state.$field.len())
            }
        }
    };
}

vec_repository!(InMemoryAddressRepository, Address, AddressId, addresses, "Address");
vec_repository!(InMemoryCounterpartyRepository, Counterparty, CounterpartyId, counterparties, "Counterparty");
vec_repository!(InMemoryClientRepository, Client, ClientId, clients, "Client");
vec_repository!(InMemoryPostOfficeRepository, PostOffice, PostOfficeId, post_offices, "Post office");
vec_repository!(InMemoryTrackingRepository, ShipmentTrackingDetail, ShipmentTrackingDetailId, tracking, "Tracking detail");
vec_repository!(InMemoryTariffGridRepository, TariffGrid, TariffGridId, tariffs, "Tariff row");

impl AddressRepository for InMemoryAddressRepository {}
impl CounterpartyRepository for InMemoryCounterpartyRepository {}
impl PostOfficeRepository for InMemoryPostOfficeRepository {}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn find_all_by_counterparty(&self, counterparty_id: &CounterpartyId) -> AppResult<Vec<Client>> {
        let state = self.state.read().await;
        Ok(state
            .clients
            .iter()
            .filter(|c| &c.counterparty_id == counterparty_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ShipmentTrackingDetailRepository for InMemoryTrackingRepository {
    async fn find_by_shipment(&self, shipment_id: &ShipmentId) -> AppResult<Vec<ShipmentTrackingDetail>> {
        let state = self.state.read().await;
        Ok(state
            .tracking
            .iter()
            .filter(|t| &t.shipment_id == shipment_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TariffGridRepository for InMemoryTariffGridRepository {
    async fn find_by_variation(&self, variation: W2wVariation) -> AppResult<Vec<TariffGrid>> {
        let state = self.state.read().await;
        Ok(state
            .tariffs
            .iter()
            .filter(|t| t.w2w_variation == variation)
            .cloned()
            .collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.state.read().await.tariffs.len() as i64)
    }
}

// ========== PostcodePool ==========

pub struct InMemoryPostcodePoolRepository {
    state: SharedState,
}

#[async_trait]
impl Repository<PostcodePool, PostcodePoolId> for InMemoryPostcodePoolRepository {
    async fn find_all(&self) -> AppResult<Vec<PostcodePool>> {
        Ok(self.state.read().await.postcode_pools.clone())
    }

    async fn find_by_id(&self, id: &PostcodePoolId) -> AppResult<Option<PostcodePool>> {
        let state = self.state.read().await;
        Ok(state.postcode_pools.iter().find(|p| p.id() == id).cloned())
    }

    async fn save(&self, pool: &PostcodePool) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state
            .postcode_pools
            .iter()
            .any(|p| p.id() == pool.id() || p.postcode() == pool.postcode())
        {
            return Err(AppError::conflict(format!(
                "Postcode pool {} already exists",
                pool.postcode()
            )));
        }
        state.postcode_pools.push(pool.clone());
        Ok(())
    }

    async fn update(&self, pool: &PostcodePool) -> AppResult<()> {
        let mut state = self.state.write().await;
        let slot = state
            .postcode_pools
            .iter_mut()
            .find(|p| p.id() == pool.id())
            .ok_or_else(|| not_found("Postcode pool", pool.id()))?;
        slot.set_postcode(pool.postcode().clone());
        slot.set_closed(pool.is_closed());
        Ok(())
    }

    async fn delete(&self, id: &PostcodePoolId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.postcode_pools.len();
        state.postcode_pools.retain(|p| p.id() != id);
        Ok(before != state.postcode_pools.len())
    }
}

#[async_trait]
impl PostcodePoolRepository for InMemoryPostcodePoolRepository {
    async fn find_by_postcode(&self, postcode: &Postcode) -> AppResult<Option<PostcodePool>> {
        let state = self.state.read().await;
        Ok(state
            .postcode_pools
            .iter()
            .find(|p| p.postcode() == postcode)
            .cloned())
    }

    async fn add_barcode(&self, barcode: &BarcodeInnerNumber) -> AppResult<()> {
        let mut state = self.state.write().await;
        let pool = state
            .postcode_pools
            .iter_mut()
            .find(|p| p.id() == &barcode.postcode_pool_id)
            .ok_or_else(|| not_found("Postcode pool", barcode.postcode_pool_id))?;
        if pool.find_barcode(&barcode.id).is_some() {
            return Ok(());
        }
        pool.add_barcode_inner_number(barcode.clone())?;
        Ok(())
    }

    async fn add_barcodes(&self, barcodes: &[BarcodeInnerNumber]) -> AppResult<()> {
        let mut state = self.state.write().await;
        let mut staged = state.postcode_pools.clone();
        for barcode in barcodes {
            let pool = staged
                .iter_mut()
                .find(|p| p.id() == &barcode.postcode_pool_id)
                .ok_or_else(|| not_found("Postcode pool", barcode.postcode_pool_id))?;
            pool.add_barcode_inner_number(barcode.clone())?;
        }
        state.postcode_pools = staged;
        Ok(())
    }

    async fn update_barcode(&self, barcode: &BarcodeInnerNumber) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state
            .postcode_pools
            .iter_mut()
            .find(|p| p.id() == &barcode.postcode_pool_id)
        {
            Some(pool) => Ok(pool.update_barcode(barcode.clone())?),
            None => Ok(false),
        }
    }

    async fn delete_barcode(
        &self,
        pool_id: &PostcodePoolId,
        barcode_id: &BarcodeInnerNumberId,
    ) -> AppResult<bool> {
        let mut state = self.state.write().await;
        Ok(state
            .postcode_pools
            .iter_mut()
            .find(|p| p.id() == pool_id)
            .is_some_and(|pool| pool.remove_barcode(barcode_id)))
    }
}

// ========== Shipment ==========

pub struct InMemoryShipmentRepository {
    state: SharedState,
}

#[async_trait]
impl Repository<Shipment, ShipmentId> for InMemoryShipmentRepository {
    async fn find_all(&self) -> AppResult<Vec<Shipment>> {
        Ok(self.state.read().await.shipments.clone())
    }

    async fn find_by_id(&self, id: &ShipmentId) -> AppResult<Option<Shipment>> {
        let state = self.state.read().await;
        Ok(state.shipments.iter().find(|s| s.id() == id).cloned())
    }

    async fn save(&self, shipment: &Shipment) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.shipments.iter().any(|s| s.id() == shipment.id()) {
            return Err(AppError::conflict(format!(
                "Shipment {} already exists",
                shipment.id()
            )));
        }
        state.shipments.push(shipment.clone());
        Ok(())
    }

    async fn update(&self, shipment: &Shipment) -> AppResult<()> {
        let mut state = self.state.write().await;
        let slot = state
            .shipments
            .iter_mut()
            .find(|s| s.id() == shipment.id())
            .ok_or_else(|| not_found("Shipment", shipment.id()))?;
        *slot = shipment.clone();
        Ok(())
    }

    async fn delete(&self, id: &ShipmentId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.shipments.len();
        state.shipments.retain(|s| s.id() != id);
        let deleted = before != state.shipments.len();
        if deleted {
            state.tracking.retain(|t| &t.shipment_id != id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl ShipmentRepository for InMemoryShipmentRepository {
    async fn find_all_by_sender(&self, sender_id: &ClientId) -> AppResult<Vec<Shipment>> {
        let state = self.state.read().await;
        Ok(state
            .shipments
            .iter()
            .filter(|s| s.sender_id() == sender_id)
            .cloned()
            .collect())
    }
}

// ========== Parcel ==========

/// 包裹视图：直接读写运单内的包裹列表
pub struct InMemoryParcelRepository {
    state: SharedState,
}

impl MemoryState {
    fn parcel_position(&self, id: &ParcelId) -> Option<(usize, usize)> {
        self.shipments.iter().enumerate().find_map(|(s, shipment)| {
            shipment
                .parcels()
                .iter()
                .position(|p| &p.id == id)
                .map(|p| (s, p))
        })
    }

    fn shipment_mut(&mut self, id: &ShipmentId) -> AppResult<&mut Shipment> {
        self.shipments
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| not_found("Shipment", id))
    }
}

#[async_trait]
impl Repository<Parcel, ParcelId> for InMemoryParcelRepository {
    async fn find_all(&self) -> AppResult<Vec<Parcel>> {
        let state = self.state.read().await;
        Ok(state
            .shipments
            .iter()
            .flat_map(|s| s.parcels().iter().cloned())
            .collect())
    }

    async fn find_by_id(&self, id: &ParcelId) -> AppResult<Option<Parcel>> {
        let state = self.state.read().await;
        Ok(state
            .parcel_position(id)
            .map(|(s, p)| state.shipments[s].parcels()[p].clone()))
    }

    async fn save(&self, parcel: &Parcel) -> AppResult<()> {
        let shipment_id = parcel.shipment_id.ok_or(PostalError::ParcelWithoutShipment)?;
        let mut state = self.state.write().await;
        if state.parcel_position(&parcel.id).is_some() {
            return Err(AppError::conflict(format!("Parcel {} already exists", parcel.id)));
        }
        let mut parcel = parcel.clone();
        parcel.link_items();
        state.shipment_mut(&shipment_id)?.parcels_mut().push(parcel);
        Ok(())
    }

    async fn update(&self, parcel: &Parcel) -> AppResult<()> {
        let shipment_id = parcel.shipment_id.ok_or(PostalError::ParcelWithoutShipment)?;
        let mut state = self.state.write().await;
        let (s, p) = state
            .parcel_position(&parcel.id)
            .ok_or_else(|| not_found("Parcel", parcel.id))?;
        let mut parcel = parcel.clone();
        parcel.link_items();
        if state.shipments[s].id() == &shipment_id {
            state.shipments[s].parcels_mut()[p] = parcel;
        } else {
            state.shipment_mut(&shipment_id)?;
            state.shipments[s].parcels_mut().remove(p);
            state.shipment_mut(&shipment_id)?.parcels_mut().push(parcel);
        }
        Ok(())
    }

    async fn delete(&self, id: &ParcelId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.parcel_position(id) {
            Some((s, p)) => {
                state.shipments[s].parcels_mut().remove(p);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ParcelRepository for InMemoryParcelRepository {
    async fn find_by_shipment(&self, shipment_id: &ShipmentId) -> AppResult<Vec<Parcel>> {
        let state = self.state.read().await;
        Ok(state
            .shipments
            .iter()
            .find(|s| s.id() == shipment_id)
            .map(|s| s.parcels().to_vec())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ParcelItem;
    use crate::domain::enums::{BarcodeStatus, DeliveryType};
    use crate::domain::value_objects::InnerNumber;
    use courier_domain_core::Money;

    fn parcel() -> Parcel {
        Parcel::new(
            vec![ParcelItem::new("Some item", 1, 2.0, Money::ZERO)],
            1.0,
            1.0,
            1.0,
            1.0,
            Money::ZERO,
            Money::ZERO,
        )
    }

    #[tokio::test]
    async fn test_parcel_repository_reads_through_shipments() {
        let repos = InMemoryStore::new().repositories();
        let shipment = Shipment::new(ClientId::new(), ClientId::new(), DeliveryType::W2w, vec![parcel()]);
        repos.shipments.save(&shipment).await.unwrap();

        let mut extra = parcel();
        extra.attach_to(*shipment.id());
        repos.parcels.save(&extra).await.unwrap();

        let parcels = repos.parcels.find_by_shipment(shipment.id()).await.unwrap();
        assert_eq!(parcels.len(), 2);
        assert_eq!(parcels[1].id, extra.id);
        assert!(parcels[1].parcel_items.iter().all(|i| i.parcel_id == Some(extra.id)));

        assert!(repos.parcels.delete(&extra.id).await.unwrap());
        assert!(!repos.parcels.delete(&extra.id).await.unwrap());
        assert_eq!(repos.parcels.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_parcel_without_shipment_is_rejected() {
        let repos = InMemoryStore::new().repositories();
        let err = repos.parcels.save(&parcel()).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_update_missing_entity_is_not_found() {
        let repos = InMemoryStore::new().repositories();
        let address = Address::new(
            Postcode::new("00001").unwrap(),
            "Kiev",
            "",
            "Kiev",
            "Khreschatik",
            "121",
            "37",
        );
        let err = repos.addresses.update(&address).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        repos.addresses.save(&address).await.unwrap();
        assert!(repos.addresses.exists(&address.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_pool_update_keeps_barcodes_issued_since_read() {
        let repos = InMemoryStore::new().repositories();
        let pool = PostcodePool::new(Postcode::new("00003").unwrap(), false);
        repos.postcode_pools.save(&pool).await.unwrap();

        // 另一个请求在读取之后发放了条码
        let mut stale = repos.postcode_pools.find_by_id(pool.id()).await.unwrap().unwrap();
        let mut fresh = stale.clone();
        let issued = fresh.issue_barcode_inner_number().unwrap();
        repos.postcode_pools.add_barcode(&issued).await.unwrap();

        stale.set_closed(true);
        repos.postcode_pools.update(&stale).await.unwrap();

        let stored = repos.postcode_pools.find_by_id(pool.id()).await.unwrap().unwrap();
        assert!(stored.is_closed());
        assert!(stored.find_barcode(&issued.id).is_some());
    }

    #[tokio::test]
    async fn test_barcode_batch_with_duplicate_is_rejected_whole() {
        let repos = InMemoryStore::new().repositories();
        let pool = PostcodePool::new(Postcode::new("00001").unwrap(), false);
        repos.postcode_pools.save(&pool).await.unwrap();

        let number = InnerNumber::new("0000001").unwrap();
        let batch = [
            BarcodeInnerNumber::new(*pool.id(), number.clone(), BarcodeStatus::Used),
            BarcodeInnerNumber::new(*pool.id(), number, BarcodeStatus::Reserved),
        ];
        let err = repos.postcode_pools.add_barcodes(&batch).await.unwrap_err();
        assert_eq!(err.status_code(), 409);

        let stored = repos.postcode_pools.find_by_id(pool.id()).await.unwrap().unwrap();
        assert!(stored.barcode_inner_numbers().is_empty());
    }
}
