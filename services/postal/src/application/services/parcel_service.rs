//! 包裹服务（含计价）

use std::sync::Arc;

use courier_domain_core::Money;
use courier_errors::{AppError, AppResult};
use tracing::{debug, info};

use crate::application::dto::{ParcelDto, ParcelItemDto};
use crate::application::mappers::parcel_from_dto;
use crate::domain::entities::{Address, Parcel, Shipment};
use crate::domain::enums::{DeliveryType, W2wVariation};
use crate::domain::repositories::{
    AddressRepository, ClientRepository, ParcelRepository, ShipmentRepository,
};
use crate::domain::services::ParcelPricing;
use crate::domain::value_objects::{ClientId, ParcelId, ShipmentId};
use crate::error::PostalError;

use super::TariffGridService;

pub struct ParcelService {
    parcel_repo: Arc<dyn ParcelRepository>,
    shipment_repo: Arc<dyn ShipmentRepository>,
    client_repo: Arc<dyn ClientRepository>,
    address_repo: Arc<dyn AddressRepository>,
    tariff_service: Arc<TariffGridService>,
    pricing: ParcelPricing,
}

impl ParcelService {
    pub fn new(
        parcel_repo: Arc<dyn ParcelRepository>,
        shipment_repo: Arc<dyn ShipmentRepository>,
        client_repo: Arc<dyn ClientRepository>,
        address_repo: Arc<dyn AddressRepository>,
        tariff_service: Arc<TariffGridService>,
        pricing: ParcelPricing,
    ) -> Self {
        Self {
            parcel_repo,
            shipment_repo,
            client_repo,
            address_repo,
            tariff_service,
            pricing,
        }
    }

    pub async fn get_all(&self) -> AppResult<Vec<ParcelDto>> {
        let parcels = self.parcel_repo.find_all().await?;
        Ok(parcels.iter().map(ParcelDto::from).collect())
    }

    pub async fn get_by_id(&self, id: &ParcelId) -> AppResult<Option<ParcelDto>> {
        Ok(self
            .parcel_repo
            .find_by_id(id)
            .await?
            .as_ref()
            .map(ParcelDto::from))
    }

    /// 运单不存在时返回 `None`
    pub async fn get_by_shipment(&self, shipment_id: &ShipmentId) -> AppResult<Option<Vec<ParcelDto>>> {
        if !self.shipment_repo.exists(shipment_id).await? {
            debug!("Can't get parcels. Shipment doesn't exist {}", shipment_id);
            return Ok(None);
        }
        let parcels = self.parcel_repo.find_by_shipment(shipment_id).await?;
        Ok(Some(parcels.iter().map(ParcelDto::from).collect()))
    }

    async fn client_address(&self, client_id: &ClientId) -> AppResult<Address> {
        let client = self
            .client_repo
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| AppError::validation(format!("Client {} does not exist", client_id)))?;
        self.address_repo
            .find_by_id(&client.address_id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Address {} of client {} does not exist",
                    client.address_id, client_id
                ))
            })
    }

    async fn resolve_variation(
        &self,
        sender_id: &ClientId,
        recipient_id: &ClientId,
    ) -> AppResult<W2wVariation> {
        let sender = self.client_address(sender_id).await?;
        let recipient = self.client_address(recipient_id).await?;
        Ok(ParcelPricing::resolve_variation(&sender, &recipient))
    }

    async fn price_with_variation(
        &self,
        parcel: &mut Parcel,
        variation: W2wVariation,
        delivery_type: DeliveryType,
    ) -> AppResult<Money> {
        let tariff = self
            .tariff_service
            .find_by_dimension(parcel.weight, parcel.length, variation)
            .await?;
        parcel.price = self.pricing.price(parcel, &tariff, delivery_type);
        Ok(parcel.price)
    }

    /// 计算单个包裹价格并写回包裹
    pub async fn calculate_price(
        &self,
        parcel: &mut Parcel,
        sender_id: &ClientId,
        recipient_id: &ClientId,
        delivery_type: DeliveryType,
    ) -> AppResult<Money> {
        let variation = self.resolve_variation(sender_id, recipient_id).await?;
        self.price_with_variation(parcel, variation, delivery_type).await
    }

    /// 为运单内全部包裹计价、回填引用并重算运单总价
    pub async fn price_shipment(&self, shipment: &mut Shipment) -> AppResult<()> {
        if !shipment.parcels().is_empty() {
            let variation = self
                .resolve_variation(shipment.sender_id(), shipment.recipient_id())
                .await?;
            let delivery_type = shipment.delivery_type();
            for parcel in shipment.parcels_mut() {
                self.price_with_variation(parcel, variation, delivery_type)
                    .await?;
            }
        }
        shipment.attach_parcels();
        shipment.recalculate_price();
        Ok(())
    }

    async fn owning_shipment(&self, parcel: &Parcel) -> AppResult<Shipment> {
        let shipment_id = parcel.shipment_id.ok_or(PostalError::ParcelWithoutShipment)?;
        self.shipment_repo
            .find_by_id(&shipment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Shipment {} not found", shipment_id)))
    }

    /// 更新包裹并按所属运单重新计价
    pub async fn update(&self, id: &ParcelId, dto: ParcelDto) -> AppResult<Option<ParcelDto>> {
        let Some(existing) = self.parcel_repo.find_by_id(id).await? else {
            debug!("Can't update parcel. Parcel doesn't exist {}", id);
            return Ok(None);
        };
        let mut shipment = self.owning_shipment(&existing).await?;
        // 只保留本包裹已有物品的 ID，其余物品视为新物品
        let parcel_items = dto
            .parcel_items
            .into_iter()
            .map(|item| ParcelItemDto {
                id: item
                    .id
                    .filter(|item_id| existing.parcel_items.iter().any(|i| i.id == *item_id)),
                ..item
            })
            .collect();
        let mut parcel = parcel_from_dto(ParcelDto {
            id: Some(*id),
            shipment_id: existing.shipment_id,
            parcel_items,
            ..dto
        })?;
        self.calculate_price(
            &mut parcel,
            shipment.sender_id(),
            shipment.recipient_id(),
            shipment.delivery_type(),
        )
        .await?;

        if let Some(slot) = shipment.parcels_mut().iter_mut().find(|p| p.id == *id) {
            *slot = parcel.clone();
        }
        shipment.recalculate_price();
        info!("Updating parcel {} of shipment {}", id, shipment.id());
        self.shipment_repo.update(&shipment).await?;
        Ok(Some(ParcelDto::from(&parcel)))
    }

    /// 删除包裹并重算所属运单总价
    pub async fn delete(&self, id: &ParcelId) -> AppResult<bool> {
        let Some(parcel) = self.parcel_repo.find_by_id(id).await? else {
            debug!("Can't delete parcel. Parcel doesn't exist {}", id);
            return Ok(false);
        };
        let mut shipment = self.owning_shipment(&parcel).await?;
        shipment.remove_parcel(id);
        info!("Deleting parcel {} from shipment {}", id, shipment.id());
        self.shipment_repo.update(&shipment).await?;
        Ok(true)
    }
}
