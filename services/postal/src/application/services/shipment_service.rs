//! 运单服务

use std::sync::Arc;

use courier_errors::{AppError, AppResult};
use courier_telemetry::{increment_counter, names};
use tracing::{debug, info};

use crate::application::dto::{ParcelDto, ShipmentDto, UpdateShipmentDto};
use crate::application::mappers::{new_parcel_from_dto, shipment_from_dto};
use crate::domain::entities::{Client, Shipment, ShipmentBarcode};
use crate::domain::repositories::{
    ClientRepository, CounterpartyRepository, PostcodePoolRepository, ShipmentRepository,
};
use crate::domain::value_objects::{ClientId, ShipmentId};

use super::{ParcelService, PostcodePoolService};

pub struct ShipmentService {
    shipment_repo: Arc<dyn ShipmentRepository>,
    client_repo: Arc<dyn ClientRepository>,
    counterparty_repo: Arc<dyn CounterpartyRepository>,
    pool_repo: Arc<dyn PostcodePoolRepository>,
    pool_service: Arc<PostcodePoolService>,
    parcel_service: Arc<ParcelService>,
}

impl ShipmentService {
    pub fn new(
        shipment_repo: Arc<dyn ShipmentRepository>,
        client_repo: Arc<dyn ClientRepository>,
        counterparty_repo: Arc<dyn CounterpartyRepository>,
        pool_repo: Arc<dyn PostcodePoolRepository>,
        pool_service: Arc<PostcodePoolService>,
        parcel_service: Arc<ParcelService>,
    ) -> Self {
        Self {
            shipment_repo,
            client_repo,
            counterparty_repo,
            pool_repo,
            pool_service,
            parcel_service,
        }
    }

    // ========== 实体级访问 ==========

    pub async fn get_all_entities(&self) -> AppResult<Vec<Shipment>> {
        info!("Getting all shipments");
        self.shipment_repo.find_all().await
    }

    pub async fn get_entity_by_id(&self, id: &ShipmentId) -> AppResult<Option<Shipment>> {
        info!("Getting shipment by id {}", id);
        self.shipment_repo.find_by_id(id).await
    }

    /// 原样保存运单实体（不发放条码、不重新计价）
    pub async fn save_entity(&self, shipment: Shipment) -> AppResult<Shipment> {
        info!("Saving shipment {}", shipment.id());
        self.shipment_repo.save(&shipment).await?;
        Ok(shipment)
    }

    // ========== DTO 级访问 ==========

    pub async fn get_all(&self) -> AppResult<Vec<ShipmentDto>> {
        let shipments = self.get_all_entities().await?;
        Ok(shipments.iter().map(ShipmentDto::from).collect())
    }

    /// 客户不存在时返回 `None`，否则返回该客户寄出的运单
    pub async fn get_all_by_client(&self, client_id: &ClientId) -> AppResult<Option<Vec<ShipmentDto>>> {
        if !self.client_repo.exists(client_id).await? {
            debug!("Can't get shipment list by client. Client {} doesn't exist", client_id);
            return Ok(None);
        }
        info!("Getting all shipments by client {}", client_id);
        let shipments = self.shipment_repo.find_all_by_sender(client_id).await?;
        Ok(Some(shipments.iter().map(ShipmentDto::from).collect()))
    }

    pub async fn get_by_id(&self, id: &ShipmentId) -> AppResult<Option<ShipmentDto>> {
        Ok(self
            .get_entity_by_id(id)
            .await?
            .as_ref()
            .map(ShipmentDto::from))
    }

    async fn require_client(&self, id: &ClientId, role: &str) -> AppResult<Client> {
        self.client_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::validation(format!("{} client {} does not exist", role, id)))
    }

    /// 创建运单
    ///
    /// 先校验并计价，再从寄件人所属合作方的邮编池发放条码；
    /// 条码先于运单持久化，请求被拒绝时不会占用号码。
    pub async fn save(&self, dto: ShipmentDto) -> AppResult<ShipmentDto> {
        let sender = self.require_client(&dto.sender_id, "Sender").await?;
        self.require_client(&dto.recipient_id, "Recipient").await?;

        let counterparty = self
            .counterparty_repo
            .find_by_id(&sender.counterparty_id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Counterparty {} of client {} does not exist",
                    sender.counterparty_id, sender.id
                ))
            })?;
        let mut pool = self
            .pool_repo
            .find_by_id(&counterparty.postcode_pool_id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Postcode pool {} of counterparty {} does not exist",
                    counterparty.postcode_pool_id, counterparty.name
                ))
            })?;

        let mut shipment = shipment_from_dto(dto)?;
        self.parcel_service.price_shipment(&mut shipment).await?;

        let barcode = self.pool_service.issue(&mut pool).await?;
        shipment.assign_barcode(ShipmentBarcode {
            id: barcode.id,
            postcode: pool.postcode().clone(),
            number: barcode.number,
        });

        info!(
            "Saving shipment {} ({}, {} parcels, price {})",
            shipment.id(),
            shipment.delivery_type().as_str(),
            shipment.parcels().len(),
            shipment.price()
        );
        self.shipment_repo.save(&shipment).await?;
        increment_counter(names::SHIPMENTS_CREATED);
        Ok(ShipmentDto::from(&shipment))
    }

    /// 合并更新：只覆盖提供了值的字段，ID 与条码保持不变
    pub async fn update(&self, id: &ShipmentId, dto: UpdateShipmentDto) -> AppResult<Option<ShipmentDto>> {
        let Some(mut target) = self.shipment_repo.find_by_id(id).await? else {
            debug!("Can't update shipment. Shipment doesn't exist {}", id);
            return Ok(None);
        };

        if let Some(sender_id) = dto.sender_id {
            self.require_client(&sender_id, "Sender").await?;
            target.set_sender(sender_id);
        }
        if let Some(recipient_id) = dto.recipient_id {
            self.require_client(&recipient_id, "Recipient").await?;
            target.set_recipient(recipient_id);
        }
        if let Some(delivery_type) = dto.delivery_type {
            target.set_delivery_type(delivery_type);
        }
        if let Some(parcels) = dto.parcels {
            let parcels = parcels
                .into_iter()
                .map(new_parcel_from_dto)
                .collect::<AppResult<Vec<_>>>()?;
            target.replace_parcels(parcels);
        }
        self.parcel_service.price_shipment(&mut target).await?;

        info!("Updating shipment {}", id);
        self.shipment_repo.update(&target).await?;
        Ok(Some(ShipmentDto::from(&target)))
    }

    pub async fn delete(&self, id: &ShipmentId) -> AppResult<bool> {
        let deleted = self.shipment_repo.delete(id).await?;
        if deleted {
            info!("Deleted shipment {}", id);
            increment_counter(names::SHIPMENTS_DELETED);
        } else {
            debug!("Can't delete shipment. Shipment doesn't exist {}", id);
        }
        Ok(deleted)
    }

    /// 新包裹排在已有包裹之前；运单不存在时返回 `false`
    pub async fn add_parcels_to_shipment(&self, id: &ShipmentId, parcels: Vec<ParcelDto>) -> AppResult<bool> {
        let Some(mut shipment) = self.shipment_repo.find_by_id(id).await? else {
            debug!("Can't add parcels list to shipment. Shipment doesn't exist {}", id);
            return Ok(false);
        };
        let parcels = parcels
            .into_iter()
            .map(new_parcel_from_dto)
            .collect::<AppResult<Vec<_>>>()?;
        let added = parcels.len();
        shipment.prepend_parcels(parcels);
        self.parcel_service.price_shipment(&mut shipment).await?;

        info!("Adding {} parcels to shipment {}", added, id);
        self.shipment_repo.update(&shipment).await?;
        Ok(true)
    }
}
