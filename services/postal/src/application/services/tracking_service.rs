//! 运单跟踪服务

use std::sync::Arc;

use courier_errors::{AppError, AppResult};
use tracing::{debug, info};

use crate::application::dto::ShipmentTrackingDetailDto;
use crate::application::mappers::tracking_from_dto;
use crate::domain::entities::ShipmentTrackingDetail;
use crate::domain::repositories::{
    PostOfficeRepository, ShipmentRepository, ShipmentTrackingDetailRepository,
};
use crate::domain::value_objects::{ShipmentId, ShipmentTrackingDetailId};

pub struct ShipmentTrackingService {
    tracking_repo: Arc<dyn ShipmentTrackingDetailRepository>,
    shipment_repo: Arc<dyn ShipmentRepository>,
    office_repo: Arc<dyn PostOfficeRepository>,
}

impl ShipmentTrackingService {
    pub fn new(
        tracking_repo: Arc<dyn ShipmentTrackingDetailRepository>,
        shipment_repo: Arc<dyn ShipmentRepository>,
        office_repo: Arc<dyn PostOfficeRepository>,
    ) -> Self {
        Self {
            tracking_repo,
            shipment_repo,
            office_repo,
        }
    }

    pub async fn get_all(&self) -> AppResult<Vec<ShipmentTrackingDetailDto>> {
        let details = self.tracking_repo.find_all().await?;
        Ok(details.iter().map(ShipmentTrackingDetailDto::from).collect())
    }

    pub async fn get_by_id(
        &self,
        id: &ShipmentTrackingDetailId,
    ) -> AppResult<Option<ShipmentTrackingDetailDto>> {
        Ok(self
            .tracking_repo
            .find_by_id(id)
            .await?
            .as_ref()
            .map(ShipmentTrackingDetailDto::from))
    }

    /// 运单不存在时返回 `None`；记录按时间先后排列
    pub async fn get_by_shipment(
        &self,
        shipment_id: &ShipmentId,
    ) -> AppResult<Option<Vec<ShipmentTrackingDetailDto>>> {
        if !self.shipment_repo.exists(shipment_id).await? {
            debug!("Can't get tracking. Shipment doesn't exist {}", shipment_id);
            return Ok(None);
        }
        let mut details = self.tracking_repo.find_by_shipment(shipment_id).await?;
        details.sort_by_key(|d| d.date);
        Ok(Some(details.iter().map(ShipmentTrackingDetailDto::from).collect()))
    }

    async fn ensure_references(&self, detail: &ShipmentTrackingDetail) -> AppResult<()> {
        if !self.shipment_repo.exists(&detail.shipment_id).await? {
            return Err(AppError::validation(format!(
                "Shipment {} does not exist",
                detail.shipment_id
            )));
        }
        if !self.office_repo.exists(&detail.post_office_id).await? {
            return Err(AppError::validation(format!(
                "Post office {} does not exist",
                detail.post_office_id
            )));
        }
        Ok(())
    }

    pub async fn save(&self, dto: ShipmentTrackingDetailDto) -> AppResult<ShipmentTrackingDetailDto> {
        let detail = tracking_from_dto(ShipmentTrackingDetailDto { id: None, ..dto });
        self.ensure_references(&detail).await?;
        info!(
            "Shipment {} is {:?} at post office {}",
            detail.shipment_id, detail.status, detail.post_office_id
        );
        self.tracking_repo.save(&detail).await?;
        Ok(ShipmentTrackingDetailDto::from(&detail))
    }

    pub async fn update(
        &self,
        id: &ShipmentTrackingDetailId,
        dto: ShipmentTrackingDetailDto,
    ) -> AppResult<Option<ShipmentTrackingDetailDto>> {
        let Some(existing) = self.tracking_repo.find_by_id(id).await? else {
            debug!("Can't update tracking detail. Detail doesn't exist {}", id);
            return Ok(None);
        };
        let date = dto.date.unwrap_or(existing.date);
        let detail = tracking_from_dto(ShipmentTrackingDetailDto {
            id: Some(*id),
            date: Some(date),
            ..dto
        });
        self.ensure_references(&detail).await?;
        info!("Updating tracking detail {}", id);
        self.tracking_repo.update(&detail).await?;
        Ok(Some(ShipmentTrackingDetailDto::from(&detail)))
    }

    pub async fn delete(&self, id: &ShipmentTrackingDetailId) -> AppResult<bool> {
        let deleted = self.tracking_repo.delete(id).await?;
        if !deleted {
            debug!("Can't delete tracking detail. Detail doesn't exist {}", id);
        }
        Ok(deleted)
    }
}
