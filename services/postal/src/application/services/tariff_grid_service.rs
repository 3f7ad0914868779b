//! 资费表服务

use std::sync::Arc;

use courier_errors::{AppError, AppResult};
use tracing::{debug, info};

use crate::application::dto::TariffGridDto;
use crate::application::mappers::tariff_from_dto;
use crate::domain::entities::TariffGrid;
use crate::domain::enums::W2wVariation;
use crate::domain::repositories::TariffGridRepository;
use crate::domain::services::ParcelPricing;
use crate::domain::value_objects::TariffGridId;
use crate::error::PostalError;

pub struct TariffGridService {
    tariff_repo: Arc<dyn TariffGridRepository>,
}

impl TariffGridService {
    pub fn new(tariff_repo: Arc<dyn TariffGridRepository>) -> Self {
        Self { tariff_repo }
    }

    pub async fn get_all(&self) -> AppResult<Vec<TariffGridDto>> {
        let rows = self.tariff_repo.find_all().await?;
        Ok(rows.iter().map(TariffGridDto::from).collect())
    }

    pub async fn get_by_id(&self, id: &TariffGridId) -> AppResult<Option<TariffGridDto>> {
        Ok(self
            .tariff_repo
            .find_by_id(id)
            .await?
            .as_ref()
            .map(TariffGridDto::from))
    }

    /// 按包裹重量、长度和档位查找资费行
    pub async fn find_by_dimension(
        &self,
        weight: f64,
        length: f64,
        variation: W2wVariation,
    ) -> AppResult<TariffGrid> {
        let rows = self.tariff_repo.find_by_variation(variation).await?;
        ParcelPricing::select_tariff(&rows, weight, length)
            .cloned()
            .ok_or_else(|| PostalError::EmptyTariffGrid(format!("{:?}", variation)).into())
    }

    pub async fn get_by_dimension(
        &self,
        weight: f64,
        length: f64,
        variation: W2wVariation,
    ) -> AppResult<TariffGridDto> {
        let tariff = self.find_by_dimension(weight, length, variation).await?;
        Ok(TariffGridDto::from(&tariff))
    }

    fn validate(dto: &TariffGridDto) -> AppResult<()> {
        if !(dto.weight.is_finite() && dto.weight > 0.0 && dto.length.is_finite() && dto.length > 0.0) {
            return Err(AppError::validation("Tariff weight and length limits must be positive"));
        }
        if dto.price.is_negative() {
            return Err(AppError::validation("Tariff price must not be negative"));
        }
        Ok(())
    }

    pub async fn save(&self, dto: TariffGridDto) -> AppResult<TariffGridDto> {
        Self::validate(&dto)?;
        let tariff = tariff_from_dto(TariffGridDto { id: None, ..dto });
        info!(
            "Saving tariff row {:?} {}kg/{}cm = {}",
            tariff.w2w_variation, tariff.weight, tariff.length, tariff.price
        );
        self.tariff_repo.save(&tariff).await?;
        Ok(TariffGridDto::from(&tariff))
    }

    pub async fn update(
        &self,
        id: &TariffGridId,
        dto: TariffGridDto,
    ) -> AppResult<Option<TariffGridDto>> {
        if !self.tariff_repo.exists(id).await? {
            debug!("Can't update tariff row. Row doesn't exist {}", id);
            return Ok(None);
        }
        Self::validate(&dto)?;
        let tariff = tariff_from_dto(TariffGridDto { id: Some(*id), ..dto });
        info!("Updating tariff row {}", id);
        self.tariff_repo.update(&tariff).await?;
        Ok(Some(TariffGridDto::from(&tariff)))
    }

    pub async fn delete(&self, id: &TariffGridId) -> AppResult<bool> {
        let deleted = self.tariff_repo.delete(id).await?;
        if !deleted {
            debug!("Can't delete tariff row. Row doesn't exist {}", id);
        }
        Ok(deleted)
    }
}
