//! 邮局服务

use std::sync::Arc;

use courier_errors::{AppError, AppResult};
use tracing::{debug, info};

use crate::application::dto::PostOfficeDto;
use crate::application::mappers::post_office_from_dto;
use crate::domain::entities::PostOffice;
use crate::domain::repositories::{AddressRepository, PostOfficeRepository, PostcodePoolRepository};
use crate::domain::value_objects::PostOfficeId;

pub struct PostOfficeService {
    office_repo: Arc<dyn PostOfficeRepository>,
    address_repo: Arc<dyn AddressRepository>,
    pool_repo: Arc<dyn PostcodePoolRepository>,
}

impl PostOfficeService {
    pub fn new(
        office_repo: Arc<dyn PostOfficeRepository>,
        address_repo: Arc<dyn AddressRepository>,
        pool_repo: Arc<dyn PostcodePoolRepository>,
    ) -> Self {
        Self {
            office_repo,
            address_repo,
            pool_repo,
        }
    }

    pub async fn get_all(&self) -> AppResult<Vec<PostOfficeDto>> {
        let offices = self.office_repo.find_all().await?;
        Ok(offices.iter().map(PostOfficeDto::from).collect())
    }

    pub async fn get_by_id(&self, id: &PostOfficeId) -> AppResult<Option<PostOfficeDto>> {
        Ok(self
            .office_repo
            .find_by_id(id)
            .await?
            .as_ref()
            .map(PostOfficeDto::from))
    }

    async fn ensure_references(&self, office: &PostOffice) -> AppResult<()> {
        if !self.address_repo.exists(&office.address_id).await? {
            return Err(AppError::validation(format!(
                "Address {} does not exist",
                office.address_id
            )));
        }
        if !self.pool_repo.exists(&office.postcode_pool_id).await? {
            return Err(AppError::validation(format!(
                "Postcode pool {} does not exist",
                office.postcode_pool_id
            )));
        }
        Ok(())
    }

    pub async fn save(&self, dto: PostOfficeDto) -> AppResult<PostOfficeDto> {
        let office = post_office_from_dto(PostOfficeDto { id: None, ..dto });
        self.ensure_references(&office).await?;
        info!("Saving post office {} ({})", office.name, office.id);
        self.office_repo.save(&office).await?;
        Ok(PostOfficeDto::from(&office))
    }

    pub async fn update(
        &self,
        id: &PostOfficeId,
        dto: PostOfficeDto,
    ) -> AppResult<Option<PostOfficeDto>> {
        if !self.office_repo.exists(id).await? {
            debug!("Can't update post office. Post office doesn't exist {}", id);
            return Ok(None);
        }
        let office = post_office_from_dto(PostOfficeDto { id: Some(*id), ..dto });
        self.ensure_references(&office).await?;
        info!("Updating post office {}", id);
        self.office_repo.update(&office).await?;
        Ok(Some(PostOfficeDto::from(&office)))
    }

    pub async fn delete(&self, id: &PostOfficeId) -> AppResult<bool> {
        let deleted = self.office_repo.delete(id).await?;
        if !deleted {
            debug!("Can't delete post office. Post office doesn't exist {}", id);
        }
        Ok(deleted)
    }
}
