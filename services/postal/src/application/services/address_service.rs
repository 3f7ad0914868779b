//! 地址服务

use std::sync::Arc;

use courier_errors::AppResult;
use tracing::{debug, info};

use crate::application::dto::AddressDto;
use crate::application::mappers::address_from_dto;
use crate::domain::repositories::AddressRepository;
use crate::domain::value_objects::AddressId;

pub struct AddressService {
    address_repo: Arc<dyn AddressRepository>,
}

impl AddressService {
    pub fn new(address_repo: Arc<dyn AddressRepository>) -> Self {
        Self { address_repo }
    }

    pub async fn get_all(&self) -> AppResult<Vec<AddressDto>> {
        let addresses = self.address_repo.find_all().await?;
        Ok(addresses.iter().map(AddressDto::from).collect())
    }

    pub async fn get_by_id(&self, id: &AddressId) -> AppResult<Option<AddressDto>> {
        Ok(self
            .address_repo
            .find_by_id(id)
            .await?
            .as_ref()
            .map(AddressDto::from))
    }

    pub async fn save(&self, dto: AddressDto) -> AppResult<AddressDto> {
        let address = address_from_dto(AddressDto { id: None, ..dto })?;
        info!("Saving address {}", address.id);
        self.address_repo.save(&address).await?;
        Ok(AddressDto::from(&address))
    }

    pub async fn update(&self, id: &AddressId, dto: AddressDto) -> AppResult<Option<AddressDto>> {
        if !self.address_repo.exists(id).await? {
            debug!("Can't update address. Address doesn't exist {}", id);
            return Ok(None);
        }
        let address = address_from_dto(AddressDto { id: Some(*id), ..dto })?;
        info!("Updating address {}", id);
        self.address_repo.update(&address).await?;
        Ok(Some(AddressDto::from(&address)))
    }

    pub async fn delete(&self, id: &AddressId) -> AppResult<bool> {
        let deleted = self.address_repo.delete(id).await?;
        if deleted {
            info!("Deleted address {}", id);
        } else {
            debug!("Can't delete address. Address doesn't exist {}", id);
        }
        Ok(deleted)
    }
}
