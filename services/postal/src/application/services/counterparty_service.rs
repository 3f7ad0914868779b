//! 合作方服务

use std::sync::Arc;

use courier_errors::{AppError, AppResult};
use tracing::{debug, info};

use crate::application::dto::CounterpartyDto;
use crate::application::mappers::counterparty_from_dto;
use crate::domain::repositories::{CounterpartyRepository, PostcodePoolRepository};
use crate::domain::value_objects::{CounterpartyId, PostcodePoolId};

pub struct CounterpartyService {
    counterparty_repo: Arc<dyn CounterpartyRepository>,
    pool_repo: Arc<dyn PostcodePoolRepository>,
}

impl CounterpartyService {
    pub fn new(
        counterparty_repo: Arc<dyn CounterpartyRepository>,
        pool_repo: Arc<dyn PostcodePoolRepository>,
    ) -> Self {
        Self {
            counterparty_repo,
            pool_repo,
        }
    }

    pub async fn get_all(&self) -> AppResult<Vec<CounterpartyDto>> {
        let counterparties = self.counterparty_repo.find_all().await?;
        Ok(counterparties.iter().map(CounterpartyDto::from).collect())
    }

    pub async fn get_by_id(&self, id: &CounterpartyId) -> AppResult<Option<CounterpartyDto>> {
        Ok(self
            .counterparty_repo
            .find_by_id(id)
            .await?
            .as_ref()
            .map(CounterpartyDto::from))
    }

    async fn ensure_pool_exists(&self, pool_id: &PostcodePoolId) -> AppResult<()> {
        if self.pool_repo.exists(pool_id).await? {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Postcode pool {} does not exist",
                pool_id
            )))
        }
    }

    pub async fn save(&self, dto: CounterpartyDto) -> AppResult<CounterpartyDto> {
        self.ensure_pool_exists(&dto.postcode_pool_id).await?;
        let counterparty = counterparty_from_dto(CounterpartyDto { id: None, ..dto });
        info!("Saving counterparty {} ({})", counterparty.name, counterparty.id);
        self.counterparty_repo.save(&counterparty).await?;
        Ok(CounterpartyDto::from(&counterparty))
    }

    pub async fn update(
        &self,
        id: &CounterpartyId,
        dto: CounterpartyDto,
    ) -> AppResult<Option<CounterpartyDto>> {
        if !self.counterparty_repo.exists(id).await? {
            debug!("Can't update counterparty. Counterparty doesn't exist {}", id);
            return Ok(None);
        }
        self.ensure_pool_exists(&dto.postcode_pool_id).await?;
        let counterparty = counterparty_from_dto(CounterpartyDto { id: Some(*id), ..dto });
        info!("Updating counterparty {}", id);
        self.counterparty_repo.update(&counterparty).await?;
        Ok(Some(CounterpartyDto::from(&counterparty)))
    }

    pub async fn delete(&self, id: &CounterpartyId) -> AppResult<bool> {
        let deleted = self.counterparty_repo.delete(id).await?;
        if deleted {
            info!("Deleted counterparty {}", id);
        } else {
            debug!("Can't delete counterparty. Counterparty doesn't exist {}", id);
        }
        Ok(deleted)
    }
}
