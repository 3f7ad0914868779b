//! 客户服务

use std::sync::Arc;

use courier_errors::{AppError, AppResult};
use tracing::{debug, info};

use crate::application::dto::ClientDto;
use crate::application::mappers::client_from_dto;
use crate::domain::entities::Client;
use crate::domain::repositories::{AddressRepository, ClientRepository, CounterpartyRepository};
use crate::domain::value_objects::{ClientId, CounterpartyId};

pub struct ClientService {
    client_repo: Arc<dyn ClientRepository>,
    address_repo: Arc<dyn AddressRepository>,
    counterparty_repo: Arc<dyn CounterpartyRepository>,
}

impl ClientService {
    pub fn new(
        client_repo: Arc<dyn ClientRepository>,
        address_repo: Arc<dyn AddressRepository>,
        counterparty_repo: Arc<dyn CounterpartyRepository>,
    ) -> Self {
        Self {
            client_repo,
            address_repo,
            counterparty_repo,
        }
    }

    pub async fn get_all(&self) -> AppResult<Vec<ClientDto>> {
        let clients = self.client_repo.find_all().await?;
        Ok(clients.iter().map(ClientDto::from).collect())
    }

    /// 合作方不存在时返回 `None`
    pub async fn get_all_by_counterparty(
        &self,
        counterparty_id: &CounterpartyId,
    ) -> AppResult<Option<Vec<ClientDto>>> {
        if !self.counterparty_repo.exists(counterparty_id).await? {
            debug!("Can't get clients. Counterparty doesn't exist {}", counterparty_id);
            return Ok(None);
        }
        let clients = self
            .client_repo
            .find_all_by_counterparty(counterparty_id)
            .await?;
        Ok(Some(clients.iter().map(ClientDto::from).collect()))
    }

    pub async fn get_by_id(&self, id: &ClientId) -> AppResult<Option<ClientDto>> {
        Ok(self
            .client_repo
            .find_by_id(id)
            .await?
            .as_ref()
            .map(ClientDto::from))
    }

    async fn ensure_references(&self, client: &Client) -> AppResult<()> {
        if !self.address_repo.exists(&client.address_id).await? {
            return Err(AppError::validation(format!(
                "Address {} does not exist",
                client.address_id
            )));
        }
        if !self.counterparty_repo.exists(&client.counterparty_id).await? {
            return Err(AppError::validation(format!(
                "Counterparty {} does not exist",
                client.counterparty_id
            )));
        }
        Ok(())
    }

    pub async fn save(&self, dto: ClientDto) -> AppResult<ClientDto> {
        let client = client_from_dto(ClientDto { id: None, ..dto });
        self.ensure_references(&client).await?;
        info!("Saving client {} ({})", client.name, client.id);
        self.client_repo.save(&client).await?;
        Ok(ClientDto::from(&client))
    }

    pub async fn update(&self, id: &ClientId, dto: ClientDto) -> AppResult<Option<ClientDto>> {
        let Some(existing) = self.client_repo.find_by_id(id).await? else {
            debug!("Can't update client. Client doesn't exist {}", id);
            return Ok(None);
        };
        let mut client = client_from_dto(ClientDto { id: Some(*id), ..dto });
        self.ensure_references(&client).await?;
        client.audit_info = existing.audit_info;
        client.audit_info.touch();
        info!("Updating client {}", id);
        self.client_repo.update(&client).await?;
        Ok(Some(ClientDto::from(&client)))
    }

    pub async fn delete(&self, id: &ClientId) -> AppResult<bool> {
        let deleted = self.client_repo.delete(id).await?;
        if deleted {
            info!("Deleted client {}", id);
        } else {
            debug!("Can't delete client. Client doesn't exist {}", id);
        }
        Ok(deleted)
    }
}
