//! 应用层

pub mod dto;
pub mod mappers;
pub mod services;

use std::sync::Arc;

use crate::domain::repositories::{
    AddressRepository, ClientRepository, CounterpartyRepository, ParcelRepository,
    PostOfficeRepository, PostcodePoolRepository, ShipmentRepository,
    ShipmentTrackingDetailRepository, TariffGridRepository,
};
use crate::domain::services::ParcelPricing;
use services::*;

/// 一组仓储实现（Postgres 或内存）
#[derive(Clone)]
pub struct Repositories {
    pub addresses: Arc<dyn AddressRepository>,
    pub postcode_pools: Arc<dyn PostcodePoolRepository>,
    pub counterparties: Arc<dyn CounterpartyRepository>,
    pub clients: Arc<dyn ClientRepository>,
    pub parcels: Arc<dyn ParcelRepository>,
    pub shipments: Arc<dyn ShipmentRepository>,
    pub post_offices: Arc<dyn PostOfficeRepository>,
    pub tracking: Arc<dyn ShipmentTrackingDetailRepository>,
    pub tariffs: Arc<dyn TariffGridRepository>,
}

/// 全部应用服务
#[derive(Clone)]
pub struct PostalServices {
    pub addresses: Arc<AddressService>,
    pub postcode_pools: Arc<PostcodePoolService>,
    pub counterparties: Arc<CounterpartyService>,
    pub clients: Arc<ClientService>,
    pub parcels: Arc<ParcelService>,
    pub shipments: Arc<ShipmentService>,
    pub post_offices: Arc<PostOfficeService>,
    pub tracking: Arc<ShipmentTrackingService>,
    pub tariffs: Arc<TariffGridService>,
}

impl PostalServices {
    pub fn new(repos: &Repositories, pricing: ParcelPricing) -> Self {
        let tariffs = Arc::new(TariffGridService::new(repos.tariffs.clone()));
        let postcode_pools = Arc::new(PostcodePoolService::new(repos.postcode_pools.clone()));
        let parcels = Arc::new(ParcelService::new(
            repos.parcels.clone(),
            repos.shipments.clone(),
            repos.clients.clone(),
            repos.addresses.clone(),
            tariffs.clone(),
            pricing,
        ));
        let shipments = Arc::new(ShipmentService::new(
            repos.shipments.clone(),
            repos.clients.clone(),
            repos.counterparties.clone(),
            repos.postcode_pools.clone(),
            postcode_pools.clone(),
            parcels.clone(),
        ));

        Self {
            addresses: Arc::new(AddressService::new(repos.addresses.clone())),
            counterparties: Arc::new(CounterpartyService::new(
                repos.counterparties.clone(),
                repos.postcode_pools.clone(),
            )),
            clients: Arc::new(ClientService::new(
                repos.clients.clone(),
                repos.addresses.clone(),
                repos.counterparties.clone(),
            )),
            post_offices: Arc::new(PostOfficeService::new(
                repos.post_offices.clone(),
                repos.addresses.clone(),
                repos.postcode_pools.clone(),
            )),
            tracking: Arc::new(ShipmentTrackingService::new(
                repos.tracking.clone(),
                repos.shipments.clone(),
                repos.post_offices.clone(),
            )),
            postcode_pools,
            parcels,
            shipments,
            tariffs,
        }
    }
}
