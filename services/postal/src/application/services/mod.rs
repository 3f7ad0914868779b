//! 应用服务

mod address_service;
mod client_service;
mod counterparty_service;
mod parcel_service;
mod post_office_service;
mod postcode_pool_service;
mod shipment_service;
mod tariff_grid_service;
mod tracking_service;

pub use address_service::AddressService;
pub use client_service::ClientService;
pub use counterparty_service::CounterpartyService;
pub use parcel_service::ParcelService;
pub use post_office_service::PostOfficeService;
pub use postcode_pool_service::PostcodePoolService;
pub use shipment_service::ShipmentService;
pub use tariff_grid_service::TariffGridService;
pub use tracking_service::ShipmentTrackingService;
