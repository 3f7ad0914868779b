//! 领域实体

mod address;
mod barcode_inner_number;
mod client;
mod counterparty;
mod parcel;
mod post_office;
mod postcode_pool;
mod shipment;
mod shipment_tracking_detail;
mod tariff_grid;

pub use address::*;
pub use barcode_inner_number::*;
pub use client::*;
pub use counterparty::*;
pub use parcel::*;
pub use post_office::*;
pub use postcode_pool::*;
pub use shipment::*;
pub use shipment_tracking_detail::*;
pub use tariff_grid::*;
