pub mod addresses;
pub mod clients;
pub mod counterparties;
pub mod parcels;
pub mod post_offices;
pub mod postcodes;
pub mod shipments;
pub mod tariffs;
pub mod tracking;
