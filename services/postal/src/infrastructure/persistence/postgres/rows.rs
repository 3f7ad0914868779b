//! 数据库行映射结构

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct AddressRow {
    pub id: Uuid,
    pub postcode: String,
    pub region: String,
    pub district: String,
    pub city: String,
    pub street: String,
    pub house_number: String,
    pub apartment_number: String,
}

#[derive(Debug, FromRow)]
pub struct PostcodePoolRow {
    pub id: Uuid,
    pub postcode: String,
    pub closed: bool,
}

#[derive(Debug, FromRow)]
pub struct BarcodeInnerNumberRow {
    pub id: Uuid,
    pub postcode_pool_id: Uuid,
    pub number: String,
    pub status: i16,
}

#[derive(Debug, FromRow)]
pub struct CounterpartyRow {
    pub id: Uuid,
    pub name: String,
    pub postcode_pool_id: Uuid,
}

#[derive(Debug, FromRow)]
pub struct ClientRow {
    pub id: Uuid,
    pub name: String,
    pub unique_registration_number: String,
    pub address_id: Uuid,
    pub counterparty_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 运单行，连同条码的邮编与内部号
#[derive(Debug, FromRow)]
pub struct ShipmentRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub delivery_type: i16,
    pub price: Decimal,
    pub barcode_id: Option<Uuid>,
    pub barcode_number: Option<String>,
    pub barcode_postcode: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct ParcelRow {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub declared_price: Decimal,
    pub price: Decimal,
}

#[derive(Debug, FromRow)]
pub struct ParcelItemRow {
    pub id: Uuid,
    pub parcel_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub weight: f64,
    pub price: Decimal,
}

#[derive(Debug, FromRow)]
pub struct PostOfficeRow {
    pub id: Uuid,
    pub name: String,
    pub address_id: Uuid,
    pub postcode_pool_id: Uuid,
}

#[derive(Debug, FromRow)]
pub struct ShipmentTrackingDetailRow {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub post_office_id: Uuid,
    pub status: i16,
    pub date: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct TariffGridRow {
    pub id: Uuid,
    pub weight: f64,
    pub length: f64,
    pub w2w_variation: i16,
    pub price: Decimal,
}
