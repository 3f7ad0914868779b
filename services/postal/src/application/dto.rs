//! 对外数据传输对象
//!
//! ID 与计算字段（价格、条码）在入参中可省略，由服务端填充。

use chrono::{DateTime, Utc};
use courier_domain_core::Money;
use serde::{Deserialize, Serialize};

use crate::domain::enums::{BarcodeStatus, DeliveryType, ShipmentStatus, W2wVariation};
use crate::domain::value_objects::{
    AddressId, BarcodeInnerNumberId, ClientId, CounterpartyId, ParcelId, ParcelItemId,
    PostOfficeId, PostcodePoolId, ShipmentId, ShipmentTrackingDetailId, TariffGridId,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressDto {
    #[serde(default)]
    pub id: Option<AddressId>,
    pub postcode: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub house_number: String,
    #[serde(default)]
    pub apartment_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeInnerNumberDto {
    #[serde(default)]
    pub id: Option<BarcodeInnerNumberId>,
    pub number: String,
    #[serde(default = "default_barcode_status")]
    pub status: BarcodeStatus,
}

fn default_barcode_status() -> BarcodeStatus {
    BarcodeStatus::Reserved
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostcodePoolDto {
    #[serde(default)]
    pub id: Option<PostcodePoolId>,
    pub postcode: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub barcode_inner_numbers: Vec<BarcodeInnerNumberDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartyDto {
    #[serde(default)]
    pub id: Option<CounterpartyId>,
    pub name: String,
    pub postcode_pool_id: PostcodePoolId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDto {
    #[serde(default)]
    pub id: Option<ClientId>,
    pub name: String,
    #[serde(default)]
    pub unique_registration_number: String,
    pub address_id: AddressId,
    pub counterparty_id: CounterpartyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostOfficeDto {
    #[serde(default)]
    pub id: Option<PostOfficeId>,
    pub name: String,
    pub address_id: AddressId,
    pub postcode_pool_id: PostcodePoolId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelItemDto {
    #[serde(default)]
    pub id: Option<ParcelItemId>,
    pub name: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelDto {
    #[serde(default)]
    pub id: Option<ParcelId>,
    #[serde(default)]
    pub shipment_id: Option<ShipmentId>,
    pub weight: f64,
    pub length: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub declared_price: Money,
    #[serde(default)]
    pub price: Money,
    #[serde(default)]
    pub parcel_items: Vec<ParcelItemDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentDto {
    #[serde(default)]
    pub id: Option<ShipmentId>,
    pub sender_id: ClientId,
    pub recipient_id: ClientId,
    pub delivery_type: DeliveryType,
    #[serde(default)]
    pub price: Money,
    /// 完整条码（邮编 + 内部号）
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub parcels: Vec<ParcelDto>,
}

/// 运单更新：只覆盖提供了值的字段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateShipmentDto {
    #[serde(default)]
    pub sender_id: Option<ClientId>,
    #[serde(default)]
    pub recipient_id: Option<ClientId>,
    #[serde(default)]
    pub delivery_type: Option<DeliveryType>,
    #[serde(default)]
    pub parcels: Option<Vec<ParcelDto>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentTrackingDetailDto {
    #[serde(default)]
    pub id: Option<ShipmentTrackingDetailId>,
    pub shipment_id: ShipmentId,
    pub post_office_id: PostOfficeId,
    pub status: ShipmentStatus,
    /// 省略时取当前时间
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffGridDto {
    #[serde(default)]
    pub id: Option<TariffGridId>,
    pub weight: f64,
    pub length: f64,
    pub w2w_variation: W2wVariation,
    pub price: Money,
}
