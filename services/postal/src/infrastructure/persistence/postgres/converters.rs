//! 数据库行到领域对象的转换

use std::collections::HashMap;

use courier_common::AuditInfo;
use courier_domain_core::Money;
use courier_errors::{AppError, AppResult};
use uuid::Uuid;

use crate::domain::entities::{
    Address, BarcodeInnerNumber, Client, Counterparty, Parcel, ParcelItem, PostOffice,
    PostcodePool, Shipment, ShipmentBarcode, ShipmentTrackingDetail, TariffGrid,
};
use crate::domain::enums::{BarcodeStatus, DeliveryType, ShipmentStatus, W2wVariation};
use crate::domain::value_objects::{
    AddressId, BarcodeInnerNumberId, ClientId, CounterpartyId, InnerNumber, ParcelId,
    ParcelItemId, PostOfficeId, Postcode, PostcodePoolId, ShipmentId, ShipmentTrackingDetailId,
    TariffGridId,
};

use super::rows::*;

fn corrupt(column: &str, value: i16) -> AppError {
    AppError::internal(format!("Unknown {} value in database: {}", column, value))
}

pub fn address_from_row(row: AddressRow) -> AppResult<Address> {
    Ok(Address {
        id: AddressId::from_uuid(row.id),
        postcode: Postcode::new(row.postcode)?,
        region: row.region,
        district: row.district,
        city: row.city,
        street: row.street,
        house_number: row.house_number,
        apartment_number: row.apartment_number,
    })
}

pub fn barcode_from_row(row: BarcodeInnerNumberRow) -> AppResult<BarcodeInnerNumber> {
    Ok(BarcodeInnerNumber {
        id: BarcodeInnerNumberId::from_uuid(row.id),
        postcode_pool_id: PostcodePoolId::from_uuid(row.postcode_pool_id),
        number: InnerNumber::new(row.number)?,
        status: BarcodeStatus::try_from(row.status).map_err(|v| corrupt("barcode status", v))?,
    })
}

/// 按池分组组装邮编池
pub fn pools_from_rows(
    pools: Vec<PostcodePoolRow>,
    barcodes: Vec<BarcodeInnerNumberRow>,
) -> AppResult<Vec<PostcodePool>> {
    let mut grouped: HashMap<Uuid, Vec<BarcodeInnerNumber>> = HashMap::new();
    for row in barcodes {
        grouped
            .entry(row.postcode_pool_id)
            .or_default()
            .push(barcode_from_row(row)?);
    }
    pools
        .into_iter()
        .map(|row| {
            Ok(PostcodePool::restore(
                PostcodePoolId::from_uuid(row.id),
                Postcode::new(row.postcode)?,
                row.closed,
                grouped.remove(&row.id).unwrap_or_default(),
            ))
        })
        .collect()
}

pub fn counterparty_from_row(row: CounterpartyRow) -> Counterparty {
    Counterparty {
        id: CounterpartyId::from_uuid(row.id),
        name: row.name,
        postcode_pool_id: PostcodePoolId::from_uuid(row.postcode_pool_id),
    }
}

pub fn client_from_row(row: ClientRow) -> Client {
    Client {
        id: ClientId::from_uuid(row.id),
        name: row.name,
        unique_registration_number: row.unique_registration_number,
        address_id: AddressId::from_uuid(row.address_id),
        counterparty_id: CounterpartyId::from_uuid(row.counterparty_id),
        audit_info: AuditInfo::restore(row.created_at, row.updated_at),
    }
}

pub fn post_office_from_row(row: PostOfficeRow) -> PostOffice {
    PostOffice {
        id: PostOfficeId::from_uuid(row.id),
        name: row.name,
        address_id: AddressId::from_uuid(row.address_id),
        postcode_pool_id: PostcodePoolId::from_uuid(row.postcode_pool_id),
    }
}

pub fn tracking_from_row(row: ShipmentTrackingDetailRow) -> AppResult<ShipmentTrackingDetail> {
    Ok(ShipmentTrackingDetail {
        id: ShipmentTrackingDetailId::from_uuid(row.id),
        shipment_id: ShipmentId::from_uuid(row.shipment_id),
        post_office_id: PostOfficeId::from_uuid(row.post_office_id),
        status: ShipmentStatus::try_from(row.status).map_err(|v| corrupt("shipment status", v))?,
        date: row.date,
    })
}

pub fn tariff_from_row(row: TariffGridRow) -> AppResult<TariffGrid> {
    Ok(TariffGrid {
        id: TariffGridId::from_uuid(row.id),
        weight: row.weight,
        length: row.length,
        w2w_variation: W2wVariation::try_from(row.w2w_variation)
            .map_err(|v| corrupt("w2w variation", v))?,
        price: Money::new(row.price),
    })
}

/// 组装包裹；行须已按位置排序
pub fn parcels_from_rows(parcels: Vec<ParcelRow>, items: Vec<ParcelItemRow>) -> Vec<Parcel> {
    let mut grouped: HashMap<Uuid, Vec<ParcelItem>> = HashMap::new();
    for row in items {
        grouped.entry(row.parcel_id).or_default().push(ParcelItem {
            id: ParcelItemId::from_uuid(row.id),
            parcel_id: Some(ParcelId::from_uuid(row.parcel_id)),
            name: row.name,
            quantity: row.quantity,
            weight: row.weight,
            price: Money::new(row.price),
        });
    }
    parcels
        .into_iter()
        .map(|row| Parcel {
            id: ParcelId::from_uuid(row.id),
            shipment_id: Some(ShipmentId::from_uuid(row.shipment_id)),
            weight: row.weight,
            length: row.length,
            width: row.width,
            height: row.height,
            declared_price: Money::new(row.declared_price),
            price: Money::new(row.price),
            parcel_items: grouped.remove(&row.id).unwrap_or_default(),
        })
        .collect()
}

pub fn shipments_from_rows(rows: Vec<ShipmentRow>, parcels: Vec<Parcel>) -> AppResult<Vec<Shipment>> {
    let mut grouped: HashMap<ShipmentId, Vec<Parcel>> = HashMap::new();
    for parcel in parcels {
        if let Some(shipment_id) = parcel.shipment_id {
            grouped.entry(shipment_id).or_default().push(parcel);
        }
    }
    rows.into_iter()
        .map(|row| {
            let id = ShipmentId::from_uuid(row.id);
            let barcode = match (row.barcode_id, row.barcode_postcode, row.barcode_number) {
                (Some(barcode_id), Some(postcode), Some(number)) => Some(ShipmentBarcode {
                    id: BarcodeInnerNumberId::from_uuid(barcode_id),
                    postcode: Postcode::new(postcode)?,
                    number: InnerNumber::new(number)?,
                }),
                _ => None,
            };
            Ok(Shipment::restore(
                id,
                ClientId::from_uuid(row.sender_id),
                ClientId::from_uuid(row.recipient_id),
                DeliveryType::try_from(row.delivery_type)
                    .map_err(|v| corrupt("delivery type", v))?,
                Money::new(row.price),
                barcode,
                grouped.remove(&id).unwrap_or_default(),
                AuditInfo::restore(row.created_at, row.updated_at),
            ))
        })
        .collect()
}
