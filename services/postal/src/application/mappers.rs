//! DTO 与领域实体之间的转换

use chrono::Utc;
use courier_errors::AppResult;

use super::dto::*;
use crate::domain::entities::{
    Address, BarcodeInnerNumber, Client, Counterparty, Parcel, ParcelItem, PostOffice,
    PostcodePool, Shipment, ShipmentTrackingDetail, TariffGrid,
};
use crate::domain::value_objects::{
    InnerNumber, ParcelId, ParcelItemId, Postcode, PostcodePoolId, ShipmentTrackingDetailId,
};

// ========== Address ==========

impl From<&Address> for AddressDto {
    fn from(address: &Address) -> Self {
        Self {
            id: Some(address.id),
            postcode: address.postcode.to_string(),
            region: address.region.clone(),
            district: address.district.clone(),
            city: address.city.clone(),
            street: address.street.clone(),
            house_number: address.house_number.clone(),
            apartment_number: address.apartment_number.clone(),
        }
    }
}

pub fn address_from_dto(dto: AddressDto) -> AppResult<Address> {
    let mut address = Address::new(
        Postcode::new(dto.postcode)?,
        dto.region,
        dto.district,
        dto.city,
        dto.street,
        dto.house_number,
        dto.apartment_number,
    );
    if let Some(id) = dto.id {
        address.id = id;
    }
    Ok(address)
}

// ========== PostcodePool ==========

impl From<&BarcodeInnerNumber> for BarcodeInnerNumberDto {
    fn from(barcode: &BarcodeInnerNumber) -> Self {
        Self {
            id: Some(barcode.id),
            number: barcode.number.to_string(),
            status: barcode.status,
        }
    }
}

pub fn barcode_from_dto(
    pool_id: PostcodePoolId,
    dto: BarcodeInnerNumberDto,
) -> AppResult<BarcodeInnerNumber> {
    let mut barcode = BarcodeInnerNumber::new(pool_id, InnerNumber::new(dto.number)?, dto.status);
    if let Some(id) = dto.id {
        barcode.id = id;
    }
    Ok(barcode)
}

impl From<&PostcodePool> for PostcodePoolDto {
    fn from(pool: &PostcodePool) -> Self {
        Self {
            id: Some(*pool.id()),
            postcode: pool.postcode().to_string(),
            closed: pool.is_closed(),
            barcode_inner_numbers: pool
                .barcode_inner_numbers()
                .iter()
                .map(BarcodeInnerNumberDto::from)
                .collect(),
        }
    }
}

pub fn postcode_pool_from_dto(dto: PostcodePoolDto) -> AppResult<PostcodePool> {
    let mut pool = PostcodePool::restore(
        dto.id.unwrap_or_else(PostcodePoolId::new),
        Postcode::new(dto.postcode)?,
        dto.closed,
        Vec::new(),
    );
    let pool_id = *pool.id();
    for barcode in dto.barcode_inner_numbers {
        pool.add_barcode_inner_number(barcode_from_dto(pool_id, barcode)?)?;
    }
    Ok(pool)
}

// ========== Counterparty / Client / PostOffice ==========

impl From<&Counterparty> for CounterpartyDto {
    fn from(counterparty: &Counterparty) -> Self {
        Self {
            id: Some(counterparty.id),
            name: counterparty.name.clone(),
            postcode_pool_id: counterparty.postcode_pool_id,
        }
    }
}

pub fn counterparty_from_dto(dto: CounterpartyDto) -> Counterparty {
    let mut counterparty = Counterparty::new(dto.name, dto.postcode_pool_id);
    if let Some(id) = dto.id {
        counterparty.id = id;
    }
    counterparty
}

impl From<&Client> for ClientDto {
    fn from(client: &Client) -> Self {
        Self {
            id: Some(client.id),
            name: client.name.clone(),
            unique_registration_number: client.unique_registration_number.clone(),
            address_id: client.address_id,
            counterparty_id: client.counterparty_id,
        }
    }
}

pub fn client_from_dto(dto: ClientDto) -> Client {
    let mut client = Client::new(
        dto.name,
        dto.unique_registration_number,
        dto.address_id,
        dto.counterparty_id,
    );
    if let Some(id) = dto.id {
        client.id = id;
    }
    client
}

impl From<&PostOffice> for PostOfficeDto {
    fn from(office: &PostOffice) -> Self {
        Self {
            id: Some(office.id),
            name: office.name.clone(),
            address_id: office.address_id,
            postcode_pool_id: office.postcode_pool_id,
        }
    }
}

pub fn post_office_from_dto(dto: PostOfficeDto) -> PostOffice {
    let mut office = PostOffice::new(dto.name, dto.address_id, dto.postcode_pool_id);
    if let Some(id) = dto.id {
        office.id = id;
    }
    office
}

// ========== Parcel ==========

impl From<&ParcelItem> for ParcelItemDto {
    fn from(item: &ParcelItem) -> Self {
        Self {
            id: Some(item.id),
            name: item.name.clone(),
            quantity: item.quantity,
            weight: item.weight,
            price: item.price,
        }
    }
}

impl From<&Parcel> for ParcelDto {
    fn from(parcel: &Parcel) -> Self {
        Self {
            id: Some(parcel.id),
            shipment_id: parcel.shipment_id,
            weight: parcel.weight,
            length: parcel.length,
            width: parcel.width,
            height: parcel.height,
            declared_price: parcel.declared_price,
            price: parcel.price,
            parcel_items: parcel.parcel_items.iter().map(ParcelItemDto::from).collect(),
        }
    }
}

/// 入参中的包裹；价格由计价服务重新计算
pub fn parcel_from_dto(dto: ParcelDto) -> AppResult<Parcel> {
    let items = dto
        .parcel_items
        .into_iter()
        .map(|item| {
            let mut entity = ParcelItem::new(item.name, item.quantity, item.weight, item.price);
            entity.id = item.id.unwrap_or_else(ParcelItemId::new);
            entity
        })
        .collect();
    let mut parcel = Parcel::new(
        items,
        dto.weight,
        dto.length,
        dto.width,
        dto.height,
        dto.declared_price,
        dto.price,
    );
    parcel.id = dto.id.unwrap_or_else(ParcelId::new);
    parcel.shipment_id = dto.shipment_id;
    parcel.link_items();
    parcel.validate()?;
    Ok(parcel)
}

// ========== Shipment ==========

impl From<&Shipment> for ShipmentDto {
    fn from(shipment: &Shipment) -> Self {
        Self {
            id: Some(*shipment.id()),
            sender_id: *shipment.sender_id(),
            recipient_id: *shipment.recipient_id(),
            delivery_type: shipment.delivery_type(),
            price: shipment.price(),
            barcode: shipment.barcode().map(|b| b.to_string()),
            parcels: shipment.parcels().iter().map(ParcelDto::from).collect(),
        }
    }
}

/// 新建的包裹与物品一律使用新 ID
pub fn new_parcel_from_dto(dto: ParcelDto) -> AppResult<Parcel> {
    let parcel_items = dto
        .parcel_items
        .into_iter()
        .map(|item| ParcelItemDto { id: None, ..item })
        .collect();
    parcel_from_dto(ParcelDto {
        id: None,
        shipment_id: None,
        parcel_items,
        ..dto
    })
}

pub fn shipment_from_dto(dto: ShipmentDto) -> AppResult<Shipment> {
    let parcels = dto
        .parcels
        .into_iter()
        .map(new_parcel_from_dto)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Shipment::new(
        dto.sender_id,
        dto.recipient_id,
        dto.delivery_type,
        parcels,
    ))
}

// ========== Tracking / Tariff ==========

impl From<&ShipmentTrackingDetail> for ShipmentTrackingDetailDto {
    fn from(detail: &ShipmentTrackingDetail) -> Self {
        Self {
            id: Some(detail.id),
            shipment_id: detail.shipment_id,
            post_office_id: detail.post_office_id,
            status: detail.status,
            date: Some(detail.date),
        }
    }
}

pub fn tracking_from_dto(dto: ShipmentTrackingDetailDto) -> ShipmentTrackingDetail {
    let mut detail = ShipmentTrackingDetail::new(
        dto.shipment_id,
        dto.post_office_id,
        dto.status,
        dto.date.unwrap_or_else(Utc::now),
    );
    detail.id = dto.id.unwrap_or_else(ShipmentTrackingDetailId::new);
    detail
}

impl From<&TariffGrid> for TariffGridDto {
    fn from(tariff: &TariffGrid) -> Self {
        Self {
            id: Some(tariff.id),
            weight: tariff.weight,
            length: tariff.length,
            w2w_variation: tariff.w2w_variation,
            price: tariff.price,
        }
    }
}

pub fn tariff_from_dto(dto: TariffGridDto) -> TariffGrid {
    let mut tariff = TariffGrid::new(dto.weight, dto.length, dto.w2w_variation, dto.price);
    if let Some(id) = dto.id {
        tariff.id = id;
    }
    tariff
}
