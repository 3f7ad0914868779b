//! 启动时的演示数据
//!
//! 每一步先按自然键查找已有记录，只写入缺失部分；
//! 中途失败后再次启动会从断点继续，全部存在时不写入任何数据。

use chrono::Utc;
use courier_domain_core::Money;
use courier_errors::{AppError, AppResult};
use courier_ports::Repository;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use crate::application::dto::*;
use crate::application::{PostalServices, Repositories};
use crate::domain::enums::{BarcodeStatus, DeliveryType, ShipmentStatus, W2wVariation};
use crate::domain::repositories::{
    PostcodePoolRepository, ShipmentRepository, ShipmentTrackingDetailRepository,
};
use crate::domain::value_objects::{
    AddressId, ClientId, CounterpartyId, Postcode, PostcodePoolId, PostOfficeId, ShipmentId,
};

/// (重量上限 kg, 长度上限 cm, [同城, 同地区, 跨地区] 价格)
const TARIFF_GRID: [(f64, f64, [Decimal; 3]); 9] = [
    (0.25, 30.0, [dec!(12), dec!(15), dec!(21)]),
    (0.5, 30.0, [dec!(15), dec!(18), dec!(24)]),
    (1.0, 30.0, [dec!(18), dec!(21), dec!(27)]),
    (2.0, 30.0, [dec!(21), dec!(24), dec!(30)]),
    (5.0, 70.0, [dec!(24), dec!(27), dec!(36)]),
    (10.0, 70.0, [dec!(27), dec!(30), dec!(42)]),
    (15.0, 70.0, [dec!(30), dec!(36), dec!(48)]),
    (20.0, 70.0, [dec!(36), dec!(42), dec!(54)]),
    (30.0, 70.0, [dec!(42), dec!(48), dec!(60)]),
];

/// (名称, 数量, 重量, 价格)
const PARCEL_ITEMS: [(&str, i32, f64, Decimal); 12] = [
    ("Some item", 1, 2.0, dec!(10.5)),
    ("Some other item", 2, 3.0, dec!(20.5)),
    ("Some other item", 1, 4.0, dec!(20.5)),
    ("Some other item", 2, 5.0, dec!(25.5)),
    ("Some other item", 6, 6.5, dec!(30.5)),
    ("Some other item", 4, 7.8, dec!(27.5)),
    ("Some other item", 1, 2.5, dec!(10.5)),
    ("Some other item", 3, 2.8, dec!(23.5)),
    ("Some other item", 2, 3.5, dec!(33.5)),
    ("Some other item", 4, 5.8, dec!(22.5)),
    ("Some other item", 2, 3.5, dec!(33.5)),
    ("Some other item", 4, 5.8, dec!(22.5)),
];

/// (重量, 长度, 宽度, 高度, 声明价值)；每个包裹依次取两件物品
const PARCELS: [(f64, f64, f64, f64, Decimal); 6] = [
    (3.0, 1.0, 3.0, 3.0, dec!(8.5)),
    (3.0, 3.0, 3.0, 3.0, dec!(7.5)),
    (3.0, 3.0, 5.0, 3.0, dec!(4.5)),
    (3.0, 3.0, 3.0, 6.0, dec!(6.5)),
    (2.0, 3.0, 7.0, 3.0, dec!(1.5)),
    (3.0, 6.0, 6.0, 3.0, dec!(9.5)),
];

/// 写入前的包裹价格占位值，保存运单时会重新计价
const PLACEHOLDER_PARCEL_PRICE: Decimal = dec!(2.25);

fn address(
    postcode: &str,
    region: &str,
    district: &str,
    city: &str,
    street: &str,
    house_number: &str,
    apartment_number: &str,
) -> AddressDto {
    AddressDto {
        id: None,
        postcode: postcode.to_string(),
        region: region.to_string(),
        district: district.to_string(),
        city: city.to_string(),
        street: street.to_string(),
        house_number: house_number.to_string(),
        apartment_number: apartment_number.to_string(),
    }
}

fn pool(postcode: &str) -> PostcodePoolDto {
    PostcodePoolDto {
        id: None,
        postcode: postcode.to_string(),
        closed: false,
        barcode_inner_numbers: Vec::new(),
    }
}

fn barcode(number: &str, status: BarcodeStatus) -> BarcodeInnerNumberDto {
    BarcodeInnerNumberDto {
        id: None,
        number: number.to_string(),
        status,
    }
}

fn parcels() -> Vec<ParcelDto> {
    let items: Vec<ParcelItemDto> = PARCEL_ITEMS
        .iter()
        .map(|&(name, quantity, weight, price)| ParcelItemDto {
            id: None,
            name: name.to_string(),
            quantity,
            weight,
            price: Money::new(price),
        })
        .collect();

    PARCELS
        .iter()
        .zip(items.chunks(2))
        .map(|(&(weight, length, width, height, declared), items)| ParcelDto {
            id: None,
            shipment_id: None,
            weight,
            length,
            width,
            height,
            declared_price: Money::new(declared),
            price: Money::new(PLACEHOLDER_PARCEL_PRICE),
            parcel_items: items.to_vec(),
        })
        .collect()
}

fn saved_id<T: Copy>(id: Option<T>, kind: &str) -> AppResult<T> {
    id.ok_or_else(|| AppError::internal(format!("Saved {} has no id", kind)))
}

/// 记录本次写入了多少条记录
struct Seeder<'a> {
    services: &'a PostalServices,
    repos: &'a Repositories,
    written: usize,
}

impl Seeder<'_> {
    async fn tariff_grid(&mut self) -> AppResult<()> {
        let existing = self.repos.tariffs.find_all().await?;
        let variations = [W2wVariation::Town, W2wVariation::Region, W2wVariation::Country];
        for (weight, length, prices) in TARIFF_GRID {
            for (variation, price) in variations.into_iter().zip(prices) {
                let present = existing.iter().any(|t| {
                    t.weight == weight && t.length == length && t.w2w_variation == variation
                });
                if present {
                    continue;
                }
                self.services
                    .tariffs
                    .save(TariffGridDto {
                        id: None,
                        weight,
                        length,
                        w2w_variation: variation,
                        price: Money::new(price),
                    })
                    .await?;
                self.written += 1;
            }
        }
        Ok(())
    }

    async fn pool(&mut self, postcode: &str) -> AppResult<PostcodePoolId> {
        let key = Postcode::new(postcode)?;
        if let Some(pool) = self.repos.postcode_pools.find_by_postcode(&key).await? {
            return Ok(*pool.id());
        }
        let saved = self.services.postcode_pools.save(pool(postcode)).await?;
        self.written += 1;
        saved_id(saved.id, "postcode pool")
    }

    async fn barcodes(&mut self, pool_id: &PostcodePoolId) -> AppResult<()> {
        let present: Vec<String> = self
            .repos
            .postcode_pools
            .find_by_id(pool_id)
            .await?
            .map(|pool| {
                pool.barcode_inner_numbers()
                    .iter()
                    .map(|b| b.number.as_str().to_string())
                    .collect()
            })
            .unwrap_or_default();
        let missing: Vec<_> = [
            barcode("0000001", BarcodeStatus::Used),
            barcode("0000002", BarcodeStatus::Reserved),
            barcode("0000003", BarcodeStatus::Reserved),
        ]
        .into_iter()
        .filter(|b| !present.contains(&b.number))
        .collect();
        if missing.is_empty() {
            return Ok(());
        }
        self.written += missing.len();
        self.services
            .postcode_pools
            .add_barcode_inner_numbers(pool_id, missing)
            .await?;
        Ok(())
    }

    async fn address(&mut self, dto: AddressDto) -> AppResult<AddressId> {
        let existing = self.repos.addresses.find_all().await?;
        if let Some(found) = existing.iter().find(|a| {
            a.postcode.as_str() == dto.postcode
                && a.street == dto.street
                && a.house_number == dto.house_number
        }) {
            return Ok(found.id);
        }
        let saved = self.services.addresses.save(dto).await?;
        self.written += 1;
        saved_id(saved.id, "address")
    }

    async fn counterparty(
        &mut self,
        name: &str,
        pool_id: PostcodePoolId,
    ) -> AppResult<CounterpartyId> {
        let existing = self.repos.counterparties.find_all().await?;
        if let Some(found) = existing.iter().find(|c| c.name == name) {
            return Ok(found.id);
        }
        let saved = self
            .services
            .counterparties
            .save(CounterpartyDto {
                id: None,
                name: name.to_string(),
                postcode_pool_id: pool_id,
            })
            .await?;
        self.written += 1;
        saved_id(saved.id, "counterparty")
    }

    async fn client(
        &mut self,
        name: &str,
        registration: &str,
        address_id: AddressId,
        counterparty_id: CounterpartyId,
    ) -> AppResult<ClientId> {
        let existing = self.repos.clients.find_all().await?;
        if let Some(found) = existing
            .iter()
            .find(|c| c.unique_registration_number == registration)
        {
            return Ok(found.id);
        }
        let saved = self
            .services
            .clients
            .save(ClientDto {
                id: None,
                name: name.to_string(),
                unique_registration_number: registration.to_string(),
                address_id,
                counterparty_id,
            })
            .await?;
        self.written += 1;
        saved_id(saved.id, "client")
    }

    /// 同一寄件人、收件人与投递方式的运单只写一次；
    /// 走完整的保存流程（发放条码、计价）
    async fn shipment(
        &mut self,
        sender_id: ClientId,
        recipient_id: ClientId,
        delivery_type: DeliveryType,
        parcels: Vec<ParcelDto>,
    ) -> AppResult<ShipmentId> {
        let sent = self.repos.shipments.find_all_by_sender(&sender_id).await?;
        if let Some(found) = sent
            .iter()
            .find(|s| s.recipient_id() == &recipient_id && s.delivery_type() == delivery_type)
        {
            return Ok(*found.id());
        }
        let saved = self
            .services
            .shipments
            .save(ShipmentDto {
                id: None,
                sender_id,
                recipient_id,
                delivery_type,
                price: Money::ZERO,
                barcode: None,
                parcels,
            })
            .await?;
        self.written += 1;
        saved_id(saved.id, "shipment")
    }

    async fn post_office(
        &mut self,
        name: &str,
        address_id: AddressId,
        pool_id: PostcodePoolId,
    ) -> AppResult<PostOfficeId> {
        let existing = self.repos.post_offices.find_all().await?;
        if let Some(found) = existing.iter().find(|o| o.name == name) {
            return Ok(found.id);
        }
        let saved = self
            .services
            .post_offices
            .save(PostOfficeDto {
                id: None,
                name: name.to_string(),
                address_id,
                postcode_pool_id: pool_id,
            })
            .await?;
        self.written += 1;
        saved_id(saved.id, "post office")
    }

    async fn tracking(
        &mut self,
        shipment_id: ShipmentId,
        post_office_id: PostOfficeId,
    ) -> AppResult<()> {
        if !self.repos.tracking.find_by_shipment(&shipment_id).await?.is_empty() {
            return Ok(());
        }
        self.services
            .tracking
            .save(ShipmentTrackingDetailDto {
                id: None,
                shipment_id,
                post_office_id,
                status: ShipmentStatus::Prepared,
                date: Some(Utc::now()),
            })
            .await?;
        self.written += 1;
        Ok(())
    }
}

/// 写入缺失的演示数据；全部已存在时返回 `false`
pub async fn populate(services: &PostalServices, repos: &Repositories) -> AppResult<bool> {
    let mut seed = Seeder {
        services,
        repos,
        written: 0,
    };

    // 资费表
    seed.tariff_grid().await?;

    // 带预置条码的邮编池
    let preloaded_pool = seed.pool("00001").await?;
    seed.barcodes(&preloaded_pool).await?;

    // 地址
    let ternopil = seed
        .address(address("00001", "Ternopil", "Monastiriska", "Monastiriska", "Sadova", "51", ""))
        .await?;
    let kiev = seed
        .address(address("00002", "Kiev", "", "Kiev", "Khreschatik", "121", "37"))
        .await?;

    // 合作方与客户
    let counterparty_pool = seed.pool("00003").await?;
    let counterparty = seed.counterparty("Modna kasta", counterparty_pool).await?;
    let ivanov = seed.client("FOP Ivanov", "001", ternopil, counterparty).await?;
    let petrov = seed.client("Petrov PP", "002", kiev, counterparty).await?;

    // 运单
    let mut parcels = parcels().into_iter();
    let plan = [
        (ivanov, petrov, DeliveryType::W2w),
        (ivanov, ivanov, DeliveryType::W2d),
        (petrov, ivanov, DeliveryType::D2d),
    ];
    let mut shipments = Vec::new();
    for (sender_id, recipient_id, delivery_type) in plan {
        let batch = parcels.by_ref().take(2).collect();
        shipments.push(seed.shipment(sender_id, recipient_id, delivery_type, batch).await?);
    }

    // 邮局与跟踪记录
    let office_pool = seed.pool("00002").await?;
    let office = seed.post_office("Lviv post office", ternopil, office_pool).await?;
    seed.tracking(shipments[0], office).await?;

    if seed.written == 0 {
        info!("Seed data already present, nothing to load");
        return Ok(false);
    }
    info!("Seed data loaded: {} records written", seed.written);
    Ok(true)
}
