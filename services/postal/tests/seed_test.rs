//! 演示数据测试

mod common;

use courier_domain_core::Money;
use postal::application::dto::{PostcodePoolDto, TariffGridDto};
use postal::domain::enums::{BarcodeStatus, DeliveryType, ShipmentStatus, W2wVariation};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_seed_is_idempotent() {
    let fixture = common::seeded().await;

    let loaded = postal::seed::populate(&fixture.services, &fixture.repos)
        .await
        .unwrap();

    assert!(!loaded);
    assert_eq!(common::tariff_rows(&fixture).await.len(), 27);
    assert_eq!(fixture.services.shipments.get_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_seed_resumes_after_partial_load() {
    let fixture = common::empty();
    // 上次启动只写入了部分资费与一个邮编池
    fixture
        .services
        .tariffs
        .save(TariffGridDto {
            id: None,
            weight: 0.25,
            length: 30.0,
            w2w_variation: W2wVariation::Town,
            price: Money::new(dec!(12)),
        })
        .await
        .unwrap();
    fixture
        .services
        .postcode_pools
        .save(PostcodePoolDto {
            id: None,
            postcode: "00001".to_string(),
            closed: false,
            barcode_inner_numbers: Vec::new(),
        })
        .await
        .unwrap();

    let loaded = postal::seed::populate(&fixture.services, &fixture.repos)
        .await
        .unwrap();

    assert!(loaded);
    assert_eq!(common::tariff_rows(&fixture).await.len(), 27);
    assert_eq!(fixture.services.postcode_pools.get_all().await.unwrap().len(), 3);
    assert_eq!(fixture.services.shipments.get_all().await.unwrap().len(), 3);
    assert_eq!(fixture.services.tracking.get_all().await.unwrap().len(), 1);
    assert!(
        !postal::seed::populate(&fixture.services, &fixture.repos)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_seed_tariff_grid() {
    let fixture = common::seeded().await;
    let rows = common::tariff_rows(&fixture).await;

    for variation in [W2wVariation::Town, W2wVariation::Region, W2wVariation::Country] {
        assert_eq!(rows.iter().filter(|r| r.w2w_variation == variation).count(), 9);
    }

    let heaviest_country = rows
        .iter()
        .find(|r| r.weight == 30.0 && r.w2w_variation == W2wVariation::Country)
        .unwrap();
    assert_eq!(heaviest_country.length, 70.0);
    assert_eq!(heaviest_country.price.amount(), dec!(60));
}

#[tokio::test]
async fn test_seed_postcode_pools_and_barcodes() {
    let fixture = common::seeded().await;
    let pools = fixture.services.postcode_pools.get_all().await.unwrap();
    assert_eq!(pools.len(), 3);

    let preloaded = pools.iter().find(|p| p.postcode == "00001").unwrap();
    let statuses: Vec<_> = preloaded
        .barcode_inner_numbers
        .iter()
        .map(|b| (b.number.as_str(), b.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("0000001", BarcodeStatus::Used),
            ("0000002", BarcodeStatus::Reserved),
            ("0000003", BarcodeStatus::Reserved),
        ]
    );

    // 三个运单的条码都来自合作方的邮编池
    let counterparty_pool = pools.iter().find(|p| p.postcode == "00003").unwrap();
    let numbers: Vec<_> = counterparty_pool
        .barcode_inner_numbers
        .iter()
        .map(|b| b.number.as_str())
        .collect();
    assert_eq!(numbers, vec!["0000001", "0000002", "0000003"]);

    let office_pool = pools.iter().find(|p| p.postcode == "00002").unwrap();
    assert!(office_pool.barcode_inner_numbers.is_empty());
}

#[tokio::test]
async fn test_seed_clients_belong_to_counterparty() {
    let fixture = common::seeded().await;
    let counterparties = fixture.services.counterparties.get_all().await.unwrap();
    assert_eq!(counterparties.len(), 1);
    assert_eq!(counterparties[0].name, "Modna kasta");

    let clients = fixture
        .services
        .clients
        .get_all_by_counterparty(&counterparties[0].id.unwrap())
        .await
        .unwrap()
        .unwrap();
    let names: Vec<_> = clients.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["FOP Ivanov", "Petrov PP"]);
}

#[tokio::test]
async fn test_seed_shipments_are_priced() {
    let fixture = common::seeded().await;

    // 同城以外的寄送按跨地区档位计价
    let w2w = common::shipment_of(&fixture, DeliveryType::W2w).await;
    assert_eq!(w2w.price.amount(), dec!(72.64));
    assert_eq!(w2w.barcode.as_deref(), Some("000030000001"));

    let w2d = common::shipment_of(&fixture, DeliveryType::W2d).await;
    assert_eq!(w2d.price.amount(), dec!(66.44));
    assert_eq!(w2d.barcode.as_deref(), Some("000030000002"));

    let d2d = common::shipment_of(&fixture, DeliveryType::D2d).await;
    assert_eq!(d2d.price.amount(), dec!(90.44));
    let parcel_prices: Vec<_> = d2d.parcels.iter().map(|p| p.price.amount()).collect();
    assert_eq!(parcel_prices, vec![dec!(42.06), dec!(48.38)]);
}

#[tokio::test]
async fn test_seed_parcels_keep_items_in_order() {
    let fixture = common::seeded().await;
    let w2w = common::shipment_of(&fixture, DeliveryType::W2w).await;

    assert_eq!(w2w.parcels.len(), 2);
    let first = &w2w.parcels[0];
    assert_eq!(first.parcel_items.len(), 2);
    assert_eq!(first.parcel_items[0].name, "Some item");
    assert_eq!(first.parcel_items[1].name, "Some other item");
    assert_eq!(first.parcel_items[1].quantity, 2);
    assert_eq!(first.declared_price.amount(), dec!(8.5));
    assert!(w2w.parcels.iter().all(|p| p.shipment_id == w2w.id));
}

#[tokio::test]
async fn test_seed_tracking_record() {
    let fixture = common::seeded().await;
    let w2w = common::shipment_of(&fixture, DeliveryType::W2w).await;

    let tracking = fixture
        .services
        .tracking
        .get_by_shipment(&w2w.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tracking.len(), 1);
    assert_eq!(tracking[0].status, ShipmentStatus::Prepared);

    let offices = fixture.services.post_offices.get_all().await.unwrap();
    assert_eq!(offices.len(), 1);
    assert_eq!(offices[0].name, "Lviv post office");
    assert_eq!(tracking[0].post_office_id, offices[0].id.unwrap());
}
