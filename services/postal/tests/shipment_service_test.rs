//! 运单、包裹与条码发放的服务层测试

mod common;

use courier_domain_core::Money;
use postal::application::dto::{ClientDto, ParcelDto, PostcodePoolDto, ShipmentDto, UpdateShipmentDto};
use postal::domain::enums::{DeliveryType, W2wVariation};
use postal::domain::value_objects::{ClientId, ParcelId, ShipmentId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn parcel(weight: f64, length: f64, declared: Decimal) -> ParcelDto {
    ParcelDto {
        id: None,
        shipment_id: None,
        weight,
        length,
        width: 10.0,
        height: 10.0,
        declared_price: Money::new(declared),
        price: Money::ZERO,
        parcel_items: Vec::new(),
    }
}

async fn client(fixture: &common::Fixture, name: &str) -> ClientDto {
    fixture
        .services
        .clients
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == name)
        .unwrap()
}

async fn counterparty_pool(fixture: &common::Fixture) -> PostcodePoolDto {
    fixture
        .services
        .postcode_pools
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.postcode == "00003")
        .unwrap()
}

fn new_shipment(sender: &ClientDto, recipient_id: ClientId, parcels: Vec<ParcelDto>) -> ShipmentDto {
    ShipmentDto {
        id: None,
        sender_id: sender.id.unwrap(),
        recipient_id,
        delivery_type: DeliveryType::D2w,
        price: Money::ZERO,
        barcode: None,
        parcels,
    }
}

// ============ 创建 ============

#[tokio::test]
async fn test_save_prices_shipment_as_sum_of_parcels() {
    let fixture = common::seeded().await;
    let ivanov = client(&fixture, "FOP Ivanov").await;
    let petrov = client(&fixture, "Petrov PP").await;

    let saved = fixture
        .services
        .shipments
        .save(new_shipment(
            &ivanov,
            petrov.id.unwrap(),
            vec![parcel(1.0, 10.0, dec!(100)), parcel(0.2, 20.0, dec!(0))],
        ))
        .await
        .unwrap();

    // 跨地区：27 + 9 + 4 与 21 + 9
    let prices: Vec<_> = saved.parcels.iter().map(|p| p.price.amount()).collect();
    assert_eq!(prices, vec![dec!(40), dec!(30)]);
    assert_eq!(saved.price.amount(), dec!(70));
    let total: Money = saved.parcels.iter().map(|p| p.price).sum();
    assert_eq!(saved.price, total);
    assert!(saved.parcels.iter().all(|p| p.shipment_id == saved.id));
}

#[tokio::test]
async fn test_save_without_parcels_has_zero_price() {
    let fixture = common::seeded().await;
    let ivanov = client(&fixture, "FOP Ivanov").await;

    let saved = fixture
        .services
        .shipments
        .save(new_shipment(&ivanov, ivanov.id.unwrap(), Vec::new()))
        .await
        .unwrap();

    assert!(saved.price.is_zero());
}

#[tokio::test]
async fn test_save_issues_next_barcode_from_sender_pool() {
    let fixture = common::seeded().await;
    let ivanov = client(&fixture, "FOP Ivanov").await;

    let saved = fixture
        .services
        .shipments
        .save(new_shipment(&ivanov, ivanov.id.unwrap(), vec![parcel(1.0, 10.0, dec!(0))]))
        .await
        .unwrap();

    assert_eq!(saved.barcode.as_deref(), Some("000030000004"));
    assert_eq!(counterparty_pool(&fixture).await.barcode_inner_numbers.len(), 4);
}

#[tokio::test]
async fn test_save_with_unknown_recipient_does_not_issue_barcode() {
    let fixture = common::seeded().await;
    let ivanov = client(&fixture, "FOP Ivanov").await;

    let err = fixture
        .services
        .shipments
        .save(new_shipment(&ivanov, ClientId::new(), Vec::new()))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(counterparty_pool(&fixture).await.barcode_inner_numbers.len(), 3);
}

#[tokio::test]
async fn test_save_with_invalid_parcel_does_not_issue_barcode() {
    let fixture = common::seeded().await;
    let ivanov = client(&fixture, "FOP Ivanov").await;
    let petrov = client(&fixture, "Petrov PP").await;

    let err = fixture
        .services
        .shipments
        .save(new_shipment(&ivanov, petrov.id.unwrap(), vec![parcel(-1.0, 10.0, dec!(1))]))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(counterparty_pool(&fixture).await.barcode_inner_numbers.len(), 3);
}

#[tokio::test]
async fn test_save_without_tariffs_does_not_issue_barcode() {
    let fixture = common::seeded().await;
    for row in common::tariff_rows(&fixture).await {
        assert!(fixture.services.tariffs.delete(&row.id.unwrap()).await.unwrap());
    }
    let ivanov = client(&fixture, "FOP Ivanov").await;
    let petrov = client(&fixture, "Petrov PP").await;

    let err = fixture
        .services
        .shipments
        .save(new_shipment(&ivanov, petrov.id.unwrap(), vec![parcel(1.0, 10.0, dec!(1))]))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 412);
    assert_eq!(counterparty_pool(&fixture).await.barcode_inner_numbers.len(), 3);
    assert_eq!(fixture.services.shipments.get_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_save_from_closed_pool_is_rejected() {
    let fixture = common::seeded().await;
    let ivanov = client(&fixture, "FOP Ivanov").await;
    let pool = counterparty_pool(&fixture).await;
    fixture
        .services
        .postcode_pools
        .update(&pool.id.unwrap(), PostcodePoolDto { closed: true, ..pool })
        .await
        .unwrap()
        .unwrap();

    let err = fixture
        .services
        .shipments
        .save(new_shipment(&ivanov, ivanov.id.unwrap(), Vec::new()))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 412);
}

// ============ 查询 ============

#[tokio::test]
async fn test_get_all_by_client_lists_sent_shipments() {
    let fixture = common::seeded().await;
    let ivanov = client(&fixture, "FOP Ivanov").await;
    let petrov = client(&fixture, "Petrov PP").await;

    let sent = fixture
        .services
        .shipments
        .get_all_by_client(&ivanov.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    let types: Vec<_> = sent.iter().map(|s| s.delivery_type).collect();
    assert_eq!(types, vec![DeliveryType::W2w, DeliveryType::W2d]);

    let sent = fixture
        .services
        .shipments
        .get_all_by_client(&petrov.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sent.len(), 1);
}

#[tokio::test]
async fn test_get_all_by_missing_client_returns_none() {
    let fixture = common::seeded().await;

    let result = fixture
        .services
        .shipments
        .get_all_by_client(&ClientId::new())
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_entity_access() {
    let fixture = common::seeded().await;
    let entities = fixture.services.shipments.get_all_entities().await.unwrap();
    assert_eq!(entities.len(), 3);

    let found = fixture
        .services
        .shipments
        .get_entity_by_id(entities[0].id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.price(), entities[0].price());
    assert!(
        fixture
            .services
            .shipments
            .get_entity_by_id(&ShipmentId::new())
            .await
            .unwrap()
            .is_none()
    );
}

// ============ 更新 ============

#[tokio::test]
async fn test_update_missing_shipment_returns_none() {
    let fixture = common::seeded().await;

    let result = fixture
        .services
        .shipments
        .update(&ShipmentId::new(), UpdateShipmentDto::default())
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_update_delivery_type_reprices() {
    let fixture = common::seeded().await;
    let w2w = common::shipment_of(&fixture, DeliveryType::W2w).await;

    let updated = fixture
        .services
        .shipments
        .update(
            &w2w.id.unwrap(),
            UpdateShipmentDto {
                delivery_type: Some(DeliveryType::D2d),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, w2w.id);
    assert_eq!(updated.barcode, w2w.barcode);
    assert_eq!(updated.price.amount(), dec!(96.64));
    let stored = fixture
        .services
        .shipments
        .get_by_id(&w2w.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.delivery_type, DeliveryType::D2d);
    assert_eq!(stored.price, updated.price);
}

// ============ 删除 ============

#[tokio::test]
async fn test_delete_missing_shipment_returns_false() {
    let fixture = common::seeded().await;

    let deleted = fixture
        .services
        .shipments
        .delete(&ShipmentId::new())
        .await
        .unwrap();

    assert!(!deleted);
    assert_eq!(fixture.services.shipments.get_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_delete_shipment_removes_parcels_and_tracking() {
    let fixture = common::seeded().await;
    let w2w = common::shipment_of(&fixture, DeliveryType::W2w).await;
    let id = w2w.id.unwrap();

    assert!(fixture.services.shipments.delete(&id).await.unwrap());

    assert!(fixture.services.shipments.get_by_id(&id).await.unwrap().is_none());
    assert!(fixture.services.tracking.get_by_shipment(&id).await.unwrap().is_none());
    assert!(fixture.services.tracking.get_all().await.unwrap().is_empty());
    assert_eq!(fixture.services.parcels.get_all().await.unwrap().len(), 4);
}

// ============ 追加包裹 ============

#[tokio::test]
async fn test_add_parcels_to_missing_shipment_returns_false() {
    let fixture = common::seeded().await;

    let added = fixture
        .services
        .shipments
        .add_parcels_to_shipment(&ShipmentId::new(), vec![parcel(1.0, 10.0, dec!(0))])
        .await
        .unwrap();

    assert!(!added);
}

#[tokio::test]
async fn test_add_parcels_prepends_and_reprices() {
    let fixture = common::seeded().await;
    let w2d = common::shipment_of(&fixture, DeliveryType::W2d).await;
    let id = w2d.id.unwrap();

    let added = fixture
        .services
        .shipments
        .add_parcels_to_shipment(&id, vec![parcel(3.0, 3.0, dec!(0))])
        .await
        .unwrap();
    assert!(added);

    let stored = fixture.services.shipments.get_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.parcels.len(), 3);
    // 同城 5kg 档 24 + 送货上门 9
    assert_eq!(stored.parcels[0].price.amount(), dec!(33));
    assert_eq!(stored.parcels[1].id, w2d.parcels[0].id);
    assert_eq!(stored.price.amount(), dec!(99.44));
}

// ============ 包裹 ============

#[tokio::test]
async fn test_parcels_by_missing_shipment_returns_none() {
    let fixture = common::seeded().await;

    let parcels = fixture
        .services
        .parcels
        .get_by_shipment(&ShipmentId::new())
        .await
        .unwrap();

    assert!(parcels.is_none());
}

#[tokio::test]
async fn test_update_parcel_reprices_owning_shipment() {
    let fixture = common::seeded().await;
    let w2w = common::shipment_of(&fixture, DeliveryType::W2w).await;
    let first = w2w.parcels[0].clone();

    let updated = fixture
        .services
        .parcels
        .update(&first.id.unwrap(), ParcelDto { weight: 10.0, ..first })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.price.amount(), dec!(42.34));
    let stored = fixture
        .services
        .shipments
        .get_by_id(&w2w.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.price.amount(), dec!(78.64));
}

#[tokio::test]
async fn test_update_parcel_keeps_only_its_own_item_ids() {
    let fixture = common::seeded().await;
    let w2w = common::shipment_of(&fixture, DeliveryType::W2w).await;
    let d2d = common::shipment_of(&fixture, DeliveryType::D2d).await;
    let first = w2w.parcels[0].clone();
    let own_item = first.parcel_items[0].clone();
    let foreign_item = d2d.parcels[0].parcel_items[0].clone();

    let updated = fixture
        .services
        .parcels
        .update(
            &first.id.unwrap(),
            ParcelDto {
                parcel_items: vec![own_item.clone(), foreign_item.clone()],
                ..first
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.parcel_items.len(), 2);
    assert_eq!(updated.parcel_items[0].id, own_item.id);
    assert!(updated.parcel_items[1].id.is_some());
    assert_ne!(updated.parcel_items[1].id, foreign_item.id);

    // 另一个运单的物品不受影响
    let d2d_parcel = fixture
        .services
        .parcels
        .get_by_id(&d2d.parcels[0].id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(d2d_parcel.parcel_items[0].id, foreign_item.id);
}

#[tokio::test]
async fn test_delete_parcel_retotals_shipment() {
    let fixture = common::seeded().await;
    let w2w = common::shipment_of(&fixture, DeliveryType::W2w).await;

    assert!(
        fixture
            .services
            .parcels
            .delete(&w2w.parcels[0].id.unwrap())
            .await
            .unwrap()
    );
    assert!(!fixture.services.parcels.delete(&ParcelId::new()).await.unwrap());

    let parcels = fixture
        .services
        .parcels
        .get_by_shipment(&w2w.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(parcels.len(), 1);
    let stored = fixture
        .services
        .shipments
        .get_by_id(&w2w.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.price.amount(), dec!(36.30));
}

// ============ 资费与条码 ============

#[tokio::test]
async fn test_oversized_parcel_uses_largest_tariff() {
    let fixture = common::seeded().await;

    let tariff = fixture
        .services
        .tariffs
        .get_by_dimension(50.0, 120.0, W2wVariation::Town)
        .await
        .unwrap();

    assert_eq!(tariff.weight, 30.0);
    assert_eq!(tariff.price.amount(), dec!(42));
}

#[tokio::test]
async fn test_empty_tariff_grid_is_failed_precondition() {
    let fixture = common::empty();

    let err = fixture
        .services
        .tariffs
        .get_by_dimension(1.0, 10.0, W2wVariation::Region)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 412);
}

#[tokio::test]
async fn test_generate_barcode_continues_after_highest_number() {
    let fixture = common::seeded().await;
    let pool = fixture
        .services
        .postcode_pools
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.postcode == "00001")
        .unwrap();

    let barcode = fixture
        .services
        .postcode_pools
        .generate_barcode_inner_number(&pool.id.unwrap())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(barcode.number, "0000004");
}
