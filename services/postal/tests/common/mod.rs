//! 集成测试公共夹具

#![allow(dead_code)]

use courier_config::PricingConfig;
use postal::application::dto::{ShipmentDto, TariffGridDto};
use postal::application::{PostalServices, Repositories};
use postal::domain::enums::DeliveryType;
use postal::infrastructure::persistence::InMemoryStore;

pub struct Fixture {
    pub services: PostalServices,
    pub repos: Repositories,
}

/// 空的内存存储
pub fn empty() -> Fixture {
    let repos = InMemoryStore::new().repositories();
    let services = postal::services(&repos, &PricingConfig::default());
    Fixture { services, repos }
}

/// 写入演示数据后的内存存储
pub async fn seeded() -> Fixture {
    let fixture = empty();
    let loaded = postal::seed::populate(&fixture.services, &fixture.repos)
        .await
        .unwrap();
    assert!(loaded);
    fixture
}

pub async fn shipment_of(fixture: &Fixture, delivery_type: DeliveryType) -> ShipmentDto {
    fixture
        .services
        .shipments
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .find(|s| s.delivery_type == delivery_type)
        .unwrap()
}

pub async fn tariff_rows(fixture: &Fixture) -> Vec<TariffGridDto> {
    fixture.services.tariffs.get_all().await.unwrap()
}
