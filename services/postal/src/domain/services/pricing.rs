//! 包裹计价

use courier_config::PricingConfig;
use courier_domain_core::Money;
use rust_decimal::Decimal;

use crate::domain::entities::{Address, Parcel, TariffGrid};
use crate::domain::enums::{DeliveryType, W2wVariation};

/// 包裹计价规则
///
/// 价格 = 资费表基础价 + 投递方式附加费 + 声明价值 × 保价费率，四舍五入到分。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParcelPricing {
    w2d_surcharge: Money,
    d2w_surcharge: Money,
    d2d_surcharge: Money,
    declared_value_rate: Decimal,
}

impl ParcelPricing {
    pub fn new(
        w2d_surcharge: Money,
        d2w_surcharge: Money,
        d2d_surcharge: Money,
        declared_value_rate: Decimal,
    ) -> Self {
        Self {
            w2d_surcharge,
            d2w_surcharge,
            d2d_surcharge,
            declared_value_rate,
        }
    }

    pub fn surcharge(&self, delivery_type: DeliveryType) -> Money {
        match delivery_type {
            DeliveryType::W2w => Money::ZERO,
            DeliveryType::W2d => self.w2d_surcharge,
            DeliveryType::D2w => self.d2w_surcharge,
            DeliveryType::D2d => self.d2d_surcharge,
        }
    }

    /// 按寄件人与收件人地址确定资费档位
    pub fn resolve_variation(sender: &Address, recipient: &Address) -> W2wVariation {
        if sender.is_located_in_same_town(recipient) {
            W2wVariation::Town
        } else if sender.is_located_in_same_region(recipient) {
            W2wVariation::Region
        } else {
            W2wVariation::Country
        }
    }

    /// 在同一档位的资费行中选出能容纳包裹的最小一行；超出所有行时取最大一行
    pub fn select_tariff(tariffs: &[TariffGrid], weight: f64, length: f64) -> Option<&TariffGrid> {
        let mut sorted: Vec<&TariffGrid> = tariffs.iter().collect();
        sorted.sort_by(|a, b| {
            a.weight
                .total_cmp(&b.weight)
                .then(a.length.total_cmp(&b.length))
        });
        sorted
            .iter()
            .find(|t| t.covers(weight, length))
            .or_else(|| sorted.last())
            .copied()
    }

    pub fn price(&self, parcel: &Parcel, tariff: &TariffGrid, delivery_type: DeliveryType) -> Money {
        let insurance = parcel.declared_price * self.declared_value_rate;
        (tariff.price + self.surcharge(delivery_type) + insurance).round_to_cents()
    }
}

impl From<&PricingConfig> for ParcelPricing {
    fn from(config: &PricingConfig) -> Self {
        Self::new(
            Money::new(config.w2d_surcharge),
            Money::new(config.d2w_surcharge),
            Money::new(config.d2d_surcharge),
            config.declared_value_rate,
        )
    }
}

impl Default for ParcelPricing {
    fn default() -> Self {
        Self::from(&PricingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Postcode;
    use rust_decimal_macros::dec;

    fn grid() -> Vec<TariffGrid> {
        vec![
            TariffGrid::new(1.0, 30.0, W2wVariation::Town, Money::new(dec!(18))),
            TariffGrid::new(0.25, 30.0, W2wVariation::Town, Money::new(dec!(12))),
            TariffGrid::new(0.5, 30.0, W2wVariation::Town, Money::new(dec!(15))),
            TariffGrid::new(30.0, 70.0, W2wVariation::Town, Money::new(dec!(42))),
        ]
    }

    fn address(region: &str, district: &str, city: &str) -> Address {
        Address::new(Postcode::new("00001").unwrap(), region, district, city, "s", "1", "")
    }

    #[test]
    fn test_select_smallest_covering_row() {
        let grid = grid();
        let tariff = ParcelPricing::select_tariff(&grid, 0.4, 20.0).unwrap();
        assert_eq!(tariff.price, Money::new(dec!(15)));
    }

    #[test]
    fn test_oversized_parcel_uses_largest_row() {
        let grid = grid();
        let tariff = ParcelPricing::select_tariff(&grid, 120.0, 20.0).unwrap();
        assert_eq!(tariff.price, Money::new(dec!(42)));
        assert!(ParcelPricing::select_tariff(&[], 1.0, 1.0).is_none());
    }

    #[test]
    fn test_variation_resolution() {
        let lviv = address("Lviv", "Lviv", "Lviv");
        let stryi = address("lviv", "Stryi", "Stryi");
        let kiev = address("Kiev", "", "Kiev");
        assert_eq!(ParcelPricing::resolve_variation(&lviv, &lviv.clone()), W2wVariation::Town);
        assert_eq!(ParcelPricing::resolve_variation(&lviv, &stryi), W2wVariation::Region);
        assert_eq!(ParcelPricing::resolve_variation(&lviv, &kiev), W2wVariation::Country);
    }

    #[test]
    fn test_price_adds_surcharge_and_insurance() {
        let pricing = ParcelPricing::default();
        let tariff = TariffGrid::new(1.0, 30.0, W2wVariation::Town, Money::new(dec!(18)));
        let parcel = Parcel::new(vec![], 1.0, 10.0, 5.0, 5.0, Money::new(dec!(8.5)), Money::ZERO);
        // 18 + 12 + 8.5 * 0.04 = 30.34
        assert_eq!(
            pricing.price(&parcel, &tariff, DeliveryType::D2d),
            Money::new(dec!(30.34))
        );
        assert_eq!(
            pricing.price(&parcel, &tariff, DeliveryType::W2w),
            Money::new(dec!(18.34))
        );
    }
}
