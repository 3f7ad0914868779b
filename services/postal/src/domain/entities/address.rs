//! 地址实体

use courier_common::normalize_name;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AddressId, Postcode};

/// 地址
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub postcode: Postcode,
    pub region: String,
    pub district: String,
    pub city: String,
    pub street: String,
    pub house_number: String,
    pub apartment_number: String,
}

impl Address {
    pub fn new(
        postcode: Postcode,
        region: impl Into<String>,
        district: impl Into<String>,
        city: impl Into<String>,
        street: impl Into<String>,
        house_number: impl Into<String>,
        apartment_number: impl Into<String>,
    ) -> Self {
        Self {
            id: AddressId::new(),
            postcode,
            region: region.into(),
            district: district.into(),
            city: city.into(),
            street: street.into(),
            house_number: house_number.into(),
            apartment_number: apartment_number.into(),
        }
    }

    /// 同一地区（比较时忽略大小写与首尾空白）
    pub fn is_located_in_same_region(&self, other: &Address) -> bool {
        normalize_name(&self.region) == normalize_name(&other.region)
    }

    /// 同一城镇：地区、区县、城市均相同
    pub fn is_located_in_same_town(&self, other: &Address) -> bool {
        self.is_located_in_same_region(other)
            && normalize_name(&self.district) == normalize_name(&other.district)
            && normalize_name(&self.city) == normalize_name(&other.city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(region: &str, district: &str, city: &str) -> Address {
        Address::new(
            Postcode::new("00001").unwrap(),
            region,
            district,
            city,
            "Sadova",
            "1",
            "",
        )
    }

    #[test]
    fn test_same_town_ignores_case_and_whitespace() {
        let a = address("Ternopil", "Monastiriska", "Monastiriska");
        let b = address(" ternopil", "MONASTIRISKA ", "monastiriska");
        assert!(a.is_located_in_same_town(&b));
        assert!(a.is_located_in_same_region(&b));
    }

    #[test]
    fn test_same_region_different_town() {
        let a = address("Ternopil", "Monastiriska", "Monastiriska");
        let b = address("Ternopil", "Chortkiv", "Chortkiv");
        assert!(!a.is_located_in_same_town(&b));
        assert!(a.is_located_in_same_region(&b));
    }
}
