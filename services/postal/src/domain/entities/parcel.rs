//! 包裹与包裹物品

use courier_domain_core::Money;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ParcelId, ParcelItemId, ShipmentId};
use crate::error::{PostalError, PostalResult};

/// 包裹内的物品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelItem {
    pub id: ParcelItemId,
    pub parcel_id: Option<ParcelId>,
    pub name: String,
    pub quantity: i32,
    pub weight: f64,
    pub price: Money,
}

impl ParcelItem {
    pub fn new(name: impl Into<String>, quantity: i32, weight: f64, price: Money) -> Self {
        Self {
            id: ParcelItemId::new(),
            parcel_id: None,
            name: name.into(),
            quantity,
            weight,
            price,
        }
    }
}

/// 包裹
///
/// 尺寸单位为厘米，重量单位为千克；`price` 由计价服务写入。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: ParcelId,
    pub shipment_id: Option<ShipmentId>,
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub declared_price: Money,
    pub price: Money,
    pub parcel_items: Vec<ParcelItem>,
}

impl Parcel {
    pub fn new(
        parcel_items: Vec<ParcelItem>,
        weight: f64,
        length: f64,
        width: f64,
        height: f64,
        declared_price: Money,
        price: Money,
    ) -> Self {
        let mut parcel = Self {
            id: ParcelId::new(),
            shipment_id: None,
            weight,
            length,
            width,
            height,
            declared_price,
            price,
            parcel_items,
        };
        parcel.link_items();
        parcel
    }

    /// 挂到运单下，同时回填物品的包裹引用
    pub fn attach_to(&mut self, shipment_id: ShipmentId) {
        self.shipment_id = Some(shipment_id);
        self.link_items();
    }

    pub fn link_items(&mut self) {
        let id = self.id;
        for item in &mut self.parcel_items {
            item.parcel_id = Some(id);
        }
    }

    pub fn validate(&self) -> PostalResult<()> {
        let dimensions = [
            ("weight", self.weight),
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
        ];
        for (name, value) in dimensions {
            if !value.is_finite() || value < 0.0 {
                return Err(PostalError::InvalidMeasurement(format!(
                    "parcel {} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.declared_price.is_negative() {
            return Err(PostalError::InvalidMeasurement(
                "declared price must not be negative".to_string(),
            ));
        }
        for item in &self.parcel_items {
            if item.quantity < 0 || !item.weight.is_finite() || item.weight < 0.0 {
                return Err(PostalError::InvalidMeasurement(format!(
                    "parcel item '{}' has invalid quantity or weight",
                    item.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_attach_wires_back_references() {
        let mut parcel = Parcel::new(
            vec![ParcelItem::new("Some item", 1, 2.0, Money::new(dec!(10.5)))],
            3.0,
            1.0,
            3.0,
            3.0,
            Money::new(dec!(8.5)),
            Money::ZERO,
        );
        let shipment_id = ShipmentId::new();
        parcel.attach_to(shipment_id);
        assert_eq!(parcel.shipment_id, Some(shipment_id));
        assert!(parcel.parcel_items.iter().all(|i| i.parcel_id == Some(parcel.id)));
    }

    #[test]
    fn test_validate_rejects_negative_dimensions() {
        let parcel = Parcel::new(vec![], 1.0, -2.0, 1.0, 1.0, Money::ZERO, Money::ZERO);
        assert!(matches!(parcel.validate(), Err(PostalError::InvalidMeasurement(_))));
    }
}
