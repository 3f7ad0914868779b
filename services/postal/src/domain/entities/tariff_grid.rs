//! 资费表

use courier_domain_core::Money;
use serde::{Deserialize, Serialize};

use crate::domain::enums::W2wVariation;
use crate::domain::value_objects::TariffGridId;

/// 资费表行：重量上限（kg）、长度上限（cm）、区域档位、基础价格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffGrid {
    pub id: TariffGridId,
    pub weight: f64,
    pub length: f64,
    pub w2w_variation: W2wVariation,
    pub price: Money,
}

impl TariffGrid {
    pub fn new(weight: f64, length: f64, w2w_variation: W2wVariation, price: Money) -> Self {
        Self {
            id: TariffGridId::new(),
            weight,
            length,
            w2w_variation,
            price,
        }
    }

    pub fn covers(&self, weight: f64, length: f64) -> bool {
        weight <= self.weight && length <= self.length
    }
}
