//! 条码内部号实体

use serde::{Deserialize, Serialize};

use crate::domain::enums::BarcodeStatus;
use crate::domain::value_objects::{BarcodeInnerNumberId, InnerNumber, PostcodePoolId};

/// 条码内部号（属于某个邮编池）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeInnerNumber {
    pub id: BarcodeInnerNumberId,
    pub postcode_pool_id: PostcodePoolId,
    pub number: InnerNumber,
    pub status: BarcodeStatus,
}

impl BarcodeInnerNumber {
    pub fn new(postcode_pool_id: PostcodePoolId, number: InnerNumber, status: BarcodeStatus) -> Self {
        Self {
            id: BarcodeInnerNumberId::new(),
            postcode_pool_id,
            number,
            status,
        }
    }

    pub fn reserved(postcode_pool_id: PostcodePoolId, number: InnerNumber) -> Self {
        Self::new(postcode_pool_id, number, BarcodeStatus::Reserved)
    }

    pub fn mark_used(&mut self) {
        self.status = BarcodeStatus::Used;
    }
}
