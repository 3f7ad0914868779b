//! 合作方实体

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CounterpartyId, PostcodePoolId};

/// 合作方（寄件企业），从自己的邮编池领取条码
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub id: CounterpartyId,
    pub name: String,
    pub postcode_pool_id: PostcodePoolId,
}

impl Counterparty {
    pub fn new(name: impl Into<String>, postcode_pool_id: PostcodePoolId) -> Self {
        Self {
            id: CounterpartyId::new(),
            name: name.into(),
            postcode_pool_id,
        }
    }
}
