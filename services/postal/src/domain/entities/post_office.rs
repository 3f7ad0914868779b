//! 邮局实体

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AddressId, PostOfficeId, PostcodePoolId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostOffice {
    pub id: PostOfficeId,
    pub name: String,
    pub address_id: AddressId,
    pub postcode_pool_id: PostcodePoolId,
}

impl PostOffice {
    pub fn new(
        name: impl Into<String>,
        address_id: AddressId,
        postcode_pool_id: PostcodePoolId,
    ) -> Self {
        Self {
            id: PostOfficeId::new(),
            name: name.into(),
            address_id,
            postcode_pool_id,
        }
    }
}
