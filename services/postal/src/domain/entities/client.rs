//! 客户实体

use courier_common::AuditInfo;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AddressId, ClientId, CounterpartyId};

/// 客户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    /// 统一注册号
    pub unique_registration_number: String,
    pub address_id: AddressId,
    pub counterparty_id: CounterpartyId,
    pub audit_info: AuditInfo,
}

impl Client {
    pub fn new(
        name: impl Into<String>,
        unique_registration_number: impl Into<String>,
        address_id: AddressId,
        counterparty_id: CounterpartyId,
    ) -> Self {
        Self {
            id: ClientId::new(),
            name: name.into(),
            unique_registration_number: unique_registration_number.into(),
            address_id,
            counterparty_id,
            audit_info: AuditInfo::default(),
        }
    }
}
