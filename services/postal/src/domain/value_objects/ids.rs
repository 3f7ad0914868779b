//! 强类型 ID 定义

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
        #[display("{_0}")]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(courier_common::new_id())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

entity_id!(
    /// 地址 ID
    AddressId
);
entity_id!(
    /// 邮编池 ID
    PostcodePoolId
);
entity_id!(
    /// 条码内部号 ID
    BarcodeInnerNumberId
);
entity_id!(
    /// 合作方 ID
    CounterpartyId
);
entity_id!(
    /// 客户 ID
    ClientId
);
entity_id!(
    /// 包裹 ID
    ParcelId
);
entity_id!(
    /// 包裹物品 ID
    ParcelItemId
);
entity_id!(
    /// 运单 ID
    ShipmentId
);
entity_id!(
    /// 邮局 ID
    PostOfficeId
);
entity_id!(
    /// 运单跟踪记录 ID
    ShipmentTrackingDetailId
);
entity_id!(
    /// 资费表行 ID
    TariffGridId
);
