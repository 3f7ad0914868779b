//! 运单状态

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    /// 已受理
    Prepared,
    /// 已发出
    Sent,
    /// 已到达目的网点
    Arrived,
    /// 已妥投
    Delivered,
    /// 已退回
    Returned,
}

impl TryFrom<i16> for ShipmentStatus {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ShipmentStatus::Prepared),
            2 => Ok(ShipmentStatus::Sent),
            3 => Ok(ShipmentStatus::Arrived),
            4 => Ok(ShipmentStatus::Delivered),
            5 => Ok(ShipmentStatus::Returned),
            other => Err(other),
        }
    }
}

impl From<ShipmentStatus> for i16 {
    fn from(value: ShipmentStatus) -> Self {
        match value {
            ShipmentStatus::Prepared => 1,
            ShipmentStatus::Sent => 2,
            ShipmentStatus::Arrived => 3,
            ShipmentStatus::Delivered => 4,
            ShipmentStatus::Returned => 5,
        }
    }
}
