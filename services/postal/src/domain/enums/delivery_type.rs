//! 投递方式

use serde::{Deserialize, Serialize};

/// 投递方式（W = 网点/仓库, D = 上门）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    /// 网点到网点
    W2w,
    /// 网点到门
    W2d,
    /// 门到网点
    D2w,
    /// 门到门
    D2d,
}

impl DeliveryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryType::W2w => "W2W",
            DeliveryType::W2d => "W2D",
            DeliveryType::D2w => "D2W",
            DeliveryType::D2d => "D2D",
        }
    }
}

impl TryFrom<i16> for DeliveryType {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DeliveryType::W2w),
            2 => Ok(DeliveryType::W2d),
            3 => Ok(DeliveryType::D2w),
            4 => Ok(DeliveryType::D2d),
            other => Err(other),
        }
    }
}

impl From<DeliveryType> for i16 {
    fn from(value: DeliveryType) -> Self {
        match value {
            DeliveryType::W2w => 1,
            DeliveryType::W2d => 2,
            DeliveryType::D2w => 3,
            DeliveryType::D2d => 4,
        }
    }
}
