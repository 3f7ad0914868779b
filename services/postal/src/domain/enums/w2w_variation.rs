//! 资费地域档位

use serde::{Deserialize, Serialize};

/// 寄件地与收件地的地域关系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum W2wVariation {
    /// 同城
    Town,
    /// 同州
    Region,
    /// 全国
    Country,
}

impl TryFrom<i16> for W2wVariation {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(W2wVariation::Town),
            2 => Ok(W2wVariation::Region),
            3 => Ok(W2wVariation::Country),
            other => Err(other),
        }
    }
}

impl From<W2wVariation> for i16 {
    fn from(value: W2wVariation) -> Self {
        match value {
            W2wVariation::Town => 1,
            W2wVariation::Region => 2,
            W2wVariation::Country => 3,
        }
    }
}
