//! 条码状态

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BarcodeStatus {
    /// 已预留（已签发但未使用）
    Reserved,
    /// 已使用
    Used,
}

impl TryFrom<i16> for BarcodeStatus {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BarcodeStatus::Reserved),
            2 => Ok(BarcodeStatus::Used),
            other => Err(other),
        }
    }
}

impl From<BarcodeStatus> for i16 {
    fn from(value: BarcodeStatus) -> Self {
        match value {
            BarcodeStatus::Reserved => 1,
            BarcodeStatus::Used => 2,
        }
    }
}
