//! 运单跟踪记录

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::enums::ShipmentStatus;
use crate::domain::value_objects::{PostOfficeId, ShipmentId, ShipmentTrackingDetailId};

/// 运单在某个邮局的状态记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentTrackingDetail {
    pub id: ShipmentTrackingDetailId,
    pub shipment_id: ShipmentId,
    pub post_office_id: PostOfficeId,
    pub status: ShipmentStatus,
    pub date: DateTime<Utc>,
}

impl ShipmentTrackingDetail {
    pub fn new(
        shipment_id: ShipmentId,
        post_office_id: PostOfficeId,
        status: ShipmentStatus,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ShipmentTrackingDetailId::new(),
            shipment_id,
            post_office_id,
            status,
            date,
        }
    }
}
