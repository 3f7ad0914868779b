//! 运单聚合根

use courier_common::AuditInfo;
use courier_domain_core::{AggregateRoot, Entity, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::Parcel;
use crate::domain::enums::DeliveryType;
use crate::domain::value_objects::{
    BarcodeInnerNumberId, ClientId, InnerNumber, ParcelId, Postcode, ShipmentId,
};

/// 运单上的条码（邮编 + 内部号）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentBarcode {
    pub id: BarcodeInnerNumberId,
    pub postcode: Postcode,
    pub number: InnerNumber,
}

impl fmt::Display for ShipmentBarcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.postcode, self.number)
    }
}

/// 运单
///
/// 运单持有有序的包裹列表；运单价格始终等于各包裹价格之和。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    id: ShipmentId,
    sender_id: ClientId,
    recipient_id: ClientId,
    delivery_type: DeliveryType,
    price: Money,
    barcode: Option<ShipmentBarcode>,
    parcels: Vec<Parcel>,
    audit_info: AuditInfo,
}

impl Shipment {
    pub fn new(
        sender_id: ClientId,
        recipient_id: ClientId,
        delivery_type: DeliveryType,
        parcels: Vec<Parcel>,
    ) -> Self {
        let mut shipment = Self {
            id: ShipmentId::new(),
            sender_id,
            recipient_id,
            delivery_type,
            price: Money::ZERO,
            barcode: None,
            parcels,
            audit_info: AuditInfo::default(),
        };
        shipment.attach_parcels();
        shipment.recalculate_price();
        shipment
    }

    /// 从持久化数据重建（不重新计算价格）
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: ShipmentId,
        sender_id: ClientId,
        recipient_id: ClientId,
        delivery_type: DeliveryType,
        price: Money,
        barcode: Option<ShipmentBarcode>,
        parcels: Vec<Parcel>,
        audit_info: AuditInfo,
    ) -> Self {
        Self {
            id,
            sender_id,
            recipient_id,
            delivery_type,
            price,
            barcode,
            parcels,
            audit_info,
        }
    }

    // ========== Getters ==========

    pub fn id(&self) -> &ShipmentId {
        &self.id
    }

    pub fn sender_id(&self) -> &ClientId {
        &self.sender_id
    }

    pub fn recipient_id(&self) -> &ClientId {
        &self.recipient_id
    }

    pub fn delivery_type(&self) -> DeliveryType {
        self.delivery_type
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn barcode(&self) -> Option<&ShipmentBarcode> {
        self.barcode.as_ref()
    }

    pub fn parcels(&self) -> &[Parcel] {
        &self.parcels
    }

    pub fn parcels_mut(&mut self) -> &mut Vec<Parcel> {
        &mut self.parcels
    }

    pub fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    // ========== Mutations ==========

    pub fn assign_barcode(&mut self, barcode: ShipmentBarcode) {
        self.barcode = Some(barcode);
        self.mark_modified();
    }

    pub fn set_sender(&mut self, sender_id: ClientId) {
        self.sender_id = sender_id;
        self.mark_modified();
    }

    pub fn set_recipient(&mut self, recipient_id: ClientId) {
        self.recipient_id = recipient_id;
        self.mark_modified();
    }

    pub fn set_delivery_type(&mut self, delivery_type: DeliveryType) {
        self.delivery_type = delivery_type;
        self.mark_modified();
    }

    /// 整体替换包裹列表
    pub fn replace_parcels(&mut self, parcels: Vec<Parcel>) {
        self.parcels = parcels;
        self.attach_parcels();
        self.recalculate_price();
        self.mark_modified();
    }

    /// 新包裹排在已有包裹之前
    pub fn prepend_parcels(&mut self, parcels: Vec<Parcel>) {
        let existing = std::mem::take(&mut self.parcels);
        self.parcels = parcels.into_iter().chain(existing).collect();
        self.attach_parcels();
        self.recalculate_price();
        self.mark_modified();
    }

    pub fn remove_parcel(&mut self, parcel_id: &ParcelId) -> bool {
        let before = self.parcels.len();
        self.parcels.retain(|p| &p.id != parcel_id);
        let removed = before != self.parcels.len();
        if removed {
            self.recalculate_price();
            self.mark_modified();
        }
        removed
    }

    /// 回填包裹 → 运单、物品 → 包裹的引用
    pub fn attach_parcels(&mut self) {
        let id = self.id;
        for parcel in &mut self.parcels {
            parcel.attach_to(id);
        }
    }

    /// 包裹价格之和；没有包裹时为零
    pub fn calculate_price(&self) -> Money {
        self.parcels.iter().map(|p| p.price).sum()
    }

    pub fn recalculate_price(&mut self) {
        self.price = self.calculate_price();
    }
}

impl Entity for Shipment {
    type Id = ShipmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Shipment {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parcel(price: rust_decimal::Decimal) -> Parcel {
        Parcel::new(vec![], 1.0, 1.0, 1.0, 1.0, Money::ZERO, Money::new(price))
    }

    #[test]
    fn test_price_is_sum_of_parcels() {
        let shipment = Shipment::new(
            ClientId::new(),
            ClientId::new(),
            DeliveryType::W2w,
            vec![parcel(dec!(0.1)), parcel(dec!(0.2))],
        );
        assert_eq!(shipment.price(), Money::new(dec!(0.3)));
        assert!(shipment
            .parcels()
            .iter()
            .all(|p| p.shipment_id == Some(*Entity::id(&shipment))));
    }

    #[test]
    fn test_empty_shipment_costs_zero() {
        let shipment = Shipment::new(ClientId::new(), ClientId::new(), DeliveryType::D2d, vec![]);
        assert!(shipment.price().is_zero());
    }

    #[test]
    fn test_prepend_keeps_incoming_first() {
        let mut shipment = Shipment::new(
            ClientId::new(),
            ClientId::new(),
            DeliveryType::W2d,
            vec![parcel(dec!(1))],
        );
        let existing = shipment.parcels()[0].id;
        let incoming = parcel(dec!(2));
        let incoming_id = incoming.id;
        shipment.prepend_parcels(vec![incoming]);
        let ids: Vec<_> = shipment.parcels().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![incoming_id, existing]);
        assert_eq!(shipment.price(), Money::new(dec!(3)));
    }

    #[test]
    fn test_barcode_display() {
        let barcode = ShipmentBarcode {
            id: BarcodeInnerNumberId::new(),
            postcode: Postcode::new("00003").unwrap(),
            number: InnerNumber::new("0000004").unwrap(),
        };
        assert_eq!(barcode.to_string(), "000030000004");
    }
}
