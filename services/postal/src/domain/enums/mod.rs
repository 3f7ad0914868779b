//! 枚举定义

mod barcode_status;
mod delivery_type;
mod shipment_status;
mod w2w_variation;

pub use barcode_status::*;
pub use delivery_type::*;
pub use shipment_status::*;
pub use w2w_variation::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_type_serde_names() {
        assert_eq!(serde_json::to_string(&DeliveryType::W2d).unwrap(), "\"W2D\"");
        let parsed: DeliveryType = serde_json::from_str("\"D2D\"").unwrap();
        assert_eq!(parsed, DeliveryType::D2d);
    }

    #[test]
    fn test_i16_round_trip_rejects_unknown() {
        assert_eq!(ShipmentStatus::try_from(i16::from(ShipmentStatus::Sent)), Ok(ShipmentStatus::Sent));
        assert_eq!(BarcodeStatus::try_from(9), Err(9));
        assert_eq!(W2wVariation::try_from(0), Err(0));
    }
}
