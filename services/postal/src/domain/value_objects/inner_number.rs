//! 条码内部号值对象

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InnerNumberError {
    #[error("Barcode inner number must be exactly {expected} digits, got '{value}'")]
    InvalidFormat { value: String, expected: usize },

    #[error("Barcode inner number {0} exceeds the 7-digit range")]
    Overflow(u32),
}

/// 条码内部号（7 位数字，池内唯一）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InnerNumber(String);

impl InnerNumber {
    pub const LENGTH: usize = 7;
    pub const MAX: u32 = 9_999_999;

    pub fn new(value: impl Into<String>) -> Result<Self, InnerNumberError> {
        let value = value.into().trim().to_string();
        if value.len() != Self::LENGTH || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(InnerNumberError::InvalidFormat {
                value,
                expected: Self::LENGTH,
            });
        }
        Ok(Self(value))
    }

    pub fn from_value(value: u32) -> Result<Self, InnerNumberError> {
        if value > Self::MAX {
            return Err(InnerNumberError::Overflow(value));
        }
        Ok(Self(format!("{:07}", value)))
    }

    pub fn value(&self) -> u32 {
        // 构造时已校验为 7 位数字
        self.0.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InnerNumber {
    type Error = InnerNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InnerNumber> for String {
    fn from(number: InnerNumber) -> Self {
        number.0
    }
}

impl fmt::Display for InnerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value_pads() {
        assert_eq!(InnerNumber::from_value(42).unwrap().as_str(), "0000042");
        assert_eq!(InnerNumber::new("0000042").unwrap().value(), 42);
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            InnerNumber::from_value(10_000_000),
            Err(InnerNumberError::Overflow(10_000_000))
        );
    }

    #[test]
    fn test_invalid_format() {
        assert!(InnerNumber::new("123").is_err());
        assert!(InnerNumber::new("00000x1").is_err());
    }
}
