//! 邮编值对象

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostcodeError {
    #[error("Postcode must be exactly {expected} digits, got '{value}'")]
    InvalidFormat { value: String, expected: usize },
}

/// 邮编（5 位数字）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Postcode(String);

impl Postcode {
    pub const LENGTH: usize = 5;

    pub fn new(value: impl Into<String>) -> Result<Self, PostcodeError> {
        let value = value.into().trim().to_string();
        if value.len() != Self::LENGTH || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(PostcodeError::InvalidFormat {
                value,
                expected: Self::LENGTH,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Postcode {
    type Error = PostcodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Postcode> for String {
    fn from(postcode: Postcode) -> Self {
        postcode.0
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_postcode() {
        assert_eq!(Postcode::new(" 00003 ").unwrap().as_str(), "00003");
    }

    #[test]
    fn test_invalid_postcode() {
        assert!(Postcode::new("1234").is_err());
        assert!(Postcode::new("12a45").is_err());
        assert!(Postcode::new("123456").is_err());
    }
}
