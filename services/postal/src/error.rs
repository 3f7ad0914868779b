//! 服务错误定义

use courier_errors::AppError;
use thiserror::Error;

use crate::domain::value_objects::{InnerNumberError, PostcodeError};

/// 领域错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostalError {
    #[error("Postcode pool {0} is closed")]
    PostcodePoolClosed(String),

    #[error("Postcode pool {0} has no free barcode inner numbers left")]
    PostcodePoolExhausted(String),

    #[error("Barcode inner number {number} already exists in pool {postcode}")]
    DuplicateBarcode { postcode: String, number: String },

    #[error("Parcel is not attached to a shipment")]
    ParcelWithoutShipment,

    #[error("Tariff grid has no rows for variation {0}")]
    EmptyTariffGrid(String),

    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),

    #[error(transparent)]
    Postcode(#[from] PostcodeError),

    #[error(transparent)]
    InnerNumber(#[from] InnerNumberError),
}

impl From<PostalError> for AppError {
    fn from(err: PostalError) -> Self {
        match err {
            PostalError::PostcodePoolClosed(_) => AppError::failed_precondition(err.to_string()),
            PostalError::PostcodePoolExhausted(_) => AppError::resource_exhausted(err.to_string()),
            PostalError::DuplicateBarcode { .. } => AppError::conflict(err.to_string()),
            PostalError::ParcelWithoutShipment => AppError::validation(err.to_string()),
            PostalError::EmptyTariffGrid(_) => AppError::failed_precondition(err.to_string()),
            PostalError::InvalidMeasurement(_) => AppError::validation(err.to_string()),
            PostalError::Postcode(_) => AppError::validation(err.to_string()),
            PostalError::InnerNumber(InnerNumberError::Overflow(_)) => {
                AppError::resource_exhausted(err.to_string())
            }
            PostalError::InnerNumber(_) => AppError::validation(err.to_string()),
        }
    }
}

impl From<PostcodeError> for AppError {
    fn from(err: PostcodeError) -> Self {
        PostalError::from(err).into()
    }
}

impl From<InnerNumberError> for AppError {
    fn from(err: InnerNumberError) -> Self {
        PostalError::from(err).into()
    }
}

pub type PostalResult<T> = Result<T, PostalError>;
