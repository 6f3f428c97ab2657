//! 服务错误定义

use rental_errors::AppError;
use thiserror::Error;

use crate::domain::{BicycleId, OrderId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RentalError {
    #[error("Unknown user id({0})")]
    UnknownUser(UserId),

    #[error("Unknown bicycle model id({0})")]
    UnknownBicycle(BicycleId),

    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    #[error("Unknown order status: {0}")]
    InvalidStatus(String),

    #[error("Column '{0}' is not sortable")]
    InvalidSortColumn(String),

    #[error("Rental duration must be positive, got {0} hours")]
    InvalidHours(i32),
}

impl From<RentalError> for AppError {
    fn from(err: RentalError) -> Self {
        match err {
            RentalError::UnknownUser(_)
            | RentalError::UnknownBicycle(_)
            | RentalError::OrderNotFound(_) => AppError::not_found(err.to_string()),
            RentalError::InvalidStatus(_)
            | RentalError::InvalidSortColumn(_)
            | RentalError::InvalidHours(_) => AppError::validation(err.to_string()),
        }
    }
}
