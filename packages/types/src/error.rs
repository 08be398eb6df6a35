use cosmwasm_std::{OverflowError, StdError};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("Division by zero")]
    DivideByZero,

    #[error("Math overflow: {reason}")]
    MathOverflow { reason: String },

    #[error("Invalid interest rate model parameters")]
    InvalidInterestRateModel,
}
