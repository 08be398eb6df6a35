use cosmwasm_std::{OverflowError, StdError};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Types(#[from] whirpool_types::ContractError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Market not found: {market_key}")]
    MarketNotFound { market_key: String },

    #[error("Market already exists: {market_key}")]
    MarketAlreadyExists { market_key: String },

    #[error("Market is paused")]
    MarketPaused,

    #[error("Market accrual is behind: last accrued at block {accrued_block}, current {current_block}")]
    MarketNotUpToDate {
        accrued_block: u64,
        current_block: u64,
    },

    #[error("Not enough cash to withdraw: available {available}, requested {requested}")]
    NotEnoughCashToWithdraw {
        available: String,
        requested: String,
    },

    #[error("Not enough cash to lend: available {available}, requested {requested}")]
    NotEnoughCashToLend {
        available: String,
        requested: String,
    },

    #[error("Borrow cap limit reached")]
    BorrowCapReached,

    #[error("Collateral cap limit reached")]
    MaxCollateralReached,

    #[error("Not enough collateral shares: held {held}, requested {requested}")]
    NotEnoughShares { held: String, requested: String },

    #[error("Not enough reserves: held {held}, requested {requested}")]
    NotEnoughReserves { held: String, requested: String },

    #[error("Withdrawal would leave the account insolvent")]
    WithdrawNotAllowed,

    #[error("Borrow would leave the account insolvent")]
    BorrowNotAllowed,

    #[error("Account is insolvent")]
    UserIsInsolvent,

    #[error("Account is solvent")]
    UserIsSolvent,

    #[error("Operation not available for DNR; use the DNR-specific entry point")]
    DnrOperationNotAllowed,

    #[error("DNR cannot be used as collateral")]
    CanNotUseDnr,

    #[error("Cannot exit a market with an open loan")]
    MarketExitLoanOpen,

    #[error("Liquidator cannot be the borrower")]
    LiquidatorIsBorrower,

    #[error("Liquidation amount is zero")]
    ZeroLiquidationAmount,

    #[error("Value exceeds the allowed maximum")]
    ValueTooHigh,

    #[error("Admin cannot be transferred to an empty address")]
    NoZeroAddress,

    #[error("Oracle price is zero for {market_key}")]
    ZeroOraclePrice { market_key: String },

    #[error("Oracle query failed for {market_key}: {reason}")]
    OracleError { market_key: String, reason: String },

    #[error("Oracle price is stale for {market_key}: age={age_seconds}s, max={max_age}s")]
    PriceStale {
        market_key: String,
        age_seconds: u64,
        max_age: u64,
    },

    #[error("Oracle price is from the future for {market_key}: updated_at={updated_at}, current={current}")]
    PriceFromFuture {
        market_key: String,
        updated_at: u64,
        current: u64,
    },

    #[error("Borrower has no collateral account in this market")]
    AccountCollateralDoesNotExist,

    #[error("Borrower has no loan account in this market")]
    AccountLoanDoesNotExist,

    #[error("Zero amount not allowed")]
    ZeroAmount,

    #[error("No funds sent")]
    NoFundsSent,

    #[error("Expected exactly one coin in funds")]
    MultipleDenoms,

    #[error("Wrong denom sent: expected {expected}, got {got}")]
    WrongDenom { expected: String, got: String },
}

pub type ContractResult<T> = Result<T, ContractError>;
