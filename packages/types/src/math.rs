use cosmwasm_std::{Uint128, Uint256};

use crate::error::ContractError;

/// Fixed-point scale used for all fractional quantities (rates, factors,
/// normalized prices): 1e9.
pub const MANTISSA: Uint128 = Uint128::new(1_000_000_000);

/// The fixed-point representation of 1.0.
pub fn one() -> Uint128 {
    MANTISSA
}

/// Narrow a Uint256 back to Uint128 after a widened calculation.
pub fn narrow(value: Uint256) -> Result<Uint128, ContractError> {
    Uint128::try_from(value).map_err(|_| ContractError::MathOverflow {
        reason: "Uint256 value too large for Uint128".to_string(),
    })
}

/// Compute `a * b / denominator` over a Uint256 intermediate.
/// Rounding direction is the caller's choice at every call site.
pub fn mul_div(
    a: Uint128,
    b: Uint128,
    denominator: Uint128,
    round_up: bool,
) -> Result<Uint128, ContractError> {
    if denominator.is_zero() {
        return Err(ContractError::DivideByZero);
    }
    let numerator = Uint256::from(a)
        .checked_mul(Uint256::from(b))
        .map_err(ContractError::Overflow)?;
    let denominator = Uint256::from(denominator);
    let quotient = if round_up {
        numerator
            .checked_add(denominator - Uint256::one())
            .map_err(ContractError::Overflow)?
            / denominator
    } else {
        numerator / denominator
    };
    narrow(quotient)
}

/// Fixed-point multiply: `a * b / MANTISSA`, floor-truncated.
pub fn fmul(a: Uint128, b: Uint128) -> Result<Uint128, ContractError> {
    mul_div(a, b, MANTISSA, false)
}

/// Fixed-point divide: `a * MANTISSA / b`, floor-truncated.
pub fn fdiv(a: Uint128, b: Uint128) -> Result<Uint128, ContractError> {
    mul_div(a, MANTISSA, b, false)
}
