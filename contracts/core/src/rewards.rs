use cosmwasm_std::{Uint128, Uint256};
use whirpool_types::narrow;

use crate::error::ContractError;

/// Cumulative reward owed to `base` units at the accumulator `rps`
/// (reward-per-share scaled by the market's decimals factor).
pub fn accumulated(
    base: Uint128,
    rps: Uint256,
    decimals_factor: Uint128,
) -> Result<Uint256, ContractError> {
    if decimals_factor.is_zero() {
        return Err(whirpool_types::ContractError::DivideByZero.into());
    }
    let total = Uint256::from(base)
        .checked_mul(rps)
        .map_err(|e| ContractError::Overflow(e))?;
    Ok(total / Uint256::from(decimals_factor))
}

/// Reward claimable right now: accumulated minus the reward-debt watermark.
/// Zero when the position is empty.
pub fn pending(
    base: Uint128,
    rps: Uint256,
    decimals_factor: Uint128,
    rewards_paid: Uint256,
) -> Result<Uint128, ContractError> {
    if base.is_zero() {
        return Ok(Uint128::zero());
    }
    let total = accumulated(base, rps, decimals_factor)?;
    let owed = total
        .checked_sub(rewards_paid)
        .map_err(ContractError::Overflow)?;
    Ok(narrow(owed)?)
}
