use cosmwasm_std::{Env, Storage, Uint128, Uint256};
use whirpool_types::{fmul, MarketData};

use crate::error::ContractError;
use crate::state::{load_market, CONFIG, INTEREST_RATE_MODELS, MARKETS, PARAMS};

/// Per-block borrow rate for a market at its current pool state. The DNR
/// market uses the constant governance-set rate instead of the curve table.
pub fn borrow_rate_per_block(
    storage: &dyn Storage,
    market_key: &str,
    market: &MarketData,
) -> Result<Uint128, ContractError> {
    let config = CONFIG.load(storage)?;
    if market_key == config.dnr_denom {
        let params = PARAMS.load(storage)?;
        return Ok(params.dnr_interest_rate_per_block);
    }
    let model = INTEREST_RATE_MODELS.load(storage, market_key)?;
    Ok(model.borrow_rate(market.cash, market.loan_rebase.elastic, market.total_reserves)?)
}

/// Advance a market's state to `current_block` in memory: interest on
/// loans, the reserve slice, and the reward-per-share accumulators.
///
/// Order matters: the rate is read at the pre-accrual pool state, debt
/// grows by the full interest, depositors' claim grows by the non-reserved
/// interest, and the reward emission is split evenly between the two sides
/// with the odd unit going to loans.
pub fn accrue_market(
    market: &mut MarketData,
    rate_per_block: Uint128,
    current_block: u64,
    ipx_per_block: Uint128,
    total_allocation_points: Uint128,
) -> Result<(), ContractError> {
    if current_block < market.accrued_block {
        return Err(ContractError::MarketNotUpToDate {
            accrued_block: market.accrued_block,
            current_block,
        });
    }
    let elapsed = current_block - market.accrued_block;
    if elapsed == 0 {
        return Ok(());
    }

    let rate = rate_per_block.checked_mul(Uint128::from(elapsed))?;
    let interest = fmul(rate, market.loan_rebase.elastic)?;
    let reserve_slice = fmul(interest, market.reserve_factor)?;

    market.loan_rebase.increase_elastic(interest)?;
    if market.collateral_rebase.base.is_zero() {
        // No depositors to credit (the DNR market is the standing case):
        // the whole interest joins reserves, keeping both sides of the
        // collateral rebase at zero
        market.total_reserves = market.total_reserves.checked_add(interest)?;
    } else {
        market
            .collateral_rebase
            .increase_elastic(interest.checked_sub(reserve_slice)?)?;
        market.total_reserves = market.total_reserves.checked_add(reserve_slice)?;
    }
    market.accrued_block = current_block;

    if total_allocation_points.is_zero() || market.allocation_points.is_zero() {
        return Ok(());
    }

    // emitted = allocation_points * elapsed * ipx_per_block / total_allocation_points
    let emitted = Uint256::from(market.allocation_points)
        .checked_mul(Uint256::from(elapsed as u128))
        .map_err(ContractError::Overflow)?
        .checked_mul(Uint256::from(ipx_per_block))
        .map_err(ContractError::Overflow)?
        / Uint256::from(total_allocation_points);

    let collateral_emitted = emitted / Uint256::from(2u128);
    let loan_emitted = emitted - collateral_emitted;
    let decimals_factor = Uint256::from(market.decimals_factor);

    // A side with no holders drops its half of the emission
    if !market.collateral_rebase.base.is_zero() {
        let delta = collateral_emitted
            .checked_mul(decimals_factor)
            .map_err(ContractError::Overflow)?
            / Uint256::from(market.collateral_rebase.base);
        market.accrued_collateral_rewards_per_share = market
            .accrued_collateral_rewards_per_share
            .checked_add(delta)
            .map_err(ContractError::Overflow)?;
    }
    if !market.loan_rebase.base.is_zero() {
        let delta = loan_emitted
            .checked_mul(decimals_factor)
            .map_err(ContractError::Overflow)?
            / Uint256::from(market.loan_rebase.base);
        market.accrued_loan_rewards_per_share = market
            .accrued_loan_rewards_per_share
            .checked_add(delta)
            .map_err(ContractError::Overflow)?;
    }

    Ok(())
}

/// Load a market, advance it to the current block, and persist it.
/// Idempotent within a block.
pub fn accrue(
    storage: &mut dyn Storage,
    env: &Env,
    market_key: &str,
) -> Result<(), ContractError> {
    let mut market = load_market(storage, market_key)?;
    if market.accrued_block == env.block.height {
        return Ok(());
    }
    let rate = borrow_rate_per_block(storage, market_key, &market)?;
    let params = PARAMS.load(storage)?;
    accrue_market(
        &mut market,
        rate,
        env.block.height,
        params.ipx_per_block,
        params.total_allocation_points,
    )?;
    MARKETS.save(storage, market_key, &market)?;
    Ok(())
}

/// A copy of the market advanced to the current block without persisting.
/// Used by queries, which cannot mutate state.
pub fn projected_market(
    storage: &dyn Storage,
    env: &Env,
    market_key: &str,
) -> Result<MarketData, ContractError> {
    let mut market = load_market(storage, market_key)?;
    if market.accrued_block == env.block.height {
        return Ok(market);
    }
    let rate = borrow_rate_per_block(storage, market_key, &market)?;
    let params = PARAMS.load(storage)?;
    accrue_market(
        &mut market,
        rate,
        env.block.height,
        params.ipx_per_block,
        params.total_allocation_points,
    )?;
    Ok(market)
}
