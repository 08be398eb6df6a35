use cosmwasm_std::{Addr, DepsMut, Env, MessageInfo, Response, Storage, Uint128};

use crate::error::ContractError;
use crate::execute::mint_msg;
use crate::interest::accrue;
use crate::rewards::{accumulated, pending};
use crate::state::{load_account, load_market, ACCOUNTS, CONFIG, MARKET_KEYS};

/// Settle a user's pending IPX in one market: accrue, compute both sides'
/// pending, advance the watermarks. Returns the claimable amount.
fn settle_market_rewards(
    storage: &mut dyn Storage,
    env: &Env,
    market_key: &str,
    user: &Addr,
) -> Result<Uint128, ContractError> {
    accrue(storage, env, market_key)?;
    let market = load_market(storage, market_key)?;
    let mut account = load_account(storage, market_key, user)?;

    let collateral_rewards = pending(
        account.shares,
        market.accrued_collateral_rewards_per_share,
        market.decimals_factor,
        account.collateral_rewards_paid,
    )?;
    let loan_rewards = pending(
        account.principal,
        market.accrued_loan_rewards_per_share,
        market.decimals_factor,
        account.loan_rewards_paid,
    )?;

    account.collateral_rewards_paid = accumulated(
        account.shares,
        market.accrued_collateral_rewards_per_share,
        market.decimals_factor,
    )?;
    account.loan_rewards_paid = accumulated(
        account.principal,
        market.accrued_loan_rewards_per_share,
        market.decimals_factor,
    )?;
    ACCOUNTS.save(storage, (market_key, user), &account)?;

    Ok(collateral_rewards.checked_add(loan_rewards)?)
}

/// Claim pending IPX for one market.
pub fn execute_claim_rewards(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    market_key: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let rewards = settle_market_rewards(deps.storage, &env, &market_key, &info.sender)?;

    let mut response = Response::new()
        .add_attribute("action", "claim_rewards")
        .add_attribute("user", info.sender.as_str())
        .add_attribute("market_key", market_key)
        .add_attribute("rewards", rewards);

    if let Some(msg) = mint_msg(&config.token_issuer, &config.ipx_denom, &info.sender, rewards)? {
        response = response.add_message(msg);
    }
    Ok(response)
}

/// Claim pending IPX across every admitted market.
pub fn execute_claim_all_rewards(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let market_keys = MARKET_KEYS.may_load(deps.storage)?.unwrap_or_default();

    let mut rewards = Uint128::zero();
    for market_key in &market_keys {
        rewards = rewards
            .checked_add(settle_market_rewards(deps.storage, &env, market_key, &info.sender)?)?;
    }

    let mut response = Response::new()
        .add_attribute("action", "claim_all_rewards")
        .add_attribute("user", info.sender.as_str())
        .add_attribute("rewards", rewards);

    if let Some(msg) = mint_msg(&config.token_issuer, &config.ipx_denom, &info.sender, rewards)? {
        response = response.add_message(msg);
    }
    Ok(response)
}
