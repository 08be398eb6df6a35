use cosmwasm_std::{DepsMut, Env, MessageInfo, Response};

use crate::error::ContractError;
use crate::execute::{mint_msg, one_coin};
use crate::interest::accrue;
use crate::rewards::{accumulated, pending};
use crate::state::{load_account, load_market, ACCOUNTS, CONFIG, MARKETS};

/// Deposit collateral into the market matching the sent denom.
pub fn execute_deposit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let coin = one_coin(&info)?;
    let market_key = coin.denom.as_str();
    let amount = coin.amount;

    // DNR is debt-only, never collateral
    if market_key == config.dnr_denom {
        return Err(ContractError::DnrOperationNotAllowed);
    }

    let market = load_market(deps.storage, market_key)?;
    if market.is_paused {
        return Err(ContractError::MarketPaused);
    }

    accrue(deps.storage, &env, market_key)?;
    let mut market = load_market(deps.storage, market_key)?;
    let mut account = load_account(deps.storage, market_key, &info.sender)?;

    let pending_rewards = pending(
        account.shares,
        market.accrued_collateral_rewards_per_share,
        market.decimals_factor,
        account.collateral_rewards_paid,
    )?;

    // Cap is enforced against the post-deposit collateral pool
    let would_be = market.collateral_rebase.elastic.checked_add(amount)?;
    if would_be > market.collateral_cap {
        return Err(ContractError::MaxCollateralReached);
    }

    let shares = market.collateral_rebase.add_elastic(amount, false)?;
    market.cash = market.cash.checked_add(amount)?;
    account.shares = account.shares.checked_add(shares)?;
    account.collateral_rewards_paid = accumulated(
        account.shares,
        market.accrued_collateral_rewards_per_share,
        market.decimals_factor,
    )?;

    MARKETS.save(deps.storage, market_key, &market)?;
    ACCOUNTS.save(deps.storage, (market_key, &info.sender), &account)?;

    let mut response = Response::new()
        .add_attribute("action", "deposit")
        .add_attribute("depositor", info.sender.as_str())
        .add_attribute("market_key", market_key)
        .add_attribute("amount", amount)
        .add_attribute("shares", shares)
        .add_attribute("collateral_elastic", market.collateral_rebase.elastic)
        .add_attribute("cash", market.cash)
        .add_attribute("rewards", pending_rewards);

    if let Some(msg) = mint_msg(&config.token_issuer, &config.ipx_denom, &info.sender, pending_rewards)? {
        response = response.add_message(msg);
    }

    Ok(response)
}
