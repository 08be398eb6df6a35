use cosmwasm_std::{BankMsg, Coin, DepsMut, Env, MessageInfo, Response, Uint128};

use crate::error::ContractError;
use crate::execute::mint_msg;
use crate::health::is_user_solvent;
use crate::interest::accrue;
use crate::rewards::{accumulated, pending};
use crate::state::{load_account, load_market, ACCOUNTS, CONFIG, MARKETS, MARKETS_IN};

/// Burn collateral shares and withdraw the underlying asset.
pub fn execute_withdraw(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    market_key: String,
    shares: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if shares.is_zero() {
        return Err(ContractError::ZeroAmount);
    }
    if market_key == config.dnr_denom {
        return Err(ContractError::DnrOperationNotAllowed);
    }

    let market = load_market(deps.storage, &market_key)?;
    if market.is_paused {
        return Err(ContractError::MarketPaused);
    }

    accrue(deps.storage, &env, &market_key)?;
    let mut market = load_market(deps.storage, &market_key)?;
    let mut account = load_account(deps.storage, &market_key, &info.sender)?;

    if account.shares < shares {
        return Err(ContractError::NotEnoughShares {
            held: account.shares.to_string(),
            requested: shares.to_string(),
        });
    }

    let pending_rewards = pending(
        account.shares,
        market.accrued_collateral_rewards_per_share,
        market.decimals_factor,
        account.collateral_rewards_paid,
    )?;

    let underlying = market.collateral_rebase.to_elastic(shares, false)?;
    if market.cash < underlying {
        return Err(ContractError::NotEnoughCashToWithdraw {
            available: market.cash.to_string(),
            requested: underlying.to_string(),
        });
    }

    // Only portfolios registered for borrowing are solvency-gated
    let has_markets_in = MARKETS_IN
        .may_load(deps.storage, &info.sender)?
        .map(|keys| !keys.is_empty())
        .unwrap_or(false);
    if has_markets_in
        && !is_user_solvent(
            deps.branch(),
            &env,
            &info.sender,
            &market_key,
            underlying,
            Uint128::zero(),
        )?
    {
        return Err(ContractError::WithdrawNotAllowed);
    }

    let removed = market.collateral_rebase.sub_base(shares, false)?;
    debug_assert_eq!(removed, underlying);
    market.cash = market.cash.checked_sub(underlying)?;
    account.shares = account.shares.checked_sub(shares)?;
    account.collateral_rewards_paid = accumulated(
        account.shares,
        market.accrued_collateral_rewards_per_share,
        market.decimals_factor,
    )?;

    MARKETS.save(deps.storage, &market_key, &market)?;
    ACCOUNTS.save(deps.storage, (market_key.as_str(), &info.sender), &account)?;

    let mut response = Response::new()
        .add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![Coin {
                denom: market_key.clone(),
                amount: underlying,
            }],
        })
        .add_attribute("action", "withdraw")
        .add_attribute("withdrawer", info.sender.as_str())
        .add_attribute("market_key", market_key)
        .add_attribute("shares", shares)
        .add_attribute("amount", underlying)
        .add_attribute("collateral_elastic", market.collateral_rebase.elastic)
        .add_attribute("cash", market.cash)
        .add_attribute("rewards", pending_rewards);

    if let Some(msg) = mint_msg(
        &config.token_issuer,
        &config.ipx_denom,
        &info.sender,
        pending_rewards,
    )? {
        response = response.add_message(msg);
    }

    Ok(response)
}
