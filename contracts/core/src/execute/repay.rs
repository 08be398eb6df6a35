use cosmwasm_std::{BankMsg, Coin, DepsMut, Env, MessageInfo, Response, Uint128};

use crate::error::ContractError;
use crate::execute::{mint_msg, one_coin};
use crate::interest::accrue;
use crate::rewards::{accumulated, pending};
use crate::state::{load_account, load_market, ACCOUNTS, CONFIG, MARKETS};

/// Repay a loan in the market matching the sent denom. Excess funds are
/// refunded; `principal_to_repay` bounds how much principal is retired.
pub fn execute_repay(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    principal_to_repay: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let coin = one_coin(&info)?;
    let market_key = coin.denom.as_str();
    let amount = coin.amount;

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
        account.principal,
        market.accrued_loan_rewards_per_share,
        market.decimals_factor,
        account.loan_rewards_paid,
    )?;

    // The funds cover at most this much principal; never retire more than
    // the account owes or the caller asked for
    let asset_principal = market.loan_rebase.to_base(amount, false)?;
    let safe_principal = asset_principal
        .min(account.principal)
        .min(principal_to_repay);
    let repay_amount = market.loan_rebase.to_elastic(safe_principal, true)?;

    market.loan_rebase.sub_base(safe_principal, true)?;
    market.cash = market.cash.checked_add(repay_amount)?;
    account.principal = account.principal.checked_sub(safe_principal)?;
    account.loan_rewards_paid = accumulated(
        account.principal,
        market.accrued_loan_rewards_per_share,
        market.decimals_factor,
    )?;

    MARKETS.save(deps.storage, market_key, &market)?;
    ACCOUNTS.save(deps.storage, (market_key, &info.sender), &account)?;

    let mut response = Response::new()
        .add_attribute("action", "repay")
        .add_attribute("repayer", info.sender.as_str())
        .add_attribute("market_key", market_key)
        .add_attribute("amount", repay_amount)
        .add_attribute("principal", safe_principal)
        .add_attribute("loan_elastic", market.loan_rebase.elastic)
        .add_attribute("cash", market.cash)
        .add_attribute("rewards", pending_rewards);

    let excess = amount.checked_sub(repay_amount)?;
    if !excess.is_zero() {
        response = response.add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![Coin {
                denom: market_key.to_string(),
                amount: excess,
            }],
        });
    }

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
