use cosmwasm_std::{BankMsg, Coin, DepsMut, Env, MessageInfo, Response, Uint128};

use crate::error::ContractError;
use crate::execute::mint_msg;
use crate::health::is_user_solvent;
use crate::interest::accrue;
use crate::rewards::{accumulated, pending};
use crate::state::{
    insert_market_in, load_account, load_market, ACCOUNTS, CONFIG, MARKETS,
};

/// Borrow the market's asset against collateral across entered markets.
pub fn execute_borrow(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    market_key: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }
    if market_key == config.dnr_denom {
        return Err(ContractError::DnrOperationNotAllowed);
    }

    let market = load_market(deps.storage, &market_key)?;
    if market.is_paused {
        return Err(ContractError::MarketPaused);
    }
    if market.cash < amount {
        return Err(ContractError::NotEnoughCashToLend {
            available: market.cash.to_string(),
            requested: amount.to_string(),
        });
    }

    accrue(deps.storage, &env, &market_key)?;
    let mut market = load_market(deps.storage, &market_key)?;
    let mut account = load_account(deps.storage, &market_key, &info.sender)?;

    // A borrower's collateral and debt in this market both join the
    // solvency portfolio
    insert_market_in(deps.storage, &info.sender, &market_key)?;

    let pending_rewards = pending(
        account.principal,
        market.accrued_loan_rewards_per_share,
        market.decimals_factor,
        account.loan_rewards_paid,
    )?;

    // The cap is compared against the collateral-side pool
    if market.borrow_cap < market.collateral_rebase.elastic {
        return Err(ContractError::BorrowCapReached);
    }

    if !is_user_solvent(
        deps.branch(),
        &env,
        &info.sender,
        &market_key,
        Uint128::zero(),
        amount,
    )? {
        return Err(ContractError::BorrowNotAllowed);
    }

    let principal = market.loan_rebase.add_elastic(amount, true)?;
    account.principal = account.principal.checked_add(principal)?;
    account.loan_rewards_paid = accumulated(
        account.principal,
        market.accrued_loan_rewards_per_share,
        market.decimals_factor,
    )?;
    market.cash = market.cash.checked_sub(amount)?;

    MARKETS.save(deps.storage, &market_key, &market)?;
    ACCOUNTS.save(deps.storage, (market_key.as_str(), &info.sender), &account)?;

    let mut response = Response::new()
        .add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![Coin {
                denom: market_key.clone(),
                amount,
            }],
        })
        .add_attribute("action", "borrow")
        .add_attribute("borrower", info.sender.as_str())
        .add_attribute("market_key", market_key)
        .add_attribute("amount", amount)
        .add_attribute("principal", principal)
        .add_attribute("loan_elastic", market.loan_rebase.elastic)
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
