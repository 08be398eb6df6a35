use cosmwasm_std::{BankMsg, Coin, DepsMut, Env, MessageInfo, Response, Uint128};

use crate::error::ContractError;
use crate::execute::{mint_msg, one_coin};
use crate::health::is_user_solvent;
use crate::interest::accrue;
use crate::rewards::{accumulated, pending};
use crate::state::{insert_market_in, load_account, load_market, ACCOUNTS, CONFIG, MARKETS};

/// Borrow freshly-minted DNR against collateral. DNR has no backing pool:
/// there is no cash to move, the coins are created by the issuer.
pub fn execute_borrow_dnr(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }
    let market_key = config.dnr_denom.clone();

    let market = load_market(deps.storage, &market_key)?;
    if market.is_paused {
        return Err(ContractError::MarketPaused);
    }

    accrue(deps.storage, &env, &market_key)?;
    let mut market = load_market(deps.storage, &market_key)?;
    let mut account = load_account(deps.storage, &market_key, &info.sender)?;

    insert_market_in(deps.storage, &info.sender, &market_key)?;

    let pending_rewards = pending(
        account.principal,
        market.accrued_loan_rewards_per_share,
        market.decimals_factor,
        account.loan_rewards_paid,
    )?;

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

    MARKETS.save(deps.storage, &market_key, &market)?;
    ACCOUNTS.save(deps.storage, (market_key.as_str(), &info.sender), &account)?;

    let mut response = Response::new()
        .add_attribute("action", "borrow_dnr")
        .add_attribute("borrower", info.sender.as_str())
        .add_attribute("amount", amount)
        .add_attribute("principal", principal)
        .add_attribute("loan_elastic", market.loan_rebase.elastic)
        .add_attribute("rewards", pending_rewards);

    // The borrowed DNR itself
    if let Some(msg) = mint_msg(&config.token_issuer, &config.dnr_denom, &info.sender, amount)? {
        response = response.add_message(msg);
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

/// Repay DNR debt. The repaid coins are burned; excess is refunded. The
/// DNR market's cash is never touched.
pub fn execute_repay_dnr(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    principal_to_repay: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let coin = one_coin(&info)?;
    if coin.denom != config.dnr_denom {
        return Err(ContractError::WrongDenom {
            expected: config.dnr_denom,
            got: coin.denom,
        });
    }
    let market_key = config.dnr_denom.clone();
    let amount = coin.amount;

    let market = load_market(deps.storage, &market_key)?;
    if market.is_paused {
        return Err(ContractError::MarketPaused);
    }

    accrue(deps.storage, &env, &market_key)?;
    let mut market = load_market(deps.storage, &market_key)?;
    let mut account = load_account(deps.storage, &market_key, &info.sender)?;

    let pending_rewards = pending(
        account.principal,
        market.accrued_loan_rewards_per_share,
        market.decimals_factor,
        account.loan_rewards_paid,
    )?;

    let asset_principal = market.loan_rebase.to_base(amount, false)?;
    let safe_principal = asset_principal
        .min(account.principal)
        .min(principal_to_repay);
    let repay_amount = market.loan_rebase.to_elastic(safe_principal, true)?;

    market.loan_rebase.sub_base(safe_principal, true)?;
    account.principal = account.principal.checked_sub(safe_principal)?;
    account.loan_rewards_paid = accumulated(
        account.principal,
        market.accrued_loan_rewards_per_share,
        market.decimals_factor,
    )?;

    MARKETS.save(deps.storage, &market_key, &market)?;
    ACCOUNTS.save(deps.storage, (market_key.as_str(), &info.sender), &account)?;

    let mut response = Response::new()
        .add_attribute("action", "repay_dnr")
        .add_attribute("repayer", info.sender.as_str())
        .add_attribute("amount", repay_amount)
        .add_attribute("principal", safe_principal)
        .add_attribute("loan_elastic", market.loan_rebase.elastic)
        .add_attribute("rewards", pending_rewards);

    if !repay_amount.is_zero() {
        response = response.add_message(BankMsg::Burn {
            amount: vec![Coin {
                denom: market_key.clone(),
                amount: repay_amount,
            }],
        });
    }

    let excess = amount.checked_sub(repay_amount)?;
    if !excess.is_zero() {
        response = response.add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![Coin {
                denom: market_key,
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
