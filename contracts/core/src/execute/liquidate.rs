use cosmwasm_std::{Addr, BankMsg, Coin, DepsMut, Env, MessageInfo, Response, Uint128};
use whirpool_types::{fdiv, fmul};

use crate::error::ContractError;
use crate::execute::{mint_msg, one_coin};
use crate::health::{is_user_solvent, query_price};
use crate::interest::accrue;
use crate::rewards::{accumulated, pending};
use crate::state::{load_account, load_market, ACCOUNTS, CONFIG, LIQUIDATIONS, MARKETS};

/// Liquidate an insolvent borrower: the sent loan asset repays their debt
/// and their collateral shares move to the liquidator, penalty on top.
pub fn execute_liquidate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    collateral_key: String,
    borrower: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let coin = one_coin(&info)?;
    if coin.denom == config.dnr_denom {
        return Err(ContractError::DnrOperationNotAllowed);
    }
    liquidate_inner(
        deps,
        env,
        info.sender,
        collateral_key,
        coin.denom,
        coin.amount,
        borrower,
        false,
    )
}

/// Liquidate an insolvent DNR borrower; the repaid DNR is burned.
pub fn execute_liquidate_dnr(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    collateral_key: String,
    borrower: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let coin = one_coin(&info)?;
    if coin.denom != config.dnr_denom {
        return Err(ContractError::WrongDenom {
            expected: config.dnr_denom,
            got: coin.denom,
        });
    }
    liquidate_inner(
        deps,
        env,
        info.sender,
        collateral_key,
        coin.denom,
        coin.amount,
        borrower,
        true,
    )
}

#[allow(clippy::too_many_arguments)]
fn liquidate_inner(
    mut deps: DepsMut,
    env: Env,
    liquidator: Addr,
    collateral_key: String,
    loan_key: String,
    amount: Uint128,
    borrower: String,
    is_dnr: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if collateral_key == config.dnr_denom {
        return Err(ContractError::CanNotUseDnr);
    }

    let borrower = deps.api.addr_validate(&borrower)?;
    if liquidator == borrower {
        return Err(ContractError::LiquidatorIsBorrower);
    }

    load_market(deps.storage, &collateral_key)?;
    load_market(deps.storage, &loan_key)?;
    accrue(deps.storage, &env, &collateral_key)?;
    accrue(deps.storage, &env, &loan_key)?;

    if !ACCOUNTS.has(deps.storage, (collateral_key.as_str(), &borrower)) {
        return Err(ContractError::AccountCollateralDoesNotExist);
    }
    if !ACCOUNTS.has(deps.storage, (loan_key.as_str(), &borrower)) {
        return Err(ContractError::AccountLoanDoesNotExist);
    }

    if is_user_solvent(
        deps.branch(),
        &env,
        &borrower,
        &collateral_key,
        Uint128::zero(),
        Uint128::zero(),
    )? {
        return Err(ContractError::UserIsSolvent);
    }

    // ---- Loan side: retire borrower debt with the sent funds ----
    let mut loan_market = load_market(deps.storage, &loan_key)?;
    let mut borrower_loan = load_account(deps.storage, &loan_key, &borrower)?;

    let debt = loan_market
        .loan_rebase
        .to_elastic(borrower_loan.principal, true)?;
    let repay = amount.min(debt);
    if repay.is_zero() {
        return Err(ContractError::ZeroLiquidationAmount);
    }
    let refund = amount.checked_sub(repay)?;

    if !is_dnr {
        loan_market.cash = loan_market.cash.checked_add(repay)?;
    }

    let base_repay = loan_market.loan_rebase.to_base(repay, true)?;
    let mut reward_pending = pending(
        borrower_loan.principal,
        loan_market.accrued_loan_rewards_per_share,
        loan_market.decimals_factor,
        borrower_loan.loan_rewards_paid,
    )?;
    borrower_loan.principal = borrower_loan
        .principal
        .checked_sub(base_repay.min(borrower_loan.principal))?;
    borrower_loan.loan_rewards_paid = accumulated(
        borrower_loan.principal,
        loan_market.accrued_loan_rewards_per_share,
        loan_market.decimals_factor,
    )?;
    loan_market.loan_rebase.sub_base(base_repay, false)?;

    MARKETS.save(deps.storage, &loan_key, &loan_market)?;
    ACCOUNTS.save(deps.storage, (loan_key.as_str(), &borrower), &borrower_loan)?;

    // ---- Collateral side: move shares to the liquidator ----
    let collateral_price = query_price(&deps.querier, &env, &config, &collateral_key)?;
    let seize = if is_dnr {
        fdiv(repay, collateral_price)?
    } else {
        let loan_price = query_price(&deps.querier, &env, &config, &loan_key)?;
        fdiv(fmul(loan_price, repay)?, collateral_price)?
    };

    let liquidation = LIQUIDATIONS.load(deps.storage, &collateral_key)?;
    let penalty_amount = fmul(seize, liquidation.penalty_fee)?;
    let seize_total = seize.checked_add(penalty_amount)?;
    let protocol_amount = fmul(penalty_amount, liquidation.protocol_percentage)?;
    let liquidator_amount = seize_total.checked_sub(protocol_amount)?;

    let mut collateral_market = load_market(deps.storage, &collateral_key)?;
    let mut borrower_collateral = load_account(deps.storage, &collateral_key, &borrower)?;
    let mut liquidator_account = load_account(deps.storage, &collateral_key, &liquidator)?;

    reward_pending = reward_pending.checked_add(pending(
        borrower_collateral.shares,
        collateral_market.accrued_collateral_rewards_per_share,
        collateral_market.decimals_factor,
        borrower_collateral.collateral_rewards_paid,
    )?)?;

    let seized_base = collateral_market
        .collateral_rebase
        .to_base(seize_total, true)?;
    borrower_collateral.shares = borrower_collateral
        .shares
        .checked_sub(seized_base.min(borrower_collateral.shares))?;
    borrower_collateral.collateral_rewards_paid = accumulated(
        borrower_collateral.shares,
        collateral_market.accrued_collateral_rewards_per_share,
        collateral_market.decimals_factor,
    )?;

    liquidator_account.shares = liquidator_account.shares.checked_add(
        collateral_market
            .collateral_rebase
            .to_base(liquidator_amount, false)?,
    )?;
    liquidator_account.collateral_rewards_paid = accumulated(
        liquidator_account.shares,
        collateral_market.accrued_collateral_rewards_per_share,
        collateral_market.decimals_factor,
    )?;

    collateral_market.total_reserves = collateral_market
        .total_reserves
        .checked_add(protocol_amount)?;

    MARKETS.save(deps.storage, &collateral_key, &collateral_market)?;
    ACCOUNTS.save(
        deps.storage,
        (collateral_key.as_str(), &borrower),
        &borrower_collateral,
    )?;
    ACCOUNTS.save(
        deps.storage,
        (collateral_key.as_str(), &liquidator),
        &liquidator_account,
    )?;

    let mut response = Response::new()
        .add_attribute("action", if is_dnr { "liquidate_dnr" } else { "liquidate" })
        .add_attribute("liquidator", liquidator.as_str())
        .add_attribute("borrower", borrower.as_str())
        .add_attribute("collateral_key", collateral_key)
        .add_attribute("loan_key", loan_key.clone())
        .add_attribute("repay", repay)
        .add_attribute("seized", seize_total)
        .add_attribute("protocol_cut", protocol_amount)
        .add_attribute("rewards", reward_pending);

    if is_dnr {
        response = response.add_message(BankMsg::Burn {
            amount: vec![Coin {
                denom: loan_key.clone(),
                amount: repay,
            }],
        });
    }
    if !refund.is_zero() {
        response = response.add_message(BankMsg::Send {
            to_address: liquidator.to_string(),
            amount: vec![Coin {
                denom: loan_key,
                amount: refund,
            }],
        });
    }
    // Rewards forfeited during liquidation are credited to the borrower
    if let Some(msg) = mint_msg(
        &config.token_issuer,
        &config.ipx_denom,
        &borrower,
        reward_pending,
    )? {
        response = response.add_message(msg);
    }

    Ok(response)
}
