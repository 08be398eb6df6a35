use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, Uint128,
};
use whirpool_types::{Config, PoolExecuteMsg, PoolInstantiateMsg, PoolParams, PoolQueryMsg};

use crate::error::ContractError;
use crate::execute;
use crate::query;
use crate::state::{CONFIG, CONTRACT_NAME, CONTRACT_VERSION, PARAMS};

/// Emission applied when the instantiate message leaves it unset.
pub const DEFAULT_IPX_PER_BLOCK: Uint128 = Uint128::new(10_000_000_000_000);

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: PoolInstantiateMsg,
) -> Result<Response, ContractError> {
    cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = match msg.admin {
        Some(admin) => deps.api.addr_validate(&admin)?,
        None => info.sender.clone(),
    };
    let config = Config {
        admin,
        oracle: deps.api.addr_validate(&msg.oracle)?,
        token_issuer: deps.api.addr_validate(&msg.token_issuer)?,
        ipx_denom: msg.ipx_denom,
        dnr_denom: msg.dnr_denom,
        max_price_age_secs: msg.max_price_age_secs,
    };
    let params = PoolParams {
        ipx_per_block: msg.ipx_per_block.unwrap_or(DEFAULT_IPX_PER_BLOCK),
        total_allocation_points: Uint128::zero(),
        dnr_interest_rate_per_block: msg.dnr_interest_rate_per_block,
    };

    CONFIG.save(deps.storage, &config)?;
    PARAMS.save(deps.storage, &params)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("oracle", config.oracle)
        .add_attribute("token_issuer", config.token_issuer)
        .add_attribute("ipx_denom", config.ipx_denom)
        .add_attribute("dnr_denom", config.dnr_denom))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: PoolExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        PoolExecuteMsg::Deposit {} => execute::execute_deposit(deps, env, info),
        PoolExecuteMsg::Withdraw { market_key, shares } => {
            execute::execute_withdraw(deps, env, info, market_key, shares)
        }
        PoolExecuteMsg::Borrow { market_key, amount } => {
            execute::execute_borrow(deps, env, info, market_key, amount)
        }
        PoolExecuteMsg::Repay { principal_to_repay } => {
            execute::execute_repay(deps, env, info, principal_to_repay)
        }
        PoolExecuteMsg::EnterMarket { market_key } => {
            execute::execute_enter_market(deps, env, info, market_key)
        }
        PoolExecuteMsg::ExitMarket { market_key } => {
            execute::execute_exit_market(deps, env, info, market_key)
        }
        PoolExecuteMsg::ClaimRewards { market_key } => {
            execute::execute_claim_rewards(deps, env, info, market_key)
        }
        PoolExecuteMsg::ClaimAllRewards {} => {
            execute::execute_claim_all_rewards(deps, env, info)
        }
        PoolExecuteMsg::BorrowDnr { amount } => {
            execute::execute_borrow_dnr(deps, env, info, amount)
        }
        PoolExecuteMsg::RepayDnr { principal_to_repay } => {
            execute::execute_repay_dnr(deps, env, info, principal_to_repay)
        }
        PoolExecuteMsg::Liquidate {
            collateral_key,
            borrower,
        } => execute::execute_liquidate(deps, env, info, collateral_key, borrower),
        PoolExecuteMsg::LiquidateDnr {
            collateral_key,
            borrower,
        } => execute::execute_liquidate_dnr(deps, env, info, collateral_key, borrower),
        PoolExecuteMsg::CreateMarket { params } => {
            execute::execute_create_market(deps, env, info, params)
        }
        PoolExecuteMsg::PauseMarket { market_key } => {
            execute::execute_set_pause(deps, info, market_key, true)
        }
        PoolExecuteMsg::UnpauseMarket { market_key } => {
            execute::execute_set_pause(deps, info, market_key, false)
        }
        PoolExecuteMsg::SetBorrowCap { market_key, cap } => {
            execute::execute_set_borrow_cap(deps, info, market_key, cap)
        }
        PoolExecuteMsg::SetCollateralCap { market_key, cap } => {
            execute::execute_set_collateral_cap(deps, info, market_key, cap)
        }
        PoolExecuteMsg::UpdateLiquidation {
            market_key,
            penalty_fee,
            protocol_percentage,
        } => execute::execute_update_liquidation(
            deps,
            info,
            market_key,
            penalty_fee,
            protocol_percentage,
        ),
        PoolExecuteMsg::UpdateReserveFactor {
            market_key,
            reserve_factor,
        } => execute::execute_update_reserve_factor(deps, env, info, market_key, reserve_factor),
        PoolExecuteMsg::UpdateLtv { market_key, ltv } => {
            execute::execute_update_ltv(deps, info, market_key, ltv)
        }
        PoolExecuteMsg::UpdateAllocationPoints {
            market_key,
            allocation_points,
        } => execute::execute_update_allocation_points(
            deps,
            env,
            info,
            market_key,
            allocation_points,
        ),
        PoolExecuteMsg::UpdateIpxPerBlock { ipx_per_block } => {
            execute::execute_update_ipx_per_block(deps, env, info, ipx_per_block)
        }
        PoolExecuteMsg::UpdateDnrInterestRate { rate_per_block } => {
            execute::execute_update_dnr_interest_rate(deps, env, info, rate_per_block)
        }
        PoolExecuteMsg::SetInterestRateData {
            market_key,
            base_rate_per_year,
            multiplier_per_year,
            jump_multiplier_per_year,
            kink,
        } => execute::execute_set_interest_rate_data(
            deps,
            env,
            info,
            market_key,
            base_rate_per_year,
            multiplier_per_year,
            jump_multiplier_per_year,
            kink,
        ),
        PoolExecuteMsg::WithdrawReserves { market_key, amount } => {
            execute::execute_withdraw_reserves(deps, env, info, market_key, amount)
        }
        PoolExecuteMsg::TransferAdmin { new_admin } => {
            execute::execute_transfer_admin(deps, info, new_admin)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: PoolQueryMsg) -> Result<Binary, ContractError> {
    let result = match msg {
        PoolQueryMsg::Config {} => to_json_binary(&query::config(deps)?)?,
        PoolQueryMsg::Params {} => to_json_binary(&query::params(deps)?)?,
        PoolQueryMsg::Market { market_key } => {
            to_json_binary(&query::market(deps, env, market_key)?)?
        }
        PoolQueryMsg::Markets {} => to_json_binary(&query::markets(deps)?)?,
        PoolQueryMsg::Account { market_key, user } => {
            to_json_binary(&query::account(deps, env, market_key, user)?)?
        }
        PoolQueryMsg::MarketsIn { user } => to_json_binary(&query::markets_in(deps, user)?)?,
        PoolQueryMsg::BorrowRatePerBlock { market_key } => {
            to_json_binary(&query::borrow_rate(deps, market_key)?)?
        }
        PoolQueryMsg::SupplyRatePerBlock { market_key } => {
            to_json_binary(&query::supply_rate(deps, market_key)?)?
        }
        PoolQueryMsg::PendingRewards { market_key, user } => {
            to_json_binary(&query::pending_rewards(deps, env, market_key, user)?)?
        }
        PoolQueryMsg::Solvency { user } => to_json_binary(&query::solvency(deps, env, user)?)?,
    };

    Ok(result)
}
