use cosmwasm_std::{
    Addr, BankMsg, Coin, DepsMut, Env, MessageInfo, Response, Storage, Uint128,
};
use whirpool_types::{CreateMarketParams, InterestRateModel, Liquidation, MarketData, MANTISSA};

use crate::error::ContractError;
use crate::interest::accrue;
use crate::state::{
    load_market, CONFIG, INTEREST_RATE_MODELS, LIQUIDATIONS, MARKETS, MARKET_KEYS, PARAMS,
};

/// Ceiling for the penalty fee, the protocol's penalty cut, and the
/// reserve factor: 2.5% at MANTISSA scale.
pub const MAX_FEE_RATE: Uint128 = Uint128::new(25_000_000);

/// Reserve factor applied to newly created markets: 20%.
pub const INITIAL_RESERVE_FACTOR: Uint128 = Uint128::new(200_000_000);

fn assert_admin(storage: &dyn Storage, sender: &Addr) -> Result<(), ContractError> {
    let config = CONFIG.load(storage)?;
    if sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// Admit a new market. Interest rate data is set separately with
/// `SetInterestRateData` before the first accrual with open loans.
pub fn execute_create_market(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: CreateMarketParams,
) -> Result<Response, ContractError> {
    assert_admin(deps.storage, &info.sender)?;

    if params.penalty_fee > MAX_FEE_RATE || params.protocol_percentage > MAX_FEE_RATE {
        return Err(ContractError::ValueTooHigh);
    }
    if params.ltv >= MANTISSA {
        return Err(ContractError::ValueTooHigh);
    }
    if MARKETS.has(deps.storage, &params.market_key) {
        return Err(ContractError::MarketAlreadyExists {
            market_key: params.market_key,
        });
    }

    let market = MarketData::new(
        env.block.height,
        params.borrow_cap,
        params.collateral_cap,
        params.ltv,
        INITIAL_RESERVE_FACTOR,
        params.allocation_points,
        params.decimals,
    );
    MARKETS.save(deps.storage, &params.market_key, &market)?;
    LIQUIDATIONS.save(
        deps.storage,
        &params.market_key,
        &Liquidation {
            penalty_fee: params.penalty_fee,
            protocol_percentage: params.protocol_percentage,
        },
    )?;

    let mut market_keys = MARKET_KEYS.may_load(deps.storage)?.unwrap_or_default();
    market_keys.push(params.market_key.clone());
    MARKET_KEYS.save(deps.storage, &market_keys)?;

    let mut pool_params = PARAMS.load(deps.storage)?;
    pool_params.total_allocation_points = pool_params
        .total_allocation_points
        .checked_add(params.allocation_points)?;
    PARAMS.save(deps.storage, &pool_params)?;

    Ok(Response::new()
        .add_attribute("action", "create_market")
        .add_attribute("market_key", params.market_key)
        .add_attribute("borrow_cap", params.borrow_cap)
        .add_attribute("collateral_cap", params.collateral_cap)
        .add_attribute("ltv", params.ltv)
        .add_attribute("allocation_points", params.allocation_points)
        .add_attribute(
            "total_allocation_points",
            pool_params.total_allocation_points,
        ))
}

pub fn execute_set_pause(
    deps: DepsMut,
    info: MessageInfo,
    market_key: String,
    paused: bool,
) -> Result<Response, ContractError> {
    assert_admin(deps.storage, &info.sender)?;
    let mut market = load_market(deps.storage, &market_key)?;
    market.is_paused = paused;
    MARKETS.save(deps.storage, &market_key, &market)?;

    Ok(Response::new()
        .add_attribute("action", if paused { "pause_market" } else { "unpause_market" })
        .add_attribute("market_key", market_key))
}

pub fn execute_set_borrow_cap(
    deps: DepsMut,
    info: MessageInfo,
    market_key: String,
    cap: Uint128,
) -> Result<Response, ContractError> {
    assert_admin(deps.storage, &info.sender)?;
    let mut market = load_market(deps.storage, &market_key)?;
    market.borrow_cap = cap;
    MARKETS.save(deps.storage, &market_key, &market)?;

    Ok(Response::new()
        .add_attribute("action", "set_borrow_cap")
        .add_attribute("market_key", market_key)
        .add_attribute("cap", cap))
}

pub fn execute_set_collateral_cap(
    deps: DepsMut,
    info: MessageInfo,
    market_key: String,
    cap: Uint128,
) -> Result<Response, ContractError> {
    assert_admin(deps.storage, &info.sender)?;
    let mut market = load_market(deps.storage, &market_key)?;
    market.collateral_cap = cap;
    MARKETS.save(deps.storage, &market_key, &market)?;

    Ok(Response::new()
        .add_attribute("action", "set_collateral_cap")
        .add_attribute("market_key", market_key)
        .add_attribute("cap", cap))
}

pub fn execute_update_liquidation(
    deps: DepsMut,
    info: MessageInfo,
    market_key: String,
    penalty_fee: Uint128,
    protocol_percentage: Uint128,
) -> Result<Response, ContractError> {
    assert_admin(deps.storage, &info.sender)?;
    if penalty_fee > MAX_FEE_RATE || protocol_percentage > MAX_FEE_RATE {
        return Err(ContractError::ValueTooHigh);
    }
    if !MARKETS.has(deps.storage, &market_key) {
        return Err(ContractError::MarketNotFound { market_key });
    }
    LIQUIDATIONS.save(
        deps.storage,
        &market_key,
        &Liquidation {
            penalty_fee,
            protocol_percentage,
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "update_liquidation")
        .add_attribute("market_key", market_key)
        .add_attribute("penalty_fee", penalty_fee)
        .add_attribute("protocol_percentage", protocol_percentage))
}

pub fn execute_update_reserve_factor(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    market_key: String,
    reserve_factor: Uint128,
) -> Result<Response, ContractError> {
    assert_admin(deps.storage, &info.sender)?;
    if reserve_factor > MAX_FEE_RATE {
        return Err(ContractError::ValueTooHigh);
    }
    // The elapsed interval must settle under the old factor first
    accrue(deps.storage, &env, &market_key)?;
    let mut market = load_market(deps.storage, &market_key)?;
    market.reserve_factor = reserve_factor;
    MARKETS.save(deps.storage, &market_key, &market)?;

    Ok(Response::new()
        .add_attribute("action", "update_reserve_factor")
        .add_attribute("market_key", market_key)
        .add_attribute("reserve_factor", reserve_factor))
}

pub fn execute_update_ltv(
    deps: DepsMut,
    info: MessageInfo,
    market_key: String,
    ltv: Uint128,
) -> Result<Response, ContractError> {
    assert_admin(deps.storage, &info.sender)?;
    if ltv >= MANTISSA {
        return Err(ContractError::ValueTooHigh);
    }
    let mut market = load_market(deps.storage, &market_key)?;
    market.ltv = ltv;
    MARKETS.save(deps.storage, &market_key, &market)?;

    Ok(Response::new()
        .add_attribute("action", "update_ltv")
        .add_attribute("market_key", market_key)
        .add_attribute("ltv", ltv))
}

pub fn execute_update_allocation_points(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    market_key: String,
    allocation_points: Uint128,
) -> Result<Response, ContractError> {
    assert_admin(deps.storage, &info.sender)?;
    // Emission up to now is owed at the old weight
    accrue(deps.storage, &env, &market_key)?;

    let mut market = load_market(deps.storage, &market_key)?;
    let mut pool_params = PARAMS.load(deps.storage)?;
    pool_params.total_allocation_points = pool_params
        .total_allocation_points
        .checked_sub(market.allocation_points)?
        .checked_add(allocation_points)?;
    market.allocation_points = allocation_points;

    MARKETS.save(deps.storage, &market_key, &market)?;
    PARAMS.save(deps.storage, &pool_params)?;

    Ok(Response::new()
        .add_attribute("action", "update_allocation_points")
        .add_attribute("market_key", market_key)
        .add_attribute("allocation_points", allocation_points)
        .add_attribute(
            "total_allocation_points",
            pool_params.total_allocation_points,
        ))
}

/// Change the pool-wide emission. Every market settles its share of the
/// old emission first.
pub fn execute_update_ipx_per_block(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    ipx_per_block: Uint128,
) -> Result<Response, ContractError> {
    assert_admin(deps.storage, &info.sender)?;

    let market_keys = MARKET_KEYS.may_load(deps.storage)?.unwrap_or_default();
    for market_key in &market_keys {
        accrue(deps.storage, &env, market_key)?;
    }

    let mut pool_params = PARAMS.load(deps.storage)?;
    pool_params.ipx_per_block = ipx_per_block;
    PARAMS.save(deps.storage, &pool_params)?;

    Ok(Response::new()
        .add_attribute("action", "update_ipx_per_block")
        .add_attribute("ipx_per_block", ipx_per_block))
}

pub fn execute_update_dnr_interest_rate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    rate_per_block: Uint128,
) -> Result<Response, ContractError> {
    assert_admin(deps.storage, &info.sender)?;
    let config = CONFIG.load(deps.storage)?;

    // Settle the DNR market under the old rate, if it exists yet
    if MARKETS.has(deps.storage, &config.dnr_denom) {
        accrue(deps.storage, &env, &config.dnr_denom)?;
    }

    let mut pool_params = PARAMS.load(deps.storage)?;
    pool_params.dnr_interest_rate_per_block = rate_per_block;
    PARAMS.save(deps.storage, &pool_params)?;

    Ok(Response::new()
        .add_attribute("action", "update_dnr_interest_rate")
        .add_attribute("rate_per_block", rate_per_block))
}

/// Install or replace a market's interest rate curve. Annual rates are
/// scaled down to per-block at admission.
pub fn execute_set_interest_rate_data(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    market_key: String,
    base_rate_per_year: Uint128,
    multiplier_per_year: Uint128,
    jump_multiplier_per_year: Uint128,
    kink: Uint128,
) -> Result<Response, ContractError> {
    assert_admin(deps.storage, &info.sender)?;
    let config = CONFIG.load(deps.storage)?;
    if market_key == config.dnr_denom {
        return Err(ContractError::DnrOperationNotAllowed);
    }
    if !MARKETS.has(deps.storage, &market_key) {
        return Err(ContractError::MarketNotFound { market_key });
    }

    let model = InterestRateModel::from_yearly(
        base_rate_per_year,
        multiplier_per_year,
        jump_multiplier_per_year,
        kink,
    );
    if !model.validate() {
        return Err(whirpool_types::ContractError::InvalidInterestRateModel.into());
    }

    // Any open interval settles under the previous curve
    if INTEREST_RATE_MODELS.has(deps.storage, &market_key) {
        accrue(deps.storage, &env, &market_key)?;
    }
    INTEREST_RATE_MODELS.save(deps.storage, &market_key, &model)?;

    Ok(Response::new()
        .add_attribute("action", "set_interest_rate_data")
        .add_attribute("market_key", market_key)
        .add_attribute("base_rate_per_block", model.base_rate_per_block)
        .add_attribute("multiplier_per_block", model.multiplier_per_block)
        .add_attribute("jump_multiplier_per_block", model.jump_multiplier_per_block)
        .add_attribute("kink", model.kink))
}

/// Withdraw accumulated reserves to the admin.
pub fn execute_withdraw_reserves(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    market_key: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    assert_admin(deps.storage, &info.sender)?;
    accrue(deps.storage, &env, &market_key)?;
    let mut market = load_market(deps.storage, &market_key)?;

    if market.cash < amount {
        return Err(ContractError::NotEnoughCashToWithdraw {
            available: market.cash.to_string(),
            requested: amount.to_string(),
        });
    }
    if market.total_reserves < amount {
        return Err(ContractError::NotEnoughReserves {
            held: market.total_reserves.to_string(),
            requested: amount.to_string(),
        });
    }

    market.cash = market.cash.checked_sub(amount)?;
    market.total_reserves = market.total_reserves.checked_sub(amount)?;
    MARKETS.save(deps.storage, &market_key, &market)?;

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![Coin {
                denom: market_key.clone(),
                amount,
            }],
        })
        .add_attribute("action", "withdraw_reserves")
        .add_attribute("market_key", market_key)
        .add_attribute("amount", amount))
}

/// Hand the admin authority to a new address.
pub fn execute_transfer_admin(
    deps: DepsMut,
    info: MessageInfo,
    new_admin: String,
) -> Result<Response, ContractError> {
    assert_admin(deps.storage, &info.sender)?;
    if new_admin.trim().is_empty() {
        return Err(ContractError::NoZeroAddress);
    }
    let new_admin = deps.api.addr_validate(&new_admin)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.admin = new_admin.clone();
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "transfer_admin")
        .add_attribute("new_admin", new_admin))
}
