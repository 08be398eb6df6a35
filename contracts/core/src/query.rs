use cosmwasm_std::{Deps, Env, Uint128};
use whirpool_types::{
    AccountResponse, ConfigResponse, MarketKeysResponse, MarketResponse, ParamsResponse,
    PendingRewardsResponse, RateResponse, SolvencyResponse,
};

use crate::error::ContractError;
use crate::health::{position_values, query_price};
use crate::interest::{borrow_rate_per_block, projected_market};
use crate::rewards::pending;
use crate::state::{
    load_account, load_market, CONFIG, INTEREST_RATE_MODELS, MARKETS_IN, MARKET_KEYS, PARAMS,
};

pub fn config(deps: Deps) -> Result<ConfigResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin.to_string(),
        oracle: config.oracle.to_string(),
        token_issuer: config.token_issuer.to_string(),
        ipx_denom: config.ipx_denom,
        dnr_denom: config.dnr_denom,
        max_price_age_secs: config.max_price_age_secs,
    })
}

pub fn params(deps: Deps) -> Result<ParamsResponse, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    Ok(ParamsResponse {
        ipx_per_block: params.ipx_per_block,
        total_allocation_points: params.total_allocation_points,
        dnr_interest_rate_per_block: params.dnr_interest_rate_per_block,
    })
}

/// Market state projected to the current block; nothing is persisted.
pub fn market(deps: Deps, env: Env, market_key: String) -> Result<MarketResponse, ContractError> {
    let market = projected_market(deps.storage, &env, &market_key)?;
    Ok(MarketResponse {
        market_key,
        total_reserves: market.total_reserves,
        accrued_block: market.accrued_block,
        borrow_cap: market.borrow_cap,
        collateral_cap: market.collateral_cap,
        cash: market.cash,
        is_paused: market.is_paused,
        ltv: market.ltv,
        reserve_factor: market.reserve_factor,
        allocation_points: market.allocation_points,
        accrued_collateral_rewards_per_share: market.accrued_collateral_rewards_per_share,
        accrued_loan_rewards_per_share: market.accrued_loan_rewards_per_share,
        collateral_base: market.collateral_rebase.base,
        collateral_elastic: market.collateral_rebase.elastic,
        loan_base: market.loan_rebase.base,
        loan_elastic: market.loan_rebase.elastic,
        decimals_factor: market.decimals_factor,
    })
}

pub fn markets(deps: Deps) -> Result<MarketKeysResponse, ContractError> {
    Ok(MarketKeysResponse {
        market_keys: MARKET_KEYS.may_load(deps.storage)?.unwrap_or_default(),
    })
}

/// A user's shares/principal and their underlying values at the current
/// block.
pub fn account(
    deps: Deps,
    env: Env,
    market_key: String,
    user: String,
) -> Result<AccountResponse, ContractError> {
    let user = deps.api.addr_validate(&user)?;
    let market = projected_market(deps.storage, &env, &market_key)?;
    let account = load_account(deps.storage, &market_key, &user)?;

    Ok(AccountResponse {
        shares: account.shares,
        principal: account.principal,
        collateral_balance: market.collateral_rebase.to_elastic(account.shares, false)?,
        loan_balance: market.loan_rebase.to_elastic(account.principal, true)?,
    })
}

pub fn markets_in(deps: Deps, user: String) -> Result<MarketKeysResponse, ContractError> {
    let user = deps.api.addr_validate(&user)?;
    Ok(MarketKeysResponse {
        market_keys: MARKETS_IN.may_load(deps.storage, &user)?.unwrap_or_default(),
    })
}

pub fn borrow_rate(deps: Deps, market_key: String) -> Result<RateResponse, ContractError> {
    let market = load_market(deps.storage, &market_key)?;
    Ok(RateResponse {
        rate_per_block: borrow_rate_per_block(deps.storage, &market_key, &market)?,
    })
}

pub fn supply_rate(deps: Deps, market_key: String) -> Result<RateResponse, ContractError> {
    let market = load_market(deps.storage, &market_key)?;
    let model = INTEREST_RATE_MODELS.load(deps.storage, &market_key)?;
    Ok(RateResponse {
        rate_per_block: model.supply_rate(
            market.cash,
            market.loan_rebase.elastic,
            market.total_reserves,
            market.reserve_factor,
        )?,
    })
}

/// IPX claimable right now, from a projection of the market at the
/// current block.
pub fn pending_rewards(
    deps: Deps,
    env: Env,
    market_key: String,
    user: String,
) -> Result<PendingRewardsResponse, ContractError> {
    let user = deps.api.addr_validate(&user)?;
    let market = projected_market(deps.storage, &env, &market_key)?;
    let account = load_account(deps.storage, &market_key, &user)?;

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

    Ok(PendingRewardsResponse {
        collateral_rewards,
        loan_rewards,
        total: collateral_rewards.checked_add(loan_rewards)?,
    })
}

/// LTV-weighted collateral value vs debt value across entered markets,
/// projected read-only to the current block.
pub fn solvency(deps: Deps, env: Env, user: String) -> Result<SolvencyResponse, ContractError> {
    let user = deps.api.addr_validate(&user)?;
    let config = CONFIG.load(deps.storage)?;
    let markets_in = MARKETS_IN.may_load(deps.storage, &user)?.unwrap_or_default();

    let mut collateral_value = Uint128::zero();
    let mut loan_value = Uint128::zero();
    for market_key in markets_in {
        let market = projected_market(deps.storage, &env, &market_key)?;
        let account = load_account(deps.storage, &market_key, &user)?;
        let price = query_price(&deps.querier, &env, &config, &market_key)?;
        let (market_collateral, market_loan) = position_values(
            &market,
            &account,
            price,
            Uint128::zero(),
            Uint128::zero(),
        )?;
        collateral_value = collateral_value.checked_add(market_collateral)?;
        loan_value = loan_value.checked_add(market_loan)?;
    }

    Ok(SolvencyResponse {
        collateral_value,
        loan_value,
        is_solvent: loan_value.is_zero() || collateral_value > loan_value,
    })
}
