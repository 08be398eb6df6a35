use cosmwasm_std::{DepsMut, Env, QuerierWrapper, Uint128};
use whirpool_types::{fmul, mul_div, Account, Config, MarketData, OracleQueryMsg, PriceResponse, MANTISSA};

use crate::error::ContractError;
use crate::interest::accrue;
use crate::state::{load_account, load_market, CONFIG, MARKETS_IN};

/// Query the oracle for a market key and normalize the price to MANTISSA
/// scale. DNR is pinned to 1.0 and never hits the oracle. Rejects zero,
/// stale, and future-dated prices.
pub fn query_price(
    querier: &QuerierWrapper,
    env: &Env,
    config: &Config,
    market_key: &str,
) -> Result<Uint128, ContractError> {
    if market_key == config.dnr_denom {
        return Ok(MANTISSA);
    }

    let response: PriceResponse = querier
        .query_wasm_smart(
            config.oracle.as_str(),
            &OracleQueryMsg::Price {
                market_key: market_key.to_string(),
            },
        )
        .map_err(|e| ContractError::OracleError {
            market_key: market_key.to_string(),
            reason: e.to_string(),
        })?;

    let current_time = env.block.time.seconds();
    if response.updated_at > current_time {
        return Err(ContractError::PriceFromFuture {
            market_key: market_key.to_string(),
            updated_at: response.updated_at,
            current: current_time,
        });
    }
    let age_seconds = current_time - response.updated_at;
    if age_seconds > config.max_price_age_secs {
        return Err(ContractError::PriceStale {
            market_key: market_key.to_string(),
            age_seconds,
            max_age: config.max_price_age_secs,
        });
    }
    if response.price.is_zero() {
        return Err(ContractError::ZeroOraclePrice {
            market_key: market_key.to_string(),
        });
    }

    let decimals_factor = Uint128::new(10u128.pow(response.decimals as u32));
    Ok(mul_div(response.price, MANTISSA, decimals_factor, false)?)
}

/// A user's MANTISSA-normalized position values in one market:
/// (LTV-weighted collateral value, debt value). The hypothetical deltas are
/// applied before pricing.
pub fn position_values(
    market: &MarketData,
    account: &Account,
    price: Uint128,
    withdraw_coin_value: Uint128,
    borrow_coin_value: Uint128,
) -> Result<(Uint128, Uint128), ContractError> {
    let collateral_balance = market
        .collateral_rebase
        .to_elastic(account.shares, false)?
        .checked_sub(withdraw_coin_value)?;
    let loan_balance = market
        .loan_rebase
        .to_elastic(account.principal, true)?
        .checked_add(borrow_coin_value)?;

    let collateral_value = fmul(fmul(collateral_balance, price)?, market.ltv)?;
    let loan_value = fmul(loan_balance, price)?;
    Ok((collateral_value, loan_value))
}

/// Sum a user's LTV-weighted collateral value and debt value across every
/// entered market, accruing each market first. The deltas apply to
/// `modified_key` only.
pub fn solvency_values(
    deps: DepsMut,
    env: &Env,
    user: &cosmwasm_std::Addr,
    modified_key: &str,
    withdraw_coin_value: Uint128,
    borrow_coin_value: Uint128,
) -> Result<(Uint128, Uint128), ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let markets_in = MARKETS_IN.may_load(deps.storage, user)?.unwrap_or_default();

    let mut total_collateral_value = Uint128::zero();
    let mut total_loan_value = Uint128::zero();

    for market_key in markets_in {
        accrue(deps.storage, env, &market_key)?;
        let market = load_market(deps.storage, &market_key)?;
        let account = load_account(deps.storage, &market_key, user)?;

        let (withdraw, borrow) = if market_key == modified_key {
            (withdraw_coin_value, borrow_coin_value)
        } else {
            (Uint128::zero(), Uint128::zero())
        };

        let price = query_price(&deps.querier, env, &config, &market_key)?;
        let (collateral_value, loan_value) =
            position_values(&market, &account, price, withdraw, borrow)?;

        total_collateral_value = total_collateral_value.checked_add(collateral_value)?;
        total_loan_value = total_loan_value.checked_add(loan_value)?;
    }

    Ok((total_collateral_value, total_loan_value))
}

/// Whether a user's portfolio stays solvent after the hypothetical change.
/// A portfolio with no debt is always solvent; otherwise solvency is
/// strict: equal collateral and debt value is insolvent.
pub fn is_user_solvent(
    deps: DepsMut,
    env: &Env,
    user: &cosmwasm_std::Addr,
    modified_key: &str,
    withdraw_coin_value: Uint128,
    borrow_coin_value: Uint128,
) -> Result<bool, ContractError> {
    let (collateral_value, loan_value) = solvency_values(
        deps,
        env,
        user,
        modified_key,
        withdraw_coin_value,
        borrow_coin_value,
    )?;
    Ok(loan_value.is_zero() || collateral_value > loan_value)
}
