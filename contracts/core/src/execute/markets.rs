use cosmwasm_std::{DepsMut, Env, MessageInfo, Response, Uint128};

use crate::error::ContractError;
use crate::health::is_user_solvent;
use crate::state::{insert_market_in, load_account, CONFIG, MARKETS, MARKETS_IN};

/// Opt a market's collateral into the caller's solvency portfolio.
pub fn execute_enter_market(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    market_key: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if market_key == config.dnr_denom {
        return Err(ContractError::CanNotUseDnr);
    }
    if !MARKETS.has(deps.storage, &market_key) {
        return Err(ContractError::MarketNotFound { market_key });
    }

    insert_market_in(deps.storage, &info.sender, &market_key)?;

    Ok(Response::new()
        .add_attribute("action", "enter_market")
        .add_attribute("user", info.sender.as_str())
        .add_attribute("market_key", market_key))
}

/// Opt out of a market. Requires no open loan there, and the remaining
/// portfolio must still be solvent.
pub fn execute_exit_market(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    market_key: String,
) -> Result<Response, ContractError> {
    if !MARKETS.has(deps.storage, &market_key) {
        return Err(ContractError::MarketNotFound { market_key });
    }

    let account = load_account(deps.storage, &market_key, &info.sender)?;
    if !account.principal.is_zero() {
        return Err(ContractError::MarketExitLoanOpen);
    }

    let mut markets_in = MARKETS_IN
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    markets_in.retain(|key| key != &market_key);
    MARKETS_IN.save(deps.storage, &info.sender, &markets_in)?;

    // The rest of the portfolio must carry any remaining debt on its own
    if !is_user_solvent(
        deps.branch(),
        &env,
        &info.sender,
        &market_key,
        Uint128::zero(),
        Uint128::zero(),
    )? {
        return Err(ContractError::UserIsInsolvent);
    }

    Ok(Response::new()
        .add_attribute("action", "exit_market")
        .add_attribute("user", info.sender.as_str())
        .add_attribute("market_key", market_key))
}
