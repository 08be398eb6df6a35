use cosmwasm_std::{Addr, Storage};
use cw_storage_plus::{Item, Map};
use whirpool_types::{Account, Config, InterestRateModel, Liquidation, MarketData, PoolParams};

use crate::error::ContractError;

pub const CONTRACT_NAME: &str = "crates.io:whirpool-core";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pool configuration (admin only changes via TransferAdmin)
pub const CONFIG: Item<Config> = Item::new("config");

/// Governance-mutable pool-wide parameters
pub const PARAMS: Item<PoolParams> = Item::new("params");

/// Per-market state
/// Key: market key (denom)
pub const MARKETS: Map<&str, MarketData> = Map::new("markets");

/// Insertion-ordered list of admitted market keys
pub const MARKET_KEYS: Item<Vec<String>> = Item::new("market_keys");

/// Per-market liquidation parameters
pub const LIQUIDATIONS: Map<&str, Liquidation> = Map::new("liquidations");

/// Per-market interest rate curves; the DNR market bypasses this table
pub const INTEREST_RATE_MODELS: Map<&str, InterestRateModel> =
    Map::new("interest_rate_models");

/// User positions
/// Key: (market key, user address)
pub const ACCOUNTS: Map<(&str, &Addr), Account> = Map::new("accounts");

/// Markets a user has entered or borrowed from, insertion-ordered,
/// maintained as a set
pub const MARKETS_IN: Map<&Addr, Vec<String>> = Map::new("markets_in");

/// Load a market or fail with a domain error instead of a raw storage miss.
pub fn load_market(storage: &dyn Storage, market_key: &str) -> Result<MarketData, ContractError> {
    MARKETS
        .may_load(storage, market_key)?
        .ok_or_else(|| ContractError::MarketNotFound {
            market_key: market_key.to_string(),
        })
}

/// Load a user's account in a market, defaulting to an empty position.
pub fn load_account(
    storage: &dyn Storage,
    market_key: &str,
    user: &Addr,
) -> Result<Account, ContractError> {
    Ok(ACCOUNTS
        .may_load(storage, (market_key, user))?
        .unwrap_or_default())
}

/// Register a market in a user's entered set if absent.
pub fn insert_market_in(
    storage: &mut dyn Storage,
    user: &Addr,
    market_key: &str,
) -> Result<(), ContractError> {
    let mut markets_in = MARKETS_IN.may_load(storage, user)?.unwrap_or_default();
    if !markets_in.iter().any(|k| k == market_key) {
        markets_in.push(market_key.to_string());
        MARKETS_IN.save(storage, user, &markets_in)?;
    }
    Ok(())
}
