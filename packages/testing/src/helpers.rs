use cosmwasm_std::{Coin, Uint128};
use whirpool_types::CreateMarketParams;

/// Default test actors
pub const ADMIN: &str = "admin";
pub const USER1: &str = "user1";
pub const USER2: &str = "user2";
pub const LIQUIDATOR: &str = "liquidator";

/// Default test denoms
pub const COLLATERAL_DENOM: &str = "uatom";
pub const DEBT_DENOM: &str = "uusdc";
pub const IPX_DENOM: &str = "ipx";
pub const DNR_DENOM: &str = "dnr";

/// Fixed-point helpers at the protocol's 1e9 scale.
pub fn mantissa_percent(percent: u64) -> Uint128 {
    Uint128::new(percent as u128 * 10_000_000)
}

/// Create market params for testing: 75% LTV, 1% penalty, 1% protocol cut.
pub fn default_market_params(market_key: &str) -> CreateMarketParams {
    CreateMarketParams {
        market_key: market_key.to_string(),
        borrow_cap: Uint128::new(1_000_000_000_000),
        collateral_cap: Uint128::new(1_000_000_000_000),
        ltv: mantissa_percent(75),
        allocation_points: Uint128::zero(),
        penalty_fee: Uint128::new(10_000_000),
        protocol_percentage: Uint128::new(10_000_000),
        decimals: 9,
    }
}

/// Create market params with a custom LTV (whole percent).
pub fn market_params_with_ltv(market_key: &str, ltv: u64) -> CreateMarketParams {
    CreateMarketParams {
        ltv: mantissa_percent(ltv),
        ..default_market_params(market_key)
    }
}

/// Create coins for testing.
pub fn coins(amount: u128, denom: &str) -> Vec<Coin> {
    vec![coin(amount, denom)]
}

/// Create a single coin for testing.
pub fn coin(amount: u128, denom: &str) -> Coin {
    Coin {
        denom: denom.to_string(),
        amount: Uint128::new(amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mantissa_percent() {
        assert_eq!(mantissa_percent(100), Uint128::new(1_000_000_000));
        assert_eq!(mantissa_percent(75), Uint128::new(750_000_000));
        assert_eq!(mantissa_percent(0), Uint128::zero());
    }

    #[test]
    fn test_default_market_params() {
        let params = default_market_params(COLLATERAL_DENOM);
        assert_eq!(params.market_key, "uatom");
        assert_eq!(params.ltv, Uint128::new(750_000_000));
        assert_eq!(params.decimals, 9);
    }

    #[test]
    fn test_market_params_with_ltv() {
        let params = market_params_with_ltv(DEBT_DENOM, 50);
        assert_eq!(params.ltv, Uint128::new(500_000_000));
    }

    #[test]
    fn test_coins_helper() {
        let c = coins(1000, "uatom");
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].amount, Uint128::new(1000));
        assert_eq!(c[0].denom, "uatom");
    }
}
