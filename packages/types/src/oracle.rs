use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;

/// Oracle query interface the pool consumes.
#[cw_serde]
#[derive(QueryResponses)]
pub enum OracleQueryMsg {
    /// Query the price for a market key
    #[returns(PriceResponse)]
    Price { market_key: String },
}

/// Price response from the oracle. `price` carries `decimals` fractional
/// digits; the pool normalizes it to MANTISSA scale before use.
#[cw_serde]
pub struct PriceResponse {
    pub market_key: String,
    pub price: Uint128,
    pub decimals: u8,
    /// Timestamp of the price update
    pub updated_at: u64,
}
