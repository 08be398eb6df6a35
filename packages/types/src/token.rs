use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

/// Execute interface of the token issuer the pool consumes. The issuer
/// holds mint authority over the IPX and DNR denoms; burning is done by
/// the pool itself via `BankMsg::Burn` on coins it holds.
#[cw_serde]
pub enum IssuerExecuteMsg {
    /// Mint `amount` of `denom` to `recipient`
    Mint {
        denom: String,
        recipient: String,
        amount: Uint128,
    },
}
