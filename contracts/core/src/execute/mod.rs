mod admin;
mod borrow;
mod deposit;
mod dnr;
mod liquidate;
mod markets;
mod repay;
mod rewards;
mod withdraw;

pub use admin::*;
pub use borrow::*;
pub use deposit::*;
pub use dnr::*;
pub use liquidate::*;
pub use markets::*;
pub use repay::*;
pub use rewards::*;
pub use withdraw::*;

use cosmwasm_std::{to_json_binary, Coin, CosmosMsg, MessageInfo, Uint128, WasmMsg};
use whirpool_types::IssuerExecuteMsg;

use crate::error::ContractError;

/// Extract the single coin an action must be funded with.
pub fn one_coin(info: &MessageInfo) -> Result<Coin, ContractError> {
    match info.funds.len() {
        0 => Err(ContractError::NoFundsSent),
        1 => {
            let coin = info.funds[0].clone();
            if coin.amount.is_zero() {
                return Err(ContractError::ZeroAmount);
            }
            Ok(coin)
        }
        _ => Err(ContractError::MultipleDenoms),
    }
}

/// Build a mint message against the token issuer. `None` when there is
/// nothing to mint.
pub fn mint_msg(
    issuer: &cosmwasm_std::Addr,
    denom: &str,
    recipient: &cosmwasm_std::Addr,
    amount: Uint128,
) -> Result<Option<CosmosMsg>, ContractError> {
    if amount.is_zero() {
        return Ok(None);
    }
    Ok(Some(
        WasmMsg::Execute {
            contract_addr: issuer.to_string(),
            msg: to_json_binary(&IssuerExecuteMsg::Mint {
                denom: denom.to_string(),
                recipient: recipient.to_string(),
                amount,
            })?,
            funds: vec![],
        }
        .into(),
    ))
}
