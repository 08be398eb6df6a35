use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    BankMsg, Binary, Coin, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use whirpool_types::IssuerExecuteMsg;

/// Mock token issuer for cw-multi-test. Instead of minting, it pays out of
/// its own balance, so fund it generously with the reward and stable
/// denoms when building the app.

#[cw_serde]
pub struct MockIssuerInstantiateMsg {}

#[cw_serde]
pub enum MockIssuerQueryMsg {}

pub fn mock_issuer_instantiate(
    _deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: MockIssuerInstantiateMsg,
) -> StdResult<Response> {
    Ok(Response::new().add_attribute("action", "instantiate_mock_issuer"))
}

pub fn mock_issuer_execute(
    _deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: IssuerExecuteMsg,
) -> StdResult<Response> {
    match msg {
        IssuerExecuteMsg::Mint {
            denom,
            recipient,
            amount,
        } => Ok(Response::new()
            .add_message(BankMsg::Send {
                to_address: recipient.clone(),
                amount: vec![Coin { denom, amount }],
            })
            .add_attribute("action", "mint")
            .add_attribute("recipient", recipient)
            .add_attribute("amount", amount)),
    }
}

pub fn mock_issuer_query(_deps: Deps, _env: Env, msg: MockIssuerQueryMsg) -> StdResult<Binary> {
    match msg {}
}

/// Helper to create a mock issuer contract for cw-multi-test.
pub fn mock_issuer_contract() -> cw_multi_test::ContractWrapper<
    IssuerExecuteMsg,
    MockIssuerInstantiateMsg,
    MockIssuerQueryMsg,
    cosmwasm_std::StdError,
    cosmwasm_std::StdError,
    cosmwasm_std::StdError,
> {
    cw_multi_test::ContractWrapper::new(
        mock_issuer_execute,
        mock_issuer_instantiate,
        mock_issuer_query,
    )
}
