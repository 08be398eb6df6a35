use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
    Uint128,
};
use cw_storage_plus::Map;
use whirpool_types::{OracleQueryMsg, PriceResponse};

#[cw_serde]
pub struct StoredPrice {
    pub price: Uint128,
    pub decimals: u8,
}

pub const PRICES: Map<&str, StoredPrice> = Map::new("prices");

#[cw_serde]
pub struct InstantiateMsg {
    pub prices: Vec<PriceInit>,
}

#[cw_serde]
pub struct PriceInit {
    pub market_key: String,
    pub price: Uint128,
    pub decimals: u8,
}

#[cw_serde]
pub enum ExecuteMsg {
    SetPrice {
        market_key: String,
        price: Uint128,
        decimals: u8,
    },
}

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> StdResult<Response> {
    for init in msg.prices {
        PRICES.save(
            deps.storage,
            &init.market_key,
            &StoredPrice {
                price: init.price,
                decimals: init.decimals,
            },
        )?;
    }
    Ok(Response::new().add_attribute("action", "instantiate_mock_oracle"))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: ExecuteMsg,
) -> StdResult<Response> {
    match msg {
        ExecuteMsg::SetPrice {
            market_key,
            price,
            decimals,
        } => {
            PRICES.save(deps.storage, &market_key, &StoredPrice { price, decimals })?;
            Ok(Response::new()
                .add_attribute("action", "set_price")
                .add_attribute("market_key", market_key)
                .add_attribute("price", price))
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: OracleQueryMsg) -> StdResult<Binary> {
    match msg {
        OracleQueryMsg::Price { market_key } => {
            let stored = PRICES.load(deps.storage, &market_key)?;
            to_json_binary(&PriceResponse {
                market_key,
                price: stored.price,
                decimals: stored.decimals,
                updated_at: env.block.time.seconds(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi};
    use cosmwasm_std::from_json;

    #[test]
    fn test_set_and_query_price() {
        let mut deps = mock_dependencies();
        let admin = MockApi::default().addr_make("admin");
        let info = message_info(&admin, &[]);

        instantiate(
            deps.as_mut(),
            mock_env(),
            info.clone(),
            InstantiateMsg {
                prices: vec![PriceInit {
                    market_key: "uatom".to_string(),
                    price: Uint128::new(2_000_000_000),
                    decimals: 9,
                }],
            },
        )
        .unwrap();

        let res = query(
            deps.as_ref(),
            mock_env(),
            OracleQueryMsg::Price {
                market_key: "uatom".to_string(),
            },
        )
        .unwrap();
        let price: PriceResponse = from_json(res).unwrap();
        assert_eq!(price.price, Uint128::new(2_000_000_000));
        assert_eq!(price.decimals, 9);

        execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::SetPrice {
                market_key: "uatom".to_string(),
                price: Uint128::new(1_000_000),
                decimals: 6,
            },
        )
        .unwrap();

        let res = query(
            deps.as_ref(),
            mock_env(),
            OracleQueryMsg::Price {
                market_key: "uatom".to_string(),
            },
        )
        .unwrap();
        let price: PriceResponse = from_json(res).unwrap();
        assert_eq!(price.price, Uint128::new(1_000_000));
        assert_eq!(price.decimals, 6);
    }
}
