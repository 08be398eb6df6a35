use cosmwasm_std::testing::MockApi;
use cosmwasm_std::{Addr, Empty, Uint128};
use cw_multi_test::{App, AppBuilder, BankSudo, Contract, ContractWrapper, Executor, SudoMsg};

use whirpool_core::contract as core_contract;
use whirpool_testing::{
    coin, coins, default_market_params, market_params_with_ltv, mock_issuer_contract,
    MockIssuerInstantiateMsg, COLLATERAL_DENOM, DEBT_DENOM, DNR_DENOM, IPX_DENOM,
};
use whirpool_types::{
    AccountResponse, CreateMarketParams, MarketResponse, PendingRewardsResponse,
    PoolExecuteMsg, PoolInstantiateMsg, PoolQueryMsg, SolvencyResponse,
};

fn core_wrapper() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        core_contract::execute,
        core_contract::instantiate,
        core_contract::query,
    );
    Box::new(contract)
}

fn oracle_wrapper() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        whirpool_mock_oracle::execute,
        whirpool_mock_oracle::instantiate,
        whirpool_mock_oracle::query,
    );
    Box::new(contract)
}

struct TestEnv {
    app: App,
    admin: Addr,
    user1: Addr,
    user2: Addr,
    liquidator: Addr,
    pool: Addr,
    oracle: Addr,
}

impl TestEnv {
    fn execute(
        &mut self,
        sender: &Addr,
        msg: &PoolExecuteMsg,
        funds: &[cosmwasm_std::Coin],
    ) -> anyhow::Result<cw_multi_test::AppResponse> {
        self.app
            .execute_contract(sender.clone(), self.pool.clone(), msg, funds)
    }

    fn account(&self, market_key: &str, user: &Addr) -> AccountResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                self.pool.clone(),
                &PoolQueryMsg::Account {
                    market_key: market_key.to_string(),
                    user: user.to_string(),
                },
            )
            .unwrap()
    }

    fn market(&self, market_key: &str) -> MarketResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                self.pool.clone(),
                &PoolQueryMsg::Market {
                    market_key: market_key.to_string(),
                },
            )
            .unwrap()
    }

    fn balance(&self, user: &Addr, denom: &str) -> Uint128 {
        self.app.wrap().query_balance(user, denom).unwrap().amount
    }

    fn set_price(&mut self, market_key: &str, price: u128) {
        self.app
            .execute_contract(
                self.admin.clone(),
                self.oracle.clone(),
                &whirpool_mock_oracle::ExecuteMsg::SetPrice {
                    market_key: market_key.to_string(),
                    price: Uint128::new(price),
                    decimals: 9,
                },
                &[],
            )
            .unwrap();
    }

    fn advance_blocks(&mut self, blocks: u64) {
        self.app.update_block(|block| {
            block.height += blocks;
            block.time = block.time.plus_seconds(blocks * 6);
        });
    }
}

/// Two collateral markets (uatom at $2, uusdc at $1, both 50% LTV) plus a
/// DNR market; per-block base rate 10_000 (1e-5) on uusdc.
fn setup_env() -> TestEnv {
    let api = MockApi::default();
    let admin = api.addr_make("admin");
    let user1 = api.addr_make("user1");
    let user2 = api.addr_make("user2");
    let liquidator = api.addr_make("liquidator");

    let mut app = AppBuilder::new().build(|router, _, storage| {
        router
            .bank
            .init_balance(
                storage,
                &api.addr_make("user1"),
                vec![
                    coin(10_000_000_000, COLLATERAL_DENOM),
                    coin(1_000_000_000, DEBT_DENOM),
                ],
            )
            .unwrap();
        router
            .bank
            .init_balance(
                storage,
                &api.addr_make("user2"),
                vec![
                    coin(10_000_000_000, COLLATERAL_DENOM),
                    coin(10_000_000_000, DEBT_DENOM),
                ],
            )
            .unwrap();
        router
            .bank
            .init_balance(
                storage,
                &api.addr_make("liquidator"),
                vec![coin(10_000_000_000, DEBT_DENOM)],
            )
            .unwrap();
    });

    let core_id = app.store_code(core_wrapper());
    let oracle_id = app.store_code(oracle_wrapper());
    let issuer_id = app.store_code(Box::new(mock_issuer_contract()));

    let oracle = app
        .instantiate_contract(
            oracle_id,
            admin.clone(),
            &whirpool_mock_oracle::InstantiateMsg {
                prices: vec![
                    whirpool_mock_oracle::PriceInit {
                        market_key: COLLATERAL_DENOM.to_string(),
                        price: Uint128::new(2_000_000_000),
                        decimals: 9,
                    },
                    whirpool_mock_oracle::PriceInit {
                        market_key: DEBT_DENOM.to_string(),
                        price: Uint128::new(1_000_000_000),
                        decimals: 9,
                    },
                ],
            },
            &[],
            "oracle",
            None,
        )
        .unwrap();

    let issuer = app
        .instantiate_contract(
            issuer_id,
            admin.clone(),
            &MockIssuerInstantiateMsg {},
            &[],
            "issuer",
            None,
        )
        .unwrap();

    // The mock issuer pays mints out of its own pocket
    app.sudo(SudoMsg::Bank(BankSudo::Mint {
        to_address: issuer.to_string(),
        amount: vec![
            coin(1_000_000_000_000_000, IPX_DENOM),
            coin(1_000_000_000_000_000, DNR_DENOM),
        ],
    }))
    .unwrap();

    let pool = app
        .instantiate_contract(
            core_id,
            admin.clone(),
            &PoolInstantiateMsg {
                admin: Some(admin.to_string()),
                oracle: oracle.to_string(),
                token_issuer: issuer.to_string(),
                ipx_denom: IPX_DENOM.to_string(),
                dnr_denom: DNR_DENOM.to_string(),
                ipx_per_block: Some(Uint128::new(1000)),
                dnr_interest_rate_per_block: Uint128::new(1_000),
                max_price_age_secs: 300,
            },
            &[],
            "whirpool",
            None,
        )
        .unwrap();

    let mut env = TestEnv {
        app,
        admin: admin.clone(),
        user1,
        user2,
        liquidator,
        pool,
        oracle,
    };

    // uatom carries the reward emission
    let mut atom_params = market_params_with_ltv(COLLATERAL_DENOM, 50);
    atom_params.allocation_points = Uint128::new(100);
    env.execute(
        &admin,
        &PoolExecuteMsg::CreateMarket {
            params: atom_params,
        },
        &[],
    )
    .unwrap();
    env.execute(
        &admin,
        &PoolExecuteMsg::CreateMarket {
            params: market_params_with_ltv(DEBT_DENOM, 50),
        },
        &[],
    )
    .unwrap();
    env.execute(
        &admin,
        &PoolExecuteMsg::CreateMarket {
            params: CreateMarketParams {
                ltv: Uint128::zero(),
                collateral_cap: Uint128::zero(),
                ..default_market_params(DNR_DENOM)
            },
        },
        &[],
    )
    .unwrap();

    for market_key in [COLLATERAL_DENOM, DEBT_DENOM] {
        env.execute(
            &admin,
            &PoolExecuteMsg::SetInterestRateData {
                market_key: market_key.to_string(),
                // 10_000 per block after the admission divide
                base_rate_per_year: Uint128::new(52_560_000_000),
                multiplier_per_year: Uint128::zero(),
                jump_multiplier_per_year: Uint128::zero(),
                kink: Uint128::new(800_000_000),
            },
            &[],
        )
        .unwrap();
    }

    env
}

#[test]
fn test_deposit_borrow_repay_withdraw_lifecycle() {
    let mut env = setup_env();
    let user1 = env.user1.clone();
    let user2 = env.user2.clone();

    // user2 funds the uusdc pool; user1 posts uatom collateral
    env.execute(
        &user2,
        &PoolExecuteMsg::Deposit {},
        &coins(1_000_000_000, DEBT_DENOM),
    )
    .unwrap();
    env.execute(
        &user1,
        &PoolExecuteMsg::Deposit {},
        &coins(1_000_000_000, COLLATERAL_DENOM),
    )
    .unwrap();

    let account = env.account(COLLATERAL_DENOM, &user1);
    assert_eq!(account.shares, Uint128::new(1_000_000_000));

    // Collateral only counts once its market is entered
    env.execute(
        &user1,
        &PoolExecuteMsg::EnterMarket {
            market_key: COLLATERAL_DENOM.to_string(),
        },
        &[],
    )
    .unwrap();

    // $2 collateral at 50% LTV backs up to (but not exactly) 1e9 of uusdc
    env.execute(
        &user1,
        &PoolExecuteMsg::Borrow {
            market_key: DEBT_DENOM.to_string(),
            amount: Uint128::new(400_000_000),
        },
        &[],
    )
    .unwrap();
    assert_eq!(
        env.balance(&user1, DEBT_DENOM),
        Uint128::new(1_400_000_000)
    );

    // Interest accrues over 100 blocks: 100 * 1e-5 on a 4e8 loan = 400_000
    env.advance_blocks(100);
    let account = env.account(DEBT_DENOM, &user1);
    assert_eq!(account.loan_balance, Uint128::new(400_400_000));

    // Repay everything; the 600_000 overpayment comes back
    env.execute(
        &user1,
        &PoolExecuteMsg::Repay {
            principal_to_repay: Uint128::new(400_000_000),
        },
        &coins(401_000_000, DEBT_DENOM),
    )
    .unwrap();
    let account = env.account(DEBT_DENOM, &user1);
    assert_eq!(account.principal, Uint128::zero());
    assert_eq!(
        env.balance(&user1, DEBT_DENOM),
        Uint128::new(999_600_000)
    );

    // Collateral comes back in full
    env.execute(
        &user1,
        &PoolExecuteMsg::Withdraw {
            market_key: COLLATERAL_DENOM.to_string(),
            shares: Uint128::new(1_000_000_000),
        },
        &[],
    )
    .unwrap();
    assert_eq!(
        env.balance(&user1, COLLATERAL_DENOM),
        Uint128::new(10_000_000_000)
    );

    // The debt pool kept the interest: depositors' claim grew by 80% of it
    let market = env.market(DEBT_DENOM);
    assert_eq!(market.collateral_elastic, Uint128::new(1_000_320_000));
    assert_eq!(market.total_reserves, Uint128::new(80_000));

    // Tracked cash mirrors the coins the contract actually holds
    let pool = env.pool.clone();
    assert_eq!(env.balance(&pool, DEBT_DENOM), market.cash);
    assert_eq!(
        env.balance(&pool, COLLATERAL_DENOM),
        env.market(COLLATERAL_DENOM).cash
    );
}

#[test]
fn test_rewards_accrue_and_claim() {
    let mut env = setup_env();
    let user1 = env.user1.clone();

    env.execute(
        &user1,
        &PoolExecuteMsg::Deposit {},
        &coins(1_000_000_000, COLLATERAL_DENOM),
    )
    .unwrap();

    env.advance_blocks(100);

    // uatom holds all 100 allocation points: 100 blocks * 1000 per block
    // emitted, half to collateral, all of it owed to the sole depositor
    let pending: PendingRewardsResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            env.pool.clone(),
            &PoolQueryMsg::PendingRewards {
                market_key: COLLATERAL_DENOM.to_string(),
                user: user1.to_string(),
            },
        )
        .unwrap();
    assert_eq!(pending.collateral_rewards, Uint128::new(50_000));
    assert_eq!(pending.loan_rewards, Uint128::zero());

    env.execute(
        &user1,
        &PoolExecuteMsg::ClaimRewards {
            market_key: COLLATERAL_DENOM.to_string(),
        },
        &[],
    )
    .unwrap();
    assert_eq!(env.balance(&user1, IPX_DENOM), Uint128::new(50_000));

    // Claiming again in the same block yields nothing further
    env.execute(
        &user1,
        &PoolExecuteMsg::ClaimAllRewards {},
        &[],
    )
    .unwrap();
    assert_eq!(env.balance(&user1, IPX_DENOM), Uint128::new(50_000));
}

#[test]
fn test_liquidation_after_price_drop() {
    let mut env = setup_env();
    let user1 = env.user1.clone();
    let user2 = env.user2.clone();
    let liquidator = env.liquidator.clone();

    env.execute(
        &user2,
        &PoolExecuteMsg::Deposit {},
        &coins(1_000_000_000, DEBT_DENOM),
    )
    .unwrap();
    env.execute(
        &user1,
        &PoolExecuteMsg::Deposit {},
        &coins(100_000_000, COLLATERAL_DENOM),
    )
    .unwrap();
    env.execute(
        &user1,
        &PoolExecuteMsg::EnterMarket {
            market_key: COLLATERAL_DENOM.to_string(),
        },
        &[],
    )
    .unwrap();
    env.execute(
        &user1,
        &PoolExecuteMsg::Borrow {
            market_key: DEBT_DENOM.to_string(),
            amount: Uint128::new(99_000_000),
        },
        &[],
    )
    .unwrap();

    // Solvent while uatom is worth $2
    let solvency: SolvencyResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            env.pool.clone(),
            &PoolQueryMsg::Solvency {
                user: user1.to_string(),
            },
        )
        .unwrap();
    assert!(solvency.is_solvent);

    // The collateral halves: weighted value 50e6 against 99e6 of debt
    env.set_price(COLLATERAL_DENOM, 1_000_000_000);
    let solvency: SolvencyResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            env.pool.clone(),
            &PoolQueryMsg::Solvency {
                user: user1.to_string(),
            },
        )
        .unwrap();
    assert!(!solvency.is_solvent);

    env.execute(
        &liquidator,
        &PoolExecuteMsg::Liquidate {
            collateral_key: COLLATERAL_DENOM.to_string(),
            borrower: user1.to_string(),
        },
        &coins(60_000_000, DEBT_DENOM),
    )
    .unwrap();

    // seize 60e6, 1% penalty 600_000, protocol keeps 1% of the penalty
    let borrower_account = env.account(COLLATERAL_DENOM, &user1);
    assert_eq!(borrower_account.shares, Uint128::new(39_400_000));

    let liquidator_account = env.account(COLLATERAL_DENOM, &liquidator);
    assert_eq!(liquidator_account.shares, Uint128::new(60_594_000));

    let borrower_debt = env.account(DEBT_DENOM, &user1);
    assert_eq!(borrower_debt.principal, Uint128::new(39_000_000));

    let market = env.market(COLLATERAL_DENOM);
    assert_eq!(market.total_reserves, Uint128::new(6_000));
    // Shares changed hands; the pool itself did not shrink
    assert_eq!(market.collateral_elastic, Uint128::new(100_000_000));
}

#[test]
fn test_dnr_borrow_accrues_and_burns_on_repay() {
    let mut env = setup_env();
    let user1 = env.user1.clone();

    env.execute(
        &user1,
        &PoolExecuteMsg::Deposit {},
        &coins(1_000_000_000, COLLATERAL_DENOM),
    )
    .unwrap();
    env.execute(
        &user1,
        &PoolExecuteMsg::EnterMarket {
            market_key: COLLATERAL_DENOM.to_string(),
        },
        &[],
    )
    .unwrap();

    env.execute(
        &user1,
        &PoolExecuteMsg::BorrowDnr {
            amount: Uint128::new(500_000_000),
        },
        &[],
    )
    .unwrap();
    assert_eq!(env.balance(&user1, DNR_DENOM), Uint128::new(500_000_000));

    // 100 blocks at the constant 1e-6 per-block rate: 0.0001 on 5e8 = 50_000
    env.advance_blocks(100);
    let account = env.account(DNR_DENOM, &user1);
    assert_eq!(account.loan_balance, Uint128::new(500_050_000));

    // DNR cannot be deposited as collateral
    let err = env
        .execute(
            &user1,
            &PoolExecuteMsg::Deposit {},
            &coins(1_000_000, DNR_DENOM),
        )
        .unwrap_err();
    let err_chain: Vec<String> = err.chain().map(|err| err.to_string()).collect();
    assert!(
        err_chain.iter().any(|msg| msg.contains("DNR")),
        "{err_chain:?}"
    );

    // Repaying burns the coins; the shortfall of 50_000 DNR is covered by
    // topping the user up through the issuer's test balance
    env.app
        .sudo(SudoMsg::Bank(BankSudo::Mint {
            to_address: user1.to_string(),
            amount: vec![coin(50_000, DNR_DENOM)],
        }))
        .unwrap();
    env.execute(
        &user1,
        &PoolExecuteMsg::RepayDnr {
            principal_to_repay: Uint128::new(500_000_000),
        },
        &coins(500_050_000, DNR_DENOM),
    )
    .unwrap();

    let account = env.account(DNR_DENOM, &user1);
    assert_eq!(account.principal, Uint128::zero());
    assert_eq!(env.balance(&user1, DNR_DENOM), Uint128::zero());

    // The DNR market never tracks cash
    let market = env.market(DNR_DENOM);
    assert_eq!(market.cash, Uint128::zero());
}

#[test]
fn test_pause_gates_mutations() {
    let mut env = setup_env();
    let admin = env.admin.clone();
    let user1 = env.user1.clone();

    env.execute(
        &admin,
        &PoolExecuteMsg::PauseMarket {
            market_key: COLLATERAL_DENOM.to_string(),
        },
        &[],
    )
    .unwrap();

    let err = env
        .execute(
            &user1,
            &PoolExecuteMsg::Deposit {},
            &coins(1_000_000, COLLATERAL_DENOM),
        )
        .unwrap_err();
    let err_chain: Vec<String> = err.chain().map(|err| err.to_string()).collect();
    assert!(
        err_chain.iter().any(|msg| msg.contains("paused")),
        "{err_chain:?}"
    );

    env.execute(
        &admin,
        &PoolExecuteMsg::UnpauseMarket {
            market_key: COLLATERAL_DENOM.to_string(),
        },
        &[],
    )
    .unwrap();
    env.execute(
        &user1,
        &PoolExecuteMsg::Deposit {},
        &coins(1_000_000, COLLATERAL_DENOM),
    )
    .unwrap();
}
