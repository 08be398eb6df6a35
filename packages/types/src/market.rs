use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128, Uint256};

use crate::Rebase;

/// Pool configuration set at instantiation. Only `admin` ever changes,
/// through `TransferAdmin`.
#[cw_serde]
pub struct Config {
    /// Holder of the admin authority
    pub admin: Addr,
    /// Price oracle contract
    pub oracle: Addr,
    /// Token issuer contract that mints IPX and DNR
    pub token_issuer: Addr,
    /// Denom of the protocol reward token
    pub ipx_denom: String,
    /// Denom of the synthetic stable debt asset
    pub dnr_denom: String,
    /// Maximum accepted oracle price age in seconds
    pub max_price_age_secs: u64,
}

/// Governance-mutable pool-wide parameters.
#[cw_serde]
pub struct PoolParams {
    /// IPX emitted per block across all markets
    pub ipx_per_block: Uint128,
    /// Sum of every market's allocation points
    pub total_allocation_points: Uint128,
    /// Constant per-block borrow rate of the DNR market
    pub dnr_interest_rate_per_block: Uint128,
}

/// Per-market state.
#[cw_serde]
pub struct MarketData {
    /// Protocol-owned interest accumulation
    pub total_reserves: Uint128,
    /// Last block at which accrual was applied
    pub accrued_block: u64,
    /// Borrow admission limit
    pub borrow_cap: Uint128,
    /// Collateral admission limit
    pub collateral_cap: Uint128,
    /// Cash on hand; mirrors the contract's bank balance of this denom
    pub cash: Uint128,
    pub is_paused: bool,
    /// Collateral factor applied to this asset as collateral (MANTISSA scale)
    pub ltv: Uint128,
    /// Portion of interest routed to reserves (MANTISSA scale)
    pub reserve_factor: Uint128,
    /// Share of pool-wide reward emission
    pub allocation_points: Uint128,
    /// Cumulative reward per unit of collateral share, scaled by `decimals_factor`
    pub accrued_collateral_rewards_per_share: Uint256,
    /// Cumulative reward per unit of loan principal, scaled by `decimals_factor`
    pub accrued_loan_rewards_per_share: Uint256,
    /// Collateral shares (base) <-> underlying (elastic)
    pub collateral_rebase: Rebase,
    /// Debt principal (base) <-> underlying debt (elastic)
    pub loan_rebase: Rebase,
    /// 10^decimals of the underlying asset
    pub decimals_factor: Uint128,
}

impl MarketData {
    pub fn new(
        accrued_block: u64,
        borrow_cap: Uint128,
        collateral_cap: Uint128,
        ltv: Uint128,
        reserve_factor: Uint128,
        allocation_points: Uint128,
        decimals: u8,
    ) -> Self {
        Self {
            total_reserves: Uint128::zero(),
            accrued_block,
            borrow_cap,
            collateral_cap,
            cash: Uint128::zero(),
            is_paused: false,
            ltv,
            reserve_factor,
            allocation_points,
            accrued_collateral_rewards_per_share: Uint256::zero(),
            accrued_loan_rewards_per_share: Uint256::zero(),
            collateral_rebase: Rebase::new(),
            loan_rebase: Rebase::new(),
            decimals_factor: Uint128::new(10u128.pow(decimals as u32)),
        }
    }
}

/// Liquidation parameters for a market's collateral side.
#[cw_serde]
pub struct Liquidation {
    /// Seized on top of the debt-value collateral (MANTISSA scale)
    pub penalty_fee: Uint128,
    /// Protocol's cut of the penalty (MANTISSA scale)
    pub protocol_percentage: Uint128,
}

/// Per-(market, user) position.
#[cw_serde]
#[derive(Default)]
pub struct Account {
    /// Collateral shares (base side of the collateral rebase)
    pub shares: Uint128,
    /// Debt principal (base side of the loan rebase)
    pub principal: Uint128,
    /// Collateral reward-debt watermark
    pub collateral_rewards_paid: Uint256,
    /// Loan reward-debt watermark
    pub loan_rewards_paid: Uint256,
}

/// Parameters for admitting a new market.
#[cw_serde]
pub struct CreateMarketParams {
    pub market_key: String,
    pub borrow_cap: Uint128,
    pub collateral_cap: Uint128,
    pub ltv: Uint128,
    pub allocation_points: Uint128,
    pub penalty_fee: Uint128,
    pub protocol_percentage: Uint128,
    pub decimals: u8,
}

// ============================================================================
// Pool Contract Messages
// ============================================================================

#[cw_serde]
pub struct PoolInstantiateMsg {
    /// Admin authority; defaults to the instantiating sender
    pub admin: Option<String>,
    pub oracle: String,
    pub token_issuer: String,
    pub ipx_denom: String,
    pub dnr_denom: String,
    /// Defaults to the protocol's initial emission when omitted
    pub ipx_per_block: Option<Uint128>,
    pub dnr_interest_rate_per_block: Uint128,
    pub max_price_age_secs: u64,
}

#[cw_serde]
pub enum PoolExecuteMsg {
    /// Deposit collateral (send exactly one coin of the market's denom)
    Deposit {},

    /// Burn collateral shares and withdraw the underlying
    Withdraw { market_key: String, shares: Uint128 },

    /// Borrow against collateral across entered markets
    Borrow { market_key: String, amount: Uint128 },

    /// Repay a loan (send the market's denom; excess is refunded)
    Repay { principal_to_repay: Uint128 },

    /// Opt this market's collateral into solvency accounting
    EnterMarket { market_key: String },

    /// Opt out; requires no open loan and a still-solvent portfolio
    ExitMarket { market_key: String },

    /// Claim pending IPX for one market
    ClaimRewards { market_key: String },

    /// Claim pending IPX across every market
    ClaimAllRewards {},

    /// Borrow freshly-minted DNR against collateral
    BorrowDnr { amount: Uint128 },

    /// Repay DNR debt (send DNR; the repaid coins are burned)
    RepayDnr { principal_to_repay: Uint128 },

    /// Liquidate an insolvent borrower (send the loan asset)
    Liquidate {
        collateral_key: String,
        borrower: String,
    },

    /// Liquidate an insolvent DNR borrower (send DNR)
    LiquidateDnr {
        collateral_key: String,
        borrower: String,
    },

    // ------------------------------------------------------------------
    // Admin-gated
    // ------------------------------------------------------------------
    CreateMarket { params: CreateMarketParams },
    PauseMarket { market_key: String },
    UnpauseMarket { market_key: String },
    SetBorrowCap { market_key: String, cap: Uint128 },
    SetCollateralCap { market_key: String, cap: Uint128 },
    UpdateLiquidation {
        market_key: String,
        penalty_fee: Uint128,
        protocol_percentage: Uint128,
    },
    UpdateReserveFactor {
        market_key: String,
        reserve_factor: Uint128,
    },
    UpdateLtv { market_key: String, ltv: Uint128 },
    UpdateAllocationPoints {
        market_key: String,
        allocation_points: Uint128,
    },
    UpdateIpxPerBlock { ipx_per_block: Uint128 },
    UpdateDnrInterestRate { rate_per_block: Uint128 },
    SetInterestRateData {
        market_key: String,
        base_rate_per_year: Uint128,
        multiplier_per_year: Uint128,
        jump_multiplier_per_year: Uint128,
        kink: Uint128,
    },
    WithdrawReserves { market_key: String, amount: Uint128 },
    TransferAdmin { new_admin: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum PoolQueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(ParamsResponse)]
    Params {},

    /// Market state projected to the current block (accrual not persisted)
    #[returns(MarketResponse)]
    Market { market_key: String },

    /// Ordered list of admitted market keys
    #[returns(MarketKeysResponse)]
    Markets {},

    /// A user's position in one market
    #[returns(AccountResponse)]
    Account { market_key: String, user: String },

    /// Markets a user has entered or borrowed from
    #[returns(MarketKeysResponse)]
    MarketsIn { user: String },

    #[returns(RateResponse)]
    BorrowRatePerBlock { market_key: String },

    #[returns(RateResponse)]
    SupplyRatePerBlock { market_key: String },

    /// IPX claimable by a user in one market, projected to the current block
    #[returns(PendingRewardsResponse)]
    PendingRewards { market_key: String, user: String },

    /// LTV-weighted collateral value vs debt value across entered markets
    #[returns(SolvencyResponse)]
    Solvency { user: String },
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: String,
    pub oracle: String,
    pub token_issuer: String,
    pub ipx_denom: String,
    pub dnr_denom: String,
    pub max_price_age_secs: u64,
}

#[cw_serde]
pub struct ParamsResponse {
    pub ipx_per_block: Uint128,
    pub total_allocation_points: Uint128,
    pub dnr_interest_rate_per_block: Uint128,
}

#[cw_serde]
pub struct MarketResponse {
    pub market_key: String,
    pub total_reserves: Uint128,
    pub accrued_block: u64,
    pub borrow_cap: Uint128,
    pub collateral_cap: Uint128,
    pub cash: Uint128,
    pub is_paused: bool,
    pub ltv: Uint128,
    pub reserve_factor: Uint128,
    pub allocation_points: Uint128,
    pub accrued_collateral_rewards_per_share: Uint256,
    pub accrued_loan_rewards_per_share: Uint256,
    pub collateral_base: Uint128,
    pub collateral_elastic: Uint128,
    pub loan_base: Uint128,
    pub loan_elastic: Uint128,
    pub decimals_factor: Uint128,
}

#[cw_serde]
pub struct MarketKeysResponse {
    pub market_keys: Vec<String>,
}

#[cw_serde]
pub struct AccountResponse {
    pub shares: Uint128,
    pub principal: Uint128,
    /// Underlying collateral value of `shares` (rounded down)
    pub collateral_balance: Uint128,
    /// Underlying debt value of `principal` (rounded up)
    pub loan_balance: Uint128,
}

#[cw_serde]
pub struct RateResponse {
    pub rate_per_block: Uint128,
}

#[cw_serde]
pub struct PendingRewardsResponse {
    pub collateral_rewards: Uint128,
    pub loan_rewards: Uint128,
    pub total: Uint128,
}

#[cw_serde]
pub struct SolvencyResponse {
    /// LTV-weighted collateral value, MANTISSA-normalized
    pub collateral_value: Uint128,
    /// Debt value, MANTISSA-normalized
    pub loan_value: Uint128,
    pub is_solvent: bool,
}
