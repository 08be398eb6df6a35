use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

use crate::error::ContractError;
use crate::math::{fdiv, fmul, MANTISSA};

/// Blocks per year at ~6s block time; annual rates are divided by this
/// when a model is admitted.
pub const BLOCKS_PER_YEAR: u64 = 5_256_000;

/// Jump-rate curve for a single market. All fields are MANTISSA-scaled
/// per-block fractions except `kink`, which is a utilization threshold.
///
/// - Below the kink: `rate = base + utilization * multiplier`
/// - Above the kink: `rate = base + kink * multiplier
///                         + (utilization - kink) * jump_multiplier`
#[cw_serde]
pub struct InterestRateModel {
    pub base_rate_per_block: Uint128,
    pub multiplier_per_block: Uint128,
    pub jump_multiplier_per_block: Uint128,
    pub kink: Uint128,
}

impl InterestRateModel {
    /// Build a per-block model from annual rates.
    pub fn from_yearly(
        base_rate_per_year: Uint128,
        multiplier_per_year: Uint128,
        jump_multiplier_per_year: Uint128,
        kink: Uint128,
    ) -> Self {
        let blocks = Uint128::from(BLOCKS_PER_YEAR);
        Self {
            base_rate_per_block: base_rate_per_year / blocks,
            multiplier_per_block: multiplier_per_year / blocks,
            jump_multiplier_per_block: jump_multiplier_per_year / blocks,
            kink,
        }
    }

    /// Pool utilization: `borrows / (cash + borrows - reserves)`.
    /// Zero when nothing is borrowed.
    pub fn utilization(
        cash: Uint128,
        borrows: Uint128,
        reserves: Uint128,
    ) -> Result<Uint128, ContractError> {
        if borrows.is_zero() {
            return Ok(Uint128::zero());
        }
        let pool = cash.checked_add(borrows)?.checked_sub(reserves)?;
        fdiv(borrows, pool)
    }

    /// Per-block borrow rate at the given pool state.
    pub fn borrow_rate(
        &self,
        cash: Uint128,
        borrows: Uint128,
        reserves: Uint128,
    ) -> Result<Uint128, ContractError> {
        let utilization = Self::utilization(cash, borrows, reserves)?;
        if utilization <= self.kink {
            Ok(fmul(utilization, self.multiplier_per_block)?
                .checked_add(self.base_rate_per_block)?)
        } else {
            let normal = fmul(self.kink, self.multiplier_per_block)?
                .checked_add(self.base_rate_per_block)?;
            let excess = utilization.checked_sub(self.kink)?;
            Ok(normal.checked_add(fmul(excess, self.jump_multiplier_per_block)?)?)
        }
    }

    /// Per-block supply rate: the borrow rate earned by the pool, scaled by
    /// utilization, net of the reserve factor.
    pub fn supply_rate(
        &self,
        cash: Uint128,
        borrows: Uint128,
        reserves: Uint128,
        reserve_factor: Uint128,
    ) -> Result<Uint128, ContractError> {
        let utilization = Self::utilization(cash, borrows, reserves)?;
        let borrow_rate = self.borrow_rate(cash, borrows, reserves)?;
        let net_rate = fmul(borrow_rate, MANTISSA.checked_sub(reserve_factor)?)?;
        fmul(utilization, net_rate)
    }

    /// Validate the model parameters.
    pub fn validate(&self) -> bool {
        self.kink <= MANTISSA
    }
}
