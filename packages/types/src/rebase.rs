use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

use crate::error::ContractError;
use crate::math::mul_div;

/// Two-way rational map between a share pool (`base`) and an underlying
/// pool (`elastic`). Interest accrual grows `elastic` while `base` stays
/// put, so each share is worth proportionally more underlying over time.
///
/// Invariant: `base == 0` if and only if `elastic == 0`.
#[cw_serde]
#[derive(Default)]
pub struct Rebase {
    pub base: Uint128,
    pub elastic: Uint128,
}

impl Rebase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert an underlying amount into shares.
    /// Rounding direction is the caller's choice: round down when crediting
    /// a depositor, round up when computing debt owed.
    pub fn to_base(&self, elastic: Uint128, round_up: bool) -> Result<Uint128, ContractError> {
        if self.elastic.is_zero() {
            Ok(elastic)
        } else {
            mul_div(elastic, self.base, self.elastic, round_up)
        }
    }

    /// Convert shares into an underlying amount.
    pub fn to_elastic(&self, base: Uint128, round_up: bool) -> Result<Uint128, ContractError> {
        if self.base.is_zero() {
            Ok(base)
        } else {
            mul_div(base, self.elastic, self.base, round_up)
        }
    }

    /// Append underlying to the pool, deriving the share increment
    /// proportionally. Returns the share increment. When the pool is empty
    /// the first deposit mints shares 1:1.
    pub fn add_elastic(
        &mut self,
        elastic: Uint128,
        round_up: bool,
    ) -> Result<Uint128, ContractError> {
        let base = self.to_base(elastic, round_up)?;
        self.elastic = self.elastic.checked_add(elastic)?;
        self.base = self.base.checked_add(base)?;
        Ok(base)
    }

    /// Remove shares from the pool, deriving the underlying amount removed
    /// proportionally. Returns the underlying amount.
    pub fn sub_base(&mut self, base: Uint128, round_up: bool) -> Result<Uint128, ContractError> {
        let elastic = self.to_elastic(base, round_up)?;
        self.base = self.base.checked_sub(base)?;
        self.elastic = self.elastic.checked_sub(elastic)?;
        Ok(elastic)
    }

    /// Grow the underlying side only (interest accrual).
    pub fn increase_elastic(&mut self, elastic: Uint128) -> Result<(), ContractError> {
        self.elastic = self.elastic.checked_add(elastic)?;
        Ok(())
    }

    /// Shrink the underlying side only.
    pub fn decrease_elastic(&mut self, elastic: Uint128) -> Result<(), ContractError> {
        self.elastic = self.elastic.checked_sub(elastic)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_deposit_is_one_to_one() {
        let mut rebase = Rebase::new();
        let shares = rebase.add_elastic(Uint128::new(1_000_000_000), false).unwrap();
        assert_eq!(shares, Uint128::new(1_000_000_000));
        assert_eq!(rebase.base, Uint128::new(1_000_000_000));
        assert_eq!(rebase.elastic, Uint128::new(1_000_000_000));
    }

    #[test]
    fn test_full_exit_empties_both_sides() {
        let mut rebase = Rebase::new();
        rebase.add_elastic(Uint128::new(1_000_000_000), false).unwrap();
        let underlying = rebase.sub_base(Uint128::new(1_000_000_000), false).unwrap();
        assert_eq!(underlying, Uint128::new(1_000_000_000));
        assert_eq!(rebase.base, Uint128::zero());
        assert_eq!(rebase.elastic, Uint128::zero());
    }

    #[test]
    fn test_shares_after_growth() {
        let mut rebase = Rebase::new();
        rebase.add_elastic(Uint128::new(1000), false).unwrap();
        // Interest accrues: pool is now worth 1100 for 1000 shares
        rebase.increase_elastic(Uint128::new(100)).unwrap();

        // A new 1100 deposit mints 1000 shares
        let shares = rebase.add_elastic(Uint128::new(1100), false).unwrap();
        assert_eq!(shares, Uint128::new(1000));
        assert_eq!(rebase.base, Uint128::new(2000));
        assert_eq!(rebase.elastic, Uint128::new(2200));
    }

    #[test]
    fn test_to_base_rounding_direction() {
        let rebase = Rebase {
            base: Uint128::new(1000),
            elastic: Uint128::new(1100),
        };
        // 105 underlying -> 95.45.. shares
        assert_eq!(
            rebase.to_base(Uint128::new(105), false).unwrap(),
            Uint128::new(95)
        );
        assert_eq!(
            rebase.to_base(Uint128::new(105), true).unwrap(),
            Uint128::new(96)
        );
    }

    #[test]
    fn test_to_elastic_rounding_direction() {
        let rebase = Rebase {
            base: Uint128::new(1000),
            elastic: Uint128::new(1100),
        };
        // 95 shares -> 104.5 underlying
        assert_eq!(
            rebase.to_elastic(Uint128::new(95), false).unwrap(),
            Uint128::new(104)
        );
        assert_eq!(
            rebase.to_elastic(Uint128::new(95), true).unwrap(),
            Uint128::new(105)
        );
    }

    #[test]
    fn test_sub_base_more_than_pool_fails() {
        let mut rebase = Rebase::new();
        rebase.add_elastic(Uint128::new(100), false).unwrap();
        assert!(rebase.sub_base(Uint128::new(101), false).is_err());
    }

    #[test]
    fn test_round_trip_favors_pool() {
        let mut rebase = Rebase {
            base: Uint128::new(997),
            elastic: Uint128::new(1313),
        };
        let shares = rebase.add_elastic(Uint128::new(500), false).unwrap();
        let back = rebase.sub_base(shares, false).unwrap();
        // Rounding edge goes to the pool, never to the exiting holder
        assert!(back <= Uint128::new(500));
        assert!(Uint128::new(500) - back < Uint128::new(3));
    }

    #[test]
    fn test_empty_conversions_are_identity() {
        let rebase = Rebase::new();
        assert_eq!(
            rebase.to_base(Uint128::new(42), true).unwrap(),
            Uint128::new(42)
        );
        assert_eq!(
            rebase.to_elastic(Uint128::new(42), false).unwrap(),
            Uint128::new(42)
        );
    }
}
