//! # Linear Bonding Curve
//!
//! Votes are priced on a straight line: the `n`-th vote (1-based) costs
//!
//! ```text
//! p(n) = n * UNIT / D
//! ```
//!
//! where `UNIT` is one whole payment token in base units (`10^decimals`) and
//! `D` is the configured curve denominator.
//!
//! ## Trade Cost
//!
//! Buying `amount` votes on top of `supply` pays for positions
//! `supply + 1 ..= supply + amount`. The sum is taken with the trapezoid rule:
//!
//! ```text
//! first = (supply + 1)      * UNIT / D
//! last  = (supply + amount) * UNIT / D
//! cost  = amount * (first + last) / 2
//! ```
//!
//! Every division floors. Buyers are charged slightly less than the exact
//! integral and sellers receive slightly less; nothing rounds up.
//!
//! Selling `amount` votes at `supply` releases the same positions a buyer paid
//! for, so the sell cost is `price(supply - amount, amount)`.

use anchor_lang::prelude::*;

use crate::error::VoteError;

/// Linear price curve parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearCurve {
    /// One whole payment token in base units
    pub unit: u64,
    /// Curve denominator (larger = flatter curve)
    pub denominator: u64,
}

impl LinearCurve {
    pub fn new(unit: u64, denominator: u64) -> Self {
        Self { unit, denominator }
    }

    /// Build a curve from the payment mint's decimals
    pub fn from_decimals(decimals: u8, denominator: u64) -> Result<Self> {
        let unit = 10u64
            .checked_pow(decimals as u32)
            .ok_or(VoteError::MathOverflow)?;
        Ok(Self::new(unit, denominator))
    }

    /// Price of the vote at 1-based `position`
    fn term(&self, position: u128) -> Result<u128> {
        require!(self.denominator > 0, VoteError::InvalidCurve);

        Ok(position
            .checked_mul(self.unit as u128)
            .ok_or(VoteError::MathOverflow)?
            / self.denominator as u128)
    }

    /// Base cost of `amount` votes bought on top of `supply`
    ///
    /// # Example
    /// ```ignore
    /// // UNIT = 1e6, D = 100
    /// let curve = LinearCurve::new(1_000_000, 100);
    /// assert_eq!(curve.price(0, 1)?, 10_000);
    /// assert_eq!(curve.price(1, 100)?, 51_500_000);
    /// ```
    pub fn price(&self, supply: u64, amount: u64) -> Result<u64> {
        let first = self.term(supply as u128 + 1)?;
        let last = self.term(supply as u128 + amount as u128)?;

        let cost = (amount as u128)
            .checked_mul(first.checked_add(last).ok_or(VoteError::MathOverflow)?)
            .ok_or(VoteError::MathOverflow)?
            / 2;

        u64::try_from(cost).map_err(|_| error!(VoteError::MathOverflow))
    }

    /// Base proceeds of selling `amount` votes out of `supply`
    pub fn sell_price(&self, supply: u64, amount: u64) -> Result<u64> {
        let remaining = supply
            .checked_sub(amount)
            .ok_or(VoteError::InsufficientVotes)?;
        self.price(remaining, amount)
    }
}

// ============================================================================
// TESTS
// ============================================================================
