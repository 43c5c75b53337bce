//! # Fee Splitting
//!
//! Every trade's base price is taxed three ways, each share in basis points
//! of the base price and floored independently:
//!
//! ```text
//! protocol_fee   = base * protocol_bps   / 10_000   -> protocol destination
//! collective_fee = base * collective_bps / 10_000   -> collective treasury
//! pool_fee       = base * pool_bps       / 10_000   -> season prize pool
//! ```
//!
//! Buyers pay `base + total_fee`; sellers receive `base - total_fee`.

use anchor_lang::prelude::*;

use crate::constants::BPS_DENOMINATOR;
use crate::error::VoteError;
use crate::state::FeeStructure;

/// Direction of a trade
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

/// Full price breakdown of a trade
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PriceQuote {
    /// Curve price before fees
    pub base_price: u64,
    pub protocol_fee: u64,
    pub collective_fee: u64,
    pub pool_fee: u64,
    pub total_fee: u64,
    /// Amount paid (buy) or received (sell)
    pub total: u64,
}

impl PriceQuote {
    /// Buyer's bound on the total paid; 0 disables it
    pub fn check_max(&self, max_value: u64) -> Result<()> {
        require!(
            max_value == 0 || self.total <= max_value,
            VoteError::Slippage
        );
        Ok(())
    }

    /// Seller's bound on the total received
    pub fn check_min(&self, min_value: u64) -> Result<()> {
        require!(self.total >= min_value, VoteError::Slippage);
        Ok(())
    }
}

/// `amount * bps / 10_000`, floored
pub fn bps_of(amount: u64, bps: u16) -> Result<u64> {
    let share = (amount as u128)
        .checked_mul(bps as u128)
        .ok_or(VoteError::MathOverflow)?
        / BPS_DENOMINATOR as u128;

    u64::try_from(share).map_err(|_| error!(VoteError::MathOverflow))
}

/// Decompose `base_price` into its fee shares
pub fn split(base_price: u64, fees: &FeeStructure, side: Side) -> Result<PriceQuote> {
    let protocol_fee = bps_of(base_price, fees.protocol_bps)?;
    let collective_fee = bps_of(base_price, fees.collective_bps)?;
    let pool_fee = bps_of(base_price, fees.pool_bps)?;

    let total_fee = protocol_fee
        .checked_add(collective_fee)
        .and_then(|sum| sum.checked_add(pool_fee))
        .ok_or(VoteError::MathOverflow)?;

    let total = match side {
        Side::Buy => base_price.checked_add(total_fee),
        Side::Sell => base_price.checked_sub(total_fee),
    }
    .ok_or(VoteError::MathOverflow)?;

    Ok(PriceQuote {
        base_price,
        protocol_fee,
        collective_fee,
        pool_fee,
        total_fee,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_percent() -> FeeStructure {
        FeeStructure {
            pool_bps: 100,
            collective_bps: 600,
            protocol_bps: 300,
            protocol_destination: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_buy_breakdown() {
        let quote = split(51_500_000, &ten_percent(), Side::Buy).unwrap();

        assert_eq!(quote.pool_fee, 515_000);
        assert_eq!(quote.collective_fee, 3_090_000);
        assert_eq!(quote.protocol_fee, 1_545_000);
        assert_eq!(quote.total_fee, 5_150_000);
        assert_eq!(quote.total, 56_650_000);
    }

    #[test]
    fn test_sell_breakdown() {
        let quote = split(51_500_000, &ten_percent(), Side::Sell).unwrap();

        assert_eq!(quote.total_fee, 5_150_000);
        assert_eq!(quote.total, 46_350_000);
    }

    #[test]
    fn test_fees_floor_independently() {
        // 16 * 600 / 10_000 = 0, the largest share still floors away
        let quote = split(16, &ten_percent(), Side::Buy).unwrap();
        assert_eq!(quote.total_fee, 0);
        assert_eq!(quote.total, 16);

        // 100 * 600 / 10_000 = 6, 100 * 300 / 10_000 = 3, 100 * 100 / 10_000 = 1
        let quote = split(100, &ten_percent(), Side::Buy).unwrap();
        assert_eq!(quote.total_fee, 10);
    }

    #[test]
    fn test_buy_bound() {
        let quote = split(51_500_000, &ten_percent(), Side::Buy).unwrap();

        assert!(quote.check_max(56_650_000).is_ok());
        assert!(quote.check_max(0).is_ok());
        let err = quote.check_max(56_649_999).unwrap_err();
        assert_eq!(err, VoteError::Slippage.into());
    }

    #[test]
    fn test_sell_bound() {
        let quote = split(51_500_000, &ten_percent(), Side::Sell).unwrap();

        assert!(quote.check_min(46_350_000).is_ok());
        assert!(quote.check_min(0).is_ok());
        let err = quote.check_min(46_350_001).unwrap_err();
        assert_eq!(err, VoteError::Slippage.into());
    }

    #[test]
    fn test_zero_fees() {
        let fees = FeeStructure::default();
        let quote = split(1_000, &fees, Side::Sell).unwrap();
        assert_eq!(quote.total, 1_000);
    }
}
