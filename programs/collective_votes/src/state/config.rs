//! Global Protocol Configuration
//!
//! The single owning context for process-wide state: fee schedule, curve
//! parameters, pause switch, the current season pointer and the running
//! prize-pool accumulator.

use anchor_lang::prelude::*;

use crate::amm::{split, LinearCurve, PriceQuote, Side};
use crate::constants::BPS_DENOMINATOR;
use crate::error::VoteError;

/// How each trade's base price is taxed
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub struct FeeStructure {
    /// Share accrued to the season prize pool (bps)
    pub pool_bps: u16,
    /// Share paid to the collective's treasury (bps)
    pub collective_bps: u16,
    /// Share paid to the protocol destination (bps)
    pub protocol_bps: u16,
    /// Owner of the token account receiving protocol fees
    pub protocol_destination: Pubkey,
}

impl FeeStructure {
    pub fn total_bps(&self) -> u64 {
        self.pool_bps as u64 + self.collective_bps as u64 + self.protocol_bps as u64
    }

    /// Fees must leave something of the base price for sellers
    pub fn validate(&self) -> Result<()> {
        require!(
            self.total_bps() < BPS_DENOMINATOR,
            VoteError::InvalidFeeStructure
        );
        Ok(())
    }
}

/// Global configuration account (singleton PDA)
///
/// Seeds: ["config"]
#[account]
#[derive(InitSpace)]
pub struct Config {
    /// Protocol administrator
    pub admin: Pubkey,

    /// Token used to pay for votes
    pub payment_mint: Pubkey,

    /// One whole payment token in base units (10^decimals)
    pub unit: u64,

    /// Bonding curve denominator
    pub curve_denominator: u64,

    /// Fee schedule applied to every trade
    pub fees: FeeStructure,

    /// Global trading pause
    pub paused: bool,

    /// Current season id (0 = no season yet)
    pub current_season: u64,

    /// Running prize pool, fixated into a season on its first distribution
    pub prize_pool: u64,

    /// Base prices held in the vault to pay future sellers
    pub curve_reserve: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl Config {
    pub const SEED: &'static [u8] = b"config";

    /// Pause gate: while paused only the claimer and a collective's own
    /// bootstrap buy go through
    pub fn require_can_trade(&self, is_bootstrap: bool, is_claimer: bool) -> Result<()> {
        require!(
            !self.paused || is_bootstrap || is_claimer,
            VoteError::TradingPaused
        );
        Ok(())
    }

    pub fn curve(&self) -> LinearCurve {
        LinearCurve::new(self.unit, self.curve_denominator)
    }

    /// Cost of buying `amount` votes on top of `supply`
    pub fn quote_buy(&self, supply: u64, amount: u64) -> Result<PriceQuote> {
        let base = self.curve().price(supply, amount)?;
        split(base, &self.fees, Side::Buy)
    }

    /// Proceeds of selling `amount` votes out of `supply`
    pub fn quote_sell(&self, supply: u64, amount: u64) -> Result<PriceQuote> {
        let base = self.curve().sell_price(supply, amount)?;
        split(base, &self.fees, Side::Sell)
    }

    /// Record the money flows of a settled buy
    pub fn accrue_buy(&mut self, quote: &PriceQuote) -> Result<()> {
        self.curve_reserve = self
            .curve_reserve
            .checked_add(quote.base_price)
            .ok_or(VoteError::MathOverflow)?;
        self.accrue_pool(quote.pool_fee)
    }

    /// Record the money flows of a settled sell
    pub fn accrue_sell(&mut self, quote: &PriceQuote) -> Result<()> {
        self.curve_reserve = self.curve_reserve.saturating_sub(quote.base_price);
        self.accrue_pool(quote.pool_fee)
    }

    pub fn accrue_pool(&mut self, amount: u64) -> Result<()> {
        self.prize_pool = self
            .prize_pool
            .checked_add(amount)
            .ok_or(VoteError::MathOverflow)?;
        Ok(())
    }

    /// Vault funds not owed to sellers or to a prize pool
    ///
    /// `season_outstanding` is what the current season still has to pay out
    /// of an already fixated pool.
    pub fn surplus(&self, vault_balance: u64, season_outstanding: u64) -> u64 {
        let committed = (self.curve_reserve as u128)
            + (self.prize_pool as u128)
            + (season_outstanding as u128);
        (vault_balance as u128).saturating_sub(committed) as u64
    }
}
