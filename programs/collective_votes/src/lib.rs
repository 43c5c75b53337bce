//! # Collective Votes
//!
//! A vote market for collectives on Solana, paid out in seasons.
//!
//! ## Overview
//!
//! Every collective has its own supply of votes, priced on a linear bonding
//! curve and settled in one payment token. Each trade pays three fees: one to
//! the protocol, one to the collective's treasury and one to a running prize
//! pool.
//!
//! ## How it works
//! - Managers schedule seasons with a table of winning shares per exit round.
//! - The oracle reports each collective's exit round and verifies standings.
//! - Distribution fixates the pool and pays each collective its share.
//! - Holders then redeem votes for a slice of their collective's treasury.

use anchor_lang::prelude::*;

pub mod amm;
pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;

pub use amm::*;
pub use instructions::*;

use crate::state::{Capability, FeeStructure};

declare_id!("2ufKK8RrQrKomkWu5xdV24aR5yvyPa2JPSAMstkHCDYH");

#[program]
pub mod collective_votes {
    use super::*;

    /// Create config, role registry and vault
    pub fn initialize(
        ctx: Context<Initialize>,
        curve_denominator: u64,
        fees: FeeStructure,
    ) -> Result<()> {
        ctx.accounts.initialize(curve_denominator, fees, &ctx.bumps)
    }

    pub fn set_fee_structure(ctx: Context<UpdateConfig>, fees: FeeStructure) -> Result<()> {
        ctx.accounts.set_fee_structure(fees)
    }

    pub fn set_pause(ctx: Context<UpdateConfig>, paused: bool) -> Result<()> {
        ctx.accounts.set_pause(paused)
    }

    /// Grant or revoke a capability
    pub fn set_role(
        ctx: Context<UpdateRoles>,
        capability: Capability,
        account: Pubkey,
        enabled: bool,
    ) -> Result<()> {
        ctx.accounts.set_role(capability, account, enabled)
    }

    /// Buy votes; returns the price of the next vote
    pub fn buy_votes(ctx: Context<BuyVotes>, amount: u64, max_value: u64) -> Result<u64> {
        ctx.accounts.buy_votes(amount, max_value, &ctx.bumps)
    }

    /// Sell votes; returns the amount received
    pub fn sell_votes(ctx: Context<SellVotes>, amount: u64, min_value: u64) -> Result<u64> {
        ctx.accounts.sell_votes(amount, min_value)
    }

    pub fn open_vote_balance(ctx: Context<OpenVoteBalance>) -> Result<()> {
        ctx.accounts.open_vote_balance(&ctx.bumps)
    }

    /// Claimer moves votes between holders (remaining accounts: from/to pairs)
    pub fn batch_transfer<'info>(
        ctx: Context<'_, '_, 'info, 'info, BatchTransfer<'info>>,
        amounts: Vec<u64>,
    ) -> Result<()> {
        ctx.accounts.batch_transfer(amounts, ctx.remaining_accounts)
    }

    /// Burn votes for a share of the collective treasury
    pub fn redeem_votes(ctx: Context<RedeemVotes>, amount: u64) -> Result<u64> {
        ctx.accounts.redeem_votes(amount)
    }

    /// Open, update or advance the current season
    pub fn set_season(
        ctx: Context<SetSeason>,
        season_id: u64,
        rounds_n: u8,
        winning_bps: Vec<u16>,
    ) -> Result<()> {
        ctx.accounts
            .set_season(season_id, rounds_n, winning_bps, &ctx.bumps)
    }

    pub fn record_exit_round(ctx: Context<RecordExitRound>, exit_round: u8) -> Result<()> {
        ctx.accounts.record_exit_round(exit_round, &ctx.bumps)
    }

    pub fn record_verification(ctx: Context<RecordVerification>, is_verified: bool) -> Result<()> {
        ctx.accounts.record_verification(is_verified)
    }

    /// Pay collectives their season share
    /// (remaining accounts: collective/record/treasury triples)
    pub fn distribute_season<'info>(
        ctx: Context<'_, '_, 'info, 'info, DistributeSeason<'info>>,
    ) -> Result<()> {
        ctx.accounts.distribute_season(ctx.remaining_accounts)
    }

    pub fn top_up_pool(ctx: Context<TopUpPool>, amount: u64) -> Result<()> {
        ctx.accounts.top_up_pool(amount)
    }

    pub fn withdraw_protocol_funds(ctx: Context<WithdrawProtocolFunds>, amount: u64) -> Result<()> {
        ctx.accounts.withdraw_protocol_funds(amount)
    }

    pub fn quote_buy(ctx: Context<QuoteTrade>, amount: u64) -> Result<PriceQuote> {
        ctx.accounts.quote_buy(amount)
    }

    pub fn quote_sell(ctx: Context<QuoteTrade>, amount: u64) -> Result<PriceQuote> {
        ctx.accounts.quote_sell(amount)
    }

    pub fn quote_redeem(ctx: Context<QuoteRedeem>, amount: u64) -> Result<u64> {
        ctx.accounts.quote_redeem(amount)
    }

    pub fn rename_collective(ctx: Context<RenameCollective>, name: String) -> Result<()> {
        ctx.accounts.rename_collective(name)
    }
}
