//! Read-only price quotes, returned through Anchor return data
//!
//! Quotes use live state, so they are only valid for the slot they were
//! simulated in.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::amm::PriceQuote;
use crate::error::VoteError;
use crate::instructions::payments::optional_vote_balance;
use crate::state::{Collective, Config, Roles, VoteBalance};

#[derive(Accounts)]
pub struct QuoteTrade<'info> {
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// Absent when the collective has not been created yet
    #[account(
        seeds = [Collective::SEED, collective.authority.as_ref()],
        bump = collective.bump,
    )]
    pub collective: Option<Account<'info, Collective>>,
}

impl<'info> QuoteTrade<'info> {
    fn supply(&self) -> u64 {
        self.collective.as_ref().map_or(0, |collective| collective.supply)
    }

    pub fn quote_buy(&self, amount: u64) -> Result<PriceQuote> {
        self.config.quote_buy(self.supply(), amount)
    }

    pub fn quote_sell(&self, amount: u64) -> Result<PriceQuote> {
        self.config.quote_sell(self.supply(), amount)
    }
}

#[derive(Accounts)]
pub struct QuoteRedeem<'info> {
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        seeds = [Roles::SEED],
        bump = roles.bump,
    )]
    pub roles: Account<'info, Roles>,

    #[account(
        seeds = [Collective::SEED, collective.authority.as_ref()],
        bump = collective.bump,
    )]
    pub collective: Account<'info, Collective>,

    /// CHECK: claimer's balance record; may not exist, in which case it counts as 0
    #[account(
        seeds = [VoteBalance::SEED, collective.key().as_ref(), roles.claimer.as_ref()],
        bump,
    )]
    pub claimer_votes: UncheckedAccount<'info>,

    #[account(
        constraint = payment_mint.key() == config.payment_mint @ VoteError::MintMismatch,
    )]
    pub payment_mint: InterfaceAccount<'info, Mint>,

    #[account(
        associated_token::mint = payment_mint,
        associated_token::authority = collective,
    )]
    pub collective_treasury: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> QuoteRedeem<'info> {
    pub fn quote_redeem(&self, amount: u64) -> Result<u64> {
        let claimer_balance = optional_vote_balance(&self.claimer_votes)?;
        self.collective
            .redeem_value(amount, claimer_balance, self.collective_treasury.amount)
    }
}
