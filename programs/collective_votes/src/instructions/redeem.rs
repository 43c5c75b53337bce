//! Vote Redemption
//!
//! Once a collective's season payout has landed, holders can burn votes for
//! a share of the collective treasury.
//!
//! ## Redemption Calculation
//!
//! ```text
//! circulating = supply - burnt - claimer_balance
//! value       = amount * treasury_balance / circulating
//! ```
//!
//! The rate is read from the live treasury balance, so every redemption
//! changes the rate seen by the next one.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::error::VoteError;
use crate::instructions::payments::{optional_vote_balance, transfer_tokens};
use crate::state::{Collective, Config, Roles, SeasonCollective, VoteBalance};

/// Event emitted when votes are redeemed
#[event]
pub struct VotesRedeemed {
    pub collective: Pubkey,
    pub redeemer: Pubkey,
    pub votes_burned: u64,
    pub value_received: u64,
    pub redeemer_balance: u64,
    pub burnt: u64,
    pub supply: u64,
}

/// Accounts for redemption
#[derive(Accounts)]
pub struct RedeemVotes<'info> {
    /// Holder redeeming votes
    #[account(mut)]
    pub holder: Signer<'info>,

    /// Protocol configuration
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    /// Role registry (locates the claimer)
    #[account(
        seeds = [Roles::SEED],
        bump = roles.bump,
    )]
    pub roles: Box<Account<'info, Roles>>,

    /// Collective whose votes are burned
    #[account(
        mut,
        seeds = [Collective::SEED, collective.authority.as_ref()],
        bump = collective.bump,
    )]
    pub collective: Box<Account<'info, Collective>>,

    /// Holder's votes
    #[account(
        mut,
        seeds = [VoteBalance::SEED, collective.key().as_ref(), holder.key().as_ref()],
        bump = holder_votes.bump,
    )]
    pub holder_votes: Box<Account<'info, VoteBalance>>,

    /// CHECK: claimer's balance record; may not exist, in which case it counts as 0
    #[account(
        seeds = [VoteBalance::SEED, collective.key().as_ref(), roles.claimer.as_ref()],
        bump,
    )]
    pub claimer_votes: UncheckedAccount<'info>,

    /// This collective's record for the current season
    #[account(
        seeds = [
            SeasonCollective::SEED,
            config.current_season.to_le_bytes().as_ref(),
            collective.key().as_ref(),
        ],
        bump = season_collective.bump,
    )]
    pub season_collective: Option<Account<'info, SeasonCollective>>,

    /// Payment mint
    #[account(
        constraint = payment_mint.key() == config.payment_mint @ VoteError::MintMismatch,
    )]
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Collective treasury (pays the redemption)
    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = collective,
    )]
    pub collective_treasury: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Holder's payment account
    #[account(
        init_if_needed,
        payer = holder,
        associated_token::mint = payment_mint,
        associated_token::authority = holder,
    )]
    pub holder_payment: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> RedeemVotes<'info> {
    /// Burn `amount` votes for their share of the treasury
    pub fn redeem_votes(&mut self, amount: u64) -> Result<u64> {
        SeasonCollective::require_distributed(self.season_collective.as_deref())?;

        let claimer_balance = optional_vote_balance(&self.claimer_votes)?;
        let holder = self.holder.key();

        let value = self.collective.record_redeem(
            &holder,
            &mut self.holder_votes.amount,
            amount,
            claimer_balance,
            self.collective_treasury.amount,
        )?;

        let authority = self.collective.authority;
        let collective_seeds = &[
            Collective::SEED,
            authority.as_ref(),
            &[self.collective.bump],
        ];
        let collective_signer = &[&collective_seeds[..]];

        transfer_tokens(
            &self.token_program,
            &self.payment_mint,
            self.collective_treasury.to_account_info(),
            self.holder_payment.to_account_info(),
            self.collective.to_account_info(),
            value,
            collective_signer,
        )?;

        emit!(VotesRedeemed {
            collective: self.collective.key(),
            redeemer: holder,
            votes_burned: amount,
            value_received: value,
            redeemer_balance: self.holder_votes.amount,
            burnt: self.collective.burnt,
            supply: self.collective.supply,
        });

        msg!(
            "Redeemed {} votes for {} | burnt {} of {}",
            amount,
            value,
            self.collective.burnt,
            self.collective.supply,
        );

        Ok(value)
    }
}
