//! Prize Pool Funding
//!
//! Anyone can add to the running prize pool. The admin can pull out vault
//! funds that nothing is owed against:
//!
//! ```text
//! surplus = vault - curve_reserve - prize_pool - fixated season pool still unpaid
//! ```

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::error::VoteError;
use crate::instructions::payments::transfer_tokens;
use crate::state::{Config, Season};

#[event]
pub struct PoolToppedUp {
    pub funder: Pubkey,
    pub amount: u64,
    pub prize_pool: u64,
}

#[event]
pub struct ProtocolFundsWithdrawn {
    pub admin: Pubkey,
    pub amount: u64,
    pub remaining_surplus: u64,
}

#[derive(Accounts)]
pub struct TopUpPool<'info> {
    pub funder: Signer<'info>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        constraint = payment_mint.key() == config.payment_mint @ VoteError::MintMismatch,
    )]
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = payment_mint,
        token::authority = funder,
    )]
    pub funder_payment: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = config,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> TopUpPool<'info> {
    pub fn top_up_pool(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, VoteError::ZeroAmount);

        transfer_tokens(
            &self.token_program,
            &self.payment_mint,
            self.funder_payment.to_account_info(),
            self.vault.to_account_info(),
            self.funder.to_account_info(),
            amount,
            &[],
        )?;

        self.config.accrue_pool(amount)?;

        emit!(PoolToppedUp {
            funder: self.funder.key(),
            amount,
            prize_pool: self.config.prize_pool,
        });

        msg!("Prize pool topped up by {} to {}", amount, self.config.prize_pool);
        Ok(())
    }
}

#[derive(Accounts)]
pub struct WithdrawProtocolFunds<'info> {
    #[account(
        constraint = admin.key() == config.admin @ VoteError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    /// Current season (its unpaid fixated pool is not withdrawable)
    #[account(
        seeds = [Season::SEED, config.current_season.to_le_bytes().as_ref()],
        bump = season.bump,
    )]
    pub season: Option<Account<'info, Season>>,

    #[account(
        constraint = payment_mint.key() == config.payment_mint @ VoteError::MintMismatch,
    )]
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = config,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = payment_mint,
    )]
    pub destination: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> WithdrawProtocolFunds<'info> {
    pub fn withdraw_protocol_funds(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, VoteError::ZeroAmount);

        let outstanding = self.season.as_deref().map_or(0, Season::outstanding);
        let surplus = self.config.surplus(self.vault.amount, outstanding);
        require!(amount <= surplus, VoteError::InsufficientFunds);

        let config_seeds = &[Config::SEED, &[self.config.bump]];
        let signer_seeds = &[&config_seeds[..]];

        transfer_tokens(
            &self.token_program,
            &self.payment_mint,
            self.vault.to_account_info(),
            self.destination.to_account_info(),
            self.config.to_account_info(),
            amount,
            signer_seeds,
        )?;

        emit!(ProtocolFundsWithdrawn {
            admin: self.admin.key(),
            amount,
            remaining_surplus: surplus - amount,
        });

        msg!("Withdrew {} of {} surplus", amount, surplus);
        Ok(())
    }
}
