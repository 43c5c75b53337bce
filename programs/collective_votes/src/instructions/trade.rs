//! Vote Trading
//!
//! Buys and sells votes on a collective's linear curve.
//!
//! ## Money flow
//!
//! ```text
//! buy:   trader ──base + pool_fee──▶ vault
//!        trader ──protocol_fee─────▶ protocol destination
//!        trader ──collective_fee───▶ collective treasury
//!
//! sell:  vault  ──base - fees──────▶ trader
//!        vault  ──protocol_fee─────▶ protocol destination
//!        vault  ──collective_fee───▶ collective treasury
//!        (pool_fee stays in the vault)
//! ```
//!
//! Both sides add `pool_fee` to the running prize pool.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::error::VoteError;
use crate::instructions::payments::transfer_tokens;
use crate::state::{Capability, Collective, Config, Roles, Season, VoteBalance};

/// Event emitted when votes are bought
#[event]
pub struct VotesBought {
    pub collective: Pubkey,
    pub buyer: Pubkey,
    pub amount: u64,
    pub base_price: u64,
    pub protocol_fee: u64,
    pub collective_fee: u64,
    pub pool_fee: u64,
    pub total_paid: u64,
    pub buyer_balance: u64,
    pub supply: u64,
    /// Cost of one more vote at the new supply
    pub next_vote_price: u64,
}

/// Event emitted when votes are sold
#[event]
pub struct VotesSold {
    pub collective: Pubkey,
    pub seller: Pubkey,
    pub amount: u64,
    pub base_price: u64,
    pub protocol_fee: u64,
    pub collective_fee: u64,
    pub pool_fee: u64,
    pub total_received: u64,
    pub seller_balance: u64,
    pub supply: u64,
}

/// Accounts for buying votes
///
/// The collective and the buyer's balance record are created on first use.
#[derive(Accounts)]
pub struct BuyVotes<'info> {
    /// Buyer
    #[account(mut)]
    pub trader: Signer<'info>,

    /// Protocol configuration
    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    /// Role registry (claimers trade while paused)
    #[account(
        seeds = [Roles::SEED],
        bump = roles.bump,
    )]
    pub roles: Box<Account<'info, Roles>>,

    /// Current season (absent before the first season)
    #[account(
        seeds = [Season::SEED, config.current_season.to_le_bytes().as_ref()],
        bump = season.bump,
    )]
    pub season: Option<Account<'info, Season>>,

    /// CHECK: the collective's own address; only used as a seed
    pub collective_authority: UncheckedAccount<'info>,

    /// Collective being traded
    #[account(
        init_if_needed,
        payer = trader,
        space = 8 + Collective::INIT_SPACE,
        seeds = [Collective::SEED, collective_authority.key().as_ref()],
        bump,
    )]
    pub collective: Box<Account<'info, Collective>>,

    /// Buyer's votes in this collective
    #[account(
        init_if_needed,
        payer = trader,
        space = 8 + VoteBalance::INIT_SPACE,
        seeds = [VoteBalance::SEED, collective.key().as_ref(), trader.key().as_ref()],
        bump,
    )]
    pub trader_votes: Box<Account<'info, VoteBalance>>,

    /// Payment mint
    #[account(
        constraint = payment_mint.key() == config.payment_mint @ VoteError::MintMismatch,
    )]
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Buyer's payment account
    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = trader,
    )]
    pub trader_payment: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Protocol vault
    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = config,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receives the protocol fee
    #[account(
        mut,
        constraint = protocol_treasury.mint == config.payment_mint @ VoteError::MintMismatch,
        constraint = protocol_treasury.owner == config.fees.protocol_destination
            @ VoteError::TreasuryMismatch,
    )]
    pub protocol_treasury: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Collective treasury (receives the collective fee)
    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = payment_mint,
        associated_token::authority = collective,
    )]
    pub collective_treasury: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> BuyVotes<'info> {
    /// Buy `amount` votes, paying at most `max_value` (0 = no bound)
    ///
    /// Returns the price of the next vote after this trade.
    pub fn buy_votes(&mut self, amount: u64, max_value: u64, bumps: &BuyVotesBumps) -> Result<u64> {
        Season::require_tradeable(self.config.current_season, self.season.as_deref())?;

        let trader = self.trader.key();

        // Freshly created records come back zeroed
        if self.collective.authority == Pubkey::default() {
            self.collective.authority = self.collective_authority.key();
            self.collective.bump = bumps.collective;
        }
        if self.trader_votes.holder == Pubkey::default() {
            self.trader_votes.collective = self.collective.key();
            self.trader_votes.holder = trader;
            self.trader_votes.bump = bumps.trader_votes;
        }

        let is_bootstrap = self.collective.supply == 0 && trader == self.collective.authority;
        let is_claimer = self.roles.has_capability(&trader, Capability::Claimer);
        self.config.require_can_trade(is_bootstrap, is_claimer)?;

        let quote = self.config.quote_buy(self.collective.supply, amount)?;
        self.collective
            .record_buy(&trader, &mut self.trader_votes.amount, amount)?;
        quote.check_max(max_value)?;

        let to_vault = quote
            .base_price
            .checked_add(quote.pool_fee)
            .ok_or(VoteError::MathOverflow)?;

        transfer_tokens(
            &self.token_program,
            &self.payment_mint,
            self.trader_payment.to_account_info(),
            self.vault.to_account_info(),
            self.trader.to_account_info(),
            to_vault,
            &[],
        )?;
        transfer_tokens(
            &self.token_program,
            &self.payment_mint,
            self.trader_payment.to_account_info(),
            self.protocol_treasury.to_account_info(),
            self.trader.to_account_info(),
            quote.protocol_fee,
            &[],
        )?;
        transfer_tokens(
            &self.token_program,
            &self.payment_mint,
            self.trader_payment.to_account_info(),
            self.collective_treasury.to_account_info(),
            self.trader.to_account_info(),
            quote.collective_fee,
            &[],
        )?;

        self.config.accrue_buy(&quote)?;

        let next_vote_price = self.config.quote_buy(self.collective.supply, 1)?.total;

        emit!(VotesBought {
            collective: self.collective.key(),
            buyer: trader,
            amount,
            base_price: quote.base_price,
            protocol_fee: quote.protocol_fee,
            collective_fee: quote.collective_fee,
            pool_fee: quote.pool_fee,
            total_paid: quote.total,
            buyer_balance: self.trader_votes.amount,
            supply: self.collective.supply,
            next_vote_price,
        });

        msg!(
            "Bought {} votes for {} (fees {}) | supply {} | next vote {}",
            amount,
            quote.total,
            quote.total_fee,
            self.collective.supply,
            next_vote_price,
        );

        Ok(next_vote_price)
    }
}

/// Accounts for selling votes
#[derive(Accounts)]
pub struct SellVotes<'info> {
    /// Seller
    #[account(mut)]
    pub trader: Signer<'info>,

    /// Protocol configuration
    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    /// Role registry (claimers trade while paused)
    #[account(
        seeds = [Roles::SEED],
        bump = roles.bump,
    )]
    pub roles: Box<Account<'info, Roles>>,

    /// Current season (absent before the first season)
    #[account(
        seeds = [Season::SEED, config.current_season.to_le_bytes().as_ref()],
        bump = season.bump,
    )]
    pub season: Option<Account<'info, Season>>,

    /// Collective being traded
    #[account(
        mut,
        seeds = [Collective::SEED, collective.authority.as_ref()],
        bump = collective.bump,
    )]
    pub collective: Box<Account<'info, Collective>>,

    /// Seller's votes in this collective
    #[account(
        mut,
        seeds = [VoteBalance::SEED, collective.key().as_ref(), trader.key().as_ref()],
        bump = trader_votes.bump,
    )]
    pub trader_votes: Box<Account<'info, VoteBalance>>,

    /// Payment mint
    #[account(
        constraint = payment_mint.key() == config.payment_mint @ VoteError::MintMismatch,
    )]
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Seller's payment account
    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = trader,
    )]
    pub trader_payment: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Protocol vault
    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = config,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receives the protocol fee
    #[account(
        mut,
        constraint = protocol_treasury.mint == config.payment_mint @ VoteError::MintMismatch,
        constraint = protocol_treasury.owner == config.fees.protocol_destination
            @ VoteError::TreasuryMismatch,
    )]
    pub protocol_treasury: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Collective treasury (receives the collective fee)
    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = collective,
    )]
    pub collective_treasury: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> SellVotes<'info> {
    /// Sell `amount` votes, receiving at least `min_value`
    ///
    /// Returns the amount paid out to the seller.
    pub fn sell_votes(&mut self, amount: u64, min_value: u64) -> Result<u64> {
        Season::require_tradeable(self.config.current_season, self.season.as_deref())?;

        let trader = self.trader.key();
        let is_claimer = self.roles.has_capability(&trader, Capability::Claimer);
        // Sellers have no bootstrap exemption
        self.config.require_can_trade(false, is_claimer)?;

        let supply = self.collective.supply;
        self.collective
            .record_sell(&trader, &mut self.trader_votes.amount, amount)?;

        let quote = self.config.quote_sell(supply, amount)?;
        quote.check_min(min_value)?;

        let config_seeds = &[Config::SEED, &[self.config.bump]];
        let signer_seeds = &[&config_seeds[..]];

        transfer_tokens(
            &self.token_program,
            &self.payment_mint,
            self.vault.to_account_info(),
            self.trader_payment.to_account_info(),
            self.config.to_account_info(),
            quote.total,
            signer_seeds,
        )?;
        transfer_tokens(
            &self.token_program,
            &self.payment_mint,
            self.vault.to_account_info(),
            self.protocol_treasury.to_account_info(),
            self.config.to_account_info(),
            quote.protocol_fee,
            signer_seeds,
        )?;
        transfer_tokens(
            &self.token_program,
            &self.payment_mint,
            self.vault.to_account_info(),
            self.collective_treasury.to_account_info(),
            self.config.to_account_info(),
            quote.collective_fee,
            signer_seeds,
        )?;

        self.config.accrue_sell(&quote)?;

        emit!(VotesSold {
            collective: self.collective.key(),
            seller: trader,
            amount,
            base_price: quote.base_price,
            protocol_fee: quote.protocol_fee,
            collective_fee: quote.collective_fee,
            pool_fee: quote.pool_fee,
            total_received: quote.total,
            seller_balance: self.trader_votes.amount,
            supply: self.collective.supply,
        });

        msg!(
            "Sold {} votes for {} (fees {}) | supply {}",
            amount,
            quote.total,
            quote.total_fee,
            self.collective.supply,
        );

        Ok(quote.total)
    }
}
