//! Protocol Initialization
//!
//! Creates the global configuration, the role registry and the vault that
//! holds curve reserves and the prize pool. Called once at deployment.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::amm::LinearCurve;
use crate::error::VoteError;
use crate::state::{Config, FeeStructure, Roles};

/// Event emitted when the protocol is initialized
#[event]
pub struct ProtocolInitialized {
    pub admin: Pubkey,
    pub payment_mint: Pubkey,
    pub unit: u64,
    pub curve_denominator: u64,
    pub fees: FeeStructure,
}

/// Accounts required for protocol initialization
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Protocol administrator (becomes the admin)
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Global configuration account (created)
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [Config::SEED],
        bump,
    )]
    pub config: Account<'info, Config>,

    /// Role registry (created empty)
    #[account(
        init,
        payer = admin,
        space = 8 + Roles::INIT_SPACE,
        seeds = [Roles::SEED],
        bump,
    )]
    pub roles: Account<'info, Roles>,

    /// Token votes are paid in (e.g., USDC)
    pub payment_mint: InterfaceAccount<'info, Mint>,

    /// Vault for curve reserves and the prize pool
    #[account(
        init,
        payer = admin,
        associated_token::mint = payment_mint,
        associated_token::authority = config,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    /// Initialize the protocol configuration
    pub fn initialize(
        &mut self,
        curve_denominator: u64,
        fees: FeeStructure,
        bumps: &InitializeBumps,
    ) -> Result<()> {
        require!(curve_denominator > 0, VoteError::InvalidCurve);
        fees.validate()?;

        let curve = LinearCurve::from_decimals(self.payment_mint.decimals, curve_denominator)?;

        self.config.set_inner(Config {
            admin: self.admin.key(),
            payment_mint: self.payment_mint.key(),
            unit: curve.unit,
            curve_denominator,
            fees,
            paused: false,
            current_season: 0,
            prize_pool: 0,
            curve_reserve: 0,
            bump: bumps.config,
        });

        self.roles.set_inner(Roles {
            oracles: Vec::new(),
            managers: Vec::new(),
            claimer: Pubkey::default(),
            bump: bumps.roles,
        });

        emit!(ProtocolInitialized {
            admin: self.admin.key(),
            payment_mint: self.payment_mint.key(),
            unit: curve.unit,
            curve_denominator,
            fees,
        });

        msg!("Protocol initialized!");
        msg!("Admin: {}", self.admin.key());
        msg!("Unit: {} | Curve denominator: {}", curve.unit, curve_denominator);
        msg!(
            "Fees: pool {} bps, collective {} bps, protocol {} bps",
            fees.pool_bps,
            fees.collective_bps,
            fees.protocol_bps
        );

        Ok(())
    }
}
