//! Admin Controls
//!
//! Fee schedule, trading pause and role assignments. All of these are
//! restricted to the config admin.

use anchor_lang::prelude::*;

use crate::error::VoteError;
use crate::state::{Capability, Config, FeeStructure, Roles};

#[event]
pub struct FeeStructureUpdated {
    pub admin: Pubkey,
    pub fees: FeeStructure,
}

#[event]
pub struct PauseUpdated {
    pub admin: Pubkey,
    pub paused: bool,
}

#[event]
pub struct RoleUpdated {
    pub admin: Pubkey,
    pub account: Pubkey,
    pub capability: Capability,
    pub enabled: bool,
}

/// Accounts for config updates
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        constraint = admin.key() == config.admin @ VoteError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,
}

impl<'info> UpdateConfig<'info> {
    pub fn set_fee_structure(&mut self, fees: FeeStructure) -> Result<()> {
        fees.validate()?;
        self.config.fees = fees;

        emit!(FeeStructureUpdated {
            admin: self.admin.key(),
            fees,
        });

        msg!(
            "Fees set: pool {} bps, collective {} bps, protocol {} bps -> {}",
            fees.pool_bps,
            fees.collective_bps,
            fees.protocol_bps,
            fees.protocol_destination
        );
        Ok(())
    }

    pub fn set_pause(&mut self, paused: bool) -> Result<()> {
        self.config.paused = paused;

        emit!(PauseUpdated {
            admin: self.admin.key(),
            paused,
        });

        msg!("Trading paused: {}", paused);
        Ok(())
    }
}

/// Accounts for role assignment
#[derive(Accounts)]
pub struct UpdateRoles<'info> {
    #[account(
        constraint = admin.key() == config.admin @ VoteError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [Roles::SEED],
        bump = roles.bump,
    )]
    pub roles: Account<'info, Roles>,
}

impl<'info> UpdateRoles<'info> {
    pub fn set_role(
        &mut self,
        capability: Capability,
        account: Pubkey,
        enabled: bool,
    ) -> Result<()> {
        if enabled {
            self.roles.grant(account, capability)?;
        } else {
            self.roles.revoke(&account, capability);
        }

        emit!(RoleUpdated {
            admin: self.admin.key(),
            account,
            capability,
            enabled,
        });

        msg!("Role {:?} for {}: {}", capability, account, enabled);
        Ok(())
    }
}
