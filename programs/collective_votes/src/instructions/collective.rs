use anchor_lang::prelude::*;

use crate::error::VoteError;
use crate::state::Collective;

#[event]
pub struct CollectiveRenamed {
    pub collective: Pubkey,
    pub name: String,
}

/// Only the collective's own address can rename it
#[derive(Accounts)]
pub struct RenameCollective<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [Collective::SEED, authority.key().as_ref()],
        bump = collective.bump,
        constraint = collective.authority == authority.key() @ VoteError::Unauthorized,
    )]
    pub collective: Account<'info, Collective>,
}

impl<'info> RenameCollective<'info> {
    pub fn rename_collective(&mut self, name: String) -> Result<()> {
        self.collective.rename(name)?;

        emit!(CollectiveRenamed {
            collective: self.collective.key(),
            name: self.collective.name.clone(),
        });

        msg!("Collective {} renamed to {}", self.collective.key(), self.collective.name);
        Ok(())
    }
}
