//! Vote Transfers
//!
//! Holders cannot move votes themselves; the claimer moves them in bulk.
//! Each move is a `(from, to)` pair of `VoteBalance` accounts passed as
//! remaining accounts, matched by index with `amounts`.

use anchor_lang::prelude::*;

use crate::error::VoteError;
use crate::instructions::payments::{load_record, store_record};
use crate::state::{Capability, Collective, Roles, VoteBalance};

#[event]
pub struct VoteBalanceOpened {
    pub collective: Pubkey,
    pub holder: Pubkey,
}

#[event]
pub struct VotesTransferred {
    pub collective: Pubkey,
    pub claimer: Pubkey,
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u64,
    pub from_balance: u64,
    pub to_balance: u64,
}

/// Creates an empty balance record so it can receive transfers
#[derive(Accounts)]
pub struct OpenVoteBalance<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: any account may hold votes
    pub holder: UncheckedAccount<'info>,

    #[account(
        seeds = [Collective::SEED, collective.authority.as_ref()],
        bump = collective.bump,
    )]
    pub collective: Account<'info, Collective>,

    #[account(
        init,
        payer = payer,
        space = 8 + VoteBalance::INIT_SPACE,
        seeds = [VoteBalance::SEED, collective.key().as_ref(), holder.key().as_ref()],
        bump,
    )]
    pub votes: Account<'info, VoteBalance>,

    pub system_program: Program<'info, System>,
}

impl<'info> OpenVoteBalance<'info> {
    pub fn open_vote_balance(&mut self, bumps: &OpenVoteBalanceBumps) -> Result<()> {
        self.votes.set_inner(VoteBalance {
            collective: self.collective.key(),
            holder: self.holder.key(),
            amount: 0,
            bump: bumps.votes,
        });

        emit!(VoteBalanceOpened {
            collective: self.collective.key(),
            holder: self.holder.key(),
        });
        Ok(())
    }
}

/// Accounts for claimer batch transfers
///
/// Remaining accounts: `[from_0, to_0, from_1, to_1, ...]`, all writable
/// `VoteBalance` records of `collective`.
#[derive(Accounts)]
pub struct BatchTransfer<'info> {
    #[account(
        constraint = roles.has_capability(&claimer.key(), Capability::Claimer)
            @ VoteError::Unauthorized
    )]
    pub claimer: Signer<'info>,

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
}

impl<'info> BatchTransfer<'info> {
    pub fn batch_transfer(
        &mut self,
        amounts: Vec<u64>,
        balances: &[AccountInfo<'info>],
    ) -> Result<()> {
        require!(
            balances.len() == amounts.len() * 2,
            VoteError::ArrayLengthMismatch
        );

        let collective_key = self.collective.key();

        for (pair, amount) in balances.chunks_exact(2).zip(amounts) {
            let (from_info, to_info) = (&pair[0], &pair[1]);
            require_keys_neq!(from_info.key(), to_info.key(), VoteError::SelfTransfer);

            // Reload every iteration so repeated accounts see earlier moves
            let mut from: VoteBalance = load_record(from_info)?;
            let mut to: VoteBalance = load_record(to_info)?;
            require_keys_eq!(from.collective, collective_key, VoteError::CollectiveMismatch);
            require_keys_eq!(to.collective, collective_key, VoteError::CollectiveMismatch);

            self.collective
                .record_transfer(&from.holder, &mut from.amount, &mut to.amount, amount)?;

            store_record(from_info, &from)?;
            store_record(to_info, &to)?;

            emit!(VotesTransferred {
                collective: collective_key,
                claimer: self.claimer.key(),
                from: from.holder,
                to: to.holder,
                amount,
                from_balance: from.amount,
                to_balance: to.amount,
            });
        }

        msg!("Claimer moved votes in {} transfers", balances.len() / 2);
        Ok(())
    }
}
