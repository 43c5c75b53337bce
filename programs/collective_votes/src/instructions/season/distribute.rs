//! Season Distribution
//!
//! Pays each collective its share of the season's prize pool, into the
//! collective's treasury.
//!
//! Remaining accounts come in triples:
//! `[collective_0, season_collective_0, treasury_0, collective_1, ...]`
//!
//! A collective the oracle never reported has no season record yet; it is
//! created here with exit round 0, paid for by the manager.
//!
//! The first call fixates the running pool into the season. Calls can be
//! repeated over any subset of collectives; the season closes once the paid
//! amount is within dust of the fixated pool.

use anchor_lang::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::error::VoteError;
use crate::instructions::payments::{
    check_treasury_address, create_pda_account, load_record, load_token_account, store_record,
    transfer_tokens,
};
use crate::state::{Capability, Collective, Config, Roles, Season, SeasonCollective};

#[event]
pub struct CollectivePaid {
    pub season_id: u64,
    pub collective: Pubkey,
    pub exit_round: u8,
    pub amount: u64,
}

#[event]
pub struct SeasonDistributed {
    pub season_id: u64,
    pub prize_pool: u64,
    pub distributed_pool: u64,
    pub is_distributed: bool,
}

#[derive(Accounts)]
pub struct DistributeSeason<'info> {
    #[account(
        mut,
        constraint = roles.has_capability(&manager.key(), Capability::Manager)
            @ VoteError::Unauthorized
    )]
    pub manager: Signer<'info>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        seeds = [Roles::SEED],
        bump = roles.bump,
    )]
    pub roles: Box<Account<'info, Roles>>,

    #[account(
        mut,
        seeds = [Season::SEED, config.current_season.to_le_bytes().as_ref()],
        bump = season.bump,
    )]
    pub season: Box<Account<'info, Season>>,

    #[account(
        constraint = payment_mint.key() == config.payment_mint @ VoteError::MintMismatch,
    )]
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Protocol vault (holds the pool)
    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = config,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

impl<'info> DistributeSeason<'info> {
    pub fn distribute_season(&mut self, remaining: &[AccountInfo<'info>]) -> Result<()> {
        require!(remaining.len() % 3 == 0, VoteError::ArrayLengthMismatch);

        self.season.begin_distribution(&mut self.config.prize_pool)?;

        let config_seeds = &[Config::SEED, &[self.config.bump]];
        let signer_seeds = &[&config_seeds[..]];

        let token_program = self.token_program.key();
        let mint = self.payment_mint.key();
        let mut paid = 0usize;

        for triple in remaining.chunks_exact(3) {
            let (collective_info, record_info, treasury_info) =
                (&triple[0], &triple[1], &triple[2]);

            load_record::<Collective>(collective_info)?;
            let mut record = self.load_or_open_record(collective_info.key(), record_info)?;
            let share = self.season.pay_collective(&mut record)?;

            // A freshly opened record is written even when nothing is paid
            store_record(record_info, &record)?;

            let Some(share) = share else {
                continue;
            };

            check_treasury_address(
                &treasury_info.key(),
                &record.collective,
                &mint,
                &token_program,
            )?;
            load_token_account(treasury_info, &token_program, &mint, &record.collective)?;

            transfer_tokens(
                &self.token_program,
                &self.payment_mint,
                self.vault.to_account_info(),
                treasury_info.clone(),
                self.config.to_account_info(),
                share,
                signer_seeds,
            )?;
            paid += 1;

            emit!(CollectivePaid {
                season_id: self.season.id,
                collective: record.collective,
                exit_round: record.exit_round,
                amount: share,
            });
        }

        let clock = Clock::get()?;
        let closed = self.season.close_if_drained(clock.slot);

        emit!(SeasonDistributed {
            season_id: self.season.id,
            prize_pool: self.season.prize_pool,
            distributed_pool: self.season.distributed_pool,
            is_distributed: closed,
        });

        msg!(
            "Season {}: paid {} collectives, {} of {} distributed{}",
            self.season.id,
            paid,
            self.season.distributed_pool,
            self.season.prize_pool,
            if closed { ", season closed" } else { "" }
        );

        Ok(())
    }

    /// Load the collective's season record, creating it at round 0 if the
    /// oracle never reported the collective
    fn load_or_open_record(
        &self,
        collective: Pubkey,
        record_info: &AccountInfo<'info>,
    ) -> Result<SeasonCollective> {
        let season_id = self.season.id.to_le_bytes();
        let (expected, bump) = Pubkey::find_program_address(
            &[SeasonCollective::SEED, season_id.as_ref(), collective.as_ref()],
            &crate::ID,
        );
        require_keys_eq!(record_info.key(), expected, ErrorCode::ConstraintSeeds);

        if !record_info.data_is_empty() {
            return load_record(record_info);
        }

        let record_seeds = &[
            SeasonCollective::SEED,
            season_id.as_ref(),
            collective.as_ref(),
            &[bump],
        ];
        create_pda_account(
            &self.system_program,
            self.manager.to_account_info(),
            record_info.clone(),
            8 + SeasonCollective::INIT_SPACE,
            &[&record_seeds[..]],
        )?;

        msg!("Opened round-0 record for unreported collective {}", collective);
        Ok(SeasonCollective::unreported(self.season.id, collective, bump))
    }
}
