//! Oracle Feed
//!
//! The oracle pushes two kinds of facts about the current season:
//! - the round each collective exited in (any time before the season closes)
//! - whether the final standings are verified (only while trading is open)
//!
//! Values are trusted as pushed; the latest write wins.

use anchor_lang::prelude::*;

use crate::error::VoteError;
use crate::state::{Capability, Collective, Config, Roles, Season, SeasonCollective};

#[event]
pub struct ExitRoundRecorded {
    pub season_id: u64,
    pub collective: Pubkey,
    pub exit_round: u8,
    pub oracle: Pubkey,
}

#[event]
pub struct VerificationRecorded {
    pub season_id: u64,
    pub is_verified: bool,
    pub oracle: Pubkey,
}

#[derive(Accounts)]
pub struct RecordExitRound<'info> {
    #[account(
        mut,
        constraint = roles.has_capability(&oracle.key(), Capability::Oracle)
            @ VoteError::Unauthorized
    )]
    pub oracle: Signer<'info>,

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
        seeds = [Season::SEED, config.current_season.to_le_bytes().as_ref()],
        bump = season.bump,
    )]
    pub season: Option<Account<'info, Season>>,

    #[account(
        seeds = [Collective::SEED, collective.authority.as_ref()],
        bump = collective.bump,
    )]
    pub collective: Account<'info, Collective>,

    #[account(
        init_if_needed,
        payer = oracle,
        space = 8 + SeasonCollective::INIT_SPACE,
        seeds = [
            SeasonCollective::SEED,
            config.current_season.to_le_bytes().as_ref(),
            collective.key().as_ref(),
        ],
        bump,
    )]
    pub season_collective: Account<'info, SeasonCollective>,

    pub system_program: Program<'info, System>,
}

impl<'info> RecordExitRound<'info> {
    pub fn record_exit_round(
        &mut self,
        exit_round: u8,
        bumps: &RecordExitRoundBumps,
    ) -> Result<()> {
        let season = self
            .season
            .as_deref()
            .filter(|season| self.config.current_season != 0 && !season.is_distributed)
            .ok_or(VoteError::SeasonNotTradeable)?;
        require!(exit_round <= season.rounds_n, VoteError::InvalidRound);

        let season_id = season.id;
        let record = &mut self.season_collective;
        if record.season_id == 0 {
            record.season_id = season_id;
            record.collective = self.collective.key();
            record.bump = bumps.season_collective;
        }
        record.exit_round = exit_round;

        emit!(ExitRoundRecorded {
            season_id,
            collective: self.collective.key(),
            exit_round,
            oracle: self.oracle.key(),
        });

        msg!(
            "Season {}: collective {} exited in round {}",
            season_id,
            self.collective.key(),
            exit_round
        );
        Ok(())
    }
}

#[derive(Accounts)]
pub struct RecordVerification<'info> {
    #[account(
        constraint = roles.has_capability(&oracle.key(), Capability::Oracle)
            @ VoteError::Unauthorized
    )]
    pub oracle: Signer<'info>,

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
        mut,
        seeds = [Season::SEED, config.current_season.to_le_bytes().as_ref()],
        bump = season.bump,
    )]
    pub season: Option<Account<'info, Season>>,
}

impl<'info> RecordVerification<'info> {
    pub fn record_verification(&mut self, is_verified: bool) -> Result<()> {
        Season::require_tradeable(self.config.current_season, self.season.as_deref())?;
        let season = self
            .season
            .as_deref_mut()
            .ok_or(VoteError::SeasonNotTradeable)?;

        season.is_verified = is_verified;

        emit!(VerificationRecorded {
            season_id: season.id,
            is_verified,
            oracle: self.oracle.key(),
        });

        msg!("Season {} verified: {}", season.id, is_verified);
        Ok(())
    }
}
