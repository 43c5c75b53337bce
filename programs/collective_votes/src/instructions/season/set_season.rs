//! Season Scheduling
//!
//! Managers open the first season, rewrite the current one while it is
//! undistributed, or advance to a higher id once the current one closed.

use anchor_lang::prelude::*;

use crate::error::VoteError;
use crate::state::{Capability, Config, Roles, Season, SeasonTransition};

/// Event emitted when a season is opened or rescheduled
#[event]
pub struct SeasonSet {
    pub season_id: u64,
    pub manager: Pubkey,
    pub rounds_n: u8,
    pub winning_bps: Vec<u16>,
    pub start_slot: u64,
    pub advanced: bool,
}

#[derive(Accounts)]
#[instruction(season_id: u64)]
pub struct SetSeason<'info> {
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
    pub config: Account<'info, Config>,

    #[account(
        seeds = [Roles::SEED],
        bump = roles.bump,
    )]
    pub roles: Account<'info, Roles>,

    /// Season the pointer refers to now (absent before the first season)
    #[account(
        seeds = [Season::SEED, config.current_season.to_le_bytes().as_ref()],
        bump = current_season.bump,
    )]
    pub current_season: Option<Account<'info, Season>>,

    /// Season being written
    #[account(
        init_if_needed,
        payer = manager,
        space = 8 + Season::INIT_SPACE,
        seeds = [Season::SEED, season_id.to_le_bytes().as_ref()],
        bump,
    )]
    pub season: Account<'info, Season>,

    pub system_program: Program<'info, System>,
}

impl<'info> SetSeason<'info> {
    pub fn set_season(
        &mut self,
        season_id: u64,
        rounds_n: u8,
        winning_bps: Vec<u16>,
        bumps: &SetSeasonBumps,
    ) -> Result<()> {
        Season::validate_schedule(rounds_n, &winning_bps)?;

        let current_id = self.config.current_season;
        let transition = Season::transition(current_id, self.current_season.as_deref(), season_id)?;

        let clock = Clock::get()?;
        self.season.configure(
            season_id,
            transition,
            rounds_n,
            winning_bps.clone(),
            clock.slot,
            bumps.season,
        );
        self.config.current_season = season_id;

        emit!(SeasonSet {
            season_id,
            manager: self.manager.key(),
            rounds_n,
            winning_bps,
            start_slot: self.season.start_slot,
            advanced: transition != SeasonTransition::Update,
        });

        msg!(
            "Season {} set ({:?}): {} rounds, start slot {}",
            season_id,
            transition,
            rounds_n,
            self.season.start_slot
        );

        Ok(())
    }
}
