//! Season State
//!
//! ## Lifecycle
//!
//! ```text
//!  NoSeason ──set_season──▶ Open ──oracle verifies──▶ Verified
//!                            ▲                           │
//!                            │                  first payout lands
//!                       set_season                       ▼
//!                      (id > current)              Distributing
//!                            │                           │
//!                            └──────── Closed ◀── pool drained (± dust)
//! ```
//!
//! Trading is open while a season exists, is not distributed and has paid
//! nothing out yet. Once `is_distributed` is set the record never changes.

use anchor_lang::prelude::*;

use crate::amm::bps_of;
use crate::constants::{DUST_THRESHOLD, MAX_ROUNDS, MIN_ROUNDS};
use crate::error::VoteError;

/// Per-season record
///
/// Seeds: ["season", id.to_le_bytes()]
#[account]
#[derive(InitSpace, Default)]
pub struct Season {
    pub id: u64,

    /// Pool fully paid out; the record is frozen
    pub is_distributed: bool,

    /// Oracle attested the final standings
    pub is_verified: bool,

    /// `prize_pool` has been copied from the running accumulator
    pub is_pool_fixated: bool,

    /// Slot the season opened
    pub start_slot: u64,

    /// Slot the season closed (0 while open)
    pub end_slot: u64,

    /// Pool fixated on the first distribution call
    pub prize_pool: u64,

    /// Amount paid out so far
    pub distributed_pool: u64,

    /// Number of rounds (table has `rounds_n + 1` entries)
    pub rounds_n: u8,

    /// Winning share in bps, indexed by exit round
    #[max_len(33)]
    pub round_to_winning_bps: Vec<u16>,

    pub bump: u8,
}

/// Per-collective season record
///
/// Seeds: ["season_collective", season_id.to_le_bytes(), collective]
#[account]
#[derive(InitSpace, Default)]
pub struct SeasonCollective {
    pub season_id: u64,

    /// Collective account (not its authority)
    pub collective: Pubkey,

    /// Round the collective exited in
    pub exit_round: u8,

    /// Payout for this season has landed
    pub is_distributed: bool,

    pub bump: u8,
}

impl SeasonCollective {
    pub const SEED: &'static [u8] = b"season_collective";

    /// Record for a collective the oracle never reported; it exited in round 0
    pub fn unreported(season_id: u64, collective: Pubkey, bump: u8) -> Self {
        Self {
            season_id,
            collective,
            exit_round: 0,
            is_distributed: false,
            bump,
        }
    }

    /// Redemption opens once this season's payout has landed
    pub fn require_distributed(record: Option<&SeasonCollective>) -> Result<()> {
        require!(
            record.is_some_and(|record| record.is_distributed),
            VoteError::CollectiveNotDistributed
        );
        Ok(())
    }
}

/// How `set_season` applies to the current season pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeasonTransition {
    /// First season ever
    Open,
    /// Rewrite the current, undistributed season
    Update,
    /// Start a new season after the current one closed
    Advance,
}

impl Season {
    pub const SEED: &'static [u8] = b"season";

    /// Decide how setting season `id` relates to `current_id`
    pub fn transition(
        current_id: u64,
        current: Option<&Season>,
        id: u64,
    ) -> Result<SeasonTransition> {
        require!(id > 0, VoteError::InvalidSeason);

        if current_id == 0 {
            return Ok(SeasonTransition::Open);
        }
        let current = current.ok_or(VoteError::SeasonNotTradeable)?;

        match id.cmp(&current_id) {
            std::cmp::Ordering::Less => err!(VoteError::InvalidSeason),
            std::cmp::Ordering::Equal => {
                require!(!current.is_distributed, VoteError::SeasonAlreadyDistributed);
                // Payouts already made were computed from the fixated table
                require!(!current.is_pool_fixated, VoteError::SeasonPoolFixated);
                Ok(SeasonTransition::Update)
            }
            std::cmp::Ordering::Greater => {
                require!(current.is_distributed, VoteError::SeasonInProgress);
                Ok(SeasonTransition::Advance)
            }
        }
    }

    /// Round count and table length must agree
    pub fn validate_schedule(rounds_n: u8, winning_bps: &[u16]) -> Result<()> {
        require!(
            (MIN_ROUNDS..=MAX_ROUNDS).contains(&rounds_n),
            VoteError::InvalidSeason
        );
        require!(
            winning_bps.len() == rounds_n as usize + 1,
            VoteError::ArrayLengthMismatch
        );
        Ok(())
    }

    /// Write the schedule; a fresh season also resets every counter
    pub fn configure(
        &mut self,
        id: u64,
        transition: SeasonTransition,
        rounds_n: u8,
        winning_bps: Vec<u16>,
        slot: u64,
        bump: u8,
    ) {
        match transition {
            SeasonTransition::Open | SeasonTransition::Advance => {
                *self = Season {
                    id,
                    start_slot: slot,
                    rounds_n,
                    round_to_winning_bps: winning_bps,
                    bump,
                    ..Default::default()
                };
            }
            SeasonTransition::Update => {
                self.rounds_n = rounds_n;
                self.round_to_winning_bps = winning_bps;
            }
        }
    }

    /// Open for trading: not closed and nothing paid out yet
    pub fn is_tradeable(&self) -> bool {
        !self.is_distributed && self.distributed_pool == 0
    }

    /// Trading needs a current season that is still open
    pub fn require_tradeable(current_id: u64, season: Option<&Season>) -> Result<()> {
        let season = season
            .filter(|_| current_id != 0)
            .ok_or(VoteError::SeasonNotTradeable)?;
        require!(season.is_tradeable(), VoteError::SeasonNotTradeable);
        Ok(())
    }

    /// Copy the running pool into this season once, then check payout gates
    pub fn begin_distribution(&mut self, accumulator: &mut u64) -> Result<()> {
        require!(!self.is_distributed, VoteError::SeasonAlreadyDistributed);
        require!(self.is_verified, VoteError::SeasonNotVerified);

        if !self.is_pool_fixated {
            self.prize_pool = *accumulator;
            self.is_pool_fixated = true;
            *accumulator = 0;
        }
        Ok(())
    }

    /// Share of the fixated pool for a collective that exited in `round`
    pub fn winning_share(&self, round: u8) -> Result<u64> {
        let bps = self
            .round_to_winning_bps
            .get(round as usize)
            .copied()
            .unwrap_or(0);
        bps_of(self.prize_pool, bps)
    }

    /// Pay one collective; `None` means skipped
    ///
    /// Already-paid collectives are skipped. A zero share is also skipped and
    /// left unpaid so a later call sees the record again.
    pub fn pay_collective(&mut self, record: &mut SeasonCollective) -> Result<Option<u64>> {
        require!(record.season_id == self.id, VoteError::SeasonMismatch);

        if record.is_distributed {
            return Ok(None);
        }

        let share = self.winning_share(record.exit_round)?;
        if share == 0 {
            return Ok(None);
        }

        record.is_distributed = true;
        self.distributed_pool = self
            .distributed_pool
            .checked_add(share)
            .ok_or(VoteError::MathOverflow)?;
        Ok(Some(share))
    }

    /// Close the season once the pool is paid out, tolerating dust
    pub fn close_if_drained(&mut self, slot: u64) -> bool {
        if self.prize_pool.abs_diff(self.distributed_pool) < DUST_THRESHOLD {
            self.is_distributed = true;
            self.end_slot = slot;
        }
        self.is_distributed
    }

    /// Fixated funds still owed to collectives
    pub fn outstanding(&self) -> u64 {
        if self.is_pool_fixated && !self.is_distributed {
            self.prize_pool.saturating_sub(self.distributed_pool)
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_season(id: u64, table: Vec<u16>) -> Season {
        let mut season = Season::default();
        let rounds_n = (table.len() - 1) as u8;
        season.configure(id, SeasonTransition::Open, rounds_n, table, 100, 254);
        season
    }

    fn record(season: &Season, exit_round: u8) -> SeasonCollective {
        SeasonCollective {
            season_id: season.id,
            collective: Pubkey::new_unique(),
            exit_round,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_season_opens_with_any_nonzero_id() {
        assert_eq!(Season::transition(0, None, 3).unwrap(), SeasonTransition::Open);

        let err = Season::transition(0, None, 0).unwrap_err();
        assert_eq!(err, VoteError::InvalidSeason.into());
    }

    #[test]
    fn test_transitions_against_current() {
        let mut current = open_season(2, vec![0, 5_000, 5_000]);

        assert_eq!(
            Season::transition(2, Some(&current), 2).unwrap(),
            SeasonTransition::Update
        );
        let err = Season::transition(2, Some(&current), 1).unwrap_err();
        assert_eq!(err, VoteError::InvalidSeason.into());
        let err = Season::transition(2, Some(&current), 3).unwrap_err();
        assert_eq!(err, VoteError::SeasonInProgress.into());

        current.is_distributed = true;
        assert_eq!(
            Season::transition(2, Some(&current), 3).unwrap(),
            SeasonTransition::Advance
        );
        let err = Season::transition(2, Some(&current), 2).unwrap_err();
        assert_eq!(err, VoteError::SeasonAlreadyDistributed.into());
    }

    #[test]
    fn test_schedule_length_must_match_rounds() {
        assert!(Season::validate_schedule(3, &[1_000, 2_000, 3_000, 4_000]).is_ok());

        let err = Season::validate_schedule(3, &[5_000, 2_500, 2_500]).unwrap_err();
        assert_eq!(err, VoteError::ArrayLengthMismatch.into());
        let err = Season::validate_schedule(3, &[2_000; 5]).unwrap_err();
        assert_eq!(err, VoteError::ArrayLengthMismatch.into());

        let err = Season::validate_schedule(1, &[5_000, 5_000]).unwrap_err();
        assert_eq!(err, VoteError::InvalidSeason.into());
    }

    #[test]
    fn test_update_preserves_start_slot() {
        let mut season = open_season(1, vec![0, 5_000, 5_000]);
        season.is_verified = true;

        season.configure(1, SeasonTransition::Update, 3, vec![0, 0, 5_000, 5_000], 999, 1);
        assert_eq!(season.start_slot, 100);
        assert_eq!(season.rounds_n, 3);
        assert!(season.is_verified);
        assert_eq!(season.bump, 254);

        season.configure(2, SeasonTransition::Advance, 2, vec![0, 0, 10_000], 999, 7);
        assert_eq!(season.start_slot, 999);
        assert!(!season.is_verified);
        assert_eq!(season.bump, 7);
    }

    #[test]
    fn test_schedule_frozen_once_pool_fixated() {
        let mut season = open_season(1, vec![0, 5_000, 5_000]);
        season.is_verified = true;
        season.begin_distribution(&mut 1_000).unwrap();

        let mut first = record(&season, 1);
        assert_eq!(season.pay_collective(&mut first).unwrap(), Some(500));

        let err = Season::transition(1, Some(&season), 1).unwrap_err();
        assert_eq!(err, VoteError::SeasonPoolFixated.into());

        // The season can still drain and advance normally
        let mut second = record(&season, 2);
        assert_eq!(season.pay_collective(&mut second).unwrap(), Some(500));
        assert!(season.close_if_drained(300));
        assert_eq!(
            Season::transition(1, Some(&season), 2).unwrap(),
            SeasonTransition::Advance
        );
    }

    #[test]
    fn test_trading_window() {
        let mut season = open_season(1, vec![0, 5_000, 5_000]);

        let err = Season::require_tradeable(0, None).unwrap_err();
        assert_eq!(err, VoteError::SeasonNotTradeable.into());
        assert!(Season::require_tradeable(1, Some(&season)).is_ok());

        // first payout suspends trading
        season.distributed_pool = 1;
        let err = Season::require_tradeable(1, Some(&season)).unwrap_err();
        assert_eq!(err, VoteError::SeasonNotTradeable.into());

        season.distributed_pool = 0;
        season.is_distributed = true;
        assert!(Season::require_tradeable(1, Some(&season)).is_err());
    }

    #[test]
    fn test_distribution_requires_verification() {
        let mut season = open_season(1, vec![0, 5_000, 5_000]);
        let mut pool = 1_000;

        let err = season.begin_distribution(&mut pool).unwrap_err();
        assert_eq!(err, VoteError::SeasonNotVerified.into());
        assert_eq!(pool, 1_000);
    }

    #[test]
    fn test_pool_is_fixated_once() {
        let mut season = open_season(1, vec![0, 5_000, 5_000]);
        season.is_verified = true;
        let mut pool = 1_000;

        season.begin_distribution(&mut pool).unwrap();
        assert_eq!(season.prize_pool, 1_000);
        assert_eq!(pool, 0);

        // fees accrued later belong to the next season
        pool = 50;
        season.begin_distribution(&mut pool).unwrap();
        assert_eq!(season.prize_pool, 1_000);
        assert_eq!(pool, 50);
    }

    #[test]
    fn test_payout_is_idempotent_per_collective() {
        let mut season = open_season(1, vec![0, 2_500, 7_500]);
        season.is_verified = true;
        season.begin_distribution(&mut 1_000).unwrap();

        let mut winner = record(&season, 2);
        assert_eq!(season.pay_collective(&mut winner).unwrap(), Some(750));
        assert_eq!(season.pay_collective(&mut winner).unwrap(), None);
        assert_eq!(season.distributed_pool, 750);
        assert!(!season.is_tradeable());
        assert!(!season.close_if_drained(500));

        let mut runner_up = record(&season, 1);
        assert_eq!(season.pay_collective(&mut runner_up).unwrap(), Some(250));
        assert!(season.close_if_drained(500));
        assert_eq!(season.end_slot, 500);
        assert_eq!(season.outstanding(), 0);
    }

    #[test]
    fn test_zero_share_stays_unpaid() {
        let mut season = open_season(1, vec![0, 5_000, 5_000]);
        season.is_verified = true;
        season.begin_distribution(&mut 1_000).unwrap();

        let mut first_out = record(&season, 0);
        assert_eq!(season.pay_collective(&mut first_out).unwrap(), None);
        assert!(!first_out.is_distributed);
        assert!(season.is_tradeable());
    }

    #[test]
    fn test_unreported_collective_takes_round_zero_share() {
        let mut season = open_season(1, vec![2_000, 3_000, 5_000]);
        season.is_verified = true;
        season.begin_distribution(&mut 1_000).unwrap();

        let mut unreported = SeasonCollective::unreported(season.id, Pubkey::new_unique(), 253);
        assert_eq!(unreported.exit_round, 0);
        assert_eq!(season.pay_collective(&mut unreported).unwrap(), Some(200));
        assert!(unreported.is_distributed);

        let mut second = record(&season, 1);
        let mut winner = record(&season, 2);
        season.pay_collective(&mut second).unwrap();
        season.pay_collective(&mut winner).unwrap();
        assert!(season.close_if_drained(9));
    }

    #[test]
    fn test_redeem_waits_for_payout() {
        let err = SeasonCollective::require_distributed(None).unwrap_err();
        assert_eq!(err, VoteError::CollectiveNotDistributed.into());

        let mut season = open_season(1, vec![0, 5_000, 5_000]);
        let mut winner = record(&season, 2);
        let err = SeasonCollective::require_distributed(Some(&winner)).unwrap_err();
        assert_eq!(err, VoteError::CollectiveNotDistributed.into());

        season.is_verified = true;
        season.begin_distribution(&mut 1_000).unwrap();
        season.pay_collective(&mut winner).unwrap();
        assert!(SeasonCollective::require_distributed(Some(&winner)).is_ok());
    }

    #[test]
    fn test_dust_tolerance_closes_season() {
        // 9_999 bps in total: floor leaves one unit behind
        let mut season = open_season(1, vec![0, 4_999, 5_000]);
        season.is_verified = true;
        season.begin_distribution(&mut 1_000).unwrap();

        let mut a = record(&season, 1);
        let mut b = record(&season, 2);
        season.pay_collective(&mut a).unwrap();
        season.pay_collective(&mut b).unwrap();

        assert_eq!(season.distributed_pool, 999);
        assert!(season.close_if_drained(42));
        assert!(season.is_distributed);
    }

    #[test]
    fn test_residue_above_dust_keeps_season_open() {
        let mut season = open_season(1, vec![0, 4_000, 5_000]);
        season.is_verified = true;
        season.begin_distribution(&mut 1_000).unwrap();

        let mut a = record(&season, 1);
        let mut b = record(&season, 2);
        season.pay_collective(&mut a).unwrap();
        season.pay_collective(&mut b).unwrap();

        assert_eq!(season.outstanding(), 100);
        assert!(!season.close_if_drained(42));
        assert_eq!(season.end_slot, 0);
    }

    #[test]
    fn test_empty_pool_closes_immediately() {
        let mut season = open_season(1, vec![0, 5_000, 5_000]);
        season.is_verified = true;
        season.begin_distribution(&mut 0).unwrap();

        assert!(season.close_if_drained(7));
        let err = season.begin_distribution(&mut 0).unwrap_err();
        assert_eq!(err, VoteError::SeasonAlreadyDistributed.into());
    }

    #[test]
    fn test_record_from_other_season_rejected() {
        let mut season = open_season(2, vec![0, 5_000, 5_000]);
        let mut stale = SeasonCollective {
            season_id: 1,
            exit_round: 2,
            ..Default::default()
        };
        let err = season.pay_collective(&mut stale).unwrap_err();
        assert_eq!(err, VoteError::SeasonMismatch.into());
    }
}
