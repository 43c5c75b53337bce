//! Role Registry
//!
//! Capabilities are looked up, not inherited: every gated instruction asks
//! `has_capability(signer, capability)` against this admin-maintained store.

use anchor_lang::prelude::*;

use crate::constants::MAX_ROLE_MEMBERS;
use crate::error::VoteError;

/// Privileges consulted by gated instructions
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Capability {
    /// Pushes exit rounds and verification flags
    Oracle,
    /// Sets seasons and runs distributions
    Manager,
    /// Moves votes in bulk and trades while paused
    Claimer,
}

/// Role assignment store (singleton PDA)
///
/// Seeds: ["roles"]
#[account]
#[derive(InitSpace)]
pub struct Roles {
    #[max_len(8)]
    pub oracles: Vec<Pubkey>,

    #[max_len(8)]
    pub managers: Vec<Pubkey>,

    /// The single claimer account (default key = unset)
    pub claimer: Pubkey,

    pub bump: u8,
}

impl Roles {
    pub const SEED: &'static [u8] = b"roles";

    pub fn has_capability(&self, account: &Pubkey, capability: Capability) -> bool {
        match capability {
            Capability::Oracle => self.oracles.contains(account),
            Capability::Manager => self.managers.contains(account),
            Capability::Claimer => {
                self.claimer != Pubkey::default() && self.claimer == *account
            }
        }
    }

    pub fn grant(&mut self, account: Pubkey, capability: Capability) -> Result<()> {
        let members = match capability {
            Capability::Oracle => &mut self.oracles,
            Capability::Manager => &mut self.managers,
            Capability::Claimer => {
                self.claimer = account;
                return Ok(());
            }
        };

        if !members.contains(&account) {
            require!(members.len() < MAX_ROLE_MEMBERS, VoteError::RoleListFull);
            members.push(account);
        }
        Ok(())
    }

    pub fn revoke(&mut self, account: &Pubkey, capability: Capability) {
        match capability {
            Capability::Oracle => self.oracles.retain(|member| member != account),
            Capability::Manager => self.managers.retain(|member| member != account),
            Capability::Claimer => {
                if self.claimer == *account {
                    self.claimer = Pubkey::default();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Roles {
        Roles {
            oracles: vec![],
            managers: vec![],
            claimer: Pubkey::default(),
            bump: 255,
        }
    }

    #[test]
    fn test_grant_and_revoke() {
        let mut roles = empty();
        let oracle = Pubkey::new_unique();

        assert!(!roles.has_capability(&oracle, Capability::Oracle));
        roles.grant(oracle, Capability::Oracle).unwrap();
        roles.grant(oracle, Capability::Oracle).unwrap();
        assert_eq!(roles.oracles.len(), 1);
        assert!(roles.has_capability(&oracle, Capability::Oracle));
        assert!(!roles.has_capability(&oracle, Capability::Manager));

        roles.revoke(&oracle, Capability::Oracle);
        assert!(!roles.has_capability(&oracle, Capability::Oracle));
    }

    #[test]
    fn test_claimer_slot_is_single() {
        let mut roles = empty();
        let first = Pubkey::new_unique();
        let second = Pubkey::new_unique();

        // unset claimer never matches the default key
        assert!(!roles.has_capability(&Pubkey::default(), Capability::Claimer));

        roles.grant(first, Capability::Claimer).unwrap();
        roles.grant(second, Capability::Claimer).unwrap();
        assert!(!roles.has_capability(&first, Capability::Claimer));
        assert!(roles.has_capability(&second, Capability::Claimer));

        roles.revoke(&first, Capability::Claimer);
        assert!(roles.has_capability(&second, Capability::Claimer));
    }

    #[test]
    fn test_role_list_is_bounded() {
        let mut roles = empty();
        for _ in 0..MAX_ROLE_MEMBERS {
            roles.grant(Pubkey::new_unique(), Capability::Manager).unwrap();
        }
        let err = roles
            .grant(Pubkey::new_unique(), Capability::Manager)
            .unwrap_err();
        assert_eq!(err, VoteError::RoleListFull.into());
    }
}
