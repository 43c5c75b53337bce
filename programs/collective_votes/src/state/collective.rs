//! Collective Vote Ledger
//!
//! Each collective keeps its supply and burnt count; holder balances live in
//! separate `VoteBalance` accounts, one per (collective, holder).
//!
//! ## Invariants
//! - `supply >= burnt`
//! - `sum(holder balances) + burnt == supply` (burnt votes sit in a
//!   retirement sink, so with no redemptions the balances sum to supply)
//! - once bootstrapped, the collective's own address keeps at least one vote

use anchor_lang::prelude::*;

use crate::constants::MAX_NAME_LEN;
use crate::error::VoteError;

/// A collective whose votes trade on the curve
///
/// Seeds: ["collective", authority]
#[account]
#[derive(InitSpace, Default)]
pub struct Collective {
    /// The collective's own address
    pub authority: Pubkey,

    /// Display name (empty until renamed)
    #[max_len(32)]
    pub name: String,

    /// Total votes issued
    pub supply: u64,

    /// Votes retired through redemption
    pub burnt: u64,

    /// PDA bump seed
    pub bump: u8,
}

/// Votes held by one account in one collective
///
/// Seeds: ["votes", collective, holder]
#[account]
#[derive(InitSpace, Default)]
pub struct VoteBalance {
    pub collective: Pubkey,
    pub holder: Pubkey,
    pub amount: u64,
    pub bump: u8,
}

impl VoteBalance {
    pub const SEED: &'static [u8] = b"votes";
}

impl Collective {
    pub const SEED: &'static [u8] = b"collective";

    /// Votes not yet retired
    pub fn active_supply(&self) -> u64 {
        self.supply.saturating_sub(self.burnt)
    }

    fn is_own(&self, account: &Pubkey) -> bool {
        self.authority == *account
    }

    /// The collective's own address can never give up its last vote
    fn check_spendable(&self, account: &Pubkey, balance: u64, amount: u64) -> Result<()> {
        if self.is_own(account) {
            require!(amount < balance, VoteError::InsufficientVotes);
        } else {
            require!(amount <= balance, VoteError::InsufficientVotes);
        }
        Ok(())
    }

    /// Issue `amount` votes to `buyer`
    ///
    /// An empty collective only accepts a buy from its own address.
    pub fn record_buy(&mut self, buyer: &Pubkey, balance: &mut u64, amount: u64) -> Result<()> {
        require!(amount > 0, VoteError::ZeroAmount);
        require!(
            self.supply > 0 || self.is_own(buyer),
            VoteError::CollectiveNotInitialized
        );

        self.supply = self.supply.checked_add(amount).ok_or(VoteError::MathOverflow)?;
        *balance = balance.checked_add(amount).ok_or(VoteError::MathOverflow)?;
        Ok(())
    }

    /// Retire `amount` of `seller`'s votes back into the curve
    pub fn record_sell(&mut self, seller: &Pubkey, balance: &mut u64, amount: u64) -> Result<()> {
        require!(amount > 0, VoteError::ZeroAmount);
        require!(amount < self.active_supply(), VoteError::InsufficientVotes);
        self.check_spendable(seller, *balance, amount)?;

        self.supply -= amount;
        *balance -= amount;
        Ok(())
    }

    /// Move votes between holders; supply is unchanged
    pub fn record_transfer(
        &self,
        from: &Pubkey,
        from_balance: &mut u64,
        to_balance: &mut u64,
        amount: u64,
    ) -> Result<()> {
        require!(amount > 0, VoteError::ZeroAmount);
        self.check_spendable(from, *from_balance, amount)?;

        *to_balance = to_balance.checked_add(amount).ok_or(VoteError::MathOverflow)?;
        *from_balance -= amount;
        Ok(())
    }

    /// Treasury value of `amount` votes
    ///
    /// ```text
    /// value = amount * treasury / (supply - burnt - claimer_balance)
    /// ```
    pub fn redeem_value(&self, amount: u64, claimer_balance: u64, treasury: u64) -> Result<u64> {
        let circulating = self
            .active_supply()
            .checked_sub(claimer_balance)
            .ok_or(VoteError::InsufficientVotes)?;
        require!(circulating > 0, VoteError::InsufficientVotes);

        let value = (amount as u128)
            .checked_mul(treasury as u128)
            .ok_or(VoteError::MathOverflow)?
            / circulating as u128;

        u64::try_from(value).map_err(|_| error!(VoteError::MathOverflow))
    }

    /// Burn `amount` of `holder`'s votes and return their treasury value
    pub fn record_redeem(
        &mut self,
        holder: &Pubkey,
        balance: &mut u64,
        amount: u64,
        claimer_balance: u64,
        treasury: u64,
    ) -> Result<u64> {
        require!(amount > 0, VoteError::ZeroAmount);
        require!(amount < self.active_supply(), VoteError::InsufficientVotes);
        self.check_spendable(holder, *balance, amount)?;

        let value = self.redeem_value(amount, claimer_balance, treasury)?;

        *balance -= amount;
        self.burnt = self.burnt.checked_add(amount).ok_or(VoteError::MathOverflow)?;
        Ok(value)
    }

    pub fn rename(&mut self, name: String) -> Result<()> {
        require!(name.len() <= MAX_NAME_LEN, VoteError::NameTooLong);
        self.name = name;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    /// In-memory stand-in for the per-holder balance accounts
    struct Ledger {
        collective: Collective,
        balances: HashMap<Pubkey, u64>,
    }

    impl Ledger {
        fn new() -> Self {
            Self {
                collective: Collective {
                    authority: Pubkey::new_unique(),
                    ..Default::default()
                },
                balances: HashMap::new(),
            }
        }

        fn owner(&self) -> Pubkey {
            self.collective.authority
        }

        fn balance(&self, account: &Pubkey) -> u64 {
            self.balances.get(account).copied().unwrap_or(0)
        }

        fn buy(&mut self, account: Pubkey, amount: u64) -> Result<()> {
            let balance = self.balances.entry(account).or_default();
            self.collective.record_buy(&account, balance, amount)
        }

        fn sell(&mut self, account: Pubkey, amount: u64) -> Result<()> {
            let balance = self.balances.entry(account).or_default();
            self.collective.record_sell(&account, balance, amount)
        }

        fn transfer(&mut self, from: Pubkey, to: Pubkey, amount: u64) -> Result<()> {
            let mut from_balance = self.balance(&from);
            let mut to_balance = self.balance(&to);
            self.collective
                .record_transfer(&from, &mut from_balance, &mut to_balance, amount)?;
            self.balances.insert(from, from_balance);
            self.balances.insert(to, to_balance);
            Ok(())
        }

        fn redeem(
            &mut self,
            account: Pubkey,
            amount: u64,
            claimer: u64,
            treasury: u64,
        ) -> Result<u64> {
            let balance = self.balances.entry(account).or_default();
            self.collective
                .record_redeem(&account, balance, amount, claimer, treasury)
        }

        fn assert_conserved(&self) {
            let held: u64 = self.balances.values().sum();
            assert_eq!(held + self.collective.burnt, self.collective.supply);
            assert!(self.collective.supply >= self.collective.burnt);
        }
    }

    fn bootstrapped() -> Ledger {
        let mut ledger = Ledger::new();
        let owner = ledger.owner();
        ledger.buy(owner, 1).unwrap();
        ledger
    }

    #[test]
    fn test_only_owner_bootstraps() {
        let mut ledger = Ledger::new();

        let err = ledger.buy(Pubkey::new_unique(), 5).unwrap_err();
        assert_eq!(err, VoteError::CollectiveNotInitialized.into());

        let owner = ledger.owner();
        ledger.buy(owner, 1).unwrap();
        ledger.buy(Pubkey::new_unique(), 5).unwrap();

        assert_eq!(ledger.collective.supply, 6);
        ledger.assert_conserved();
    }

    #[test]
    fn test_zero_amounts_rejected() {
        let mut ledger = bootstrapped();
        let owner = ledger.owner();
        let fan = Pubkey::new_unique();

        for err in [
            ledger.buy(owner, 0).unwrap_err(),
            ledger.sell(owner, 0).unwrap_err(),
            ledger.transfer(owner, fan, 0).unwrap_err(),
            ledger.redeem(owner, 0, 0, 100).unwrap_err(),
        ] {
            assert_eq!(err, VoteError::ZeroAmount.into());
        }
    }

    #[test]
    fn test_sell_requires_strictly_less_than_active_supply() {
        let mut ledger = bootstrapped();
        let fan = Pubkey::new_unique();
        ledger.buy(fan, 4).unwrap();

        // supply is 5; the fan holds 4 and may sell all 4
        let err = ledger.sell(fan, 5).unwrap_err();
        assert_eq!(err, VoteError::InsufficientVotes.into());

        ledger.sell(fan, 4).unwrap();
        assert_eq!(ledger.balance(&fan), 0);
        assert_eq!(ledger.collective.supply, 1);
        ledger.assert_conserved();
    }

    #[test]
    fn test_owner_keeps_last_vote() {
        let mut ledger = bootstrapped();
        let owner = ledger.owner();
        ledger.buy(owner, 2).unwrap();
        ledger.buy(Pubkey::new_unique(), 10).unwrap();

        let err = ledger.sell(owner, 3).unwrap_err();
        assert_eq!(err, VoteError::InsufficientVotes.into());

        ledger.sell(owner, 2).unwrap();
        assert_eq!(ledger.balance(&owner), 1);

        let err = ledger.transfer(owner, Pubkey::new_unique(), 1).unwrap_err();
        assert_eq!(err, VoteError::InsufficientVotes.into());
        ledger.assert_conserved();
    }

    #[test]
    fn test_holder_cannot_oversell() {
        let mut ledger = bootstrapped();
        let fan = Pubkey::new_unique();
        ledger.buy(fan, 3).unwrap();
        ledger.buy(Pubkey::new_unique(), 10).unwrap();

        let err = ledger.sell(fan, 4).unwrap_err();
        assert_eq!(err, VoteError::InsufficientVotes.into());
    }

    #[test]
    fn test_transfer_moves_full_balance() {
        let mut ledger = bootstrapped();
        let (alice, bob) = (Pubkey::new_unique(), Pubkey::new_unique());
        ledger.buy(alice, 7).unwrap();

        ledger.transfer(alice, bob, 7).unwrap();
        assert_eq!(ledger.balance(&alice), 0);
        assert_eq!(ledger.balance(&bob), 7);
        assert_eq!(ledger.collective.supply, 8);

        let err = ledger.transfer(alice, bob, 1).unwrap_err();
        assert_eq!(err, VoteError::InsufficientVotes.into());
        ledger.assert_conserved();
    }

    #[test]
    fn test_redeem_pays_share_of_circulating_supply() {
        let mut ledger = bootstrapped();
        let fan = Pubkey::new_unique();
        let claimer = Pubkey::new_unique();
        ledger.buy(fan, 40).unwrap();
        ledger.buy(claimer, 59).unwrap();

        // circulating = 100 - 0 - 59 = 41; 10 / 41 of 4_100
        let value = ledger.redeem(fan, 10, 59, 4_100).unwrap();
        assert_eq!(value, 1_000);
        assert_eq!(ledger.collective.burnt, 10);
        assert_eq!(ledger.collective.active_supply(), 90);
        assert_eq!(ledger.balance(&fan), 30);
        ledger.assert_conserved();

        // treasury drained by 1_000; circulating now 31
        let value = ledger.redeem(fan, 30, 59, 3_100).unwrap();
        assert_eq!(value, 3_000);
        ledger.assert_conserved();
    }

    #[test]
    fn test_redeem_respects_owner_floor() {
        let mut ledger = bootstrapped();
        let owner = ledger.owner();
        ledger.buy(Pubkey::new_unique(), 9).unwrap();

        let err = ledger.redeem(owner, 1, 0, 1_000).unwrap_err();
        assert_eq!(err, VoteError::InsufficientVotes.into());
    }

    #[test]
    fn test_redeem_with_no_circulating_supply() {
        let collective = Collective {
            supply: 10,
            burnt: 0,
            ..Default::default()
        };
        let err = collective.redeem_value(1, 10, 1_000).unwrap_err();
        assert_eq!(err, VoteError::InsufficientVotes.into());
    }

    #[test]
    fn test_rename_length_limit() {
        let mut collective = Collective::default();
        collective.rename("a".repeat(MAX_NAME_LEN)).unwrap();
        assert_eq!(collective.name.len(), MAX_NAME_LEN);

        let err = collective.rename("a".repeat(MAX_NAME_LEN + 1)).unwrap_err();
        assert_eq!(err, VoteError::NameTooLong.into());
        assert_eq!(collective.name.len(), MAX_NAME_LEN);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Buy(usize, u64),
        Sell(usize, u64),
        Transfer(usize, usize, u64),
        Redeem(usize, u64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..4, 0u64..50).prop_map(|(who, n)| Op::Buy(who, n)),
            (0usize..4, 0u64..50).prop_map(|(who, n)| Op::Sell(who, n)),
            (0usize..4, 0usize..4, 0u64..50).prop_map(|(a, b, n)| Op::Transfer(a, b, n)),
            (0usize..4, 0u64..50).prop_map(|(who, n)| Op::Redeem(who, n)),
        ]
    }

    proptest! {
        #[test]
        fn test_ledger_conserves_supply(ops in prop::collection::vec(op(), 1..64)) {
            let mut ledger = bootstrapped();
            // index 0 is the collective itself
            let accounts = [
                ledger.owner(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
            ];

            for op in ops {
                // failed operations must leave no trace, so run each on a copy
                let before = (ledger.collective.clone(), ledger.balances.clone());
                let result = match op {
                    Op::Buy(who, n) => ledger.buy(accounts[who], n),
                    Op::Sell(who, n) => ledger.sell(accounts[who], n),
                    Op::Transfer(a, b, n) if a != b => ledger.transfer(accounts[a], accounts[b], n),
                    Op::Transfer(..) => Ok(()),
                    Op::Redeem(who, n) => ledger.redeem(accounts[who], n, 0, 1_000_000).map(|_| ()),
                };
                if result.is_err() {
                    ledger.collective = before.0;
                    ledger.balances = before.1;
                }

                ledger.assert_conserved();
                prop_assert!(ledger.balance(&accounts[0]) >= 1);
            }
        }
    }
}
