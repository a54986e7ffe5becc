use anchor_lang::prelude::*;

use crate::constants::{LEDGER_SEED, MAX_HOLDERS, MAX_SCHEDULES};
use crate::error::VestingError;
use crate::state::{HolderCount, ScheduleId, ScheduleParams, VestingSchedule};
use crate::token_ledger::TokenLedger;
use crate::utils::{calculator, schedule_id};

type LedgerResult<T> = std::result::Result<T, VestingError>;

/// Ledger PDA (`[LEDGER_SEED, mint, owner, nonce]`): every schedule, the
/// reserved total and the per-beneficiary counters. An owner may open any
/// number of ledgers per mint by choosing a fresh nonce.
///
/// Invariants after every operation:
/// - `released <= amount_total` for every schedule
/// - `reserved_total <= vault balance`
/// - `revoked` only ever goes false -> true
#[account]
#[derive(Debug, Default)]
pub struct VestingLedger {
    /// Sole authority for create/revoke/withdraw. Fixed at initialization.
    pub owner: Pubkey,
    /// Vested token mint.
    pub mint: Pubkey,
    /// Token account holding the vested supply (authority = this PDA).
    pub vault: Pubkey,
    /// Distinguishes ledgers of the same owner and mint.
    pub nonce: u64,
    pub bump: u8,
    pub vault_bump: u8,
    /// Sum of unreleased amounts over non-revoked schedules.
    pub reserved_total: u64,
    /// Creation order; also the enumeration order.
    pub schedules: Vec<VestingSchedule>,
    pub holders: Vec<HolderCount>,
}

/// Outcome of a release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Released {
    pub schedule_id: ScheduleId,
    pub beneficiary: Pubkey,
    pub amount: u64,
    pub released_total: u64,
}

/// Outcome of a revocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Revocation {
    pub schedule_id: ScheduleId,
    pub beneficiary: Pubkey,
    /// Vested amount paid out as part of the revocation.
    pub released: u64,
    /// Unvested amount returned to the withdrawable surplus.
    pub freed: u64,
}

impl VestingLedger {
    /// Space for discriminator + fields at full capacity.
    pub const fn space() -> usize {
        8 +  // discriminator
        32 + // owner
        32 + // mint
        32 + // vault
        8 +  // nonce
        1 +  // bump
        1 +  // vault_bump
        8 +  // reserved_total
        4 + MAX_SCHEDULES * VestingSchedule::SIZE +
        4 + MAX_HOLDERS * HolderCount::SIZE
    }

    /// Ledger PDA for `(mint, owner, nonce)`. Clients use it to locate a
    /// ledger; distinct owners never share an address.
    pub fn find_address(mint: &Pubkey, owner: &Pubkey, nonce: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[
                LEDGER_SEED,
                mint.as_ref(),
                owner.as_ref(),
                &nonce.to_le_bytes(),
            ],
            &crate::ID,
        )
    }

    pub fn initialize(
        &mut self,
        owner: Pubkey,
        mint: Pubkey,
        vault: Pubkey,
        nonce: u64,
        bump: u8,
        vault_bump: u8,
    ) -> LedgerResult<()> {
        if mint == Pubkey::default() {
            return Err(VestingError::InvalidTokenMint);
        }
        if owner == Pubkey::default() || vault == Pubkey::default() {
            return Err(VestingError::InvalidPubkey);
        }
        self.owner = owner;
        self.mint = mint;
        self.vault = vault;
        self.nonce = nonce;
        self.bump = bump;
        self.vault_bump = vault_bump;
        self.reserved_total = 0;
        self.schedules = Vec::with_capacity(MAX_SCHEDULES);
        self.holders = Vec::with_capacity(MAX_HOLDERS);
        Ok(())
    }

    pub fn is_owner(&self, caller: &Pubkey) -> bool {
        *caller == self.owner
    }

    /// Reserve `params.amount` of the surplus for a new schedule.
    /// Moves no tokens; the vault must already hold them.
    pub fn create_schedule(
        &mut self,
        caller: &Pubkey,
        params: &ScheduleParams,
        token: &impl TokenLedger,
    ) -> LedgerResult<ScheduleId> {
        if !self.is_owner(caller) {
            return Err(VestingError::UnauthorizedOwner);
        }
        if params.beneficiary == Pubkey::default() {
            return Err(VestingError::InvalidPubkey);
        }
        if params.duration == 0 {
            return Err(VestingError::InvalidDuration);
        }
        if params.amount == 0 {
            return Err(VestingError::InvalidAmount);
        }
        if params.slice_period < 1 {
            return Err(VestingError::InvalidSlicePeriod);
        }
        if self.available_withdrawable_amount(token)? < params.amount {
            return Err(VestingError::AmountExceedsWithdrawable);
        }

        let cliff = params
            .start
            .checked_add(params.cliff_delay)
            .ok_or(VestingError::MathOverflow)?;
        // The calculator needs start + duration later.
        params
            .start
            .checked_add(params.duration)
            .ok_or(VestingError::MathOverflow)?;

        if self.schedules.len() >= MAX_SCHEDULES {
            return Err(VestingError::LedgerFull);
        }
        let slot = self.holder_slot(&params.beneficiary);
        if slot.is_none() && self.holders.len() >= MAX_HOLDERS {
            return Err(VestingError::LedgerFull);
        }

        let index = slot.map_or(0, |i| self.holders[i].count);
        let next_count = index.checked_add(1).ok_or(VestingError::MathOverflow)?;
        let id = schedule_id::derive(&params.beneficiary, index);
        if self.position(&id).is_some() {
            return Err(VestingError::DuplicateScheduleId);
        }
        let reserved_total = self
            .reserved_total
            .checked_add(params.amount)
            .ok_or(VestingError::MathOverflow)?;

        self.schedules.push(VestingSchedule {
            id,
            beneficiary: params.beneficiary,
            start: params.start,
            cliff,
            duration: params.duration,
            slice_period: params.slice_period,
            revocable: params.revocable,
            amount_total: params.amount,
            released: 0,
            revoked: false,
            initialized: true,
        });
        self.reserved_total = reserved_total;
        match slot {
            Some(i) => self.holders[i].count = next_count,
            None => self.holders.push(HolderCount {
                holder: params.beneficiary,
                count: next_count,
            }),
        }
        Ok(id)
    }

    /// Release `amount` of the vested balance to the schedule's beneficiary.
    /// Callable by the beneficiary or the owner.
    pub fn release(
        &mut self,
        caller: &Pubkey,
        id: &ScheduleId,
        amount: u64,
        now: u64,
        token: &mut impl TokenLedger,
    ) -> LedgerResult<Released> {
        let idx = self.position_checked(id)?;
        let schedule = self.schedules[idx];
        if schedule.revoked {
            return Err(VestingError::ScheduleRevoked);
        }
        if *caller != schedule.beneficiary && !self.is_owner(caller) {
            return Err(VestingError::UnauthorizedReleaser);
        }
        if amount == 0 {
            return Err(VestingError::InvalidAmount);
        }

        let vested = calculator::releasable_amount(&schedule, now)?;
        if vested < amount {
            return Err(VestingError::InsufficientVested);
        }
        let released_total = schedule
            .released
            .checked_add(amount)
            .ok_or(VestingError::MathOverflow)?;
        let reserved_total = self
            .reserved_total
            .checked_sub(amount)
            .ok_or(VestingError::MathUnderflow)?;

        // Commit before the transfer so a re-entrant call sees the new state.
        let snapshot = (schedule, self.reserved_total);
        self.schedules[idx].released = released_total;
        self.reserved_total = reserved_total;
        if let Err(err) = token.transfer(&schedule.beneficiary, amount) {
            self.restore(idx, snapshot);
            return Err(err);
        }

        Ok(Released {
            schedule_id: *id,
            beneficiary: schedule.beneficiary,
            amount,
            released_total,
        })
    }

    /// Revoke a revocable schedule. Whatever has vested is paid to the
    /// beneficiary, the rest goes back to the surplus.
    ///
    /// The payout runs on the owner's authority checked here; the
    /// beneficiary-or-owner check of `release` is not repeated.
    pub fn revoke(
        &mut self,
        caller: &Pubkey,
        id: &ScheduleId,
        now: u64,
        token: &mut impl TokenLedger,
    ) -> LedgerResult<Revocation> {
        if !self.is_owner(caller) {
            return Err(VestingError::UnauthorizedOwner);
        }
        let idx = self.position_checked(id)?;
        let schedule = self.schedules[idx];
        if schedule.revoked {
            return Err(VestingError::ScheduleRevoked);
        }
        if !schedule.revocable {
            return Err(VestingError::ScheduleNotRevocable);
        }

        let vested = calculator::releasable_amount(&schedule, now)?;
        let released_total = schedule
            .released
            .checked_add(vested)
            .ok_or(VestingError::MathOverflow)?;
        let freed = schedule
            .unreleased()
            .and_then(|owed| owed.checked_sub(vested))
            .ok_or(VestingError::MathUnderflow)?;
        let reserved_total = self
            .reserved_total
            .checked_sub(vested)
            .and_then(|r| r.checked_sub(freed))
            .ok_or(VestingError::MathUnderflow)?;

        let snapshot = (schedule, self.reserved_total);
        let entry = &mut self.schedules[idx];
        entry.released = released_total;
        entry.revoked = true;
        self.reserved_total = reserved_total;
        if vested > 0 {
            if let Err(err) = token.transfer(&schedule.beneficiary, vested) {
                self.restore(idx, snapshot);
                return Err(err);
            }
        }

        Ok(Revocation {
            schedule_id: *id,
            beneficiary: schedule.beneficiary,
            released: vested,
            freed,
        })
    }

    /// Send `amount` of the unreserved surplus to the owner.
    pub fn withdraw(
        &self,
        caller: &Pubkey,
        amount: u64,
        token: &mut impl TokenLedger,
    ) -> LedgerResult<()> {
        if !self.is_owner(caller) {
            return Err(VestingError::UnauthorizedOwner);
        }
        if amount == 0 {
            return Err(VestingError::InvalidAmount);
        }
        if amount > self.available_withdrawable_amount(token)? {
            return Err(VestingError::InsufficientFunds);
        }
        token.transfer(&self.owner, amount)
    }

    /// Vault balance not reserved by any schedule.
    pub fn available_withdrawable_amount(&self, token: &impl TokenLedger) -> LedgerResult<u64> {
        token
            .balance_of(&self.vault)?
            .checked_sub(self.reserved_total)
            .ok_or(VestingError::MathUnderflow)
    }

    pub fn releasable_amount(&self, id: &ScheduleId, now: u64) -> LedgerResult<u64> {
        let schedule = self.schedule(id)?;
        if schedule.revoked {
            return Err(VestingError::ScheduleRevoked);
        }
        calculator::releasable_amount(schedule, now)
    }

    pub fn schedule(&self, id: &ScheduleId) -> LedgerResult<&VestingSchedule> {
        let idx = self.position_checked(id)?;
        Ok(&self.schedules[idx])
    }

    pub fn schedule_at(&self, index: usize) -> LedgerResult<&VestingSchedule> {
        self.schedules
            .get(index)
            .filter(|s| s.initialized)
            .ok_or(VestingError::ScheduleNotFound)
    }

    pub fn schedule_ids(&self) -> impl Iterator<Item = &ScheduleId> + '_ {
        self.schedules.iter().map(|s| &s.id)
    }

    pub fn schedules_count(&self) -> usize {
        self.schedules.len()
    }

    pub fn holder_schedules_count(&self, holder: &Pubkey) -> u64 {
        self.holder_slot(holder)
            .map_or(0, |i| self.holders[i].count)
    }

    pub fn schedule_for_holder_at(&self, holder: &Pubkey, index: u64) -> LedgerResult<&VestingSchedule> {
        if index >= self.holder_schedules_count(holder) {
            return Err(VestingError::ScheduleNotFound);
        }
        self.schedule(&schedule_id::derive(holder, index))
    }

    pub fn last_schedule_for_holder(&self, holder: &Pubkey) -> LedgerResult<&VestingSchedule> {
        let last = self
            .holder_schedules_count(holder)
            .checked_sub(1)
            .ok_or(VestingError::ScheduleNotFound)?;
        self.schedule_for_holder_at(holder, last)
    }

    /// ID the next `create_schedule` for `holder` will assign.
    pub fn next_schedule_id_for_holder(&self, holder: &Pubkey) -> ScheduleId {
        schedule_id::derive(holder, self.holder_schedules_count(holder))
    }

    pub fn token(&self) -> Pubkey {
        self.mint
    }

    fn position(&self, id: &ScheduleId) -> Option<usize> {
        self.schedules.iter().position(|s| s.id == *id)
    }

    fn position_checked(&self, id: &ScheduleId) -> LedgerResult<usize> {
        self.position(id)
            .filter(|&i| self.schedules[i].initialized)
            .ok_or(VestingError::ScheduleNotFound)
    }

    fn holder_slot(&self, holder: &Pubkey) -> Option<usize> {
        self.holders.iter().position(|h| h.holder == *holder)
    }

    fn restore(&mut self, idx: usize, (schedule, reserved_total): (VestingSchedule, u64)) {
        self.schedules[idx] = schedule;
        self.reserved_total = reserved_total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockToken {
        balances: HashMap<Pubkey, u64>,
        vault: Pubkey,
        fail_transfers: bool,
    }

    impl MockToken {
        fn balance(&self, holder: &Pubkey) -> u64 {
            self.balances.get(holder).copied().unwrap_or(0)
        }
    }

    impl TokenLedger for MockToken {
        fn balance_of(&self, holder: &Pubkey) -> LedgerResult<u64> {
            Ok(self.balance(holder))
        }

        fn transfer(&mut self, to: &Pubkey, amount: u64) -> LedgerResult<()> {
            if self.fail_transfers {
                return Err(VestingError::TransferFailed);
            }
            let from = self
                .balance(&self.vault)
                .checked_sub(amount)
                .ok_or(VestingError::InsufficientFunds)?;
            self.balances.insert(self.vault, from);
            *self.balances.entry(*to).or_insert(0) += amount;
            Ok(())
        }
    }

    struct Fixture {
        ledger: VestingLedger,
        token: MockToken,
        owner: Pubkey,
        alice: Pubkey,
    }

    fn setup(funded: u64) -> Fixture {
        let owner = Pubkey::new_unique();
        let vault = Pubkey::new_unique();
        let mut ledger = VestingLedger::default();
        ledger
            .initialize(owner, Pubkey::new_unique(), vault, 0, 254, 253)
            .unwrap();
        let token = MockToken {
            balances: HashMap::from([(vault, funded)]),
            vault,
            fail_transfers: false,
        };
        Fixture {
            ledger,
            token,
            owner,
            alice: Pubkey::new_unique(),
        }
    }

    fn params(beneficiary: Pubkey, amount: u64) -> ScheduleParams {
        ScheduleParams {
            beneficiary,
            start: 0,
            cliff_delay: 1_000,
            duration: 10_000,
            slice_period: 100,
            revocable: true,
            amount,
        }
    }

    fn assert_invariants(f: &Fixture) {
        for s in &f.ledger.schedules {
            assert!(s.released <= s.amount_total);
        }
        assert!(f.ledger.reserved_total <= f.token.balance(&f.ledger.vault));
        let owed: u64 = f
            .ledger
            .schedules
            .iter()
            .filter(|s| !s.revoked)
            .map(|s| s.unreleased().unwrap())
            .sum();
        assert_eq!(owed, f.ledger.reserved_total);
    }

    #[test]
    fn ledger_address_is_scoped_to_owner_and_nonce() {
        let mint = Pubkey::new_unique();
        let issuer = Pubkey::new_unique();
        let squatter = Pubkey::new_unique();

        let (issuer_ledger, _) = VestingLedger::find_address(&mint, &issuer, 0);
        let (squatter_ledger, _) = VestingLedger::find_address(&mint, &squatter, 0);
        assert_ne!(issuer_ledger, squatter_ledger);

        let (second, _) = VestingLedger::find_address(&mint, &issuer, 1);
        assert_ne!(issuer_ledger, second);
        assert_eq!(VestingLedger::find_address(&mint, &issuer, 0).0, issuer_ledger);
    }

    #[test]
    fn initialize_records_nonce_and_bumps() {
        let mut ledger = VestingLedger::default();
        let owner = Pubkey::new_unique();
        ledger
            .initialize(owner, Pubkey::new_unique(), Pubkey::new_unique(), 7, 255, 251)
            .unwrap();
        assert_eq!(ledger.nonce, 7);
        assert_eq!(ledger.bump, 255);
        assert_eq!(ledger.vault_bump, 251);
        assert!(ledger.is_owner(&owner));
    }

    #[test]
    fn initialize_rejects_default_mint() {
        let mut ledger = VestingLedger::default();
        let err = ledger
            .initialize(Pubkey::new_unique(), Pubkey::default(), Pubkey::new_unique(), 0, 0, 0)
            .unwrap_err();
        assert!(matches!(err, VestingError::InvalidTokenMint));
    }

    #[test]
    fn create_then_query_round_trip() {
        let mut f = setup(50_000);
        let predicted = f.ledger.next_schedule_id_for_holder(&f.alice);
        let id = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 10_000), &f.token)
            .unwrap();
        assert_eq!(id, predicted);

        let by_id = *f.ledger.schedule(&id).unwrap();
        let by_index = *f.ledger.schedule_at(0).unwrap();
        assert_eq!(by_id, by_index);
        assert_eq!(by_id.beneficiary, f.alice);
        assert_eq!(by_id.cliff, 1_000);
        assert_eq!(by_id.amount_total, 10_000);
        assert_eq!(by_id.released, 0);
        assert!(by_id.initialized && !by_id.revoked);

        assert_eq!(f.ledger.schedules_count(), 1);
        assert_eq!(f.ledger.holder_schedules_count(&f.alice), 1);
        assert_eq!(f.ledger.reserved_total, 10_000);
        assert_eq!(f.ledger.available_withdrawable_amount(&f.token).unwrap(), 40_000);
        assert_eq!(f.ledger.schedule_ids().copied().collect::<Vec<_>>(), vec![id]);
        assert_invariants(&f);
    }

    #[test]
    fn holder_enumeration_follows_creation_order() {
        let mut f = setup(100);
        let bob = Pubkey::new_unique();
        let a0 = f.ledger.create_schedule(&f.owner, &params(f.alice, 10), &f.token).unwrap();
        let b0 = f.ledger.create_schedule(&f.owner, &params(bob, 10), &f.token).unwrap();
        let a1 = f.ledger.create_schedule(&f.owner, &params(f.alice, 10), &f.token).unwrap();
        assert_ne!(a0, a1);

        assert_eq!(f.ledger.holder_schedules_count(&f.alice), 2);
        assert_eq!(f.ledger.holder_schedules_count(&bob), 1);
        assert_eq!(f.ledger.schedule_for_holder_at(&f.alice, 0).unwrap().id, a0);
        assert_eq!(f.ledger.schedule_for_holder_at(&f.alice, 1).unwrap().id, a1);
        assert_eq!(f.ledger.last_schedule_for_holder(&bob).unwrap().id, b0);
        assert_eq!(f.ledger.schedule_at(1).unwrap().id, b0);
        assert!(matches!(
            f.ledger.schedule_for_holder_at(&f.alice, 2),
            Err(VestingError::ScheduleNotFound)
        ));
        assert!(matches!(
            f.ledger.last_schedule_for_holder(&Pubkey::new_unique()),
            Err(VestingError::ScheduleNotFound)
        ));
    }

    #[test]
    fn create_validates_caller_and_params() {
        let mut f = setup(1_000);
        let cases = [
            (f.alice, params(f.alice, 10), "owner"),
            (f.owner, ScheduleParams { duration: 0, ..params(f.alice, 10) }, "duration"),
            (f.owner, params(f.alice, 0), "amount"),
            (f.owner, ScheduleParams { slice_period: 0, ..params(f.alice, 10) }, "slice"),
            (f.owner, params(f.alice, 1_001), "surplus"),
            (f.owner, params(Pubkey::default(), 10), "beneficiary"),
            (f.owner, ScheduleParams { start: u64::MAX, ..params(f.alice, 10) }, "overflow"),
        ];
        for (caller, p, case) in cases {
            let err = f.ledger.create_schedule(&caller, &p, &f.token).unwrap_err();
            let expected = match case {
                "owner" => matches!(err, VestingError::UnauthorizedOwner),
                "duration" => matches!(err, VestingError::InvalidDuration),
                "amount" => matches!(err, VestingError::InvalidAmount),
                "slice" => matches!(err, VestingError::InvalidSlicePeriod),
                "surplus" => matches!(err, VestingError::AmountExceedsWithdrawable),
                "beneficiary" => matches!(err, VestingError::InvalidPubkey),
                _ => matches!(err, VestingError::MathOverflow),
            };
            assert!(expected, "{case}: unexpected {err:?}");
        }
        assert_eq!(f.ledger.schedules_count(), 0);
        assert_eq!(f.ledger.reserved_total, 0);
        assert_eq!(f.ledger.holder_schedules_count(&f.alice), 0);
    }

    #[test]
    fn reservations_cannot_exceed_vault() {
        let mut f = setup(1_000);
        f.ledger.create_schedule(&f.owner, &params(f.alice, 600), &f.token).unwrap();
        let err = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 401), &f.token)
            .unwrap_err();
        assert!(matches!(err, VestingError::AmountExceedsWithdrawable));
        f.ledger.create_schedule(&f.owner, &params(f.alice, 400), &f.token).unwrap();
        assert_eq!(f.ledger.available_withdrawable_amount(&f.token).unwrap(), 0);
        assert_invariants(&f);
    }

    #[test]
    fn corrupted_counter_reports_duplicate_id() {
        let mut f = setup(1_000);
        f.ledger.create_schedule(&f.owner, &params(f.alice, 10), &f.token).unwrap();
        f.ledger.holders[0].count = 0;
        let err = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 10), &f.token)
            .unwrap_err();
        assert!(matches!(err, VestingError::DuplicateScheduleId));
        assert_eq!(f.ledger.schedules_count(), 1);
        assert_eq!(f.ledger.reserved_total, 10);
    }

    #[test]
    fn ledger_capacity_is_enforced() {
        let mut f = setup(1_000);
        for _ in 0..MAX_SCHEDULES {
            f.ledger.create_schedule(&f.owner, &params(f.alice, 1), &f.token).unwrap();
        }
        let err = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 1), &f.token)
            .unwrap_err();
        assert!(matches!(err, VestingError::LedgerFull));
        assert_eq!(f.ledger.reserved_total, MAX_SCHEDULES as u64);
    }

    #[test]
    fn releasable_follows_cliff_and_slices() {
        let mut f = setup(10_000);
        let id = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 10_000), &f.token)
            .unwrap();
        assert_eq!(f.ledger.releasable_amount(&id, 500).unwrap(), 0);
        assert_eq!(f.ledger.releasable_amount(&id, 1_000).unwrap(), 1_000);
        assert_eq!(f.ledger.releasable_amount(&id, 1_099).unwrap(), 1_000);
        assert_eq!(f.ledger.releasable_amount(&id, 10_000).unwrap(), 10_000);
        assert!(matches!(
            f.ledger.releasable_amount(&[0u8; 32], 10_000),
            Err(VestingError::ScheduleNotFound)
        ));
    }

    #[test]
    fn partial_release_then_over_release() {
        let mut f = setup(10_000);
        let id = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 10_000), &f.token)
            .unwrap();

        let out = f.ledger.release(&f.alice, &id, 600, 1_000, &mut f.token).unwrap();
        assert_eq!(out.amount, 600);
        assert_eq!(out.released_total, 600);
        assert_eq!(f.ledger.reserved_total, 9_400);
        assert_eq!(f.token.balance(&f.alice), 600);
        assert_eq!(f.ledger.releasable_amount(&id, 1_000).unwrap(), 400);

        let err = f
            .ledger
            .release(&f.alice, &id, 401, 1_000, &mut f.token)
            .unwrap_err();
        assert!(matches!(err, VestingError::InsufficientVested));
        assert_eq!(f.ledger.schedule(&id).unwrap().released, 600);
        assert_eq!(f.ledger.reserved_total, 9_400);
        assert_invariants(&f);

        f.ledger.release(&f.alice, &id, 9_400, 10_000, &mut f.token).unwrap();
        assert_eq!(f.ledger.reserved_total, 0);
        assert_eq!(f.token.balance(&f.alice), 10_000);
        assert_eq!(f.ledger.releasable_amount(&id, u64::MAX).unwrap(), 0);
        assert_invariants(&f);
    }

    #[test]
    fn release_before_cliff_fails() {
        let mut f = setup(10_000);
        let id = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 10_000), &f.token)
            .unwrap();
        let err = f.ledger.release(&f.alice, &id, 1, 999, &mut f.token).unwrap_err();
        assert!(matches!(err, VestingError::InsufficientVested));
    }

    #[test]
    fn release_authorization() {
        let mut f = setup(10_000);
        let id = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 10_000), &f.token)
            .unwrap();
        let stranger = Pubkey::new_unique();
        let err = f
            .ledger
            .release(&stranger, &id, 100, 5_000, &mut f.token)
            .unwrap_err();
        assert!(matches!(err, VestingError::UnauthorizedReleaser));

        // Owner may trigger a release; tokens still go to the beneficiary.
        f.ledger.release(&f.owner, &id, 100, 5_000, &mut f.token).unwrap();
        assert_eq!(f.token.balance(&f.alice), 100);
        assert_eq!(f.token.balance(&f.owner), 0);
    }

    #[test]
    fn zero_release_is_rejected_without_effect() {
        let mut f = setup(10_000);
        let id = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 10_000), &f.token)
            .unwrap();
        let before = f.ledger.schedule(&id).unwrap().released;
        let err = f.ledger.release(&f.alice, &id, 0, 5_000, &mut f.token).unwrap_err();
        assert!(matches!(err, VestingError::InvalidAmount));
        assert_eq!(f.ledger.schedule(&id).unwrap().released, before);
        assert_eq!(f.ledger.reserved_total, 10_000);
    }

    #[test]
    fn failed_transfer_rolls_back_release() {
        let mut f = setup(10_000);
        let id = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 10_000), &f.token)
            .unwrap();
        f.token.fail_transfers = true;
        let err = f.ledger.release(&f.alice, &id, 500, 5_000, &mut f.token).unwrap_err();
        assert!(matches!(err, VestingError::TransferFailed));
        assert_eq!(f.ledger.schedule(&id).unwrap().released, 0);
        assert_eq!(f.ledger.reserved_total, 10_000);
        assert_invariants(&f);
    }

    #[test]
    fn revoke_pays_vested_and_frees_remainder() {
        let mut f = setup(20_000);
        let id = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 10_000), &f.token)
            .unwrap();
        f.ledger.release(&f.alice, &id, 1_000, 2_000, &mut f.token).unwrap();

        let out = f.ledger.revoke(&f.owner, &id, 3_050, &mut f.token).unwrap();
        assert_eq!(out.released, 2_000);
        assert_eq!(out.freed, 7_000);
        assert_eq!(f.token.balance(&f.alice), 3_000);
        assert_eq!(f.ledger.reserved_total, 0);
        assert_eq!(f.ledger.available_withdrawable_amount(&f.token).unwrap(), 17_000);

        let s = f.ledger.schedule(&id).unwrap();
        assert!(s.revoked);
        assert_eq!(s.released, 3_000);

        let err = f.ledger.release(&f.alice, &id, 1, 20_000, &mut f.token).unwrap_err();
        assert!(matches!(err, VestingError::ScheduleRevoked));
        assert!(matches!(
            f.ledger.releasable_amount(&id, 20_000),
            Err(VestingError::ScheduleRevoked)
        ));
        let err = f.ledger.revoke(&f.owner, &id, 20_000, &mut f.token).unwrap_err();
        assert!(matches!(err, VestingError::ScheduleRevoked));
        assert_invariants(&f);
    }

    #[test]
    fn revoke_before_cliff_moves_no_tokens() {
        let mut f = setup(10_000);
        let id = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 10_000), &f.token)
            .unwrap();
        f.token.fail_transfers = true;
        let out = f.ledger.revoke(&f.owner, &id, 10, &mut f.token).unwrap();
        assert_eq!(out.released, 0);
        assert_eq!(out.freed, 10_000);
        assert_eq!(f.ledger.reserved_total, 0);
    }

    #[test]
    fn revoke_guards() {
        let mut f = setup(10_000);
        let fixed = f
            .ledger
            .create_schedule(
                &f.owner,
                &ScheduleParams { revocable: false, ..params(f.alice, 5_000) },
                &f.token,
            )
            .unwrap();
        let id = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 5_000), &f.token)
            .unwrap();

        let err = f.ledger.revoke(&f.owner, &fixed, 0, &mut f.token).unwrap_err();
        assert!(matches!(err, VestingError::ScheduleNotRevocable));
        let err = f.ledger.revoke(&f.alice, &id, 0, &mut f.token).unwrap_err();
        assert!(matches!(err, VestingError::UnauthorizedOwner));
        let err = f.ledger.revoke(&f.owner, &[9u8; 32], 0, &mut f.token).unwrap_err();
        assert!(matches!(err, VestingError::ScheduleNotFound));
        assert_eq!(f.ledger.reserved_total, 10_000);
    }

    #[test]
    fn failed_transfer_rolls_back_revoke() {
        let mut f = setup(10_000);
        let id = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 10_000), &f.token)
            .unwrap();
        f.token.fail_transfers = true;
        let err = f.ledger.revoke(&f.owner, &id, 5_000, &mut f.token).unwrap_err();
        assert!(matches!(err, VestingError::TransferFailed));
        let s = f.ledger.schedule(&id).unwrap();
        assert!(!s.revoked);
        assert_eq!(s.released, 0);
        assert_eq!(f.ledger.reserved_total, 10_000);
    }

    #[test]
    fn withdraw_only_touches_surplus() {
        let mut f = setup(15_000);
        f.ledger
            .create_schedule(&f.owner, &params(f.alice, 10_000), &f.token)
            .unwrap();
        let available = f.ledger.available_withdrawable_amount(&f.token).unwrap();
        assert_eq!(available, 5_000);

        let err = f
            .ledger
            .withdraw(&f.owner, available + 1, &mut f.token)
            .unwrap_err();
        assert!(matches!(err, VestingError::InsufficientFunds));
        let err = f.ledger.withdraw(&f.alice, 1, &mut f.token).unwrap_err();
        assert!(matches!(err, VestingError::UnauthorizedOwner));
        let err = f.ledger.withdraw(&f.owner, 0, &mut f.token).unwrap_err();
        assert!(matches!(err, VestingError::InvalidAmount));

        f.ledger.withdraw(&f.owner, available, &mut f.token).unwrap();
        assert_eq!(f.token.balance(&f.owner), 5_000);
        assert_eq!(f.ledger.reserved_total, 10_000);
        assert_eq!(f.ledger.available_withdrawable_amount(&f.token).unwrap(), 0);
        assert_invariants(&f);
    }

    #[test]
    fn revoked_remainder_becomes_withdrawable() {
        let mut f = setup(10_000);
        let id = f
            .ledger
            .create_schedule(&f.owner, &params(f.alice, 10_000), &f.token)
            .unwrap();
        f.ledger.revoke(&f.owner, &id, 5_000, &mut f.token).unwrap();
        let available = f.ledger.available_withdrawable_amount(&f.token).unwrap();
        assert_eq!(available, 5_000);
        f.ledger.withdraw(&f.owner, available, &mut f.token).unwrap();
        assert_eq!(f.token.balance(&f.ledger.vault), 0);
        assert_invariants(&f);
    }

    #[test]
    fn drained_vault_is_an_underflow() {
        let mut f = setup(10_000);
        f.ledger
            .create_schedule(&f.owner, &params(f.alice, 10_000), &f.token)
            .unwrap();
        f.token.balances.insert(f.ledger.vault, 9_999);
        assert!(matches!(
            f.ledger.available_withdrawable_amount(&f.token),
            Err(VestingError::MathUnderflow)
        ));
    }
}
