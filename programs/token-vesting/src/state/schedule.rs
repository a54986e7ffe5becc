use anchor_lang::prelude::*;

/// 32-byte deterministic schedule identifier.
pub type ScheduleId = [u8; 32];

/// A single vesting schedule stored in the ledger account.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VestingSchedule {
    pub id: ScheduleId,
    pub beneficiary: Pubkey,
    /// Vesting start (Unix seconds).
    pub start: u64,
    /// Absolute cliff (start + cliff delay).
    pub cliff: u64,
    /// Seconds from start until fully vested.
    pub duration: u64,
    /// Vesting granularity in seconds (>= 1).
    pub slice_period: u64,
    pub revocable: bool,
    pub amount_total: u64,
    /// Cumulative amount transferred to the beneficiary.
    pub released: u64,
    pub revoked: bool,
    pub initialized: bool,
}

impl VestingSchedule {
    pub const SIZE: usize =
        32 + // id
        32 + // beneficiary
        8 +  // start
        8 +  // cliff
        8 +  // duration
        8 +  // slice_period
        1 +  // revocable
        8 +  // amount_total
        8 +  // released
        1 +  // revoked
        1;   // initialized

    /// Amount still owed by the ledger for this schedule.
    pub fn unreleased(&self) -> Option<u64> {
        self.amount_total.checked_sub(self.released)
    }
}

/// Per-beneficiary creation counter. Never decremented.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HolderCount {
    pub holder: Pubkey,
    pub count: u64,
}

impl HolderCount {
    pub const SIZE: usize = 32 + 8;
}

/// Instruction input for `create_schedule`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleParams {
    pub beneficiary: Pubkey,
    pub start: u64,
    pub cliff_delay: u64,
    pub duration: u64,
    pub slice_period: u64,
    pub revocable: bool,
    pub amount: u64,
}
