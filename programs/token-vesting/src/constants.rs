//! Program-wide constants.

/// PDA seed of the ledger account (`[LEDGER_SEED, mint]`).
pub const LEDGER_SEED: &[u8] = b"ledger";

/// PDA seed of the vault token account (`[VAULT_SEED, ledger]`).
pub const VAULT_SEED: &[u8] = b"vault";

/// Max schedules stored in a single ledger account.
pub const MAX_SCHEDULES: usize = 48;

/// Max distinct beneficiaries tracked by the per-holder counters.
pub const MAX_HOLDERS: usize = 48;

/// Domain tag mixed into every schedule ID hash.
pub const SCHEDULE_ID_DOMAIN: &[u8] = b"token-vesting/schedule-id/v1";
