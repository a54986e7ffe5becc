use anchor_lang::prelude::*;

/// Custom error codes for the token vesting program.
#[error_code]
pub enum VestingError {
    #[msg("Unauthorized: owner signature required")]
    UnauthorizedOwner,

    #[msg("Unauthorized: beneficiary or owner signature required")]
    UnauthorizedReleaser,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid public key")]
    InvalidPubkey,

    #[msg("Invalid duration (must be > 0)")]
    InvalidDuration,

    #[msg("Invalid amount (must be > 0)")]
    InvalidAmount,

    #[msg("Invalid slice period (must be >= 1)")]
    InvalidSlicePeriod,

    #[msg("Invalid timestamp")]
    InvalidTimestamp,

    #[msg("Schedule amount exceeds the withdrawable surplus")]
    AmountExceedsWithdrawable,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Vesting schedule not found")]
    ScheduleNotFound,

    #[msg("Vesting schedule is revoked")]
    ScheduleRevoked,

    #[msg("Vesting schedule is not revocable")]
    ScheduleNotRevocable,

    #[msg("Ledger is full")]
    LedgerFull,

    #[msg("Requested amount exceeds the vested releasable amount")]
    InsufficientVested,

    #[msg("Requested amount exceeds the withdrawable surplus")]
    InsufficientFunds,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Math underflow")]
    MathUnderflow,

    #[msg("Derived schedule ID already exists")]
    DuplicateScheduleId,

    #[msg("Token transfer failed")]
    TransferFailed,
}
