//! Releasable-amount computation for a single schedule.
//!
//! - revoked or before cliff => 0
//! - at or after start + duration => amount_total - released
//! - otherwise vesting advances in whole slices of `slice_period` seconds:
//!   vested = amount_total * (whole_slices * slice_period) / duration

use crate::error::VestingError;
use crate::state::VestingSchedule;

/// Amount the beneficiary may release at `now`.
pub fn releasable_amount(schedule: &VestingSchedule, now: u64) -> Result<u64, VestingError> {
    if schedule.revoked {
        return Ok(0);
    }
    vested_amount(schedule, now)?
        .checked_sub(schedule.released)
        .ok_or(VestingError::MathUnderflow)
}

/// Cumulative amount vested at `now`, including what was already released.
/// Zero before the cliff or once revoked.
pub fn vested_amount(schedule: &VestingSchedule, now: u64) -> Result<u64, VestingError> {
    if schedule.revoked || now < schedule.cliff {
        return Ok(0);
    }
    let end = schedule
        .start
        .checked_add(schedule.duration)
        .ok_or(VestingError::MathOverflow)?;
    if now >= end {
        return Ok(schedule.amount_total);
    }

    let elapsed = now
        .checked_sub(schedule.start)
        .ok_or(VestingError::MathUnderflow)?;
    let whole_slices = elapsed
        .checked_div(schedule.slice_period)
        .ok_or(VestingError::InvalidSlicePeriod)?;
    let vested_seconds = whole_slices
        .checked_mul(schedule.slice_period)
        .ok_or(VestingError::MathOverflow)?;

    // Multiply before dividing; 128-bit holds any u64 * u64.
    let vested = (schedule.amount_total as u128)
        .checked_mul(vested_seconds as u128)
        .ok_or(VestingError::MathOverflow)?
        .checked_div(schedule.duration as u128)
        .ok_or(VestingError::InvalidDuration)?;
    u64::try_from(vested).map_err(|_| VestingError::MathOverflow)
}
