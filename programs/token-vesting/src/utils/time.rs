//! Clock access. The calculator works in unsigned seconds; the runtime
//! reports a signed Unix timestamp.

use anchor_lang::prelude::*;

use crate::error::VestingError;

/// Current cluster time in unsigned Unix seconds.
pub fn now() -> Result<u64> {
    let ts = Clock::get()?.unix_timestamp;
    Ok(unix_seconds(ts)?)
}

pub fn unix_seconds(ts: i64) -> std::result::Result<u64, VestingError> {
    u64::try_from(ts).map_err(|_| VestingError::InvalidTimestamp)
}
