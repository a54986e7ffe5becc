//! Deterministic schedule IDs: blake3(domain || holder || index_le).

use anchor_lang::prelude::Pubkey;
use bytemuck::{Pod, Zeroable};

use crate::constants::SCHEDULE_ID_DOMAIN;
use crate::state::ScheduleId;

#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct IdPreimage {
    holder: [u8; 32],
    index: [u8; 8],
}

/// ID of the `index`-th schedule created for `holder`.
pub fn derive(holder: &Pubkey, index: u64) -> ScheduleId {
    let preimage = IdPreimage {
        holder: holder.to_bytes(),
        index: index.to_le_bytes(),
    };
    let mut hasher = blake3::Hasher::new();
    hasher.update(SCHEDULE_ID_DOMAIN);
    hasher.update(bytemuck::bytes_of(&preimage));
    *hasher.finalize().as_bytes()
}
