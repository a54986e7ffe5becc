use anchor_lang::prelude::*;

use crate::constants::LEDGER_SEED;
use crate::state::{ScheduleId, VestingLedger};
use crate::utils::{calculator, time};

pub fn process_quote_releasable(ctx: Context<QuoteReleasable>, schedule_id: ScheduleId) -> Result<()> {
    let now = time::now()?;
    let ledger = &ctx.accounts.ledger;

    let releasable = ledger.releasable_amount(&schedule_id, now)?;
    let schedule = ledger.schedule(&schedule_id)?;
    let vested = calculator::vested_amount(schedule, now)?;

    emit!(ReleasableQuote {
        schedule_id,
        beneficiary: schedule.beneficiary,
        now,
        vested,
        released: schedule.released,
        releasable,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct QuoteReleasable<'info> {
    #[account(
        seeds = [
            LEDGER_SEED,
            ledger.mint.as_ref(),
            ledger.owner.as_ref(),
            ledger.nonce.to_le_bytes().as_ref(),
        ],
        bump = ledger.bump,
    )]
    pub ledger: Account<'info, VestingLedger>,
}

#[event]
pub struct ReleasableQuote {
    pub schedule_id: [u8; 32],
    pub beneficiary: Pubkey,
    pub now: u64,
    pub vested: u64,
    pub released: u64,
    pub releasable: u64,
}
