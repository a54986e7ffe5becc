use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{LEDGER_SEED, VAULT_SEED};
use crate::error::VestingError;
use crate::state::{ScheduleParams, VestingLedger};
use crate::token_ledger::SplVault;

pub fn process_create_schedule(ctx: Context<CreateSchedule>, params: ScheduleParams) -> Result<()> {
    let mint = ctx.accounts.ledger.mint;
    let ledger_owner = ctx.accounts.ledger.owner;
    let nonce = ctx.accounts.ledger.nonce.to_le_bytes();
    let bump = [ctx.accounts.ledger.bump];
    let seeds: &[&[u8]] = &[LEDGER_SEED, mint.as_ref(), ledger_owner.as_ref(), &nonce, &bump];
    let signer_seeds = &[seeds];

    // Balance reads only; creation moves no tokens.
    let vault = SplVault::new(
        ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.vault,
        ctx.accounts.ledger.to_account_info(),
        signer_seeds,
    );

    let ledger = &mut ctx.accounts.ledger;
    let schedule_id = ledger.create_schedule(&ctx.accounts.owner.key(), &params, &vault)?;
    let schedule = ledger.schedule(&schedule_id)?;

    emit!(ScheduleCreated {
        schedule_id,
        beneficiary: schedule.beneficiary,
        start: schedule.start,
        cliff: schedule.cliff,
        duration: schedule.duration,
        slice_period: schedule.slice_period,
        revocable: schedule.revocable,
        amount_total: schedule.amount_total,
        reserved_total: ledger.reserved_total,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CreateSchedule<'info> {
    #[account(
        mut,
        seeds = [
            LEDGER_SEED,
            ledger.mint.as_ref(),
            ledger.owner.as_ref(),
            ledger.nonce.to_le_bytes().as_ref(),
        ],
        bump = ledger.bump,
        has_one = vault @ VestingError::InvalidTokenAccount,
    )]
    pub ledger: Account<'info, VestingLedger>,

    #[account(
        seeds = [VAULT_SEED, ledger.key().as_ref()],
        bump = ledger.vault_bump,
    )]
    pub vault: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct ScheduleCreated {
    pub schedule_id: [u8; 32],
    pub beneficiary: Pubkey,
    pub start: u64,
    pub cliff: u64,
    pub duration: u64,
    pub slice_period: u64,
    pub revocable: bool,
    pub amount_total: u64,
    pub reserved_total: u64,
}
