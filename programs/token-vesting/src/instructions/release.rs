use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{LEDGER_SEED, VAULT_SEED};
use crate::error::VestingError;
use crate::state::{ScheduleId, VestingLedger};
use crate::token_ledger::SplVault;
use crate::utils::time;

pub fn process_release(ctx: Context<Release>, schedule_id: ScheduleId, amount: u64) -> Result<()> {
    let now = time::now()?;

    // Capture seeds before taking the mutable ledger borrow.
    let mint = ctx.accounts.ledger.mint;
    let ledger_owner = ctx.accounts.ledger.owner;
    let nonce = ctx.accounts.ledger.nonce.to_le_bytes();
    let bump = [ctx.accounts.ledger.bump];
    let seeds: &[&[u8]] = &[LEDGER_SEED, mint.as_ref(), ledger_owner.as_ref(), &nonce, &bump];
    let signer_seeds = &[seeds];

    let mut vault = SplVault::new(
        ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.vault,
        ctx.accounts.ledger.to_account_info(),
        signer_seeds,
    )
    .with_destination(&ctx.accounts.beneficiary_token_account);

    let caller = ctx.accounts.caller.key();
    let ledger = &mut ctx.accounts.ledger;
    let released = ledger.release(&caller, &schedule_id, amount, now, &mut vault)?;

    emit!(TokensReleased {
        schedule_id,
        beneficiary: released.beneficiary,
        caller,
        amount: released.amount,
        released_total: released.released_total,
        reserved_total: ledger.reserved_total,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Release<'info> {
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
        mut,
        seeds = [VAULT_SEED, ledger.key().as_ref()],
        bump = ledger.vault_bump,
    )]
    pub vault: Account<'info, TokenAccount>,

    /// Must be owned by the schedule's beneficiary (checked on transfer).
    #[account(
        mut,
        constraint = beneficiary_token_account.mint == ledger.mint @ VestingError::InvalidTokenMint,
    )]
    pub beneficiary_token_account: Account<'info, TokenAccount>,

    /// Beneficiary or ledger owner.
    pub caller: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct TokensReleased {
    pub schedule_id: [u8; 32],
    pub beneficiary: Pubkey,
    pub caller: Pubkey,
    pub amount: u64,
    pub released_total: u64,
    pub reserved_total: u64,
}
