use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{LEDGER_SEED, VAULT_SEED};
use crate::error::VestingError;
use crate::instructions::release::TokensReleased;
use crate::state::{ScheduleId, VestingLedger};
use crate::token_ledger::SplVault;
use crate::utils::time;

pub fn process_revoke(ctx: Context<Revoke>, schedule_id: ScheduleId) -> Result<()> {
    let now = time::now()?;

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

    let owner = ctx.accounts.owner.key();
    let ledger = &mut ctx.accounts.ledger;
    let revocation = ledger.revoke(&owner, &schedule_id, now, &mut vault)?;

    if revocation.released > 0 {
        let schedule = ledger.schedule(&schedule_id)?;
        emit!(TokensReleased {
            schedule_id,
            beneficiary: revocation.beneficiary,
            caller: owner,
            amount: revocation.released,
            released_total: schedule.released,
            reserved_total: ledger.reserved_total,
        });
    }

    emit!(VestingRevoked {
        schedule_id,
        beneficiary: revocation.beneficiary,
        released: revocation.released,
        freed: revocation.freed,
        reserved_total: ledger.reserved_total,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Revoke<'info> {
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

    /// Receives the vested part; must be owned by the schedule's beneficiary.
    #[account(
        mut,
        constraint = beneficiary_token_account.mint == ledger.mint @ VestingError::InvalidTokenMint,
    )]
    pub beneficiary_token_account: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct VestingRevoked {
    pub schedule_id: [u8; 32],
    pub beneficiary: Pubkey,
    pub released: u64,
    pub freed: u64,
    pub reserved_total: u64,
}
