use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{LEDGER_SEED, VAULT_SEED};
use crate::error::VestingError;
use crate::state::VestingLedger;
use crate::token_ledger::SplVault;

pub fn process_withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
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
    .with_destination(&ctx.accounts.owner_token_account);

    let ledger = &ctx.accounts.ledger;
    ledger.withdraw(&ctx.accounts.owner.key(), amount, &mut vault)?;

    emit!(SurplusWithdrawn {
        owner: ledger.owner,
        amount,
        remaining_surplus: ledger.available_withdrawable_amount(&vault)?,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(
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

    #[account(
        mut,
        constraint = owner_token_account.mint == ledger.mint @ VestingError::InvalidTokenMint,
    )]
    pub owner_token_account: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct SurplusWithdrawn {
    pub owner: Pubkey,
    pub amount: u64,
    pub remaining_surplus: u64,
}
