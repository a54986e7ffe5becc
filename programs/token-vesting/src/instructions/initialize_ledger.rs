use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{LEDGER_SEED, VAULT_SEED};
use crate::state::VestingLedger;

pub fn process_initialize_ledger(ctx: Context<InitializeLedger>, nonce: u64) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let mint = ctx.accounts.mint.key();
    let vault = ctx.accounts.vault.key();

    let ledger = &mut ctx.accounts.ledger;
    ledger.initialize(owner, mint, vault, nonce, ctx.bumps.ledger, ctx.bumps.vault)?;

    emit!(LedgerInitialized {
        ledger: ledger.key(),
        owner,
        mint,
        vault,
        nonce,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(nonce: u64)]
pub struct InitializeLedger<'info> {
    #[account(
        init,
        payer = owner,
        space = VestingLedger::space(),
        seeds = [
            LEDGER_SEED,
            mint.key().as_ref(),
            owner.key().as_ref(),
            nonce.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub ledger: Account<'info, VestingLedger>,

    #[account(
        init,
        payer = owner,
        token::mint = mint,
        token::authority = ledger,
        seeds = [VAULT_SEED, ledger.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[event]
pub struct LedgerInitialized {
    pub ledger: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub nonce: u64,
}
