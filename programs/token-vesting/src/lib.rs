use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;
pub mod token_ledger;
pub mod utils;

pub use instructions::*;
pub use state::*;

declare_id!("9XBRNz7HdwwGiy1xPTfZ6fp5gZfR76KaXmtfkmhR36L5");

#[program]
pub mod token_vesting {
    use super::*;

    /// Create a ledger PDA and its vault for `mint`. The signer becomes the
    /// permanent owner; `nonce` lets one owner open several ledgers.
    pub fn initialize_ledger(ctx: Context<InitializeLedger>, nonce: u64) -> Result<()> {
        instructions::initialize_ledger::process_initialize_ledger(ctx, nonce)
    }

    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::process_deposit(ctx, amount)
    }

    /// Owner-only. Reserves `params.amount` out of the vault surplus.
    pub fn create_schedule(ctx: Context<CreateSchedule>, params: ScheduleParams) -> Result<()> {
        instructions::create_schedule::process_create_schedule(ctx, params)
    }

    /// Beneficiary or owner. Pays `amount` of the vested balance.
    pub fn release(ctx: Context<Release>, schedule_id: [u8; 32], amount: u64) -> Result<()> {
        instructions::release::process_release(ctx, schedule_id, amount)
    }

    /// Owner-only. Pays out what has vested and frees the remainder.
    pub fn revoke(ctx: Context<Revoke>, schedule_id: [u8; 32]) -> Result<()> {
        instructions::revoke::process_revoke(ctx, schedule_id)
    }

    /// Owner-only. Withdraws unreserved vault balance.
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::process_withdraw(ctx, amount)
    }

    pub fn quote_releasable(ctx: Context<QuoteReleasable>, schedule_id: [u8; 32]) -> Result<()> {
        instructions::quote_releasable::process_quote_releasable(ctx, schedule_id)
    }
}
