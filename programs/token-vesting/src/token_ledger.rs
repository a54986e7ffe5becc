//! Token movement capability used by the vesting ledger.
//!
//! The ledger never mints or burns; it only reads the vault balance and
//! moves tokens out of it.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::error::VestingError;

pub trait TokenLedger {
    /// Balance currently held by `holder`.
    fn balance_of(&self, holder: &Pubkey) -> std::result::Result<u64, VestingError>;

    /// Move `amount` out of the vault to the wallet `to`.
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> std::result::Result<(), VestingError>;
}

/// SPL Token vault owned by the ledger PDA.
///
/// Only knows the vault balance and the single destination token account
/// supplied with the instruction. The cached balance is decremented on every
/// successful transfer so reads after a CPI stay accurate.
pub struct SplVault<'a, 'info> {
    token_program: AccountInfo<'info>,
    vault: AccountInfo<'info>,
    vault_key: Pubkey,
    authority: AccountInfo<'info>,
    signer_seeds: &'a [&'a [&'a [u8]]],
    mint: Pubkey,
    balance: u64,
    destination: Option<&'a Account<'info, TokenAccount>>,
}

impl<'a, 'info> SplVault<'a, 'info> {
    pub fn new(
        token_program: AccountInfo<'info>,
        vault: &Account<'info, TokenAccount>,
        authority: AccountInfo<'info>,
        signer_seeds: &'a [&'a [&'a [u8]]],
    ) -> Self {
        Self {
            token_program,
            vault: vault.to_account_info(),
            vault_key: vault.key(),
            authority,
            signer_seeds,
            mint: vault.mint,
            balance: vault.amount,
            destination: None,
        }
    }

    /// Token account that receives transfers. Must be owned by the `to`
    /// wallet passed to `transfer`.
    pub fn with_destination(mut self, destination: &'a Account<'info, TokenAccount>) -> Self {
        self.destination = Some(destination);
        self
    }
}

impl TokenLedger for SplVault<'_, '_> {
    fn balance_of(&self, holder: &Pubkey) -> std::result::Result<u64, VestingError> {
        if *holder == self.vault_key {
            Ok(self.balance)
        } else {
            Err(VestingError::InvalidTokenAccount)
        }
    }

    fn transfer(&mut self, to: &Pubkey, amount: u64) -> std::result::Result<(), VestingError> {
        let destination = self.destination.ok_or(VestingError::InvalidTokenAccount)?;
        if destination.owner != *to {
            return Err(VestingError::InvalidTokenAccount);
        }
        if destination.mint != self.mint {
            return Err(VestingError::InvalidTokenMint);
        }
        let remaining = self
            .balance
            .checked_sub(amount)
            .ok_or(VestingError::InsufficientFunds)?;

        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from: self.vault.clone(),
                    to: destination.to_account_info(),
                    authority: self.authority.clone(),
                },
                self.signer_seeds,
            ),
            amount,
        )
        .map_err(|e| {
            msg!("vault transfer of {} to {} failed: {:?}", amount, to, e);
            VestingError::TransferFailed
        })?;

        self.balance = remaining;
        Ok(())
    }
}
