//! Token movement and raw account helpers shared by the handlers

use anchor_lang::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_lang::system_program::{create_account, CreateAccount};
use anchor_spl::associated_token::get_associated_token_address_with_program_id;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::error::VoteError;

/// `transfer_checked` that skips zero amounts
///
/// Pass empty `signer_seeds` when `authority` signed the transaction.
pub fn transfer_tokens<'info>(
    token_program: &Interface<'info, TokenInterface>,
    mint: &InterfaceAccount<'info, Mint>,
    from: AccountInfo<'info>,
    to: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    amount: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    transfer_checked(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            TransferChecked {
                from,
                mint: mint.to_account_info(),
                to,
                authority,
            },
            signer_seeds,
        ),
        amount,
        mint.decimals,
    )
}

/// Deserialize one of this program's accounts passed as a remaining account
pub fn load_record<T: AccountDeserialize + Owner>(info: &AccountInfo) -> Result<T> {
    require_keys_eq!(*info.owner, T::owner(), ErrorCode::AccountOwnedByWrongProgram);
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..])
}

/// Write a record loaded with `load_record` back into its account
pub fn store_record<T: AccountSerialize>(info: &AccountInfo, record: &T) -> Result<()> {
    require!(info.is_writable, ErrorCode::AccountNotMutable);
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    record.try_serialize(&mut writer)
}

/// Token account passed as a remaining account, checked for mint and owner
pub fn load_token_account(
    info: &AccountInfo,
    token_program: &Pubkey,
    mint: &Pubkey,
    owner: &Pubkey,
) -> Result<TokenAccount> {
    require_keys_eq!(*info.owner, *token_program, ErrorCode::AccountOwnedByWrongProgram);
    let data = info.try_borrow_data()?;
    let account = TokenAccount::try_deserialize(&mut &data[..])?;

    require_keys_eq!(account.mint, *mint, VoteError::MintMismatch);
    require_keys_eq!(account.owner, *owner, VoteError::TreasuryMismatch);
    Ok(account)
}

/// Treasury payouts must land in the collective's associated token account
pub fn check_treasury_address(
    treasury: &Pubkey,
    collective: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<()> {
    let expected = get_associated_token_address_with_program_id(collective, mint, token_program);
    require_keys_eq!(*treasury, expected, VoteError::TreasuryMismatch);
    Ok(())
}

/// Allocate a rent-exempt PDA owned by this program
///
/// `signer_seeds` must derive `target`, bump included.
pub fn create_pda_account<'info>(
    system_program: &Program<'info, System>,
    payer: AccountInfo<'info>,
    target: AccountInfo<'info>,
    space: usize,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let lamports = Rent::get()?.minimum_balance(space);

    create_account(
        CpiContext::new_with_signer(
            system_program.to_account_info(),
            CreateAccount {
                from: payer,
                to: target,
            },
            signer_seeds,
        ),
        lamports,
        space as u64,
        &crate::ID,
    )
}

/// Balance stored in a `VoteBalance` PDA that may not exist yet
pub fn optional_vote_balance(info: &AccountInfo) -> Result<u64> {
    if info.owner != &crate::ID || info.data_is_empty() {
        return Ok(0);
    }
    let votes: crate::state::VoteBalance = load_record(info)?;
    Ok(votes.amount)
}
