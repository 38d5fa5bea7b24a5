use anchor_lang::prelude::*;

use crate::{
    constants::*,
    errors::FeeManagerError,
    events::DaoFeeRecipientUpdated,
    state::FeeManager,
};

/// DAO-role gated: a distinct role from the atomist.
#[derive(Accounts)]
pub struct SetDaoFeeRecipient<'info> {
    #[account(
        mut,
        seeds = [FEE_MANAGER_SEED, fee_manager.plasma_vault.as_ref()],
        bump = fee_manager.bump,
        constraint = fee_manager.is_initialized @ FeeManagerError::NotInitialized
    )]
    pub fee_manager: Account<'info, FeeManager>,

    #[account(constraint = dao.key() == fee_manager.dao @ FeeManagerError::InvalidAuthority)]
    pub dao: Signer<'info>,
}

pub fn set_dao_fee_recipient(
    ctx: Context<SetDaoFeeRecipient>,
    new_recipient: Pubkey,
) -> Result<()> {
    require!(
        new_recipient != Pubkey::default(),
        FeeManagerError::InvalidFeeRecipientAddress
    );

    let now = Clock::get()?.unix_timestamp;
    let fee_manager = &mut ctx.accounts.fee_manager;
    let old_recipient = fee_manager.dao_fee_recipient;
    fee_manager.dao_fee_recipient = new_recipient;

    emit!(DaoFeeRecipientUpdated {
        plasma_vault: fee_manager.plasma_vault,
        old_recipient,
        new_recipient,
        timestamp: now,
    });

    Ok(())
}
