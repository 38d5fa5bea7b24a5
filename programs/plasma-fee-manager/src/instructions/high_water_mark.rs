use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::{
    constants::*,
    errors::FeeManagerError,
    events::{HighWaterMarkIntervalUpdated, HighWaterMarkUpdated},
    state::FeeManager,
    vault_integration,
};

#[derive(Accounts)]
pub struct UpdateHighWaterMark<'info> {
    #[account(
        mut,
        seeds = [FEE_MANAGER_SEED, plasma_vault.key().as_ref()],
        bump = fee_manager.bump,
        constraint = fee_manager.is_initialized @ FeeManagerError::NotInitialized
    )]
    pub fee_manager: Account<'info, FeeManager>,

    /// The share-ledger vault state account
    /// CHECK: Tied to the fee manager through its PDA seeds
    pub plasma_vault: AccountInfo<'info>,

    #[account(address = fee_manager.share_mint @ FeeManagerError::InvalidShareAccount)]
    pub share_mint: Account<'info, Mint>,

    #[account(constraint = atomist.key() == fee_manager.atomist @ FeeManagerError::InvalidAuthority)]
    pub atomist: Signer<'info>,
}

#[derive(Accounts)]
pub struct UpdateHighWaterMarkInterval<'info> {
    #[account(
        mut,
        seeds = [FEE_MANAGER_SEED, fee_manager.plasma_vault.as_ref()],
        bump = fee_manager.bump,
        constraint = fee_manager.is_initialized @ FeeManagerError::NotInitialized
    )]
    pub fee_manager: Account<'info, FeeManager>,

    #[account(constraint = atomist.key() == fee_manager.atomist @ FeeManagerError::InvalidAuthority)]
    pub atomist: Signer<'info>,
}

/// Manual bump to the current exchange rate. Rejects a zero rate read
/// (misbehaving or empty ledger) and never lowers the mark.
pub fn update_high_water_mark(ctx: Context<UpdateHighWaterMark>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let rate = vault_integration::current_exchange_rate(
        &ctx.accounts.plasma_vault,
        &ctx.accounts.share_mint,
    )?;
    require!(rate > 0, FeeManagerError::InvalidHighWaterMark);

    let fee_manager = &mut ctx.accounts.fee_manager;
    let previous = fee_manager.observe_high_water_mark(rate, now);

    emit!(HighWaterMarkUpdated {
        plasma_vault: fee_manager.plasma_vault,
        old_value: previous,
        new_value: fee_manager.high_water_mark,
        timestamp: now,
    });

    Ok(())
}

/// Sets the auto-update cadence; 0 disables auto-update and leaves the mark
/// under manual control only.
pub fn update_high_water_mark_interval(
    ctx: Context<UpdateHighWaterMarkInterval>,
    interval_seconds: u32,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let fee_manager = &mut ctx.accounts.fee_manager;
    fee_manager.hwm_update_interval = interval_seconds;

    emit!(HighWaterMarkIntervalUpdated {
        plasma_vault: fee_manager.plasma_vault,
        interval_seconds,
        timestamp: now,
    });

    Ok(())
}
