use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    errors::FeeManagerError,
    events::{FeeSharesAccrued, HighWaterMarkUpdated},
    math,
    state::{FeeManager, FeeType},
};

use super::harvest::mint_fee_shares;

/// Vault deposit/withdraw hook. Only the share ledger itself may drive
/// accrual timing; it signs with its own state PDA and passes the
/// pre-operation supply snapshot, so fees accrue against the state the user
/// operation is about to change.
#[derive(Accounts)]
pub struct AccrueManagementFee<'info> {
    #[account(
        mut,
        seeds = [FEE_MANAGER_SEED, plasma_vault.key().as_ref()],
        bump = fee_manager.bump,
        constraint = fee_manager.is_initialized @ FeeManagerError::NotInitialized
    )]
    pub fee_manager: Account<'info, FeeManager>,

    pub plasma_vault: Signer<'info>,

    #[account(mut, address = fee_manager.share_mint @ FeeManagerError::InvalidShareAccount)]
    pub share_mint: Account<'info, Mint>,

    /// CHECK: PDA derivation
    #[account(
        seeds = [FEE_CUSTODIAN_SEED, plasma_vault.key().as_ref()],
        bump = fee_manager.custodian_bump
    )]
    pub fee_custodian: AccountInfo<'info>,

    #[account(mut, address = fee_manager.management_holding @ FeeManagerError::InvalidShareAccount)]
    pub holding: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct AccruePerformanceFee<'info> {
    #[account(
        mut,
        seeds = [FEE_MANAGER_SEED, plasma_vault.key().as_ref()],
        bump = fee_manager.bump,
        constraint = fee_manager.is_initialized @ FeeManagerError::NotInitialized
    )]
    pub fee_manager: Account<'info, FeeManager>,

    pub plasma_vault: Signer<'info>,

    #[account(mut, address = fee_manager.share_mint @ FeeManagerError::InvalidShareAccount)]
    pub share_mint: Account<'info, Mint>,

    /// CHECK: PDA derivation
    #[account(
        seeds = [FEE_CUSTODIAN_SEED, plasma_vault.key().as_ref()],
        bump = fee_manager.custodian_bump
    )]
    pub fee_custodian: AccountInfo<'info>,

    #[account(mut, address = fee_manager.performance_holding @ FeeManagerError::InvalidShareAccount)]
    pub holding: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Mints prorated management-fee shares into the holding account and
/// advances the accrual cursor. No distribution happens here; the holding
/// account buffers until the next harvest.
pub fn accrue_management_fee(
    ctx: Context<AccrueManagementFee>,
    total_supply: u64,
) -> Result<u64> {
    let fee_manager = &mut ctx.accounts.fee_manager;
    let now = Clock::get()?.unix_timestamp;

    let elapsed = now
        .saturating_sub(fee_manager.last_management_harvest_ts)
        .max(0) as u64;
    let total_fee_bps = fee_manager.total_fee_bps(FeeType::Management);
    let fee_shares = math::management_fee_shares(total_supply, total_fee_bps, elapsed)?;

    if fee_shares > 0 {
        mint_fee_shares(
            fee_manager,
            &mut ctx.accounts.share_mint,
            &mut ctx.accounts.holding,
            &ctx.accounts.fee_custodian,
            &ctx.accounts.token_program,
            fee_shares,
        )?;
    }

    let fee_manager = &mut ctx.accounts.fee_manager;
    fee_manager.last_management_harvest_ts = now;

    emit!(FeeSharesAccrued {
        plasma_vault: fee_manager.plasma_vault,
        fee_type: FeeType::Management,
        fee_shares,
        total_supply,
        timestamp: now,
    });

    Ok(fee_shares)
}

/// Computes the dilution-based performance fee against the vault-supplied
/// snapshot and advances the high-water mark. When the auto-update interval
/// has elapsed, the mark is bumped to the current rate *before* the fee
/// computation, closing the deposit/withdraw timing exploit around rate
/// spikes.
pub fn accrue_performance_fee(
    ctx: Context<AccruePerformanceFee>,
    current_rate: u64,
    total_supply: u64,
) -> Result<u64> {
    let fee_manager = &mut ctx.accounts.fee_manager;
    let now = Clock::get()?.unix_timestamp;
    let plasma_vault_key = fee_manager.plasma_vault;

    if fee_manager.auto_hwm_update_due(now) {
        let previous = fee_manager.observe_high_water_mark(current_rate, now);
        if fee_manager.high_water_mark != previous {
            emit!(HighWaterMarkUpdated {
                plasma_vault: plasma_vault_key,
                old_value: previous,
                new_value: fee_manager.high_water_mark,
                timestamp: now,
            });
        }
    }

    let total_fee_bps = fee_manager.total_fee_bps(FeeType::Performance);
    let high_water_mark = fee_manager.high_water_mark;
    let fee_shares =
        math::performance_fee_shares(current_rate, high_water_mark, total_supply, total_fee_bps)?;

    if current_rate > high_water_mark {
        fee_manager.observe_high_water_mark(current_rate, now);
        emit!(HighWaterMarkUpdated {
            plasma_vault: plasma_vault_key,
            old_value: high_water_mark,
            new_value: current_rate,
            timestamp: now,
        });
    }

    if fee_shares > 0 {
        mint_fee_shares(
            &ctx.accounts.fee_manager,
            &mut ctx.accounts.share_mint,
            &mut ctx.accounts.holding,
            &ctx.accounts.fee_custodian,
            &ctx.accounts.token_program,
            fee_shares,
        )?;
    }

    emit!(FeeSharesAccrued {
        plasma_vault: plasma_vault_key,
        fee_type: FeeType::Performance,
        fee_shares,
        total_supply,
        timestamp: now,
    });

    Ok(fee_shares)
}
