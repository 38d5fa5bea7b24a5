use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    errors::FeeManagerError,
    events::FeeTableUpdated,
    state::{validate_fee_table, FeeManager, FeeType, RecipientFee},
};

use super::harvest::run_harvest;

/// Remaining accounts: share token accounts for the *current* (pre-update)
/// fee table of the mutated fee type, in table order. The already-elapsed
/// accrual period is harvested under the old table before the swap, so rate
/// changes are never retroactive.
#[derive(Accounts)]
pub struct MutateFeeTable<'info> {
    #[account(
        mut,
        seeds = [FEE_MANAGER_SEED, plasma_vault.key().as_ref()],
        bump = fee_manager.bump,
        constraint = fee_manager.is_initialized @ FeeManagerError::NotInitialized
    )]
    pub fee_manager: Box<Account<'info, FeeManager>>,

    /// The share-ledger vault state account
    /// CHECK: Tied to the fee manager through its PDA seeds
    pub plasma_vault: AccountInfo<'info>,

    #[account(mut, address = fee_manager.share_mint @ FeeManagerError::InvalidShareAccount)]
    pub share_mint: Box<Account<'info, Mint>>,

    /// CHECK: PDA derivation
    #[account(
        seeds = [FEE_CUSTODIAN_SEED, plasma_vault.key().as_ref()],
        bump = fee_manager.custodian_bump
    )]
    pub fee_custodian: AccountInfo<'info>,

    #[account(mut, address = fee_manager.management_holding @ FeeManagerError::InvalidShareAccount)]
    pub management_holding: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = fee_manager.performance_holding @ FeeManagerError::InvalidShareAccount)]
    pub performance_holding: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = dao_share_account.mint == fee_manager.share_mint @ FeeManagerError::InvalidShareAccount,
        constraint = dao_share_account.owner == fee_manager.dao_fee_recipient @ FeeManagerError::RecipientAccountMismatch
    )]
    pub dao_share_account: Box<Account<'info, TokenAccount>>,

    #[account(constraint = atomist.key() == fee_manager.atomist @ FeeManagerError::InvalidAuthority)]
    pub atomist: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

/// Harvest under the current table of `fee_type`, the mandatory first step
/// of every table mutation.
fn harvest_before_mutate<'info>(
    accounts: &mut MutateFeeTable<'info>,
    remaining: &'info [AccountInfo<'info>],
    fee_type: FeeType,
    now: i64,
) -> Result<()> {
    let holding = match fee_type {
        FeeType::Management => &mut accounts.management_holding,
        FeeType::Performance => &mut accounts.performance_holding,
    };
    run_harvest(
        fee_type,
        &mut accounts.fee_manager,
        &accounts.plasma_vault,
        &mut accounts.share_mint,
        holding,
        &mut accounts.dao_share_account,
        &accounts.fee_custodian,
        &accounts.token_program,
        remaining,
        now,
    )?;
    Ok(())
}

fn emit_table_updated(fee_manager: &FeeManager, fee_type: FeeType, now: i64) {
    emit!(FeeTableUpdated {
        plasma_vault: fee_manager.plasma_vault,
        fee_type,
        recipient_count: fee_manager.fee_table(fee_type).len() as u32,
        total_fee_bps: fee_manager.total_fee_bps(fee_type),
        timestamp: now,
    });
}

/// Replace the whole management fee table atomically.
pub fn update_management_fee<'info>(
    mut ctx: Context<'_, '_, 'info, 'info, MutateFeeTable<'info>>,
    new_recipients: Vec<RecipientFee>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let remaining = ctx.remaining_accounts;
    harvest_before_mutate(&mut ctx.accounts, remaining, FeeType::Management, now)?;

    validate_fee_table(&new_recipients)?;
    ctx.accounts.fee_manager.management_fee_recipients = new_recipients;

    emit_table_updated(&ctx.accounts.fee_manager, FeeType::Management, now);
    Ok(())
}

/// Replace the whole performance fee table atomically.
pub fn update_performance_fee<'info>(
    mut ctx: Context<'_, '_, 'info, 'info, MutateFeeTable<'info>>,
    new_recipients: Vec<RecipientFee>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let remaining = ctx.remaining_accounts;
    harvest_before_mutate(&mut ctx.accounts, remaining, FeeType::Performance, now)?;

    validate_fee_table(&new_recipients)?;
    ctx.accounts.fee_manager.performance_fee_recipients = new_recipients;

    emit_table_updated(&ctx.accounts.fee_manager, FeeType::Performance, now);
    Ok(())
}

pub fn add_fee_recipient<'info>(
    mut ctx: Context<'_, '_, 'info, 'info, MutateFeeTable<'info>>,
    fee_type: FeeType,
    recipient: Pubkey,
    fee_bps: u16,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let remaining = ctx.remaining_accounts;
    harvest_before_mutate(&mut ctx.accounts, remaining, fee_type, now)?;

    let fee_manager = &mut ctx.accounts.fee_manager;
    let mut candidate = fee_manager.fee_table(fee_type).clone();
    candidate.push(RecipientFee { recipient, fee_bps });
    validate_fee_table(&candidate)?;
    *fee_manager.fee_table_mut(fee_type) = candidate;

    emit_table_updated(fee_manager, fee_type, now);
    Ok(())
}

pub fn remove_fee_recipient<'info>(
    mut ctx: Context<'_, '_, 'info, 'info, MutateFeeTable<'info>>,
    fee_type: FeeType,
    recipient: Pubkey,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let remaining = ctx.remaining_accounts;
    harvest_before_mutate(&mut ctx.accounts, remaining, fee_type, now)?;

    let fee_manager = &mut ctx.accounts.fee_manager;
    let table = fee_manager.fee_table_mut(fee_type);
    let index = table
        .iter()
        .position(|entry| entry.recipient == recipient)
        .ok_or(FeeManagerError::FeeRecipientNotFound)?;
    table.remove(index);

    emit_table_updated(fee_manager, fee_type, now);
    Ok(())
}

/// In-place bps update for one entry. A zero value keeps the entry in the
/// table (it can be bumped again later) but earns no share of harvests.
pub fn update_recipient_fee<'info>(
    mut ctx: Context<'_, '_, 'info, 'info, MutateFeeTable<'info>>,
    fee_type: FeeType,
    recipient: Pubkey,
    fee_bps: u16,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let remaining = ctx.remaining_accounts;
    harvest_before_mutate(&mut ctx.accounts, remaining, fee_type, now)?;

    require!(fee_bps <= MAX_BPS, FeeManagerError::InvalidFeeValue);

    let fee_manager = &mut ctx.accounts.fee_manager;
    let table = fee_manager.fee_table_mut(fee_type);
    let entry = table
        .iter_mut()
        .find(|entry| entry.recipient == recipient)
        .ok_or(FeeManagerError::FeeRecipientNotFound)?;
    entry.fee_bps = fee_bps;

    emit_table_updated(fee_manager, fee_type, now);
    Ok(())
}
