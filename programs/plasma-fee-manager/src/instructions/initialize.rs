use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    errors::FeeManagerError,
    events::FeeManagerInitialized,
    state::FeeManager,
    vault_integration,
};

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = payer,
        space = FeeManager::LEN,
        seeds = [FEE_MANAGER_SEED, plasma_vault.key().as_ref()],
        bump
    )]
    pub fee_manager: Account<'info, FeeManager>,

    /// The share-ledger vault state account
    /// CHECK: Read-only; layout validated on deserialization
    pub plasma_vault: AccountInfo<'info>,

    /// The vault's share mint
    pub share_mint: Account<'info, Mint>,

    /// Signer PDA: delegated mint authority for fee shares and owner of both
    /// holding accounts
    /// CHECK: derived and used as authority only
    #[account(
        seeds = [FEE_CUSTODIAN_SEED, plasma_vault.key().as_ref()],
        bump
    )]
    pub fee_custodian: AccountInfo<'info>,

    #[account(
        init,
        payer = payer,
        seeds = [MANAGEMENT_HOLDING_SEED, plasma_vault.key().as_ref()],
        bump,
        token::mint = share_mint,
        token::authority = fee_custodian,
    )]
    pub management_holding: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = payer,
        seeds = [PERFORMANCE_HOLDING_SEED, plasma_vault.key().as_ref()],
        bump,
        token::mint = share_mint,
        token::authority = fee_custodian,
    )]
    pub performance_holding: Account<'info, TokenAccount>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn initialize(
    ctx: Context<Initialize>,
    atomist: Pubkey,
    dao: Pubkey,
    dao_fee_recipient: Pubkey,
    dao_management_fee_bps: u16,
    dao_performance_fee_bps: u16,
) -> Result<()> {
    let fee_manager = &mut ctx.accounts.fee_manager;
    let now = Clock::get()?.unix_timestamp;

    require!(
        !fee_manager.is_initialized,
        FeeManagerError::AlreadyInitialized
    );
    require!(
        dao_fee_recipient != Pubkey::default(),
        FeeManagerError::InvalidFeeRecipientAddress
    );
    require!(
        dao_management_fee_bps <= MAX_BPS && dao_performance_fee_bps <= MAX_BPS,
        FeeManagerError::InvalidFeeValue
    );

    // Seed the high-water mark from the live exchange rate. An empty ledger
    // reads as rate 0; seed 1:1 so the first depositor's principal is not
    // treated as gain.
    let rate = vault_integration::current_exchange_rate(
        &ctx.accounts.plasma_vault,
        &ctx.accounts.share_mint,
    )?;
    let initial_high_water_mark = if rate == 0 {
        10u64
            .checked_pow(ctx.accounts.share_mint.decimals as u32)
            .ok_or(FeeManagerError::MathOverflow)?
    } else {
        rate
    };

    fee_manager.plasma_vault = ctx.accounts.plasma_vault.key();
    fee_manager.share_mint = ctx.accounts.share_mint.key();
    fee_manager.atomist = atomist;
    fee_manager.dao = dao;
    fee_manager.dao_fee_recipient = dao_fee_recipient;
    fee_manager.dao_management_fee_bps = dao_management_fee_bps;
    fee_manager.dao_performance_fee_bps = dao_performance_fee_bps;
    fee_manager.management_fee_recipients = Vec::new();
    fee_manager.performance_fee_recipients = Vec::new();
    fee_manager.management_holding = ctx.accounts.management_holding.key();
    fee_manager.performance_holding = ctx.accounts.performance_holding.key();
    fee_manager.high_water_mark = initial_high_water_mark;
    fee_manager.hwm_last_update_ts = now;
    fee_manager.hwm_update_interval = 0;
    fee_manager.last_management_harvest_ts = now;
    fee_manager.is_initialized = true;
    fee_manager.bump = ctx.bumps.fee_manager;
    fee_manager.custodian_bump = ctx.bumps.fee_custodian;

    emit!(FeeManagerInitialized {
        plasma_vault: fee_manager.plasma_vault,
        share_mint: fee_manager.share_mint,
        dao_fee_recipient,
        dao_management_fee_bps,
        dao_performance_fee_bps,
        initial_high_water_mark,
        timestamp: now,
    });

    Ok(())
}
