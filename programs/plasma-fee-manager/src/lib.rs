use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod math;
pub mod state;
pub mod vault_integration;

use instructions::*;
use state::{FeeType, RecipientFee};

declare_id!("4qNDSGkcnyX9o18U1RrPoMomhyE2j5VXB7e7LfbAE4K7");

#[program]
pub mod plasma_fee_manager {
    use super::*;

    /// Create the fee manager for a PlasmaVault and seed the high-water
    /// mark from the current exchange rate
    pub fn initialize(
        ctx: Context<Initialize>,
        atomist: Pubkey,
        dao: Pubkey,
        dao_fee_recipient: Pubkey,
        dao_management_fee_bps: u16,
        dao_performance_fee_bps: u16,
    ) -> Result<()> {
        instructions::initialize(
            ctx,
            atomist,
            dao,
            dao_fee_recipient,
            dao_management_fee_bps,
            dao_performance_fee_bps,
        )
    }

    /// Mint the time-prorated management fee and fan it out (permissionless)
    pub fn harvest_management_fee<'info>(
        ctx: Context<'_, '_, 'info, 'info, HarvestFees<'info>>,
    ) -> Result<()> {
        instructions::harvest_management_fee(ctx)
    }

    /// Mint the high-water-mark gated performance fee and fan it out
    pub fn harvest_performance_fee<'info>(
        ctx: Context<'_, '_, 'info, 'info, HarvestFees<'info>>,
    ) -> Result<()> {
        instructions::harvest_performance_fee(ctx)
    }

    /// Both harvests, management first so its dilution is reflected in the
    /// performance fee
    pub fn harvest_all_fees<'info>(
        ctx: Context<'_, '_, 'info, 'info, HarvestFees<'info>>,
    ) -> Result<()> {
        instructions::harvest_all_fees(ctx)
    }

    /// Vault hook: accrue management fees against the pre-operation supply
    pub fn accrue_management_fee(
        ctx: Context<AccrueManagementFee>,
        total_supply: u64,
    ) -> Result<u64> {
        instructions::accrue_management_fee(ctx, total_supply)
    }

    /// Vault hook: accrue performance fees against the pre-operation snapshot
    pub fn accrue_performance_fee(
        ctx: Context<AccruePerformanceFee>,
        current_rate: u64,
        total_supply: u64,
    ) -> Result<u64> {
        instructions::accrue_performance_fee(ctx, current_rate, total_supply)
    }

    /// Replace the management fee table (harvests under the old table first)
    pub fn update_management_fee<'info>(
        ctx: Context<'_, '_, 'info, 'info, MutateFeeTable<'info>>,
        new_recipients: Vec<RecipientFee>,
    ) -> Result<()> {
        instructions::update_management_fee(ctx, new_recipients)
    }

    /// Replace the performance fee table (harvests under the old table first)
    pub fn update_performance_fee<'info>(
        ctx: Context<'_, '_, 'info, 'info, MutateFeeTable<'info>>,
        new_recipients: Vec<RecipientFee>,
    ) -> Result<()> {
        instructions::update_performance_fee(ctx, new_recipients)
    }

    /// Append one recipient to a fee table
    pub fn add_fee_recipient<'info>(
        ctx: Context<'_, '_, 'info, 'info, MutateFeeTable<'info>>,
        fee_type: FeeType,
        recipient: Pubkey,
        fee_bps: u16,
    ) -> Result<()> {
        instructions::add_fee_recipient(ctx, fee_type, recipient, fee_bps)
    }

    /// Remove one recipient from a fee table
    pub fn remove_fee_recipient<'info>(
        ctx: Context<'_, '_, 'info, 'info, MutateFeeTable<'info>>,
        fee_type: FeeType,
        recipient: Pubkey,
    ) -> Result<()> {
        instructions::remove_fee_recipient(ctx, fee_type, recipient)
    }

    /// Change one recipient's fee value in place
    pub fn update_recipient_fee<'info>(
        ctx: Context<'_, '_, 'info, 'info, MutateFeeTable<'info>>,
        fee_type: FeeType,
        recipient: Pubkey,
        fee_bps: u16,
    ) -> Result<()> {
        instructions::update_recipient_fee(ctx, fee_type, recipient, fee_bps)
    }

    /// Rotate the DAO fee recipient (DAO role)
    pub fn set_dao_fee_recipient(
        ctx: Context<SetDaoFeeRecipient>,
        new_recipient: Pubkey,
    ) -> Result<()> {
        instructions::set_dao_fee_recipient(ctx, new_recipient)
    }

    /// Manually bump the high-water mark to the current exchange rate
    pub fn update_high_water_mark(ctx: Context<UpdateHighWaterMark>) -> Result<()> {
        instructions::update_high_water_mark(ctx)
    }

    /// Set the high-water-mark auto-update cadence (0 = manual only)
    pub fn update_high_water_mark_interval(
        ctx: Context<UpdateHighWaterMarkInterval>,
        interval_seconds: u32,
    ) -> Result<()> {
        instructions::update_high_water_mark_interval(ctx, interval_seconds)
    }
}
