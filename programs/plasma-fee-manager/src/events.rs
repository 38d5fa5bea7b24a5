use anchor_lang::prelude::*;

use crate::state::FeeType;

#[event]
pub struct FeeManagerInitialized {
    pub plasma_vault: Pubkey,
    pub share_mint: Pubkey,
    pub dao_fee_recipient: Pubkey,
    pub dao_management_fee_bps: u16,
    pub dao_performance_fee_bps: u16,
    pub initial_high_water_mark: u64,
    pub timestamp: i64,
}

#[event]
pub struct ManagementFeeHarvested {
    pub plasma_vault: Pubkey,
    pub fee_shares: u64,
    pub total_supply: u64,
    pub elapsed_seconds: u64,
    pub total_fee_bps: u64,
    pub timestamp: i64,
}

#[event]
pub struct PerformanceFeeHarvested {
    pub plasma_vault: Pubkey,
    pub fee_shares: u64,
    pub exchange_rate: u64,
    pub previous_high_water_mark: u64,
    pub total_fee_bps: u64,
    pub timestamp: i64,
}

/// Emitted on the vault-hook accrual path; shares land in the holding
/// account without distribution.
#[event]
pub struct FeeSharesAccrued {
    pub plasma_vault: Pubkey,
    pub fee_type: FeeType,
    pub fee_shares: u64,
    pub total_supply: u64,
    pub timestamp: i64,
}

#[event]
pub struct FeeDistribution {
    pub plasma_vault: Pubkey,
    pub fee_type: FeeType,
    pub recipient: Pubkey,
    pub shares: u64,
    pub timestamp: i64,
}

#[event]
pub struct FeeTableUpdated {
    pub plasma_vault: Pubkey,
    pub fee_type: FeeType,
    pub recipient_count: u32,
    pub total_fee_bps: u64,
    pub timestamp: i64,
}

#[event]
pub struct DaoFeeRecipientUpdated {
    pub plasma_vault: Pubkey,
    pub old_recipient: Pubkey,
    pub new_recipient: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct HighWaterMarkUpdated {
    pub plasma_vault: Pubkey,
    pub old_value: u64,
    pub new_value: u64,
    pub timestamp: i64,
}

#[event]
pub struct HighWaterMarkIntervalUpdated {
    pub plasma_vault: Pubkey,
    pub interval_seconds: u32,
    pub timestamp: i64,
}
