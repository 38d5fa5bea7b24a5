use anchor_lang::prelude::*;

/// PDA seeds
pub const FEE_MANAGER_SEED: &[u8] = b"fee_manager";
/// Signer PDA that holds mint authority for fee shares and owns both holding accounts
pub const FEE_CUSTODIAN_SEED: &[u8] = b"fee_custodian";
pub const MANAGEMENT_HOLDING_SEED: &[u8] = b"management_holding";
pub const PERFORMANCE_HOLDING_SEED: &[u8] = b"performance_holding";

/// Time constants (365-day year, matching the historical fee schedule)
pub const SECONDS_PER_YEAR: u64 = 365 * 86_400;

/// Fee constants
pub const MAX_BPS: u16 = 10_000;
pub const MAX_FEE_RECIPIENTS: usize = 16;
