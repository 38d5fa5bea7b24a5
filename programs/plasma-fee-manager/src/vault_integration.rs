//! Read-side integration with the PlasmaVault share ledger.
//!
//! The vault program owns the share mint and the asset accounting; this
//! program only needs `total_assets` to derive the exchange rate. The vault
//! state account is read zero-copy, skipping the discriminator.

use anchor_lang::prelude::*;
use anchor_spl::token::Mint;
use bytemuck::{Pod, Zeroable};

use crate::errors::FeeManagerError;
use crate::math;

/// PlasmaVault state (simplified representation; fields past `total_assets`
/// are not interpreted here).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PlasmaVaultState {
    pub asset_mint: Pubkey,
    pub share_mint: Pubkey,
    pub total_assets: u64,
    pub total_idle: u64,
    pub last_update_ts: i64,
    pub _reserved: [u8; 64],
}

/// Helper to deserialize the vault state account safely
pub fn deserialize_vault_state(account: &AccountInfo) -> Result<PlasmaVaultState> {
    let expected = 8 + std::mem::size_of::<PlasmaVaultState>();
    if account.data_len() < expected {
        return Err(FeeManagerError::InvalidVaultState.into());
    }

    let data = account.try_borrow_data()?;
    let state = bytemuck::try_from_bytes::<PlasmaVaultState>(&data[8..expected]) // Skip discriminator
        .map_err(|_| FeeManagerError::InvalidVaultState)?;

    Ok(*state)
}

/// `convertToAssets(one share unit)` read against a live supply snapshot.
pub fn current_exchange_rate(
    plasma_vault: &AccountInfo,
    share_mint: &Account<Mint>,
) -> Result<u64> {
    let state = deserialize_vault_state(plasma_vault)?;
    require_keys_eq!(
        state.share_mint,
        share_mint.key(),
        FeeManagerError::InvalidVaultState
    );
    math::exchange_rate(state.total_assets, share_mint.supply, share_mint.decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vault_state_layout_is_stable() {
        // 32 + 32 + 8 + 8 + 8 + 64, no implicit padding
        assert_eq!(std::mem::size_of::<PlasmaVaultState>(), 152);
    }

    #[test]
    fn exchange_rate_from_vault_state() {
        let mut state = PlasmaVaultState::zeroed();
        state.total_assets = 1_500_000;

        let rate = math::exchange_rate(state.total_assets, 1_000_000, 6).unwrap();
        assert_eq!(rate, 1_500_000);
    }
}
