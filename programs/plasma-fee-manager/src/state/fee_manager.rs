use anchor_lang::prelude::*;

use crate::constants::{MAX_BPS, MAX_FEE_RECIPIENTS};
use crate::errors::FeeManagerError;

/// One entry in a fee table. A recipient may appear in both the management
/// and the performance table, but never twice in the same table.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecipientFee {
    pub recipient: Pubkey,
    pub fee_bps: u16,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeType {
    Management,
    Performance,
}

#[account]
pub struct FeeManager {
    /// The share-ledger vault this manager accounts fees for
    pub plasma_vault: Pubkey,

    /// The vault's share mint (supply and decimals are read from it)
    pub share_mint: Pubkey,

    /// Owner role: fee tables and high-water-mark mutation
    pub atomist: Pubkey,

    /// DAO role: may rotate the DAO fee recipient
    pub dao: Pubkey,

    /// Receives the DAO slice of every harvest
    pub dao_fee_recipient: Pubkey,

    /// Protocol-level fee constants, fixed at initialization
    pub dao_management_fee_bps: u16,
    pub dao_performance_fee_bps: u16,

    /// Ordered recipient tables, one per fee type
    pub management_fee_recipients: Vec<RecipientFee>,
    pub performance_fee_recipients: Vec<RecipientFee>,

    /// Holding token accounts buffering accrued-but-undistributed shares
    pub management_holding: Pubkey,
    pub performance_holding: Pubkey,

    /// High-water mark: exchange rate scaled to asset decimals; monotonic
    pub high_water_mark: u64,
    pub hwm_last_update_ts: i64,
    /// Auto-update cadence in seconds; 0 = manual only
    pub hwm_update_interval: u32,

    /// Management fee accrual cursor
    pub last_management_harvest_ts: i64,

    pub is_initialized: bool,

    /// Bump seeds for PDA derivation
    pub bump: u8,
    pub custodian_bump: u8,

    /// Reserved space for future upgrades
    pub _reserved: [u8; 64],
}

// `[u8; 64]` has no derived Default; spell the impl out
impl Default for FeeManager {
    fn default() -> Self {
        Self {
            plasma_vault: Pubkey::default(),
            share_mint: Pubkey::default(),
            atomist: Pubkey::default(),
            dao: Pubkey::default(),
            dao_fee_recipient: Pubkey::default(),
            dao_management_fee_bps: 0,
            dao_performance_fee_bps: 0,
            management_fee_recipients: Vec::new(),
            performance_fee_recipients: Vec::new(),
            management_holding: Pubkey::default(),
            performance_holding: Pubkey::default(),
            high_water_mark: 0,
            hwm_last_update_ts: 0,
            hwm_update_interval: 0,
            last_management_harvest_ts: 0,
            is_initialized: false,
            bump: 0,
            custodian_bump: 0,
            _reserved: [0u8; 64],
        }
    }
}

impl FeeManager {
    pub const LEN: usize = 8 + // discriminator
        32 + // plasma_vault
        32 + // share_mint
        32 + // atomist
        32 + // dao
        32 + // dao_fee_recipient
        2 + // dao_management_fee_bps
        2 + // dao_performance_fee_bps
        (4 + MAX_FEE_RECIPIENTS * (32 + 2)) + // management_fee_recipients
        (4 + MAX_FEE_RECIPIENTS * (32 + 2)) + // performance_fee_recipients
        32 + // management_holding
        32 + // performance_holding
        8 + // high_water_mark
        8 + // hwm_last_update_ts
        4 + // hwm_update_interval
        8 + // last_management_harvest_ts
        1 + // is_initialized
        1 + // bump
        1 + // custodian_bump
        64; // _reserved

    pub fn fee_table(&self, fee_type: FeeType) -> &Vec<RecipientFee> {
        match fee_type {
            FeeType::Management => &self.management_fee_recipients,
            FeeType::Performance => &self.performance_fee_recipients,
        }
    }

    pub fn fee_table_mut(&mut self, fee_type: FeeType) -> &mut Vec<RecipientFee> {
        match fee_type {
            FeeType::Management => &mut self.management_fee_recipients,
            FeeType::Performance => &mut self.performance_fee_recipients,
        }
    }

    pub fn dao_fee_bps(&self, fee_type: FeeType) -> u16 {
        match fee_type {
            FeeType::Management => self.dao_management_fee_bps,
            FeeType::Performance => self.dao_performance_fee_bps,
        }
    }

    /// Sum of recipient fees plus the DAO fee. The combined management fee
    /// may exceed 10_000 bps; it is time-prorated, not a share of principal.
    pub fn total_fee_bps(&self, fee_type: FeeType) -> u64 {
        self.fee_table(fee_type)
            .iter()
            .map(|entry| entry.fee_bps as u64)
            .sum::<u64>()
            + self.dao_fee_bps(fee_type) as u64
    }

    /// Raise-only observation of the exchange rate. Returns the previous
    /// mark. The mark never decreases; the update timestamp always advances.
    pub fn observe_high_water_mark(&mut self, rate: u64, now: i64) -> u64 {
        let previous = self.high_water_mark;
        if rate > self.high_water_mark {
            self.high_water_mark = rate;
        }
        self.hwm_last_update_ts = now;
        previous
    }

    pub fn auto_hwm_update_due(&self, now: i64) -> bool {
        self.hwm_update_interval > 0
            && now >= self.hwm_last_update_ts + self.hwm_update_interval as i64
    }
}

/// Whole-table validation: bounded length, no default-pubkey recipient, no
/// per-entry fee above 100%, no duplicate recipient within the table.
pub fn validate_fee_table(entries: &[RecipientFee]) -> Result<()> {
    require!(
        entries.len() <= MAX_FEE_RECIPIENTS,
        FeeManagerError::TooManyFeeRecipients
    );
    for (index, entry) in entries.iter().enumerate() {
        require!(
            entry.recipient != Pubkey::default(),
            FeeManagerError::InvalidFeeRecipientAddress
        );
        require!(entry.fee_bps <= MAX_BPS, FeeManagerError::InvalidFeeValue);
        for earlier in &entries[..index] {
            require!(
                earlier.recipient != entry.recipient,
                FeeManagerError::DuplicateFeeRecipient
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(fee_bps: u16) -> RecipientFee {
        RecipientFee {
            recipient: Pubkey::new_unique(),
            fee_bps,
        }
    }

    #[test]
    fn validates_clean_table() {
        let table = vec![entry(100), entry(0), entry(10_000)];
        assert!(validate_fee_table(&table).is_ok());
        assert!(validate_fee_table(&[]).is_ok());
    }

    #[test]
    fn rejects_default_recipient() {
        let table = vec![RecipientFee {
            recipient: Pubkey::default(),
            fee_bps: 100,
        }];
        assert!(validate_fee_table(&table).is_err());
    }

    #[test]
    fn rejects_duplicate_recipient() {
        let shared = Pubkey::new_unique();
        let table = vec![
            RecipientFee { recipient: shared, fee_bps: 100 },
            entry(200),
            RecipientFee { recipient: shared, fee_bps: 300 },
        ];
        assert!(validate_fee_table(&table).is_err());
    }

    #[test]
    fn rejects_fee_above_max() {
        let table = vec![entry(10_001)];
        assert!(validate_fee_table(&table).is_err());
    }

    #[test]
    fn rejects_oversized_table() {
        let table: Vec<RecipientFee> =
            (0..=MAX_FEE_RECIPIENTS).map(|_| entry(1)).collect();
        assert!(validate_fee_table(&table).is_err());
    }

    #[test]
    fn total_fee_includes_dao_slice() {
        let mut manager = FeeManager::default();
        manager.dao_management_fee_bps = 300;
        manager.management_fee_recipients = vec![entry(500), entry(200)];
        assert_eq!(manager.total_fee_bps(FeeType::Management), 1_000);
        // an empty table still carries the DAO fee
        manager.management_fee_recipients.clear();
        assert_eq!(manager.total_fee_bps(FeeType::Management), 300);
    }

    #[test]
    fn high_water_mark_is_monotonic() {
        let mut manager = FeeManager::default();
        manager.observe_high_water_mark(1_000_000, 10);
        assert_eq!(manager.high_water_mark, 1_000_000);

        // rate drops never lower the mark, but the cursor still advances
        manager.observe_high_water_mark(400_000, 20);
        assert_eq!(manager.high_water_mark, 1_000_000);
        assert_eq!(manager.hwm_last_update_ts, 20);

        manager.observe_high_water_mark(1_700_000, 30);
        manager.observe_high_water_mark(900_000, 40);
        assert_eq!(manager.high_water_mark, 1_700_000);
    }

    #[test]
    fn interval_bump_absorbs_mid_window_spike() {
        let mut manager = FeeManager::default();
        manager.dao_performance_fee_bps = 2_000;
        manager.high_water_mark = 1_000_000;
        manager.hwm_last_update_ts = 0;
        manager.hwm_update_interval = 3_600;

        let supply = 1_000_000u64;
        let spiked_rate = 1_500_000u64;
        let total_bps = manager.total_fee_bps(FeeType::Performance);

        // mid-window the spike is still harvestable gain
        let now = 1_800;
        assert!(!manager.auto_hwm_update_due(now));
        let shares = crate::math::performance_fee_shares(
            spiked_rate,
            manager.high_water_mark,
            supply,
            total_bps,
        )
        .unwrap();
        assert_eq!(shares, 66_666);

        // once the interval elapses the mark is bumped first, so the same
        // rate yields no fee
        let now = 3_600;
        assert!(manager.auto_hwm_update_due(now));
        manager.observe_high_water_mark(spiked_rate, now);
        assert_eq!(manager.high_water_mark, spiked_rate);
        let shares = crate::math::performance_fee_shares(
            spiked_rate,
            manager.high_water_mark,
            supply,
            total_bps,
        )
        .unwrap();
        assert_eq!(shares, 0);
    }

    #[test]
    fn auto_update_respects_interval() {
        let mut manager = FeeManager::default();
        manager.hwm_last_update_ts = 1_000;

        // disabled when interval is zero
        assert!(!manager.auto_hwm_update_due(1_000_000));

        manager.hwm_update_interval = 3_600;
        assert!(!manager.auto_hwm_update_due(1_000 + 3_599));
        assert!(manager.auto_hwm_update_due(1_000 + 3_600));
    }
}
