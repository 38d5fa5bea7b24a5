//! Fee calculation engine.
//!
//! Pure functions only; all callers snapshot `(total_supply, exchange_rate)`
//! once per transaction before invoking anything here. Arithmetic is done in
//! `u128` with truncating division so fees are never over-collected by
//! rounding, and results narrow back to `u64` with an explicit overflow check.

use anchor_lang::prelude::*;

use crate::constants::{MAX_BPS, SECONDS_PER_YEAR};
use crate::errors::FeeManagerError;

/// Time-prorated management fee, in shares.
///
/// `total_supply * total_fee_bps * elapsed_secs / (10_000 * SECONDS_PER_YEAR)`
///
/// Returns 0 when the fee or the elapsed window is zero; the caller is still
/// expected to advance its harvest timestamp so zero-fee periods are not
/// banked against a later, higher fee.
pub fn management_fee_shares(
    total_supply: u64,
    total_fee_bps: u64,
    elapsed_secs: u64,
) -> Result<u64> {
    if total_fee_bps == 0 || elapsed_secs == 0 || total_supply == 0 {
        return Ok(0);
    }

    let numerator = (total_supply as u128)
        .checked_mul(total_fee_bps as u128)
        .ok_or(FeeManagerError::MathOverflow)?
        .checked_mul(elapsed_secs as u128)
        .ok_or(FeeManagerError::MathOverflow)?;
    let denominator = (MAX_BPS as u128)
        .checked_mul(SECONDS_PER_YEAR as u128)
        .ok_or(FeeManagerError::MathOverflow)?;

    let shares = numerator
        .checked_div(denominator)
        .ok_or(FeeManagerError::MathOverflow)?;

    u64::try_from(shares).map_err(|_| FeeManagerError::MathOverflow.into())
}

/// Dilution-based performance fee, in shares.
///
/// No fee accrues at or below the high-water mark. Above it, the fee is a
/// fraction of the post-gain share value:
///
/// `total_supply * total_fee_bps * (rate - hwm) / (10_000 * rate)`
///
/// Dividing by the current rate (rather than normalizing the raw gain by the
/// asset decimals) accounts for the dilution caused by minting the fee shares
/// themselves; the naive form over-mints and must not be reintroduced.
pub fn performance_fee_shares(
    current_rate: u64,
    high_water_mark: u64,
    total_supply: u64,
    total_fee_bps: u64,
) -> Result<u64> {
    if current_rate == 0 || current_rate <= high_water_mark {
        return Ok(0);
    }
    if total_fee_bps == 0 || total_supply == 0 {
        return Ok(0);
    }

    let gain = current_rate - high_water_mark;

    let numerator = (total_supply as u128)
        .checked_mul(total_fee_bps as u128)
        .ok_or(FeeManagerError::MathOverflow)?
        .checked_mul(gain as u128)
        .ok_or(FeeManagerError::MathOverflow)?;
    let denominator = (MAX_BPS as u128)
        .checked_mul(current_rate as u128)
        .ok_or(FeeManagerError::MathOverflow)?;

    let shares = numerator
        .checked_div(denominator)
        .ok_or(FeeManagerError::MathOverflow)?;

    u64::try_from(shares).map_err(|_| FeeManagerError::MathOverflow.into())
}

/// `convertToAssets(one share unit)`, scaled to asset decimals.
///
/// A zero supply reads as rate 0; callers decide whether that is a no-op
/// (harvest) or an error (manual high-water-mark update).
pub fn exchange_rate(total_assets: u64, total_supply: u64, decimals: u8) -> Result<u64> {
    if total_supply == 0 {
        return Ok(0);
    }

    let unit = 10u128
        .checked_pow(decimals as u32)
        .ok_or(FeeManagerError::MathOverflow)?;
    let rate = (total_assets as u128)
        .checked_mul(unit)
        .ok_or(FeeManagerError::MathOverflow)?
        .checked_div(total_supply as u128)
        .ok_or(FeeManagerError::MathOverflow)?;

    u64::try_from(rate).map_err(|_| FeeManagerError::MathOverflow.into())
}

/// Pro-rata slice of a holding-account balance.
pub fn proportional_share(balance: u64, part_bps: u64, total_bps: u64) -> Result<u64> {
    if total_bps == 0 || part_bps == 0 || balance == 0 {
        return Ok(0);
    }

    let share = (balance as u128)
        .checked_mul(part_bps as u128)
        .ok_or(FeeManagerError::MathOverflow)?
        .checked_div(total_bps as u128)
        .ok_or(FeeManagerError::MathOverflow)?;

    u64::try_from(share).map_err(|_| FeeManagerError::MathOverflow.into())
}

/// Fan-out of a holding-account balance across the recipient table plus the
/// DAO recipient. Returns `None` when the combined fee is zero (nothing was
/// minted, nothing to distribute). Truncation dust stays in the holding
/// account and rides into the next harvest; at most one unit per payee.
pub fn compute_distribution(
    balance: u64,
    recipient_bps: &[u16],
    dao_bps: u16,
) -> Result<Option<(Vec<u64>, u64)>> {
    let total_bps = recipient_bps
        .iter()
        .map(|bps| *bps as u64)
        .sum::<u64>()
        .checked_add(dao_bps as u64)
        .ok_or(FeeManagerError::MathOverflow)?;
    if total_bps == 0 {
        return Ok(None);
    }

    let mut payouts = Vec::with_capacity(recipient_bps.len());
    for bps in recipient_bps {
        payouts.push(proportional_share(balance, *bps as u64, total_bps)?);
    }
    let dao_payout = proportional_share(balance, dao_bps as u64, total_bps)?;

    Ok(Some((payouts, dao_payout)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE_UNIT: u64 = 1_000_000; // 6-decimal asset

    #[test]
    fn management_fee_full_year_is_exact() {
        // 2% over exactly one year on 2.5e12 supply
        let shares =
            management_fee_shares(2_500_000_000_000, 200, SECONDS_PER_YEAR).unwrap();
        assert_eq!(shares, 50_000_000_000);
    }

    #[test]
    fn management_fee_prorates_over_356_days() {
        let elapsed = 356 * 86_400;
        // Supply snapshot captured from the on-chain regression fixture.
        let shares = management_fee_shares(2_499_999_995_506, 200, elapsed).unwrap();
        assert_eq!(shares, 48_767_123_200);

        // Same schedule on a round supply; truncation keeps the result at or
        // below the real-valued fee.
        let shares = management_fee_shares(2_500_000_000_000, 200, elapsed).unwrap();
        assert_eq!(shares, 48_767_123_287);
    }

    #[test]
    fn management_fee_zero_guards() {
        assert_eq!(management_fee_shares(1_000_000, 0, 86_400).unwrap(), 0);
        assert_eq!(management_fee_shares(1_000_000, 200, 0).unwrap(), 0);
        assert_eq!(management_fee_shares(0, 200, 86_400).unwrap(), 0);
    }

    #[test]
    fn management_fee_truncates_toward_zero() {
        // 1 bp over 1 second on a tiny supply rounds to nothing
        assert_eq!(management_fee_shares(1_000, 1, 1).unwrap(), 0);
    }

    #[test]
    fn performance_fee_uses_dilution_based_formula() {
        // hwm 1.0, rate 2.0, supply 1000, 20% fee:
        // gain = 1.0, dilution ratio = 0.5, fee = 1000 * 0.20 * 0.5 = 100.
        // The naive gain/10^decimals formula would over-mint 200.
        let shares =
            performance_fee_shares(2 * RATE_UNIT, RATE_UNIT, 1_000, 2_000).unwrap();
        assert_eq!(shares, 100);
    }

    #[test]
    fn performance_fee_zero_at_or_below_high_water_mark() {
        assert_eq!(
            performance_fee_shares(RATE_UNIT, RATE_UNIT, 1_000, 2_000).unwrap(),
            0
        );
        assert_eq!(
            performance_fee_shares(RATE_UNIT / 2, RATE_UNIT, 1_000, 2_000).unwrap(),
            0
        );
        // a misbehaving ledger reporting rate 0 never charges a fee
        assert_eq!(performance_fee_shares(0, 0, 1_000, 2_000).unwrap(), 0);
    }

    #[test]
    fn performance_fee_idempotent_once_mark_advances() {
        let rate = 3 * RATE_UNIT / 2;
        let first = performance_fee_shares(rate, RATE_UNIT, 1_000_000, 1_000).unwrap();
        assert!(first > 0);
        // the harvest advances the mark to `rate`; an unchanged rate yields 0
        let second = performance_fee_shares(rate, rate, 1_000_000, 1_000).unwrap();
        assert_eq!(second, 0);
    }

    #[test]
    fn exchange_rate_basics() {
        // 1:1 vault
        assert_eq!(exchange_rate(1_000_000, 1_000_000, 6).unwrap(), RATE_UNIT);
        // 2x appreciation
        assert_eq!(exchange_rate(2_000_000, 1_000_000, 6).unwrap(), 2 * RATE_UNIT);
        // empty ledger reads as zero
        assert_eq!(exchange_rate(0, 0, 6).unwrap(), 0);
        assert_eq!(exchange_rate(5_000, 0, 6).unwrap(), 0);
    }

    #[test]
    fn distribution_conserves_holding_balance() {
        let balance = 1_000_003;
        let table = [500u16, 300, 0, 1_200];
        let dao_bps = 1_000;

        let (payouts, dao) = compute_distribution(balance, &table, dao_bps)
            .unwrap()
            .unwrap();

        let distributed: u64 = payouts.iter().sum::<u64>() + dao;
        assert!(distributed <= balance);
        // dust bounded by one unit per payee
        assert!(balance - distributed <= (table.len() as u64) + 1);
        // zero-valued entry stays in the table but earns nothing
        assert_eq!(payouts[2], 0);
    }

    #[test]
    fn distribution_empty_table_routes_everything_to_dao() {
        let (payouts, dao) = compute_distribution(777_777, &[], 500)
            .unwrap()
            .unwrap();
        assert!(payouts.is_empty());
        assert_eq!(dao, 777_777);
    }

    #[test]
    fn distribution_skipped_when_total_fee_is_zero() {
        assert!(compute_distribution(1_000, &[0, 0], 0).unwrap().is_none());
        assert!(compute_distribution(1_000, &[], 0).unwrap().is_none());
    }

    #[test]
    fn distribution_exact_split() {
        // 50/30/20 over a balance divisible by the table
        let (payouts, dao) = compute_distribution(10_000, &[5_000, 3_000], 2_000)
            .unwrap()
            .unwrap();
        assert_eq!(payouts, vec![5_000, 3_000]);
        assert_eq!(dao, 2_000);
    }

    #[test]
    fn management_leg_dilutes_performance_leg() {
        // harvest_all runs management first; its mint grows the supply and
        // therefore lowers the rate the performance leg sees
        let supply = 1_000_000u64;
        let assets = 2_000_000u64;

        let mgmt = management_fee_shares(supply, 200, SECONDS_PER_YEAR).unwrap();
        assert_eq!(mgmt, 20_000);

        let diluted_supply = supply + mgmt;
        let diluted_rate = exchange_rate(assets, diluted_supply, 6).unwrap();
        assert!(diluted_rate < exchange_rate(assets, supply, 6).unwrap());

        let perf =
            performance_fee_shares(diluted_rate, RATE_UNIT, diluted_supply, 2_000).unwrap();
        let perf_undiluted =
            performance_fee_shares(2 * RATE_UNIT, RATE_UNIT, supply, 2_000).unwrap();
        assert!(perf > 0);
        assert!(perf < perf_undiluted);
    }

    #[test]
    fn table_swap_applies_new_rate_only_forward() {
        let supply = 1_000_000_000u64;
        let half_year = SECONDS_PER_YEAR / 2;

        // 1% for the first half-year, harvested at swap time
        let old = management_fee_shares(supply, 100, half_year).unwrap();
        // 4% for the second half-year
        let new = management_fee_shares(supply, 400, half_year).unwrap();

        // neither period is retroactively re-rated
        assert_eq!(old, supply / 100 / 2);
        assert_eq!(new, supply * 4 / 100 / 2);
        let whole_at_new = management_fee_shares(supply, 400, SECONDS_PER_YEAR).unwrap();
        assert!(old + new < whole_at_new);
    }
}
