use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use crate::{
    constants::*,
    errors::FeeManagerError,
    events::{FeeDistribution, ManagementFeeHarvested, PerformanceFeeHarvested},
    math,
    state::{FeeManager, FeeType},
    vault_integration,
};

/// Remaining accounts: share token accounts for the fee table being
/// harvested, in table order. `harvest_all_fees` expects the management
/// table's accounts followed by the performance table's accounts.
#[derive(Accounts)]
pub struct HarvestFees<'info> {
    #[account(
        mut,
        seeds = [FEE_MANAGER_SEED, plasma_vault.key().as_ref()],
        bump = fee_manager.bump,
        constraint = fee_manager.is_initialized @ FeeManagerError::NotInitialized
    )]
    pub fee_manager: Box<Account<'info, FeeManager>>,

    /// The share-ledger vault state account
    /// CHECK: Tied to the fee manager through its PDA seeds; layout
    /// validated on deserialization
    pub plasma_vault: AccountInfo<'info>,

    #[account(mut, address = fee_manager.share_mint @ FeeManagerError::InvalidShareAccount)]
    pub share_mint: Box<Account<'info, Mint>>,

    /// Mint authority for fee shares, owner of both holding accounts
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

    pub token_program: Program<'info, Token>,
}

pub fn harvest_management_fee<'info>(
    ctx: Context<'_, '_, 'info, 'info, HarvestFees<'info>>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    run_harvest(
        FeeType::Management,
        &mut ctx.accounts.fee_manager,
        &ctx.accounts.plasma_vault,
        &mut ctx.accounts.share_mint,
        &mut ctx.accounts.management_holding,
        &mut ctx.accounts.dao_share_account,
        &ctx.accounts.fee_custodian,
        &ctx.accounts.token_program,
        ctx.remaining_accounts,
        now,
    )?;
    Ok(())
}

pub fn harvest_performance_fee<'info>(
    ctx: Context<'_, '_, 'info, 'info, HarvestFees<'info>>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    run_harvest(
        FeeType::Performance,
        &mut ctx.accounts.fee_manager,
        &ctx.accounts.plasma_vault,
        &mut ctx.accounts.share_mint,
        &mut ctx.accounts.performance_holding,
        &mut ctx.accounts.dao_share_account,
        &ctx.accounts.fee_custodian,
        &ctx.accounts.token_program,
        ctx.remaining_accounts,
        now,
    )?;
    Ok(())
}

/// Management first, then performance: the management mint dilutes the
/// supply, and the performance fee must be computed against the diluted
/// rate (the mint is reloaded between the two legs).
pub fn harvest_all_fees<'info>(
    ctx: Context<'_, '_, 'info, 'info, HarvestFees<'info>>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let management_len = ctx.accounts.fee_manager.management_fee_recipients.len();
    require!(
        ctx.remaining_accounts.len() >= management_len,
        FeeManagerError::RecipientAccountMismatch
    );

    run_harvest(
        FeeType::Management,
        &mut ctx.accounts.fee_manager,
        &ctx.accounts.plasma_vault,
        &mut ctx.accounts.share_mint,
        &mut ctx.accounts.management_holding,
        &mut ctx.accounts.dao_share_account,
        &ctx.accounts.fee_custodian,
        &ctx.accounts.token_program,
        &ctx.remaining_accounts[..management_len],
        now,
    )?;
    run_harvest(
        FeeType::Performance,
        &mut ctx.accounts.fee_manager,
        &ctx.accounts.plasma_vault,
        &mut ctx.accounts.share_mint,
        &mut ctx.accounts.performance_holding,
        &mut ctx.accounts.dao_share_account,
        &ctx.accounts.fee_custodian,
        &ctx.accounts.token_program,
        &ctx.remaining_accounts[management_len..],
        now,
    )?;
    Ok(())
}

/// One full harvest leg: compute, mint into the holding account, advance the
/// accrual cursor, then fan the holding balance out. Returns the freshly
/// minted share count.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_harvest<'info>(
    fee_type: FeeType,
    fee_manager: &mut Account<'info, FeeManager>,
    plasma_vault: &AccountInfo<'info>,
    share_mint: &mut Account<'info, Mint>,
    holding: &mut Account<'info, TokenAccount>,
    dao_share_account: &mut Account<'info, TokenAccount>,
    fee_custodian: &AccountInfo<'info>,
    token_program: &Program<'info, Token>,
    recipient_accounts: &'info [AccountInfo<'info>],
    now: i64,
) -> Result<u64> {
    let total_fee_bps = fee_manager.total_fee_bps(fee_type);
    let total_supply = share_mint.supply;
    let plasma_vault_key = fee_manager.plasma_vault;

    let fee_shares = match fee_type {
        FeeType::Management => {
            let elapsed = now
                .saturating_sub(fee_manager.last_management_harvest_ts)
                .max(0) as u64;
            let fee_shares =
                math::management_fee_shares(total_supply, total_fee_bps, elapsed)?;

            // the cursor always advances, so zero-fee periods are not banked
            fee_manager.last_management_harvest_ts = now;

            emit!(ManagementFeeHarvested {
                plasma_vault: plasma_vault_key,
                fee_shares,
                total_supply,
                elapsed_seconds: elapsed,
                total_fee_bps,
                timestamp: now,
            });
            fee_shares
        }
        FeeType::Performance => {
            let rate = vault_integration::current_exchange_rate(plasma_vault, share_mint)?;
            let previous_high_water_mark = fee_manager.high_water_mark;
            let fee_shares = math::performance_fee_shares(
                rate,
                previous_high_water_mark,
                total_supply,
                total_fee_bps,
            )?;
            if rate > previous_high_water_mark {
                fee_manager.observe_high_water_mark(rate, now);
            }

            emit!(PerformanceFeeHarvested {
                plasma_vault: plasma_vault_key,
                fee_shares,
                exchange_rate: rate,
                previous_high_water_mark,
                total_fee_bps,
                timestamp: now,
            });
            fee_shares
        }
    };

    if fee_shares > 0 {
        mint_fee_shares(fee_manager, share_mint, holding, fee_custodian, token_program, fee_shares)?;
    }

    distribute_holding(
        fee_type,
        fee_manager,
        holding,
        dao_share_account,
        fee_custodian,
        token_program,
        recipient_accounts,
        now,
    )?;

    Ok(fee_shares)
}

pub(crate) fn mint_fee_shares<'info>(
    fee_manager: &Account<'info, FeeManager>,
    share_mint: &mut Account<'info, Mint>,
    holding: &mut Account<'info, TokenAccount>,
    fee_custodian: &AccountInfo<'info>,
    token_program: &Program<'info, Token>,
    fee_shares: u64,
) -> Result<()> {
    let plasma_vault_key = fee_manager.plasma_vault;
    token::mint_to(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            MintTo {
                mint: share_mint.to_account_info(),
                to: holding.to_account_info(),
                authority: fee_custodian.clone(),
            },
            &[&[
                FEE_CUSTODIAN_SEED,
                plasma_vault_key.as_ref(),
                &[fee_manager.custodian_bump],
            ]],
        ),
        fee_shares,
    )?;

    share_mint.reload()?;
    holding.reload()?;
    Ok(())
}

/// Fan the holding account's full balance out across the fee table plus the
/// DAO recipient. Truncation dust stays behind in the holding account.
#[allow(clippy::too_many_arguments)]
fn distribute_holding<'info>(
    fee_type: FeeType,
    fee_manager: &Account<'info, FeeManager>,
    holding: &mut Account<'info, TokenAccount>,
    dao_share_account: &mut Account<'info, TokenAccount>,
    fee_custodian: &AccountInfo<'info>,
    token_program: &Program<'info, Token>,
    recipient_accounts: &'info [AccountInfo<'info>],
    now: i64,
) -> Result<()> {
    let table = fee_manager.fee_table(fee_type);
    let table_bps: Vec<u16> = table.iter().map(|entry| entry.fee_bps).collect();

    let (payouts, dao_payout) = match math::compute_distribution(
        holding.amount,
        &table_bps,
        fee_manager.dao_fee_bps(fee_type),
    )? {
        // zero combined fee: nothing was minted, nothing to distribute
        None => return Ok(()),
        Some(split) => split,
    };

    require!(
        recipient_accounts.len() >= table.len(),
        FeeManagerError::RecipientAccountMismatch
    );

    let plasma_vault_key = fee_manager.plasma_vault;
    let custodian_bump = fee_manager.custodian_bump;
    let signer_seeds: &[&[&[u8]]] = &[&[
        FEE_CUSTODIAN_SEED,
        plasma_vault_key.as_ref(),
        &[custodian_bump],
    ]];

    for ((entry, amount), recipient_info) in table
        .iter()
        .zip(payouts.iter())
        .zip(recipient_accounts.iter())
    {
        let recipient_token = Account::<TokenAccount>::try_from(recipient_info)?;
        require_keys_eq!(
            recipient_token.mint,
            fee_manager.share_mint,
            FeeManagerError::InvalidShareAccount
        );
        require_keys_eq!(
            recipient_token.owner,
            entry.recipient,
            FeeManagerError::RecipientAccountMismatch
        );

        if *amount == 0 {
            continue;
        }

        token::transfer(
            CpiContext::new_with_signer(
                token_program.to_account_info(),
                Transfer {
                    from: holding.to_account_info(),
                    to: recipient_info.clone(),
                    authority: fee_custodian.clone(),
                },
                signer_seeds,
            ),
            *amount,
        )?;

        emit!(FeeDistribution {
            plasma_vault: plasma_vault_key,
            fee_type,
            recipient: entry.recipient,
            shares: *amount,
            timestamp: now,
        });
    }

    if dao_payout > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                token_program.to_account_info(),
                Transfer {
                    from: holding.to_account_info(),
                    to: dao_share_account.to_account_info(),
                    authority: fee_custodian.clone(),
                },
                signer_seeds,
            ),
            dao_payout,
        )?;

        emit!(FeeDistribution {
            plasma_vault: plasma_vault_key,
            fee_type,
            recipient: fee_manager.dao_fee_recipient,
            shares: dao_payout,
            timestamp: now,
        });
    }

    holding.reload()?;
    Ok(())
}
