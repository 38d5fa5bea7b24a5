use anchor_lang::prelude::*;

#[error_code]
pub enum FeeManagerError {
    #[msg("Fee manager has not been initialized")]
    NotInitialized,

    #[msg("Fee manager is already initialized")]
    AlreadyInitialized,

    #[msg("Signer does not hold the required role")]
    InvalidAuthority,

    #[msg("Fee recipient address must not be the default pubkey")]
    InvalidFeeRecipientAddress,

    #[msg("Duplicate recipient within a single fee table")]
    DuplicateFeeRecipient,

    #[msg("Fee value exceeds 10000 bps")]
    InvalidFeeValue,

    #[msg("Recipient not present in the fee table")]
    FeeRecipientNotFound,

    #[msg("Fee table exceeds the maximum recipient count")]
    TooManyFeeRecipients,

    #[msg("Exchange rate reads as zero, refusing high-water-mark update")]
    InvalidHighWaterMark,

    #[msg("Share token account does not match the share mint")]
    InvalidShareAccount,

    #[msg("Recipient token account does not match the fee table entry")]
    RecipientAccountMismatch,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Plasma vault state account is malformed")]
    InvalidVaultState,
}
