use anchor_lang::prelude::*;

#[error_code]
pub enum VoteError {
    // --- batch input ---
    #[msg("Batch inputs have mismatched lengths")]
    ArrayLengthMismatch,

    // --- season gating ---
    #[msg("No season is open for trading")]
    SeasonNotTradeable,
    #[msg("Collective has not received its season payout")]
    CollectiveNotDistributed,
    #[msg("Season id must be non-zero and not below the current season")]
    InvalidSeason,
    #[msg("Current season must be fully distributed before advancing")]
    SeasonInProgress,
    #[msg("Season is already distributed")]
    SeasonAlreadyDistributed,
    #[msg("Season pool is fixated; its schedule can no longer change")]
    SeasonPoolFixated,
    #[msg("Season has not been verified by the oracle")]
    SeasonNotVerified,
    #[msg("Record belongs to a different season")]
    SeasonMismatch,
    #[msg("Exit round is outside the season's round table")]
    InvalidRound,

    // --- trading ---
    #[msg("Amount must be greater than 0")]
    ZeroAmount,
    #[msg("Not enough votes")]
    InsufficientVotes,
    #[msg("Price crossed the caller's bound")]
    Slippage,
    #[msg("Collective has no supply; only its own address can buy the first vote")]
    CollectiveNotInitialized,
    #[msg("Trading is paused")]
    TradingPaused,
    #[msg("Cannot transfer votes to the same holder")]
    SelfTransfer,

    // --- configuration ---
    #[msg("Fee percentages must add up to less than 100%")]
    InvalidFeeStructure,
    #[msg("Curve denominator must be greater than 0")]
    InvalidCurve,
    #[msg("Collective name exceeds maximum length")]
    NameTooLong,
    #[msg("Role list is full")]
    RoleListFull,

    // --- accounts ---
    #[msg("Signer is not authorized for this action")]
    Unauthorized,
    #[msg("Token mint does not match the payment mint")]
    MintMismatch,
    #[msg("Token account does not belong to the expected owner")]
    TreasuryMismatch,
    #[msg("Vote balance belongs to a different collective")]
    CollectiveMismatch,
    #[msg("Vault does not hold enough uncommitted funds")]
    InsufficientFunds,

    // --- math ---
    #[msg("Arithmetic overflow")]
    MathOverflow,
}
