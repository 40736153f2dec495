//! Error Types for the Pool Engine
//!
//! Typed errors carrying the offending values, grouped into the five
//! classes every operation can fail with. Any error aborts the whole
//! operation; nothing is retried internally.

use core::fmt;

/// Result type alias for pool operations
pub type AmmResult<T> = Result<T, AmmError>;

/// Result type alias for ledger collaborator calls
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Input rejected before any state read
    Validation,
    /// Pool state forbids the operation
    State,
    /// Checked arithmetic failed
    Arithmetic,
    /// Computed amounts fall outside caller bounds
    Slippage,
    /// Surfaced unmodified from the ledger collaborator
    Ledger,
}

/// Main error enum for all pool engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmmError {
    // ============ Validation Errors ============
    /// Fee must satisfy 0 <= fee_bps < 10000
    InvalidFee { fee_bps: u16 },

    /// Both sides of the pool reference the same asset
    DuplicateAssets { asset: [u8; 32] },

    /// Zero amount not allowed
    ZeroAmount,

    /// Bootstrap deposit mints fewer shares than the floor
    BelowMinimum { amount: u64, minimum: u64 },

    // ============ State Errors ============
    /// Pool is locked for deposits and swaps
    PoolLocked,

    /// Supplied identifiers do not derive the stored account
    AccountMismatch { expected: [u8; 32], actual: [u8; 32] },

    /// Derived config location already occupied
    AlreadyExists { config: [u8; 32] },

    /// No pool registered at the given config address
    PoolNotFound { config: [u8; 32] },

    /// A reserve is zero, so no price exists
    EmptyPool,

    /// Caller is not the pool authority
    Unauthorized { expected: [u8; 32], actual: [u8; 32] },

    /// Pool was created without an authority
    AuthorityNotSet,

    // ============ Arithmetic Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Arithmetic underflow occurred
    Underflow,

    /// Division by zero
    DivisionByZero,

    /// Constant product decreased across a swap
    InvariantViolation { old_k: u128, new_k: u128 },

    // ============ Slippage Errors ============
    /// Computed amount outside the caller's bound
    SlippageExceeded { amount: u64, limit: u64 },

    // ============ Ledger Errors ============
    /// Caller holds fewer shares than requested
    InsufficientShares { available: u64, requested: u64 },

    /// Collaborator failure
    Ledger(LedgerError),
}

/// Failures reported by the fungible ledger collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Source account balance too low
    InsufficientFunds { account: [u8; 32], available: u64, requested: u64 },

    /// Account does not exist
    AccountNotFound { account: [u8; 32] },

    /// Account is frozen
    AccountFrozen { account: [u8; 32] },

    /// Accounts hold different assets
    AssetMismatch { expected: [u8; 32], actual: [u8; 32] },

    /// Asset is not registered
    UnknownAsset { asset: [u8; 32] },

    /// Asset is already registered
    AssetAlreadyExists { asset: [u8; 32] },

    /// Caller is not the asset's mint authority
    MintUnauthorized { asset: [u8; 32], caller: [u8; 32] },

    /// Supply or balance would exceed u64
    SupplyOverflow { asset: [u8; 32] },
}

impl AmmError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFee { .. } => "E001_INVALID_FEE",
            Self::DuplicateAssets { .. } => "E002_DUPLICATE_ASSETS",
            Self::ZeroAmount => "E003_ZERO_AMOUNT",
            Self::BelowMinimum { .. } => "E004_BELOW_MINIMUM",
            Self::PoolLocked => "E010_POOL_LOCKED",
            Self::AccountMismatch { .. } => "E011_ACCOUNT_MISMATCH",
            Self::AlreadyExists { .. } => "E012_ALREADY_EXISTS",
            Self::PoolNotFound { .. } => "E013_POOL_NOT_FOUND",
            Self::EmptyPool => "E014_EMPTY_POOL",
            Self::Unauthorized { .. } => "E015_UNAUTHORIZED",
            Self::AuthorityNotSet => "E016_NO_AUTHORITY",
            Self::Overflow => "E020_OVERFLOW",
            Self::Underflow => "E021_UNDERFLOW",
            Self::DivisionByZero => "E022_DIV_ZERO",
            Self::InvariantViolation { .. } => "E023_INVARIANT",
            Self::SlippageExceeded { .. } => "E030_SLIPPAGE",
            Self::InsufficientShares { .. } => "E040_INSUFFICIENT_SHARES",
            Self::Ledger(inner) => inner.code(),
        }
    }

    /// Taxonomy class of this error
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidFee { .. }
            | Self::DuplicateAssets { .. }
            | Self::ZeroAmount
            | Self::BelowMinimum { .. } => ErrorClass::Validation,
            Self::PoolLocked
            | Self::AccountMismatch { .. }
            | Self::AlreadyExists { .. }
            | Self::PoolNotFound { .. }
            | Self::EmptyPool
            | Self::Unauthorized { .. }
            | Self::AuthorityNotSet => ErrorClass::State,
            Self::Overflow
            | Self::Underflow
            | Self::DivisionByZero
            | Self::InvariantViolation { .. } => ErrorClass::Arithmetic,
            Self::SlippageExceeded { .. } => ErrorClass::Slippage,
            Self::InsufficientShares { .. } | Self::Ledger(_) => ErrorClass::Ledger,
        }
    }
}

impl LedgerError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientFunds { .. } => "L001_INSUFFICIENT_FUNDS",
            Self::AccountNotFound { .. } => "L002_ACCOUNT_NOT_FOUND",
            Self::AccountFrozen { .. } => "L003_ACCOUNT_FROZEN",
            Self::AssetMismatch { .. } => "L004_ASSET_MISMATCH",
            Self::UnknownAsset { .. } => "L005_UNKNOWN_ASSET",
            Self::AssetAlreadyExists { .. } => "L006_ASSET_EXISTS",
            Self::MintUnauthorized { .. } => "L007_MINT_UNAUTHORIZED",
            Self::SupplyOverflow { .. } => "L008_SUPPLY_OVERFLOW",
        }
    }
}

impl From<LedgerError> for AmmError {
    fn from(err: LedgerError) -> Self {
        AmmError::Ledger(err)
    }
}

/// Short hex prefix of a 32-byte id for messages
struct ShortId<'a>(&'a [u8; 32]);

impl fmt::Display for ShortId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..4] {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, "..")
    }
}

impl fmt::Display for AmmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFee { fee_bps } => {
                write!(f, "fee of {} bps outside [0, 10000)", fee_bps)
            }
            Self::DuplicateAssets { asset } => {
                write!(f, "pool sides reference the same asset {}", ShortId(asset))
            }
            Self::ZeroAmount => write!(f, "amount cannot be zero"),
            Self::BelowMinimum { amount, minimum } => {
                write!(f, "amount {} below minimum {}", amount, minimum)
            }
            Self::PoolLocked => write!(f, "pool is locked"),
            Self::AccountMismatch { expected, actual } => write!(
                f,
                "account mismatch: expected {}, got {}",
                ShortId(expected),
                ShortId(actual)
            ),
            Self::AlreadyExists { config } => {
                write!(f, "pool config {} already exists", ShortId(config))
            }
            Self::PoolNotFound { config } => {
                write!(f, "no pool at config {}", ShortId(config))
            }
            Self::EmptyPool => write!(f, "pool has an empty reserve"),
            Self::Unauthorized { expected, actual } => write!(
                f,
                "caller {} is not the pool authority {}",
                ShortId(actual),
                ShortId(expected)
            ),
            Self::AuthorityNotSet => write!(f, "pool has no lock authority"),
            Self::Overflow => write!(f, "arithmetic overflow"),
            Self::Underflow => write!(f, "arithmetic underflow"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::InvariantViolation { old_k, new_k } => {
                write!(f, "constant product decreased from {} to {}", old_k, new_k)
            }
            Self::SlippageExceeded { amount, limit } => {
                write!(f, "slippage exceeded: computed {}, limit {}", amount, limit)
            }
            Self::InsufficientShares { available, requested } => write!(
                f,
                "insufficient shares: holding {}, requested {}",
                available, requested
            ),
            Self::Ledger(inner) => write!(f, "ledger: {}", inner),
        }
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientFunds { account, available, requested } => write!(
                f,
                "account {} holds {}, needs {}",
                ShortId(account),
                available,
                requested
            ),
            Self::AccountNotFound { account } => {
                write!(f, "account {} not found", ShortId(account))
            }
            Self::AccountFrozen { account } => {
                write!(f, "account {} is frozen", ShortId(account))
            }
            Self::AssetMismatch { expected, actual } => write!(
                f,
                "asset mismatch: expected {}, got {}",
                ShortId(expected),
                ShortId(actual)
            ),
            Self::UnknownAsset { asset } => write!(f, "unknown asset {}", ShortId(asset)),
            Self::AssetAlreadyExists { asset } => {
                write!(f, "asset {} already registered", ShortId(asset))
            }
            Self::MintUnauthorized { asset, caller } => write!(
                f,
                "{} may not mint asset {}",
                ShortId(caller),
                ShortId(asset)
            ),
            Self::SupplyOverflow { asset } => {
                write!(f, "supply of asset {} would overflow", ShortId(asset))
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AmmError {}

#[cfg(feature = "std")]
impl std::error::Error for LedgerError {}
