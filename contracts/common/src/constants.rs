//! Protocol Constants
//!
//! Fixed parameters shared by the pool engine and the ledger.
//!
//! # Feature Configuration
//!
//! - `min-liquidity` - Require a minimum share amount on the bootstrap
//!   deposit (guards against first-depositor share inflation)
//! - Default (no feature) - The first depositor may choose any non-zero
//!   share denomination
//!
//! ```toml
//! cpamm-common = { path = "...", features = ["min-liquidity"] }
//! ```

/// Fee Configuration (in basis points, 100 = 1%)
pub mod fees {
    /// Basis points denominator
    pub const BPS_DENOMINATOR: u64 = 10_000;

    /// Exclusive upper bound for a pool fee (a 100% fee is rejected)
    pub const MAX_FEE_BPS_EXCLUSIVE: u16 = 10_000;
}

/// Domain tags for deterministic address derivation
pub mod seeds {
    /// Pool configuration account
    pub const CONFIG: &[u8] = b"cpamm/config/v1";

    /// LP share asset owned by a config
    pub const SHARES: &[u8] = b"cpamm/shares/v1";

    /// Ledger account for an (owner, asset) pair
    pub const ACCOUNT: &[u8] = b"cpamm/account/v1";
}

/// Bootstrap (first deposit) parameters
pub mod bootstrap {
    /// Minimum shares minted by the bootstrap deposit
    #[cfg(feature = "min-liquidity")]
    pub const MIN_INITIAL_SHARES: u64 = 1_000;

    /// Minimum shares minted by the bootstrap deposit
    #[cfg(not(feature = "min-liquidity"))]
    pub const MIN_INITIAL_SHARES: u64 = 1;
}
