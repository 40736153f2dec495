//! Constant-Product Pool Common Library
//!
//! Shared types, constants, and utilities for the pool engine and the
//! ledger that custodies its balances.
//!
//! ## Modules
//!
//! - **constants**: Fee denominator, derivation domain tags, bootstrap floor
//! - **errors**: `AmmError` taxonomy and ledger errors
//! - **types**: `PoolConfig`, operation requests and receipts
//! - **math**: Checked share math and swap pricing
//! - **events**: Typed pool events and the event log
//! - **derivation**: Deterministic config/vault/share addresses
//! - **ledger**: The `Ledger` collaborator trait
//!
//! This crate is `no_std` compatible when built without the default
//! `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export collections for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{collections::BTreeMap, vec::Vec};
#[cfg(feature = "std")]
pub use std::{collections::BTreeMap, vec::Vec};

pub mod constants;
pub mod derivation;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod math;
pub mod types;

// Re-exports for convenience
pub use derivation::*;
pub use errors::*;
pub use events::*;
pub use ledger::Ledger;
pub use math::*;
pub use types::*;
