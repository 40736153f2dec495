//! Deterministic Address Derivation
//!
//! Maps a domain tag plus identifying fields to a stable 32-byte id.
//! Every field is length-prefixed so distinct inputs can never
//! concatenate to the same preimage.

use sha2::{Digest, Sha256};

use crate::constants::seeds;
use crate::types::{AccountId, Address, AssetId};

/// Hash a domain tag and a list of parts into an address
pub fn derive_address(domain: &[u8], parts: &[&[u8]]) -> Address {
    let mut hasher = Sha256::new();
    hasher.update((domain.len() as u32).to_le_bytes());
    hasher.update(domain);
    for part in parts {
        hasher.update((part.len() as u32).to_le_bytes());
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut id = [0u8; 32];
    id.copy_from_slice(&result);
    id
}

/// Location of the config for (seed, asset_x, asset_y[, authority])
pub fn derive_config_address(
    seed: u64,
    asset_x: &AssetId,
    asset_y: &AssetId,
    authority: Option<&Address>,
) -> Address {
    let seed_bytes = seed.to_le_bytes();
    match authority {
        Some(authority) => derive_address(
            seeds::CONFIG,
            &[&seed_bytes, asset_x, asset_y, authority],
        ),
        None => derive_address(seeds::CONFIG, &[&seed_bytes, asset_x, asset_y]),
    }
}

/// LP share asset minted by a config
pub fn derive_share_asset(config: &Address) -> AssetId {
    derive_address(seeds::SHARES, &[config])
}

/// Ledger account of `owner` for `asset`
pub fn derive_account_id(owner: &Address, asset: &AssetId) -> AccountId {
    derive_address(seeds::ACCOUNT, &[owner, asset])
}
