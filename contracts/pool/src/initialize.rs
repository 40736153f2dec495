//! Pool creation
//!
//! Creates the config at its derived location, the share asset with the
//! config as sole mint authority, and both (empty) vault accounts.

use cpamm_common::{
    constants::fees::MAX_FEE_BPS_EXCLUSIVE,
    errors::{AmmError, AmmResult},
    ledger::Ledger,
    types::{Address, AssetId, PoolConfig},
};

/// Reject bad parameters before any state is read
pub fn validate_args(fee_bps: u16, asset_x: &AssetId, asset_y: &AssetId) -> AmmResult<()> {
    if fee_bps >= MAX_FEE_BPS_EXCLUSIVE {
        return Err(AmmError::InvalidFee { fee_bps });
    }
    if asset_x == asset_y {
        return Err(AmmError::DuplicateAssets { asset: *asset_x });
    }
    Ok(())
}

/// Create the share asset and vault accounts for `config`
///
/// The caller has already checked the registry for an existing config;
/// an already-registered share asset also means the location is taken.
pub fn execute<L: Ledger>(ledger: &mut L, config: &PoolConfig) -> AmmResult<()> {
    let address: Address = config.address();

    // 1. Derived share asset must be free
    if ledger.asset_exists(&config.share_asset) {
        return Err(AmmError::AlreadyExists { config: address });
    }

    // 2. Share asset minted only by the config, zero supply
    ledger.create_asset(config.share_asset, Some(address))?;

    // 3. Vaults owned by the config (fails if either asset is unknown)
    for (asset, expected) in [
        (config.asset_x, config.vault_x()),
        (config.asset_y, config.vault_y()),
    ] {
        let vault = ledger.get_or_create_account(&address, &asset)?;
        if vault != expected {
            return Err(AmmError::AccountMismatch { expected, actual: vault });
        }
    }

    Ok(())
}
