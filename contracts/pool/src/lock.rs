//! Lock / unlock
//!
//! Two states, Unlocked (initial) and Locked, toggled freely by the pool
//! authority. Locking stops deposits and swaps; withdrawals stay open.

use cpamm_common::{
    errors::{AmmError, AmmResult},
    types::{Address, PoolConfig},
};

/// Set `config.locked`; returns whether the flag changed
pub fn execute(config: &mut PoolConfig, caller: &Address, locked: bool) -> AmmResult<bool> {
    let authority = config.authority.ok_or(AmmError::AuthorityNotSet)?;
    if *caller != authority {
        return Err(AmmError::Unauthorized {
            expected: authority,
            actual: *caller,
        });
    }

    let changed = config.locked != locked;
    config.locked = locked;
    Ok(changed)
}
