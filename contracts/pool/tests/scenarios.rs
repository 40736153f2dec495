//! End-to-end pool scenarios against the in-memory share ledger.

use cpamm_common::{
    derivation::derive_account_id,
    errors::{AmmError, LedgerError},
    events::{EventType, PoolEvent},
    ledger::Ledger,
    types::{Address, AssetId, PoolConfig, PoolRef, PoolSnapshot, SwapDirection},
};
use cpamm_pool::PoolEngine;
use cpamm_share_ledger::InMemoryLedger;

const ASSET_X: AssetId = [0xA0; 32];
const ASSET_Y: AssetId = [0xB0; 32];
const MINTER: Address = [0x01; 32];
const ADMIN: Address = [0x09; 32];
const ALICE: Address = [0x02; 32];
const BOB: Address = [0x03; 32];
const FUNDING: u64 = 10_000_000;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn create_test_engine() -> PoolEngine<InMemoryLedger> {
    init_logging();
    let mut ledger = InMemoryLedger::new();
    ledger
        .create_funded_asset(ASSET_X, MINTER, &[(ALICE, FUNDING), (BOB, FUNDING)])
        .expect("fund x");
    ledger
        .create_funded_asset(ASSET_Y, MINTER, &[(ALICE, FUNDING), (BOB, FUNDING)])
        .expect("fund y");
    PoolEngine::new(ledger)
}

fn create_pool(engine: &mut PoolEngine<InMemoryLedger>, fee_bps: u16) -> (PoolConfig, PoolRef) {
    let config = engine
        .initialize(7, ASSET_X, ASSET_Y, fee_bps, Some(ADMIN))
        .expect("initialize");
    let pool = PoolRef::of(&config);
    (config, pool)
}

/// Pool at (100000, 100000) with 100000 shares held by Alice
fn create_seeded_pool(fee_bps: u16) -> (PoolEngine<InMemoryLedger>, PoolConfig, PoolRef) {
    let mut engine = create_test_engine();
    let (config, pool) = create_pool(&mut engine, fee_bps);
    engine
        .deposit(&ALICE, &pool, 100_000, 100_000, 100_000)
        .expect("bootstrap");
    (engine, config, pool)
}

fn assert_supply_matches_holdings(engine: &PoolEngine<InMemoryLedger>, config: &PoolConfig) {
    let ledger = engine.ledger();
    for asset in [config.asset_x, config.asset_y, config.share_asset] {
        assert_eq!(ledger.supply_of(&asset).unwrap(), ledger.total_held(&asset));
    }
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_reference_swap() {
    let (mut engine, config, pool) = create_seeded_pool(300);

    let receipt = engine.swap(&BOB, &pool, SwapDirection::XToY, 10_000, 0).unwrap();
    assert_eq!(receipt.fee_amount, 300);
    assert_eq!(receipt.amount_out, 8_842);

    let snapshot = engine.pool_snapshot(&pool).unwrap();
    assert_eq!(snapshot.reserve_x, 110_000);
    assert_eq!(snapshot.reserve_y, 100_000 - 8_842);
    assert!(snapshot.k() > 100_000u128 * 100_000);

    let ledger = engine.ledger();
    assert_eq!(ledger.balance_of_owner(&BOB, &ASSET_X), FUNDING - 10_000);
    assert_eq!(ledger.balance_of_owner(&BOB, &ASSET_Y), FUNDING + 8_842);
    assert_supply_matches_holdings(&engine, &config);
}

#[test]
fn test_bootstrap_deposit_sets_reserves_and_supply() {
    let (engine, config, pool) = create_seeded_pool(300);

    assert_eq!(
        engine.pool_snapshot(&pool).unwrap(),
        PoolSnapshot { reserve_x: 100_000, reserve_y: 100_000, share_supply: 100_000 }
    );
    assert_eq!(engine.shares_of(&ALICE, &pool).unwrap(), 100_000);
    assert_eq!(engine.ledger().balance_of_owner(&ALICE, &ASSET_X), FUNDING - 100_000);
    assert_supply_matches_holdings(&engine, &config);
}

#[test]
fn test_withdraw_more_than_held_changes_nothing() {
    let (mut engine, _config, pool) = create_seeded_pool(300);
    engine.deposit(&BOB, &pool, 1_000, 1_000, 1_000).unwrap();
    let before = engine.ledger().clone();
    let events_before = engine.events().len();

    let result = engine.withdraw(&BOB, &pool, 1_001, 0, 0);
    assert_eq!(
        result,
        Err(AmmError::InsufficientShares { available: 1_000, requested: 1_001 })
    );
    assert_eq!(engine.ledger(), &before);
    assert_eq!(engine.events().len(), events_before);
}

#[test]
fn test_withdraw_without_share_account() {
    let (mut engine, _config, pool) = create_seeded_pool(300);

    let result = engine.withdraw(&BOB, &pool, 1, 0, 0);
    assert_eq!(result, Err(AmmError::InsufficientShares { available: 0, requested: 1 }));
}

#[test]
fn test_swap_slippage_leaves_reserves() {
    let (mut engine, _config, pool) = create_seeded_pool(300);
    let before = engine.pool_snapshot(&pool).unwrap();

    let result = engine.swap(&BOB, &pool, SwapDirection::XToY, 10_000, 8_843);
    assert_eq!(result, Err(AmmError::SlippageExceeded { amount: 8_842, limit: 8_843 }));
    assert_eq!(engine.pool_snapshot(&pool).unwrap(), before);
    assert_eq!(engine.ledger().balance_of_owner(&BOB, &ASSET_X), FUNDING);
}

#[test]
fn test_zero_fee_swap() {
    let (mut engine, _config, pool) = create_seeded_pool(0);

    let receipt = engine.swap(&BOB, &pool, SwapDirection::YToX, 10_000, 0).unwrap();
    // floor(10000 * 100000 / 110000)
    assert_eq!(receipt.fee_amount, 0);
    assert_eq!(receipt.amount_out, 9_090);
}

// ============================================================================
// Liquidity
// ============================================================================

#[test]
fn test_proportional_deposit_after_trading() {
    let (mut engine, config, pool) = create_seeded_pool(300);
    engine.swap(&BOB, &pool, SwapDirection::XToY, 10_000, 0).unwrap();

    // reserves (110000, 91158), supply 100000
    let quoted = engine.quote_deposit(&pool, 10_000).unwrap();
    assert_eq!(quoted, (11_000, 9_116));

    let receipt = engine.deposit(&BOB, &pool, 10_000, 11_000, 9_116).unwrap();
    assert_eq!((receipt.amount_x, receipt.amount_y), quoted);
    assert!(!receipt.bootstrap);

    let snapshot = engine.pool_snapshot(&pool).unwrap();
    assert_eq!(snapshot.share_supply, 110_000);
    assert_supply_matches_holdings(&engine, &config);
}

#[test]
fn test_deposit_over_cap_rejected() {
    let (mut engine, _config, pool) = create_seeded_pool(300);
    engine.swap(&BOB, &pool, SwapDirection::XToY, 10_000, 0).unwrap();
    let before = engine.pool_snapshot(&pool).unwrap();

    let result = engine.deposit(&BOB, &pool, 10_000, 11_000, 9_115);
    assert_eq!(result, Err(AmmError::SlippageExceeded { amount: 9_116, limit: 9_115 }));
    assert_eq!(engine.pool_snapshot(&pool).unwrap(), before);
    assert_eq!(engine.shares_of(&BOB, &pool).unwrap(), 0);
}

#[test]
fn test_round_trip_never_profits() {
    let (mut engine, _config, pool) = create_seeded_pool(300);
    engine.swap(&BOB, &pool, SwapDirection::XToY, 12_345, 0).unwrap();
    engine.swap(&BOB, &pool, SwapDirection::YToX, 777, 0).unwrap();

    let x_before = engine.ledger().balance_of_owner(&BOB, &ASSET_X);
    let y_before = engine.ledger().balance_of_owner(&BOB, &ASSET_Y);

    let added = engine.deposit(&BOB, &pool, 3_333, u64::MAX, u64::MAX).unwrap();
    let removed = engine.withdraw(&BOB, &pool, 3_333, 0, 0).unwrap();

    assert!(removed.amount_x <= added.amount_x);
    assert!(removed.amount_y <= added.amount_y);
    assert!(engine.ledger().balance_of_owner(&BOB, &ASSET_X) <= x_before);
    assert!(engine.ledger().balance_of_owner(&BOB, &ASSET_Y) <= y_before);
}

#[test]
fn test_fees_accrue_to_holders() {
    let (mut engine, _config, pool) = create_seeded_pool(300);
    for _ in 0..5 {
        engine.swap(&BOB, &pool, SwapDirection::XToY, 5_000, 0).unwrap();
        engine.swap(&BOB, &pool, SwapDirection::YToX, 5_000, 0).unwrap();
    }

    let receipt = engine.withdraw(&ALICE, &pool, 100_000, 0, 0).unwrap();
    let product = u128::from(receipt.amount_x) * u128::from(receipt.amount_y);
    assert!(product > 100_000u128 * 100_000);
    assert_eq!(engine.pool_snapshot(&pool).unwrap(), PoolSnapshot::default());
}

#[test]
fn test_bootstrap_over_residual_dust() {
    let mut engine = create_test_engine();
    let (config, pool) = create_pool(&mut engine, 300);

    // donation straight into the vault before anyone deposits
    let ledger = engine.ledger_mut();
    let alice_x = ledger.get_or_create_account(&ALICE, &ASSET_X).unwrap();
    ledger.transfer(&alice_x, &config.vault_x(), 7).unwrap();

    // a swap cannot drain it while the other side is empty
    assert_eq!(
        engine.swap(&BOB, &pool, SwapDirection::YToX, 100, 0),
        Err(AmmError::EmptyPool)
    );

    let receipt = engine.deposit(&BOB, &pool, 1_000, 1_000, 1_000).unwrap();
    assert!(receipt.bootstrap);
    assert_eq!((receipt.amount_x, receipt.amount_y), (1_000, 1_000));
    assert_eq!(
        engine.pool_snapshot(&pool).unwrap(),
        PoolSnapshot { reserve_x: 1_007, reserve_y: 1_000, share_supply: 1_000 }
    );

    let exit = engine.withdraw(&BOB, &pool, 1_000, 0, 0).unwrap();
    assert_eq!((exit.amount_x, exit.amount_y), (1_007, 1_000));
}

#[test]
fn test_full_exit_then_rebootstrap() {
    let (mut engine, config, pool) = create_seeded_pool(300);
    engine.swap(&BOB, &pool, SwapDirection::XToY, 10_000, 0).unwrap();
    engine.withdraw(&ALICE, &pool, 100_000, 0, 0).unwrap();
    assert_eq!(engine.pool_snapshot(&pool).unwrap(), PoolSnapshot::default());

    let receipt = engine.deposit(&BOB, &pool, 5_000, 2_000, 8_000).unwrap();
    assert!(receipt.bootstrap);
    assert_eq!(
        engine.pool_snapshot(&pool).unwrap(),
        PoolSnapshot { reserve_x: 2_000, reserve_y: 8_000, share_supply: 5_000 }
    );
    assert_supply_matches_holdings(&engine, &config);
}

// ============================================================================
// Lock state machine
// ============================================================================

#[test]
fn test_lock_blocks_deposit_and_swap_only() {
    let (mut engine, _config, pool) = create_seeded_pool(300);
    assert_eq!(engine.set_locked(&ADMIN, &pool, true), Ok(true));

    assert_eq!(engine.deposit(&BOB, &pool, 10, 100, 100), Err(AmmError::PoolLocked));
    assert_eq!(
        engine.swap(&BOB, &pool, SwapDirection::XToY, 100, 0),
        Err(AmmError::PoolLocked)
    );

    // exits and previews stay open
    assert!(engine.quote_swap(&pool, SwapDirection::XToY, 100).is_ok());
    let receipt = engine.withdraw(&ALICE, &pool, 50_000, 50_000, 50_000).unwrap();
    assert_eq!((receipt.amount_x, receipt.amount_y), (50_000, 50_000));

    assert_eq!(engine.set_locked(&ADMIN, &pool, false), Ok(true));
    assert!(engine.swap(&BOB, &pool, SwapDirection::XToY, 100, 0).is_ok());
}

#[test]
fn test_lock_requires_authority() {
    let (mut engine, _config, pool) = create_seeded_pool(300);

    assert_eq!(
        engine.set_locked(&BOB, &pool, true),
        Err(AmmError::Unauthorized { expected: ADMIN, actual: BOB })
    );
    assert!(!engine.config(&pool.config).unwrap().locked);
}

#[test]
fn test_lock_events_only_on_change() {
    let (mut engine, _config, pool) = create_seeded_pool(300);
    engine.drain_events();

    assert_eq!(engine.set_locked(&ADMIN, &pool, false), Ok(false));
    assert!(engine.events().is_empty());

    engine.set_locked(&ADMIN, &pool, true).unwrap();
    engine.set_locked(&ADMIN, &pool, true).unwrap();
    let events = engine.events().filter_by_type(EventType::LockChanged);
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0],
        &PoolEvent::LockChanged { config: pool.config, authority: ADMIN, locked: true }
    );
}

#[test]
fn test_pool_without_authority_cannot_lock() {
    let mut engine = create_test_engine();
    let config = engine.initialize(1, ASSET_X, ASSET_Y, 30, None).unwrap();
    let pool = PoolRef::of(&config);

    assert_eq!(engine.set_locked(&ADMIN, &pool, true), Err(AmmError::AuthorityNotSet));
}

// ============================================================================
// Addressing
// ============================================================================

#[test]
fn test_pools_are_keyed_by_seed_and_authority() {
    let mut engine = create_test_engine();
    let a = engine.initialize(1, ASSET_X, ASSET_Y, 30, None).unwrap();
    let b = engine.initialize(2, ASSET_X, ASSET_Y, 30, None).unwrap();
    let c = engine.initialize(1, ASSET_X, ASSET_Y, 30, Some(ADMIN)).unwrap();

    assert_ne!(a.address(), b.address());
    assert_ne!(a.address(), c.address());
    assert_ne!(a.share_asset, b.share_asset);
    assert_eq!(engine.pools().count(), 3);

    engine.deposit(&ALICE, &PoolRef::of(&a), 1_000, 1_000, 1_000).unwrap();
    assert_eq!(engine.pool_snapshot(&PoolRef::of(&b)).unwrap(), PoolSnapshot::default());
}

#[test]
fn test_wrong_identifiers_rejected() {
    let (mut engine, config, pool) = create_seeded_pool(300);

    let swapped_assets = PoolRef { config: pool.config, asset_x: ASSET_Y, asset_y: ASSET_X };
    assert_eq!(
        engine.deposit(&BOB, &swapped_assets, 10, 100, 100),
        Err(AmmError::AccountMismatch { expected: ASSET_X, actual: ASSET_Y })
    );

    let unknown = PoolRef { config: [0xEE; 32], ..pool };
    assert_eq!(
        engine.withdraw(&ALICE, &unknown, 10, 0, 0),
        Err(AmmError::PoolNotFound { config: [0xEE; 32] })
    );

    assert_eq!(
        engine.initialize(7, ASSET_X, ASSET_Y, 300, Some(ADMIN)),
        Err(AmmError::AlreadyExists { config: config.address() })
    );
}

#[test]
fn test_pool_cannot_act_as_its_own_caller() {
    let (mut engine, _config, pool) = create_seeded_pool(300);
    let before = engine.ledger().clone();
    let mismatch = AmmError::AccountMismatch { expected: pool.config, actual: pool.config };

    // the config's own accounts are the vaults, so nothing would be paid in
    let deposit = engine.deposit(&pool.config, &pool, 50_000, u64::MAX, u64::MAX);
    assert_eq!(deposit.unwrap_err(), mismatch);
    let withdraw = engine.withdraw(&pool.config, &pool, 1, 0, 0);
    assert_eq!(withdraw.unwrap_err(), mismatch);
    let swap = engine.swap(&pool.config, &pool, SwapDirection::XToY, 1_000, 0);
    assert_eq!(swap.unwrap_err(), mismatch);

    assert_eq!(engine.ledger(), &before);
    assert_eq!(engine.quote_withdraw(&pool, 100_000).unwrap(), (100_000, 100_000));
}

#[test]
fn test_invalid_parameters() {
    let mut engine = create_test_engine();
    assert_eq!(
        engine.initialize(1, ASSET_X, ASSET_Y, 10_000, None),
        Err(AmmError::InvalidFee { fee_bps: 10_000 })
    );
    assert_eq!(
        engine.initialize(1, ASSET_X, ASSET_X, 30, None),
        Err(AmmError::DuplicateAssets { asset: ASSET_X })
    );
    assert_eq!(engine.pools().count(), 0);
}

// ============================================================================
// Atomicity
// ============================================================================

#[test]
fn test_ledger_failure_rolls_back_partial_deposit() {
    let mut engine = create_test_engine();
    let (_config, pool) = create_pool(&mut engine, 300);
    let alice_y = derive_account_id(&ALICE, &ASSET_Y);
    engine.ledger_mut().set_frozen(&alice_y, true).unwrap();
    let before = engine.ledger().clone();

    // X moves first, then the frozen Y account fails
    let result = engine.deposit(&ALICE, &pool, 1_000, 1_000, 1_000);
    assert_eq!(
        result,
        Err(AmmError::Ledger(LedgerError::AccountFrozen { account: alice_y }))
    );
    assert_eq!(engine.ledger(), &before);
    assert_eq!(engine.ledger().balance_of_owner(&ALICE, &ASSET_X), FUNDING);
    assert_eq!(engine.events().filter_by_type(EventType::LiquidityAdded).len(), 0);
}

#[test]
fn test_insufficient_funds_rolls_back_swap() {
    let (mut engine, config, pool) = create_seeded_pool(300);
    let carol: Address = [0x04; 32];
    let before = engine.ledger().clone();

    let result = engine.swap(&carol, &pool, SwapDirection::XToY, 500, 0);
    assert!(matches!(
        result,
        Err(AmmError::Ledger(LedgerError::InsufficientFunds { available: 0, requested: 500, .. }))
    ));
    // account creation for the trader is undone as well
    assert_eq!(engine.ledger(), &before);
    assert_supply_matches_holdings(&engine, &config);
}

#[test]
fn test_event_trail() {
    let (mut engine, _config, pool) = create_seeded_pool(300);
    engine.swap(&BOB, &pool, SwapDirection::XToY, 10_000, 0).unwrap();
    engine.withdraw(&ALICE, &pool, 1_000, 0, 0).unwrap();

    let trail: Vec<EventType> = engine
        .events()
        .for_pool(&pool.config)
        .iter()
        .map(|e| e.event_type())
        .collect();
    assert_eq!(
        trail,
        vec![
            EventType::PoolInitialized,
            EventType::LiquidityAdded,
            EventType::Swapped,
            EventType::LiquidityRemoved,
        ]
    );

    let swapped = engine.events().filter_by_type(EventType::Swapped)[0].clone();
    assert_eq!(PoolEvent::from_bytes(&swapped.to_bytes()), Some(swapped));
}
