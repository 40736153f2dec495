//! Pool Events
//!
//! Events are recorded after an operation commits and can be indexed
//! off-chain. A failed operation never leaves an event behind.

use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use crate::types::{Address, SwapDirection};

/// Event types for indexing and filtering
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Lifecycle Events (0x01 - 0x1F)
    PoolInitialized = 0x01,
    LockChanged = 0x02,

    // Liquidity Events (0x20 - 0x3F)
    LiquidityAdded = 0x20,
    LiquidityRemoved = 0x21,

    // Trade Events (0x40 - 0x5F)
    Swapped = 0x40,
}

/// All events emitted by the pool engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum PoolEvent {
    /// Emitted when a pool config, its vaults and share asset are created
    PoolInitialized {
        config: Address,
        seed: u64,
        fee_bps: u16,
        authority: Option<Address>,
    },

    /// Emitted when the authority flips the lock flag
    LockChanged {
        config: Address,
        authority: Address,
        locked: bool,
    },

    /// Emitted after a deposit commits
    LiquidityAdded {
        config: Address,
        provider: Address,
        amount_x: u64,
        amount_y: u64,
        shares_minted: u64,
        bootstrap: bool,
    },

    /// Emitted after a withdrawal commits
    LiquidityRemoved {
        config: Address,
        provider: Address,
        amount_x: u64,
        amount_y: u64,
        shares_burned: u64,
    },

    /// Emitted after a swap commits
    Swapped {
        config: Address,
        trader: Address,
        direction: SwapDirection,
        amount_in: u64,
        fee_amount: u64,
        amount_out: u64,
    },
}

impl PoolEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::PoolInitialized { .. } => EventType::PoolInitialized,
            Self::LockChanged { .. } => EventType::LockChanged,
            Self::LiquidityAdded { .. } => EventType::LiquidityAdded,
            Self::LiquidityRemoved { .. } => EventType::LiquidityRemoved,
            Self::Swapped { .. } => EventType::Swapped,
        }
    }

    /// Config the event belongs to
    pub fn config(&self) -> &Address {
        match self {
            Self::PoolInitialized { config, .. }
            | Self::LockChanged { config, .. }
            | Self::LiquidityAdded { config, .. }
            | Self::LiquidityRemoved { config, .. }
            | Self::Swapped { config, .. } => config,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting events across operations
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<PoolEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: PoolEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Take all events, leaving the log empty
    pub fn drain(&mut self) -> Vec<PoolEvent> {
        core::mem::take(&mut self.events)
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&PoolEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Events recorded for one pool
    pub fn for_pool(&self, config: &Address) -> Vec<&PoolEvent> {
        self.events.iter().filter(|e| e.config() == config).collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
