//! Slot registry: per-slot wrap state and captured originals
//!
//! A slot is one `(owner, operation name)` pair. The registry is the only
//! durable state the chain machinery keeps: an entry is present exactly
//! while the slot is wrapped, and its value is the original implementation
//! captured at wrap time. Override layers are never stored here; they live
//! inside the composed callables and become garbage once a revert stops
//! referencing them.

use dashmap::DashMap;
use veneer_object::{Callable, OpName, OwnerId};

/// Key identifying one overridable operation on one owner
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    /// Owner holding the operation
    pub owner: OwnerId,
    /// Operation name
    pub name: OpName,
}

impl SlotKey {
    /// Create a slot key
    #[inline]
    #[must_use]
    pub fn new(owner: impl Into<OwnerId>, name: impl Into<OpName>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

/// Wrap state of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    /// No chain exists; the operation resolves normally
    #[default]
    Unwrapped,

    /// The original implementation has been captured and the publicly
    /// resolvable implementation forwards through the chain
    Wrapped,
}

/// Registry of wrapped slots
///
/// No eviction: entries persist until cleared by a revert, and the table
/// stays small (one entry per overridden operation per owner).
#[derive(Debug, Default)]
pub struct SlotRegistry {
    slots: DashMap<SlotKey, Callable>,
}

impl SlotRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Current state of a slot
    #[must_use]
    pub fn lookup(&self, key: &SlotKey) -> SlotState {
        if self.slots.contains_key(key) {
            SlotState::Wrapped
        } else {
            SlotState::Unwrapped
        }
    }

    /// Record a slot as wrapped, capturing its original implementation
    pub fn set_wrapped(&self, key: SlotKey, original: Callable) {
        self.slots.insert(key, original);
    }

    /// Clear a wrapped slot, returning the captured original
    ///
    /// Returns `None` (and changes nothing) if the slot was not wrapped.
    pub fn clear_wrapped(&self, key: &SlotKey) -> Option<Callable> {
        self.slots.remove(key).map(|(_, original)| original)
    }

    /// Number of wrapped slots
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slots are wrapped
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
