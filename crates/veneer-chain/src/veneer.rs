//! The chain builder and its revert: the four public operations
//!
//! [`Veneer`] layers override behavior onto named operations without the
//! caller manually preserving and re-invoking the previous implementation.
//! Wrapping converts a locally-defined operation into a forwarding slot;
//! groups composed afterwards become the newest chain layers; a single
//! revert restores the captured original and discards the whole chain.

use crate::slot::{SlotKey, SlotRegistry, SlotState};
use once_cell::sync::Lazy;
use std::sync::Arc;
use veneer_object::{compose, Layer, ObjectSpace, OpName, OverrideGroup, OwnerId};

static GLOBAL: Lazy<Veneer> = Lazy::new(|| Veneer::new(Arc::new(ObjectSpace::new())));

/// Override-chain registry over an [`ObjectSpace`]
///
/// All four operations are idempotent and fault-free: every "won't
/// wrap"/"won't revert" condition (operation absent, inherited rather than
/// local, already wrapped, already reverted, unknown owner) is a silent
/// no-op. This keeps the machinery safe to invoke blindly against owners
/// the caller does not control, whatever shape they take upstream.
///
/// Wrap and revert mutate shared state and belong in a setup phase; racing
/// them on the same slot is the caller's problem to serialize. Invoking a
/// wrapped operation afterwards is a plain synchronous call through an
/// immutable closure chain, safe for any number of concurrent readers.
#[derive(Debug)]
pub struct Veneer {
    space: Arc<ObjectSpace>,
    slots: SlotRegistry,
}

impl Veneer {
    /// Create a chain registry over the given space
    #[inline]
    #[must_use]
    pub fn new(space: Arc<ObjectSpace>) -> Self {
        Self {
            space,
            slots: SlotRegistry::new(),
        }
    }

    /// The process-wide instance
    #[inline]
    #[must_use]
    pub fn global() -> &'static Veneer {
        &GLOBAL
    }

    /// The object space this registry operates on
    #[inline]
    #[must_use]
    pub fn space(&self) -> &ObjectSpace {
        &self.space
    }

    /// The underlying slot registry
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &SlotRegistry {
        &self.slots
    }

    /// Wrap state for one `(owner, name)` slot
    #[must_use]
    pub fn slot_state(&self, owner: impl Into<OwnerId>, name: impl Into<OpName>) -> SlotState {
        self.slots.lookup(&SlotKey::new(owner, name))
    }

    /// Convert locally-defined operations into wrapped slots
    ///
    /// For each name, independently: if the operation is defined directly
    /// on the owner and the slot is not already wrapped, capture the local
    /// implementation as the original, remove the local binding, and
    /// install a forwarding entry point in its place. Groups composed
    /// afterwards layer on top of that entry point and can forward into it.
    ///
    /// Names that are absent, only inherited, already chain-forwarded, or
    /// already wrapped are skipped silently.
    pub fn wrap<I, N>(&self, owner: impl Into<OwnerId>, names: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<OpName>,
    {
        let owner = owner.into();
        for name in names {
            self.wrap_one(&owner, name.into());
        }
    }

    fn wrap_one(&self, owner: &OwnerId, name: OpName) {
        if !self.space.is_locally_defined(owner, &name) {
            tracing::trace!(owner = %owner, name = %name, "wrap skipped: not locally defined");
            return;
        }
        let key = SlotKey::new(owner.clone(), name.clone());
        if self.slots.lookup(&key) == SlotState::Wrapped {
            tracing::trace!(owner = %owner, name = %name, "wrap skipped: already wrapped");
            return;
        }
        let Some(original) = self.space.remove_local(owner, &name) else {
            return;
        };
        // The lowest chain layer: a group of exactly one element whose body
        // forwards into the captured original.
        let entry = compose(&name, &Layer::forwarding(), Some(original.clone()));
        self.space.install_composed(owner, name.clone(), entry);
        self.slots.set_wrapped(key, original);
        tracing::debug!(owner = %owner, name = %name, "wrapped slot");
    }

    /// Wrap every operation name in a group, then compose the group
    ///
    /// The group's layers become the newest links of each chain, sitting
    /// above whatever was resolvable before: the forwarding entry point if
    /// this is the first group, previously composed groups otherwise.
    pub fn wrap_group(&self, owner: impl Into<OwnerId>, group: &OverrideGroup) {
        let owner = owner.into();
        self.wrap(owner.clone(), group.operation_names());
        self.space.compose(&owner, group);
    }

    /// Restore wrapped slots to their originally captured implementations
    ///
    /// For each name with a wrapped slot, the captured original becomes the
    /// owner's locally-defined implementation again and the slot entry is
    /// cleared. Attached layers are not individually un-composed; the local
    /// definition shadows the chain, which becomes unreachable and is
    /// dropped with its last reference. One call suffices no matter how
    /// many layers were attached. Unwrapped slots are skipped silently.
    pub fn revert<I, N>(&self, owner: impl Into<OwnerId>, names: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<OpName>,
    {
        let owner = owner.into();
        for name in names {
            let name = name.into();
            let key = SlotKey::new(owner.clone(), name.clone());
            match self.slots.clear_wrapped(&key) {
                Some(original) => {
                    self.space.define(owner.clone(), name.clone(), original);
                    tracing::debug!(owner = %owner, name = %name, "reverted slot");
                }
                None => {
                    tracing::trace!(owner = %owner, name = %name, "revert skipped: not wrapped");
                }
            }
        }
    }

    /// Revert every operation name in a group
    ///
    /// Only disconnects the chain; the group stays in the owner's declared
    /// composition list. Other groups wrapped over the same names stop
    /// being called too, since the restored original now resolves first.
    pub fn revert_group(&self, owner: impl Into<OwnerId>, group: &OverrideGroup) {
        self.revert(owner, group.operation_names());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_object::{Args, Callable, Value};

    fn constant(text: &'static str) -> Callable {
        Callable::new(move |_| Ok(Value::from(text)))
    }

    fn veneer_with_foo() -> Veneer {
        let space = Arc::new(ObjectSpace::new());
        space.define("X", "foo", constant("X#foo"));
        Veneer::new(space)
    }

    fn call_foo(veneer: &Veneer) -> Value {
        veneer
            .space()
            .call(&OwnerId::new("X"), &OpName::new("foo"), &Args::none())
            .unwrap()
    }

    #[test]
    fn wrap_moves_local_definition_into_chain() {
        let veneer = veneer_with_foo();
        veneer.wrap("X", ["foo"]);

        assert_eq!(veneer.slot_state("X", "foo"), SlotState::Wrapped);
        assert!(!veneer
            .space()
            .is_locally_defined(&OwnerId::new("X"), &OpName::new("foo")));
        // Behavior is unchanged until a group layers on top.
        assert_eq!(call_foo(&veneer), Value::from("X#foo"));
    }

    #[test]
    fn wrap_absent_name_is_a_no_op() {
        let veneer = veneer_with_foo();
        veneer.wrap("X", ["bar"]);
        assert_eq!(veneer.slot_state("X", "bar"), SlotState::Unwrapped);
    }

    #[test]
    fn wrap_unknown_owner_is_a_no_op() {
        let veneer = veneer_with_foo();
        veneer.wrap("Ghost", ["foo"]);
        assert!(veneer.slots().is_empty());
    }

    #[test]
    fn wrap_inherited_operation_is_a_no_op() {
        let space = Arc::new(ObjectSpace::new());
        space.define("Parent", "bar", constant("Parent#bar"));
        space.declare_with_parent("Sub", "Parent");
        let veneer = Veneer::new(space);

        veneer.wrap("Sub", ["bar"]);
        assert_eq!(veneer.slot_state("Sub", "bar"), SlotState::Unwrapped);
        let result = veneer
            .space()
            .call(&OwnerId::new("Sub"), &OpName::new("bar"), &Args::none())
            .unwrap();
        assert_eq!(result, Value::from("Parent#bar"));
    }

    #[test]
    fn second_wrap_is_a_no_op() {
        let veneer = veneer_with_foo();
        veneer.wrap("X", ["foo"]);
        veneer.wrap("X", ["foo"]);

        assert_eq!(veneer.slots().len(), 1);
        assert_eq!(call_foo(&veneer), Value::from("X#foo"));
    }

    #[test]
    fn revert_restores_local_definition() {
        let veneer = veneer_with_foo();
        veneer.wrap("X", ["foo"]);
        veneer.revert("X", ["foo"]);

        assert_eq!(veneer.slot_state("X", "foo"), SlotState::Unwrapped);
        assert!(veneer
            .space()
            .is_locally_defined(&OwnerId::new("X"), &OpName::new("foo")));
        assert_eq!(call_foo(&veneer), Value::from("X#foo"));
    }

    #[test]
    fn revert_without_wrap_is_a_no_op() {
        let veneer = veneer_with_foo();
        veneer.revert("X", ["foo"]);
        assert_eq!(call_foo(&veneer), Value::from("X#foo"));
    }

    #[test]
    fn slot_can_be_rewrapped_after_revert() {
        let veneer = veneer_with_foo();
        veneer.wrap("X", ["foo"]);
        veneer.revert("X", ["foo"]);
        veneer.wrap("X", ["foo"]);

        assert_eq!(veneer.slot_state("X", "foo"), SlotState::Wrapped);
        assert_eq!(call_foo(&veneer), Value::from("X#foo"));
    }

    #[test]
    fn wrap_multiple_names_in_one_call() {
        let space = Arc::new(ObjectSpace::new());
        space.define("X", "foo", constant("X#foo"));
        space.define("X", "bar", constant("X#bar"));
        let veneer = Veneer::new(space);

        veneer.wrap("X", ["foo", "bar", "baz"]);
        assert_eq!(veneer.slot_state("X", "foo"), SlotState::Wrapped);
        assert_eq!(veneer.slot_state("X", "bar"), SlotState::Wrapped);
        assert_eq!(veneer.slot_state("X", "baz"), SlotState::Unwrapped);
    }

    #[test]
    fn global_instance_is_shared() {
        let a = Veneer::global();
        let b = Veneer::global();
        assert!(std::ptr::eq(a, b));
    }
}
