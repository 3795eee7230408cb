//! Per-owner operation tables with explicit provenance
//!
//! An [`Owner`] records only what it defines itself: the `own` table holds
//! locally-defined operations, the `composed` table holds chain-forwarded
//! entries installed by the composition primitive. Inherited operations are
//! never stored here; resolution walks the parent link instead.

use crate::callable::Callable;
use crate::ident::{OpName, OwnerId};
use std::collections::HashMap;

/// An entity holding named operations subject to wrapping
///
/// Provenance matters: the chain builder only ever wraps names found in the
/// `own` table, so composed and inherited operations are naturally
/// ineligible.
#[derive(Debug, Clone)]
pub struct Owner {
    id: OwnerId,
    parent: Option<OwnerId>,
    /// Locally-defined operations
    own: HashMap<OpName, Callable>,
    /// Chain-forwarded entries (composed layers, wrap entry points)
    composed: HashMap<OpName, Callable>,
    /// Names of groups composed onto this owner, in composition order.
    /// Revert never removes from this list; it only disconnects the effect.
    declared_groups: Vec<String>,
}

impl Owner {
    /// Create an owner with no parent
    #[inline]
    #[must_use]
    pub fn new(id: OwnerId) -> Self {
        Self {
            id,
            parent: None,
            own: HashMap::new(),
            composed: HashMap::new(),
            declared_groups: Vec::new(),
        }
    }

    /// Create an owner inheriting from a parent
    #[inline]
    #[must_use]
    pub fn with_parent(id: OwnerId, parent: OwnerId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::new(id)
        }
    }

    /// Owner identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> &OwnerId {
        &self.id
    }

    /// Parent in the supertype chain, if any
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<&OwnerId> {
        self.parent.as_ref()
    }

    /// Install a locally-defined operation, replacing any previous local
    /// definition of the same name
    pub fn define(&mut self, name: OpName, body: Callable) {
        self.own.insert(name, body);
    }

    /// Remove a locally-defined operation, returning its body
    pub fn remove_local(&mut self, name: &OpName) -> Option<Callable> {
        self.own.remove(name)
    }

    /// Locally-defined body for a name
    #[inline]
    #[must_use]
    pub fn local(&self, name: &OpName) -> Option<&Callable> {
        self.own.get(name)
    }

    /// Whether the name is defined directly on this owner
    ///
    /// Composed entries and inherited operations do not count; this is the
    /// eligibility check the chain builder relies on.
    #[inline]
    #[must_use]
    pub fn is_locally_defined(&self, name: &OpName) -> bool {
        self.own.contains_key(name)
    }

    /// Install a chain-forwarded entry, replacing any previous one
    pub fn install_composed(&mut self, name: OpName, body: Callable) {
        self.composed.insert(name, body);
    }

    /// Chain-forwarded entry for a name
    #[inline]
    #[must_use]
    pub fn composed(&self, name: &OpName) -> Option<&Callable> {
        self.composed.get(name)
    }

    /// Record a group in the declared composition list
    pub fn record_group(&mut self, group_name: impl Into<String>) {
        self.declared_groups.push(group_name.into());
    }

    /// Groups composed onto this owner, oldest first
    #[inline]
    #[must_use]
    pub fn declared_groups(&self) -> &[String] {
        &self.declared_groups
    }

    /// Names of all locally-defined operations
    #[must_use]
    pub fn local_names(&self) -> Vec<OpName> {
        self.own.keys().cloned().collect()
    }
}
