//! Process-wide owner table with resolution and composition
//!
//! [`ObjectSpace`] owns every [`Owner`] and implements the two host
//! capabilities the chain machinery depends on: the operation table
//! (define/remove/query with local-vs-inherited provenance) and the
//! composition primitive (attach a group so its members become resolvable,
//! participating in the chain).

use crate::callable::{compose, Args, CallError, Callable, Value};
use crate::group::OverrideGroup;
use crate::ident::{OpName, OwnerId};
use crate::owner::Owner;
use dashmap::DashMap;
use std::collections::HashSet;

/// Process-wide table of owners
///
/// Resolution order for an operation name: the owner's locally-defined
/// table, then its chain-forwarded (composed) entries, then the supertype
/// chain, recursively. A local definition always shadows a composed entry
/// of the same name; revert relies on exactly that.
#[derive(Debug, Default)]
pub struct ObjectSpace {
    owners: DashMap<OwnerId, Owner>,
}

impl ObjectSpace {
    /// Create an empty space
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            owners: DashMap::new(),
        }
    }

    /// Declare an owner with no parent
    ///
    /// Re-declaring an existing owner is a no-op.
    pub fn declare(&self, id: impl Into<OwnerId>) {
        let id = id.into();
        self.owners.entry(id.clone()).or_insert_with(|| Owner::new(id));
    }

    /// Declare an owner inheriting from a parent
    ///
    /// Re-declaring an existing owner is a no-op; the original parent link
    /// is kept.
    pub fn declare_with_parent(&self, id: impl Into<OwnerId>, parent: impl Into<OwnerId>) {
        let id = id.into();
        let parent = parent.into();
        self.owners
            .entry(id.clone())
            .or_insert_with(|| Owner::with_parent(id, parent));
    }

    /// Whether an owner has been declared
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &OwnerId) -> bool {
        self.owners.contains_key(id)
    }

    /// Install a locally-defined operation on an owner
    ///
    /// Declares the owner implicitly if it does not exist yet.
    pub fn define(&self, owner: impl Into<OwnerId>, name: impl Into<OpName>, body: Callable) {
        let owner = owner.into();
        self.owners
            .entry(owner.clone())
            .or_insert_with(|| Owner::new(owner))
            .define(name.into(), body);
    }

    /// Remove a locally-defined operation, returning its body
    pub fn remove_local(&self, owner: &OwnerId, name: &OpName) -> Option<Callable> {
        self.owners.get_mut(owner)?.remove_local(name)
    }

    /// Whether `name` is defined directly on `owner`
    ///
    /// Composed entries and inherited operations do not count. Unknown
    /// owners simply answer `false`.
    #[must_use]
    pub fn is_locally_defined(&self, owner: &OwnerId, name: &OpName) -> bool {
        self.owners
            .get(owner)
            .is_some_and(|o| o.is_locally_defined(name))
    }

    /// Whether `name` has a chain-forwarded entry on `owner`
    #[must_use]
    pub fn has_composed(&self, owner: &OwnerId, name: &OpName) -> bool {
        self.owners.get(owner).is_some_and(|o| o.composed(name).is_some())
    }

    /// Install a chain-forwarded entry on an owner
    ///
    /// Silent no-op if the owner does not exist.
    pub fn install_composed(&self, owner: &OwnerId, name: OpName, body: Callable) {
        if let Some(mut entry) = self.owners.get_mut(owner) {
            entry.install_composed(name, body);
        }
    }

    /// Resolve the publicly callable implementation for `(owner, name)`
    ///
    /// Walks own table, composed entries, then the supertype chain. The
    /// walk is cycle-guarded; a parent loop resolves to nothing rather
    /// than spinning.
    #[must_use]
    pub fn resolve(&self, owner: &OwnerId, name: &OpName) -> Option<Callable> {
        let mut visited = HashSet::new();
        let mut current = owner.clone();
        loop {
            if !visited.insert(current.clone()) {
                return None;
            }
            let entry = self.owners.get(&current)?;
            if let Some(body) = entry.local(name) {
                return Some(body.clone());
            }
            if let Some(body) = entry.composed(name) {
                return Some(body.clone());
            }
            let parent = entry.parent().cloned();
            drop(entry);
            current = parent?;
        }
    }

    /// Invoke an operation on an owner
    ///
    /// # Errors
    /// `CallError::NoSuchOperation` if nothing resolves; otherwise whatever
    /// the resolved chain raises, unchanged.
    pub fn call(&self, owner: &OwnerId, name: &OpName, args: &Args) -> Result<Value, CallError> {
        let body = self
            .resolve(owner, name)
            .ok_or_else(|| CallError::NoSuchOperation {
                owner: owner.clone(),
                name: name.clone(),
            })?;
        body.call(args)
    }

    /// Compose a group onto an owner
    ///
    /// Each member becomes the newest chain layer for its name: its forward
    /// target is whatever resolved at composition time (a wrap entry point,
    /// a previously composed layer, or an inherited implementation). The
    /// group's name is appended to the owner's declared composition list.
    /// Silent no-op if the owner does not exist.
    pub fn compose(&self, owner: &OwnerId, group: &OverrideGroup) {
        if !self.contains(owner) {
            tracing::trace!(owner = %owner, group = group.name(), "compose skipped: unknown owner");
            return;
        }
        for (name, layer) in group.iter() {
            let next = self.resolve(owner, name);
            let composed = compose(name, layer, next);
            self.install_composed(owner, name.clone(), composed);
        }
        if let Some(mut entry) = self.owners.get_mut(owner) {
            entry.record_group(group.name());
        }
        tracing::debug!(owner = %owner, group = group.name(), members = group.len(), "composed group");
    }

    /// Declared composition list for an owner, oldest first
    #[must_use]
    pub fn declared_groups(&self, owner: &OwnerId) -> Vec<String> {
        self.owners
            .get(owner)
            .map(|o| o.declared_groups().to_vec())
            .unwrap_or_default()
    }

    /// Number of declared owners
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether no owners are declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
