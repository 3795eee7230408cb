//! Override groups: named bundles of layers applied together

use crate::callable::Layer;
use crate::ident::OpName;
use indexmap::IndexMap;

/// A named bundle of override layers with a fixed name set
///
/// Groups are the bulk unit of the chain machinery: group wrap applies the
/// chain builder to every name in the group and then composes the group's
/// layers on top; group revert restores every name the group covers.
/// Members keep insertion order, so bulk operations are deterministic.
#[derive(Debug, Clone, Default)]
pub struct OverrideGroup {
    name: String,
    members: IndexMap<OpName, Layer>,
}

impl OverrideGroup {
    /// Create an empty group
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: IndexMap::new(),
        }
    }

    /// Group name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a layer for an operation name, builder style
    ///
    /// Defining the same name twice keeps the newer layer.
    #[must_use]
    pub fn define(mut self, name: impl Into<OpName>, layer: Layer) -> Self {
        self.members.insert(name.into(), layer);
        self
    }

    /// Layer for a given operation name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &OpName) -> Option<&Layer> {
        self.members.get(name)
    }

    /// All operation names the group covers, in insertion order
    #[must_use]
    pub fn operation_names(&self) -> Vec<OpName> {
        self.members.keys().cloned().collect()
    }

    /// Iterate over `(name, layer)` members in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&OpName, &Layer)> {
        self.members.iter()
    }

    /// Number of members
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
