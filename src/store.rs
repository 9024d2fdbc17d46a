//! Lifetime stores holding produced instances.

use std::any::TypeId;

use crate::definition::AnyArc;
use crate::internal::Map;
use crate::key::Token;
use crate::resolver::NodeId;

/// Keyed instance cache used for singleton and scoped instances.
#[derive(Default)]
pub(crate) struct InstanceStore {
    instances: Map<Token, AnyArc>,
}

impl InstanceStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, token: &Token) -> Option<&AnyArc> {
        self.instances.get(token)
    }

    pub(crate) fn contains(&self, token: &Token) -> bool {
        self.instances.contains_key(token)
    }

    pub(crate) fn insert(&mut self, token: Token, value: AnyArc) {
        self.instances.insert(token, value);
    }

    pub(crate) fn remove(&mut self, token: &Token) -> Option<AnyArc> {
        self.instances.remove(token)
    }

    pub(crate) fn len(&self) -> usize {
        self.instances.len()
    }

    pub(crate) fn clear(&mut self) {
        self.instances.clear();
    }
}

/// A transient instance waiting to be handed to its parent.
struct PendingTransient {
    node: NodeId,
    impl_id: TypeId,
    value: AnyArc,
}

/// Per-parent pools of freshly created transient instances.
///
/// The `None` parent key holds a transient resolution root.
#[derive(Default)]
pub(crate) struct TransientStore {
    pools: Map<Option<NodeId>, Vec<PendingTransient>>,
}

impl TransientStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, parent: Option<NodeId>, node: NodeId, impl_id: TypeId, value: AnyArc) {
        self.pools
            .entry(parent)
            .or_default()
            .push(PendingTransient { node, impl_id, value });
    }

    /// Removes and returns the instance produced for graph node `node`.
    pub(crate) fn take_node(&mut self, parent: Option<NodeId>, node: NodeId) -> Option<AnyArc> {
        let pool = self.pools.get_mut(&parent)?;
        let index = pool.iter().position(|pending| pending.node == node)?;
        Some(pool.remove(index).value)
    }

    /// Removes and returns the first pending instance of `parent` whose
    /// implementation type is `impl_id`.
    pub(crate) fn take_matching(&mut self, parent: Option<NodeId>, impl_id: TypeId) -> Option<AnyArc> {
        let pool = self.pools.get_mut(&parent)?;
        let index = pool.iter().position(|pending| pending.impl_id == impl_id)?;
        Some(pool.remove(index).value)
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }
}
