//! Two-phase graph resolver.
//!
//! A resolution call runs in three steps:
//!
//! 1. **Branch**: starting at the root token, discover every dependency
//!    through the metadata provider and record it in a per-call
//!    [`DependencyGraph`] plus a parent to slot index.
//! 2. **Produce**: repeatedly take the graph's leaves, assemble their
//!    arguments from the lifetime stores, construct them, and remove them
//!    from the graph until it is empty.
//! 3. **Retrieve**: read the root's value from the store matching its
//!    lifetime.
//!
//! Singleton instances live in the container's store; scoped and transient
//! stores are created for the call and dropped with it.

mod branch;
mod producer;

use std::fmt;

use crate::config::ResolverOptions;
use crate::definition::AnyArc;
use crate::error::{DiError, DiResult};
use crate::graph::DependencyGraph;
use crate::internal::{Map, Set};
use crate::key::Token;
use crate::lifetime::Lifetime;
use crate::metadata::DependencyMetadata;
use crate::observer::Observers;
use crate::registration::Registry;
use crate::store::{InstanceStore, TransientStore};

/// Identity of a node in the per-call dependency graph.
///
/// Singleton and scoped components collapse onto their registration token
/// so every consumer shares one node. Each transient edge gets its own
/// node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum NodeId {
    Registration(Token),
    Transient(u64),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Registration(token) => write!(f, "{}", token),
            NodeId::Transient(id) => write!(f, "transient#{}", id),
        }
    }
}

/// Data stored in each graph node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GraphEntry {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) registration: Token,
    pub(crate) lifetime: Lifetime,
}

impl GraphEntry {
    fn key(entry: &GraphEntry) -> NodeId {
        entry.id
    }
}

/// One constructor argument of a parent node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DependencySlot {
    pub(crate) node: NodeId,
    pub(crate) registration: Token,
    pub(crate) lifetime: Lifetime,
}

/// State owned by a single resolution call.
pub(crate) struct Resolution {
    pub(crate) graph: DependencyGraph<NodeId, GraphEntry>,
    /// Argument slots per parent node, in discovery order
    pub(crate) slots: Map<NodeId, Vec<DependencySlot>>,
    /// Shared nodes whose dependencies were already discovered
    pub(crate) expanded: Set<NodeId>,
    /// Singletons found in the store during branching; never rebuilt
    pub(crate) cached: Set<NodeId>,
    pub(crate) scoped: InstanceStore,
    pub(crate) transients: TransientStore,
    next_transient: u64,
}

impl Resolution {
    fn new() -> Self {
        Self {
            graph: DependencyGraph::new(GraphEntry::key),
            slots: Map::default(),
            expanded: Set::default(),
            cached: Set::default(),
            scoped: InstanceStore::new(),
            transients: TransientStore::new(),
            next_transient: 0,
        }
    }

    /// Builds the graph entry for `registration` discovered under `parent`.
    fn entry(&mut self, registration: Token, lifetime: Lifetime, parent: Option<NodeId>) -> GraphEntry {
        let id = match lifetime {
            Lifetime::Singleton | Lifetime::Scoped => NodeId::Registration(registration),
            Lifetime::Transient => {
                self.next_transient += 1;
                NodeId::Transient(self.next_transient)
            }
        };
        GraphEntry {
            id,
            parent,
            registration,
            lifetime,
        }
    }
}

/// Borrowed view of a container for the duration of one call.
///
/// The singleton store is passed per call: planning only reads it, while
/// resolution writes newly built singletons into it.
pub(crate) struct Resolver<'c> {
    pub(crate) registry: &'c Registry,
    pub(crate) metadata: &'c dyn DependencyMetadata,
    pub(crate) options: &'c ResolverOptions,
    pub(crate) observers: &'c Observers,
}

impl<'c> Resolver<'c> {
    /// Resolves `root` into a fully wired instance.
    pub(crate) fn resolve(&self, root: Token, singletons: &mut InstanceStore) -> DiResult<AnyArc> {
        let mut resolution = Resolution::new();
        let root_entry = self.branch(&mut resolution, root, singletons)?;
        self.produce(&mut resolution, singletons)?;
        self.retrieve(&mut resolution, root_entry, singletons)
    }

    /// Runs only the branch phase, leaving the graph for inspection.
    pub(crate) fn plan(&self, root: Token, singletons: &InstanceStore) -> DiResult<(Resolution, GraphEntry)> {
        let mut resolution = Resolution::new();
        let root_entry = self.branch(&mut resolution, root, singletons)?;
        Ok((resolution, root_entry))
    }

    fn retrieve(
        &self,
        resolution: &mut Resolution,
        root: GraphEntry,
        singletons: &InstanceStore,
    ) -> DiResult<AnyArc> {
        let value = match root.lifetime {
            Lifetime::Singleton => singletons.get(&root.registration).cloned(),
            Lifetime::Scoped => resolution.scoped.get(&root.registration).cloned(),
            Lifetime::Transient => resolution.transients.take_node(None, root.id),
        };
        value.ok_or(DiError::ArgumentResolutionFailure {
            consumer: root.registration.display_name(),
            dependency: root.registration.display_name(),
        })
    }
}
