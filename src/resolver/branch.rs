//! Branch phase: dependency discovery and graph construction.

use tracing::trace;

use super::{DependencySlot, GraphEntry, Resolution, Resolver};
use crate::error::{DiError, DiResult};
use crate::internal::ResolutionPath;
use crate::key::Token;
use crate::lifetime::Lifetime;
use crate::store::InstanceStore;

struct StackElement {
    entry: GraphEntry,
    /// Registration tokens from the root down to and including this element
    path: ResolutionPath,
}

impl<'c> Resolver<'c> {
    /// Builds the dependency graph for `root` and returns the root's entry.
    ///
    /// Fails with `NotRegistered` or `MissingLifetime` for the root or any
    /// dependency, `CyclicDependency` when a dependency is already on the
    /// path leading to it, and `DepthExceeded` when a path grows beyond
    /// the configured ceiling.
    pub(super) fn branch(
        &self,
        resolution: &mut Resolution,
        root: Token,
        singletons: &InstanceStore,
    ) -> DiResult<GraphEntry> {
        let lifetime = self.registry.lookup(&root)?.required_lifetime()?;
        let root_entry = resolution.entry(root, lifetime, None);
        resolution.graph.lookup_or_insert(root_entry);

        let mut stack = vec![StackElement {
            entry: root_entry,
            path: ResolutionPath::root().push(root),
        }];

        while let Some(element) = stack.pop() {
            let entry = element.entry;

            if entry.lifetime.is_shared() && !resolution.expanded.insert(entry.id) {
                continue;
            }
            if entry.lifetime == Lifetime::Singleton && singletons.contains(&entry.registration) {
                trace!(token = %entry.registration, "singleton already built, not expanding");
                resolution.cached.insert(entry.id);
                continue;
            }

            let registration = self.registry.lookup(&entry.registration)?;
            let dependencies = self.metadata.dependencies_of(registration.implementation());
            trace!(
                node = %entry.id,
                lifetime = %entry.lifetime,
                dependencies = dependencies.len(),
                "expanding"
            );

            let mut slots = Vec::with_capacity(dependencies.len());
            for dependency in dependencies {
                if element.path.contains(&dependency) {
                    return Err(DiError::CyclicDependency(element.path.cycle_through(&dependency)));
                }
                if element.path.depth() >= self.options.max_depth {
                    return Err(DiError::DepthExceeded(self.options.max_depth));
                }

                let dependency_lifetime = self.registry.lookup(&dependency)?.required_lifetime()?;
                let child = resolution.entry(dependency, dependency_lifetime, Some(entry.id));

                slots.push(DependencySlot {
                    node: child.id,
                    registration: dependency,
                    lifetime: dependency_lifetime,
                });
                resolution.graph.insert_edge(entry, child);
                stack.push(StackElement {
                    entry: child,
                    path: element.path.push(dependency),
                });
            }
            resolution.slots.insert(entry.id, slots);
        }

        Ok(root_entry)
    }
}
