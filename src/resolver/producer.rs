//! Producer phase: leaf-first instantiation.

use tracing::trace;

use super::{GraphEntry, Resolution, Resolver};
use crate::config::TransientMatching;
use crate::definition::{AnyArc, Arguments};
use crate::error::{DiError, DiResult};
use crate::lifetime::Lifetime;
use crate::registration::Registration;
use crate::store::InstanceStore;

impl<'c> Resolver<'c> {
    /// Drains the graph, constructing every node once all of its
    /// dependencies have been produced.
    pub(super) fn produce(&self, resolution: &mut Resolution, singletons: &mut InstanceStore) -> DiResult<()> {
        while !resolution.graph.is_empty() {
            let leaves: Vec<GraphEntry> = resolution
                .graph
                .leaves()
                .into_iter()
                .map(|node| *node.data())
                .collect();

            if leaves.is_empty() {
                let stuck = resolution
                    .graph
                    .nodes()
                    .into_iter()
                    .map(|node| node.data().registration.display_name())
                    .collect();
                return Err(DiError::CyclicDependency(stuck));
            }

            for entry in leaves {
                self.instantiate(resolution, entry, singletons)?;
                resolution.graph.remove_node(&entry.id);
            }
        }
        Ok(())
    }

    fn instantiate(
        &self,
        resolution: &mut Resolution,
        entry: GraphEntry,
        singletons: &mut InstanceStore,
    ) -> DiResult<()> {
        match entry.lifetime {
            Lifetime::Singleton => {
                if singletons.contains(&entry.registration) {
                    return Ok(());
                }
                let value = self.construct(resolution, entry, singletons)?;
                singletons.insert(entry.registration, value);
            }
            Lifetime::Scoped => {
                if resolution.scoped.contains(&entry.registration) {
                    return Ok(());
                }
                let value = self.construct(resolution, entry, singletons)?;
                resolution.scoped.insert(entry.registration, value);
            }
            Lifetime::Transient => {
                let value = self.construct(resolution, entry, singletons)?;
                let impl_id = self.registry.lookup(&entry.registration)?.implementation().impl_id();
                resolution.transients.push(entry.parent, entry.id, impl_id, value);
            }
        }
        self.observers.instantiated(&entry.registration, entry.lifetime);
        Ok(())
    }

    fn construct(
        &self,
        resolution: &mut Resolution,
        entry: GraphEntry,
        singletons: &InstanceStore,
    ) -> DiResult<AnyArc> {
        let registration = self.registry.lookup(&entry.registration)?;
        let args = self.assemble(resolution, entry, registration, singletons)?;
        trace!(node = %entry.id, arguments = args.len(), "constructing");
        registration.implementation().construct(&args)
    }

    /// Collects the constructor arguments of `entry` from the lifetime
    /// store matching each dependency's own lifetime.
    fn assemble(
        &self,
        resolution: &mut Resolution,
        entry: GraphEntry,
        registration: &Registration,
        singletons: &InstanceStore,
    ) -> DiResult<Arguments> {
        let consumer = registration.id().display_name();
        let slots = resolution.slots.get(&entry.id).cloned().unwrap_or_default();
        let mut args = Arguments::with_capacity(consumer, slots.len());

        for slot in slots {
            let value = match slot.lifetime {
                Lifetime::Singleton => singletons.get(&slot.registration).cloned(),
                Lifetime::Scoped => resolution.scoped.get(&slot.registration).cloned(),
                Lifetime::Transient => match self.options.transient_matching {
                    TransientMatching::Positional => {
                        resolution.transients.take_node(Some(entry.id), slot.node)
                    }
                    TransientMatching::ByImplementation => {
                        let expected = self.registry.lookup(&slot.registration)?.implementation().impl_id();
                        resolution.transients.take_matching(Some(entry.id), expected)
                    }
                },
            };
            let value = value.ok_or(DiError::ArgumentResolutionFailure {
                consumer,
                dependency: slot.registration.display_name(),
            })?;
            args.push(slot.registration, value);
        }
        Ok(args)
    }
}
