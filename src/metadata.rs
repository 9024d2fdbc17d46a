//! Dependency metadata providers.
//!
//! The resolver never inspects constructors. At every node it asks a
//! [`DependencyMetadata`] provider for the ordered list of tokens the
//! definition needs.

use std::any::TypeId;

use crate::definition::Definition;
use crate::internal::Map;
use crate::key::Token;

/// Source of a definition's dependency tokens, in constructor argument order.
pub trait DependencyMetadata: Send + Sync {
    fn dependencies_of(&self, definition: &Definition) -> Vec<Token>;
}

/// Uses the dependencies declared on the definition with
/// [`Definition::depends_on`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclaredDependencies;

impl DependencyMetadata for DeclaredDependencies {
    fn dependencies_of(&self, definition: &Definition) -> Vec<Token> {
        definition.dependencies().to_vec()
    }
}

/// Metadata table keyed by implementation type.
///
/// Implementations without an entry fall back to their declared
/// dependencies. Useful when the dependency lists are generated outside
/// the definitions, e.g. by a build script.
///
/// # Examples
///
/// ```rust
/// use ferrous_wire::{Container, Definition, Lifetime, StaticMetadata, Token};
/// use std::sync::Arc;
///
/// struct Clock;
/// struct Scheduler { clock: Arc<Clock> }
///
/// let metadata = StaticMetadata::new().with::<Scheduler>(vec![Token::of::<Clock>()]);
///
/// let mut container = Container::new().with_metadata(metadata);
/// container.register(Token::of::<Clock>(), Definition::new(|_| Ok(Clock)), Lifetime::Singleton, false);
/// container.register(
///     Token::of::<Scheduler>(),
///     Definition::new(|args| Ok(Scheduler { clock: args.get::<Clock>(0)? })),
///     Lifetime::Transient,
///     false,
/// );
///
/// assert!(container.get::<Scheduler>().is_ok());
/// ```
#[derive(Debug, Default, Clone)]
pub struct StaticMetadata {
    entries: Map<TypeId, Vec<Token>>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dependency list for implementation type `T`.
    pub fn with<T: 'static>(mut self, dependencies: Vec<Token>) -> Self {
        self.insert(TypeId::of::<T>(), dependencies);
        self
    }

    pub fn insert(&mut self, impl_id: TypeId, dependencies: Vec<Token>) {
        self.entries.insert(impl_id, dependencies);
    }
}

impl DependencyMetadata for StaticMetadata {
    fn dependencies_of(&self, definition: &Definition) -> Vec<Token> {
        match self.entries.get(&definition.impl_id()) {
            Some(dependencies) => dependencies.clone(),
            None => definition.dependencies().to_vec(),
        }
    }
}
