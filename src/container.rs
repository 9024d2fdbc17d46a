//! The container: registry, singleton store and resolver settings.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, debug_span, warn};

use crate::config::ResolverOptions;
use crate::definition::{AnyArc, Definition};
use crate::descriptors::RegistrationDescriptor;
use crate::error::{DiError, DiResult};
use crate::graph_export::ResolutionPlan;
use crate::key::Token;
use crate::lifetime::Lifetime;
use crate::metadata::{DeclaredDependencies, DependencyMetadata};
use crate::observer::{Observers, ResolutionObserver};
use crate::registration::{Registration, Registry};
use crate::resolver::Resolver;
use crate::store::InstanceStore;
use crate::validation::{self, ValidationReport};

/// Dependency resolution container.
///
/// Owns the [`Registry`], the process-wide singleton store, the metadata
/// provider and the resolver options. Containers are independent values:
/// tests can build one each instead of flushing shared state.
///
/// All operations take `&mut self` or `&self`; use
/// [`SharedContainer`](crate::SharedContainer) to share one container
/// between threads.
///
/// # Examples
///
/// ```
/// use ferrous_wire::{Container, Definition, Lifetime, Token};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut container = Container::new();
/// container.register(
///     Token::of::<Database>(),
///     Definition::new(|_| Ok(Database { url: "postgres://localhost".to_string() })),
///     Lifetime::Singleton,
///     false,
/// );
/// container.register(
///     Token::of::<UserService>(),
///     Definition::new(|args| Ok(UserService { db: args.get::<Database>(0)? }))
///         .depends_on::<Database>(),
///     Lifetime::Transient,
///     false,
/// );
///
/// let service = container.get::<UserService>().unwrap();
/// assert_eq!(service.db.url, "postgres://localhost");
/// ```
pub struct Container {
    registry: Registry,
    singletons: InstanceStore,
    metadata: Box<dyn DependencyMetadata>,
    options: ResolverOptions,
    observers: Observers,
}

impl Container {
    /// Creates an empty container using declared dependencies and default
    /// options.
    pub fn new() -> Self {
        Self::from_registry(Registry::new())
    }

    /// Creates a container around an existing registry.
    pub fn from_registry(registry: Registry) -> Self {
        Self {
            registry,
            singletons: InstanceStore::new(),
            metadata: Box::new(DeclaredDependencies),
            options: ResolverOptions::default(),
            observers: Observers::new(),
        }
    }

    /// Replaces the metadata provider.
    pub fn with_metadata<M: DependencyMetadata + 'static>(mut self, metadata: M) -> Self {
        self.metadata = Box::new(metadata);
        self
    }

    /// Replaces the resolver options after checking them with
    /// [`ResolverOptions::validate`].
    pub fn with_options(mut self, options: ResolverOptions) -> DiResult<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// Attaches an observer notified of every resolution.
    pub fn add_observer(&mut self, observer: Arc<dyn ResolutionObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // ----- Registration -----

    /// Binds `definition` to `token` with `lifetime`.
    ///
    /// Without `replace`, registering a token twice keeps the first
    /// registration. With `replace`, the registration is overwritten; the
    /// components depending on `token` pick up the new definition on their
    /// next resolution, even when the old one was already built as a
    /// singleton.
    pub fn register(
        &mut self,
        token: Token,
        definition: Definition,
        lifetime: Lifetime,
        replace: bool,
    ) -> &mut Self {
        self.store(Registration::new(token, definition, Some(lifetime)), replace)
    }

    /// Overwrites the registration of `token`, e.g. to install a mock.
    pub fn replace(&mut self, token: Token, definition: Definition, lifetime: Lifetime) -> &mut Self {
        self.register(token, definition, lifetime, true)
    }

    /// Binds `definition` to `token` using the definition's own lifetime
    /// tag. An untagged definition is stored as is and fails with
    /// [`DiError::MissingLifetime`] when resolved.
    pub fn register_definition(&mut self, token: Token, definition: Definition, replace: bool) -> &mut Self {
        let lifetime = definition.lifetime();
        self.store(Registration::new(token, definition, lifetime), replace)
    }

    /// A cached singleton belongs to the registration that built it, so a
    /// stored registration evicts it.
    fn store(&mut self, registration: Registration, replace: bool) -> &mut Self {
        let token = registration.id();
        if self.registry.register(registration, replace) && self.singletons.remove(&token).is_some() {
            debug!(token = %token, "evicted singleton built from the previous registration");
        }
        self
    }

    /// Tags `definition` as singleton and registers it under its
    /// implementation type's token.
    pub fn mark_singleton(&mut self, definition: Definition) -> &mut Self {
        self.mark(definition, Lifetime::Singleton)
    }

    /// Tags `definition` as scoped and registers it under its
    /// implementation type's token.
    pub fn mark_scoped(&mut self, definition: Definition) -> &mut Self {
        self.mark(definition, Lifetime::Scoped)
    }

    /// Tags `definition` as transient and registers it under its
    /// implementation type's token.
    pub fn mark_transient(&mut self, definition: Definition) -> &mut Self {
        self.mark(definition, Lifetime::Transient)
    }

    /// Like [`mark_singleton`](Self::mark_singleton) but registers under
    /// `token`, e.g. a trait-object token or a symbol.
    pub fn mark_singleton_as(&mut self, token: Token, definition: Definition) -> &mut Self {
        self.mark_as(token, definition, Lifetime::Singleton)
    }

    pub fn mark_scoped_as(&mut self, token: Token, definition: Definition) -> &mut Self {
        self.mark_as(token, definition, Lifetime::Scoped)
    }

    pub fn mark_transient_as(&mut self, token: Token, definition: Definition) -> &mut Self {
        self.mark_as(token, definition, Lifetime::Transient)
    }

    fn mark(&mut self, definition: Definition, lifetime: Lifetime) -> &mut Self {
        let token = definition.token();
        self.mark_as(token, definition, lifetime)
    }

    fn mark_as(&mut self, token: Token, definition: Definition, lifetime: Lifetime) -> &mut Self {
        self.register_definition(token, definition.with_lifetime(lifetime), false)
    }

    pub fn is_registered(&self, token: &Token) -> bool {
        self.registry.contains(token)
    }

    // ----- Resolution -----

    /// Resolves `token` into a fully wired instance.
    pub fn resolve(&mut self, token: Token) -> DiResult<AnyArc> {
        let span = debug_span!("resolve", token = %token);
        let _enter = span.enter();

        self.observers.resolving(&token);
        let started = Instant::now();

        let resolver = Resolver {
            registry: &self.registry,
            metadata: self.metadata.as_ref(),
            options: &self.options,
            observers: &self.observers,
        };
        let result = resolver.resolve(token, &mut self.singletons);

        match &result {
            Ok(_) => {
                let elapsed = started.elapsed();
                debug!(?elapsed, "resolved");
                self.observers.resolved(&token, elapsed);
            }
            Err(error) => {
                warn!(%error, "resolution failed");
                self.observers.failed(&token, error);
            }
        }
        result
    }

    /// Resolves `token` and downcasts the instance to `T`.
    pub fn resolve_as<T: Send + Sync + 'static>(&mut self, token: Token) -> DiResult<Arc<T>> {
        self.resolve(token)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves the component registered under `Token::of::<T>()`.
    pub fn get<T: Send + Sync + 'static>(&mut self) -> DiResult<Arc<T>> {
        self.resolve_as::<T>(Token::of::<T>())
    }

    /// Discovers the dependency graph of `token` without constructing
    /// anything.
    pub fn plan(&self, token: Token) -> DiResult<ResolutionPlan> {
        let resolver = Resolver {
            registry: &self.registry,
            metadata: self.metadata.as_ref(),
            options: &self.options,
            observers: &self.observers,
        };
        let (resolution, root) = resolver.plan(token, &self.singletons)?;
        Ok(ResolutionPlan::from_resolution(&resolution, root))
    }

    /// Checks every registration for missing dependencies, missing
    /// lifetimes, cycles and captive dependencies.
    pub fn validate(&self) -> ValidationReport {
        validation::validate(&self.registry, self.metadata.as_ref())
    }

    // ----- Lifecycle -----

    /// Removes every registration and every cached singleton.
    pub fn flush_all(&mut self) {
        debug!(
            registrations = self.registry.len(),
            singletons = self.singletons.len(),
            "flushing registrations and singletons"
        );
        self.registry.flush();
        self.singletons.clear();
    }

    /// Drops cached singletons; the next resolution rebuilds them.
    pub fn flush_singletons(&mut self) {
        debug!(singletons = self.singletons.len(), "flushing singletons");
        self.singletons.clear();
    }

    /// Removes every registration, keeping cached singletons.
    pub fn flush_registered(&mut self) {
        debug!(registrations = self.registry.len(), "flushing registrations");
        self.registry.flush();
    }

    /// Number of singletons currently cached.
    pub fn singleton_count(&self) -> usize {
        self.singletons.len()
    }

    /// Descriptors of every registration, sorted by component name.
    pub fn descriptors(&self) -> Vec<RegistrationDescriptor> {
        let mut descriptors: Vec<_> = self
            .registry
            .iter()
            .map(|registration| {
                RegistrationDescriptor::new(registration, self.metadata.dependencies_of(registration.implementation()).len())
            })
            .collect();
        descriptors.sort_by(|a, b| a.type_name().cmp(b.type_name()).then_with(|| a.token.cmp(&b.token)));
        descriptors
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}
