//! Diagnostic observers for resolution events.
//!
//! Observers are attached to a [`Container`](crate::Container) and are
//! called synchronously while a resolution runs. Keep implementations
//! lightweight.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::internal::sync::{lock, Mutex};
use crate::internal::Map;
use crate::key::Token;
use crate::lifetime::Lifetime;

/// Observer of resolution events.
///
/// Every method has an empty default so implementations only override the
/// events they care about.
///
/// # Examples
///
/// ```
/// use ferrous_wire::{Container, Definition, Lifetime, ResolutionObserver, Token};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Default)]
/// struct Builds(AtomicUsize);
///
/// impl ResolutionObserver for Builds {
///     fn instantiated(&self, _token: &Token, _lifetime: Lifetime) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// struct Clock;
///
/// let builds = Arc::new(Builds::default());
/// let mut container = Container::new();
/// container.add_observer(builds.clone());
/// container.register(Token::of::<Clock>(), Definition::new(|_| Ok(Clock)), Lifetime::Singleton, false);
///
/// container.get::<Clock>().unwrap();
/// container.get::<Clock>().unwrap();
/// assert_eq!(builds.0.load(Ordering::SeqCst), 1);
/// ```
pub trait ResolutionObserver: Send + Sync {
    /// Called before a `resolve` call starts.
    fn resolving(&self, _token: &Token) {}

    /// Called after a constructor ran and its instance was stored.
    fn instantiated(&self, _token: &Token, _lifetime: Lifetime) {}

    /// Called when a `resolve` call returned a value.
    fn resolved(&self, _token: &Token, _duration: Duration) {}

    /// Called when a `resolve` call failed.
    fn failed(&self, _token: &Token, _error: &DiError) {}
}

/// Registered observers of one container.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ResolutionObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ResolutionObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn resolving(&self, token: &Token) {
        for observer in &self.observers {
            observer.resolving(token);
        }
    }

    #[inline]
    pub(crate) fn instantiated(&self, token: &Token, lifetime: Lifetime) {
        for observer in &self.observers {
            observer.instantiated(token, lifetime);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, token: &Token, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(token, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, token: &Token, error: &DiError) {
        for observer in &self.observers {
            observer.failed(token, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Resolutions are logged at `debug`, instantiations at `trace` and
/// failures at `warn`, each with a configurable prefix field.
pub struct TracingObserver {
    prefix: String,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::with_prefix("ferrous-wire")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionObserver for TracingObserver {
    fn resolving(&self, token: &Token) {
        tracing::debug!(prefix = %self.prefix, token = %token, "resolving");
    }

    fn instantiated(&self, token: &Token, lifetime: Lifetime) {
        tracing::trace!(prefix = %self.prefix, token = %token, %lifetime, "instantiated");
    }

    fn resolved(&self, token: &Token, duration: Duration) {
        tracing::debug!(prefix = %self.prefix, token = %token, ?duration, "resolved");
    }

    fn failed(&self, token: &Token, error: &DiError) {
        tracing::warn!(prefix = %self.prefix, token = %token, %error, "resolution failed");
    }
}

/// Observer counting constructor calls and failures per token.
///
/// # Examples
///
/// ```
/// use ferrous_wire::{Container, CountingObserver, Definition, Lifetime, Token};
/// use std::sync::Arc;
///
/// struct Request;
///
/// let counts = Arc::new(CountingObserver::new());
/// let mut container = Container::new();
/// container.add_observer(counts.clone());
/// container.register(Token::of::<Request>(), Definition::new(|_| Ok(Request)), Lifetime::Transient, false);
///
/// container.get::<Request>().unwrap();
/// container.get::<Request>().unwrap();
/// assert_eq!(counts.constructions(&Token::of::<Request>()), 2);
/// ```
#[derive(Default)]
pub struct CountingObserver {
    constructions: Mutex<Map<Token, usize>>,
    failures: Mutex<usize>,
}

impl CountingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of constructor calls for `token`.
    pub fn constructions(&self, token: &Token) -> usize {
        lock(&self.constructions).get(token).copied().unwrap_or(0)
    }

    /// Total number of constructor calls.
    pub fn total_constructions(&self) -> usize {
        lock(&self.constructions).values().sum()
    }

    /// Number of failed `resolve` calls.
    pub fn failures(&self) -> usize {
        *lock(&self.failures)
    }

    pub fn reset(&self) {
        lock(&self.constructions).clear();
        *lock(&self.failures) = 0;
    }
}

impl ResolutionObserver for CountingObserver {
    fn instantiated(&self, token: &Token, _lifetime: Lifetime) {
        *lock(&self.constructions).entry(*token).or_insert(0) += 1;
    }

    fn failed(&self, _token: &Token, _error: &DiError) {
        *lock(&self.failures) += 1;
    }
}
