//! Thread-shared container.
//!
//! Resolution itself is single-threaded. When several threads need the
//! same container, every call is serialized through one mutex so that
//! concurrent resolutions cannot race on singleton population.

use std::sync::Arc;

use crate::container::Container;
use crate::definition::{AnyArc, Definition};
use crate::error::DiResult;
use crate::internal::sync::{lock, Mutex};
use crate::key::Token;
use crate::lifetime::Lifetime;

/// Cloneable handle to a mutex-guarded [`Container`].
///
/// Uses `parking_lot::Mutex` with the `parking-lot` feature and
/// `std::sync::Mutex` otherwise.
///
/// # Examples
///
/// ```
/// use ferrous_wire::{Container, Definition, Lifetime, SharedContainer, Token};
/// use std::sync::Arc;
/// use std::thread;
///
/// struct Config;
///
/// let shared = SharedContainer::new(Container::new());
/// shared.register(Token::of::<Config>(), Definition::new(|_| Ok(Config)), Lifetime::Singleton, false);
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let shared = shared.clone();
///         thread::spawn(move || shared.get::<Config>().unwrap())
///     })
///     .collect();
///
/// let configs: Vec<Arc<Config>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
/// assert!(configs.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
/// ```
#[derive(Clone)]
pub struct SharedContainer {
    inner: Arc<Mutex<Container>>,
}

impl SharedContainer {
    pub fn new(container: Container) -> Self {
        Self {
            inner: Arc::new(Mutex::new(container)),
        }
    }

    pub fn register(&self, token: Token, definition: Definition, lifetime: Lifetime, replace: bool) {
        lock(&self.inner).register(token, definition, lifetime, replace);
    }

    pub fn replace(&self, token: Token, definition: Definition, lifetime: Lifetime) {
        lock(&self.inner).replace(token, definition, lifetime);
    }

    pub fn resolve(&self, token: Token) -> DiResult<AnyArc> {
        lock(&self.inner).resolve(token)
    }

    pub fn resolve_as<T: Send + Sync + 'static>(&self, token: Token) -> DiResult<Arc<T>> {
        lock(&self.inner).resolve_as::<T>(token)
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        lock(&self.inner).get::<T>()
    }

    pub fn flush_all(&self) {
        lock(&self.inner).flush_all();
    }

    pub fn flush_singletons(&self) {
        lock(&self.inner).flush_singletons();
    }

    pub fn flush_registered(&self) {
        lock(&self.inner).flush_registered();
    }

    /// Runs `f` with exclusive access to the container.
    pub fn with<R>(&self, f: impl FnOnce(&mut Container) -> R) -> R {
        f(&mut lock(&self.inner))
    }
}

impl From<Container> for SharedContainer {
    fn from(container: Container) -> Self {
        Self::new(container)
    }
}
