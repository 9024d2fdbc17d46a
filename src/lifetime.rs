//! Component lifetime definitions.

use std::fmt;

/// Lifetime policy controlling how instances are shared.
///
/// # Examples
///
/// ```rust
/// use ferrous_wire::{Container, Definition, Lifetime, Token};
/// use std::sync::Arc;
///
/// struct Clock;
/// struct Request { clock: Arc<Clock> }
///
/// let mut container = Container::new();
/// container.register(Token::of::<Clock>(), Definition::new(|_| Ok(Clock)), Lifetime::Singleton, false);
/// container.register(
///     Token::of::<Request>(),
///     Definition::new(|args| Ok(Request { clock: args.get::<Clock>(0)? })).depends_on::<Clock>(),
///     Lifetime::Transient,
///     false,
/// );
///
/// let first = container.get::<Request>().unwrap();
/// let second = container.get::<Request>().unwrap();
///
/// // Transient: fresh every time; Singleton: shared across calls
/// assert!(!Arc::ptr_eq(&first, &second));
/// assert!(Arc::ptr_eq(&first.clock, &second.clock));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(any(feature = "config", feature = "graph-export"), derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(any(feature = "config", feature = "graph-export"), serde(rename_all = "lowercase"))]
pub enum Lifetime {
    /// One instance per container, kept until the singleton store is flushed
    ///
    /// The instance is built the first time any resolution needs it and is
    /// handed to every later consumer, across separate `resolve` calls.
    Singleton,
    /// One instance per `resolve` call
    ///
    /// Every consumer inside the same resolution shares the instance; the
    /// next call builds a new one.
    Scoped,
    /// One instance per dependency edge, never cached
    Transient,
}

impl Lifetime {
    /// Returns true when instances are shared between consumers of one call.
    pub fn is_shared(self) -> bool {
        !matches!(self, Lifetime::Transient)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
            Lifetime::Transient => "transient",
        };
        f.write_str(name)
    }
}
