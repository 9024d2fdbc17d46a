//! Registration descriptors for introspection and diagnostics.

use crate::key::Token;
use crate::lifetime::Lifetime;
use crate::registration::Registration;

/// Snapshot of one registration.
///
/// # Examples
///
/// ```rust
/// use ferrous_wire::{Container, Definition, Lifetime, Token};
///
/// struct Clock;
/// struct Scheduler;
///
/// let mut container = Container::new();
/// container.mark_singleton(Definition::new(|_| Ok(Clock)));
/// container.register_definition(
///     Token::of::<Scheduler>(),
///     Definition::new(|_| Ok(Scheduler)).depends_on::<Clock>(),
///     false,
/// );
///
/// let descriptors = container.descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let clock = descriptors.iter().find(|d| d.type_name().ends_with("Clock")).unwrap();
/// assert_eq!(clock.lifetime, Some(Lifetime::Singleton));
///
/// let scheduler = descriptors.iter().find(|d| d.type_name().ends_with("Scheduler")).unwrap();
/// assert_eq!(scheduler.lifetime, None);
/// assert_eq!(scheduler.dependency_count, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDescriptor {
    /// Token the registration is bound to
    pub token: Token,
    /// Lifetime tag, `None` for untagged registrations
    pub lifetime: Option<Lifetime>,
    /// Implementation type name
    pub impl_type_name: &'static str,
    /// Number of dependencies reported by the metadata provider
    pub dependency_count: usize,
}

impl RegistrationDescriptor {
    pub(crate) fn new(registration: &Registration, dependency_count: usize) -> Self {
        Self {
            token: registration.id(),
            lifetime: registration.lifetime(),
            impl_type_name: registration.implementation().impl_name(),
            dependency_count,
        }
    }

    /// Name of the token the registration is bound to.
    pub fn type_name(&self) -> &'static str {
        self.token.display_name()
    }

    /// Returns true when the implementation differs from the token's type,
    /// as with a replacement or a symbol binding.
    pub fn is_substituted(&self) -> bool {
        self.token.is_symbol() || self.token.display_name() != self.impl_type_name
    }
}
