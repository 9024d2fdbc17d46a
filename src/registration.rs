//! Registrations and the registry holding them.

use tracing::debug;

use crate::definition::Definition;
use crate::error::{DiError, DiResult};
use crate::internal::Map;
use crate::key::Token;
use crate::lifetime::Lifetime;

/// A definition bound to a token together with its lifetime.
#[derive(Debug, Clone)]
pub struct Registration {
    id: Token,
    implementation: Definition,
    lifetime: Option<Lifetime>,
}

impl Registration {
    pub fn new(id: Token, implementation: Definition, lifetime: Option<Lifetime>) -> Self {
        Self {
            id,
            implementation,
            lifetime,
        }
    }

    pub fn id(&self) -> Token {
        self.id
    }

    pub fn implementation(&self) -> &Definition {
        &self.implementation
    }

    /// Lifetime tag, absent when the definition was registered untagged.
    pub fn lifetime(&self) -> Option<Lifetime> {
        self.lifetime
    }

    /// Lifetime tag or [`DiError::MissingLifetime`].
    pub fn required_lifetime(&self) -> DiResult<Lifetime> {
        self.lifetime
            .ok_or(DiError::MissingLifetime(self.id.display_name()))
    }
}

/// Token to registration mapping.
///
/// Holds at most one registration per token. Registrations live until the
/// registry is flushed.
#[derive(Debug, Default)]
pub struct Registry {
    registrations: Map<Token, Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `registration`.
    ///
    /// Without `replace`, an existing registration for the same token is
    /// kept and the call is a no-op. With `replace`, the existing entry is
    /// overwritten unconditionally. Returns whether the registration was
    /// stored.
    pub fn register(&mut self, registration: Registration, replace: bool) -> bool {
        let token = registration.id;
        if !replace && self.registrations.contains_key(&token) {
            debug!(token = %token, "registration already present, keeping existing");
            return false;
        }
        if self.registrations.insert(token, registration).is_some() {
            debug!(token = %token, "registration replaced");
        }
        true
    }

    /// Looks up the registration for `token`.
    pub fn lookup(&self, token: &Token) -> DiResult<&Registration> {
        self.registrations
            .get(token)
            .ok_or(DiError::NotRegistered(token.display_name()))
    }

    pub fn get(&self, token: &Token) -> Option<&Registration> {
        self.registrations.get(token)
    }

    pub fn contains(&self, token: &Token) -> bool {
        self.registrations.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.registrations.values()
    }

    /// Removes every registration.
    pub fn flush(&mut self) {
        self.registrations.clear();
    }
}
