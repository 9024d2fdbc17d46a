//! Component definitions and constructor arguments.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Token;
use crate::lifetime::Lifetime;

/// Type-erased shared instance.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Ctor = Arc<dyn Fn(&Arguments) -> DiResult<AnyArc> + Send + Sync>;

/// Implementation of a registrable component.
///
/// A definition pairs a constructor with the ordered list of tokens the
/// constructor needs. Dependencies are declared explicitly with the
/// builder methods; the constructor receives their resolved instances in
/// the same order through [`Arguments`].
///
/// # Examples
///
/// ```rust
/// use ferrous_wire::{Definition, Lifetime, Token};
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Pool { config: Arc<Config> }
///
/// let definition = Definition::new(|args| Ok(Pool { config: args.get::<Config>(0)? }))
///     .depends_on::<Config>()
///     .singleton();
///
/// assert_eq!(definition.dependencies(), &[Token::of::<Config>()]);
/// assert_eq!(definition.lifetime(), Some(Lifetime::Singleton));
/// assert_eq!(definition.token(), Token::of::<Pool>());
/// ```
#[derive(Clone)]
pub struct Definition {
    impl_id: TypeId,
    impl_name: &'static str,
    lifetime: Option<Lifetime>,
    dependencies: Vec<Token>,
    ctor: Ctor,
}

impl Definition {
    /// Creates a definition from a constructor for `T`.
    pub fn new<T, F>(ctor: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        let ctor = move |args: &Arguments| -> DiResult<AnyArc> { Ok(Arc::new(ctor(args)?)) };
        Self::from_parts(TypeId::of::<T>(), std::any::type_name::<T>(), Arc::new(ctor))
    }

    /// Creates a definition from a fallible constructor whose error is
    /// reported as [`DiError::ConstructionFailed`].
    pub fn try_new<T, E, F>(ctor: F) -> Self
    where
        T: Send + Sync + 'static,
        E: fmt::Display,
        F: Fn(&Arguments) -> Result<T, E> + Send + Sync + 'static,
    {
        Self::new(move |args| {
            ctor(args).map_err(|e| DiError::ConstructionFailed {
                name: std::any::type_name::<T>(),
                message: e.to_string(),
            })
        })
    }

    /// Creates a definition that always hands out the same prebuilt value.
    ///
    /// Mostly useful for substituting mocks. Every resolution yields the
    /// same `Arc`, whatever lifetime the definition is registered with.
    pub fn instance<T: Send + Sync + 'static>(value: T) -> Self {
        let shared: AnyArc = Arc::new(value);
        let ctor = move |_: &Arguments| -> DiResult<AnyArc> { Ok(shared.clone()) };
        Self::from_parts(TypeId::of::<T>(), std::any::type_name::<T>(), Arc::new(ctor))
    }

    fn from_parts(impl_id: TypeId, impl_name: &'static str, ctor: Ctor) -> Self {
        Self {
            impl_id,
            impl_name,
            lifetime: None,
            dependencies: Vec::new(),
            ctor,
        }
    }

    /// Declares the next constructor argument as the component of type `T`.
    pub fn depends_on<T: ?Sized + 'static>(self) -> Self {
        self.depends_on_token(Token::of::<T>())
    }

    /// Declares the next constructor argument by token.
    pub fn depends_on_token(mut self, token: Token) -> Self {
        self.dependencies.push(token);
        self
    }

    /// Tags the definition with a lifetime.
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    /// Tags the definition as [`Lifetime::Singleton`].
    pub fn singleton(self) -> Self {
        self.with_lifetime(Lifetime::Singleton)
    }

    /// Tags the definition as [`Lifetime::Scoped`].
    pub fn scoped(self) -> Self {
        self.with_lifetime(Lifetime::Scoped)
    }

    /// Tags the definition as [`Lifetime::Transient`].
    pub fn transient(self) -> Self {
        self.with_lifetime(Lifetime::Transient)
    }

    /// Token identifying the implementation type itself.
    pub fn token(&self) -> Token {
        Token::Type(self.impl_id, self.impl_name)
    }

    pub fn impl_id(&self) -> TypeId {
        self.impl_id
    }

    pub fn impl_name(&self) -> &'static str {
        self.impl_name
    }

    pub fn lifetime(&self) -> Option<Lifetime> {
        self.lifetime
    }

    /// Declared dependency tokens in argument order.
    pub fn dependencies(&self) -> &[Token] {
        &self.dependencies
    }

    pub(crate) fn construct(&self, args: &Arguments) -> DiResult<AnyArc> {
        (self.ctor)(args)
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("impl_name", &self.impl_name)
            .field("lifetime", &self.lifetime)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

/// Positional constructor arguments.
///
/// Slot `i` holds the instance resolved for the definition's `i`-th
/// declared dependency.
pub struct Arguments {
    consumer: &'static str,
    values: Vec<(Token, AnyArc)>,
}

impl Arguments {
    pub(crate) fn with_capacity(consumer: &'static str, capacity: usize) -> Self {
        Self {
            consumer,
            values: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, token: Token, value: AnyArc) {
        self.values.push((token, value));
    }

    /// Returns the argument at `index` downcast to `T`.
    pub fn get<T: Send + Sync + 'static>(&self, index: usize) -> DiResult<Arc<T>> {
        let value = self
            .get_any(index)
            .ok_or(DiError::ArgumentResolutionFailure {
                consumer: self.consumer,
                dependency: std::any::type_name::<T>(),
            })?;
        value
            .clone()
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Returns the type-erased argument at `index`.
    pub fn get_any(&self, index: usize) -> Option<&AnyArc> {
        self.values.get(index).map(|(_, value)| value)
    }

    /// Token the argument at `index` was resolved for.
    pub fn token(&self, index: usize) -> Option<Token> {
        self.values.get(index).map(|(token, _)| *token)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Engine(u32);

    #[test]
    fn arguments_downcast_by_position() {
        let mut args = Arguments::with_capacity("Car", 2);
        args.push(Token::of::<Engine>(), Arc::new(Engine(8)));
        args.push(Token::of::<String>(), Arc::new("red".to_string()));

        assert_eq!(args.len(), 2);
        assert_eq!(args.get::<Engine>(0).unwrap().0, 8);
        assert_eq!(*args.get::<String>(1).unwrap(), "red");
        assert_eq!(args.token(1), Some(Token::of::<String>()));
    }

    #[test]
    fn wrong_type_is_a_mismatch() {
        let mut args = Arguments::with_capacity("Car", 1);
        args.push(Token::of::<Engine>(), Arc::new(Engine(8)));

        assert!(matches!(args.get::<String>(0), Err(DiError::TypeMismatch(_))));
    }

    #[test]
    fn missing_slot_reports_consumer() {
        let args = Arguments::with_capacity("Car", 0);
        match args.get::<Engine>(0) {
            Err(DiError::ArgumentResolutionFailure { consumer, dependency }) => {
                assert_eq!(consumer, "Car");
                assert!(dependency.ends_with("Engine"));
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn try_new_maps_errors() {
        let definition = Definition::try_new::<Engine, _, _>(|_| Err("no fuel"));
        let args = Arguments::with_capacity("test", 0);
        match definition.construct(&args) {
            Err(DiError::ConstructionFailed { name, message }) => {
                assert!(name.ends_with("Engine"));
                assert_eq!(message, "no fuel");
            }
            _ => panic!("expected ConstructionFailed"),
        }
    }

    #[test]
    fn instance_hands_out_same_arc() {
        let definition = Definition::instance(Engine(4));
        let args = Arguments::with_capacity("test", 0);
        let a = definition.construct(&args).unwrap();
        let b = definition.construct(&args).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(definition.lifetime(), None);
    }
}
