//! Error types for the resolution engine.

use thiserror::Error;

/// Resolution errors
///
/// Every failure is reported synchronously to the caller of
/// [`Container::resolve`](crate::Container::resolve). Nothing is retried
/// internally.
///
/// # Examples
///
/// ```rust
/// use ferrous_wire::{Container, DiError, Token};
///
/// struct Unknown;
///
/// let mut container = Container::new();
/// match container.resolve(Token::of::<Unknown>()) {
///     Err(DiError::NotRegistered(name)) => assert!(name.ends_with("Unknown")),
///     _ => unreachable!(),
/// }
///
/// let cycle = DiError::CyclicDependency(vec!["A", "B", "A"]);
/// assert_eq!(cycle.to_string(), "Cyclic dependency: A -> B -> A");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// Token (root or dependency) has no registration
    #[error("Component not registered: {0}")]
    NotRegistered(&'static str),
    /// Component depends on itself, directly or transitively (includes path)
    #[error("Cyclic dependency: {}", .0.join(" -> "))]
    CyclicDependency(Vec<&'static str>),
    /// Registration was stored without a lifetime tag
    #[error("Missing lifetime for: {0}")]
    MissingLifetime(&'static str),
    /// A dependency's instance was absent from its lifetime store while
    /// assembling arguments
    #[error("Could not resolve argument {dependency} for {consumer}")]
    ArgumentResolutionFailure {
        consumer: &'static str,
        dependency: &'static str,
    },
    /// Downcast to the requested type failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Dependency path grew beyond the configured ceiling
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// Constructor reported a failure
    #[error("Construction of {name} failed: {message}")]
    ConstructionFailed {
        name: &'static str,
        message: String,
    },
    /// Plan could not be serialized
    #[error("Export failed: {0}")]
    ExportFailed(String),
    /// Resolver options could not be loaded
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for resolution operations
pub type DiResult<T> = Result<T, DiError>;
