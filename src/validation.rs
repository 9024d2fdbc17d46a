//! Static validation of a registry.
//!
//! Walks every registration's dependency list without constructing
//! anything, so configuration errors surface at startup rather than on the
//! first resolution that happens to reach them.
//!
//! # Validation Rules
//!
//! - **Missing dependency**: error, a dependency token has no registration
//! - **Missing lifetime**: error, a registration was stored untagged
//! - **Cyclic dependency**: error, a component reaches itself
//! - **Singleton -> Scoped / Transient**: warning, the singleton keeps the
//!   instance built during its first resolution forever

use crate::error::{DiError, DiResult};
use crate::internal::Map;
use crate::key::Token;
use crate::lifetime::Lifetime;
use crate::metadata::DependencyMetadata;
use crate::registration::Registry;

/// A problem that makes a resolution fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Dependency is not registered
    MissingDependency {
        service: &'static str,
        dependency: &'static str,
    },
    /// Registration has no lifetime tag
    MissingLifetime { service: &'static str },
    /// Cyclic dependency detected
    CircularDependency { cycle: Vec<&'static str> },
}

/// A configuration that resolves but probably does not behave as intended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Longer-lived component holds a shorter-lived dependency
    CaptiveDependency {
        service: &'static str,
        service_lifetime: Lifetime,
        dependency: &'static str,
        dependency_lifetime: Lifetime,
    },
}

/// Result of [`Container::validate`](crate::Container::validate).
///
/// # Examples
///
/// ```
/// use ferrous_wire::{Container, Definition, Lifetime, Token, ValidationError};
///
/// struct Repository;
/// struct Connection;
///
/// let mut container = Container::new();
/// container.register(
///     Token::of::<Repository>(),
///     Definition::new(|_| Ok(Repository)).depends_on::<Connection>(),
///     Lifetime::Scoped,
///     false,
/// );
///
/// let report = container.validate();
/// assert!(!report.is_valid());
/// assert!(matches!(report.errors[0], ValidationError::MissingDependency { .. }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Converts the first error into the [`DiError`] a resolution would
    /// report.
    pub fn into_result(self) -> DiResult<()> {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(ValidationError::MissingDependency { dependency, .. }) => {
                Err(DiError::NotRegistered(dependency))
            }
            Some(ValidationError::MissingLifetime { service }) => Err(DiError::MissingLifetime(service)),
            Some(ValidationError::CircularDependency { cycle }) => Err(DiError::CyclicDependency(cycle)),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

struct Walker<'a> {
    edges: Map<Token, Vec<Token>>,
    marks: Map<Token, Mark>,
    /// Tokens on the current path, each with the index of its next child
    stack: Vec<(Token, usize)>,
    report: &'a mut ValidationReport,
}

impl<'a> Walker<'a> {
    /// Depth-first walk from `root` with an explicit stack, so arbitrarily
    /// long chains do not grow the call stack.
    fn visit(&mut self, root: Token) {
        if !self.enter(root) {
            return;
        }

        while let Some((token, next)) = self.stack.last_mut() {
            let token = *token;
            let child = self.edges.get(&token).and_then(|children| children.get(*next)).copied();
            match child {
                Some(child) => {
                    *next += 1;
                    self.enter(child);
                }
                None => {
                    self.stack.pop();
                    self.marks.insert(token, Mark::Done);
                }
            }
        }
    }

    /// Pushes `token` onto the path. Returns false when it is already done
    /// or closes a cycle.
    fn enter(&mut self, token: Token) -> bool {
        match self.marks.get(&token) {
            Some(Mark::Done) => false,
            Some(Mark::InProgress) => {
                let start = self.stack.iter().position(|(t, _)| *t == token).unwrap_or(0);
                let mut cycle: Vec<_> = self.stack[start..].iter().map(|(t, _)| t.display_name()).collect();
                cycle.push(token.display_name());
                self.report.errors.push(ValidationError::CircularDependency { cycle });
                false
            }
            None => {
                self.marks.insert(token, Mark::InProgress);
                self.stack.push((token, 0));
                true
            }
        }
    }
}

pub(crate) fn validate(registry: &Registry, metadata: &dyn DependencyMetadata) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut registrations: Vec<_> = registry.iter().collect();
    registrations.sort_by_key(|r| r.id());

    let mut edges: Map<Token, Vec<Token>> = Map::default();
    for registration in &registrations {
        let service = registration.id();
        let service_lifetime = registration.lifetime();
        if service_lifetime.is_none() {
            report.errors.push(ValidationError::MissingLifetime {
                service: service.display_name(),
            });
        }

        let mut known = Vec::new();
        for dependency in metadata.dependencies_of(registration.implementation()) {
            let Some(target) = registry.get(&dependency) else {
                report.errors.push(ValidationError::MissingDependency {
                    service: service.display_name(),
                    dependency: dependency.display_name(),
                });
                continue;
            };

            if let (Some(Lifetime::Singleton), Some(dependency_lifetime)) = (service_lifetime, target.lifetime()) {
                if dependency_lifetime != Lifetime::Singleton {
                    report.warnings.push(ValidationWarning::CaptiveDependency {
                        service: service.display_name(),
                        service_lifetime: Lifetime::Singleton,
                        dependency: dependency.display_name(),
                        dependency_lifetime,
                    });
                }
            }
            known.push(dependency);
        }
        edges.insert(service, known);
    }

    let mut walker = Walker {
        edges,
        marks: Map::default(),
        stack: Vec::new(),
        report: &mut report,
    };
    for registration in &registrations {
        walker.visit(registration.id());
    }

    report
}
