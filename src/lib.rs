//! # ferrous-wire
//!
//! Graph-based dependency resolution for Rust.
//!
//! Components are registered against a [`Token`] together with a
//! [`Definition`] (a constructor plus its ordered dependency tokens) and a
//! [`Lifetime`]. Resolving a token discovers the whole dependency graph
//! first and then constructs it leaves-first, so every constructor sees
//! fully built arguments.
//!
//! ## Features
//!
//! - **Three lifetimes**: Singleton, Scoped (one instance per resolution call) and Transient
//! - **Two-phase resolution**: graph discovery, then leaves-first construction
//! - **Circular dependency detection**: errors carry the offending path
//! - **Replaceable registrations**: swap in mocks without touching consumers
//! - **Introspection**: validation reports, descriptors and exportable resolution plans
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_wire::{Container, Definition, Lifetime, Token};
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let mut container = Container::new();
//! container.register(
//!     Token::of::<Database>(),
//!     Definition::new(|_| Ok(Database { connection_string: "postgres://localhost".to_string() })),
//!     Lifetime::Singleton,
//!     false,
//! );
//! container.register(
//!     Token::of::<UserService>(),
//!     Definition::new(|args| Ok(UserService { db: args.get::<Database>(0)? }))
//!         .depends_on::<Database>(),
//!     Lifetime::Transient,
//!     false,
//! );
//!
//! let service = container.get::<UserService>().unwrap();
//! assert_eq!(service.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Lifetimes
//!
//! - **Singleton**: created once and cached by the container until flushed
//! - **Scoped**: created once per top-level resolution and shared within it
//! - **Transient**: created fresh for every consumer slot that requests it
//!
//! ```rust
//! use ferrous_wire::{Container, Definition, Lifetime, Token};
//! use std::sync::Arc;
//!
//! struct Request;
//! struct Handler { a: Arc<Request>, b: Arc<Request> }
//!
//! let mut container = Container::new();
//! container.register(Token::of::<Request>(), Definition::new(|_| Ok(Request)), Lifetime::Scoped, false);
//! container.register(
//!     Token::of::<Handler>(),
//!     Definition::new(|args| Ok(Handler { a: args.get(0)?, b: args.get(1)? }))
//!         .depends_on::<Request>()
//!         .depends_on::<Request>(),
//!     Lifetime::Transient,
//!     false,
//! );
//!
//! let first = container.get::<Handler>().unwrap();
//! let second = container.get::<Handler>().unwrap();
//! // Shared within one resolution, rebuilt for the next
//! assert!(Arc::ptr_eq(&first.a, &first.b));
//! assert!(!Arc::ptr_eq(&first.a, &second.a));
//! ```
//!
//! ## Replacement
//!
//! ```rust
//! use ferrous_wire::{Container, Definition, Lifetime, Token};
//!
//! trait Mailer: Send + Sync { fn name(&self) -> &'static str; }
//! struct Smtp;
//! struct FakeMailer;
//! impl Mailer for Smtp { fn name(&self) -> &'static str { "smtp" } }
//! impl Mailer for FakeMailer { fn name(&self) -> &'static str { "fake" } }
//!
//! let mailer = Token::symbol("mailer");
//! let mut container = Container::new();
//! container.register(mailer, Definition::new(|_| Ok(Box::new(Smtp) as Box<dyn Mailer>)), Lifetime::Singleton, false);
//! container.replace(mailer, Definition::new(|_| Ok(Box::new(FakeMailer) as Box<dyn Mailer>)), Lifetime::Singleton);
//!
//! let resolved = container.resolve_as::<Box<dyn Mailer>>(mailer).unwrap();
//! assert_eq!(resolved.name(), "fake");
//! ```

pub mod config;
pub mod container;
pub mod definition;
pub mod descriptors;
pub mod error;
pub mod graph;
pub mod graph_export;
pub mod key;
pub mod lifetime;
pub mod metadata;
pub mod observer;
pub mod registration;
pub mod shared;
pub mod validation;

// Internal modules
mod internal;
mod resolver;
mod store;

pub use config::{ResolverOptions, TransientMatching, DEFAULT_MAX_DEPTH};
pub use container::Container;
pub use definition::{AnyArc, Arguments, Definition};
pub use descriptors::RegistrationDescriptor;
pub use error::{DiError, DiResult};
pub use graph::{DependencyGraph, GraphNode};
pub use graph_export::{PlanEdge, PlanNode, ResolutionPlan};
pub use key::Token;
pub use lifetime::Lifetime;
pub use metadata::{DeclaredDependencies, DependencyMetadata, StaticMetadata};
pub use observer::{CountingObserver, ResolutionObserver, TracingObserver};
pub use registration::{Registration, Registry};
pub use shared::SharedContainer;
pub use validation::{ValidationError, ValidationReport, ValidationWarning};
