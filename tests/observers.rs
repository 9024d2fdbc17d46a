use ferrous_wire::{
    Container, CountingObserver, Definition, DependencyMetadata, DiError, Lifetime, ResolutionObserver,
    ResolverOptions, StaticMetadata, Token, TracingObserver, TransientMatching,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<String>>,
}

impl EventLog {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ResolutionObserver for EventLog {
    fn resolving(&self, token: &Token) {
        self.events.lock().unwrap().push(format!("resolving {}", token.display_name()));
    }

    fn instantiated(&self, token: &Token, lifetime: Lifetime) {
        self.events.lock().unwrap().push(format!("instantiated {} {}", token.display_name(), lifetime));
    }

    fn resolved(&self, token: &Token, _duration: Duration) {
        self.events.lock().unwrap().push(format!("resolved {}", token.display_name()));
    }

    fn failed(&self, token: &Token, error: &DiError) {
        self.events.lock().unwrap().push(format!("failed {}: {}", token.display_name(), error));
    }
}

#[test]
fn observer_sees_events_in_order() {
    let (leaf, root) = (Token::symbol("leaf"), Token::symbol("root"));
    let log = Arc::new(EventLog::default());

    let mut container = Container::new();
    container
        .add_observer(log.clone())
        .register(leaf, Definition::new(|_| Ok(())), Lifetime::Singleton, false)
        .register(root, Definition::new(|_| Ok(())).depends_on_token(leaf), Lifetime::Transient, false);

    container.resolve(root).unwrap();
    container.resolve(root).unwrap();

    assert_eq!(
        log.events(),
        vec![
            "resolving root",
            "instantiated leaf singleton",
            "instantiated root transient",
            "resolved root",
            "resolving root",
            "instantiated root transient",
            "resolved root",
        ]
    );
}

#[test]
fn failures_are_reported_to_observers() {
    let missing = Token::symbol("missing");
    let log = Arc::new(EventLog::default());
    let counts = Arc::new(CountingObserver::new());

    let mut container = Container::new();
    container.add_observer(log.clone()).add_observer(counts.clone());

    assert!(container.resolve(missing).is_err());
    assert_eq!(
        log.events(),
        vec!["resolving missing", "failed missing: Component not registered: missing"]
    );
    assert_eq!(counts.failures(), 1);

    counts.reset();
    assert_eq!(counts.failures(), 0);
}

#[test]
fn tracing_observer_can_be_attached() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("ferrous_wire=trace"))
        .with_test_writer()
        .try_init();

    let token = Token::symbol("traced");
    let mut container = Container::new();
    container
        .add_observer(Arc::new(TracingObserver::with_prefix("test")))
        .register(token, Definition::new(|_| Ok(())), Lifetime::Scoped, false);

    assert!(container.resolve(token).is_ok());
    assert!(container.resolve(Token::symbol("absent")).is_err());
}

// ===== Metadata =====

struct Clock;
struct Scheduler {
    clock: Arc<Clock>,
}

#[test]
fn static_metadata_overrides_declared_dependencies() {
    let metadata = StaticMetadata::new().with::<Scheduler>(vec![Token::of::<Clock>()]);

    let mut container = Container::new().with_metadata(metadata);
    container
        .register(Token::of::<Clock>(), Definition::new(|_| Ok(Clock)), Lifetime::Singleton, false)
        .register(
            Token::of::<Scheduler>(),
            Definition::new(|args| Ok(Scheduler { clock: args.get(0)? })),
            Lifetime::Transient,
            false,
        );

    let scheduler = container.get::<Scheduler>().unwrap();
    let clock = container.get::<Clock>().unwrap();
    assert!(Arc::ptr_eq(&scheduler.clock, &clock));

    let descriptor = container
        .descriptors()
        .into_iter()
        .find(|d| d.token == Token::of::<Scheduler>())
        .unwrap();
    assert_eq!(descriptor.dependency_count, 1);
}

#[test]
fn custom_metadata_provider_is_consulted() {
    /// Resolves every definition's dependencies from a name table.
    struct ByName(HashMap<&'static str, Vec<Token>>);

    impl DependencyMetadata for ByName {
        fn dependencies_of(&self, definition: &Definition) -> Vec<Token> {
            self.0.get(definition.impl_name()).cloned().unwrap_or_default()
        }
    }

    let mut table = HashMap::new();
    table.insert(std::any::type_name::<Scheduler>(), vec![Token::of::<Clock>()]);

    let mut container = Container::new().with_metadata(ByName(table));
    container
        .register(Token::of::<Clock>(), Definition::new(|_| Ok(Clock)), Lifetime::Singleton, false)
        .register(
            Token::of::<Scheduler>(),
            Definition::new(|args| Ok(Scheduler { clock: args.get(0)? })),
            Lifetime::Transient,
            false,
        );

    assert!(container.get::<Scheduler>().is_ok());
}

// ===== Options =====

#[test]
fn options_load_from_a_lookup() {
    let vars: HashMap<&str, &str> = [
        ("APP_MAX_DEPTH", "32"),
        ("APP_TRANSIENT_MATCHING", "by-implementation"),
    ]
    .into_iter()
    .collect();

    let options = ResolverOptions::from_lookup("app", |key| vars.get(key).map(|v| v.to_string())).unwrap();
    assert_eq!(options.max_depth, 32);
    assert_eq!(options.transient_matching, TransientMatching::ByImplementation);

    let container = Container::new().with_options(options.clone()).unwrap();
    assert_eq!(container.options(), &options);
}

#[test]
fn invalid_options_are_rejected() {
    let zero = ResolverOptions::from_lookup("app", |key| (key == "APP_MAX_DEPTH").then(|| "0".to_string()));
    assert!(matches!(zero, Err(DiError::InvalidConfig(_))));

    let unknown =
        ResolverOptions::from_lookup("app", |key| (key == "APP_TRANSIENT_MATCHING").then(|| "random".to_string()));
    assert!(matches!(unknown, Err(DiError::InvalidConfig(_))));

    let built_in_code = Container::new().with_options(ResolverOptions::default().with_max_depth(0));
    assert!(matches!(built_in_code, Err(DiError::InvalidConfig(_))));
}

#[cfg(feature = "config")]
#[test]
fn options_load_from_json() {
    let options = ResolverOptions::from_json(r#"{ "max_depth": 16 }"#).unwrap();
    assert_eq!(options.max_depth, 16);
    assert_eq!(options.transient_matching, TransientMatching::Positional);

    let json = options.to_json().unwrap();
    assert_eq!(ResolverOptions::from_json(&json).unwrap(), options);
}

#[cfg(feature = "config")]
#[test]
fn options_nest_inside_application_settings() {
    #[derive(serde::Deserialize)]
    struct Settings {
        name: String,
        #[serde(default)]
        resolver: ResolverOptions,
    }

    let api: Settings = serde_json::from_str(
        r#"{ "name": "api", "resolver": { "transient_matching": "by-implementation" } }"#,
    )
    .unwrap();
    assert_eq!(api.name, "api");
    assert_eq!(api.resolver.transient_matching, TransientMatching::ByImplementation);
    assert_eq!(api.resolver.max_depth, ferrous_wire::DEFAULT_MAX_DEPTH);

    let worker: Settings = serde_json::from_str(r#"{ "name": "worker" }"#).unwrap();
    assert_eq!(worker.resolver, ResolverOptions::default());

    let container = Container::new().with_options(api.resolver).unwrap();
    assert_eq!(container.options().transient_matching, TransientMatching::ByImplementation);
}
