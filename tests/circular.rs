use ferrous_wire::{Container, Definition, DiError, Lifetime, ResolverOptions, Token};

const LIFETIMES: [Lifetime; 3] = [Lifetime::Singleton, Lifetime::Scoped, Lifetime::Transient];

fn node(deps: &[Token]) -> Definition {
    deps.iter()
        .fold(Definition::new(|_| Ok(())), |definition, dep| definition.depends_on_token(*dep))
}

/// Helper: assert that resolving `root` fails with a cycle along `expected_path`.
fn assert_cycle(container: &mut Container, root: Token, expected_path: &[&'static str]) {
    match container.resolve(root) {
        Err(DiError::CyclicDependency(path)) => assert_eq!(path, expected_path, "wrong circular path"),
        Err(other) => panic!("expected CyclicDependency, got {}", other),
        Ok(_) => panic!("expected CyclicDependency, resolution succeeded"),
    }
}

#[test]
fn self_dependency_is_detected_for_every_lifetime() {
    for lifetime in LIFETIMES {
        let a = Token::symbol("A");
        let mut container = Container::new();
        container.register(a, node(&[a]), lifetime, false);

        assert_cycle(&mut container, a, &["A", "A"]);
    }
}

#[test]
fn two_node_cycle_is_detected_for_every_lifetime() {
    for lifetime in LIFETIMES {
        let (a, b) = (Token::symbol("A"), Token::symbol("B"));
        let mut container = Container::new();
        container
            .register(a, node(&[b]), lifetime, false)
            .register(b, node(&[a]), lifetime, false);

        assert_cycle(&mut container, a, &["A", "B", "A"]);
        assert_cycle(&mut container, b, &["B", "A", "B"]);
    }
}

#[test]
fn long_cycle_reports_only_the_loop() {
    let (root, a, b, c) = (Token::symbol("Root"), Token::symbol("A"), Token::symbol("B"), Token::symbol("C"));
    let mut container = Container::new();
    container
        .register(root, node(&[a]), Lifetime::Transient, false)
        .register(a, node(&[b]), Lifetime::Scoped, false)
        .register(b, node(&[c]), Lifetime::Singleton, false)
        .register(c, node(&[a]), Lifetime::Transient, false);

    assert_cycle(&mut container, root, &["A", "B", "C", "A"]);
}

#[test]
fn cycle_behind_a_shared_node_is_detected() {
    let (x, b, c) = (Token::symbol("X"), Token::symbol("B"), Token::symbol("C"));
    let mut container = Container::new();
    container
        .register(x, node(&[b, c]), Lifetime::Transient, false)
        .register(b, node(&[c]), Lifetime::Scoped, false)
        .register(c, node(&[b]), Lifetime::Scoped, false);

    assert!(matches!(container.resolve(x), Err(DiError::CyclicDependency(_))));
}

#[test]
fn diamond_is_not_a_cycle() {
    let (top, left, right, bottom) = (
        Token::symbol("top"),
        Token::symbol("left"),
        Token::symbol("right"),
        Token::symbol("bottom"),
    );

    for lifetime in LIFETIMES {
        let mut container = Container::new();
        container
            .register(top, node(&[left, right]), Lifetime::Transient, false)
            .register(left, node(&[bottom]), lifetime, false)
            .register(right, node(&[bottom]), lifetime, false)
            .register(bottom, node(&[]), lifetime, false);

        assert!(container.resolve(top).is_ok());
    }
}

#[test]
fn repeated_dependency_is_not_a_cycle() {
    let (root, leaf) = (Token::symbol("root"), Token::symbol("leaf"));
    let mut container = Container::new();
    container
        .register(root, node(&[leaf, leaf, leaf]), Lifetime::Transient, false)
        .register(leaf, node(&[]), Lifetime::Transient, false);

    assert!(container.resolve(root).is_ok());
}

#[test]
fn failed_cycle_leaves_no_singletons_behind() {
    let (a, b) = (Token::symbol("A"), Token::symbol("B"));
    let mut container = Container::new();
    container
        .register(a, node(&[b]), Lifetime::Singleton, false)
        .register(b, node(&[a]), Lifetime::Singleton, false);

    assert!(container.resolve(a).is_err());
    assert_eq!(container.singleton_count(), 0);
}

#[test]
fn deep_chain_respects_depth_ceiling() {
    let tokens: Vec<Token> = (0..6).map(|_| Token::symbol("link")).collect();

    let build = |max_depth: usize| {
        let mut container = Container::new().with_options(ResolverOptions::default().with_max_depth(max_depth)).unwrap();
        for window in tokens.windows(2) {
            container.register(window[0], node(&[window[1]]), Lifetime::Transient, false);
        }
        container.register(tokens[5], node(&[]), Lifetime::Transient, false);
        container
    };

    assert!(build(6).resolve(tokens[0]).is_ok());
    assert_eq!(build(5).resolve(tokens[0]).err(), Some(DiError::DepthExceeded(5)));
}

#[test]
fn long_acyclic_chain_resolves_without_recursion() {
    let tokens: Vec<Token> = (0..2_000).map(|_| Token::symbol("link")).collect();

    let mut container = Container::new().with_options(ResolverOptions::default().with_max_depth(4_096)).unwrap();
    for window in tokens.windows(2) {
        container.register(window[0], node(&[window[1]]), Lifetime::Transient, false);
    }
    container.register(tokens[tokens.len() - 1], node(&[]), Lifetime::Transient, false);

    assert!(container.resolve(tokens[0]).is_ok());
}
