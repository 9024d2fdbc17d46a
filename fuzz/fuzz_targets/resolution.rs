#![no_main]

use ferrous_wire::{Container, Definition, DiError, Lifetime, Token};
use libfuzzer_sys::fuzz_target;

const MAX_NODES: usize = 16;

fn lifetime(byte: u8) -> Option<Lifetime> {
    match byte % 4 {
        0 => Some(Lifetime::Singleton),
        1 => Some(Lifetime::Scoped),
        2 => Some(Lifetime::Transient),
        _ => None,
    }
}

// Byte layout: node count, then per node a lifetime byte, a dependency
// count and that many dependency indices. Any graph shape is accepted,
// including cycles, untagged nodes and dangling references; resolution
// must return an error for those instead of panicking or looping.
fuzz_target!(|data: &[u8]| {
    let Some((&count, mut rest)) = data.split_first() else {
        return;
    };
    let count = (count as usize % MAX_NODES) + 1;
    let tokens: Vec<Token> = (0..count).map(|_| Token::symbol("node")).collect();
    // One extra token that is never registered
    let dangling = Token::symbol("dangling");

    let mut container = Container::new();
    for token in &tokens {
        let [tag, deps, tail @ ..] = rest else {
            break;
        };
        let deps = (*deps as usize) % 4;
        let (indices, tail) = tail.split_at(deps.min(tail.len()));
        rest = tail;

        let definition = indices.iter().fold(Definition::new(|args| Ok(args.len())), |d, index| {
            let dependency = tokens.get(*index as usize % (count + 1)).copied().unwrap_or(dangling);
            d.depends_on_token(dependency)
        });
        match lifetime(*tag) {
            Some(lifetime) => container.register(*token, definition, lifetime, false),
            None => container.register_definition(*token, definition, false),
        };
    }

    let report = container.validate();
    let registered: Vec<Token> = tokens.iter().copied().filter(|t| container.is_registered(t)).collect();
    for token in &registered {
        match container.resolve(*token) {
            Ok(value) => {
                assert!(value.downcast::<usize>().is_ok());
            }
            Err(DiError::ArgumentResolutionFailure { .. }) | Err(DiError::TypeMismatch(_)) => {
                panic!("internal resolution failure for {}", token)
            }
            Err(_) => assert!(!report.is_valid()),
        }
    }
});
