//! Cyclic dependency detection infrastructure.

use std::rc::Rc;

use crate::key::Token;

struct Segment {
    token: Token,
    parent: Option<Rc<Segment>>,
}

/// Chain of registration tokens from the resolution root down to one
/// stack element.
///
/// Siblings share their ancestors' segments, so extending a path for every
/// discovered dependency is a single allocation.
#[derive(Clone, Default)]
pub(crate) struct ResolutionPath {
    head: Option<Rc<Segment>>,
    depth: usize,
}

impl ResolutionPath {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    /// Returns a new path with `token` appended.
    pub(crate) fn push(&self, token: Token) -> Self {
        Self {
            head: Some(Rc::new(Segment {
                token,
                parent: self.head.clone(),
            })),
            depth: self.depth + 1,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn contains(&self, token: &Token) -> bool {
        self.tokens_from_tail().any(|t| t == token)
    }

    /// Renders the cycle closed by `token`: every name from its first
    /// occurrence on the path to the tail, followed by `token` again.
    pub(crate) fn cycle_through(&self, token: &Token) -> Vec<&'static str> {
        let mut cycle = Vec::new();
        for t in self.tokens_from_tail() {
            cycle.push(t.display_name());
            if t == token {
                break;
            }
        }
        cycle.reverse();
        cycle.push(token.display_name());
        cycle
    }

    fn tokens_from_tail(&self) -> impl Iterator<Item = &Token> + '_ {
        let mut cursor = self.head.as_deref();
        std::iter::from_fn(move || {
            let segment = cursor?;
            cursor = segment.parent.as_deref();
            Some(&segment.token)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_starts_at_first_occurrence() {
        let root = Token::symbol("Root");
        let a = Token::symbol("A");
        let b = Token::symbol("B");

        let path = ResolutionPath::root().push(root).push(a).push(b);
        assert_eq!(path.depth(), 3);
        assert!(path.contains(&a));
        assert!(!path.contains(&Token::symbol("C")));
        assert_eq!(path.cycle_through(&a), vec!["A", "B", "A"]);
    }

    #[test]
    fn self_reference_is_two_entries() {
        let a = Token::symbol("A");
        let path = ResolutionPath::root().push(a);
        assert_eq!(path.cycle_through(&a), vec!["A", "A"]);
    }

    #[test]
    fn siblings_do_not_see_each_other() {
        let parent = ResolutionPath::root().push(Token::symbol("P"));
        let left_token = Token::symbol("L");
        let left = parent.push(left_token);
        let right = parent.push(Token::symbol("R"));
        assert!(left.contains(&left_token));
        assert!(!right.contains(&left_token));
    }
}
