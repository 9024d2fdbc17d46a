//! Component identity tokens.

use std::any::TypeId;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

/// Identity of a registrable component.
///
/// A token is either the identity of a Rust type or a manually allocated
/// symbol. Two equal tokens always denote the same logical component; the
/// diagnostic name carried alongside is ignored by equality and hashing.
///
/// # Examples
///
/// ```rust
/// use ferrous_wire::Token;
///
/// struct Database;
///
/// assert_eq!(Token::of::<Database>(), Token::of::<Database>());
///
/// // Symbols are unique even when they share a name
/// let primary = Token::symbol("connection");
/// let replica = Token::symbol("connection");
/// assert_ne!(primary, replica);
/// assert_eq!(primary.display_name(), "connection");
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Token {
    /// Type identity with the type name for diagnostics
    Type(TypeId, &'static str),
    /// Manually allocated symbol with a diagnostic name
    Symbol(u64, &'static str),
}

impl Token {
    /// Token for the type `T`.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Token::Type(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// Mints a fresh symbol that is distinct from every other token.
    pub fn symbol(name: &'static str) -> Self {
        Token::Symbol(NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed), name)
    }

    /// Human-readable name for errors and logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            Token::Type(_, name) => name,
            Token::Symbol(_, name) => name,
        }
    }

    /// Returns true for symbol tokens.
    pub fn is_symbol(&self) -> bool {
        matches!(self, Token::Symbol(..))
    }
}

impl PartialEq for Token {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Token::Type(a, _), Token::Type(b, _)) => a == b,
            (Token::Symbol(a, _), Token::Symbol(b, _)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Token {}

impl std::hash::Hash for Token {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Token::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Token::Symbol(id, _) => {
                1u8.hash(state);
                id.hash(state);
            }
        }
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        match (self, other) {
            (Token::Type(a, _), Token::Type(b, _)) => a.cmp(b),
            (Token::Symbol(a, _), Token::Symbol(b, _)) => a.cmp(b),
            (Token::Type(..), Token::Symbol(..)) => Ordering::Less,
            (Token::Symbol(..), Token::Type(..)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Type(_, name) => f.write_str(name),
            Token::Symbol(id, name) => write!(f, "{}#{}", name, id),
        }
    }
}
