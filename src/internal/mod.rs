//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod sync;

pub(crate) use circular::ResolutionPath;

#[cfg(feature = "ahash")]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
#[cfg(feature = "ahash")]
pub(crate) type Set<K> = std::collections::HashSet<K, ahash::RandomState>;

#[cfg(not(feature = "ahash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;
#[cfg(not(feature = "ahash"))]
pub(crate) type Set<K> = std::collections::HashSet<K>;
