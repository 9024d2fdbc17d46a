//! Resolver configuration.
//!
//! Options can be built in code, read from environment variables, or (with
//! the `config` feature) deserialized from JSON.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::{DiError, DiResult};

/// Default ceiling on the length of a dependency path.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Environment variable prefix read by [`ResolverOptions::from_env`].
pub const ENV_PREFIX: &str = "FERROUS_WIRE";

/// How a pending transient instance is matched to its argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum TransientMatching {
    /// Each slot receives the instance produced for its own graph node.
    #[default]
    Positional,
    /// Each slot receives the first pending instance of the parent whose
    /// implementation type equals the slot registration's implementation
    /// type. Two sibling slots backed by the same implementation type may
    /// receive each other's instances.
    ByImplementation,
}

impl FromStr for TransientMatching {
    type Err = DiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" => Ok(TransientMatching::Positional),
            "by-implementation" | "by_implementation" => Ok(TransientMatching::ByImplementation),
            other => Err(DiError::InvalidConfig(format!(
                "unknown transient matching strategy '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for TransientMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransientMatching::Positional => f.write_str("positional"),
            TransientMatching::ByImplementation => f.write_str("by-implementation"),
        }
    }
}

/// Tunables for the resolver.
///
/// # Examples
///
/// ```rust
/// use ferrous_wire::{ResolverOptions, TransientMatching};
///
/// let options = ResolverOptions::default()
///     .with_max_depth(64)
///     .with_transient_matching(TransientMatching::ByImplementation);
///
/// assert_eq!(options.max_depth, 64);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ResolverOptions {
    /// Longest dependency path accepted before reporting `DepthExceeded`
    pub max_depth: usize,
    /// Strategy for handing transient instances to their consumers
    pub transient_matching: TransientMatching,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            transient_matching: TransientMatching::default(),
        }
    }
}

impl ResolverOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_transient_matching(mut self, matching: TransientMatching) -> Self {
        self.transient_matching = matching;
        self
    }

    /// Reads `FERROUS_WIRE_MAX_DEPTH` and `FERROUS_WIRE_TRANSIENT_MATCHING`,
    /// keeping defaults for unset variables.
    pub fn from_env() -> DiResult<Self> {
        Self::from_lookup(ENV_PREFIX, |key| env::var(key).ok())
    }

    /// Builds options from an arbitrary key lookup using `{PREFIX}_{NAME}`
    /// keys.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> DiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        let key = |name: &str| format!("{}_{}", prefix.to_uppercase(), name);

        if let Some(raw) = lookup(&key("MAX_DEPTH")) {
            options.max_depth = raw.trim().parse().map_err(|_| {
                DiError::InvalidConfig(format!("max depth '{}' is not a number", raw))
            })?;
        }
        if let Some(raw) = lookup(&key("TRANSIENT_MATCHING")) {
            options.transient_matching = raw.parse()?;
        }

        options.validate()?;
        Ok(options)
    }

    /// Parses options from JSON; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| DiError::InvalidConfig(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    #[cfg(feature = "config")]
    pub fn to_json(&self) -> DiResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DiError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> DiResult<()> {
        if self.max_depth == 0 {
            return Err(DiError::InvalidConfig("max depth must be > 0".to_string()));
        }
        Ok(())
    }
}
