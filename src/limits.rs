//! Traversal bounds: the depth limit requested per call and the safety
//! limits configured per engine.

use std::num::NonZeroUsize;

use crate::error::ConfigError;

/// Environment variable holding the maximum number of expansion levels.
pub const MAX_LEVELS_VAR: &str = "HIERARCHY_MAX_LEVELS";

/// Environment variable holding the maximum frontier size.
pub const MAX_FRONTIER_VAR: &str = "HIERARCHY_MAX_FRONTIER";

/// How deep a traversal may go below its root.
///
/// Direct children sit at depth 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthLimit {
    /// Follow the hierarchy until no new node turns up.
    #[default]
    Unbounded,
    /// Include nodes up to and including this depth.
    AtMost(u32),
}

impl DepthLimit {
    /// Interpret a signed limit; zero and negative values admit nothing.
    #[must_use]
    pub fn from_signed(limit: i32) -> Self {
        Self::AtMost(u32::try_from(limit).unwrap_or(0))
    }

    /// Whether nodes at `depth` are within the limit.
    #[must_use]
    pub const fn admits(self, depth: u32) -> bool {
        match self {
            Self::Unbounded => true,
            Self::AtMost(max) => depth <= max,
        }
    }
}

/// Safety limits an embedding service puts on a single traversal.
///
/// Both are unset by default, in which case only the hierarchy's shape bounds
/// the work done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraversalLimits {
    /// Maximum number of batched child lookups.
    pub max_levels: Option<NonZeroUsize>,
    /// Maximum number of nodes in one frontier.
    pub max_frontier: Option<NonZeroUsize>,
}

impl TraversalLimits {
    /// No limits.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_levels: None,
            max_frontier: None,
        }
    }

    /// Cap the number of expansion levels.
    #[must_use]
    pub const fn with_max_levels(mut self, levels: NonZeroUsize) -> Self {
        self.max_levels = Some(levels);
        self
    }

    /// Cap the frontier size.
    #[must_use]
    pub const fn with_max_frontier(mut self, size: NonZeroUsize) -> Self {
        self.max_frontier = Some(size);
        self
    }

    /// Read limits from [`MAX_LEVELS_VAR`] and [`MAX_FRONTIER_VAR`].
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidLimit`] if a variable is set to anything
    /// other than a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read limits through `lookup`, which maps a variable name to its value.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidLimit`] if a value is not a positive
    /// integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            max_levels: parse_limit(MAX_LEVELS_VAR, lookup(MAX_LEVELS_VAR))?,
            max_frontier: parse_limit(MAX_FRONTIER_VAR, lookup(MAX_FRONTIER_VAR))?,
        })
    }
}

fn parse_limit(
    key: &'static str,
    raw: Option<String>,
) -> Result<Option<NonZeroUsize>, ConfigError> {
    let Some(value) = raw else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<NonZeroUsize>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidLimit { key, value })
}
