//! Resolver configuration.

use std::env;

use crate::error::{DiError, DiResult};
use crate::internal::chain::MAX_DEPTH;

/// Environment variable overriding [`ResolverOptions::max_depth`].
pub const ENV_MAX_DEPTH: &str = "FERROUS_DI_MAX_DEPTH";
/// Environment variable overriding [`ResolverOptions::validate_on_build`].
pub const ENV_VALIDATE_ON_BUILD: &str = "FERROUS_DI_VALIDATE_ON_BUILD";
/// Environment variable overriding [`ResolverOptions::cache_enabled`].
pub const ENV_CACHE: &str = "FERROUS_DI_CACHE";

/// Options controlling how the [`CallSiteFactory`](crate::CallSiteFactory)
/// walks the registry.
///
/// # Examples
///
/// ```
/// use ferrous_callsite::ResolverOptions;
///
/// let options = ResolverOptions::default()
///     .with_max_depth(64)
///     .with_validate_on_build(true);
/// assert_eq!(options.max_depth, 64);
/// assert!(options.cache_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ResolverOptions {
    /// Longest dependency path before resolution fails with `DepthExceeded`
    pub max_depth: usize,
    /// Pre-build every registration when the factory is built
    pub validate_on_build: bool,
    /// Memoize call sites; when off every request walks the registry again
    pub cache_enabled: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            validate_on_build: false,
            cache_enabled: true,
        }
    }
}

impl ResolverOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_validate_on_build(mut self, validate: bool) -> Self {
        self.validate_on_build = validate;
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Defaults overridden by the `FERROUS_DI_*` environment variables.
    ///
    /// Unset variables keep their defaults; unparsable values fail with
    /// [`DiError::InvalidOption`].
    pub fn from_env() -> DiResult<Self> {
        let mut options = Self::default();
        if let Some(value) = read_env(ENV_MAX_DEPTH) {
            options.max_depth = value.trim().parse().map_err(|_| DiError::InvalidOption {
                key: ENV_MAX_DEPTH,
                value: value.clone(),
            })?;
        }
        if let Some(value) = read_env(ENV_VALIDATE_ON_BUILD) {
            options.validate_on_build = parse_bool(ENV_VALIDATE_ON_BUILD, &value)?;
        }
        if let Some(value) = read_env(ENV_CACHE) {
            options.cache_enabled = parse_bool(ENV_CACHE, &value)?;
        }
        Ok(options)
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(key: &'static str, value: &str) -> DiResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DiError::InvalidOption {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool(ENV_CACHE, "TRUE").unwrap());
        assert!(parse_bool(ENV_CACHE, " on ").unwrap());
        assert!(!parse_bool(ENV_CACHE, "0").unwrap());
        assert!(matches!(
            parse_bool(ENV_CACHE, "maybe"),
            Err(DiError::InvalidOption { key: ENV_CACHE, .. })
        ));
    }

    #[test]
    fn defaults_match_depth_guard() {
        let options = ResolverOptions::default();
        assert_eq!(options.max_depth, 1024);
        assert!(!options.validate_on_build);
        assert!(options.cache_enabled);
    }
}
