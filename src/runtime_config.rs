//! Environment-based registry configuration.
//!
//! ## Environment variables
//!
//! ### `ROUTEWARDEN_STRICT_SLASH`
//!
//! When set to `1` or `true`, a trailing slash is significant: `/a/b/` and
//! `/a/b` are distinct routes and distinct request paths. Off by default;
//! the lenient behavior folds them together at both registration and
//! resolve time.
//!
//! ### `ROUTEWARDEN_MAX_CONFLICTS_LOGGED`
//!
//! Cap on the number of conflict groups that get an individual warning in
//! the log during registration (default: 64). Groups past the cap are
//! still recorded and reported through the diagnostics surface; they just
//! log at debug level. Keeps pathological manifests from flooding startup
//! logs.

use std::env;

/// Default cap on individually logged conflict groups.
pub const DEFAULT_MAX_CONFLICTS_LOGGED: usize = 64;

/// Registry behavior knobs, loaded once at startup.
#[derive(Debug, Clone, Copy)]
pub struct RegistryConfig {
    /// Trailing slashes are significant when true.
    pub strict_slash: bool,
    /// Number of conflict groups logged individually at warn level.
    pub max_conflicts_logged: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            strict_slash: false,
            max_conflicts_logged: DEFAULT_MAX_CONFLICTS_LOGGED,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let strict_slash = env::var("ROUTEWARDEN_STRICT_SLASH")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let max_conflicts_logged = env::var("ROUTEWARDEN_MAX_CONFLICTS_LOGGED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONFLICTS_LOGGED);
        RegistryConfig {
            strict_slash,
            max_conflicts_logged,
        }
    }
}
