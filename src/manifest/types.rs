use serde::Deserialize;

use crate::media::MediaType;

/// A declarative route manifest: one or more application roots, each with a
/// base path and a list of routes.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub roots: Vec<RootDef>,
}

/// One application root.
#[derive(Debug, Clone, Deserialize)]
pub struct RootDef {
    /// Root name; partitions the registry and identifies the root in
    /// conflict reports.
    pub name: String,
    /// Base path prefixed to every route path of this root. May be a bare
    /// path (`/api`) or a full URL whose path component is used.
    #[serde(default)]
    pub base_path: String,
    pub routes: Vec<RouteDef>,
}

/// One route declaration under a root.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDef {
    /// Path template relative to the root's base path, e.g. `/pets/{id}`.
    pub path: String,
    /// HTTP method name, e.g. `GET`.
    pub method: String,
    /// Media types this route produces; empty means `*/*`.
    #[serde(default)]
    pub produces: Vec<MediaType>,
    /// Handler identifier resolved by the dispatcher.
    pub handler: String,
}

/// A problem found while assembling a registry from a manifest.
///
/// Issues are accumulated, not fatal: every valid route still registers,
/// and the caller decides whether issues fail the run (the lint binary
/// does with `--deny-conflicts`).
#[derive(Debug, Clone)]
pub struct ManifestIssue {
    /// Where the issue occurred, e.g. `GET /api/pets/{id}`.
    pub location: String,
    /// Machine-readable kind, e.g. `invalid_method`, `duplicate_registration`.
    pub kind: String,
    /// Human-readable description.
    pub message: String,
}

impl ManifestIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ManifestIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Print accumulated issues to stderr.
pub fn print_issues(issues: &[ManifestIssue]) {
    eprintln!("{} issue(s) found in route manifest:", issues.len());
    for issue in issues {
        eprintln!("[{}] {}: {}", issue.kind, issue.location, issue.message);
    }
}
