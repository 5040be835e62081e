use http::Method;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::media::{self, MediaType};
use crate::runtime_config::RegistryConfig;
use crate::template::{ParamVec, PathTemplate};

use super::conflict::{ConflictEntry, ConflictId, ConflictRecord, ConflictReport};

/// One registered route: an immutable (root, template, method, produces,
/// handler) tuple plus its registration index.
///
/// Shared as `Arc<RouteTemplate>` between the registry, match results, and
/// conflict reports; never mutated after registration.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
    /// Name of the application root that declared this route.
    pub root: String,
    /// Parsed path template.
    pub template: PathTemplate,
    /// HTTP method, matched exactly.
    pub method: Method,
    /// Media types this route produces. Never empty: a registration with no
    /// declared types is stored as `*/*`.
    pub produces: Vec<MediaType>,
    /// Opaque handler identifier, resolved by the dispatcher.
    pub handler_name: String,
    /// Global registration order, the final tie-break key.
    pub index: usize,
}

impl RouteTemplate {
    /// The normalized path pattern, e.g. `/pets/{id}`.
    #[must_use]
    pub fn path(&self) -> &str {
        self.template.pattern()
    }

    /// Human-readable descriptor used in logs and conflict reports.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{} {} -> {} ({})",
            self.method,
            self.path(),
            self.handler_name,
            self.root
        )
    }
}

/// Error returned by [`RouteRegistry::resolve`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    /// No registered route matches the request.
    #[error("no route found for {method} {path}")]
    NoRouteFound { method: Method, path: String },
}

/// Outcome of resolving one request against the registry.
///
/// Always carries exactly one chosen route. `ambiguous` is informational:
/// an ambiguous request still resolves and must still be served.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The route selected by the tie-break.
    pub route: Arc<RouteTemplate>,
    /// Path parameters extracted from the request path.
    pub path_params: ParamVec,
    /// True when more than one route matched this request.
    pub ambiguous: bool,
    /// The other matching routes, in tie-break order.
    pub also_matched: Vec<Arc<RouteTemplate>>,
    /// The conflict group covering the chosen route, when one was recorded
    /// at registration time. An ambiguous result can lack a record when the
    /// overlap only exists for this request's accepted types (e.g. two
    /// routes with disjoint produced types and a client accepting both).
    pub conflict: Option<ConflictId>,
}

impl MatchResult {
    /// Get a path parameter by name.
    ///
    /// Uses "last write wins" semantics: with duplicate parameter names at
    /// different depths (`/org/{id}/user/{id}`), the deepest occurrence is
    /// returned.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert path parameters to a `HashMap`. Allocates; prefer
    /// [`get_path_param`](Self::get_path_param) on hot paths.
    #[must_use]
    pub fn path_params_map(&self) -> std::collections::HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

struct Candidate {
    route: Arc<RouteTemplate>,
    params: ParamVec,
    quality: media::MatchQuality,
}

/// Frozen, insertion-ordered route registry.
///
/// Built by [`RegistryBuilder`](super::RegistryBuilder) during the
/// single-threaded startup phase and immutable afterwards: `resolve()`
/// takes `&self`, performs no locking and no interior mutability, and is
/// safe for unbounded concurrent callers.
pub struct RouteRegistry {
    routes: Vec<Arc<RouteTemplate>>,
    by_root: BTreeMap<String, Vec<usize>>,
    conflicts: Vec<ConflictRecord>,
    config: RegistryConfig,
}

impl RouteRegistry {
    pub(crate) fn new(
        routes: Vec<Arc<RouteTemplate>>,
        conflicts: Vec<ConflictRecord>,
        config: RegistryConfig,
    ) -> Self {
        let mut by_root: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for route in &routes {
            by_root
                .entry(route.root.clone())
                .or_default()
                .push(route.index);
        }

        info!(
            routes_count = routes.len(),
            roots_count = by_root.len(),
            conflicts_count = conflicts.len(),
            "route registry frozen"
        );

        RouteRegistry {
            routes,
            by_root,
            conflicts,
            config,
        }
    }

    /// All routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Arc<RouteTemplate>] {
        &self.routes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Names of the application roots with at least one route, sorted.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.by_root.keys().map(String::as_str)
    }

    /// Routes declared under one root, in registration order.
    #[must_use]
    pub fn routes_for_root(&self, root: &str) -> Vec<&Arc<RouteTemplate>> {
        self.by_root
            .get(root)
            .map(|indices| indices.iter().map(|&i| &self.routes[i]).collect())
            .unwrap_or_default()
    }

    /// Resolve a request to exactly one route.
    ///
    /// Candidates are the routes whose template matches `path`, whose
    /// method equals `method`, and whose produced media types intersect
    /// `accepted` (empty `accepted` behaves as `*/*`). Tie-break, in order:
    ///
    /// 1. most literal path segments,
    /// 2. best media match quality (exact beats wildcard),
    /// 3. earliest registration.
    ///
    /// More than one candidate marks the result ambiguous but never fails
    /// it; an empty candidate set is [`ResolveError::NoRouteFound`].
    pub fn resolve(
        &self,
        path: &str,
        method: &Method,
        accepted: &[MediaType],
    ) -> Result<MatchResult, ResolveError> {
        let path = self.normalize_path(path);

        debug!(method = %method, path = %path, "route match attempt");

        let mut candidates: Vec<Candidate> = Vec::new();
        for route in &self.routes {
            if route.method != *method {
                continue;
            }
            let Some(params) = route.template.capture(&path) else {
                continue;
            };
            let Some(quality) = media::best_quality(&route.produces, accepted) else {
                continue;
            };
            candidates.push(Candidate {
                route: Arc::clone(route),
                params,
                quality,
            });
        }

        if candidates.is_empty() {
            warn!(method = %method, path = %path, "no route matched");
            return Err(ResolveError::NoRouteFound {
                method: method.clone(),
                path: path.into_owned(),
            });
        }

        candidates.sort_by(|a, b| {
            b.route
                .template
                .static_segments()
                .cmp(&a.route.template.static_segments())
                .then_with(|| b.quality.cmp(&a.quality))
                .then_with(|| a.route.index.cmp(&b.route.index))
        });

        let ambiguous = candidates.len() > 1;
        let mut iter = candidates.into_iter();
        #[allow(clippy::expect_used)]
        let chosen = iter.next().expect("candidate set checked non-empty");
        let also_matched: Vec<Arc<RouteTemplate>> = iter.map(|c| c.route).collect();

        let conflict = self
            .conflicts
            .iter()
            .find(|c| c.contains(chosen.route.index))
            .map(ConflictRecord::id);

        if ambiguous {
            debug!(
                method = %method,
                path = %path,
                handler = %chosen.route.handler_name,
                other_matches = also_matched.len(),
                conflict = ?conflict,
                "ambiguous route resolved deterministically"
            );
        } else {
            debug!(
                method = %method,
                path = %path,
                handler = %chosen.route.handler_name,
                route_pattern = %chosen.route.path(),
                "route matched"
            );
        }

        Ok(MatchResult {
            route: chosen.route,
            path_params: chosen.params,
            ambiguous,
            also_matched,
            conflict,
        })
    }

    fn normalize_path<'a>(&self, path: &'a str) -> Cow<'a, str> {
        if self.config.strict_slash {
            return Cow::Borrowed(path);
        }
        let trimmed = path.trim_end_matches('/');
        if trimmed.len() == path.len() {
            Cow::Borrowed(path)
        } else if trimmed.is_empty() {
            Cow::Borrowed("/")
        } else {
            Cow::Borrowed(&path[..trimmed.len()])
        }
    }

    /// Number of conflict groups recorded during registration.
    #[must_use]
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    /// All conflict groups, in discovery order.
    #[must_use]
    pub fn conflicts(&self) -> &[ConflictRecord] {
        &self.conflicts
    }

    /// Look up a conflict group by id.
    #[must_use]
    pub fn conflict(&self, id: ConflictId) -> Option<&ConflictRecord> {
        self.conflicts.iter().find(|c| c.id() == id)
    }

    /// Logical warning count for one conflict group: exactly one per live
    /// record for the registry's lifetime, never incremented per request.
    #[must_use]
    pub fn warning_count_for(&self, id: ConflictId) -> usize {
        usize::from(self.conflicts.iter().any(|c| c.id() == id))
    }

    /// Build a serializable summary of every conflict group.
    #[must_use]
    pub fn conflict_report(&self) -> ConflictReport {
        let conflicts = self
            .conflicts
            .iter()
            .map(|record| ConflictEntry {
                id: record.id().value(),
                kind: record.kind(),
                routes: record
                    .members()
                    .map(|i| self.routes[i].describe())
                    .collect(),
            })
            .collect::<Vec<_>>();
        ConflictReport {
            total: conflicts.len(),
            conflicts,
        }
    }

    /// Print all registered routes to stdout. Debugging aid.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for route in &self.routes {
            println!("[route] {}", route.describe());
        }
    }
}
