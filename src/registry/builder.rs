use http::Method;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::media::{self, MediaType};
use crate::runtime_config::RegistryConfig;
use crate::template::{PathTemplate, TemplateError};

use super::conflict::{ConflictId, ConflictRecord};
use super::core::{RouteRegistry, RouteTemplate};

/// Error returned by [`RegistryBuilder::register`].
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The identical (root, path, method, produces, handler) tuple was
    /// already registered. Distinct from an ambiguous overlap, which is
    /// permitted and recorded instead.
    #[error("duplicate registration: {method} {path} -> {handler} already registered under root '{root}'")]
    DuplicateExactRegistration {
        root: String,
        path: String,
        method: Method,
        handler: String,
    },

    /// The path template failed to parse.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Builder for a [`RouteRegistry`]. Registration happens once, at startup,
/// single-threaded; [`freeze`](Self::freeze) produces the immutable
/// registry served to request traffic.
///
/// Overlap bookkeeping runs at registration time: each new route is checked
/// against every existing route (any root), and overlapping groups are
/// recorded as [`ConflictRecord`]s: at most one record per connected group,
/// with exactly one warning logged when a group is first discovered.
pub struct RegistryBuilder {
    config: RegistryConfig,
    routes: Vec<Arc<RouteTemplate>>,
    conflicts: Vec<ConflictRecord>,
    next_conflict_id: u32,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Create a builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a builder with explicit configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        RegistryBuilder {
            config,
            routes: Vec::new(),
            conflicts: Vec::new(),
            next_conflict_id: 0,
        }
    }

    /// Number of routes registered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Number of conflict groups discovered so far.
    #[must_use]
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    /// Register one route.
    ///
    /// An empty `produces` list is stored as `*/*`. Fails only on an exact
    /// duplicate (all five fields equal) or an unparsable template; an
    /// overlap with existing routes is recorded and flagged, never
    /// rejected, since ambiguous routes must remain servable.
    pub fn register(
        &mut self,
        root: &str,
        path: &str,
        method: Method,
        produces: &[MediaType],
        handler: &str,
    ) -> Result<(), RegistryError> {
        let template = PathTemplate::parse(path, self.config.strict_slash)?;

        let produces: Vec<MediaType> = if produces.is_empty() {
            vec![MediaType::wildcard()]
        } else {
            produces.to_vec()
        };

        if self.routes.iter().any(|r| {
            r.root == root
                && r.method == method
                && r.template.pattern() == template.pattern()
                && same_media_set(&r.produces, &produces)
                && r.handler_name == handler
        }) {
            return Err(RegistryError::DuplicateExactRegistration {
                root: root.to_string(),
                path: template.pattern().to_string(),
                method,
                handler: handler.to_string(),
            });
        }

        let index = self.routes.len();
        let route = Arc::new(RouteTemplate {
            root: root.to_string(),
            template,
            method,
            produces,
            handler_name: handler.to_string(),
            index,
        });

        let overlapping: Vec<usize> = self
            .routes
            .iter()
            .filter(|r| {
                r.method == route.method
                    && r.template.overlaps(&route.template)
                    && media::sets_intersect(&r.produces, &route.produces)
            })
            .map(|r| r.index)
            .collect();

        if !overlapping.is_empty() {
            self.record_overlap(&route, &overlapping);
        }

        debug!(
            root = %route.root,
            method = %route.method,
            path = %route.path(),
            handler = %route.handler_name,
            total_routes = index + 1,
            "route registered"
        );

        self.routes.push(route);
        Ok(())
    }

    /// Fold the new route and everything it overlaps into one conflict
    /// group. Touching members of previously separate groups merges them;
    /// the merged record keeps the oldest id, so the logical warning count
    /// never grows from a merge.
    fn record_overlap(&mut self, route: &Arc<RouteTemplate>, overlapping: &[usize]) {
        let touched: Vec<usize> = self
            .conflicts
            .iter()
            .enumerate()
            .filter(|(_, c)| overlapping.iter().any(|&i| c.contains(i)))
            .map(|(pos, _)| pos)
            .collect();

        if touched.is_empty() {
            let id = ConflictId(self.next_conflict_id);
            self.next_conflict_id += 1;

            let members: Vec<usize> = overlapping
                .iter()
                .copied()
                .chain(std::iter::once(route.index))
                .collect();
            let roots: Vec<String> = members
                .iter()
                .map(|&i| {
                    if i == route.index {
                        route.root.clone()
                    } else {
                        self.routes[i].root.clone()
                    }
                })
                .collect();
            let record = ConflictRecord::new(id, members, roots);

            if id.value() < self.config.max_conflicts_logged as u32 {
                warn!(
                    conflict = %id,
                    kind = %record.kind(),
                    method = %route.method,
                    path = %route.path(),
                    handler = %route.handler_name,
                    overlaps = overlapping.len(),
                    "overlapping route registrations detected"
                );
            } else {
                debug!(
                    conflict = %id,
                    method = %route.method,
                    path = %route.path(),
                    "overlapping route registrations detected (log cap reached)"
                );
            }

            self.conflicts.push(record);
            return;
        }

        // Extend the oldest touched record; absorb any others it bridges.
        let first = touched[0];
        for &pos in touched[1..].iter().rev() {
            let absorbed = self.conflicts.remove(pos);
            debug!(
                kept = %self.conflicts[first].id(),
                absorbed = %absorbed.id(),
                "conflict groups merged"
            );
            self.conflicts[first].absorb(absorbed);
        }
        for &i in overlapping {
            let root = self.routes[i].root.clone();
            self.conflicts[first].add_member(i, &root);
        }
        self.conflicts[first].add_member(route.index, &route.root);
        debug!(
            conflict = %self.conflicts[first].id(),
            member = %route.describe(),
            "route added to existing conflict group"
        );
    }

    /// Freeze the builder into an immutable registry.
    #[must_use]
    pub fn freeze(self) -> RouteRegistry {
        RouteRegistry::new(self.routes, self.conflicts, self.config)
    }
}

fn same_media_set(a: &[MediaType], b: &[MediaType]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut left: Vec<String> = a.iter().map(MediaType::to_string).collect();
    let mut right: Vec<String> = b.iter().map(MediaType::to_string).collect();
    left.sort();
    right.sort();
    left == right
}
