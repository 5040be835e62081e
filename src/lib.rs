//! # Routewarden
//!
//! **Routewarden** is a conflict-aware HTTP route registry and dispatcher.
//! Routes are registered once at startup under named application roots;
//! overlapping registrations (two applications claiming the same path, or
//! two handlers on one path) are deliberately accepted, recorded exactly
//! once as conflict groups, and resolved deterministically on every
//! request.
//!
//! ## Architecture
//!
//! - **[`template`]** - path template parsing, compiled matchers, overlap
//!   detection
//! - **[`media`]** - media type parsing and ranked wildcard-aware matching
//! - **[`registry`]** - the builder, the frozen registry, resolution, and
//!   conflict records
//! - **[`dispatcher`]** - handler-id to handler-function dispatch with
//!   panic recovery
//! - **[`manifest`]** - declarative YAML/JSON route manifests
//! - **[`cli`]** - the `routewarden-lint` command
//!
//! ## Design
//!
//! The registry follows a build-then-freeze pattern: registration is
//! single-threaded and happens before traffic, resolution takes `&self`
//! against immutable data and needs no locks. Overlap bookkeeping runs at
//! registration time, so ambiguity on the request path costs one linear
//! candidate scan and never re-logs: one warning per conflict group for
//! the lifetime of the registry, however many requests hit the ambiguous
//! path. Ambiguity is informational: an ambiguous request still resolves
//! to exactly one handler, picked by a three-stage tie-break (most literal
//! segments, best media match, earliest registration).
//!
//! ## Quick start
//!
//! ```
//! use http::Method;
//! use routewarden::{MediaType, RegistryBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let text: MediaType = "text/plain".parse()?;
//!
//! let mut builder = RegistryBuilder::new();
//! builder.register("store", "/pets/{id}", Method::GET, &[text.clone()], "get_pet")?;
//! let registry = builder.freeze();
//!
//! let result = registry.resolve("/pets/42", &Method::GET, &[text])?;
//! assert_eq!(result.route.handler_name, "get_pet");
//! assert_eq!(result.get_path_param("id"), Some("42"));
//! assert!(!result.ambiguous);
//! assert_eq!(registry.conflict_count(), 0);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod dispatcher;
pub mod ids;
pub mod manifest;
pub mod media;
pub mod registry;
pub mod runtime_config;
pub mod template;

pub use dispatcher::{DispatchError, Dispatcher, HandlerRequest, HandlerResponse};
pub use manifest::{build_registry, load_manifest, Manifest, ManifestIssue};
pub use media::{MatchQuality, MediaType, MediaTypeError};
pub use registry::{
    ConflictId, ConflictKind, ConflictRecord, MatchResult, RegistryBuilder, RegistryError,
    ResolveError, RouteRegistry, RouteTemplate,
};
pub use runtime_config::RegistryConfig;
pub use template::{ParamVec, PathTemplate, TemplateError};
