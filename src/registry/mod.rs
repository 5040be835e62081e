//! Route registry: registration, conflict bookkeeping, and resolution.
//!
//! ## Overview
//!
//! The registry is built once at startup through [`RegistryBuilder`] and
//! then frozen into an immutable [`RouteRegistry`] (build-then-freeze).
//! Registration rejects exact duplicates but deliberately accepts
//! overlapping routes: two applications mapping the same path, or two
//! handlers on one path, stay servable. Each connected group of overlaps
//! is recorded exactly once as a [`ConflictRecord`], with a single log
//! warning at discovery time, never one per request.
//!
//! ## Resolution
//!
//! [`RouteRegistry::resolve`] collects every route matching a request's
//! path, method, and accepted media types, then picks one deterministically:
//! most literal segments first, then exact media match over wildcard, then
//! earliest registration. The losing candidates ride along on the
//! [`MatchResult`] for diagnostics, and `ambiguous` is set whenever more
//! than one route matched.
//!
//! ## Example
//!
//! ```
//! use http::Method;
//! use routewarden::{MediaType, RegistryBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let text: MediaType = "text/plain".parse()?;
//! let mut builder = RegistryBuilder::new();
//! builder.register("app-one", "/a/b/c", Method::GET, &[text.clone()], "one")?;
//! builder.register("app-two", "/a/b/c", Method::GET, &[text.clone()], "two")?;
//! let registry = builder.freeze();
//!
//! // Both registrations are servable; the overlap is recorded once.
//! assert_eq!(registry.conflict_count(), 1);
//! let result = registry.resolve("/a/b/c", &Method::GET, &[text])?;
//! assert!(result.ambiguous);
//! assert_eq!(result.route.handler_name, "one");
//! # Ok(())
//! # }
//! ```

mod builder;
mod conflict;
mod core;

pub use builder::{RegistryBuilder, RegistryError};
pub use conflict::{ConflictEntry, ConflictId, ConflictKind, ConflictRecord, ConflictReport};
pub use core::{MatchResult, ResolveError, RouteRegistry, RouteTemplate};
