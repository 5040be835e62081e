//! Declarative route manifests.
//!
//! Instead of calling [`RegistryBuilder`](crate::RegistryBuilder) by hand,
//! an application can describe its roots and routes in a YAML or JSON
//! document and build the registry from that:
//!
//! ```yaml
//! roots:
//!   - name: app-one
//!     base_path: /
//!     routes:
//!       - path: /a/b/c
//!         method: GET
//!         produces: [text/plain]
//!         handler: resource_one
//! ```
//!
//! Problems in a manifest (unknown methods, broken templates, exact
//! duplicates) are accumulated as [`ManifestIssue`]s rather than aborting
//! the build, mirroring how overlap conflicts are recorded rather than
//! rejected.

mod load;
mod types;

pub use load::{build_registry, load_manifest};
pub use types::{print_issues, Manifest, ManifestIssue, RootDef, RouteDef};
