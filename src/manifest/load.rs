use anyhow::Context;
use http::Method;
use std::fs;
use std::path::Path;

use crate::registry::{RegistryBuilder, RegistryError, RouteRegistry};
use crate::runtime_config::RegistryConfig;

use super::types::{Manifest, ManifestIssue};

/// Load a route manifest from a YAML or JSON file, chosen by extension
/// (`.json` parses as JSON, everything else as YAML).
pub fn load_manifest(path: impl AsRef<Path>) -> anyhow::Result<Manifest> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read route manifest {}", path.display()))?;

    let manifest = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON manifest {}", path.display()))?,
        _ => serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse YAML manifest {}", path.display()))?,
    };

    Ok(manifest)
}

/// Assemble a frozen registry from a manifest.
///
/// Invalid entries (bad method names, broken templates, exact duplicates)
/// become [`ManifestIssue`]s; every valid route still registers, so one
/// bad line never takes the whole table down.
pub fn build_registry(
    manifest: &Manifest,
    config: RegistryConfig,
) -> (RouteRegistry, Vec<ManifestIssue>) {
    let mut builder = RegistryBuilder::with_config(config);
    let mut issues = Vec::new();

    for root in &manifest.roots {
        let base = normalize_base_path(&root.base_path);
        for route in &root.routes {
            let location = format!("{} {}{}", route.method, base, route.path);

            let method: Method = match route.method.parse() {
                Ok(m) => m,
                Err(_) => {
                    issues.push(ManifestIssue::new(
                        &location,
                        "invalid_method",
                        format!("'{}' is not an HTTP method", route.method),
                    ));
                    continue;
                }
            };

            let full_path = format!("{}{}", base, route.path);
            if let Err(err) = builder.register(
                &root.name,
                &full_path,
                method,
                &route.produces,
                &route.handler,
            ) {
                let kind = match &err {
                    RegistryError::DuplicateExactRegistration { .. } => "duplicate_registration",
                    RegistryError::Template(_) => "invalid_template",
                };
                issues.push(ManifestIssue::new(&location, kind, err.to_string()));
            }
        }
    }

    (builder.freeze(), issues)
}

/// Normalize a root's base path: accepts a bare path or a full URL, keeps
/// the path component, and drops a trailing slash so concatenation with
/// route paths never doubles separators.
fn normalize_base_path(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    url::Url::parse(raw)
        .or_else(|_| url::Url::parse(&format!("http://base/{}", raw.trim_start_matches('/'))))
        .map(|u| {
            let p = u.path().trim_end_matches('/');
            if p == "/" || p.is_empty() {
                String::new()
            } else {
                p.to_string()
            }
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_forms() {
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path("/api"), "/api");
        assert_eq!(normalize_base_path("/api/"), "/api");
        assert_eq!(normalize_base_path("api/v1"), "/api/v1");
        assert_eq!(normalize_base_path("http://example.com/api/v1/"), "/api/v1");
    }
}
