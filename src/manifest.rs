//! Route manifest loading.
//!
//! The manifest is the application's statement of its own route table: a YAML
//! or JSON file declaring every route's URI, verb(s), handling controller
//! action, middleware, validation rules and handler source position. Loading
//! it yields an explicit static mapping from handler identity to metadata;
//! nothing is discovered by reflection at generation time.
//!
//! The loader also performs the upstream filtering the core relies on: only
//! user-facing API routes (matched by URI prefix) survive, `HEAD` and
//! `OPTIONS` verbs are dropped, and unknown verbs are skipped with a warning
//! instead of failing the run.

use crate::error::{Error, Result};
use crate::routes::{
    HandlerRef, HttpMethod, RouteDescriptor, SourceSpanProvider, ValidationDescriptor,
    ValidationSource,
};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The deserialized route manifest file.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    /// Document title
    #[serde(default = "default_title")]
    pub title: String,
    /// Documented API version
    #[serde(default = "default_version")]
    pub version: String,
    /// Server base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Declared routes
    #[serde(default)]
    pub routes: Vec<RouteDecl>,
}

/// One declared route entry.
#[derive(Debug, Deserialize)]
pub struct RouteDecl {
    /// URI template, may contain `{name}` placeholders
    pub uri: String,
    /// Verb or `|`-joined verb list (`GET|HEAD`), case-insensitive
    pub method: String,
    /// Handling controller type name
    pub controller: String,
    /// Handling action name
    pub action: String,
    /// Ordered middleware names
    #[serde(default)]
    pub middleware: Vec<String>,
    /// Validation declaration bound to the handler
    #[serde(default)]
    pub validation: Option<ValidationDescriptor>,
    /// Source position of the handler body
    #[serde(default)]
    pub source: Option<SourceSpan>,
}

/// Declared source position of one handler body.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpan {
    /// Source file, absolute or relative to the sources root
    pub file: PathBuf,
    /// First line of the handler body (1-based, inclusive)
    pub start_line: usize,
    /// Last line of the handler body (1-based, inclusive)
    pub end_line: usize,
}

/// Load a manifest from a YAML (default) or JSON (`.json` extension) file.
pub fn load(path: &Path) -> Result<Manifest> {
    debug!("Loading route manifest: {}", path.display());

    let content = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let manifest = if is_json {
        serde_json::from_str(&content).map_err(|e| Error::ManifestError {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|e| Error::ManifestError {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    Ok(manifest)
}

/// The route table and handler-keyed lookups built from a loaded manifest.
///
/// Implements the collaborator contracts the core consumes: the filtered
/// route list, validation resolution and file-backed source spans.
pub struct RouteRegistry {
    routes: Vec<RouteDescriptor>,
    validations: HashMap<HandlerRef, ValidationDescriptor>,
    spans: HashMap<HandlerRef, SourceSpan>,
    sources_root: PathBuf,
}

impl RouteRegistry {
    /// Build the registry from a manifest.
    ///
    /// Routes whose URI does not start with `api_prefix` are excluded (an
    /// empty prefix keeps everything). Relative source files are resolved
    /// against `sources_root`.
    pub fn from_manifest(manifest: &Manifest, api_prefix: &str, sources_root: &Path) -> Self {
        let mut routes = Vec::new();
        let mut validations = HashMap::new();
        let mut spans = HashMap::new();

        for decl in &manifest.routes {
            if !is_api_route(&decl.uri, api_prefix) {
                debug!("Skipping non-API route: {}", decl.uri);
                continue;
            }

            let handler = HandlerRef::new(decl.controller.clone(), decl.action.clone());

            let mut kept_any = false;
            for verb in decl.method.split('|') {
                match HttpMethod::parse(verb) {
                    Some(HttpMethod::Head) | Some(HttpMethod::Options) => {
                        debug!("Dropping {} entry for {}", verb.trim(), decl.uri);
                    }
                    Some(method) => {
                        routes.push(RouteDescriptor {
                            uri: decl.uri.clone(),
                            method,
                            handler: handler.clone(),
                            middleware: decl.middleware.clone(),
                        });
                        kept_any = true;
                    }
                    None => {
                        warn!("Skipping unknown HTTP verb {:?} on {}", verb.trim(), decl.uri);
                    }
                }
            }

            if !kept_any {
                continue;
            }

            if let Some(validation) = &decl.validation {
                validations.insert(handler.clone(), validation.clone());
            }
            if let Some(span) = &decl.source {
                spans.insert(handler.clone(), span.clone());
            }
        }

        debug!("Registry holds {} routes", routes.len());

        Self {
            routes,
            validations,
            spans,
            sources_root: sources_root.to_path_buf(),
        }
    }

    /// The filtered, ordered route table.
    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }
}

impl ValidationSource for RouteRegistry {
    fn resolve(&self, handler: &HandlerRef) -> Option<&ValidationDescriptor> {
        self.validations.get(handler)
    }
}

impl SourceSpanProvider for RouteRegistry {
    /// Read the declared line range out of the handler's source file.
    ///
    /// A missing or unreadable file degrades to `None` with a warning; the
    /// generation run keeps going on the remaining evidence.
    fn span(&self, handler: &HandlerRef) -> Option<String> {
        let span = self.spans.get(handler)?;

        let path = if span.file.is_absolute() {
            span.file.clone()
        } else {
            self.sources_root.join(&span.file)
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Cannot read handler source {}: {}", path.display(), e);
                return None;
            }
        };

        let start = span.start_line.max(1);
        if span.end_line < start {
            warn!(
                "Empty source span for {} ({}..{})",
                handler.id(),
                span.start_line,
                span.end_line
            );
            return None;
        }

        let lines: Vec<&str> = content
            .lines()
            .skip(start - 1)
            .take(span.end_line - start + 1)
            .collect();

        Some(lines.join("\n"))
    }
}

fn is_api_route(uri: &str, api_prefix: &str) -> bool {
    if api_prefix.is_empty() {
        return true;
    }
    uri.trim_start_matches('/').starts_with(api_prefix)
}

fn default_title() -> String {
    "API Documentation".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_base_url() -> String {
    "http://localhost".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const MANIFEST_YAML: &str = r#"
title: Shop API
version: 2.1.0
base_url: https://shop.example.com
routes:
  - uri: /api/orders
    method: GET|HEAD
    controller: OrderController
    action: index
    middleware: [api, auth:api]
  - uri: /api/orders
    method: POST
    controller: OrderController
    action: store
    validation:
      rules:
        total: required|numeric
  - uri: /internal/metrics
    method: GET
    controller: MetricsController
    action: index
"#;

    fn write_manifest(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_yaml_manifest() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "routes.yaml", MANIFEST_YAML);

        let manifest = load(&path).unwrap();

        assert_eq!(manifest.title, "Shop API");
        assert_eq!(manifest.version, "2.1.0");
        assert_eq!(manifest.base_url, "https://shop.example.com");
        assert_eq!(manifest.routes.len(), 3);
    }

    #[test]
    fn test_load_json_manifest() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            "routes.json",
            r#"{"routes": [{"uri": "/api/ping", "method": "GET", "controller": "PingController", "action": "show"}]}"#,
        );

        let manifest = load(&path).unwrap();

        // Metadata falls back to defaults
        assert_eq!(manifest.title, "API Documentation");
        assert_eq!(manifest.version, "1.0.0");
        assert_eq!(manifest.routes.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = load(Path::new("/nonexistent/routes.yaml"));
        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn test_load_malformed_yaml_is_manifest_error() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "routes.yaml", "routes: [uri: {");

        let result = load(&path);
        assert!(matches!(result, Err(Error::ManifestError { .. })));
    }

    #[test]
    fn test_registry_filters_non_api_routes() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "routes.yaml", MANIFEST_YAML);
        let manifest = load(&path).unwrap();

        let registry = RouteRegistry::from_manifest(&manifest, "api", dir.path());

        assert!(registry
            .routes()
            .iter()
            .all(|route| route.uri.starts_with("/api")));
    }

    #[test]
    fn test_registry_drops_head_from_method_list() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "routes.yaml", MANIFEST_YAML);
        let manifest = load(&path).unwrap();

        let registry = RouteRegistry::from_manifest(&manifest, "api", dir.path());

        let order_routes: Vec<_> = registry
            .routes()
            .iter()
            .filter(|route| route.uri == "/api/orders")
            .collect();
        assert_eq!(order_routes.len(), 2);
        assert_eq!(order_routes[0].method, HttpMethod::Get);
        assert_eq!(order_routes[1].method, HttpMethod::Post);
    }

    #[test]
    fn test_registry_skips_unknown_verbs() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            "routes.yaml",
            r#"
routes:
  - uri: /api/ping
    method: TRACE|GET
    controller: PingController
    action: show
"#,
        );
        let manifest = load(&path).unwrap();

        let registry = RouteRegistry::from_manifest(&manifest, "api", dir.path());

        assert_eq!(registry.routes().len(), 1);
        assert_eq!(registry.routes()[0].method, HttpMethod::Get);
    }

    #[test]
    fn test_empty_prefix_keeps_everything() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "routes.yaml", MANIFEST_YAML);
        let manifest = load(&path).unwrap();

        let registry = RouteRegistry::from_manifest(&manifest, "", dir.path());

        assert_eq!(registry.routes().len(), 3);
    }

    #[test]
    fn test_validation_resolution_by_handler_identity() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "routes.yaml", MANIFEST_YAML);
        let manifest = load(&path).unwrap();
        let registry = RouteRegistry::from_manifest(&manifest, "api", dir.path());

        let bound = HandlerRef::new("OrderController", "store");
        let descriptor = registry.resolve(&bound).unwrap();
        assert!(descriptor.rules.contains_key("total"));

        let unbound = HandlerRef::new("OrderController", "index");
        assert!(registry.resolve(&unbound).is_none());
    }

    #[test]
    fn test_span_reads_declared_line_range() {
        let dir = TempDir::new().unwrap();
        let source = "line one\nline two\nline three\nline four\n";
        fs::write(dir.path().join("orders.src"), source).unwrap();

        let path = write_manifest(
            &dir,
            "routes.yaml",
            r#"
routes:
  - uri: /api/orders
    method: GET
    controller: OrderController
    action: index
    source:
      file: orders.src
      start_line: 2
      end_line: 3
"#,
        );
        let manifest = load(&path).unwrap();
        let registry = RouteRegistry::from_manifest(&manifest, "api", dir.path());

        let span = registry
            .span(&HandlerRef::new("OrderController", "index"))
            .unwrap();
        assert_eq!(span, "line two\nline three");
    }

    #[test]
    fn test_span_degrades_on_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            "routes.yaml",
            r#"
routes:
  - uri: /api/orders
    method: GET
    controller: OrderController
    action: index
    source:
      file: missing.src
      start_line: 1
      end_line: 5
"#,
        );
        let manifest = load(&path).unwrap();
        let registry = RouteRegistry::from_manifest(&manifest, "api", dir.path());

        assert!(registry
            .span(&HandlerRef::new("OrderController", "index"))
            .is_none());
    }

    #[test]
    fn test_span_none_without_declaration() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "routes.yaml", MANIFEST_YAML);
        let manifest = load(&path).unwrap();
        let registry = RouteRegistry::from_manifest(&manifest, "api", dir.path());

        assert!(registry
            .span(&HandlerRef::new("OrderController", "index"))
            .is_none());
    }
}
