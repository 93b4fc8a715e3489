//! OpenAPI document model and final assembly.
//!
//! The model covers exactly the subset of OpenAPI 3.0 this generator emits:
//! info, one server entry, insertion-ordered paths keyed by URI then lowercase
//! method, and the single `bearerAuth` security scheme. All maps are
//! [`IndexMap`]s so that serializing the same inputs twice yields
//! byte-identical output.

use crate::schema::SchemaNode;
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use serde_json::Value;

/// OpenAPI Info object.
#[derive(Debug, Clone, Serialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// Documented API version
    pub version: String,
}

/// OpenAPI Server object.
#[derive(Debug, Clone, Serialize)]
pub struct Server {
    /// Base URL of the documented API
    pub url: String,
    /// Server description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI Parameter object (path or query).
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter location (`path` or `query`)
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter is required
    pub required: bool,
    /// Parameter schema
    pub schema: SchemaNode,
}

/// OpenAPI MediaType object.
#[derive(Debug, Clone, Serialize)]
pub struct MediaType {
    /// Schema for this media type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
    /// Example payload for this media type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

/// OpenAPI RequestBody object.
#[derive(Debug, Clone, Serialize)]
pub struct RequestBody {
    /// Content type -> media type
    pub content: IndexMap<String, MediaType>,
}

/// OpenAPI Response object.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Response description
    pub description: String,
    /// Response content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
}

/// One security requirement entry, e.g. `{bearerAuth: []}`.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// OpenAPI Operation object: everything documented for one route + method.
#[derive(Debug, Clone, Serialize)]
pub struct Operation {
    /// Grouping tags (the owning resource)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Human-readable summary
    pub summary: String,
    /// Unique operation id (`Controller@action`)
    #[serde(rename = "operationId")]
    pub operation_id: String,
    /// Path and query parameters
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body, when the route has one
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Status code (or pseudo-key) -> response
    pub responses: IndexMap<String, Response>,
    /// Security requirements, when the route is auth-protected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}

/// OpenAPI SecurityScheme object (the one `bearerAuth` scheme).
#[derive(Debug, Clone, Serialize)]
pub struct SecurityScheme {
    /// Scheme type, always `http`
    #[serde(rename = "type")]
    pub scheme_type: String,
    /// HTTP auth scheme, always `bearer`
    pub scheme: String,
    /// Bearer token format, always `JWT`
    #[serde(rename = "bearerFormat")]
    pub bearer_format: String,
}

/// OpenAPI Components object.
#[derive(Debug, Clone, Serialize)]
pub struct Components {
    /// Security scheme definitions
    #[serde(rename = "securitySchemes")]
    pub security_schemes: IndexMap<String, SecurityScheme>,
}

/// The complete OpenAPI document.
#[derive(Debug, Clone, Serialize)]
pub struct OpenApiDocument {
    /// OpenAPI version, always `3.0.0`
    pub openapi: String,
    /// API metadata
    pub info: Info,
    /// Server list (one entry)
    pub servers: Vec<Server>,
    /// URI -> lowercase method -> operation
    pub paths: IndexMap<String, IndexMap<String, Operation>>,
    /// Reusable components (security schemes)
    pub components: Components,
}

/// Folds built operations into the final document envelope.
pub struct DocumentAssembler {
    info: Info,
    server: Server,
    paths: IndexMap<String, IndexMap<String, Operation>>,
}

impl DocumentAssembler {
    /// Create an assembler with the document metadata and server base URL.
    pub fn new(title: String, version: String, base_url: String) -> Self {
        debug!("Initializing DocumentAssembler for {}", title);
        Self {
            info: Info { title, version },
            server: Server {
                url: base_url,
                description: Some("API server".to_string()),
            },
            paths: IndexMap::new(),
        }
    }

    /// Add one operation under the given URI and lowercase method key.
    ///
    /// A later write to the same (URI, method) slot overwrites the earlier
    /// one while keeping its position, so manifest order stays authoritative
    /// for output order.
    pub fn add_operation(&mut self, uri: &str, method_key: &str, operation: Operation) {
        debug!("Adding operation: {} {}", method_key, uri);
        self.paths
            .entry(uri.to_string())
            .or_default()
            .insert(method_key.to_string(), operation);
    }

    /// Build the final document.
    pub fn build(self) -> OpenApiDocument {
        debug!("Building final OpenAPI document");

        let mut security_schemes = IndexMap::new();
        security_schemes.insert(
            "bearerAuth".to_string(),
            SecurityScheme {
                scheme_type: "http".to_string(),
                scheme: "bearer".to_string(),
                bearer_format: "JWT".to_string(),
            },
        );

        OpenApiDocument {
            openapi: "3.0.0".to_string(),
            info: self.info,
            servers: vec![self.server],
            paths: self.paths,
            components: Components { security_schemes },
        }
    }
}

/// The one security requirement this generator attaches: `{bearerAuth: []}`.
pub fn bearer_requirement() -> Vec<SecurityRequirement> {
    let mut requirement = IndexMap::new();
    requirement.insert("bearerAuth".to_string(), Vec::new());
    vec![requirement]
}
