//! Route table model and the collaborator contracts the core consumes.
//!
//! A [`RouteDescriptor`] is one (URI, method, handler, middleware) entry of the
//! application's route table, supplied by the manifest layer. Validation rule
//! sets and handler source spans are looked up through the [`ValidationSource`]
//! and [`SourceSpanProvider`] traits, keyed by handler identity through an
//! explicit static mapping, never runtime reflection.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// HTTP methods understood by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP PATCH method
    Patch,
    /// HTTP DELETE method
    Delete,
    /// HTTP OPTIONS method
    Options,
    /// HTTP HEAD method
    Head,
}

impl HttpMethod {
    /// Parse a verb name case-insensitively. Returns `None` for unknown verbs.
    pub fn parse(verb: &str) -> Option<Self> {
        match verb.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "OPTIONS" => Some(HttpMethod::Options),
            "HEAD" => Some(HttpMethod::Head),
            _ => None,
        }
    }

    /// The uppercase verb, as used for the `_method` tunneling field.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// The lowercase verb, as used for document path-item keys.
    pub fn lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }
}

/// Identity of the handler behind a route: controller type plus action name.
///
/// This is the lookup key for validation declarations and source spans.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerRef {
    /// Controller type name, e.g. `UserController`
    pub controller: String,
    /// Action (method) name on the controller, e.g. `store`
    pub action: String,
}

impl HandlerRef {
    /// Create a new handler reference.
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
        }
    }

    /// The `Controller@action` form used as the operation id.
    pub fn id(&self) -> String {
        format!("{}@{}", self.controller, self.action)
    }
}

/// One route of the application's route table.
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    /// URI template, may contain `{name}` placeholders
    pub uri: String,
    /// The HTTP method of this route
    pub method: HttpMethod,
    /// Identity of the handling controller action
    pub handler: HandlerRef,
    /// Ordered middleware names bound to the route
    pub middleware: Vec<String>,
}

impl RouteDescriptor {
    /// Create a new route descriptor without middleware.
    pub fn new(uri: impl Into<String>, method: HttpMethod, handler: HandlerRef) -> Self {
        Self {
            uri: uri.into(),
            method,
            handler,
            middleware: Vec::new(),
        }
    }
}

/// A field's rule specification as written in the manifest: either one
/// `|`-joined string or an ordered list of entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// `"required|integer|min:1"`
    Joined(String),
    /// `["required", "integer", "min:1"]`
    List(Vec<RuleEntry>),
}

/// One entry of a list-form rule specification.
///
/// Non-string entries stand in for executable rule objects; they carry no
/// inferable schema information and are dropped by the tokenizer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RuleEntry {
    /// An atomic rule token
    Token(String),
    /// Anything else (executable-rule stand-in)
    Opaque(Value),
}

/// Mapping from field path to its rule specification, insertion-ordered.
pub type ValidationRuleSet = IndexMap<String, RuleSpec>;

/// The validation declaration of one handler: its rule set and an optional
/// example payload used for documentation.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationDescriptor {
    /// Field path -> rule specification
    pub rules: ValidationRuleSet,
    /// Example request payload, passed through verbatim
    #[serde(default)]
    pub example: Option<Value>,
}

/// Resolves the validation declaration bound to a handler, if any.
pub trait ValidationSource {
    /// Returns the handler's validation declaration, or `None` when the
    /// handler declares no validated input.
    fn resolve(&self, handler: &HandlerRef) -> Option<&ValidationDescriptor>;
}

/// Supplies the literal source text between a handler's declared start and
/// end lines.
pub trait SourceSpanProvider {
    /// Returns the handler's source span, or `None` when no span is declared
    /// or the source cannot be read.
    fn span(&self, handler: &HandlerRef) -> Option<String>;
}
