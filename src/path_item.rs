//! Per-route operation assembly.
//!
//! For every (route, method) pair the builder compiles the validation rule
//! set (when one is bound), infers response codes from the handler source
//! span, derives tag and summary from the controller/action names, and
//! applies the framework conventions: integer-typed path parameters, PUT and
//! PATCH tunneled through POST with a `_method` override field, GET bodies
//! converted to query parameters, and a bearer-auth requirement on
//! auth-protected routes.

use crate::document::{bearer_requirement, MediaType, Operation, Parameter, RequestBody};
use crate::responses;
use crate::routes::{
    HttpMethod, RouteDescriptor, SourceSpanProvider, ValidationSource,
};
use crate::rules::{self, CompiledRequest, MULTIPART_FORM_DATA};
use crate::schema::{ObjectSchema, PrimitiveSchema, SchemaNode, SchemaType};
use indexmap::IndexMap;
use log::debug;

/// Middleware marker identifying auth-protected routes.
const AUTH_MARKER: &str = "auth";

/// The synthetic field carrying the tunneled verb.
const METHOD_FIELD: &str = "_method";

/// One built operation, ready for the assembler.
#[derive(Debug, Clone)]
pub struct BuiltOperation {
    /// Lowercase method key in the document (`put`/`patch` become `post`)
    pub method_key: &'static str,
    /// The assembled operation
    pub operation: Operation,
}

/// Builds one OpenAPI operation per route, consulting the validation and
/// source-span collaborators.
pub struct PathItemBuilder<'a> {
    validation: &'a dyn ValidationSource,
    sources: &'a dyn SourceSpanProvider,
}

impl<'a> PathItemBuilder<'a> {
    /// Create a builder over the given collaborators.
    pub fn new(validation: &'a dyn ValidationSource, sources: &'a dyn SourceSpanProvider) -> Self {
        Self { validation, sources }
    }

    /// Build the operation for one route.
    pub fn build(&self, route: &RouteDescriptor) -> BuiltOperation {
        debug!("Building operation: {} {}", route.method.as_str(), route.uri);

        let descriptor = self.validation.resolve(&route.handler);
        let compiled = descriptor.map(rules::compile);

        let span = self.sources.span(&route.handler);
        let codes = responses::infer_status_codes(span.as_deref(), descriptor.is_some());
        let responses =
            responses::build_responses(&codes, descriptor.and_then(|d| d.example.as_ref()));

        let mut parameters = path_parameters(&route.uri);
        let mut request_body = None;

        let method_key = match route.method {
            HttpMethod::Put | HttpMethod::Patch => "post",
            method => method.lower(),
        };

        match route.method {
            HttpMethod::Get => {
                // GET carries no body: compiled top-level properties become
                // query parameters instead
                if let Some(compiled) = &compiled {
                    parameters.extend(query_parameters(compiled));
                }
            }
            HttpMethod::Put | HttpMethod::Patch => {
                request_body = Some(to_request_body(tunneled_request(compiled, route.method)));
            }
            _ => {
                if let Some(compiled) = compiled {
                    request_body = Some(to_request_body(compiled));
                }
            }
        }

        let resource = resource_name(&route.handler.controller);
        let security = if is_auth_protected(&route.middleware) {
            Some(bearer_requirement())
        } else {
            None
        };

        BuiltOperation {
            method_key,
            operation: Operation {
                tags: vec![tag_name(&resource)],
                summary: summarize(&resource, &route.handler.action),
                operation_id: route.handler.id(),
                parameters,
                request_body,
                responses,
                security,
            },
        }
    }
}

/// Every `{name}` placeholder becomes a required integer path parameter.
/// The URI alone carries no type information, so integer keys are a fixed
/// assumption.
fn path_parameters(uri: &str) -> Vec<Parameter> {
    uri.split('/')
        .filter_map(|part| {
            let name = part.strip_prefix('{')?.strip_suffix('}')?;
            Some(Parameter {
                name: name.to_string(),
                location: "path".to_string(),
                required: true,
                schema: SchemaNode::primitive(SchemaType::Integer),
            })
        })
        .collect()
}

/// Convert the compiled top-level properties into query parameters.
fn query_parameters(compiled: &CompiledRequest) -> Vec<Parameter> {
    let Some(object) = compiled.schema.as_object() else {
        return Vec::new();
    };

    object
        .properties
        .iter()
        .map(|(name, schema)| Parameter {
            name: name.clone(),
            location: "query".to_string(),
            required: object.required.contains(name),
            schema: schema.clone(),
        })
        .collect()
}

/// Merge the synthetic `_method` override field into the request of a
/// tunneled PUT/PATCH route. Without a validation declaration the override
/// field stands alone as a multipart schema.
fn tunneled_request(compiled: Option<CompiledRequest>, method: HttpMethod) -> CompiledRequest {
    let verb = method.as_str();

    match compiled {
        Some(mut compiled) => {
            if let Some(object) = compiled.schema.as_object_mut() {
                object
                    .properties
                    .insert(METHOD_FIELD.to_string(), method_field(verb));
                if !object.required.iter().any(|name| name == METHOD_FIELD) {
                    object.required.push(METHOD_FIELD.to_string());
                }
            }
            compiled
        }
        None => {
            let mut properties = IndexMap::new();
            properties.insert(METHOD_FIELD.to_string(), method_field(verb));
            CompiledRequest {
                content_type: MULTIPART_FORM_DATA,
                schema: SchemaNode::Object(ObjectSchema {
                    schema_type: SchemaType::Object,
                    properties,
                    required: vec![METHOD_FIELD.to_string()],
                }),
                example: None,
            }
        }
    }
}

fn method_field(verb: &str) -> SchemaNode {
    SchemaNode::Primitive(PrimitiveSchema {
        schema_type: SchemaType::String,
        nullable: None,
        enum_values: Some(vec![serde_json::Value::String(verb.to_string())]),
        minimum: None,
        maximum: None,
        min_length: None,
        max_length: None,
    })
}

fn to_request_body(compiled: CompiledRequest) -> RequestBody {
    let mut content = IndexMap::new();
    content.insert(
        compiled.content_type.to_string(),
        MediaType {
            schema: Some(compiled.schema),
            example: compiled.example,
        },
    );
    RequestBody { content }
}

fn is_auth_protected(middleware: &[String]) -> bool {
    middleware
        .iter()
        .any(|name| name.to_lowercase().contains(AUTH_MARKER))
}

/// The lowercase singular resource name behind a controller: the type name
/// minus its `Controller` suffix, camel-case split into words
/// (`OrderItemController` -> `order item`).
fn resource_name(controller: &str) -> String {
    let base = controller.strip_suffix("Controller").unwrap_or(controller);

    let mut words = String::new();
    for (index, ch) in base.chars().enumerate() {
        if ch.is_uppercase() && index > 0 {
            words.push(' ');
        }
        words.extend(ch.to_lowercase());
    }

    if words.is_empty() {
        "resource".to_string()
    } else {
        words
    }
}

/// The grouping tag: the pluralized resource as a title (`order items` ->
/// `Order items`).
fn tag_name(resource: &str) -> String {
    title_case(&pluralize(resource))
}

/// Map the conventional action names onto the resource; the resource is
/// pluralized specifically for `index`. Unconventional action names fall
/// back to `<Action> <resource>`.
fn summarize(resource: &str, action: &str) -> String {
    match action {
        "index" => title_case(&format!("list of {}", pluralize(resource))),
        "show" => title_case(&format!("get {}", resource)),
        "store" => title_case(&format!("create {}", resource)),
        "update" => title_case(&format!("update {}", resource)),
        "destroy" => title_case(&format!("delete {}", resource)),
        other => title_case(&format!("{} {}", other, resource)),
    }
}

/// Naive English pluralization of the last word: `y` -> `ies`,
/// sibilant endings -> `es`, everything else -> `s`.
fn pluralize(resource: &str) -> String {
    let (head, word) = match resource.rsplit_once(' ') {
        Some((head, word)) => (Some(head), word),
        None => (None, resource),
    };

    let plural = if let Some(stem) = word.strip_suffix('y') {
        if stem.ends_with(|c: char| "aeiou".contains(c)) {
            format!("{}s", word)
        } else {
            format!("{}ies", stem)
        }
    } else if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        format!("{}es", word)
    } else {
        format!("{}s", word)
    };

    match head {
        Some(head) => format!("{} {}", head, plural),
        None => plural,
    }
}

fn title_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
