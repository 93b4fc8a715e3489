//! Rule-set compilation into a request-body schema.
//!
//! This module turns one handler's declarative validation rule set into a
//! JSON-Schema-shaped tree: every field is tokenized, its type inferred, its
//! constraints extracted, and the resulting leaf merged into a shared property
//! tree by field path. Compilation is total: unrecognized or contradictory
//! rules degrade to permissive defaults instead of failing, because an
//! incomplete schema beats an aborted documentation run.

pub mod inference;
pub mod paths;
pub mod tokenizer;

use crate::routes::ValidationDescriptor;
use crate::schema::{ObjectSchema, SchemaNode, SchemaType};
use self::paths::FieldPath;
use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

/// Request content type for rule sets with at least one file field.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
/// Request content type for plain rule sets.
pub const APPLICATION_JSON: &str = "application/json";

/// The compiled request body of one validated route.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRequest {
    /// `multipart/form-data` when any field is a file upload, otherwise
    /// `application/json`
    pub content_type: &'static str,
    /// The root object schema of the request body
    pub schema: SchemaNode,
    /// Example payload passed through from the validation declaration
    pub example: Option<Value>,
}

/// Compile a validation declaration into a request-body schema.
///
/// Field iteration follows the declaration's insertion order, so identical
/// inputs always produce an identical schema. Only single-segment field paths
/// contribute to the root `required` list, matching the framework's flat
/// required semantics.
pub fn compile(descriptor: &ValidationDescriptor) -> CompiledRequest {
    debug!("Compiling rule set with {} fields", descriptor.rules.len());

    let mut properties = IndexMap::new();
    let mut required = Vec::new();
    let mut has_file = false;

    for (raw_path, spec) in &descriptor.rules {
        let tokens = tokenizer::tokenize(spec);
        let schema_type = inference::infer_type(&tokens);
        let constraints = inference::extract_constraints(&tokens, schema_type);

        if schema_type == SchemaType::File {
            has_file = true;
        }

        let path = FieldPath::parse(raw_path);
        if constraints.required && path.is_top_level() {
            required.push(raw_path.clone());
        }

        let leaf = inference::build_leaf(schema_type, &constraints);
        paths::insert(&mut properties, &path, leaf);
    }

    CompiledRequest {
        content_type: if has_file {
            MULTIPART_FORM_DATA
        } else {
            APPLICATION_JSON
        },
        schema: SchemaNode::Object(ObjectSchema {
            schema_type: SchemaType::Object,
            properties,
            required,
        }),
        example: descriptor.example.clone(),
    }
}
