//! Type inference and constraint extraction over rule tokens.

use crate::rules::tokenizer::RuleToken;
use crate::schema::{PrimitiveSchema, SchemaNode, SchemaType};
use serde_json::{Number, Value};

/// Infer the schema type of a field from its rule tokens.
///
/// The priority is fixed: mime-constrained fields (`mimes`, `mimetypes`,
/// `file`, `image`) win over everything else because a file upload flips the
/// enclosing content type to multipart; then `integer`, `numeric`, `boolean`
/// and `array`, with `string` as the permissive default.
pub fn infer_type(tokens: &[RuleToken]) -> SchemaType {
    let has = |name: &str| tokens.iter().any(|t| t.name() == name);

    if tokens
        .iter()
        .any(|t| matches!(t.name(), "mimes" | "mimetypes" | "file" | "image"))
    {
        SchemaType::File
    } else if has("integer") {
        SchemaType::Integer
    } else if has("numeric") {
        SchemaType::Number
    } else if has("boolean") {
        SchemaType::Boolean
    } else if has("array") {
        SchemaType::Array
    } else {
        SchemaType::String
    }
}

/// Constraints extracted from one field's rule tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldConstraints {
    /// The field carried a `required` token; tracked on the parent object
    pub required: bool,
    /// The field accepts `null`
    pub nullable: bool,
    /// Accepted literal values
    pub enum_values: Option<Vec<Value>>,
    /// Lower numeric bound
    pub minimum: Option<Number>,
    /// Upper numeric bound
    pub maximum: Option<Number>,
    /// Minimum string length
    pub min_length: Option<u64>,
    /// Maximum string length
    pub max_length: Option<u64>,
}

/// Extract the constraint set of one field from its tokens.
///
/// `min:`/`max:` are interpreted by the inferred type: length bounds for
/// strings, numeric bounds for integers and numbers, ignored otherwise.
/// Boolean fields always end up with `enum: [0, 1]`, overriding any explicit
/// `in:` rule. Unrecognized tokens are ignored so that a forward-compatible
/// rule vocabulary never drops a field.
pub fn extract_constraints(tokens: &[RuleToken], schema_type: SchemaType) -> FieldConstraints {
    let mut constraints = FieldConstraints::default();

    for token in tokens {
        match token.name() {
            "required" => constraints.required = true,
            "nullable" => constraints.nullable = true,
            "in" => {
                if let Some(csv) = token.argument() {
                    constraints.enum_values = Some(
                        csv.split(',')
                            .map(|value| Value::String(value.to_string()))
                            .collect(),
                    );
                }
            }
            "min" => {
                if let Some(argument) = token.argument() {
                    apply_lower_bound(&mut constraints, schema_type, argument);
                }
            }
            "max" => {
                if let Some(argument) = token.argument() {
                    apply_upper_bound(&mut constraints, schema_type, argument);
                }
            }
            // Forward-compatible vocabulary: anything else is ignored
            _ => {}
        }
    }

    // Binary flag contract: boolean fields accept exactly 0 and 1
    if schema_type == SchemaType::Boolean {
        constraints.enum_values = Some(vec![Value::from(0), Value::from(1)]);
    }

    constraints
}

/// Build the leaf schema node for one field from its type and constraints.
///
/// Array leaves carry no primitive constraints; anything extracted for them
/// is dropped with the node staying pure structure.
pub fn build_leaf(schema_type: SchemaType, constraints: &FieldConstraints) -> SchemaNode {
    if schema_type == SchemaType::Array {
        return SchemaNode::array();
    }

    SchemaNode::Primitive(PrimitiveSchema {
        schema_type,
        nullable: if constraints.nullable { Some(true) } else { None },
        enum_values: constraints.enum_values.clone(),
        minimum: constraints.minimum.clone(),
        maximum: constraints.maximum.clone(),
        min_length: constraints.min_length,
        max_length: constraints.max_length,
    })
}

fn apply_lower_bound(constraints: &mut FieldConstraints, schema_type: SchemaType, argument: &str) {
    match schema_type {
        SchemaType::String => constraints.min_length = argument.trim().parse().ok(),
        SchemaType::Integer | SchemaType::Number => {
            constraints.minimum = parse_number(argument);
        }
        _ => {}
    }
}

fn apply_upper_bound(constraints: &mut FieldConstraints, schema_type: SchemaType, argument: &str) {
    match schema_type {
        SchemaType::String => constraints.max_length = argument.trim().parse().ok(),
        SchemaType::Integer | SchemaType::Number => {
            constraints.maximum = parse_number(argument);
        }
        _ => {}
    }
}

fn parse_number(argument: &str) -> Option<Number> {
    let argument = argument.trim();
    if let Ok(int) = argument.parse::<i64>() {
        return Some(Number::from(int));
    }
    argument.parse::<f64>().ok().and_then(Number::from_f64)
}
