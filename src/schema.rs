//! Schema tree produced by rule compilation.
//!
//! The request-body schema is built as a tree of [`SchemaNode`] values. A node is
//! exactly one of three shapes: a primitive leaf carrying the inferred type and
//! constraints, an object with named properties, or an array with an optional
//! item schema. Constraints only ever live on primitive leaves; objects and
//! arrays are pure structure. Serialization maps the tree onto the OpenAPI
//! JSON-Schema shape (`type`, `properties`, `required`, `items`, `enum`, ...).

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Number, Value};

/// Schema types that rule inference can produce.
///
/// `file` is a literal type of its own rather than a string format, because
/// its presence flips the enclosing request content type to multipart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// Uploaded file (mime-constrained field)
    File,
    /// Integer number
    Integer,
    /// Arbitrary number
    Number,
    /// Boolean flag
    Boolean,
    /// Array value
    Array,
    /// Object value
    Object,
    /// Plain string (the permissive default)
    String,
}

/// One node of the generated schema tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaNode {
    /// Leaf node with a primitive type and its constraints
    Primitive(PrimitiveSchema),
    /// Object node with named child properties
    Object(ObjectSchema),
    /// Array node, items materialized once a wildcard path reaches into it
    Array(ArraySchema),
}

/// Leaf schema: a primitive type plus the constraints extracted from its rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimitiveSchema {
    /// The primitive schema type
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    /// Whether `null` is an accepted value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Accepted literal values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Lower numeric bound (integer/number fields)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    /// Upper numeric bound (integer/number fields)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    /// Minimum length (string fields)
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum length (string fields)
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

/// Object schema with named properties and a flat required list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSchema {
    /// Always [`SchemaType::Object`]
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    /// Child properties, insertion-ordered
    pub properties: IndexMap<String, SchemaNode>,
    /// Names of required properties
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// Array schema. `items` stays empty for a bare `array`-typed leaf and is
/// materialized as an object once a wildcard field path reaches into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArraySchema {
    /// Always [`SchemaType::Array`]
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    /// Schema of the array elements, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    /// Create a primitive leaf of the given type with no constraints.
    pub fn primitive(schema_type: SchemaType) -> Self {
        SchemaNode::Primitive(PrimitiveSchema {
            schema_type,
            nullable: None,
            enum_values: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
        })
    }

    /// Create an empty object node.
    pub fn object() -> Self {
        SchemaNode::Object(ObjectSchema {
            schema_type: SchemaType::Object,
            properties: IndexMap::new(),
            required: Vec::new(),
        })
    }

    /// Create an array node with no item schema.
    pub fn array() -> Self {
        SchemaNode::Array(ArraySchema {
            schema_type: SchemaType::Array,
            items: None,
        })
    }

    /// Create an array node wrapping the given item schema.
    pub fn array_of(items: SchemaNode) -> Self {
        SchemaNode::Array(ArraySchema {
            schema_type: SchemaType::Array,
            items: Some(Box::new(items)),
        })
    }

    /// Borrow the object variant mutably, if this node is an object.
    pub fn as_object_mut(&mut self) -> Option<&mut ObjectSchema> {
        match self {
            SchemaNode::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Borrow the object variant, if this node is an object.
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            SchemaNode::Object(obj) => Some(obj),
            _ => None,
        }
    }
}
