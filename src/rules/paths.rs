//! Field path parsing and resolution into the shared property tree.
//!
//! Field paths use the framework's dot/wildcard syntax: `items.*.sku` means
//! "the `sku` property of each element of the `items` array". A path is parsed
//! once into a segment sequence and then merged into the request body's
//! property tree, materializing one `Array{items: Object}` layer per wildcard.

use crate::schema::SchemaNode;
use indexmap::IndexMap;
use log::debug;

/// One segment of a parsed field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A literal property name (may itself contain dots)
    Literal(String),
    /// A wildcard array layer (`.*.`)
    Array,
}

/// A field path parsed into alternating literal and array segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse a raw field path by splitting on the wildcard separator `.*.`.
    ///
    /// `items.*.sku` becomes `[Literal(items), Array, Literal(sku)]`; a dotted
    /// name without wildcards stays a single literal segment and names one
    /// flat property.
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        for (index, part) in raw.split(".*.").enumerate() {
            if index > 0 {
                segments.push(Segment::Array);
            }
            segments.push(Segment::Literal(part.to_string()));
        }
        Self { segments }
    }

    /// Whether the path has a single literal segment (no wildcards).
    pub fn is_top_level(&self) -> bool {
        self.segments.len() == 1
    }

    /// The parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Merge a leaf schema into the property tree at the given path.
///
/// Repeated insertions under the same array path accumulate as sibling
/// properties of one shared item schema. Structural conflicts keep the
/// first-seen structure: an itemless array node is upgraded in place when a
/// wildcard path reaches into it, while any other incompatible node blocks
/// the re-insertion.
pub fn insert(properties: &mut IndexMap<String, SchemaNode>, path: &FieldPath, leaf: SchemaNode) {
    insert_segments(properties, path.segments(), leaf);
}

fn insert_segments(
    properties: &mut IndexMap<String, SchemaNode>,
    segments: &[Segment],
    leaf: SchemaNode,
) {
    match segments {
        [Segment::Literal(name)] => {
            if properties.contains_key(name) {
                debug!("Keeping first-seen schema for duplicate property {}", name);
                return;
            }
            properties.insert(name.clone(), leaf);
        }
        [Segment::Literal(name), Segment::Array, rest @ ..] => {
            let node = properties
                .entry(name.clone())
                .or_insert_with(|| SchemaNode::array_of(SchemaNode::object()));

            let SchemaNode::Array(array) = node else {
                debug!(
                    "Ignoring wildcard path into non-array property {}; first-seen structure wins",
                    name
                );
                return;
            };

            let items = array
                .items
                .get_or_insert_with(|| Box::new(SchemaNode::object()));

            match items.as_mut() {
                SchemaNode::Object(object) => insert_segments(&mut object.properties, rest, leaf),
                _ => debug!(
                    "Ignoring wildcard path into non-object items of {}; first-seen structure wins",
                    name
                ),
            }
        }
        // Unreachable from parse(): paths always start and end with a literal
        _ => debug!("Ignoring malformed field path segments"),
    }
}
