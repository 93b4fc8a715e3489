//! Route OpenAPI Generator - OpenAPI documentation from a declared route manifest.
//!
//! This library generates OpenAPI 3.0 documentation from an application's route
//! table and its per-endpoint validation declarations, supplied as a route
//! manifest file. The heart of the crate is the schema-compilation engine: it
//! translates declarative per-field validation rules into a JSON-Schema-shaped
//! tree (including recursive nested/array field paths) and heuristically infers
//! probable response status codes from handler source text.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`manifest`] - Loads the route manifest and builds the filtered route registry
//! 2. [`routes`] - Route table model and the collaborator trait contracts
//! 3. [`rules`] - Compiles validation rule sets into request-body schemas
//! 4. [`schema`] - The tagged schema tree the compiler produces
//! 5. [`responses`] - Heuristic response status-code inference from source text
//! 6. [`path_item`] - Assembles one OpenAPI operation per route and method
//! 7. [`document`] - OpenAPI document model and final assembly
//! 8. [`serializer`] - Serializes the document to YAML or JSON
//! 9. [`viewer`] - Renders the static Swagger UI page
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_routes::{
//!     document::DocumentAssembler,
//!     manifest::{self, RouteRegistry},
//!     path_item::PathItemBuilder,
//!     serializer::serialize_yaml,
//! };
//! use std::path::Path;
//!
//! // Load the route manifest
//! let manifest = manifest::load(Path::new("routes.yaml")).unwrap();
//! let registry = RouteRegistry::from_manifest(&manifest, "api", Path::new("."));
//!
//! // Build the document
//! let builder = PathItemBuilder::new(&registry, &registry);
//! let mut assembler = DocumentAssembler::new(
//!     manifest.title.clone(),
//!     manifest.version.clone(),
//!     manifest.base_url.clone(),
//! );
//! for route in registry.routes() {
//!     let built = builder.build(route);
//!     assembler.add_operation(&route.uri, built.method_key, built.operation);
//! }
//! let document = assembler.build();
//!
//! // Serialize to YAML
//! let yaml = serialize_yaml(&document).unwrap();
//! println!("{}", yaml);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod document;
pub mod error;
pub mod manifest;
pub mod path_item;
pub mod responses;
pub mod routes;
pub mod rules;
pub mod schema;
pub mod serializer;
pub mod viewer;
