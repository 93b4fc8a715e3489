//! Route OpenAPI Generator - Command-line tool for generating OpenAPI documentation.
//!
//! This binary provides a command-line interface for generating OpenAPI 3.0
//! documentation from a declared route manifest. It compiles each route's
//! validation rules into request schemas, infers likely response codes from
//! handler source text, and writes a complete OpenAPI document plus an
//! optional static viewer page.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-routes [OPTIONS] <MANIFEST>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! openapi-from-routes routes.yaml -o openapi.yaml
//! ```
//!
//! Generate JSON documentation:
//! ```bash
//! openapi-from-routes routes.yaml -f json -o openapi.json
//! ```
//!
//! Write the Swagger UI page next to the document:
//! ```bash
//! openapi-from-routes routes.yaml -o docs/openapi.yaml --viewer docs/index.html
//! ```

mod cli;
mod document;
mod error;
mod manifest;
mod path_item;
mod responses;
mod routes;
mod rules;
mod schema;
mod serializer;
mod viewer;

use anyhow::Result;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // We need to parse args twice: once to get verbose flag, then again after logger init
    // First, do a quick parse just to check for verbose flag
    let args_for_verbose = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Route OpenAPI Generator starting...");

    // Now do the full parse with validation
    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    // Run the main workflow
    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
