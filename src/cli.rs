use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// Route OpenAPI Generator - Generate OpenAPI documentation from a declared route manifest
#[derive(Parser, Debug)]
#[command(name = "openapi-from-routes")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the route manifest file (YAML or JSON)
    #[arg(value_name = "MANIFEST")]
    pub manifest_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Directory handler source positions are resolved against
    /// (defaults to the manifest's directory)
    #[arg(short = 's', long = "sources", value_name = "DIR")]
    pub sources_root: Option<PathBuf>,

    /// Also write a static Swagger UI page referencing the document
    #[arg(long = "viewer", value_name = "FILE")]
    pub viewer_path: Option<PathBuf>,

    /// Override the document title from the manifest
    #[arg(long = "title")]
    pub title: Option<String>,

    /// Override the documented API version from the manifest
    #[arg(long = "api-version", value_name = "VERSION")]
    pub api_version: Option<String>,

    /// Override the server base URL from the manifest
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// URI prefix identifying user-facing API routes (empty keeps everything)
    #[arg(long = "prefix", value_name = "PREFIX", default_value = "api")]
    pub api_prefix: String,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    // Validate manifest path exists
    if !args.manifest_path.exists() {
        anyhow::bail!(
            "Manifest file does not exist: {}",
            args.manifest_path.display()
        );
    }

    // Validate manifest path is a file
    if !args.manifest_path.is_file() {
        anyhow::bail!(
            "Manifest path is not a file: {}",
            args.manifest_path.display()
        );
    }

    // The viewer page references the written document by file name
    if args.viewer_path.is_some() && args.output_path.is_none() {
        anyhow::bail!("--viewer requires --output, the page references the written document");
    }

    info!("Manifest: {}", args.manifest_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if let Some(ref viewer) = args.viewer_path {
        info!("Viewer page: {}", viewer.display());
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::document::DocumentAssembler;
    use crate::manifest::{self, RouteRegistry};
    use crate::path_item::PathItemBuilder;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
    use crate::viewer;

    info!("Starting OpenAPI document generation...");

    // Step 1: Load the route manifest
    info!("Loading route manifest...");
    let manifest = manifest::load(&args.manifest_path)?;
    info!("Manifest declares {} routes", manifest.routes.len());

    // Step 2: Build the filtered route registry
    let sources_root = args
        .sources_root
        .clone()
        .or_else(|| args.manifest_path.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    debug!("Sources root: {}", sources_root.display());

    let registry = RouteRegistry::from_manifest(&manifest, &args.api_prefix, &sources_root);
    info!("Registry holds {} API routes", registry.routes().len());

    if registry.routes().is_empty() {
        log::warn!("No API routes matched the {:?} prefix", args.api_prefix);
    }

    // Step 3: Resolve document metadata (CLI overrides win over the manifest)
    let title = args.title.clone().unwrap_or_else(|| manifest.title.clone());
    let version = args
        .api_version
        .clone()
        .unwrap_or_else(|| manifest.version.clone());
    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| manifest.base_url.clone());

    // Step 4: Build one operation per route and fold into the document
    info!("Building OpenAPI document...");
    let builder = PathItemBuilder::new(&registry, &registry);
    let mut assembler = DocumentAssembler::new(title.clone(), version, base_url);

    for route in registry.routes() {
        debug!("Adding route: {} {}", route.method.as_str(), route.uri);
        let built = builder.build(route);
        assembler.add_operation(&route.uri, built.method_key, built.operation);
    }

    let document = assembler.build();
    info!("OpenAPI document built successfully");

    // Step 5: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    // Step 6: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!(
            "Successfully wrote OpenAPI document to {}",
            output_path.display()
        );
    } else {
        println!("{}", content);
    }

    // Step 7: Write the viewer page
    if let Some(viewer_path) = &args.viewer_path {
        // Validated above: a viewer always comes with an output file
        let spec_url = args
            .output_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "openapi.yaml".to_string());

        info!("Writing viewer page to: {}", viewer_path.display());
        let page = viewer::render_page(&title, &spec_url);
        write_to_file(&page, viewer_path)?;
    }

    // Step 8: Display summary
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Routes declared: {}", manifest.routes.len());
    info!("  - Routes documented: {}", registry.routes().len());
    info!("  - Paths emitted: {}", document.paths.len());

    Ok(())
}
