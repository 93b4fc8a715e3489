use openapi_from_routes::{
    cli::{self, CliArgs, OutputFormat},
    document::{DocumentAssembler, OpenApiDocument},
    manifest::{self, RouteRegistry},
    path_item::PathItemBuilder,
    serializer::{serialize_json, serialize_yaml},
};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

/// Helper function to write the fixture files into a temporary project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn fixture_project() -> TempDir {
    create_test_project(vec![
        ("routes.yaml", include_str!("fixtures/shop_manifest.yaml")),
        ("order_handlers.src", include_str!("fixtures/order_handlers.src")),
    ])
}

fn generate_document(root: &Path) -> OpenApiDocument {
    let manifest = manifest::load(&root.join("routes.yaml")).expect("Failed to load manifest");
    let registry = RouteRegistry::from_manifest(&manifest, "api", root);

    let builder = PathItemBuilder::new(&registry, &registry);
    let mut assembler = DocumentAssembler::new(
        manifest.title.clone(),
        manifest.version.clone(),
        manifest.base_url.clone(),
    );

    for route in registry.routes() {
        let built = builder.build(route);
        assembler.add_operation(&route.uri, built.method_key, built.operation);
    }

    assembler.build()
}

#[test]
fn test_end_to_end_document_structure() {
    let temp_dir = fixture_project();
    let document = generate_document(temp_dir.path());

    assert_eq!(document.openapi, "3.0.0");
    assert_eq!(document.info.title, "Shop API");
    assert_eq!(document.info.version, "1.2.0");
    assert_eq!(document.servers[0].url, "https://shop.example.test");

    // Non-API routes are filtered out before reaching the core
    assert!(!document.paths.contains_key("/admin/stats"));

    let uris: Vec<&str> = document.paths.keys().map(String::as_str).collect();
    assert_eq!(
        uris,
        vec!["/api/orders", "/api/orders/{order}", "/api/attachments"]
    );
}

#[test]
fn test_get_route_converts_validation_to_query_parameters() {
    let temp_dir = fixture_project();
    let document = generate_document(temp_dir.path());

    let operation = &document.paths["/api/orders"]["get"];
    assert_eq!(operation.summary, "List of orders");
    assert_eq!(operation.tags, vec!["Orders"]);
    assert!(operation.request_body.is_none());

    let names: Vec<&str> = operation
        .parameters
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["page", "per_page"]);
    assert!(operation.parameters.iter().all(|p| p.location == "query"));
    assert!(operation.parameters.iter().all(|p| !p.required));

    // auth:api middleware marks the route as bearer-protected
    let security = operation.security.as_ref().expect("security expected");
    assert!(security[0].contains_key("bearerAuth"));
}

#[test]
fn test_post_route_request_body_and_responses() {
    let temp_dir = fixture_project();
    let document = generate_document(temp_dir.path());

    let operation = &document.paths["/api/orders"]["post"];
    assert_eq!(operation.summary, "Create order");
    assert_eq!(operation.operation_id, "OrderController@store");

    let body = operation.request_body.as_ref().expect("request body expected");
    let media = &body.content["application/json"];
    let schema = serde_json::to_value(media.schema.as_ref().unwrap()).unwrap();

    assert_eq!(
        schema["properties"]["customer"],
        serde_json::json!({"type": "string", "maxLength": 120})
    );
    assert_eq!(
        schema["properties"]["total"],
        serde_json::json!({"type": "number", "minimum": 0})
    );
    assert_eq!(schema["properties"]["paid"]["enum"], serde_json::json!([0, 1]));
    assert_eq!(schema["required"], serde_json::json!(["customer", "total"]));

    // Both wildcard siblings land inside one shared item schema
    assert_eq!(
        schema["properties"]["items"],
        serde_json::json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "sku": {"type": "string"},
                    "qty": {"type": "integer", "minimum": 1}
                }
            }
        })
    );

    // abort(400) + json(..., 201) + bound validation, plus the example entry
    let response_keys: Vec<&str> = operation.responses.keys().map(String::as_str).collect();
    assert_eq!(response_keys, vec!["201", "400", "422", "example"]);
    assert_eq!(operation.responses["201"].description, "Response 201");

    let example = operation.responses["example"].content.as_ref().unwrap();
    assert_eq!(
        example["application/json"].example,
        Some(serde_json::json!({"customer": "Ada", "total": 10}))
    );
}

#[test]
fn test_put_route_is_tunneled_through_post() {
    let temp_dir = fixture_project();
    let document = generate_document(temp_dir.path());

    let methods = &document.paths["/api/orders/{order}"];
    assert!(
        !methods.contains_key("put"),
        "PUT must be exposed as POST, found keys: {:?}",
        methods.keys().collect::<Vec<_>>()
    );

    let operation = &methods["post"];
    assert_eq!(operation.summary, "Update order");

    // The {order} placeholder becomes a required integer path parameter
    assert_eq!(operation.parameters.len(), 1);
    assert_eq!(operation.parameters[0].name, "order");
    assert_eq!(operation.parameters[0].location, "path");
    assert!(operation.parameters[0].required);

    let body = operation.request_body.as_ref().unwrap();
    let schema = serde_json::to_value(
        body.content["application/json"].schema.as_ref().unwrap(),
    )
    .unwrap();

    assert_eq!(
        schema["properties"]["_method"]["enum"],
        serde_json::json!(["PUT"])
    );
    assert!(schema["required"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("_method")));

    // findOrFail + unlabeled json + bound validation
    let response_keys: Vec<&str> = operation.responses.keys().map(String::as_str).collect();
    assert_eq!(response_keys, vec!["404", "200", "422"]);
}

#[test]
fn test_delete_route_responses_from_source_span() {
    let temp_dir = fixture_project();
    let document = generate_document(temp_dir.path());

    let operation = &document.paths["/api/orders/{order}"]["delete"];
    assert_eq!(operation.summary, "Delete order");
    assert!(operation.request_body.is_none());
    // No validation bound, so no 422; explicit 204 plus the OrFail 404
    let response_keys: Vec<&str> = operation.responses.keys().map(String::as_str).collect();
    assert_eq!(response_keys, vec!["204", "404"]);
}

#[test]
fn test_file_upload_route_is_multipart() {
    let temp_dir = fixture_project();
    let document = generate_document(temp_dir.path());

    let operation = &document.paths["/api/attachments"]["post"];
    let body = operation.request_body.as_ref().unwrap();

    assert!(body.content.contains_key("multipart/form-data"));

    let schema = serde_json::to_value(
        body.content["multipart/form-data"].schema.as_ref().unwrap(),
    )
    .unwrap();
    assert_eq!(schema["properties"]["upload"]["type"], "file");
}

#[test]
fn test_generation_is_deterministic() {
    let temp_dir = fixture_project();

    let first = serialize_yaml(&generate_document(temp_dir.path())).unwrap();
    let second = serialize_yaml(&generate_document(temp_dir.path())).unwrap();

    assert_eq!(first, second, "identical inputs must produce identical output");
}

#[test]
fn test_yaml_and_json_serialization() {
    let temp_dir = fixture_project();
    let document = generate_document(temp_dir.path());

    let yaml = serialize_yaml(&document).unwrap();
    assert!(yaml.contains("openapi: 3.0.0"));
    assert!(yaml.contains("/api/orders:"));
    assert!(yaml.contains("bearerAuth:"));

    let json = serialize_json(&document).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["openapi"], "3.0.0");
    assert!(parsed["paths"]["/api/orders"]["post"].is_object());
    assert_eq!(
        parsed["components"]["securitySchemes"]["bearerAuth"]["bearerFormat"],
        "JWT"
    );
}

#[test]
fn test_cli_run_writes_document_and_viewer() {
    let temp_dir = fixture_project();
    let output_path = temp_dir.path().join("docs").join("openapi.yaml");
    let viewer_path = temp_dir.path().join("docs").join("index.html");

    let args = CliArgs {
        manifest_path: temp_dir.path().join("routes.yaml"),
        output_format: OutputFormat::Yaml,
        output_path: Some(output_path.clone()),
        sources_root: None,
        viewer_path: Some(viewer_path.clone()),
        title: Some("Overridden title".to_string()),
        api_version: None,
        base_url: None,
        api_prefix: "api".to_string(),
        verbose: false,
    };

    cli::run(args).expect("CLI run failed");

    // The document was written and is valid YAML
    let yaml = std::fs::read_to_string(&output_path).unwrap();
    let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed["info"]["title"], "Overridden title");
    assert_eq!(parsed["info"]["version"], "1.2.0");

    // The viewer page references the written document by file name
    let page = std::fs::read_to_string(&viewer_path).unwrap();
    assert!(page.contains("<title>Overridden title</title>"));
    assert!(page.contains(r#"url: "openapi.yaml""#));
}

#[test]
fn test_empty_prefix_documents_everything() {
    let temp_dir = fixture_project();
    let manifest = manifest::load(&temp_dir.path().join("routes.yaml")).unwrap();
    let registry = RouteRegistry::from_manifest(&manifest, "", temp_dir.path());

    assert!(registry
        .routes()
        .iter()
        .any(|route| route.uri == "/admin/stats"));
}
