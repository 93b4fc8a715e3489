//! Static viewer page for the generated document.
//!
//! The page is a single self-contained HTML file that loads Swagger UI from
//! its public CDN and points it at the generated YAML document. It is written
//! next to the document so the pair can be served by any static file host.

use log::debug;

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>__TITLE__</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({
        url: "__SPEC_URL__",
        dom_id: "#swagger-ui",
        deepLinking: true,
      });
    };
  </script>
</body>
</html>
"##;

/// Render the viewer page for a document.
///
/// `spec_url` is the URL (usually a relative file name) the page loads the
/// YAML document from; `title` becomes the browser tab title.
pub fn render_page(title: &str, spec_url: &str) -> String {
    debug!("Rendering viewer page for {}", spec_url);
    PAGE_TEMPLATE
        .replace("__TITLE__", title)
        .replace("__SPEC_URL__", spec_url)
}
