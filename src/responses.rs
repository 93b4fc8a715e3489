//! Heuristic inference of response status codes from handler source text.
//!
//! The inferencer pattern-matches the literal text of a handler body. It does
//! not parse or execute anything, so it is best-effort by design: a status
//! code inside a comment is a false positive, a code built dynamically is a
//! false negative. That trade-off is deliberate; the output documents likely
//! responses, it does not prove them.
//!
//! Evidence collected, in order:
//! 1. json-response calls carrying an explicit numeric status;
//! 2. an `OrFail`-style lookup, which implies a not-found path (`404`);
//! 3. json-response calls without a status, assumed successful (`200`);
//! 4. explicit `abort(<code>)` calls;
//! 5. a bound validation declaration, which implies a validation-failure
//!    path (`422`).

use crate::document::{MediaType, Response};
use crate::rules::APPLICATION_JSON;
use indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Reserved non-numeric responses key carrying the example payload.
pub const EXAMPLE_KEY: &str = "example";

/// `json(<payload>, <status>)` with an explicit numeric status.
static JSON_WITH_STATUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"json\s*\(.*?,\s*(\d{3})\s*\)").unwrap());

/// Any json-response call, labeled or not.
static JSON_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"json\s*\(").unwrap());

/// `findOrFail(`, `firstOrFail(` and friends.
static OR_FAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"OrFail\s*\(").unwrap());

/// `abort(<code>)` with an explicit numeric status.
static ABORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"abort\s*\(\s*(\d{3})").unwrap());

/// Infer the probable response status codes of one handler.
///
/// `span` is the literal source text between the handler's declared start and
/// end lines, when available; `has_validation` states whether the route has a
/// bound validation declaration. The result is deduplicated and keeps
/// discovery order.
pub fn infer_status_codes(span: Option<&str>, has_validation: bool) -> Vec<u16> {
    let mut codes: Vec<u16> = Vec::new();

    if let Some(text) = span {
        for capture in JSON_WITH_STATUS.captures_iter(text) {
            if let Ok(code) = capture[1].parse::<u16>() {
                push_unique(&mut codes, code);
            }
        }

        if OR_FAIL.is_match(text) {
            push_unique(&mut codes, 404);
        }

        let json_calls = JSON_CALL.find_iter(text).count();
        let labeled_calls = JSON_WITH_STATUS.find_iter(text).count();
        if json_calls > labeled_calls {
            push_unique(&mut codes, 200);
        }

        for capture in ABORT.captures_iter(text) {
            if let Ok(code) = capture[1].parse::<u16>() {
                push_unique(&mut codes, code);
            }
        }
    } else {
        debug!("No source span available, skipping text heuristics");
    }

    if has_validation {
        push_unique(&mut codes, 422);
    }

    debug!("Inferred status codes: {:?}", codes);
    codes
}

/// Build the responses map from inferred codes and the optional example
/// payload.
///
/// Every discovered code maps to a generic `Response <code>` entry; with no
/// evidence at all the fallback is a single `200 OK`. The example payload, if
/// any, is appended under the reserved [`EXAMPLE_KEY`] pseudo-entry for
/// documentation purposes only.
pub fn build_responses(codes: &[u16], example: Option<&Value>) -> IndexMap<String, Response> {
    let mut responses = IndexMap::new();

    if codes.is_empty() {
        responses.insert(
            "200".to_string(),
            Response {
                description: "OK".to_string(),
                content: None,
            },
        );
    } else {
        for code in codes {
            responses.insert(
                code.to_string(),
                Response {
                    description: format!("Response {}", code),
                    content: None,
                },
            );
        }
    }

    if let Some(example) = example {
        let mut content = IndexMap::new();
        content.insert(
            APPLICATION_JSON.to_string(),
            MediaType {
                schema: None,
                example: Some(example.clone()),
            },
        );
        responses.insert(
            EXAMPLE_KEY.to_string(),
            Response {
                description: "Example payload".to_string(),
                content: Some(content),
            },
        );
    }

    responses
}

fn push_unique(codes: &mut Vec<u16>, code: u16) {
    if !codes.contains(&code) {
        codes.push(code);
    }
}
