//! Splitting rule specifications into atomic tokens.

use crate::routes::{RuleEntry, RuleSpec};
use log::debug;

/// One atomic rule token, e.g. `required`, `min:5` or `in:A,B`.
///
/// The raw text is preserved so that enum values keep their original case;
/// matching against the rule vocabulary goes through the lowercased [`name`]
/// accessor instead.
///
/// [`name`]: RuleToken::name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleToken {
    raw: String,
    lowered: String,
}

impl RuleToken {
    /// Create a token from its raw text.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let lowered = raw.to_lowercase();
        Self { raw, lowered }
    }

    /// The raw token text as written in the manifest.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The lowercased rule name: everything before the first `:`.
    pub fn name(&self) -> &str {
        match self.lowered.split_once(':') {
            Some((name, _)) => name,
            None => &self.lowered,
        }
    }

    /// The case-preserved argument: everything after the first `:`.
    pub fn argument(&self) -> Option<&str> {
        self.raw.split_once(':').map(|(_, arg)| arg)
    }
}

/// Split a rule specification into its atomic tokens.
///
/// String specifications are split on `|`; list specifications contribute one
/// token per string entry. Entries that are not strings (stand-ins for
/// executable rule objects) are dropped, and surrounding whitespace and empty
/// fragments are discarded.
pub fn tokenize(spec: &RuleSpec) -> Vec<RuleToken> {
    match spec {
        RuleSpec::Joined(joined) => joined
            .split('|')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(RuleToken::new)
            .collect(),
        RuleSpec::List(entries) => entries
            .iter()
            .filter_map(|entry| match entry {
                RuleEntry::Token(token) => {
                    let token = token.trim();
                    if token.is_empty() {
                        None
                    } else {
                        Some(RuleToken::new(token))
                    }
                }
                RuleEntry::Opaque(value) => {
                    debug!("Dropping non-string rule entry: {}", value);
                    None
                }
            })
            .collect(),
    }
}
