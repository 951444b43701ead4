//! Reverse-parsing of debug-formatted node address dumps.
//!
//! Client libraries of the tag-based protocol print addresses as
//! `NodeId(Identifier='X', NamespaceIndex=2, NodeIdType=...)`. This module
//! recovers the namespace and identifier from such text. The direct parse of
//! canonical text is not done here; [`resolve`](crate::resolve) falls back to
//! it when this module finds nothing.

use std::sync::OnceLock;

use regex::Regex;

use crate::node::CanonicalNodeId;

/// A deep well-known path recognised by two markers in the dump.
///
/// Generic extraction is ambiguous for these nodes, so they take precedence.
struct Shortcut {
    markers: [&'static str; 2],
    namespace: u16,
    identifier: &'static str,
}

const SHORTCUTS: &[Shortcut] = &[
    Shortcut {
        markers: ["NamespaceIndex=3", "ServerInterfaces"],
        namespace: 3,
        identifier: "ServerInterfaces",
    },
    Shortcut {
        markers: ["NamespaceIndex=4", "GESTIONALE"],
        namespace: 4,
        identifier: "GESTIONALE",
    },
];

struct Patterns {
    namespace: Regex,
    quoted_id: Regex,
    numeric_id: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    // Constant patterns; `test_patterns_compile` covers every one of them.
    PATTERNS.get_or_init(|| Patterns {
        namespace: Regex::new(r"NamespaceIndex=(\d+)").expect("namespace pattern is valid"),
        quoted_id: Regex::new(r#"Identifier=(?:'([^']+)'|"([^"]+)")"#)
            .expect("quoted identifier pattern is valid"),
        numeric_id: Regex::new(r"Identifier=(\d+)").expect("numeric identifier pattern is valid"),
    })
}

/// Resolves dump text through the shortcuts, then generic extraction.
///
/// Returns `None` when neither applies; the caller decides what comes next.
pub(crate) fn resolve_text(text: &str) -> Option<CanonicalNodeId> {
    shortcut(text).or_else(|| extract(text))
}

fn shortcut(text: &str) -> Option<CanonicalNodeId> {
    SHORTCUTS
        .iter()
        .find(|s| s.markers.iter().all(|m| text.contains(m)))
        .map(|s| CanonicalNodeId::string(s.namespace, s.identifier))
}

fn extract(text: &str) -> Option<CanonicalNodeId> {
    let patterns = patterns();
    let namespace = patterns
        .namespace
        .captures(text)?
        .get(1)?
        .as_str()
        .parse::<u16>()
        .ok()?;

    if let Some(caps) = patterns.quoted_id.captures(text) {
        let id = caps.get(1).or_else(|| caps.get(2))?;
        return Some(CanonicalNodeId::string(namespace, id.as_str()));
    }

    let id = patterns
        .numeric_id
        .captures(text)?
        .get(1)?
        .as_str()
        .parse::<u64>()
        .ok()?;
    Some(CanonicalNodeId::numeric(namespace, id))
}
