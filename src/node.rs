//! Node references of the tag-based protocol and their resolution.
//!
//! A [`NodeReference`] is whatever the session layer or the operator handed
//! over: a well-known alias, an already canonical address, or an opaque text
//! dump of an address object. [`resolve`] turns any of them into a
//! [`CanonicalNodeId`] or a [`ResolveError`] that carries the original token.
//!
//! # Canonical text form
//!
//! | Text | Namespace | Identifier |
//! |------|:---------:|------------|
//! | `i=85` | 0 | numeric 85 |
//! | `ns=2;i=1001` | 2 | numeric 1001 |
//! | `ns=1;s=Temperature` | 1 | string `Temperature` |
//!
//! # Example
//!
//! ```
//! use plc_reader::{resolve, CanonicalNodeId, NodeReference};
//!
//! let objects = resolve(&NodeReference::Alias("objects".into()))?;
//! assert_eq!(objects, CanonicalNodeId::numeric(0, 85));
//!
//! let dump = "NodeId(Identifier='Temperature', NamespaceIndex=2, NodeIdType=<NodeIdType.String: 3>)";
//! let node = resolve(&NodeReference::Opaque(dump.into()))?;
//! assert_eq!(node.to_string(), "ns=2;s=Temperature");
//! # Ok::<(), plc_reader::ResolveError>(())
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::ResolveError;
use crate::opaque;

/// Well-known roots and their numeric identifiers in namespace 0.
const WELL_KNOWN: &[(&str, u64)] = &[
    ("root", 84),
    ("objects", 85),
    ("types", 86),
    ("views", 87),
    ("server", 2253),
];

/// The identifier part of a canonical address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Identifier {
    /// Numeric identifier (`i=`).
    Numeric(u64),
    /// String identifier (`s=`).
    String(String),
}

/// The unambiguous form of a node address: namespace plus identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanonicalNodeId {
    /// Namespace index.
    pub namespace: u16,
    /// Identifier within the namespace.
    pub identifier: Identifier,
}

impl CanonicalNodeId {
    /// Creates a canonical address with a numeric identifier.
    pub fn numeric(namespace: u16, id: u64) -> Self {
        Self {
            namespace,
            identifier: Identifier::Numeric(id),
        }
    }

    /// Creates a canonical address with a string identifier.
    pub fn string(namespace: u16, id: impl Into<String>) -> Self {
        Self {
            namespace,
            identifier: Identifier::String(id.into()),
        }
    }
}

impl fmt::Display for CanonicalNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};", self.namespace)?;
        }
        match &self.identifier {
            Identifier::Numeric(id) => write!(f, "i={}", id),
            Identifier::String(id) => write!(f, "s={}", id),
        }
    }
}

impl FromStr for CanonicalNodeId {
    type Err = ResolveError;

    /// Parses `[ns=<u16>;]i=<u64>` or `[ns=<u16>;]s=<text>`.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::CanonicalNodeId;
    ///
    /// let node: CanonicalNodeId = "ns=2;i=1001".parse()?;
    /// assert_eq!(node, CanonicalNodeId::numeric(2, 1001));
    ///
    /// assert!("ns=x;i=1".parse::<CanonicalNodeId>().is_err());
    /// # Ok::<(), plc_reader::ResolveError>(())
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_canonical(s).ok_or_else(|| ResolveError::malformed(s))
    }
}

fn parse_canonical(text: &str) -> Option<CanonicalNodeId> {
    let text = text.trim();
    let (namespace, rest) = match text.strip_prefix("ns=") {
        Some(after) => {
            let (ns, rest) = after.split_once(';')?;
            (ns.parse::<u16>().ok()?, rest)
        }
        None => (0, text),
    };

    let identifier = if let Some(id) = rest.strip_prefix("i=") {
        Identifier::Numeric(id.parse().ok()?)
    } else if let Some(id) = rest.strip_prefix("s=") {
        if id.is_empty() {
            return None;
        }
        Identifier::String(id.to_string())
    } else {
        return None;
    };

    Some(CanonicalNodeId {
        namespace,
        identifier,
    })
}

/// Returns the canonical address of a well-known alias, if it is one.
///
/// Alias names are compared ASCII case-insensitively.
///
/// # Example
///
/// ```
/// use plc_reader::{well_known, CanonicalNodeId};
///
/// assert_eq!(well_known("Root"), Some(CanonicalNodeId::numeric(0, 84)));
/// assert_eq!(well_known("home"), None);
/// ```
pub fn well_known(alias: &str) -> Option<CanonicalNodeId> {
    let alias = alias.trim();
    WELL_KNOWN
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(alias))
        .map(|&(_, id)| CanonicalNodeId::numeric(0, id))
}

/// An address token in one of its three representations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeReference {
    /// A symbolic root such as `"root"` or `"objects"`.
    Alias(String),
    /// An already canonical address.
    Canonical(CanonicalNodeId),
    /// A human-readable dump of an address that must be reverse-parsed.
    Opaque(String),
}

impl NodeReference {
    /// Sorts free text into the most specific representation.
    ///
    /// Known aliases become `Alias`, parseable canonical text becomes
    /// `Canonical`, everything else is `Opaque`. Session layers call this at
    /// the boundary so structured addresses skip opaque extraction.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::{CanonicalNodeId, NodeReference};
    ///
    /// assert_eq!(NodeReference::classify("objects"), NodeReference::Alias("objects".into()));
    /// assert_eq!(
    ///     NodeReference::classify("ns=1;s=Temperature"),
    ///     NodeReference::Canonical(CanonicalNodeId::string(1, "Temperature"))
    /// );
    /// assert!(matches!(NodeReference::classify("NodeId(...)"), NodeReference::Opaque(_)));
    /// ```
    pub fn classify(text: &str) -> Self {
        if well_known(text).is_some() {
            return NodeReference::Alias(text.trim().to_string());
        }
        match parse_canonical(text) {
            Some(node) => NodeReference::Canonical(node),
            None => NodeReference::Opaque(text.to_string()),
        }
    }
}

impl FromStr for NodeReference {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(NodeReference::classify(s))
    }
}

impl From<CanonicalNodeId> for NodeReference {
    fn from(node: CanonicalNodeId) -> Self {
        NodeReference::Canonical(node)
    }
}

impl fmt::Display for NodeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeReference::Alias(alias) => write!(f, "{}", alias),
            NodeReference::Canonical(node) => write!(f, "{}", node),
            NodeReference::Opaque(text) => write!(f, "{}", text),
        }
    }
}

/// Resolves a node reference to its canonical address.
///
/// - `Canonical` is returned unchanged
/// - `Alias` is looked up in the well-known table
/// - `Opaque` goes through the fixed shortcuts, then pattern extraction,
///   then a direct parse of the whole text
///
/// # Errors
///
/// - [`ResolveError::UnknownAlias`] for an alias outside the table
/// - [`ResolveError::MalformedReference`] when opaque text cannot be parsed
///
/// # Example
///
/// ```
/// use plc_reader::{resolve, CanonicalNodeId, NodeReference, ResolveError};
///
/// let node = resolve(&NodeReference::Opaque("ns=2;s=Temperature".into()))?;
/// assert_eq!(node, CanonicalNodeId::string(2, "Temperature"));
///
/// let err = resolve(&NodeReference::Alias("home".into())).unwrap_err();
/// assert_eq!(err, ResolveError::unknown_alias("home"));
/// # Ok::<(), ResolveError>(())
/// ```
pub fn resolve(token: &NodeReference) -> Result<CanonicalNodeId, ResolveError> {
    match token {
        NodeReference::Canonical(node) => Ok(node.clone()),
        NodeReference::Alias(alias) => {
            well_known(alias).ok_or_else(|| ResolveError::unknown_alias(alias.as_str()))
        }
        NodeReference::Opaque(text) => opaque::resolve_text(text)
            .or_else(|| parse_canonical(text))
            .ok_or_else(|| ResolveError::malformed(text.as_str())),
    }
}
