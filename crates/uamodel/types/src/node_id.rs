use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The identifier part of a [`NodeId`].
///
/// Variant order fixes the cross-kind ordering (numeric < string < guid <
/// opaque), so the derived `Ord` gives every NodeId a total order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Identifier {
    Numeric(u32),
    String(String),
    Guid(Uuid),
    Opaque(Vec<u8>),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "i={}", v),
            Self::String(s) => write!(f, "s={}", s),
            Self::Guid(g) => write!(f, "g={}", g),
            Self::Opaque(bytes) => write!(f, "b={}", hex_encode(bytes)),
        }
    }
}

/// Unique node identifier: namespace index plus identifier.
///
/// Immutable once issued. The canonical literal form is
/// `ns=<namespace>;<kind>=<id>` with the `ns=` part omitted for namespace 0,
/// e.g. `i=85`, `ns=1;s=Motor`, `ns=2;g=72962b91-fa75-4ae6-8d28-b404dc7daf63`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId {
    pub namespace: u16,
    pub identifier: Identifier,
}

impl NodeId {
    pub fn new_numeric(namespace: u16, value: u32) -> Self {
        Self {
            namespace,
            identifier: Identifier::Numeric(value),
        }
    }

    pub fn new_string(namespace: u16, value: impl Into<String>) -> Self {
        Self {
            namespace,
            identifier: Identifier::String(value.into()),
        }
    }

    pub fn new_guid(namespace: u16, value: Uuid) -> Self {
        Self {
            namespace,
            identifier: Identifier::Guid(value),
        }
    }

    pub fn new_opaque(namespace: u16, value: Vec<u8>) -> Self {
        Self {
            namespace,
            identifier: Identifier::Opaque(value),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.identifier, Identifier::Numeric(_))
    }

    pub fn as_numeric(&self) -> Option<u32> {
        match self.identifier {
            Identifier::Numeric(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string_id(&self) -> Option<&str> {
        match &self.identifier {
            Identifier::String(s) => Some(s),
            _ => None,
        }
    }

    /// Parse a literal, substituting `default_namespace` when the literal
    /// omits the `ns=` part. This is how caller-supplied id literals are
    /// resolved against the namespace constructing the node.
    pub fn parse_with_namespace(
        literal: &str,
        default_namespace: u16,
    ) -> Result<Self, NodeIdParseError> {
        let literal = literal.trim();
        let (namespace, rest) = match literal.strip_prefix("ns=") {
            Some(tail) => {
                let (ns_str, rest) = tail
                    .split_once(';')
                    .ok_or_else(|| NodeIdParseError::Malformed(literal.to_string()))?;
                let ns = ns_str
                    .parse::<u16>()
                    .map_err(|_| NodeIdParseError::InvalidNamespace(ns_str.to_string()))?;
                (ns, rest)
            }
            None => (default_namespace, literal),
        };

        let (kind, value) = rest
            .split_once('=')
            .ok_or_else(|| NodeIdParseError::Malformed(literal.to_string()))?;
        let identifier = match kind {
            "i" => Identifier::Numeric(
                value
                    .parse::<u32>()
                    .map_err(|_| NodeIdParseError::InvalidNumeric(value.to_string()))?,
            ),
            "s" => Identifier::String(value.to_string()),
            "g" => Identifier::Guid(
                Uuid::parse_str(value)
                    .map_err(|_| NodeIdParseError::InvalidGuid(value.to_string()))?,
            ),
            "b" => Identifier::Opaque(
                hex_decode(value).ok_or_else(|| NodeIdParseError::InvalidOpaque(value.to_string()))?,
            ),
            other => return Err(NodeIdParseError::UnknownKind(other.to_string())),
        };

        Ok(Self {
            namespace,
            identifier,
        })
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace == 0 {
            write!(f, "{}", self.identifier)
        } else {
            write!(f, "ns={};{}", self.namespace, self.identifier)
        }
    }
}

impl FromStr for NodeId {
    type Err = NodeIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_namespace(s, 0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NodeIdParseError {
    #[error("malformed node id literal: {0}")]
    Malformed(String),
    #[error("invalid namespace index: {0}")]
    InvalidNamespace(String),
    #[error("invalid numeric identifier: {0}")]
    InvalidNumeric(String),
    #[error("invalid guid identifier: {0}")]
    InvalidGuid(String),
    #[error("invalid opaque identifier: {0}")]
    InvalidOpaque(String),
    #[error("unknown identifier kind: {0}=")]
    UnknownKind(String),
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}
