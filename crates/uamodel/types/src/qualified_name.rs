use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Namespace-qualified browse name.
///
/// Two qualified names are equal iff both the namespace index and the name
/// match. A bare-name lookup is only legal while the name is unique across
/// the namespaces present; resolving such collisions is the caller's job
/// (the graph layer reports them as ambiguity errors).
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace: u16,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace: u16, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.namespace, self.name)
        }
    }
}

impl FromStr for QualifiedName {
    type Err = QualifiedNameParseError;

    /// Parse `"1:Temperature"` forms; a bare name is namespace 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(QualifiedNameParseError::Empty);
        }
        match s.split_once(':') {
            Some((ns, name)) => {
                let namespace = ns
                    .parse::<u16>()
                    .map_err(|_| QualifiedNameParseError::InvalidNamespace(ns.to_string()))?;
                if name.is_empty() {
                    return Err(QualifiedNameParseError::Empty);
                }
                Ok(Self::new(namespace, name))
            }
            None => Ok(Self::new(0, s)),
        }
    }
}

impl From<&str> for QualifiedName {
    /// Convenience for literals in application code and tests: parses the
    /// `ns:name` form, treating an unparsable prefix as part of the name.
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| QualifiedName::new(0, s))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QualifiedNameParseError {
    #[error("empty qualified name")]
    Empty,
    #[error("invalid namespace index: {0}")]
    InvalidNamespace(String),
}

/// Human-readable text with an optional locale, used for display names and
/// descriptions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub locale: Option<String>,
    pub text: String,
}

impl LocalizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            locale: None,
            text: text.into(),
        }
    }

    pub fn with_locale(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            text: text.into(),
        }
    }
}

impl From<&str> for LocalizedText {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
