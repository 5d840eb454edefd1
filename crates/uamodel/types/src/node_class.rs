use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The eight node classes of the information model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    Object,
    Variable,
    Method,
    ObjectType,
    VariableType,
    ReferenceType,
    DataType,
    View,
}

impl NodeClass {
    /// Bit value used in browse-result node-class masks (0 = all classes).
    pub fn mask_bit(&self) -> u32 {
        match self {
            Self::Object => 1,
            Self::Variable => 2,
            Self::Method => 4,
            Self::ObjectType => 8,
            Self::VariableType => 16,
            Self::ReferenceType => 32,
            Self::DataType => 64,
            Self::View => 128,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Self::ObjectType | Self::VariableType | Self::ReferenceType | Self::DataType
        )
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Object => "Object",
            Self::Variable => "Variable",
            Self::Method => "Method",
            Self::ObjectType => "ObjectType",
            Self::VariableType => "VariableType",
            Self::ReferenceType => "ReferenceType",
            Self::DataType => "DataType",
            Self::View => "View",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for NodeClass {
    type Err = NodeClassParseError;

    /// Inverse of `Display`; used by the symbol-cache CSV codec.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Object" => Ok(Self::Object),
            "Variable" => Ok(Self::Variable),
            "Method" => Ok(Self::Method),
            "ObjectType" => Ok(Self::ObjectType),
            "VariableType" => Ok(Self::VariableType),
            "ReferenceType" => Ok(Self::ReferenceType),
            "DataType" => Ok(Self::DataType),
            "View" => Ok(Self::View),
            other => Err(NodeClassParseError(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown node class: {0}")]
pub struct NodeClassParseError(pub String);

/// Direction of a browse or reference query relative to the browsed node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrowseDirection {
    Forward,
    Inverse,
    Both,
}

impl BrowseDirection {
    pub fn inverted(&self) -> Self {
        match self {
            Self::Forward => Self::Inverse,
            Self::Inverse => Self::Forward,
            Self::Both => Self::Both,
        }
    }

    /// Does a stored edge with the given `is_forward` flag match this
    /// requested direction?
    pub fn matches(&self, is_forward: bool) -> bool {
        match self {
            Self::Forward => is_forward,
            Self::Inverse => !is_forward,
            Self::Both => true,
        }
    }
}

/// Modelling rule attached to a type-level aggregation edge, governing
/// whether the instantiation engine copies the referenced child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModellingRule {
    Mandatory,
    Optional,
    OptionalPlaceholder,
    MandatoryPlaceholder,
    ExposesItsArray,
}

impl ModellingRule {
    /// Placeholder rules describe naming patterns for children the
    /// application adds later; they are never materialized by instantiation.
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            Self::OptionalPlaceholder | Self::MandatoryPlaceholder | Self::ExposesItsArray
        )
    }
}

impl fmt::Display for ModellingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Mandatory => "Mandatory",
            Self::Optional => "Optional",
            Self::OptionalPlaceholder => "OptionalPlaceholder",
            Self::MandatoryPlaceholder => "MandatoryPlaceholder",
            Self::ExposesItsArray => "ExposesItsArray",
        };
        write!(f, "{}", s)
    }
}
