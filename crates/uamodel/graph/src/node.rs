use crate::reference::Reference;
use serde::{Deserialize, Serialize};
use uamodel_types::{LocalizedText, NodeClass, NodeId, QualifiedName};

/// A node in the address space.
///
/// Common attributes live on the struct; class-specific attributes live in
/// the typed [`NodeBody`] payload. Every node belongs to exactly one
/// namespace (its `node_id.namespace`); the address space owns all nodes
/// through its global index, namespaces are logical partitions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UaNode {
    pub node_id: NodeId,
    pub browse_name: QualifiedName,
    pub display_name: LocalizedText,
    pub description: Option<LocalizedText>,
    /// Outbound references, stored once on this node in insertion order.
    pub references: Vec<Reference>,
    pub body: NodeBody,
}

impl UaNode {
    pub fn new(node_id: NodeId, browse_name: QualifiedName, body: NodeBody) -> Self {
        let display_name = LocalizedText::new(browse_name.name.clone());
        Self {
            node_id,
            browse_name,
            display_name,
            description: None,
            references: Vec::new(),
            body,
        }
    }

    pub fn node_class(&self) -> NodeClass {
        self.body.node_class()
    }

    /// Abstractness of type nodes; instance classes are never abstract.
    pub fn is_abstract(&self) -> bool {
        match &self.body {
            NodeBody::ObjectType { is_abstract }
            | NodeBody::DataType { is_abstract, .. }
            | NodeBody::VariableType { is_abstract, .. }
            | NodeBody::ReferenceType { is_abstract, .. } => *is_abstract,
            _ => false,
        }
    }
}

/// Class-specific attributes of a node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum NodeBody {
    Object {
        event_notifier: u8,
    },
    Variable {
        data_type: NodeId,
        value_rank: i32,
        array_dimensions: Option<Vec<u32>>,
    },
    Method {
        executable: bool,
    },
    ObjectType {
        is_abstract: bool,
    },
    VariableType {
        data_type: NodeId,
        value_rank: i32,
        array_dimensions: Option<Vec<u32>>,
        is_abstract: bool,
    },
    ReferenceType {
        is_abstract: bool,
        symmetric: bool,
        inverse_name: Option<LocalizedText>,
    },
    DataType {
        is_abstract: bool,
        definition: Option<DataTypeDefinition>,
    },
    View,
}

impl NodeBody {
    pub fn node_class(&self) -> NodeClass {
        match self {
            Self::Object { .. } => NodeClass::Object,
            Self::Variable { .. } => NodeClass::Variable,
            Self::Method { .. } => NodeClass::Method,
            Self::ObjectType { .. } => NodeClass::ObjectType,
            Self::VariableType { .. } => NodeClass::VariableType,
            Self::ReferenceType { .. } => NodeClass::ReferenceType,
            Self::DataType { .. } => NodeClass::DataType,
            Self::View => NodeClass::View,
        }
    }
}

/// Field-layout contract of a DataType node.
///
/// Supplied by the definition provider and consumed by extension-object
/// construction outside this core; stored here verbatim, never interpreted
/// as a binary encoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DataTypeDefinition {
    Structure(StructureDefinition),
    Enumeration(Vec<EnumField>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureDefinition {
    pub fields: Vec<StructureField>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureField {
    pub name: String,
    pub data_type: NodeId,
    pub value_rank: i32,
    pub is_optional: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumField {
    pub name: String,
    pub value: i64,
}
