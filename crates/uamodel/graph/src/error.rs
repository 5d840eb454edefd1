use uamodel_types::{NodeId, NodeIdParseError};

/// Errors from address-space operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(NodeId),
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("dangling reference endpoint: {0}")]
    DanglingReference(NodeId),
    #[error("duplicate reference {reference_type} from {from_node} to {target}")]
    DuplicateReference {
        from_node: NodeId,
        reference_type: NodeId,
        target: NodeId,
    },
    #[error("unknown reference type: {0}")]
    UnknownReferenceType(String),
    #[error("ambiguous name: {name} matches in namespaces {namespaces:?}")]
    AmbiguousName { name: String, namespaces: Vec<u16> },
    #[error("cannot instantiate abstract type: {0}")]
    AbstractTypeInstantiation(NodeId),
    #[error("node is not an instantiable type: {0}")]
    NotInstantiable(NodeId),
    #[error("subtype chain cycle detected at: {0}")]
    SubtypeCycle(NodeId),
    #[error("unresolved namespace dependency: required namespace {uri} is not present")]
    UnresolvedNamespaceDependency { uri: String },
    #[error("unknown namespace index: {0}")]
    UnknownNamespace(u16),
    #[error("invalid node id literal: {0}")]
    InvalidNodeId(#[from] NodeIdParseError),
    #[error("symbol cache row malformed: {0}")]
    SymbolCacheParse(String),
}
