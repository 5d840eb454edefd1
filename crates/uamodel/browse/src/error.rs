use uamodel_graph::GraphError;
use uamodel_types::NodeId;

/// Errors from the browse surface.
#[derive(Debug, thiserror::Error)]
pub enum BrowseError {
    #[error("continuation point is stale, cancelled or unknown")]
    BadContinuationPointInvalid,
    #[error("nothing to do: empty relative path")]
    BadNothingToDo,
    #[error("browse name invalid: empty target name in relative path")]
    BadBrowseNameInvalid,
    #[error("no match for relative path hop")]
    BadNoMatch,
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
