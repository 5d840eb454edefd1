use crate::error::BrowseError;
use uamodel_graph::{AddressSpace, ReferenceTypeRef};
use uamodel_types::{BrowseDirection, NodeId, QualifiedName};

/// One hop of a relative path: follow references of the given type (and
/// optionally its subtypes) to targets carrying `target_name`.
#[derive(Clone, Debug)]
pub struct RelativePathElement {
    /// Reference type filter; `None` follows hierarchical references.
    pub reference_type: Option<ReferenceTypeRef>,
    pub is_inverse: bool,
    pub include_subtypes: bool,
    pub target_name: Option<QualifiedName>,
}

impl RelativePathElement {
    pub fn hierarchical(target_name: impl Into<QualifiedName>) -> Self {
        Self {
            reference_type: None,
            is_inverse: false,
            include_subtypes: true,
            target_name: Some(target_name.into()),
        }
    }
}

/// Walk a relative path from a starting node, returning every node the full
/// path reaches.
///
/// Edge cases follow the browse-path service contract: an empty path is
/// [`BrowseError::BadNothingToDo`], an element without a target name is
/// [`BrowseError::BadBrowseNameInvalid`], and a hop matching nothing is
/// [`BrowseError::BadNoMatch`].
pub fn translate_browse_path(
    space: &AddressSpace,
    start: &NodeId,
    path: &[RelativePathElement],
) -> Result<Vec<NodeId>, BrowseError> {
    if path.is_empty() {
        return Err(BrowseError::BadNothingToDo);
    }
    if space.find_node(start).is_none() {
        return Err(BrowseError::NodeNotFound(start.clone()));
    }

    let mut current = vec![start.clone()];
    for element in path {
        let Some(target_name) = element.target_name.as_ref().filter(|n| !n.name.is_empty())
        else {
            return Err(BrowseError::BadBrowseNameInvalid);
        };
        let reference_type = element
            .reference_type
            .clone()
            .unwrap_or_else(|| uamodel_graph::standard::hierarchical_references().into());
        let direction = if element.is_inverse {
            BrowseDirection::Inverse
        } else {
            BrowseDirection::Forward
        };

        let mut next: Vec<NodeId> = Vec::new();
        for node in &current {
            let references = space.find_references_ex(
                node,
                reference_type.clone(),
                direction,
                element.include_subtypes,
            )?;
            for r in references {
                let Some(target) = space.find_node(&r.target) else {
                    continue;
                };
                if target.browse_name == *target_name && !next.contains(&r.target) {
                    next.push(r.target);
                }
            }
        }
        if next.is_empty() {
            return Err(BrowseError::BadNoMatch);
        }
        current = next;
    }
    Ok(current)
}
