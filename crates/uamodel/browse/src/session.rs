use crate::continuation::{ContinuationPoint, ContinuationPointManager};
use serde::{Deserialize, Serialize};
use uamodel_graph::{AddressSpace, GraphError, ReferenceTypeRef};
use uamodel_types::{BrowseDirection, LocalizedText, NodeClass, NodeId, QualifiedName};

/// Protocol-facing status of a browse call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    Good,
    BadNodeIdUnknown,
    BadReferenceTypeInvalid,
    BadContinuationPointInvalid,
}

/// One reference as reported to a browse caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDescription {
    pub reference_type: NodeId,
    pub is_forward: bool,
    pub node_id: NodeId,
    pub browse_name: QualifiedName,
    pub display_name: LocalizedText,
    pub node_class: NodeClass,
    pub type_definition: Option<NodeId>,
}

/// What to browse and how.
#[derive(Clone, Debug)]
pub struct BrowseDescription {
    pub node_id: NodeId,
    /// Reference type filter; `None` browses every reference.
    pub reference_type: Option<ReferenceTypeRef>,
    pub direction: BrowseDirection,
    pub include_subtypes: bool,
    /// Node-class bit mask over the targets; 0 accepts every class.
    pub node_class_mask: u32,
    /// Per-call page size; 0 means unpaged.
    pub max_references: usize,
}

impl BrowseDescription {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            reference_type: None,
            direction: BrowseDirection::Forward,
            include_subtypes: true,
            node_class_mask: 0,
            max_references: 0,
        }
    }
}

/// Result of `browse` / `browse_next`.
#[derive(Clone, Debug)]
pub struct BrowseResult {
    pub status: StatusCode,
    pub references: Vec<ReferenceDescription>,
    pub continuation_point: Option<ContinuationPoint>,
}

impl BrowseResult {
    fn empty(status: StatusCode) -> Self {
        Self {
            status,
            references: Vec::new(),
            continuation_point: None,
        }
    }
}

/// The pagination-aware browse surface over an address space. Holds the
/// session's outstanding continuation points; the graph itself stays
/// untouched by pagination state.
pub struct BrowseSession {
    continuation_points: ContinuationPointManager<ReferenceDescription>,
    /// Cap on simultaneously outstanding continuation points (0 =
    /// unlimited).
    pub max_continuation_points: usize,
}

impl BrowseSession {
    pub fn new(max_continuation_points: usize) -> Self {
        Self {
            continuation_points: ContinuationPointManager::new(),
            max_continuation_points,
        }
    }

    pub fn has_reached_maximum(&self) -> bool {
        self.continuation_points
            .has_reached_maximum(self.max_continuation_points)
    }

    pub fn outstanding_continuation_points(&self) -> usize {
        self.continuation_points.outstanding()
    }

    /// Browse one node, truncating through the continuation-point manager
    /// when the caller caps the page size.
    pub fn browse(&mut self, space: &AddressSpace, description: &BrowseDescription) -> BrowseResult {
        if space.find_node(&description.node_id).is_none() {
            return BrowseResult::empty(StatusCode::BadNodeIdUnknown);
        }
        let reference_type = description
            .reference_type
            .clone()
            .unwrap_or_else(|| uamodel_graph::standard::references().into());
        let references = match space.find_references_ex(
            &description.node_id,
            reference_type,
            description.direction,
            description.include_subtypes,
        ) {
            Ok(references) => references,
            Err(GraphError::UnknownReferenceType(_)) | Err(GraphError::AmbiguousName { .. }) => {
                return BrowseResult::empty(StatusCode::BadReferenceTypeInvalid)
            }
            Err(_) => return BrowseResult::empty(StatusCode::BadNodeIdUnknown),
        };

        let descriptions: Vec<ReferenceDescription> = references
            .into_iter()
            .filter_map(|r| {
                let target = space.find_node(&r.target)?;
                if description.node_class_mask != 0
                    && description.node_class_mask & target.node_class().mask_bit() == 0
                {
                    return None;
                }
                Some(ReferenceDescription {
                    reference_type: r.reference_type,
                    is_forward: r.is_forward,
                    node_id: r.target.clone(),
                    browse_name: target.browse_name.clone(),
                    display_name: target.display_name.clone(),
                    node_class: target.node_class(),
                    type_definition: space.type_definition_of(&r.target),
                })
            })
            .collect();

        let (page, continuation_point) = self
            .continuation_points
            .register(description.max_references, descriptions);
        BrowseResult {
            status: StatusCode::Good,
            references: page,
            continuation_point,
        }
    }

    /// Continue (or release) a paged browse. With `release_only`, the
    /// retained remainder is freed and no references are returned.
    pub fn browse_next(&mut self, point: &ContinuationPoint, release_only: bool) -> BrowseResult {
        if release_only {
            return match self.continuation_points.cancel(point) {
                Ok(()) => BrowseResult::empty(StatusCode::Good),
                Err(_) => BrowseResult::empty(StatusCode::BadContinuationPointInvalid),
            };
        }
        match self.continuation_points.get_next(point) {
            Ok((references, continuation_point)) => BrowseResult {
                status: StatusCode::Good,
                references,
                continuation_point,
            },
            Err(_) => BrowseResult::empty(StatusCode::BadContinuationPointInvalid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uamodel_graph::{AddObjectOptions, AddressSpace};

    fn space_with_children(count: usize) -> (AddressSpace, NodeId) {
        let mut space = AddressSpace::new();
        let ns = space.register_namespace("http://acme.example/UA/");
        let mut options = AddObjectOptions::new(QualifiedName::new(ns, "Rack"));
        options.organized_by = Some(space.objects_folder());
        let rack = space.add_object(ns, options).unwrap();
        for i in 0..count {
            let mut options =
                AddObjectOptions::new(QualifiedName::new(ns, format!("Slot{}", i)));
            options.component_of = Some(rack.clone());
            space.add_object(ns, options).unwrap();
        }
        (space, rack)
    }

    #[test]
    fn unknown_node_is_reported() {
        let (space, _) = space_with_children(0);
        let mut session = BrowseSession::new(0);
        let result = session.browse(
            &space,
            &BrowseDescription::new(NodeId::new_numeric(7, 1)),
        );
        assert_eq!(result.status, StatusCode::BadNodeIdUnknown);
        assert!(result.references.is_empty());
    }

    #[test]
    fn unknown_reference_type_is_reported() {
        let (space, rack) = space_with_children(1);
        let mut session = BrowseSession::new(0);
        let mut description = BrowseDescription::new(rack);
        description.reference_type = Some("NoSuchReference".into());
        let result = session.browse(&space, &description);
        assert_eq!(result.status, StatusCode::BadReferenceTypeInvalid);
    }

    #[test]
    fn unpaged_browse_returns_everything() {
        let (space, rack) = space_with_children(4);
        let mut session = BrowseSession::new(0);
        let mut description = BrowseDescription::new(rack);
        description.reference_type = Some("HasComponent".into());
        let result = session.browse(&space, &description);
        assert_eq!(result.status, StatusCode::Good);
        assert_eq!(result.references.len(), 4);
        assert!(result.continuation_point.is_none());
    }

    #[test]
    fn paged_browse_chains_through_browse_next() {
        let (space, rack) = space_with_children(5);
        let mut session = BrowseSession::new(0);
        let mut description = BrowseDescription::new(rack);
        description.reference_type = Some("HasComponent".into());
        description.max_references = 2;

        let first = session.browse(&space, &description);
        assert_eq!(first.references.len(), 2);
        let point = first.continuation_point.unwrap();
        assert_eq!(session.outstanding_continuation_points(), 1);

        let second = session.browse_next(&point, false);
        assert_eq!(second.references.len(), 2);
        let third = session.browse_next(&second.continuation_point.unwrap(), false);
        assert_eq!(third.references.len(), 1);
        assert!(third.continuation_point.is_none());
        assert_eq!(session.outstanding_continuation_points(), 0);

        // Browse names arrive in insertion order across the pages.
        let names: Vec<&str> = first
            .references
            .iter()
            .chain(&second.references)
            .chain(&third.references)
            .map(|d| d.browse_name.name.as_str())
            .collect();
        assert_eq!(names, ["Slot0", "Slot1", "Slot2", "Slot3", "Slot4"]);
    }

    #[test]
    fn release_only_frees_the_point() {
        let (space, rack) = space_with_children(5);
        let mut session = BrowseSession::new(1);
        let mut description = BrowseDescription::new(rack);
        description.reference_type = Some("HasComponent".into());
        description.max_references = 2;

        let first = session.browse(&space, &description);
        let point = first.continuation_point.unwrap();
        assert!(session.has_reached_maximum());

        let released = session.browse_next(&point, true);
        assert_eq!(released.status, StatusCode::Good);
        assert!(released.references.is_empty());
        assert!(!session.has_reached_maximum());

        let stale = session.browse_next(&point, false);
        assert_eq!(stale.status, StatusCode::BadContinuationPointInvalid);
    }

    #[test]
    fn node_class_mask_filters_targets() {
        let (mut space, rack) = space_with_children(2);
        let ns = space.namespace_index_of("http://acme.example/UA/").unwrap();
        let mut options = uamodel_graph::AddVariableOptions::new(
            QualifiedName::new(ns, "Status"),
            NodeId::new_numeric(0, 12),
        );
        options.component_of = Some(rack.clone());
        space.add_variable(ns, options).unwrap();

        let mut session = BrowseSession::new(0);
        let mut description = BrowseDescription::new(rack);
        description.reference_type = Some("HasComponent".into());
        description.node_class_mask = NodeClass::Variable.mask_bit();
        let result = session.browse(&space, &description);
        assert_eq!(result.references.len(), 1);
        assert_eq!(result.references[0].browse_name.name, "Status");
    }

    #[test]
    fn inverse_browse_reports_the_parent() {
        let (space, rack) = space_with_children(0);
        let mut session = BrowseSession::new(0);
        let mut description = BrowseDescription::new(rack);
        description.reference_type = Some("Organizes".into());
        description.direction = BrowseDirection::Inverse;
        let result = session.browse(&space, &description);
        assert_eq!(result.status, StatusCode::Good);
        assert_eq!(result.references.len(), 1);
        assert_eq!(result.references[0].node_id, space.objects_folder());
        assert!(!result.references[0].is_forward);
    }
}
