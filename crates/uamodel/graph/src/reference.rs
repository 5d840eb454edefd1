use crate::error::GraphError;
use crate::space::AddressSpace;
use crate::standard;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uamodel_types::{BrowseDirection, NodeClass, NodeId};

/// A directed, typed edge to another node.
///
/// Stored exactly once, on its source node. The relationship is semantically
/// bidirectional: inverse-direction enumeration is a query over the address
/// space's inbound index, never a second stored edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference_type: NodeId,
    pub is_forward: bool,
    pub target: NodeId,
}

impl Reference {
    pub fn forward(reference_type: NodeId, target: NodeId) -> Self {
        Self {
            reference_type,
            is_forward: true,
            target,
        }
    }

    pub fn inverse(reference_type: NodeId, target: NodeId) -> Self {
        Self {
            reference_type,
            is_forward: false,
            target,
        }
    }
}

/// A reference type given either by id or by (possibly inverse) name.
#[derive(Clone, Debug)]
pub enum ReferenceTypeRef {
    Id(NodeId),
    Name(String),
}

impl From<NodeId> for ReferenceTypeRef {
    fn from(id: NodeId) -> Self {
        Self::Id(id)
    }
}

impl From<&NodeId> for ReferenceTypeRef {
    fn from(id: &NodeId) -> Self {
        Self::Id(id.clone())
    }
}

impl From<&str> for ReferenceTypeRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// Input to [`AddressSpace::normalize_reference_type`].
#[derive(Clone, Debug)]
pub struct ReferenceSpec {
    pub reference_type: ReferenceTypeRef,
    pub is_forward: bool,
    pub target: NodeId,
}

impl AddressSpace {
    /// Resolve a reference-type ref to its canonical node id. The returned
    /// flag is true when the name matched an inverse name, in which case the
    /// caller's direction must be flipped.
    pub(crate) fn resolve_reference_type(
        &self,
        reference_type: &ReferenceTypeRef,
    ) -> Result<(NodeId, bool), GraphError> {
        match reference_type {
            ReferenceTypeRef::Id(id) => {
                match self.find_node(id) {
                    Some(node) if node.node_class() == NodeClass::ReferenceType => {
                        Ok((id.clone(), false))
                    }
                    _ => Err(GraphError::UnknownReferenceType(id.to_string())),
                }
            }
            ReferenceTypeRef::Name(name) => {
                // A "1:Name" prefix restricts the search to that namespace.
                let (namespace, bare) = match name.split_once(':') {
                    Some((ns, rest)) => match ns.parse::<u16>() {
                        Ok(ns) => (Some(ns), rest),
                        Err(_) => (None, name.as_str()),
                    },
                    None => (None, name.as_str()),
                };

                let mut forward_hits = Vec::new();
                let mut inverse_hits = Vec::new();
                for namespace_entry in self.namespaces() {
                    if namespace.is_some_and(|ns| ns != namespace_entry.index) {
                        continue;
                    }
                    if let Some(id) = namespace_entry.type_id(NodeClass::ReferenceType, bare) {
                        forward_hits.push(id.clone());
                    }
                    for id in namespace_entry.reference_type_ids() {
                        if let Some(node) = self.find_node(id) {
                            if let crate::node::NodeBody::ReferenceType {
                                inverse_name: Some(inverse),
                                ..
                            } = &node.body
                            {
                                if inverse.text == bare {
                                    inverse_hits.push(id.clone());
                                }
                            }
                        }
                    }
                }

                // The canonical name wins over an inverse-name match.
                for (hits, flipped) in [(forward_hits, false), (inverse_hits, true)] {
                    if hits.len() > 1 {
                        return Err(GraphError::AmbiguousName {
                            name: bare.to_string(),
                            namespaces: hits.iter().map(|id| id.namespace).collect(),
                        });
                    }
                    if let Some(id) = hits.into_iter().next() {
                        return Ok((id, flipped));
                    }
                }
                Err(GraphError::UnknownReferenceType(name.clone()))
            }
        }
    }

    /// Normalize a reference spec to canonical form: the reference type
    /// resolved to its non-inverse node id, the direction flipped if the
    /// inverse name was used. Normalizing an already-canonical spec returns
    /// it unchanged.
    pub fn normalize_reference_type(&self, spec: &ReferenceSpec) -> Result<Reference, GraphError> {
        let (reference_type, flipped) = self.resolve_reference_type(&spec.reference_type)?;
        Ok(Reference {
            reference_type,
            is_forward: spec.is_forward != flipped,
            target: spec.target.clone(),
        })
    }

    /// The direct supertype of a type node, following `HasSubtype` upward.
    /// Handles both storage conventions: an inverse `HasSubtype` stored on
    /// the subtype, or a forward `HasSubtype` stored on the supertype.
    pub fn supertype_of(&self, type_id: &NodeId) -> Option<NodeId> {
        let has_subtype = standard::has_subtype();
        let node = self.find_node(type_id)?;
        for r in &node.references {
            if !r.is_forward && r.reference_type == has_subtype {
                return Some(r.target.clone());
            }
        }
        for source in self.inbound_sources(type_id) {
            let source_node = self.find_node(source)?;
            for r in &source_node.references {
                if r.is_forward && r.reference_type == has_subtype && r.target == *type_id {
                    return Some(source.clone());
                }
            }
        }
        None
    }

    /// True iff `ancestor` is reachable from `candidate` by zero or more
    /// `HasSubtype` hops toward supertypes. Reflexive. A cyclic subtype
    /// chain is an internal-error condition, not silent success.
    pub fn is_subtype_of(&self, candidate: &NodeId, ancestor: &NodeId) -> Result<bool, GraphError> {
        let mut visited = BTreeSet::new();
        let mut current = candidate.clone();
        loop {
            if current == *ancestor {
                return Ok(true);
            }
            if !visited.insert(current.clone()) {
                return Err(GraphError::SubtypeCycle(current));
            }
            match self.supertype_of(&current) {
                Some(supertype) => current = supertype,
                None => return Ok(false),
            }
        }
    }

    /// The ancestor chain of a type node, root-most supertype first, the
    /// node itself last.
    pub fn ancestors_of(&self, type_id: &NodeId) -> Result<Vec<NodeId>, GraphError> {
        let mut chain = vec![type_id.clone()];
        let mut visited: BTreeSet<NodeId> = chain.iter().cloned().collect();
        let mut current = type_id.clone();
        while let Some(supertype) = self.supertype_of(&current) {
            if !visited.insert(supertype.clone()) {
                return Err(GraphError::SubtypeCycle(supertype));
            }
            chain.push(supertype.clone());
            current = supertype;
        }
        chain.reverse();
        Ok(chain)
    }

    fn reference_type_matches(
        &self,
        candidate: &NodeId,
        requested: &NodeId,
        include_subtypes: bool,
    ) -> Result<bool, GraphError> {
        if candidate == requested {
            return Ok(true);
        }
        if include_subtypes {
            self.is_subtype_of(candidate, requested)
        } else {
            Ok(false)
        }
    }

    /// Every reference on `node_id` whose type equals the requested type
    /// (or a subtype of it, when `include_subtypes`) in the requested
    /// direction, as seen from `node_id`: the returned `target` is always
    /// the other end. Results are in insertion order of the underlying
    /// reference lists, outbound before inbound.
    pub fn find_references_ex(
        &self,
        node_id: &NodeId,
        reference_type: impl Into<ReferenceTypeRef>,
        direction: BrowseDirection,
        include_subtypes: bool,
    ) -> Result<Vec<Reference>, GraphError> {
        let (requested, flipped) = self.resolve_reference_type(&reference_type.into())?;
        let direction = if flipped {
            direction.inverted()
        } else {
            direction
        };

        let node = self
            .find_node(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.clone()))?;

        let mut out = Vec::new();
        for r in &node.references {
            if direction.matches(r.is_forward)
                && self.reference_type_matches(&r.reference_type, &requested, include_subtypes)?
            {
                out.push(r.clone());
            }
        }
        for source in self.inbound_sources(node_id) {
            let source_node = self
                .find_node(source)
                .ok_or_else(|| GraphError::NodeNotFound(source.clone()))?;
            for r in &source_node.references {
                if r.target == *node_id
                    && direction.matches(!r.is_forward)
                    && self.reference_type_matches(&r.reference_type, &requested, include_subtypes)?
                {
                    out.push(Reference {
                        reference_type: r.reference_type.clone(),
                        is_forward: !r.is_forward,
                        target: source.clone(),
                    });
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::AddressSpace;
    use crate::standard::{data_types, reference_types};

    fn ref_type_id(value: u32) -> NodeId {
        NodeId::new_numeric(0, value)
    }

    #[test]
    fn normalization_resolves_canonical_names() {
        let space = AddressSpace::new();
        let spec = ReferenceSpec {
            reference_type: "Organizes".into(),
            is_forward: true,
            target: space.objects_folder(),
        };
        let normalized = space.normalize_reference_type(&spec).unwrap();
        assert_eq!(normalized.reference_type, ref_type_id(reference_types::ORGANIZES));
        assert!(normalized.is_forward);
    }

    #[test]
    fn normalization_flips_inverse_names() {
        let space = AddressSpace::new();
        let spec = ReferenceSpec {
            reference_type: "OrganizedBy".into(),
            is_forward: true,
            target: space.objects_folder(),
        };
        let normalized = space.normalize_reference_type(&spec).unwrap();
        assert_eq!(normalized.reference_type, ref_type_id(reference_types::ORGANIZES));
        assert!(!normalized.is_forward);
    }

    #[test]
    fn normalization_is_idempotent() {
        let space = AddressSpace::new();
        for (name, is_forward) in [
            ("Organizes", true),
            ("OrganizedBy", false),
            ("ComponentOf", true),
            ("HasProperty", false),
        ] {
            let first = space
                .normalize_reference_type(&ReferenceSpec {
                    reference_type: name.into(),
                    is_forward,
                    target: space.objects_folder(),
                })
                .unwrap();
            let second = space
                .normalize_reference_type(&ReferenceSpec {
                    reference_type: first.reference_type.clone().into(),
                    is_forward: first.is_forward,
                    target: first.target.clone(),
                })
                .unwrap();
            assert_eq!(second, first);
        }
    }

    #[test]
    fn unknown_reference_type_name_errors() {
        let space = AddressSpace::new();
        let err = space
            .resolve_reference_type(&"NoSuchReference".into())
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownReferenceType(_)));
    }

    #[test]
    fn subtype_ladder_is_reflexive_and_transitive() {
        let space = AddressSpace::new();
        let int16 = NodeId::new_numeric(0, data_types::INT16);
        let integer = NodeId::new_numeric(0, data_types::INTEGER);
        let number = NodeId::new_numeric(0, data_types::NUMBER);
        let uint32 = NodeId::new_numeric(0, data_types::UINT32);

        assert!(space.is_subtype_of(&int16, &int16).unwrap());
        assert!(space.is_subtype_of(&int16, &integer).unwrap());
        assert!(space.is_subtype_of(&int16, &number).unwrap());
        assert!(!space.is_subtype_of(&integer, &uint32).unwrap());
    }

    #[test]
    fn ancestors_are_root_most_first() {
        let space = AddressSpace::new();
        let int16 = NodeId::new_numeric(0, data_types::INT16);
        let chain = space.ancestors_of(&int16).unwrap();
        let names: Vec<String> = chain
            .iter()
            .map(|id| space.find_node(id).unwrap().browse_name.name.clone())
            .collect();
        assert_eq!(names, ["BaseDataType", "Number", "Integer", "Int16"]);
    }

    #[test]
    fn reference_subtype_closure() {
        let space = AddressSpace::new();
        let has_component = ref_type_id(reference_types::HAS_COMPONENT);
        let aggregates = ref_type_id(reference_types::AGGREGATES);
        let organizes = ref_type_id(reference_types::ORGANIZES);
        assert!(space.is_subtype_of(&has_component, &aggregates).unwrap());
        assert!(!space.is_subtype_of(&organizes, &aggregates).unwrap());
    }

    #[test]
    fn cyclic_subtype_chains_error_instead_of_looping() {
        use crate::node::{NodeBody, UaNode};
        use uamodel_types::QualifiedName;

        let mut space = AddressSpace::new();
        let ns = space.register_namespace("http://acme.example/UA/");
        let x = NodeId::new_numeric(ns, 2000);
        let y = NodeId::new_numeric(ns, 2001);
        space
            .insert_node(UaNode::new(
                x.clone(),
                QualifiedName::new(ns, "CycleX"),
                NodeBody::ObjectType { is_abstract: false },
            ))
            .unwrap();
        space
            .insert_node(UaNode::new(
                y.clone(),
                QualifiedName::new(ns, "CycleY"),
                NodeBody::ObjectType { is_abstract: false },
            ))
            .unwrap();
        space
            .add_reference(&x, Reference::forward(crate::standard::has_subtype(), y.clone()))
            .unwrap();
        space
            .add_reference(&y, Reference::forward(crate::standard::has_subtype(), x.clone()))
            .unwrap();

        let probe = NodeId::new_numeric(0, crate::standard::object_types::BASE_OBJECT_TYPE);
        let err = space.is_subtype_of(&x, &probe).unwrap_err();
        assert!(matches!(err, GraphError::SubtypeCycle(_)));
        let err = space.ancestors_of(&x).unwrap_err();
        assert!(matches!(err, GraphError::SubtypeCycle(_)));
    }

    #[test]
    fn find_references_ex_inverse_surfaces_inbound_edges() {
        let space = AddressSpace::new();
        // Objects is organized by Root; the edge is stored on Root.
        let refs = space
            .find_references_ex(
                &space.objects_folder(),
                "Organizes",
                uamodel_types::BrowseDirection::Inverse,
                true,
            )
            .unwrap();
        assert!(refs.iter().any(|r| r.target == space.root_folder() && !r.is_forward));
    }

    #[test]
    fn find_references_ex_via_inverse_name_flips_direction() {
        let space = AddressSpace::new();
        // "OrganizedBy" Forward is the same query as "Organizes" Inverse.
        let refs = space
            .find_references_ex(
                &space.objects_folder(),
                "OrganizedBy",
                uamodel_types::BrowseDirection::Forward,
                true,
            )
            .unwrap();
        assert!(refs.iter().any(|r| r.target == space.root_folder()));
    }
}
