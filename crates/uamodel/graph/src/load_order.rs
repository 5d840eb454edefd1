//! Namespace dependency ordering for load time: a namespace whose types
//! reference another namespace's types must be loaded after its dependency.

use crate::error::GraphError;
use std::collections::{BTreeMap, BTreeSet};
use uamodel_types::{NodeClass, NodeId, QualifiedName};

/// One namespace model as handed over by the loader: its URI and the URIs
/// it directly requires.
#[derive(Clone, Debug)]
pub struct ModelRequirement {
    pub uri: String,
    pub requires: Vec<String>,
}

impl ModelRequirement {
    pub fn new(uri: impl Into<String>, requires: Vec<String>) -> Self {
        Self {
            uri: uri.into(),
            requires,
        }
    }
}

/// A parsed type-level node description, as supplied by the loader. Only
/// the fields relevant to dependency scanning are carried here.
#[derive(Clone, Debug)]
pub struct TypeDescription {
    pub browse_name: QualifiedName,
    pub node_class: NodeClass,
    pub data_type: Option<NodeId>,
    pub subtype_of: Option<NodeId>,
}

/// The namespace indexes a set of type descriptions directly requires,
/// gathered by scanning every dataType and subtypeOf target.
pub fn required_namespaces(types: &[TypeDescription]) -> BTreeSet<u16> {
    let mut required = BTreeSet::new();
    for description in types {
        if let Some(data_type) = &description.data_type {
            required.insert(data_type.namespace);
        }
        if let Some(supertype) = &description.subtype_of {
            required.insert(supertype.namespace);
        }
    }
    required
}

/// Compute a load order consistent with the dependency partial order.
///
/// Priority is the size of a model's transitive dependency closure, so a
/// dependency always sorts before its dependents (if A requires B, A's
/// closure strictly contains B's) and the standard model, requiring
/// nothing, has priority 0 and loads first. Ties keep input order. A
/// required URI absent from the input set is a fatal
/// [`GraphError::UnresolvedNamespaceDependency`].
pub fn resolve_load_order(models: &[ModelRequirement]) -> Result<Vec<usize>, GraphError> {
    let by_uri: BTreeMap<&str, usize> = models
        .iter()
        .enumerate()
        .map(|(i, m)| (m.uri.as_str(), i))
        .collect();

    let mut priorities = Vec::with_capacity(models.len());
    for model in models {
        let mut closure: BTreeSet<usize> = BTreeSet::new();
        let mut stack: Vec<&str> = model.requires.iter().map(String::as_str).collect();
        while let Some(uri) = stack.pop() {
            let Some(&index) = by_uri.get(uri) else {
                return Err(GraphError::UnresolvedNamespaceDependency {
                    uri: uri.to_string(),
                });
            };
            if closure.insert(index) {
                stack.extend(models[index].requires.iter().map(String::as_str));
            }
        }
        priorities.push(closure.len());
    }

    let mut order: Vec<usize> = (0..models.len()).collect();
    order.sort_by_key(|&i| priorities[i]);
    tracing::debug!(?order, "namespace load order resolved");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard::STANDARD_NAMESPACE_URI;

    const DI: &str = "http://acme.example/UA/DI/";
    const MACHINERY: &str = "http://acme.example/UA/Machinery/";
    const PUMPS: &str = "http://acme.example/UA/Pumps/";

    #[test]
    fn standard_namespace_loads_first() {
        let models = vec![
            ModelRequirement::new(PUMPS, vec![MACHINERY.into(), STANDARD_NAMESPACE_URI.into()]),
            ModelRequirement::new(STANDARD_NAMESPACE_URI, vec![]),
            ModelRequirement::new(MACHINERY, vec![STANDARD_NAMESPACE_URI.into()]),
        ];
        let order = resolve_load_order(&models).unwrap();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn dependencies_sort_before_dependents() {
        let models = vec![
            ModelRequirement::new(STANDARD_NAMESPACE_URI, vec![]),
            ModelRequirement::new(DI, vec![STANDARD_NAMESPACE_URI.into()]),
            ModelRequirement::new(MACHINERY, vec![DI.into(), STANDARD_NAMESPACE_URI.into()]),
            ModelRequirement::new(PUMPS, vec![MACHINERY.into()]),
        ];
        let order = resolve_load_order(&models).unwrap();
        let position = |uri: &str| {
            order
                .iter()
                .position(|&i| models[i].uri == uri)
                .unwrap()
        };
        assert!(position(STANDARD_NAMESPACE_URI) < position(DI));
        assert!(position(DI) < position(MACHINERY));
        assert!(position(MACHINERY) < position(PUMPS));
    }

    #[test]
    fn ties_keep_input_order() {
        let models = vec![
            ModelRequirement::new(STANDARD_NAMESPACE_URI, vec![]),
            ModelRequirement::new(DI, vec![STANDARD_NAMESPACE_URI.into()]),
            ModelRequirement::new(MACHINERY, vec![STANDARD_NAMESPACE_URI.into()]),
        ];
        let order = resolve_load_order(&models).unwrap();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn missing_dependency_names_the_uri() {
        let models = vec![
            ModelRequirement::new(STANDARD_NAMESPACE_URI, vec![]),
            ModelRequirement::new(PUMPS, vec![MACHINERY.into()]),
        ];
        let err = resolve_load_order(&models).unwrap_err();
        match err {
            GraphError::UnresolvedNamespaceDependency { uri } => assert_eq!(uri, MACHINERY),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn required_namespaces_scans_type_targets() {
        let types = vec![
            TypeDescription {
                browse_name: QualifiedName::new(2, "PumpType"),
                node_class: NodeClass::ObjectType,
                data_type: None,
                subtype_of: Some(NodeId::new_numeric(1, 1002)),
            },
            TypeDescription {
                browse_name: QualifiedName::new(2, "FlowRate"),
                node_class: NodeClass::VariableType,
                data_type: Some(NodeId::new_numeric(0, 11)),
                subtype_of: Some(NodeId::new_numeric(0, 63)),
            },
        ];
        let required = required_namespaces(&types);
        assert_eq!(required.into_iter().collect::<Vec<_>>(), vec![0, 1]);
    }
}
