use crate::id_manager::NodeIdManager;
use std::collections::BTreeMap;
use uamodel_types::{NodeClass, NodeId};

/// A logical partition of the address space: a URI, an id allocator, and
/// browse-name registries for the node classes that are looked up by name.
///
/// Namespace index 0 is the standard, pre-loaded model and is read-mostly.
/// The namespace does not own its nodes; the address space's global index
/// does.
#[derive(Clone, Debug)]
pub struct Namespace {
    pub index: u16,
    pub uri: String,
    pub id_manager: NodeIdManager,
    object_types: BTreeMap<String, NodeId>,
    variable_types: BTreeMap<String, NodeId>,
    reference_types: BTreeMap<String, NodeId>,
    data_types: BTreeMap<String, NodeId>,
    methods: BTreeMap<String, NodeId>,
}

impl Namespace {
    pub fn new(index: u16, uri: impl Into<String>) -> Self {
        Self {
            index,
            uri: uri.into(),
            id_manager: NodeIdManager::new(index),
            object_types: BTreeMap::new(),
            variable_types: BTreeMap::new(),
            reference_types: BTreeMap::new(),
            data_types: BTreeMap::new(),
            methods: BTreeMap::new(),
        }
    }

    fn registry(&self, class: NodeClass) -> Option<&BTreeMap<String, NodeId>> {
        match class {
            NodeClass::ObjectType => Some(&self.object_types),
            NodeClass::VariableType => Some(&self.variable_types),
            NodeClass::ReferenceType => Some(&self.reference_types),
            NodeClass::DataType => Some(&self.data_types),
            NodeClass::Method => Some(&self.methods),
            _ => None,
        }
    }

    fn registry_mut(&mut self, class: NodeClass) -> Option<&mut BTreeMap<String, NodeId>> {
        match class {
            NodeClass::ObjectType => Some(&mut self.object_types),
            NodeClass::VariableType => Some(&mut self.variable_types),
            NodeClass::ReferenceType => Some(&mut self.reference_types),
            NodeClass::DataType => Some(&mut self.data_types),
            NodeClass::Method => Some(&mut self.methods),
            _ => None,
        }
    }

    /// Index a type or method node under its bare browse name. Other node
    /// classes are not name-indexed and pass through unrecorded.
    pub(crate) fn register_name(&mut self, class: NodeClass, name: &str, id: NodeId) {
        if let Some(registry) = self.registry_mut(class) {
            registry.insert(name.to_string(), id);
        }
    }

    pub(crate) fn unregister_name(&mut self, class: NodeClass, name: &str) {
        if let Some(registry) = self.registry_mut(class) {
            registry.remove(name);
        }
    }

    pub fn type_id(&self, class: NodeClass, name: &str) -> Option<&NodeId> {
        self.registry(class).and_then(|r| r.get(name))
    }

    pub fn reference_type_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.reference_types.values()
    }

    pub(crate) fn clear(&mut self) {
        self.object_types.clear();
        self.variable_types.clear();
        self.reference_types.clear();
        self.data_types.clear();
        self.methods.clear();
    }
}
