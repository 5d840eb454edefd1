use crate::error::GraphError;
use crate::id_manager::{NodeIdOptions, NodeIdSpec, ParentContext, ParentRelation};
use crate::namespace::Namespace;
use crate::node::{DataTypeDefinition, EnumField, NodeBody, UaNode};
use crate::reference::Reference;
use crate::standard;
use std::collections::BTreeMap;
use std::rc::Rc;
use uamodel_types::{BrowseDirection, LocalizedText, ModellingRule, NodeClass, NodeId, QualifiedName};

/// Hook invoked once per instantiation, after the whole instance subtree has
/// been materialized.
pub type PostInstantiateHook = Rc<dyn Fn(&mut AddressSpace, &NodeId)>;

/// The top-level container: ordered namespaces, the global node index, the
/// inbound-reference index and the well-known root folders.
///
/// Designed for single-threaded, synchronous use; every mutating operation
/// takes `&mut self`, so the single-writer rule is enforced by the borrow
/// checker. Multi-threaded hosts serialize graph-mutating calls externally.
pub struct AddressSpace {
    namespaces: Vec<Namespace>,
    nodes: BTreeMap<NodeId, UaNode>,
    /// target node -> source nodes holding a reference to it. Lets
    /// inverse-direction browsing stay a query instead of a second stored
    /// edge.
    inbound: BTreeMap<NodeId, Vec<NodeId>>,
    default_namespace: Option<u16>,
    pub(crate) hooks: BTreeMap<NodeId, PostInstantiateHook>,
    disposed: bool,
}

impl AddressSpace {
    /// A fresh address space with the standard namespace pre-loaded.
    pub fn new() -> Self {
        let mut space = Self {
            namespaces: vec![Namespace::new(0, standard::STANDARD_NAMESPACE_URI)],
            nodes: BTreeMap::new(),
            inbound: BTreeMap::new(),
            default_namespace: None,
            hooks: BTreeMap::new(),
            disposed: false,
        };
        standard::populate(&mut space).expect("standard namespace is well-formed");
        space
    }

    // ── namespaces ──────────────────────────────────────────────────

    /// Register (or resolve) a namespace by URI. The first registered
    /// non-standard namespace becomes the default working namespace.
    pub fn register_namespace(&mut self, uri: &str) -> u16 {
        if let Some(ns) = self.namespaces.iter().find(|ns| ns.uri == uri) {
            return ns.index;
        }
        let index = self.namespaces.len() as u16;
        tracing::debug!(uri, index, "namespace registered");
        self.namespaces.push(Namespace::new(index, uri));
        index
    }

    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    pub fn namespace(&self, index: u16) -> Option<&Namespace> {
        self.namespaces.get(index as usize)
    }

    pub fn namespace_mut(&mut self, index: u16) -> Option<&mut Namespace> {
        self.namespaces.get_mut(index as usize)
    }

    pub fn namespace_index_of(&self, uri: &str) -> Option<u16> {
        self.namespaces.iter().find(|ns| ns.uri == uri).map(|ns| ns.index)
    }

    /// The namespace new nodes land in when the caller does not say
    /// otherwise: an explicit override if set, else the first registered
    /// non-standard namespace, else 0.
    pub fn default_namespace(&self) -> u16 {
        self.default_namespace
            .unwrap_or(if self.namespaces.len() > 1 { 1 } else { 0 })
    }

    pub fn set_default_namespace(&mut self, index: u16) {
        self.default_namespace = Some(index);
    }

    // ── node index ──────────────────────────────────────────────────

    pub fn find_node(&self, node_id: &NodeId) -> Option<&UaNode> {
        self.nodes.get(node_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn inbound_sources(&self, target: &NodeId) -> &[NodeId] {
        self.inbound.get(target).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Insert a fully-built node, indexing its browse name and reserving its
    /// numeric id. This is the loader-facing low-level entry point; the
    /// `add_*` methods and the instantiation engine build on it.
    pub fn insert_node(&mut self, node: UaNode) -> Result<(), GraphError> {
        if self.nodes.contains_key(&node.node_id) {
            return Err(GraphError::DuplicateNodeId(node.node_id));
        }
        let Some(namespace) = self.namespaces.get_mut(node.node_id.namespace as usize) else {
            return Err(GraphError::UnknownNamespace(node.node_id.namespace));
        };
        if let Some(v) = node.node_id.as_numeric() {
            namespace.id_manager.register_numeric(v);
        }
        namespace.register_name(node.node_class(), &node.browse_name.name, node.node_id.clone());
        tracing::trace!(node_id = %node.node_id, class = %node.node_class(), "node inserted");
        self.nodes.insert(node.node_id.clone(), node);
        Ok(())
    }

    /// Remove a node and every edge touching it. Used by instantiation
    /// rollback; issued ids are deliberately not recycled.
    pub(crate) fn remove_node(&mut self, node_id: &NodeId) {
        let Some(node) = self.nodes.remove(node_id) else {
            return;
        };
        if let Some(namespace) = self.namespaces.get_mut(node_id.namespace as usize) {
            namespace.unregister_name(node.node_class(), &node.browse_name.name);
        }
        if let Some(sources) = self.inbound.remove(node_id) {
            for source in sources {
                if let Some(source_node) = self.nodes.get_mut(&source) {
                    source_node.references.retain(|r| r.target != *node_id);
                }
            }
        }
        for r in &node.references {
            if let Some(list) = self.inbound.get_mut(&r.target) {
                list.retain(|s| s != node_id);
            }
        }
    }

    // ── references ──────────────────────────────────────────────────

    /// Store a reference on its source node. Both endpoints and the
    /// reference type must exist; an identical edge may be stored only once.
    pub fn add_reference(&mut self, source: &NodeId, reference: Reference) -> Result<(), GraphError> {
        match self.find_node(&reference.reference_type) {
            Some(node) if node.node_class() == NodeClass::ReferenceType => {}
            _ => {
                return Err(GraphError::UnknownReferenceType(
                    reference.reference_type.to_string(),
                ))
            }
        }
        if self.find_node(&reference.target).is_none() {
            return Err(GraphError::DanglingReference(reference.target));
        }
        let Some(source_node) = self.nodes.get_mut(source) else {
            return Err(GraphError::DanglingReference(source.clone()));
        };
        if source_node.references.contains(&reference) {
            return Err(GraphError::DuplicateReference {
                from_node: source.clone(),
                reference_type: reference.reference_type,
                target: reference.target,
            });
        }
        let target = reference.target.clone();
        source_node.references.push(reference);
        let sources = self.inbound.entry(target).or_default();
        if !sources.contains(source) {
            sources.push(source.clone());
        }
        Ok(())
    }

    /// Remove one previously stored edge (instantiation rollback support).
    pub(crate) fn remove_reference(&mut self, source: &NodeId, reference: &Reference) {
        if let Some(source_node) = self.nodes.get_mut(source) {
            source_node.references.retain(|r| r != reference);
            let still_referenced = source_node
                .references
                .iter()
                .any(|r| r.target == reference.target);
            if !still_referenced {
                if let Some(list) = self.inbound.get_mut(&reference.target) {
                    list.retain(|s| s != source);
                }
            }
        }
    }

    // ── well-known folders ──────────────────────────────────────────

    pub fn root_folder(&self) -> NodeId {
        NodeId::new_numeric(0, standard::objects::ROOT_FOLDER)
    }

    pub fn objects_folder(&self) -> NodeId {
        NodeId::new_numeric(0, standard::objects::OBJECTS_FOLDER)
    }

    pub fn types_folder(&self) -> NodeId {
        NodeId::new_numeric(0, standard::objects::TYPES_FOLDER)
    }

    pub fn views_folder(&self) -> NodeId {
        NodeId::new_numeric(0, standard::objects::VIEWS_FOLDER)
    }

    // ── name lookup ─────────────────────────────────────────────────

    /// Look up a type or method node by bare browse name. With no namespace
    /// index, the name must be unique across all loaded namespaces; a
    /// collision is an `AmbiguousName` error, never an arbitrary pick.
    pub fn find_type(
        &self,
        class: NodeClass,
        name: &str,
        namespace: Option<u16>,
    ) -> Result<Option<&UaNode>, GraphError> {
        let id = match namespace {
            Some(ns) => self
                .namespace(ns)
                .and_then(|entry| entry.type_id(class, name))
                .cloned(),
            None => {
                let hits: Vec<NodeId> = self
                    .namespaces
                    .iter()
                    .filter_map(|entry| entry.type_id(class, name).cloned())
                    .collect();
                if hits.len() > 1 {
                    return Err(GraphError::AmbiguousName {
                        name: name.to_string(),
                        namespaces: hits.iter().map(|id| id.namespace).collect(),
                    });
                }
                hits.into_iter().next()
            }
        };
        Ok(id.as_ref().and_then(|id| self.find_node(id)))
    }

    pub fn find_object_type(
        &self,
        name: &str,
        namespace: Option<u16>,
    ) -> Result<Option<&UaNode>, GraphError> {
        self.find_type(NodeClass::ObjectType, name, namespace)
    }

    pub fn find_variable_type(
        &self,
        name: &str,
        namespace: Option<u16>,
    ) -> Result<Option<&UaNode>, GraphError> {
        self.find_type(NodeClass::VariableType, name, namespace)
    }

    pub fn find_reference_type(
        &self,
        name: &str,
        namespace: Option<u16>,
    ) -> Result<Option<&UaNode>, GraphError> {
        self.find_type(NodeClass::ReferenceType, name, namespace)
    }

    pub fn find_data_type(
        &self,
        name: &str,
        namespace: Option<u16>,
    ) -> Result<Option<&UaNode>, GraphError> {
        self.find_type(NodeClass::DataType, name, namespace)
    }

    // ── child accessors ─────────────────────────────────────────────

    fn child_by_name(
        &self,
        node_id: &NodeId,
        reference_type: NodeId,
        name: &str,
        namespace: Option<u16>,
        class_filter: Option<NodeClass>,
    ) -> Result<Option<NodeId>, GraphError> {
        let refs = self.find_references_ex(node_id, reference_type, BrowseDirection::Forward, true)?;
        let mut hits: Vec<NodeId> = Vec::new();
        for r in refs {
            let Some(child) = self.find_node(&r.target) else {
                continue;
            };
            if child.browse_name.name != name {
                continue;
            }
            if let Some(class) = class_filter {
                if child.node_class() != class {
                    continue;
                }
            }
            if let Some(ns) = namespace {
                if child.browse_name.namespace != ns {
                    continue;
                }
            }
            if !hits.contains(&r.target) {
                hits.push(r.target);
            }
        }
        let namespaces: Vec<u16> = {
            let mut seen: Vec<u16> = Vec::new();
            for id in &hits {
                if let Some(node) = self.find_node(id) {
                    if !seen.contains(&node.browse_name.namespace) {
                        seen.push(node.browse_name.namespace);
                    }
                }
            }
            seen
        };
        if namespace.is_none() && namespaces.len() > 1 {
            return Err(GraphError::AmbiguousName {
                name: name.to_string(),
                namespaces,
            });
        }
        Ok(hits.into_iter().next())
    }

    /// Component lookup by bare name; ambiguous across namespaces without a
    /// namespace index is an error, not an arbitrary match.
    pub fn get_component_by_name(
        &self,
        node_id: &NodeId,
        name: &str,
        namespace: Option<u16>,
    ) -> Result<Option<NodeId>, GraphError> {
        self.child_by_name(node_id, standard::has_component(), name, namespace, None)
    }

    pub fn get_property_by_name(
        &self,
        node_id: &NodeId,
        name: &str,
        namespace: Option<u16>,
    ) -> Result<Option<NodeId>, GraphError> {
        self.child_by_name(node_id, standard::has_property(), name, namespace, None)
    }

    pub fn get_method_by_name(
        &self,
        node_id: &NodeId,
        name: &str,
        namespace: Option<u16>,
    ) -> Result<Option<NodeId>, GraphError> {
        self.child_by_name(
            node_id,
            standard::has_component(),
            name,
            namespace,
            Some(NodeClass::Method),
        )
    }

    // ── type-level annotations ──────────────────────────────────────

    /// The target of the node's forward `HasTypeDefinition` reference.
    pub fn type_definition_of(&self, node_id: &NodeId) -> Option<NodeId> {
        let node = self.find_node(node_id)?;
        let has_type_definition = standard::has_type_definition();
        node.references
            .iter()
            .find(|r| r.is_forward && r.reference_type == has_type_definition)
            .map(|r| r.target.clone())
    }

    /// The modelling rule attached to a type-level node, if any.
    pub fn modelling_rule_of(&self, node_id: &NodeId) -> Option<ModellingRule> {
        let node = self.find_node(node_id)?;
        let has_modelling_rule = standard::has_modelling_rule();
        node.references
            .iter()
            .find(|r| r.is_forward && r.reference_type == has_modelling_rule)
            .and_then(|r| standard::modelling_rule_from_node_id(&r.target))
    }

    /// Dot-joined chain of ancestor browse names, following the aggregation
    /// hierarchy upward. This is the symbolic path used by the id cache.
    pub fn browse_name_path(&self, node_id: &NodeId) -> String {
        let mut segments: Vec<String> = Vec::new();
        let mut current = node_id.clone();
        let mut guard = 0;
        loop {
            let Some(node) = self.find_node(&current) else {
                break;
            };
            segments.push(node.browse_name.name.clone());
            guard += 1;
            if guard > 64 {
                break;
            }
            let parent = self
                .find_references_ex(
                    &current,
                    standard::aggregates(),
                    BrowseDirection::Inverse,
                    true,
                )
                .ok()
                .and_then(|refs| refs.into_iter().next());
            match parent {
                Some(r) => current = r.target,
                None => break,
            }
        }
        segments.reverse();
        segments.join(".")
    }

    // ── node creation entry points ──────────────────────────────────

    pub(crate) fn create_node(&mut self, request: NewNode) -> Result<NodeId, GraphError> {
        let NewNode {
            namespace,
            browse_name,
            node_id,
            display_name,
            description,
            body,
            parent,
            type_definition,
            modelling_rule,
            subtype_of,
        } = request;

        if self.namespace(namespace).is_none() {
            return Err(GraphError::UnknownNamespace(namespace));
        }

        // Work out the id-derivation context before borrowing the manager.
        let parent_ctx = match &parent {
            Some((parent_id, reference_type)) => {
                if self.find_node(parent_id).is_none() {
                    return Err(GraphError::DanglingReference(parent_id.clone()));
                }
                let relation = self.parent_relation(reference_type)?;
                let symbolic_path = self.browse_name_path(parent_id);
                Some((parent_id.clone(), relation, symbolic_path))
            }
            None => None,
        };

        let Some(namespace_entry) = self.namespaces.get_mut(namespace as usize) else {
            return Err(GraphError::UnknownNamespace(namespace));
        };
        let new_id = namespace_entry.id_manager.construct_node_id(NodeIdOptions {
            node_id,
            browse_name: &browse_name,
            node_class: body.node_class(),
            parent: parent_ctx.as_ref().map(|(id, relation, path)| ParentContext {
                node_id: id,
                relation: *relation,
                symbolic_path: path,
            }),
        })?;

        let mut node = UaNode::new(new_id.clone(), browse_name, body);
        if let Some(display_name) = display_name {
            node.display_name = display_name;
        }
        node.description = description;
        self.insert_node(node)?;

        let linked = (|| -> Result<(), GraphError> {
            if let Some((parent_id, reference_type)) = parent {
                self.add_reference(&parent_id, Reference::forward(reference_type, new_id.clone()))?;
            }
            if let Some(type_definition) = type_definition {
                self.add_reference(
                    &new_id,
                    Reference::forward(standard::has_type_definition(), type_definition),
                )?;
            }
            if let Some(rule) = modelling_rule {
                self.add_reference(
                    &new_id,
                    Reference::forward(
                        standard::has_modelling_rule(),
                        standard::modelling_rule_node_id(rule),
                    ),
                )?;
            }
            if let Some(supertype) = subtype_of {
                self.add_reference(
                    &supertype,
                    Reference::forward(standard::has_subtype(), new_id.clone()),
                )?;
            }
            Ok(())
        })();
        if let Err(e) = linked {
            self.remove_node(&new_id);
            return Err(e);
        }
        Ok(new_id)
    }

    /// Classify a parent-linking reference type for id derivation.
    pub(crate) fn parent_relation(&self, reference_type: &NodeId) -> Result<ParentRelation, GraphError> {
        if self.is_subtype_of(reference_type, &standard::has_property())? {
            Ok(ParentRelation::Property)
        } else if self.is_subtype_of(reference_type, &standard::aggregates())? {
            Ok(ParentRelation::Component)
        } else {
            Ok(ParentRelation::Organizes)
        }
    }

    pub fn add_object(&mut self, namespace: u16, options: AddObjectOptions) -> Result<NodeId, GraphError> {
        let parent = if let Some(parent_id) = options.component_of {
            Some((parent_id, standard::has_component()))
        } else {
            options
                .organized_by
                .map(|parent_id| (parent_id, standard::organizes()))
        };
        self.create_node(NewNode {
            namespace,
            browse_name: options.browse_name,
            node_id: options.node_id,
            display_name: options.display_name,
            description: options.description,
            body: NodeBody::Object {
                event_notifier: options.event_notifier,
            },
            parent,
            type_definition: Some(options.type_definition.unwrap_or_else(|| {
                NodeId::new_numeric(0, standard::object_types::BASE_OBJECT_TYPE)
            })),
            modelling_rule: options.modelling_rule,
            subtype_of: None,
        })
    }

    /// Convenience for `FolderType` objects organized under a parent folder.
    pub fn add_folder(&mut self, namespace: u16, options: AddFolderOptions) -> Result<NodeId, GraphError> {
        self.add_object(
            namespace,
            AddObjectOptions {
                browse_name: options.browse_name,
                node_id: options.node_id,
                display_name: options.display_name,
                description: options.description,
                type_definition: Some(NodeId::new_numeric(0, standard::object_types::FOLDER_TYPE)),
                organized_by: options.organized_by,
                component_of: None,
                modelling_rule: options.modelling_rule,
                event_notifier: 0,
            },
        )
    }

    pub fn add_variable(&mut self, namespace: u16, options: AddVariableOptions) -> Result<NodeId, GraphError> {
        let default_type = if options.property_of.is_some() {
            standard::variable_types::PROPERTY_TYPE
        } else {
            standard::variable_types::BASE_DATA_VARIABLE_TYPE
        };
        let parent = if let Some(parent_id) = options.property_of {
            Some((parent_id, standard::has_property()))
        } else if let Some(parent_id) = options.component_of {
            Some((parent_id, standard::has_component()))
        } else {
            options
                .organized_by
                .map(|parent_id| (parent_id, standard::organizes()))
        };
        self.create_node(NewNode {
            namespace,
            browse_name: options.browse_name,
            node_id: options.node_id,
            display_name: options.display_name,
            description: options.description,
            body: NodeBody::Variable {
                data_type: options.data_type,
                value_rank: options.value_rank,
                array_dimensions: options.array_dimensions,
            },
            parent,
            type_definition: Some(
                options
                    .type_definition
                    .unwrap_or_else(|| NodeId::new_numeric(0, default_type)),
            ),
            modelling_rule: options.modelling_rule,
            subtype_of: None,
        })
    }

    pub fn add_method(&mut self, namespace: u16, options: AddMethodOptions) -> Result<NodeId, GraphError> {
        self.create_node(NewNode {
            namespace,
            browse_name: options.browse_name,
            node_id: options.node_id,
            display_name: options.display_name,
            description: options.description,
            body: NodeBody::Method {
                executable: options.executable,
            },
            parent: options
                .component_of
                .map(|parent_id| (parent_id, standard::has_component())),
            type_definition: None,
            modelling_rule: options.modelling_rule,
            subtype_of: None,
        })
    }

    pub fn add_object_type(
        &mut self,
        namespace: u16,
        options: AddObjectTypeOptions,
    ) -> Result<NodeId, GraphError> {
        self.create_node(NewNode {
            namespace,
            browse_name: options.browse_name,
            node_id: options.node_id,
            display_name: options.display_name,
            description: options.description,
            body: NodeBody::ObjectType {
                is_abstract: options.is_abstract,
            },
            parent: None,
            type_definition: None,
            modelling_rule: None,
            subtype_of: Some(options.subtype_of.unwrap_or_else(|| {
                NodeId::new_numeric(0, standard::object_types::BASE_OBJECT_TYPE)
            })),
        })
    }

    pub fn add_variable_type(
        &mut self,
        namespace: u16,
        options: AddVariableTypeOptions,
    ) -> Result<NodeId, GraphError> {
        self.create_node(NewNode {
            namespace,
            browse_name: options.browse_name,
            node_id: options.node_id,
            display_name: options.display_name,
            description: options.description,
            body: NodeBody::VariableType {
                data_type: options.data_type,
                value_rank: options.value_rank,
                array_dimensions: options.array_dimensions,
                is_abstract: options.is_abstract,
            },
            parent: None,
            type_definition: None,
            modelling_rule: None,
            subtype_of: Some(options.subtype_of.unwrap_or_else(|| {
                NodeId::new_numeric(0, standard::variable_types::BASE_VARIABLE_TYPE)
            })),
        })
    }

    pub fn add_reference_type(
        &mut self,
        namespace: u16,
        options: AddReferenceTypeOptions,
    ) -> Result<NodeId, GraphError> {
        self.create_node(NewNode {
            namespace,
            browse_name: options.browse_name,
            node_id: options.node_id,
            display_name: options.display_name,
            description: options.description,
            body: NodeBody::ReferenceType {
                is_abstract: options.is_abstract,
                symmetric: options.symmetric,
                inverse_name: options.inverse_name.map(LocalizedText::new),
            },
            parent: None,
            type_definition: None,
            modelling_rule: None,
            subtype_of: Some(
                options
                    .subtype_of
                    .unwrap_or_else(standard::references),
            ),
        })
    }

    pub fn add_enumeration_type(
        &mut self,
        namespace: u16,
        options: AddEnumerationTypeOptions,
    ) -> Result<NodeId, GraphError> {
        self.create_node(NewNode {
            namespace,
            browse_name: options.browse_name,
            node_id: options.node_id,
            display_name: options.display_name,
            description: options.description,
            body: NodeBody::DataType {
                is_abstract: false,
                definition: Some(DataTypeDefinition::Enumeration(options.values)),
            },
            parent: None,
            type_definition: None,
            modelling_rule: None,
            subtype_of: Some(NodeId::new_numeric(0, standard::data_types::ENUMERATION)),
        })
    }

    pub fn create_data_type(
        &mut self,
        namespace: u16,
        options: CreateDataTypeOptions,
    ) -> Result<NodeId, GraphError> {
        self.create_node(NewNode {
            namespace,
            browse_name: options.browse_name,
            node_id: options.node_id,
            display_name: options.display_name,
            description: options.description,
            body: NodeBody::DataType {
                is_abstract: options.is_abstract,
                definition: options.definition,
            },
            parent: None,
            type_definition: None,
            modelling_rule: None,
            subtype_of: Some(options.subtype_of.unwrap_or_else(|| {
                NodeId::new_numeric(0, standard::data_types::BASE_DATA_TYPE)
            })),
        })
    }

    // ── lifecycle ───────────────────────────────────────────────────

    /// Release every node and index. Calling dispose twice is a guarded
    /// no-op; the graph must not be used afterwards.
    pub fn dispose(&mut self) {
        if self.disposed {
            tracing::warn!("address space already disposed");
            return;
        }
        self.nodes.clear();
        self.inbound.clear();
        self.hooks.clear();
        for namespace in &mut self.namespaces {
            namespace.clear();
        }
        self.disposed = true;
        tracing::debug!("address space disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal creation request shared by every `add_*` entry point.
pub(crate) struct NewNode {
    pub namespace: u16,
    pub browse_name: QualifiedName,
    pub node_id: Option<NodeIdSpec>,
    pub display_name: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub body: NodeBody,
    /// Parent node and the forward reference type linking parent -> child.
    pub parent: Option<(NodeId, NodeId)>,
    pub type_definition: Option<NodeId>,
    pub modelling_rule: Option<ModellingRule>,
    pub subtype_of: Option<NodeId>,
}

#[derive(Debug, Default)]
pub struct AddObjectOptions {
    pub browse_name: QualifiedName,
    pub node_id: Option<NodeIdSpec>,
    pub display_name: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub type_definition: Option<NodeId>,
    pub organized_by: Option<NodeId>,
    pub component_of: Option<NodeId>,
    pub modelling_rule: Option<ModellingRule>,
    pub event_notifier: u8,
}

impl AddObjectOptions {
    pub fn new(browse_name: impl Into<QualifiedName>) -> Self {
        Self {
            browse_name: browse_name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct AddFolderOptions {
    pub browse_name: QualifiedName,
    pub node_id: Option<NodeIdSpec>,
    pub display_name: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub organized_by: Option<NodeId>,
    pub modelling_rule: Option<ModellingRule>,
}

impl AddFolderOptions {
    pub fn new(browse_name: impl Into<QualifiedName>) -> Self {
        Self {
            browse_name: browse_name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct AddVariableOptions {
    pub browse_name: QualifiedName,
    pub node_id: Option<NodeIdSpec>,
    pub display_name: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub data_type: NodeId,
    pub value_rank: i32,
    pub array_dimensions: Option<Vec<u32>>,
    pub type_definition: Option<NodeId>,
    pub organized_by: Option<NodeId>,
    pub component_of: Option<NodeId>,
    pub property_of: Option<NodeId>,
    pub modelling_rule: Option<ModellingRule>,
}

impl AddVariableOptions {
    pub fn new(browse_name: impl Into<QualifiedName>, data_type: NodeId) -> Self {
        Self {
            browse_name: browse_name.into(),
            node_id: None,
            display_name: None,
            description: None,
            data_type,
            value_rank: -1,
            array_dimensions: None,
            type_definition: None,
            organized_by: None,
            component_of: None,
            property_of: None,
            modelling_rule: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct AddMethodOptions {
    pub browse_name: QualifiedName,
    pub node_id: Option<NodeIdSpec>,
    pub display_name: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub component_of: Option<NodeId>,
    pub executable: bool,
    pub modelling_rule: Option<ModellingRule>,
}

impl AddMethodOptions {
    pub fn new(browse_name: impl Into<QualifiedName>) -> Self {
        Self {
            browse_name: browse_name.into(),
            executable: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct AddObjectTypeOptions {
    pub browse_name: QualifiedName,
    pub node_id: Option<NodeIdSpec>,
    pub display_name: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub subtype_of: Option<NodeId>,
    pub is_abstract: bool,
}

impl AddObjectTypeOptions {
    pub fn new(browse_name: impl Into<QualifiedName>) -> Self {
        Self {
            browse_name: browse_name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct AddVariableTypeOptions {
    pub browse_name: QualifiedName,
    pub node_id: Option<NodeIdSpec>,
    pub display_name: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub subtype_of: Option<NodeId>,
    pub is_abstract: bool,
    pub data_type: NodeId,
    pub value_rank: i32,
    pub array_dimensions: Option<Vec<u32>>,
}

impl AddVariableTypeOptions {
    pub fn new(browse_name: impl Into<QualifiedName>, data_type: NodeId) -> Self {
        Self {
            browse_name: browse_name.into(),
            node_id: None,
            display_name: None,
            description: None,
            subtype_of: None,
            is_abstract: false,
            data_type,
            value_rank: -1,
            array_dimensions: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct AddReferenceTypeOptions {
    pub browse_name: QualifiedName,
    pub node_id: Option<NodeIdSpec>,
    pub display_name: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub subtype_of: Option<NodeId>,
    pub inverse_name: Option<String>,
    pub symmetric: bool,
    pub is_abstract: bool,
}

impl AddReferenceTypeOptions {
    pub fn new(browse_name: impl Into<QualifiedName>) -> Self {
        Self {
            browse_name: browse_name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct AddEnumerationTypeOptions {
    pub browse_name: QualifiedName,
    pub node_id: Option<NodeIdSpec>,
    pub display_name: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub values: Vec<EnumField>,
}

impl AddEnumerationTypeOptions {
    pub fn new(browse_name: impl Into<QualifiedName>, values: Vec<EnumField>) -> Self {
        Self {
            browse_name: browse_name.into(),
            node_id: None,
            display_name: None,
            description: None,
            values,
        }
    }
}

#[derive(Debug, Default)]
pub struct CreateDataTypeOptions {
    pub browse_name: QualifiedName,
    pub node_id: Option<NodeIdSpec>,
    pub display_name: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub subtype_of: Option<NodeId>,
    pub is_abstract: bool,
    pub definition: Option<DataTypeDefinition>,
}

impl CreateDataTypeOptions {
    pub fn new(browse_name: impl Into<QualifiedName>) -> Self {
        Self {
            browse_name: browse_name.into(),
            ..Self::default()
        }
    }
}
