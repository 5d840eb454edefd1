//! The type-instantiation engine: materializing a type's declared
//! substructure into a live instance subtree.
//!
//! The ancestor chain is processed as an explicit ordered list, root-most
//! supertype first, and declarations are merged by browse name so a child
//! redeclared by a derived type wins without duplicating. A failed
//! instantiation rolls back every node and edge it created.

use crate::error::GraphError;
use crate::id_manager::{NodeIdOptions, NodeIdSpec, ParentContext};
use crate::node::{NodeBody, UaNode};
use crate::reference::Reference;
use crate::space::{AddressSpace, PostInstantiateHook};
use crate::standard;
use std::collections::BTreeMap;
use uamodel_types::{BrowseDirection, LocalizedText, NodeClass, NodeId, QualifiedName};

/// Where the new root instance hangs in the graph.
#[derive(Clone, Debug)]
pub enum Placement {
    OrganizedBy(NodeId),
    ComponentOf(NodeId),
}

#[derive(Debug)]
pub struct InstantiateOptions {
    pub browse_name: QualifiedName,
    pub node_id: Option<NodeIdSpec>,
    pub display_name: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub placement: Option<Placement>,
    /// Dotted paths (relative to the instantiation root) of Optional
    /// children to materialize, e.g. `"SubObj.Property2"`. Entries that
    /// match no declared Optional child are tolerated no-ops.
    pub optionals: Vec<String>,
    /// Namespace every created node is placed in; defaults to the address
    /// space's working namespace.
    pub namespace: Option<u16>,
}

impl InstantiateOptions {
    pub fn new(browse_name: impl Into<QualifiedName>) -> Self {
        Self {
            browse_name: browse_name.into(),
            node_id: None,
            display_name: None,
            description: None,
            placement: None,
            optionals: Vec::new(),
            namespace: None,
        }
    }
}

/// Per-call bookkeeping: the type-level -> instance map that gives every
/// underlying type-level node exactly one clone per call, plus the undo log
/// for atomic rollback.
struct CloneContext {
    target_namespace: u16,
    optionals: Vec<String>,
    cloned: BTreeMap<NodeId, NodeId>,
    created_nodes: Vec<NodeId>,
    created_edges: Vec<(NodeId, Reference)>,
}

/// One declared child at some level of the ancestor chain.
#[derive(Clone, Debug)]
struct ChildDeclaration {
    browse_name: QualifiedName,
    reference_type: NodeId,
    node: NodeId,
}

fn optional_requested(optionals: &[String], rel_path: &str) -> bool {
    optionals
        .iter()
        .any(|o| o == rel_path || o.starts_with(&format!("{}.", rel_path)))
}

impl AddressSpace {
    /// Register a hook invoked exactly once per instantiation of the given
    /// type, after the whole instance subtree has been materialized.
    pub fn set_post_instantiate_hook(&mut self, type_id: NodeId, hook: PostInstantiateHook) {
        self.hooks.insert(type_id, hook);
    }

    /// Produce a new instance of an ObjectType or VariableType, recursively
    /// materializing the type's declared substructure per its modelling
    /// rules. Runs to completion or fails atomically.
    pub fn instantiate(
        &mut self,
        type_id: &NodeId,
        options: InstantiateOptions,
    ) -> Result<NodeId, GraphError> {
        let type_node = self
            .find_node(type_id)
            .ok_or_else(|| GraphError::NodeNotFound(type_id.clone()))?;
        match type_node.node_class() {
            NodeClass::ObjectType | NodeClass::VariableType => {}
            _ => return Err(GraphError::NotInstantiable(type_id.clone())),
        }
        if type_node.is_abstract() {
            return Err(GraphError::AbstractTypeInstantiation(type_id.clone()));
        }

        let mut ctx = CloneContext {
            target_namespace: options.namespace.unwrap_or_else(|| self.default_namespace()),
            optionals: options.optionals.clone(),
            cloned: BTreeMap::new(),
            created_nodes: Vec::new(),
            created_edges: Vec::new(),
        };

        match self.instantiate_root(type_id, &options, &mut ctx) {
            Ok(instance) => {
                if let Some(hook) = self.hooks.get(type_id).cloned() {
                    hook(self, &instance);
                }
                tracing::debug!(%instance, %type_id, "type instantiated");
                Ok(instance)
            }
            Err(e) => {
                tracing::warn!(%type_id, error = %e, "instantiation failed, rolling back");
                self.rollback(ctx);
                Err(e)
            }
        }
    }

    fn instantiate_root(
        &mut self,
        type_id: &NodeId,
        options: &InstantiateOptions,
        ctx: &mut CloneContext,
    ) -> Result<NodeId, GraphError> {
        if self.namespace(ctx.target_namespace).is_none() {
            return Err(GraphError::UnknownNamespace(ctx.target_namespace));
        }
        let type_node = self
            .find_node(type_id)
            .ok_or_else(|| GraphError::NodeNotFound(type_id.clone()))?;
        let body = match &type_node.body {
            NodeBody::ObjectType { .. } => NodeBody::Object { event_notifier: 0 },
            NodeBody::VariableType {
                data_type,
                value_rank,
                array_dimensions,
                ..
            } => NodeBody::Variable {
                data_type: data_type.clone(),
                value_rank: *value_rank,
                array_dimensions: array_dimensions.clone(),
            },
            _ => return Err(GraphError::NotInstantiable(type_id.clone())),
        };
        let type_description = type_node.description.clone();

        let placement = match &options.placement {
            Some(Placement::OrganizedBy(parent)) => Some((parent.clone(), standard::organizes())),
            Some(Placement::ComponentOf(parent)) => {
                Some((parent.clone(), standard::has_component()))
            }
            None => None,
        };
        if let Some((parent, _)) = &placement {
            if self.find_node(parent).is_none() {
                return Err(GraphError::DanglingReference(parent.clone()));
            }
        }

        let parent_path = placement
            .as_ref()
            .map(|(parent, _)| self.browse_name_path(parent))
            .unwrap_or_default();
        let parent_relation = match &placement {
            Some((_, reference_type)) => Some(self.parent_relation(reference_type)?),
            None => None,
        };
        let node_id = {
            let Some(namespace_entry) = self.namespace_mut(ctx.target_namespace) else {
                return Err(GraphError::UnknownNamespace(ctx.target_namespace));
            };
            namespace_entry.id_manager.construct_node_id(NodeIdOptions {
                node_id: options.node_id.clone(),
                browse_name: &options.browse_name,
                node_class: body.node_class(),
                parent: placement.as_ref().zip(parent_relation).map(
                    |((parent, _), relation)| ParentContext {
                        node_id: parent,
                        relation,
                        symbolic_path: &parent_path,
                    },
                ),
            })?
        };

        let mut instance = UaNode::new(node_id.clone(), options.browse_name.clone(), body);
        if let Some(display_name) = &options.display_name {
            instance.display_name = display_name.clone();
        }
        instance.description = options.description.clone().or(type_description);
        self.tracked_insert(instance, ctx)?;

        self.tracked_add_reference(
            &node_id,
            Reference::forward(standard::has_type_definition(), type_id.clone()),
            ctx,
        )?;
        if let Some((parent, reference_type)) = &placement {
            self.tracked_add_reference(
                parent,
                Reference::forward(reference_type.clone(), node_id.clone()),
                ctx,
            )?;
        }

        let symbolic_path = if parent_path.is_empty() {
            options.browse_name.name.clone()
        } else {
            format!("{}.{}", parent_path, options.browse_name.name)
        };

        // Process the ancestor chain root-most first, base declarations
        // before derived ones, merged by browse name.
        let levels = self.ancestors_of(type_id)?;
        let declarations = self.collect_declarations(&levels)?;
        for declaration in declarations {
            self.clone_declared_child(&declaration, &node_id, "", &symbolic_path, ctx)?;
        }
        Ok(node_id)
    }

    /// Declared children across an ordered list of type levels, merged by
    /// browse name: a later (more specific) declaration replaces an earlier
    /// one in place, keeping the base type's ordering.
    fn collect_declarations(
        &self,
        levels: &[NodeId],
    ) -> Result<Vec<ChildDeclaration>, GraphError> {
        let mut declarations: Vec<ChildDeclaration> = Vec::new();
        for level in levels {
            let mut level_refs = self.find_references_ex(
                level,
                standard::aggregates(),
                BrowseDirection::Forward,
                true,
            )?;
            level_refs.extend(self.find_references_ex(
                level,
                standard::organizes(),
                BrowseDirection::Forward,
                false,
            )?);
            for r in level_refs {
                let Some(child) = self.find_node(&r.target) else {
                    continue;
                };
                let declaration = ChildDeclaration {
                    browse_name: child.browse_name.clone(),
                    reference_type: r.reference_type,
                    node: r.target,
                };
                match declarations
                    .iter_mut()
                    .find(|d| d.browse_name == declaration.browse_name)
                {
                    Some(existing) => *existing = declaration,
                    None => declarations.push(declaration),
                }
            }
        }
        Ok(declarations)
    }

    /// Apply the declaration's modelling rule, cloning when it asks for it.
    fn clone_declared_child(
        &mut self,
        declaration: &ChildDeclaration,
        parent_instance: &NodeId,
        rel_prefix: &str,
        parent_symbolic_path: &str,
        ctx: &mut CloneContext,
    ) -> Result<Option<NodeId>, GraphError> {
        let rel_path = if rel_prefix.is_empty() {
            declaration.browse_name.name.clone()
        } else {
            format!("{}.{}", rel_prefix, declaration.browse_name.name)
        };
        match self.modelling_rule_of(&declaration.node) {
            None => {
                tracing::trace!(child = %declaration.node, "no modelling rule, not part of instances");
                Ok(None)
            }
            Some(rule) if rule.is_placeholder() => {
                tracing::trace!(child = %declaration.node, %rule, "placeholder rule, skipped");
                Ok(None)
            }
            Some(uamodel_types::ModellingRule::Optional)
                if !optional_requested(&ctx.optionals, &rel_path) =>
            {
                Ok(None)
            }
            Some(_) => self
                .clone_child(declaration, parent_instance, &rel_path, parent_symbolic_path, ctx)
                .map(Some),
        }
    }

    fn clone_child(
        &mut self,
        declaration: &ChildDeclaration,
        parent_instance: &NodeId,
        rel_path: &str,
        parent_symbolic_path: &str,
        ctx: &mut CloneContext,
    ) -> Result<NodeId, GraphError> {
        // One clone per underlying type-level node per instantiation call:
        // a node reached again (e.g. via Organizes after Aggregates) is
        // shared by reference, not cloned twice.
        if let Some(existing) = ctx.cloned.get(&declaration.node) {
            let existing = existing.clone();
            self.tracked_add_reference(
                parent_instance,
                Reference::forward(declaration.reference_type.clone(), existing.clone()),
                ctx,
            )?;
            return Ok(existing);
        }

        let source = self
            .find_node(&declaration.node)
            .ok_or_else(|| GraphError::NodeNotFound(declaration.node.clone()))?
            .clone();
        let relation = self.parent_relation(&declaration.reference_type)?;
        let node_id = {
            let Some(namespace_entry) = self.namespace_mut(ctx.target_namespace) else {
                return Err(GraphError::UnknownNamespace(ctx.target_namespace));
            };
            namespace_entry.id_manager.construct_node_id(NodeIdOptions {
                node_id: None,
                browse_name: &source.browse_name,
                node_class: source.node_class(),
                parent: Some(ParentContext {
                    node_id: parent_instance,
                    relation,
                    symbolic_path: parent_symbolic_path,
                }),
            })?
        };

        let mut instance = UaNode::new(node_id.clone(), source.browse_name.clone(), source.body.clone());
        instance.display_name = source.display_name.clone();
        instance.description = source.description.clone();
        self.tracked_insert(instance, ctx)?;
        ctx.cloned
            .insert(declaration.node.clone(), node_id.clone());

        // Same reference type and direction as on the type level; the
        // HasModellingRule bookkeeping edge is never copied to instances.
        self.tracked_add_reference(
            parent_instance,
            Reference::forward(declaration.reference_type.clone(), node_id.clone()),
            ctx,
        )?;
        let type_definition = self.type_definition_of(&declaration.node);
        if let Some(type_definition) = &type_definition {
            self.tracked_add_reference(
                &node_id,
                Reference::forward(standard::has_type_definition(), type_definition.clone()),
                ctx,
            )?;
        }

        // Recurse: the child's own type chain first, then the declared
        // child itself as the most-derived level, merged the same way as
        // the root.
        let levels = match &type_definition {
            Some(type_definition)
                if matches!(source.node_class(), NodeClass::Object | NodeClass::Variable) =>
            {
                let mut chain = self.ancestors_of(type_definition)?;
                chain.push(declaration.node.clone());
                chain
            }
            _ => vec![declaration.node.clone()],
        };
        let symbolic_path = format!("{}.{}", parent_symbolic_path, source.browse_name.name);
        let declarations = self.collect_declarations(&levels)?;
        for nested in declarations {
            self.clone_declared_child(&nested, &node_id, rel_path, &symbolic_path, ctx)?;
        }
        Ok(node_id)
    }

    fn tracked_insert(&mut self, node: UaNode, ctx: &mut CloneContext) -> Result<(), GraphError> {
        let node_id = node.node_id.clone();
        self.insert_node(node)?;
        ctx.created_nodes.push(node_id);
        Ok(())
    }

    /// Add an edge, tolerating an identical edge already placed earlier in
    /// this call (a shared clone reached twice under the same relation).
    fn tracked_add_reference(
        &mut self,
        source: &NodeId,
        reference: Reference,
        ctx: &mut CloneContext,
    ) -> Result<(), GraphError> {
        if self
            .find_node(source)
            .map(|n| n.references.contains(&reference))
            .unwrap_or(false)
        {
            return Ok(());
        }
        self.add_reference(source, reference.clone())?;
        ctx.created_edges.push((source.clone(), reference));
        Ok(())
    }

    /// Undo a failed instantiation: no partially-linked node stays
    /// reachable from the global index.
    fn rollback(&mut self, ctx: CloneContext) {
        for (source, reference) in ctx.created_edges.iter().rev() {
            if !ctx.created_nodes.contains(source) {
                self.remove_reference(source, reference);
            }
        }
        for node_id in ctx.created_nodes.iter().rev() {
            self.remove_node(node_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{
        AddFolderOptions, AddObjectOptions, AddObjectTypeOptions, AddVariableOptions,
        AddVariableTypeOptions,
    };
    use crate::standard::data_types;
    use std::cell::RefCell;
    use std::rc::Rc;
    use uamodel_types::ModellingRule;

    fn double() -> NodeId {
        NodeId::new_numeric(0, data_types::DOUBLE)
    }

    fn space_with_namespace() -> (AddressSpace, u16) {
        let mut space = AddressSpace::new();
        let ns = space.register_namespace("http://acme.example/UA/");
        (space, ns)
    }

    /// Base type with Mandatory `A` and Optional `B`; derived adds
    /// Mandatory `C`.
    fn machine_types(space: &mut AddressSpace, ns: u16) -> (NodeId, NodeId) {
        let base = space
            .add_object_type(ns, AddObjectTypeOptions::new(QualifiedName::new(ns, "MachineType")))
            .unwrap();
        let mut options = AddVariableOptions::new(QualifiedName::new(ns, "A"), double());
        options.component_of = Some(base.clone());
        options.modelling_rule = Some(ModellingRule::Mandatory);
        space.add_variable(ns, options).unwrap();
        let mut options = AddVariableOptions::new(QualifiedName::new(ns, "B"), double());
        options.property_of = Some(base.clone());
        options.modelling_rule = Some(ModellingRule::Optional);
        space.add_variable(ns, options).unwrap();

        let mut options = AddObjectTypeOptions::new(QualifiedName::new(ns, "AdvancedMachineType"));
        options.subtype_of = Some(base.clone());
        let derived = space.add_object_type(ns, options).unwrap();
        let mut options = AddVariableOptions::new(QualifiedName::new(ns, "C"), double());
        options.component_of = Some(derived.clone());
        options.modelling_rule = Some(ModellingRule::Mandatory);
        space.add_variable(ns, options).unwrap();

        (base, derived)
    }

    fn child_names(space: &AddressSpace, instance: &NodeId) -> Vec<String> {
        let mut names: Vec<String> = space
            .find_references_ex(
                instance,
                standard::aggregates(),
                BrowseDirection::Forward,
                true,
            )
            .unwrap()
            .iter()
            .map(|r| space.find_node(&r.target).unwrap().browse_name.name.clone())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn modelling_rules_select_the_children() {
        let (mut space, ns) = space_with_namespace();
        let (_, derived) = machine_types(&mut space, ns);

        let plain = space
            .instantiate(&derived, InstantiateOptions::new(QualifiedName::new(ns, "M1")))
            .unwrap();
        assert_eq!(child_names(&space, &plain), ["A", "C"]);

        let mut options = InstantiateOptions::new(QualifiedName::new(ns, "M2"));
        options.optionals = vec!["B".to_string()];
        let with_optional = space.instantiate(&derived, options).unwrap();
        assert_eq!(child_names(&space, &with_optional), ["A", "B", "C"]);
    }

    #[test]
    fn unknown_optionals_are_tolerated() {
        let (mut space, ns) = space_with_namespace();
        let (_, derived) = machine_types(&mut space, ns);
        let mut options = InstantiateOptions::new(QualifiedName::new(ns, "M"));
        options.optionals = vec!["NoSuchChild".to_string()];
        let instance = space.instantiate(&derived, options).unwrap();
        assert_eq!(child_names(&space, &instance), ["A", "C"]);
    }

    #[test]
    fn redeclared_child_appears_once_with_derived_attributes() {
        let (mut space, ns) = space_with_namespace();
        let (_, derived) = machine_types(&mut space, ns);
        // The derived type redeclares B to change its description.
        let mut options = AddVariableOptions::new(QualifiedName::new(ns, "B"), double());
        options.property_of = Some(derived.clone());
        options.modelling_rule = Some(ModellingRule::Optional);
        options.description = Some(LocalizedText::new("refined"));
        space.add_variable(ns, options).unwrap();

        let mut options = InstantiateOptions::new(QualifiedName::new(ns, "M"));
        options.optionals = vec!["B".to_string()];
        let instance = space.instantiate(&derived, options).unwrap();

        assert_eq!(child_names(&space, &instance), ["A", "B", "C"]);
        let b = space
            .get_property_by_name(&instance, "B", None)
            .unwrap()
            .unwrap();
        assert_eq!(
            space.find_node(&b).unwrap().description.as_ref().map(|d| d.text.as_str()),
            Some("refined")
        );
    }

    #[test]
    fn three_level_chain_processes_base_first() {
        let (mut space, ns) = space_with_namespace();
        let (_, derived) = machine_types(&mut space, ns);
        let mut options = AddObjectTypeOptions::new(QualifiedName::new(ns, "PremiumMachineType"));
        options.subtype_of = Some(derived);
        let premium = space.add_object_type(ns, options).unwrap();
        let mut options = AddVariableOptions::new(QualifiedName::new(ns, "D"), double());
        options.component_of = Some(premium.clone());
        options.modelling_rule = Some(ModellingRule::Mandatory);
        space.add_variable(ns, options).unwrap();

        let instance = space
            .instantiate(&premium, InstantiateOptions::new(QualifiedName::new(ns, "M")))
            .unwrap();
        assert_eq!(child_names(&space, &instance), ["A", "C", "D"]);
    }

    #[test]
    fn nested_optionals_need_their_dotted_path() {
        let (mut space, ns) = space_with_namespace();
        let base = space
            .add_object_type(ns, AddObjectTypeOptions::new(QualifiedName::new(ns, "RigType")))
            .unwrap();
        let mut options = AddObjectOptions::new(QualifiedName::new(ns, "SubObj"));
        options.component_of = Some(base.clone());
        options.modelling_rule = Some(ModellingRule::Mandatory);
        let sub_obj = space.add_object(ns, options).unwrap();
        let mut options = AddVariableOptions::new(QualifiedName::new(ns, "Property2"), double());
        options.property_of = Some(sub_obj.clone());
        options.modelling_rule = Some(ModellingRule::Optional);
        space.add_variable(ns, options).unwrap();

        // Without the dotted path the optional grandchild is absent.
        let plain = space
            .instantiate(&base, InstantiateOptions::new(QualifiedName::new(ns, "R1")))
            .unwrap();
        let sub = space.get_component_by_name(&plain, "SubObj", None).unwrap().unwrap();
        assert_eq!(space.get_property_by_name(&sub, "Property2", None).unwrap(), None);

        // Listing the top-level name alone clones only mandatory structure.
        let mut options = InstantiateOptions::new(QualifiedName::new(ns, "R2"));
        options.optionals = vec!["SubObj".to_string()];
        let listed = space.instantiate(&base, options).unwrap();
        let sub = space.get_component_by_name(&listed, "SubObj", None).unwrap().unwrap();
        assert_eq!(space.get_property_by_name(&sub, "Property2", None).unwrap(), None);

        // The dotted path materializes the grandchild.
        let mut options = InstantiateOptions::new(QualifiedName::new(ns, "R3"));
        options.optionals = vec!["SubObj.Property2".to_string()];
        let dotted = space.instantiate(&base, options).unwrap();
        let sub = space.get_component_by_name(&dotted, "SubObj", None).unwrap().unwrap();
        assert!(space.get_property_by_name(&sub, "Property2", None).unwrap().is_some());
    }

    #[test]
    fn abstract_types_are_rejected() {
        let (mut space, ns) = space_with_namespace();
        let mut options = AddObjectTypeOptions::new(QualifiedName::new(ns, "AbstractRigType"));
        options.is_abstract = true;
        let abstract_type = space.add_object_type(ns, options).unwrap();
        let err = space
            .instantiate(&abstract_type, InstantiateOptions::new(QualifiedName::new(ns, "R")))
            .unwrap_err();
        assert!(matches!(err, GraphError::AbstractTypeInstantiation(_)));
    }

    #[test]
    fn variable_type_instances_copy_the_value_layout() {
        let (mut space, ns) = space_with_namespace();
        let mut options =
            AddVariableTypeOptions::new(QualifiedName::new(ns, "SetpointType"), double());
        options.value_rank = 1;
        options.array_dimensions = Some(vec![4]);
        let setpoint_type = space.add_variable_type(ns, options).unwrap();

        let instance = space
            .instantiate(&setpoint_type, InstantiateOptions::new(QualifiedName::new(ns, "Sp")))
            .unwrap();
        match &space.find_node(&instance).unwrap().body {
            NodeBody::Variable {
                data_type,
                value_rank,
                array_dimensions,
            } => {
                assert_eq!(data_type, &double());
                assert_eq!(*value_rank, 1);
                assert_eq!(array_dimensions.as_deref(), Some(&[4][..]));
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn placement_links_and_string_id_derivation() {
        let (mut space, ns) = space_with_namespace();
        let (_, derived) = machine_types(&mut space, ns);

        let mut options = InstantiateOptions::new(QualifiedName::new(ns, "Mill"));
        options.node_id = Some("s=Mill".into());
        options.placement = Some(Placement::OrganizedBy(space.objects_folder()));
        let instance = space.instantiate(&derived, options).unwrap();
        assert_eq!(instance, NodeId::new_string(ns, "Mill"));

        // Aggregated children of a string-id root get derived string ids;
        // the organizes placement edge lives on the folder.
        let a = space.get_component_by_name(&instance, "A", None).unwrap().unwrap();
        assert_eq!(a, NodeId::new_string(ns, "Mill-A"));
        let folder = space.find_node(&space.objects_folder()).unwrap();
        assert!(folder.references.iter().any(|r| r.target == instance));
    }

    #[test]
    fn organizes_subtree_shares_cloned_components() {
        let (mut space, ns) = space_with_namespace();
        let rig_type = space
            .add_object_type(ns, AddObjectTypeOptions::new(QualifiedName::new(ns, "DrillType")))
            .unwrap();
        // ParameterSet -> Speed via aggregation.
        let mut options = AddObjectOptions::new(QualifiedName::new(ns, "ParameterSet"));
        options.component_of = Some(rig_type.clone());
        options.modelling_rule = Some(ModellingRule::Mandatory);
        let parameter_set = space.add_object(ns, options).unwrap();
        let mut options = AddVariableOptions::new(QualifiedName::new(ns, "Speed"), double());
        options.component_of = Some(parameter_set.clone());
        options.modelling_rule = Some(ModellingRule::Mandatory);
        let speed = space.add_variable(ns, options).unwrap();
        // A display folder reaching the same Speed node via Organizes.
        let mut options = AddFolderOptions::new(QualifiedName::new(ns, "DisplayGroup"));
        options.organized_by = Some(rig_type.clone());
        options.modelling_rule = Some(ModellingRule::Mandatory);
        let display_group = space.add_folder(ns, options).unwrap();
        space
            .add_reference(
                &display_group,
                Reference::forward(standard::organizes(), speed.clone()),
            )
            .unwrap();

        let instance = space
            .instantiate(&rig_type, InstantiateOptions::new(QualifiedName::new(ns, "Drill")))
            .unwrap();

        let parameter_set_clone = space
            .get_component_by_name(&instance, "ParameterSet", None)
            .unwrap()
            .unwrap();
        let speed_clone = space
            .get_component_by_name(&parameter_set_clone, "Speed", None)
            .unwrap()
            .unwrap();
        // The folder clone is Organizes-linked, not aggregated.
        let organized: Vec<NodeId> = space
            .find_references_ex(&instance, standard::organizes(), BrowseDirection::Forward, false)
            .unwrap()
            .into_iter()
            .map(|r| r.target)
            .collect();
        assert_eq!(organized.len(), 1);
        let display_clone = organized.into_iter().next().unwrap();
        assert_ne!(display_clone, parameter_set_clone);

        // The organized subtree points at the already-cloned Speed, not at
        // the type-level node and not at a second copy.
        let display_targets: Vec<NodeId> = space
            .find_references_ex(&display_clone, standard::organizes(), BrowseDirection::Forward, false)
            .unwrap()
            .into_iter()
            .map(|r| r.target)
            .collect();
        assert_eq!(display_targets, vec![speed_clone.clone()]);
        assert_ne!(speed_clone, speed);
    }

    #[test]
    fn failed_instantiation_leaves_no_partial_subtree() {
        let (mut space, ns) = space_with_namespace();
        let (_, derived) = machine_types(&mut space, ns);
        // Pre-claim the string id the mandatory child A would derive.
        let mut options = AddObjectOptions::new(QualifiedName::new(ns, "Squatter"));
        options.node_id = Some("s=M-A".into());
        space.add_object(ns, options).unwrap();
        let before = space.node_count();

        let mut options = InstantiateOptions::new(QualifiedName::new(ns, "M"));
        options.node_id = Some("s=M".into());
        options.placement = Some(Placement::OrganizedBy(space.objects_folder()));
        let err = space.instantiate(&derived, options).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateNodeId(_)));

        assert_eq!(space.node_count(), before);
        assert!(space.find_node(&NodeId::new_string(ns, "M")).is_none());
        let folder = space.find_node(&space.objects_folder()).unwrap();
        assert!(!folder
            .references
            .iter()
            .any(|r| r.target == NodeId::new_string(ns, "M")));
    }

    #[test]
    fn post_instantiate_hook_runs_once_after_the_subtree() {
        let (mut space, ns) = space_with_namespace();
        let (_, derived) = machine_types(&mut space, ns);

        let calls: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));
        let observed = calls.clone();
        space.set_post_instantiate_hook(
            derived.clone(),
            Rc::new(move |space: &mut AddressSpace, instance: &NodeId| {
                // Grandchildren are already materialized when the hook runs.
                let has_a = space
                    .get_component_by_name(instance, "A", None)
                    .unwrap()
                    .is_some();
                observed.borrow_mut().push(has_a);
            }),
        );

        space
            .instantiate(&derived, InstantiateOptions::new(QualifiedName::new(ns, "M")))
            .unwrap();
        assert_eq!(calls.borrow().as_slice(), &[true]);
    }

    #[test]
    fn namespace_override_places_every_created_node() {
        let (mut space, ns1) = space_with_namespace();
        let ns2 = space.register_namespace("http://other.example/UA/");
        let (_, derived) = machine_types(&mut space, ns1);

        let mut options = InstantiateOptions::new(QualifiedName::new(ns1, "M"));
        options.namespace = Some(ns2);
        let instance = space.instantiate(&derived, options).unwrap();
        assert_eq!(instance.namespace, ns2);
        let a = space.get_component_by_name(&instance, "A", None).unwrap().unwrap();
        assert_eq!(a.namespace, ns2);
    }
}
