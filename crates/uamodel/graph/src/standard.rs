//! Well-known numeric ids of the standard namespace (index 0) and the
//! bootstrap that seeds a fresh address space with them: the reference-type
//! DAG, the base object/variable/data types, the numeric-type ladder, the
//! modelling-rule objects and the root folder skeleton.

use crate::error::GraphError;
use crate::node::{NodeBody, UaNode};
use crate::reference::Reference;
use crate::space::AddressSpace;
use uamodel_types::{LocalizedText, ModellingRule, NodeId, QualifiedName};

pub const STANDARD_NAMESPACE_URI: &str = "http://opcfoundation.org/UA/";

pub mod reference_types {
    pub const REFERENCES: u32 = 31;
    pub const NON_HIERARCHICAL_REFERENCES: u32 = 32;
    pub const HIERARCHICAL_REFERENCES: u32 = 33;
    pub const HAS_CHILD: u32 = 34;
    pub const ORGANIZES: u32 = 35;
    pub const HAS_MODELLING_RULE: u32 = 37;
    pub const HAS_TYPE_DEFINITION: u32 = 40;
    pub const AGGREGATES: u32 = 44;
    pub const HAS_SUBTYPE: u32 = 45;
    pub const HAS_PROPERTY: u32 = 46;
    pub const HAS_COMPONENT: u32 = 47;
    pub const HAS_ORDERED_COMPONENT: u32 = 49;
}

pub mod object_types {
    pub const BASE_OBJECT_TYPE: u32 = 58;
    pub const FOLDER_TYPE: u32 = 61;
    pub const MODELLING_RULE_TYPE: u32 = 77;
}

pub mod variable_types {
    pub const BASE_VARIABLE_TYPE: u32 = 62;
    pub const BASE_DATA_VARIABLE_TYPE: u32 = 63;
    pub const PROPERTY_TYPE: u32 = 68;
}

pub mod data_types {
    pub const BOOLEAN: u32 = 1;
    pub const SBYTE: u32 = 2;
    pub const BYTE: u32 = 3;
    pub const INT16: u32 = 4;
    pub const UINT16: u32 = 5;
    pub const INT32: u32 = 6;
    pub const UINT32: u32 = 7;
    pub const INT64: u32 = 8;
    pub const UINT64: u32 = 9;
    pub const FLOAT: u32 = 10;
    pub const DOUBLE: u32 = 11;
    pub const STRING: u32 = 12;
    pub const STRUCTURE: u32 = 22;
    pub const BASE_DATA_TYPE: u32 = 24;
    pub const NUMBER: u32 = 26;
    pub const INTEGER: u32 = 27;
    pub const UINTEGER: u32 = 28;
    pub const ENUMERATION: u32 = 29;
}

pub mod objects {
    pub const MODELLING_RULE_MANDATORY: u32 = 78;
    pub const MODELLING_RULE_OPTIONAL: u32 = 80;
    pub const MODELLING_RULE_EXPOSES_ITS_ARRAY: u32 = 83;
    pub const ROOT_FOLDER: u32 = 84;
    pub const OBJECTS_FOLDER: u32 = 85;
    pub const TYPES_FOLDER: u32 = 86;
    pub const VIEWS_FOLDER: u32 = 87;
    pub const OBJECT_TYPES_FOLDER: u32 = 88;
    pub const VARIABLE_TYPES_FOLDER: u32 = 89;
    pub const DATA_TYPES_FOLDER: u32 = 90;
    pub const REFERENCE_TYPES_FOLDER: u32 = 91;
    pub const MODELLING_RULE_OPTIONAL_PLACEHOLDER: u32 = 11508;
    pub const MODELLING_RULE_MANDATORY_PLACEHOLDER: u32 = 11510;
}

fn ns0(value: u32) -> NodeId {
    NodeId::new_numeric(0, value)
}

pub fn references() -> NodeId {
    ns0(reference_types::REFERENCES)
}

pub fn hierarchical_references() -> NodeId {
    ns0(reference_types::HIERARCHICAL_REFERENCES)
}

pub fn organizes() -> NodeId {
    ns0(reference_types::ORGANIZES)
}

pub fn aggregates() -> NodeId {
    ns0(reference_types::AGGREGATES)
}

pub fn has_subtype() -> NodeId {
    ns0(reference_types::HAS_SUBTYPE)
}

pub fn has_property() -> NodeId {
    ns0(reference_types::HAS_PROPERTY)
}

pub fn has_component() -> NodeId {
    ns0(reference_types::HAS_COMPONENT)
}

pub fn has_type_definition() -> NodeId {
    ns0(reference_types::HAS_TYPE_DEFINITION)
}

pub fn has_modelling_rule() -> NodeId {
    ns0(reference_types::HAS_MODELLING_RULE)
}

/// The standard object node representing a modelling rule.
pub fn modelling_rule_node_id(rule: ModellingRule) -> NodeId {
    let value = match rule {
        ModellingRule::Mandatory => objects::MODELLING_RULE_MANDATORY,
        ModellingRule::Optional => objects::MODELLING_RULE_OPTIONAL,
        ModellingRule::ExposesItsArray => objects::MODELLING_RULE_EXPOSES_ITS_ARRAY,
        ModellingRule::OptionalPlaceholder => objects::MODELLING_RULE_OPTIONAL_PLACEHOLDER,
        ModellingRule::MandatoryPlaceholder => objects::MODELLING_RULE_MANDATORY_PLACEHOLDER,
    };
    ns0(value)
}

pub fn modelling_rule_from_node_id(id: &NodeId) -> Option<ModellingRule> {
    if id.namespace != 0 {
        return None;
    }
    match id.as_numeric()? {
        objects::MODELLING_RULE_MANDATORY => Some(ModellingRule::Mandatory),
        objects::MODELLING_RULE_OPTIONAL => Some(ModellingRule::Optional),
        objects::MODELLING_RULE_EXPOSES_ITS_ARRAY => Some(ModellingRule::ExposesItsArray),
        objects::MODELLING_RULE_OPTIONAL_PLACEHOLDER => Some(ModellingRule::OptionalPlaceholder),
        objects::MODELLING_RULE_MANDATORY_PLACEHOLDER => Some(ModellingRule::MandatoryPlaceholder),
        _ => None,
    }
}

struct ReferenceTypeSpec {
    id: u32,
    name: &'static str,
    subtype_of: Option<u32>,
    is_abstract: bool,
    symmetric: bool,
    inverse_name: Option<&'static str>,
}

const REFERENCE_TYPE_SPECS: &[ReferenceTypeSpec] = &[
    ReferenceTypeSpec {
        id: reference_types::REFERENCES,
        name: "References",
        subtype_of: None,
        is_abstract: true,
        symmetric: true,
        inverse_name: None,
    },
    ReferenceTypeSpec {
        id: reference_types::HIERARCHICAL_REFERENCES,
        name: "HierarchicalReferences",
        subtype_of: Some(reference_types::REFERENCES),
        is_abstract: true,
        symmetric: false,
        inverse_name: Some("InverseHierarchicalReferences"),
    },
    ReferenceTypeSpec {
        id: reference_types::NON_HIERARCHICAL_REFERENCES,
        name: "NonHierarchicalReferences",
        subtype_of: Some(reference_types::REFERENCES),
        is_abstract: true,
        symmetric: false,
        inverse_name: None,
    },
    ReferenceTypeSpec {
        id: reference_types::HAS_CHILD,
        name: "HasChild",
        subtype_of: Some(reference_types::HIERARCHICAL_REFERENCES),
        is_abstract: true,
        symmetric: false,
        inverse_name: Some("ChildOf"),
    },
    ReferenceTypeSpec {
        id: reference_types::ORGANIZES,
        name: "Organizes",
        subtype_of: Some(reference_types::HIERARCHICAL_REFERENCES),
        is_abstract: false,
        symmetric: false,
        inverse_name: Some("OrganizedBy"),
    },
    ReferenceTypeSpec {
        id: reference_types::AGGREGATES,
        name: "Aggregates",
        subtype_of: Some(reference_types::HAS_CHILD),
        is_abstract: true,
        symmetric: false,
        inverse_name: Some("AggregatedBy"),
    },
    ReferenceTypeSpec {
        id: reference_types::HAS_SUBTYPE,
        name: "HasSubtype",
        subtype_of: Some(reference_types::HAS_CHILD),
        is_abstract: false,
        symmetric: false,
        inverse_name: Some("SubtypeOf"),
    },
    ReferenceTypeSpec {
        id: reference_types::HAS_PROPERTY,
        name: "HasProperty",
        subtype_of: Some(reference_types::AGGREGATES),
        is_abstract: false,
        symmetric: false,
        inverse_name: Some("PropertyOf"),
    },
    ReferenceTypeSpec {
        id: reference_types::HAS_COMPONENT,
        name: "HasComponent",
        subtype_of: Some(reference_types::AGGREGATES),
        is_abstract: false,
        symmetric: false,
        inverse_name: Some("ComponentOf"),
    },
    ReferenceTypeSpec {
        id: reference_types::HAS_ORDERED_COMPONENT,
        name: "HasOrderedComponent",
        subtype_of: Some(reference_types::HAS_COMPONENT),
        is_abstract: false,
        symmetric: false,
        inverse_name: Some("OrderedComponentOf"),
    },
    ReferenceTypeSpec {
        id: reference_types::HAS_TYPE_DEFINITION,
        name: "HasTypeDefinition",
        subtype_of: Some(reference_types::NON_HIERARCHICAL_REFERENCES),
        is_abstract: false,
        symmetric: false,
        inverse_name: Some("TypeDefinitionOf"),
    },
    ReferenceTypeSpec {
        id: reference_types::HAS_MODELLING_RULE,
        name: "HasModellingRule",
        subtype_of: Some(reference_types::NON_HIERARCHICAL_REFERENCES),
        is_abstract: false,
        symmetric: false,
        inverse_name: Some("ModellingRuleOf"),
    },
];

// (id, name, supertype, is_abstract)
const DATA_TYPE_SPECS: &[(u32, &str, Option<u32>, bool)] = &[
    (data_types::BASE_DATA_TYPE, "BaseDataType", None, true),
    (data_types::NUMBER, "Number", Some(data_types::BASE_DATA_TYPE), true),
    (data_types::INTEGER, "Integer", Some(data_types::NUMBER), true),
    (data_types::UINTEGER, "UInteger", Some(data_types::NUMBER), true),
    (data_types::BOOLEAN, "Boolean", Some(data_types::BASE_DATA_TYPE), false),
    (data_types::SBYTE, "SByte", Some(data_types::INTEGER), false),
    (data_types::BYTE, "Byte", Some(data_types::UINTEGER), false),
    (data_types::INT16, "Int16", Some(data_types::INTEGER), false),
    (data_types::UINT16, "UInt16", Some(data_types::UINTEGER), false),
    (data_types::INT32, "Int32", Some(data_types::INTEGER), false),
    (data_types::UINT32, "UInt32", Some(data_types::UINTEGER), false),
    (data_types::INT64, "Int64", Some(data_types::INTEGER), false),
    (data_types::UINT64, "UInt64", Some(data_types::UINTEGER), false),
    (data_types::FLOAT, "Float", Some(data_types::NUMBER), false),
    (data_types::DOUBLE, "Double", Some(data_types::NUMBER), false),
    (data_types::STRING, "String", Some(data_types::BASE_DATA_TYPE), false),
    (data_types::STRUCTURE, "Structure", Some(data_types::BASE_DATA_TYPE), true),
    (data_types::ENUMERATION, "Enumeration", Some(data_types::BASE_DATA_TYPE), true),
];

// (id, name, organizing parent folder)
const FOLDER_SPECS: &[(u32, &str, Option<u32>)] = &[
    (objects::ROOT_FOLDER, "Root", None),
    (objects::OBJECTS_FOLDER, "Objects", Some(objects::ROOT_FOLDER)),
    (objects::TYPES_FOLDER, "Types", Some(objects::ROOT_FOLDER)),
    (objects::VIEWS_FOLDER, "Views", Some(objects::ROOT_FOLDER)),
    (objects::OBJECT_TYPES_FOLDER, "ObjectTypes", Some(objects::TYPES_FOLDER)),
    (objects::VARIABLE_TYPES_FOLDER, "VariableTypes", Some(objects::TYPES_FOLDER)),
    (objects::DATA_TYPES_FOLDER, "DataTypes", Some(objects::TYPES_FOLDER)),
    (objects::REFERENCE_TYPES_FOLDER, "ReferenceTypes", Some(objects::TYPES_FOLDER)),
];

const MODELLING_RULE_SPECS: &[(u32, &str)] = &[
    (objects::MODELLING_RULE_MANDATORY, "Mandatory"),
    (objects::MODELLING_RULE_OPTIONAL, "Optional"),
    (objects::MODELLING_RULE_EXPOSES_ITS_ARRAY, "ExposesItsArray"),
    (objects::MODELLING_RULE_OPTIONAL_PLACEHOLDER, "OptionalPlaceholder"),
    (objects::MODELLING_RULE_MANDATORY_PLACEHOLDER, "MandatoryPlaceholder"),
];

/// Seed a fresh address space with the standard namespace. Nodes first,
/// references second, so every reference-type check sees its type node.
pub(crate) fn populate(space: &mut AddressSpace) -> Result<(), GraphError> {
    for spec in REFERENCE_TYPE_SPECS {
        space.insert_node(UaNode::new(
            ns0(spec.id),
            QualifiedName::new(0, spec.name),
            NodeBody::ReferenceType {
                is_abstract: spec.is_abstract,
                symmetric: spec.symmetric,
                inverse_name: spec.inverse_name.map(LocalizedText::new),
            },
        ))?;
    }

    for (id, name, _, is_abstract) in DATA_TYPE_SPECS {
        space.insert_node(UaNode::new(
            ns0(*id),
            QualifiedName::new(0, *name),
            NodeBody::DataType {
                is_abstract: *is_abstract,
                definition: None,
            },
        ))?;
    }

    for (id, name, is_abstract) in [
        (object_types::BASE_OBJECT_TYPE, "BaseObjectType", false),
        (object_types::FOLDER_TYPE, "FolderType", false),
        (object_types::MODELLING_RULE_TYPE, "ModellingRuleType", false),
    ] {
        space.insert_node(UaNode::new(
            ns0(id),
            QualifiedName::new(0, name),
            NodeBody::ObjectType { is_abstract },
        ))?;
    }

    for (id, name, is_abstract) in [
        (variable_types::BASE_VARIABLE_TYPE, "BaseVariableType", true),
        (
            variable_types::BASE_DATA_VARIABLE_TYPE,
            "BaseDataVariableType",
            false,
        ),
        (variable_types::PROPERTY_TYPE, "PropertyType", false),
    ] {
        space.insert_node(UaNode::new(
            ns0(id),
            QualifiedName::new(0, name),
            NodeBody::VariableType {
                data_type: ns0(data_types::BASE_DATA_TYPE),
                value_rank: -1,
                array_dimensions: None,
                is_abstract,
            },
        ))?;
    }

    for (id, name) in MODELLING_RULE_SPECS {
        space.insert_node(UaNode::new(
            ns0(*id),
            QualifiedName::new(0, *name),
            NodeBody::Object { event_notifier: 0 },
        ))?;
    }

    for (id, name, _) in FOLDER_SPECS {
        space.insert_node(UaNode::new(
            ns0(*id),
            QualifiedName::new(0, *name),
            NodeBody::Object { event_notifier: 0 },
        ))?;
    }

    // Subtype edges, stored forward on the supertype.
    for spec in REFERENCE_TYPE_SPECS {
        if let Some(supertype) = spec.subtype_of {
            space.add_reference(&ns0(supertype), Reference::forward(has_subtype(), ns0(spec.id)))?;
        }
    }
    for (id, _, supertype, _) in DATA_TYPE_SPECS {
        if let Some(supertype) = supertype {
            space.add_reference(&ns0(*supertype), Reference::forward(has_subtype(), ns0(*id)))?;
        }
    }
    space.add_reference(
        &ns0(object_types::BASE_OBJECT_TYPE),
        Reference::forward(has_subtype(), ns0(object_types::FOLDER_TYPE)),
    )?;
    space.add_reference(
        &ns0(object_types::BASE_OBJECT_TYPE),
        Reference::forward(has_subtype(), ns0(object_types::MODELLING_RULE_TYPE)),
    )?;
    space.add_reference(
        &ns0(variable_types::BASE_VARIABLE_TYPE),
        Reference::forward(
            has_subtype(),
            ns0(variable_types::BASE_DATA_VARIABLE_TYPE),
        ),
    )?;
    space.add_reference(
        &ns0(variable_types::BASE_VARIABLE_TYPE),
        Reference::forward(has_subtype(), ns0(variable_types::PROPERTY_TYPE)),
    )?;

    for (id, _) in MODELLING_RULE_SPECS {
        space.add_reference(
            &ns0(*id),
            Reference::forward(
                has_type_definition(),
                ns0(object_types::MODELLING_RULE_TYPE),
            ),
        )?;
    }

    for (id, _, parent) in FOLDER_SPECS {
        space.add_reference(
            &ns0(*id),
            Reference::forward(has_type_definition(), ns0(object_types::FOLDER_TYPE)),
        )?;
        if let Some(parent) = parent {
            space.add_reference(&ns0(*parent), Reference::forward(organizes(), ns0(*id)))?;
        }
    }

    // Hang the type roots under their display folders.
    for (folder, root) in [
        (objects::OBJECT_TYPES_FOLDER, object_types::BASE_OBJECT_TYPE),
        (
            objects::VARIABLE_TYPES_FOLDER,
            variable_types::BASE_VARIABLE_TYPE,
        ),
        (objects::DATA_TYPES_FOLDER, data_types::BASE_DATA_TYPE),
        (objects::REFERENCE_TYPES_FOLDER, reference_types::REFERENCES),
    ] {
        space.add_reference(&ns0(folder), Reference::forward(organizes(), ns0(root)))?;
    }

    tracing::debug!("standard namespace populated");
    Ok(())
}
