#![deny(unsafe_code)]
//! # uamodel-graph
//!
//! The in-process node graph of a UA information model and the algorithms
//! that keep it consistent:
//!
//! - [`AddressSpace`] — ordered namespaces, the global node index, node and
//!   reference creation, name lookup and the dispose lifecycle.
//! - [`NodeIdManager`] — deterministic per-namespace id allocation with a
//!   symbolic-path cache replayable across rebuilds.
//! - Reference normalization and subtype resolution over the reference-type
//!   DAG ([`AddressSpace::normalize_reference_type`],
//!   [`AddressSpace::is_subtype_of`], [`AddressSpace::find_references_ex`]).
//! - The type-instantiation engine ([`AddressSpace::instantiate`]) cloning
//!   a type's mandatory/optional substructure across arbitrarily deep
//!   subtype chains and namespaces.
//! - Load-order resolution for namespace dependencies
//!   ([`resolve_load_order`]).
//!
//! The graph is single-threaded and synchronous: every mutating operation
//! takes `&mut AddressSpace`, reads may share `&AddressSpace`.

pub mod error;
pub mod id_manager;
pub mod instantiate;
pub mod load_order;
pub mod namespace;
pub mod node;
pub mod reference;
pub mod space;
pub mod standard;

pub use error::GraphError;
pub use id_manager::{NodeIdManager, NodeIdOptions, NodeIdSpec, ParentContext, ParentRelation};
pub use instantiate::{InstantiateOptions, Placement};
pub use load_order::{resolve_load_order, required_namespaces, ModelRequirement, TypeDescription};
pub use namespace::Namespace;
pub use node::{
    DataTypeDefinition, EnumField, NodeBody, StructureDefinition, StructureField, UaNode,
};
pub use reference::{Reference, ReferenceSpec, ReferenceTypeRef};
pub use space::{
    AddEnumerationTypeOptions, AddFolderOptions, AddMethodOptions, AddObjectOptions,
    AddObjectTypeOptions, AddReferenceTypeOptions, AddVariableOptions, AddVariableTypeOptions,
    AddressSpace, CreateDataTypeOptions, PostInstantiateHook,
};
