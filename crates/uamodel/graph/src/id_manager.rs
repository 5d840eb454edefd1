use crate::error::GraphError;
use std::collections::{BTreeMap, BTreeSet};
use uamodel_types::{Identifier, NodeClass, NodeId, QualifiedName};

/// Numeric ids below this value are reserved for caller-supplied and
/// standard-model ids; dynamic allocation starts here.
pub const FIRST_DYNAMIC_ID: u32 = 1000;

/// How a caller supplies an explicit node id.
#[derive(Clone, Debug)]
pub enum NodeIdSpec {
    /// A literal such as `"ns=1;s=Motor"` or `"s=Pump"`; a missing `ns=`
    /// part is substituted with the constructing namespace.
    Literal(String),
    Explicit(NodeId),
}

impl From<NodeId> for NodeIdSpec {
    fn from(id: NodeId) -> Self {
        Self::Explicit(id)
    }
}

impl From<&str> for NodeIdSpec {
    fn from(literal: &str) -> Self {
        Self::Literal(literal.to_string())
    }
}

/// The aggregation relation linking a new node to its parent, as far as id
/// derivation is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParentRelation {
    Component,
    Property,
    Organizes,
}

impl ParentRelation {
    fn derives_string_id(&self) -> bool {
        matches!(self, Self::Component | Self::Property)
    }
}

/// Parent context handed to [`NodeIdManager::construct_node_id`].
#[derive(Clone, Debug)]
pub struct ParentContext<'a> {
    pub node_id: &'a NodeId,
    pub relation: ParentRelation,
    /// The parent's symbolic path (dot-joined ancestor browse names); the
    /// child's cache key is `<symbolic_path>.<browse_name>`.
    pub symbolic_path: &'a str,
}

/// Everything `construct_node_id` needs to derive an id.
#[derive(Debug)]
pub struct NodeIdOptions<'a> {
    pub node_id: Option<NodeIdSpec>,
    pub browse_name: &'a QualifiedName,
    pub node_class: NodeClass,
    pub parent: Option<ParentContext<'a>>,
}

/// Per-namespace node-id allocator.
///
/// Issues monotonically increasing numeric ids starting at
/// [`FIRST_DYNAMIC_ID`], skipping every id already registered (including
/// caller-supplied ones), and keeps a symbol cache keyed by symbolic path so
/// regenerating the same graph from the same inputs reproduces identical
/// ids regardless of construction order.
#[derive(Clone, Debug)]
pub struct NodeIdManager {
    namespace: u16,
    next_numeric: u32,
    issued: BTreeSet<u32>,
    symbol_cache: BTreeMap<String, (u32, NodeClass)>,
}

impl NodeIdManager {
    pub fn new(namespace: u16) -> Self {
        Self {
            namespace,
            next_numeric: FIRST_DYNAMIC_ID,
            issued: BTreeSet::new(),
            symbol_cache: BTreeMap::new(),
        }
    }

    pub fn namespace(&self) -> u16 {
        self.namespace
    }

    /// Record a numeric id as taken so allocation never collides with it.
    pub fn register_numeric(&mut self, id: u32) {
        self.issued.insert(id);
    }

    /// Next unused numeric id in this namespace.
    pub fn build_new_node_id(&mut self) -> NodeId {
        while self.issued.contains(&self.next_numeric) {
            self.next_numeric += 1;
        }
        let id = self.next_numeric;
        self.issued.insert(id);
        self.next_numeric += 1;
        NodeId::new_numeric(self.namespace, id)
    }

    /// Derive (or pass through) a node id per the allocation contract:
    /// explicit ids are used as-is after namespace substitution; children of
    /// string-id parents linked by a Component/Property relation get
    /// `"<parent>-<browseName>"` string ids; everything else goes through
    /// the symbolic-path cache, falling back to fresh numeric allocation.
    pub fn construct_node_id(&mut self, options: NodeIdOptions<'_>) -> Result<NodeId, GraphError> {
        if let Some(spec) = options.node_id {
            let id = match spec {
                NodeIdSpec::Explicit(id) => id,
                NodeIdSpec::Literal(literal) => {
                    NodeId::parse_with_namespace(&literal, self.namespace)?
                }
            };
            if id.namespace == self.namespace {
                if let Some(v) = id.as_numeric() {
                    self.issued.insert(v);
                }
            }
            return Ok(id);
        }

        if let Some(parent) = &options.parent {
            if parent.relation.derives_string_id() {
                if let Some(parent_str) = parent.node_id.as_string_id() {
                    return Ok(NodeId::new_string(
                        parent.node_id.namespace,
                        format!("{}-{}", parent_str, options.browse_name.name),
                    ));
                }
            }
        }

        let key = match &options.parent {
            Some(parent) if !parent.symbolic_path.is_empty() => {
                format!("{}.{}", parent.symbolic_path, options.browse_name.name)
            }
            _ => options.browse_name.name.clone(),
        };

        if let Some((cached, _)) = self.symbol_cache.get(&key) {
            let cached = *cached;
            tracing::debug!(path = %key, id = cached, "node id symbol cache hit");
            self.issued.insert(cached);
            return Ok(NodeId::new_numeric(self.namespace, cached));
        }

        let id = self.build_new_node_id();
        if let Identifier::Numeric(v) = id.identifier {
            self.symbol_cache.insert(key, (v, options.node_class));
        }
        Ok(id)
    }

    /// Replace the symbol cache with previously exported entries. Issued ids
    /// are registered and the allocation watermark advances past them, so a
    /// replayed build cannot collide with cached ids.
    pub fn set_cache(&mut self, entries: impl IntoIterator<Item = (String, u32, NodeClass)>) {
        self.symbol_cache.clear();
        for (path, id, node_class) in entries {
            self.issued.insert(id);
            if id >= self.next_numeric {
                self.next_numeric = id + 1;
            }
            self.symbol_cache.insert(path, (id, node_class));
        }
    }

    /// Import a cache previously exported with [`Self::symbol_csv`].
    pub fn set_cache_csv(&mut self, csv: &str) -> Result<usize, GraphError> {
        let mut entries = Vec::new();
        for line in csv.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split(';');
            let (path, id, class) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(p), Some(i), Some(c), None) => (p, i, c),
                _ => return Err(GraphError::SymbolCacheParse(line.to_string())),
            };
            let id = id
                .parse::<u32>()
                .map_err(|_| GraphError::SymbolCacheParse(line.to_string()))?;
            let class = class
                .parse::<NodeClass>()
                .map_err(|_| GraphError::SymbolCacheParse(line.to_string()))?;
            entries.push((path.to_string(), id, class));
        }
        let count = entries.len();
        self.set_cache(entries);
        Ok(count)
    }

    /// Export the symbol cache as `name;numericId;nodeClass` rows, sorted by
    /// symbolic path so the output is independent of construction order.
    pub fn symbol_csv(&self) -> String {
        let mut out = String::new();
        for (path, (id, class)) in &self.symbol_cache {
            out.push_str(path);
            out.push(';');
            out.push_str(&id.to_string());
            out.push(';');
            out.push_str(&class.to_string());
            out.push('\n');
        }
        out
    }
}
