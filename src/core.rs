//! Core data structures: element handles, type tags, and the graph access contract.
//!
//! The search engine never looks inside a graph directly. Everything it needs
//! (typing, relation traversal, seed enumeration, display names) goes through
//! the [`Graph`] trait, so any domain model can be searched as long as it can
//! answer those questions. [`TypedGraph`] is a small in-memory implementation
//! with single-name relations and a subtype hierarchy.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;

/// Stable identity of a graph element.
///
/// Uses a transparent `u64` wrapper for efficient comparison and hashing.
/// Matches store these handles only; elements are never copied.
///
/// # Invariant
/// - `NodeId`s are unique within a given graph.
/// - Equality and hash are based solely on the inner `u64`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new `NodeId` from a raw `u64`.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw `u64` representation.
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Name of an element type, e.g. `"PhysicalEntity"`.
///
/// Whether one type is a subtype of another is decided by the graph, not by
/// the tag itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    /// Creates a type tag from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the type name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Read-only access to a typed, relation-linked object graph.
///
/// Implementations must be deterministic: the same query on an unchanged
/// graph returns the same elements in the same order. Searches only read
/// through this trait, which is why seed-level searches can run in parallel.
pub trait Graph: Sync {
    /// Returns the declared (most specific) type of an element.
    fn type_of(&self, id: NodeId) -> Option<&TypeTag>;

    /// Checks whether an element is an instance of `ty`, honoring subtyping.
    fn is_instance(&self, id: NodeId, ty: &TypeTag) -> bool;

    /// Returns the elements reachable from `id` through the named relation.
    ///
    /// Unknown relations and elements yield an empty list.
    fn related(&self, id: NodeId, relation: &str) -> Vec<NodeId>;

    /// Returns every element that is an instance of `ty`, sorted by `NodeId`.
    fn elements_of(&self, ty: &TypeTag) -> Vec<NodeId>;

    /// Returns a human-readable name for the element, if it has one.
    fn display_name(&self, _id: NodeId) -> Option<String> {
        None
    }
}

/// Data stored for each element of a [`TypedGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: NodeId,
    /// Declared type.
    pub ty: TypeTag,
    /// Optional display name.
    pub name: Option<String>,
}

/// Errors raised while building a [`TypedGraph`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The type was never registered with `add_type`/`add_subtype`.
    #[error("unknown type `{0}`")]
    UnknownType(TypeTag),
    /// The element does not exist in this graph.
    #[error("unknown element {0}")]
    UnknownElement(NodeId),
    /// Declaring this supertype would make the hierarchy cyclic.
    #[error("type `{child}` cannot extend `{parent}`: hierarchy would be cyclic")]
    CyclicHierarchy { child: TypeTag, parent: TypeTag },
}

/// In-memory graph with typed elements, named relations, and a type hierarchy.
///
/// # Invariants
/// - Every element's type is registered.
/// - Relation targets are kept in insertion order without duplicates.
/// - The supertype relation is acyclic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypedGraph {
    /// Elements keyed by id; `BTreeMap` gives sorted iteration.
    elements: BTreeMap<NodeId, Element>,
    /// Direct supertypes of every registered type.
    supertypes: BTreeMap<TypeTag, Vec<TypeTag>>,
    /// Outgoing relation targets: element -> relation name -> targets.
    relations: HashMap<NodeId, BTreeMap<String, Vec<NodeId>>>,
    /// Next available element id.
    next_id: u64,
}

impl TypedGraph {
    /// Creates an empty graph with no types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a root type. Registering an existing type is a no-op.
    pub fn add_type(&mut self, ty: impl Into<TypeTag>) -> TypeTag {
        let ty = ty.into();
        self.supertypes.entry(ty.clone()).or_default();
        ty
    }

    /// Registers `child` (if needed) as a direct subtype of `parent`.
    pub fn add_subtype(
        &mut self,
        child: impl Into<TypeTag>,
        parent: &TypeTag,
    ) -> Result<TypeTag, GraphError> {
        let child = child.into();
        if !self.supertypes.contains_key(parent) {
            return Err(GraphError::UnknownType(parent.clone()));
        }
        if self.is_subtype(parent, &child) {
            return Err(GraphError::CyclicHierarchy {
                child,
                parent: parent.clone(),
            });
        }
        let parents = self.supertypes.entry(child.clone()).or_default();
        if !parents.contains(parent) {
            parents.push(parent.clone());
        }
        Ok(child)
    }

    /// Checks whether `ty` equals `ancestor` or transitively extends it.
    pub fn is_subtype(&self, ty: &TypeTag, ancestor: &TypeTag) -> bool {
        let mut queue = VecDeque::from([ty]);
        let mut seen = HashSet::new();
        while let Some(current) = queue.pop_front() {
            if current == ancestor {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(parents) = self.supertypes.get(current) {
                queue.extend(parents.iter());
            }
        }
        false
    }

    /// Adds an element of a registered type and returns its fresh id.
    pub fn add_node(&mut self, ty: &TypeTag, name: Option<&str>) -> Result<NodeId, GraphError> {
        if !self.supertypes.contains_key(ty) {
            return Err(GraphError::UnknownType(ty.clone()));
        }
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.elements.insert(
            id,
            Element {
                id,
                ty: ty.clone(),
                name: name.map(str::to_owned),
            },
        );
        Ok(id)
    }

    /// Links `from` to `to` through `relation`. Repeated links are ignored.
    pub fn relate(&mut self, from: NodeId, relation: &str, to: NodeId) -> Result<(), GraphError> {
        for id in [from, to] {
            if !self.elements.contains_key(&id) {
                return Err(GraphError::UnknownElement(id));
            }
        }
        let targets = self
            .relations
            .entry(from)
            .or_default()
            .entry(relation.to_owned())
            .or_default();
        if !targets.contains(&to) {
            targets.push(to);
        }
        Ok(())
    }

    /// Links `from` to `to` through `relation` and `to` back to `from` through `inverse`.
    pub fn relate_with_inverse(
        &mut self,
        from: NodeId,
        relation: &str,
        to: NodeId,
        inverse: &str,
    ) -> Result<(), GraphError> {
        self.relate(from, relation, to)?;
        self.relate(to, inverse, from)
    }

    /// Looks up an element by id.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Returns the number of elements.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.elements.len()
    }

    /// Returns all elements in id order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }
}

impl Graph for TypedGraph {
    fn type_of(&self, id: NodeId) -> Option<&TypeTag> {
        self.elements.get(&id).map(|e| &e.ty)
    }

    fn is_instance(&self, id: NodeId, ty: &TypeTag) -> bool {
        self.type_of(id)
            .map(|own| self.is_subtype(own, ty))
            .unwrap_or(false)
    }

    fn related(&self, id: NodeId, relation: &str) -> Vec<NodeId> {
        self.relations
            .get(&id)
            .and_then(|by_name| by_name.get(relation))
            .cloned()
            .unwrap_or_default()
    }

    fn elements_of(&self, ty: &TypeTag) -> Vec<NodeId> {
        self.elements
            .values()
            .filter(|e| self.is_subtype(&e.ty, ty))
            .map(|e| e.id)
            .collect()
    }

    fn display_name(&self, id: NodeId) -> Option<String> {
        self.elements.get(&id).and_then(|e| e.name.clone())
    }
}
