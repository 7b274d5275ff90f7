//! Generic building blocks that only rely on the [`Graph`] contract.
//!
//! Domain libraries usually supply richer constraints; these cover type
//! filters, relation traversal, and slot (in)equality.

use super::Constraint;
use crate::core::{Graph, NodeId, TypeTag};
use std::collections::HashSet;
use std::fmt;

/// Accepts an element that is an instance of the given type.
#[derive(Debug, Clone)]
pub struct IsType {
    ty: TypeTag,
}

impl IsType {
    pub fn new(ty: impl Into<TypeTag>) -> Self {
        Self { ty: ty.into() }
    }
}

impl Constraint for IsType {
    fn arity(&self) -> usize {
        1
    }

    fn satisfies(&self, graph: &dyn Graph, bound: &[NodeId]) -> bool {
        graph.is_instance(bound[0], &self.ty)
    }
}

/// Follows a named relation from position 0 and produces position 1.
///
/// When both positions are bound it checks that the second element is
/// reachable from the first.
#[derive(Debug, Clone)]
pub struct Traverse {
    relation: String,
}

impl Traverse {
    pub fn new(relation: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
        }
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }
}

impl Constraint for Traverse {
    fn arity(&self) -> usize {
        2
    }

    fn is_generative(&self) -> bool {
        true
    }

    fn generate(&self, graph: &dyn Graph, prefix: &[NodeId]) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        graph
            .related(prefix[0], &self.relation)
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Compares the elements at its two positions.
#[derive(Debug, Clone, Copy)]
pub struct Equality {
    equal: bool,
}

impl Equality {
    /// Accepts identical elements.
    pub fn equal() -> Self {
        Self { equal: true }
    }

    /// Accepts distinct elements.
    pub fn not_equal() -> Self {
        Self { equal: false }
    }
}

impl Constraint for Equality {
    fn arity(&self) -> usize {
        2
    }

    fn satisfies(&self, _graph: &dyn Graph, bound: &[NodeId]) -> bool {
        (bound[0] == bound[1]) == self.equal
    }
}

type Predicate = dyn Fn(&dyn Graph, &[NodeId]) -> bool + Send + Sync;

/// Checking constraint backed by a closure.
pub struct FnConstraint {
    name: String,
    arity: usize,
    predicate: Box<Predicate>,
}

impl FnConstraint {
    pub fn new<F>(name: impl Into<String>, arity: usize, predicate: F) -> Self
    where
        F: Fn(&dyn Graph, &[NodeId]) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            predicate: Box::new(predicate),
        }
    }
}

impl fmt::Debug for FnConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConstraint")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl Constraint for FnConstraint {
    fn arity(&self) -> usize {
        self.arity
    }

    fn satisfies(&self, graph: &dyn Graph, bound: &[NodeId]) -> bool {
        (self.predicate)(graph, bound)
    }
}
