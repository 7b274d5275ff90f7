//! Constraints and their placement inside a pattern.
//!
//! A [`Constraint`] is a predicate over a fixed number of graph elements,
//! numbered locally `0..arity`. Generative constraints can also enumerate
//! candidates for their last position once the others are bound.
//! [`MappedConst`] pins a shared constraint to concrete slots of a match, so
//! a single constraint instance can be reused at different positions and in
//! different patterns.

pub mod basic;
pub mod logic;

use crate::core::{Graph, NodeId};
use crate::pattern::PatternError;
use std::fmt;
use std::sync::Arc;

pub use basic::{Equality, FnConstraint, IsType, Traverse};
pub use logic::Logic;

/// The atomic unit of pattern logic.
///
/// # Semantic contract
/// - `satisfies` is only called with exactly `arity()` bound elements.
/// - `generate` is only called on generative constraints, with the first
///   `arity() - 1` elements bound, and should not repeat candidates.
/// - Both are pure functions of their arguments and the graph. They never
///   mutate the graph and keep no state between calls.
pub trait Constraint: fmt::Debug + Send + Sync {
    /// Number of elements this constraint reads (and, if generative, writes).
    fn arity(&self) -> usize;

    /// Whether the last position is produced rather than checked.
    fn is_generative(&self) -> bool {
        false
    }

    /// Checks a full assignment of the constraint's positions.
    ///
    /// The default serves generative constraints: the assignment holds when
    /// the last element is one of the candidates generated from the others.
    /// Checking constraints must override it.
    fn satisfies(&self, graph: &dyn Graph, bound: &[NodeId]) -> bool {
        match bound.split_last() {
            Some((last, prefix)) if self.is_generative() => {
                self.generate(graph, prefix).contains(last)
            }
            _ => false,
        }
    }

    /// Enumerates candidates for the last position given the bound prefix.
    fn generate(&self, _graph: &dyn Graph, _prefix: &[NodeId]) -> Vec<NodeId> {
        Vec::new()
    }
}

/// Read access to slot bindings, implemented for both partially bound
/// match arrays and fully bound element lists.
pub trait Slots {
    /// Returns the element at `index`, or `None` if unbound or out of range.
    fn slot(&self, index: usize) -> Option<NodeId>;
}

impl Slots for [Option<NodeId>] {
    #[inline]
    fn slot(&self, index: usize) -> Option<NodeId> {
        self.get(index).copied().flatten()
    }
}

impl Slots for [NodeId] {
    #[inline]
    fn slot(&self, index: usize) -> Option<NodeId> {
        self.get(index).copied()
    }
}

/// A required slot was unbound when its constraint was evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unbound(pub usize);

/// A constraint bound to a tuple of slots.
///
/// `positions[i]` is the slot that feeds the constraint's local position `i`.
/// For a generative constraint, the last entry is the slot it fills.
#[derive(Clone)]
pub struct MappedConst {
    constraint: Arc<dyn Constraint>,
    positions: Vec<usize>,
}

impl MappedConst {
    /// Maps `constraint` onto `positions`.
    ///
    /// Fails when the number of positions differs from the constraint's arity
    /// or when no positions are given.
    pub fn new(constraint: Arc<dyn Constraint>, positions: Vec<usize>) -> Result<Self, PatternError> {
        if positions.is_empty() {
            return Err(PatternError::EmptyMapping);
        }
        if positions.len() != constraint.arity() {
            return Err(PatternError::ArityMismatch {
                expected: constraint.arity(),
                actual: positions.len(),
            });
        }
        Ok(Self {
            constraint,
            positions,
        })
    }

    /// Returns the wrapped constraint.
    pub fn constraint(&self) -> &Arc<dyn Constraint> {
        &self.constraint
    }

    /// Returns the mapped slots.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Returns the last mapped slot (the output slot of a generative constraint).
    pub fn output(&self) -> usize {
        // `new` rejects empty mappings.
        self.positions[self.positions.len() - 1]
    }

    /// Returns the largest slot referenced.
    pub fn max_position(&self) -> usize {
        self.positions.iter().copied().max().unwrap_or(0)
    }

    /// Whether the wrapped constraint is generative.
    pub fn is_generative(&self) -> bool {
        self.constraint.is_generative()
    }

    /// Evaluates the constraint on the mapped slots.
    pub fn satisfies<S>(&self, graph: &dyn Graph, slots: &S) -> Result<bool, Unbound>
    where
        S: Slots + ?Sized,
    {
        let bound = gather(&self.positions, slots)?;
        Ok(self.constraint.satisfies(graph, &bound))
    }

    /// Generates candidates for the output slot from the other mapped slots.
    pub fn generate<S>(&self, graph: &dyn Graph, slots: &S) -> Result<Vec<NodeId>, Unbound>
    where
        S: Slots + ?Sized,
    {
        let prefix = gather(&self.positions[..self.positions.len() - 1], slots)?;
        Ok(self.constraint.generate(graph, &prefix))
    }

    /// Returns a copy whose slot `i` is replaced by `table[i]`.
    pub(crate) fn remap(&self, table: &[usize]) -> Self {
        Self {
            constraint: Arc::clone(&self.constraint),
            positions: self.positions.iter().map(|&p| table[p]).collect(),
        }
    }
}

fn gather<S>(positions: &[usize], slots: &S) -> Result<Vec<NodeId>, Unbound>
where
    S: Slots + ?Sized,
{
    positions
        .iter()
        .map(|&p| slots.slot(p).ok_or(Unbound(p)))
        .collect()
}

impl fmt::Debug for MappedConst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedConst")
            .field("constraint", &self.constraint)
            .field("positions", &self.positions)
            .finish()
    }
}

impl fmt::Display for MappedConst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.constraint, self.positions)
    }
}
