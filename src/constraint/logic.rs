//! Boolean combinators over mapped constraints.
//!
//! AND needs no combinator: consecutive constraints in a pattern already
//! conjoin. The members of a [`Logic`] constraint are mapped onto the
//! combinator's own local positions, not onto match slots; the combinator is
//! then mapped into a pattern like any other constraint.

use super::{Constraint, MappedConst};
use crate::core::{Graph, NodeId};
use crate::pattern::PatternError;
use std::collections::HashSet;

/// Closed family of boolean combinators.
#[derive(Debug, Clone)]
pub enum Logic {
    /// Negates its member.
    Not(Box<MappedConst>),
    /// Accepts when any member accepts. Generative when every member is
    /// generative into the combinator's last position.
    Or(Vec<MappedConst>),
    /// Accepts when exactly one of the two members accepts.
    Xor(MappedConst, MappedConst),
}

impl Logic {
    pub fn not(member: MappedConst) -> Self {
        Logic::Not(Box::new(member))
    }

    /// Builds a disjunction; at least two members are required.
    ///
    /// When the disjunction is generative, no member may read the output
    /// position it generates into.
    pub fn or(members: Vec<MappedConst>) -> Result<Self, PatternError> {
        if members.len() < 2 {
            return Err(PatternError::TooFewMembers {
                combinator: "or",
                count: members.len(),
            });
        }
        let or = Logic::Or(members);
        if or.is_generative() {
            let output = or.arity() - 1;
            if let Logic::Or(members) = &or {
                let reads_output = members
                    .iter()
                    .any(|mc| mc.positions()[..mc.positions().len() - 1].contains(&output));
                if reads_output {
                    return Err(PatternError::OutputReadAsInput { position: output });
                }
            }
        }
        Ok(or)
    }

    pub fn xor(left: MappedConst, right: MappedConst) -> Self {
        Logic::Xor(left, right)
    }

    fn members(&self) -> Vec<&MappedConst> {
        match self {
            Logic::Not(member) => vec![member.as_ref()],
            Logic::Or(members) => members.iter().collect(),
            Logic::Xor(left, right) => vec![left, right],
        }
    }
}

impl Constraint for Logic {
    fn arity(&self) -> usize {
        self.members()
            .iter()
            .map(|mc| mc.max_position() + 1)
            .max()
            .unwrap_or(0)
    }

    fn is_generative(&self) -> bool {
        match self {
            Logic::Or(members) => {
                let last = self.arity().saturating_sub(1);
                !members.is_empty()
                    && members
                        .iter()
                        .all(|mc| mc.is_generative() && mc.output() == last)
            }
            Logic::Not(_) | Logic::Xor(..) => false,
        }
    }

    fn satisfies(&self, graph: &dyn Graph, bound: &[NodeId]) -> bool {
        // Positions are validated against `arity`, so members never see an unbound slot.
        let holds = |mc: &MappedConst| mc.satisfies(graph, bound).unwrap_or(false);
        match self {
            Logic::Not(member) => !holds(member.as_ref()),
            Logic::Or(members) => members.iter().any(holds),
            Logic::Xor(left, right) => holds(left) != holds(right),
        }
    }

    fn generate(&self, graph: &dyn Graph, prefix: &[NodeId]) -> Vec<NodeId> {
        let Logic::Or(members) = self else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut union = Vec::new();
        for member in members {
            // `or` keeps member inputs below the output, so the prefix covers them.
            let candidates = member.generate(graph, prefix).unwrap_or_default();
            union.extend(candidates.into_iter().filter(|id| seen.insert(*id)));
        }
        union
    }
}
