//! graphmotif: declarative pattern matching over typed, relation-linked graphs.
//!
//! This crate provides:
//! - A [`Graph`](core::Graph) access contract and an in-memory [`TypedGraph`].
//! - [`Constraint`]s, the atomic predicates and generators of pattern logic,
//!   with boolean combinators in [`Logic`].
//! - [`Pattern`]s: ordered constraint sequences over numbered, optionally
//!   labeled slots, composable by splicing one pattern into another.
//! - A backtracking [`Searcher`] that enumerates every [`Match`] of a pattern
//!   from one seed, a list of seeds, or a whole graph.
//!
//! # Search model
//!
//! A match is an array of element bindings. Slot 0 holds the seed. The
//! searcher processes constraints in declaration order: a generative
//! constraint whose output slot is empty branches over its candidates, and
//! every other constraint filters the current branch. Declaration order is
//! the only join order; cheap filters declared early prune expensive
//! traversals.
//!
//! # Example
//!
//! ```
//! use graphmotif::prelude::*;
//! use std::sync::Arc;
//!
//! let mut graph = TypedGraph::new();
//! let member = graph.add_type("Member");
//! let complex = graph.add_type("Complex");
//! let p1 = graph.add_node(&member, Some("p1")).unwrap();
//! let p2 = graph.add_node(&member, Some("p2")).unwrap();
//! let c = graph.add_node(&complex, Some("c")).unwrap();
//! for p in [p1, p2] {
//!     graph.relate_with_inverse(p, "memberOf", c, "membersOf").unwrap();
//! }
//!
//! let mut pattern = Pattern::with_label("Member", "member1").unwrap();
//! pattern.add_labeled(Arc::new(Traverse::new("memberOf")), &["member1", "parent"]).unwrap();
//! pattern.add_labeled(Arc::new(Traverse::new("membersOf")), &["parent", "member2"]).unwrap();
//! pattern.add_labeled(Arc::new(Equality::not_equal()), &["member1", "member2"]).unwrap();
//!
//! let found = Searcher::new(&graph).search_over_graph(&pattern).unwrap();
//! assert_eq!(found.len(), 2);
//! assert_eq!(found[&p1][0].get_by_label("member2", &pattern), Ok(Some(p2)));
//! ```

pub mod config;
pub mod constraint;
pub mod core;
pub mod fingerprint;
pub mod matching;
pub mod pattern;
pub mod search;

pub use crate::config::SearchOptions;
pub use crate::constraint::{Constraint, Logic, MappedConst};
pub use crate::core::{Graph, NodeId, TypeTag, TypedGraph};
pub use crate::matching::Match;
pub use crate::pattern::{Pattern, PatternError};
pub use crate::search::{MatchMap, ProgressObserver, SearchError, Searcher};

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::config::SearchOptions;
    pub use crate::constraint::{
        Constraint, Equality, FnConstraint, IsType, Logic, MappedConst, Traverse,
    };
    pub use crate::core::{Graph, GraphError, NodeId, TypeTag, TypedGraph};
    pub use crate::fingerprint::HashValue;
    pub use crate::matching::Match;
    pub use crate::pattern::{Pattern, PatternError};
    pub use crate::search::{MatchMap, ProgressObserver, SearchError, Searcher};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::sync::Arc;

    /// A small pathway: two proteins bound in a complex that feeds a reaction.
    fn pathway() -> (TypedGraph, [NodeId; 4]) {
        let mut graph = TypedGraph::new();
        let entity = graph.add_type("Entity");
        let protein = graph.add_subtype("Protein", &entity).unwrap();
        let complex = graph.add_subtype("Complex", &entity).unwrap();
        let reaction = graph.add_type("Reaction");

        let a = graph.add_node(&protein, Some("A")).unwrap();
        let b = graph.add_node(&protein, Some("B")).unwrap();
        let ab = graph.add_node(&complex, Some("A:B")).unwrap();
        let r = graph.add_node(&reaction, Some("bind")).unwrap();
        for p in [a, b] {
            graph.relate_with_inverse(p, "componentOf", ab, "component").unwrap();
        }
        graph.relate_with_inverse(ab, "participantOf", r, "participant").unwrap();
        (graph, [a, b, ab, r])
    }

    /// Protein -> complex -> reaction, built from two spliced sub-patterns.
    fn protein_to_reaction() -> Pattern {
        let mut into_complex = Pattern::with_label("Protein", "protein").unwrap();
        into_complex
            .add_labeled(Arc::new(Traverse::new("componentOf")), &["protein", "complex"])
            .unwrap();

        let mut into_reaction = Pattern::with_label("Entity", "complex").unwrap();
        into_reaction
            .add_labeled(Arc::new(Traverse::new("participantOf")), &["complex", "reaction"])
            .unwrap();

        let mut pattern = Pattern::with_label("Protein", "protein").unwrap();
        pattern.add_pattern_by_label(&into_complex).unwrap();
        pattern.add_pattern_by_label(&into_reaction).unwrap();
        pattern
    }

    #[test]
    fn spliced_pattern_reaches_the_reaction() {
        let (graph, [a, b, ab, r]) = pathway();
        let pattern = protein_to_reaction();
        assert_eq!(pattern.variable_count(), 3);

        let found = Searcher::new(&graph).search_over_graph(&pattern).unwrap();
        assert_eq!(found.keys().copied().collect::<Vec<_>>(), vec![a, b]);
        for matches in found.values() {
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].get_by_label("complex", &pattern), Ok(Some(ab)));
            assert_eq!(matches[0].get_by_label("reaction", &pattern), Ok(Some(r)));
        }
    }

    #[test]
    fn point_filter_prunes_after_producer() {
        let (graph, [a, _, _, _]) = pathway();
        let mut pattern = protein_to_reaction();
        let complex = pattern.index_of("complex").unwrap();
        pattern
            .insert_point_constraint(Arc::new(IsType::new("Protein")), &[complex])
            .unwrap();
        assert_eq!(pattern.constraints()[1].positions(), &[complex]);
        assert!(Searcher::new(&graph).search(a, &pattern).unwrap().is_empty());
    }

    #[test]
    fn describe_lists_named_elements() {
        let (graph, [a, _, _, _]) = pathway();
        let pattern = protein_to_reaction();
        let matches = Searcher::new(&graph).search(a, &pattern).unwrap();
        assert_eq!(
            matches[0].describe(&graph),
            "0 - A (Protein)\n1 - A:B (Complex)\n2 - bind (Reaction)\n"
        );
    }

    #[test]
    fn or_of_traversals_generates_union() {
        let (graph, [a, _, ab, _]) = pathway();
        let either = Logic::or(vec![
            MappedConst::new(Arc::new(Traverse::new("componentOf")), vec![0, 1]).unwrap(),
            MappedConst::new(Arc::new(Traverse::new("participantOf")), vec![0, 1]).unwrap(),
        ])
        .unwrap();
        let mut pattern = Pattern::new("Entity");
        pattern.add_constraint(Arc::new(either), &[0, 1]).unwrap();

        let collected = Searcher::new(&graph)
            .search_and_collect_over_graph(&pattern, 1)
            .unwrap();
        let reaction = graph.elements_of(&TypeTag::new("Reaction"));
        let mut expected = vec![ab];
        expected.extend(reaction);
        assert_eq!(collected.into_iter().collect::<Vec<_>>(), expected);

        assert!(Searcher::new(&graph).has_solution(&pattern, &[a, ab]).unwrap());
    }
}
