//! Backtracking search of patterns over a graph.
//!
//! The searcher walks a pattern's constraint sequence depth first. At step
//! `k`, a generative constraint whose output slot is still empty branches
//! over its candidates (bind, recurse, unbind); every other constraint is a
//! filter that either lets the branch continue or cuts it. Reaching the end
//! of the sequence records the current binding array as a result.
//!
//! Per-seed searches are independent of each other and only read the graph,
//! so graph-wide searches can fan out over seeds with rayon. Results are
//! keyed by seed in a `BTreeMap`, which keeps the output identical whether
//! seeds ran sequentially or in parallel.

use crate::config::SearchOptions;
use crate::constraint::Unbound;
use crate::core::{Graph, NodeId, TypeTag};
use crate::fingerprint::HashValue;
use crate::matching::Match;
use crate::pattern::Pattern;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::ControlFlow;
use tracing::{debug, trace, warn};

/// Matches grouped by the seed they were found from.
pub type MatchMap = BTreeMap<NodeId, Vec<Match>>;

/// Errors that abort a search call.
///
/// An empty result is not an error; these only report misuse or a
/// malformed pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The seed is not an instance of the pattern's seed type.
    #[error("seed {seed} is not an instance of `{expected}`")]
    SeedTypeMismatch { seed: NodeId, expected: TypeTag },
    /// A constraint needed a slot that nothing bound before it.
    #[error("constraint #{constraint} reads slot {slot}, which is unbound at that point")]
    UnboundSlot { constraint: usize, slot: usize },
    /// A caller-supplied match has the wrong number of slots.
    #[error("match has {actual} slots, pattern has {expected} variables")]
    MatchSize { expected: usize, actual: usize },
    /// Slot 0 of a caller-supplied match is empty.
    #[error("slot 0 of the starting match is unbound")]
    UnboundSeed,
    /// A projected slot does not exist in the pattern.
    #[error("slot {slot} is out of range for a pattern with {variable_count} variables")]
    SlotOutOfRange { slot: usize, variable_count: usize },
}

/// Receives one notification per searched seed.
pub trait ProgressObserver: Sync {
    /// Called once before the first seed with the number of seeds to search.
    fn set_total(&self, total: usize);
    /// Called after each seed finishes.
    fn tick(&self);
}

/// Runs patterns against a graph.
///
/// # Examples
/// ```
/// use graphmotif::prelude::*;
/// use std::sync::Arc;
///
/// let mut graph = TypedGraph::new();
/// let member = graph.add_type("Member");
/// let complex = graph.add_type("Complex");
/// let p = graph.add_node(&member, Some("p")).unwrap();
/// let c = graph.add_node(&complex, Some("c")).unwrap();
/// graph.relate(p, "memberOf", c).unwrap();
///
/// let mut pattern = Pattern::new("Member");
/// pattern.add_constraint(Arc::new(Traverse::new("memberOf")), &[0, 1]).unwrap();
///
/// let matches = Searcher::new(&graph).search(p, &pattern).unwrap();
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].get(1), Some(c));
/// ```
#[derive(Clone, Copy)]
pub struct Searcher<'g> {
    graph: &'g dyn Graph,
    options: SearchOptions,
    progress: Option<&'g dyn ProgressObserver>,
}

impl<'g> Searcher<'g> {
    /// Creates a searcher with default options.
    pub fn new(graph: &'g dyn Graph) -> Self {
        Self {
            graph,
            options: SearchOptions::default(),
            progress: None,
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Reports per-seed progress of graph-wide searches to `observer`.
    pub fn with_progress(mut self, observer: &'g dyn ProgressObserver) -> Self {
        self.progress = Some(observer);
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Finds every match of `pattern` with `seed` in slot 0.
    pub fn search(&self, seed: NodeId, pattern: &Pattern) -> Result<Vec<Match>, SearchError> {
        if !self.graph.is_instance(seed, pattern.seed_type()) {
            return Err(SearchError::SeedTypeMismatch {
                seed,
                expected: pattern.seed_type().clone(),
            });
        }
        self.collect(pattern, &mut Match::seeded(pattern, seed))
    }

    /// Finds every completion of a caller-supplied, partially bound match.
    ///
    /// Bound slots are kept as given. Slot 0 must be bound to an instance of
    /// the pattern's seed type.
    pub fn search_from(&self, start: &Match, pattern: &Pattern) -> Result<Vec<Match>, SearchError> {
        if start.len() != pattern.variable_count() {
            return Err(SearchError::MatchSize {
                expected: pattern.variable_count(),
                actual: start.len(),
            });
        }
        let seed = start.first().ok_or(SearchError::UnboundSeed)?;
        if !self.graph.is_instance(seed, pattern.seed_type()) {
            return Err(SearchError::SeedTypeMismatch {
                seed,
                expected: pattern.seed_type().clone(),
            });
        }
        self.collect(pattern, &mut start.clone())
    }

    /// Searches from every element of the pattern's seed type.
    pub fn search_over_graph(&self, pattern: &Pattern) -> Result<MatchMap, SearchError> {
        let seeds = self.graph.elements_of(pattern.seed_type());
        self.search_seeds(&seeds, pattern)
    }

    /// Like [`search_over_graph`](Self::search_over_graph) with explicit options.
    pub fn search_with_options(
        &self,
        pattern: &Pattern,
        options: SearchOptions,
    ) -> Result<MatchMap, SearchError> {
        self.with_options(options).search_over_graph(pattern)
    }

    /// Searches from each of `seeds`, in order.
    ///
    /// Seeds of the wrong type are skipped, as are seeds without matches.
    /// A repeated seed is searched once, at its first occurrence. The seed
    /// limit counts seeds that produced matches, taken in the order given.
    pub fn search_seeds(&self, seeds: &[NodeId], pattern: &Pattern) -> Result<MatchMap, SearchError> {
        let mut seen = HashSet::new();
        let valid: Vec<NodeId> = seeds
            .iter()
            .copied()
            .filter(|&seed| {
                seen.insert(seed) && self.graph.is_instance(seed, pattern.seed_type())
            })
            .collect();
        if valid.len() < seeds.len() {
            debug!(
                skipped = seeds.len() - valid.len(),
                seed_type = %pattern.seed_type(),
                "skipping repeated seeds and seeds of the wrong type"
            );
        }
        if let Some(progress) = self.progress {
            progress.set_total(valid.len());
        }

        let limit = self.options.seed_limit.unwrap_or(usize::MAX);
        let per_seed = |seed: NodeId| {
            let found = self.collect(pattern, &mut Match::seeded(pattern, seed));
            if let Some(progress) = self.progress {
                progress.tick();
            }
            found.map(|matches| (seed, matches))
        };

        let mut results = MatchMap::new();
        if self.options.parallel {
            let found: Vec<(NodeId, Vec<Match>)> = valid
                .par_iter()
                .map(|&seed| per_seed(seed))
                .collect::<Result<_, _>>()?;
            results.extend(
                found
                    .into_iter()
                    .filter(|(_, matches)| !matches.is_empty())
                    .take(limit),
            );
        } else {
            for seed in valid {
                if results.len() >= limit {
                    break;
                }
                let (seed, matches) = per_seed(seed)?;
                if !matches.is_empty() {
                    results.insert(seed, matches);
                }
            }
        }

        debug!(
            seeds = seeds.len(),
            matched = results.len(),
            matches = results.values().map(Vec::len).sum::<usize>(),
            parallel = self.options.parallel,
            "graph search finished"
        );
        Ok(results)
    }

    /// Every match from every seed, ordered by seed.
    pub fn search_plain(&self, seeds: &[NodeId], pattern: &Pattern) -> Result<Vec<Match>, SearchError> {
        Ok(self
            .search_seeds(seeds, pattern)?
            .into_values()
            .flatten()
            .collect())
    }

    /// Every match from every element of the seed type, ordered by seed.
    pub fn search_plain_over_graph(&self, pattern: &Pattern) -> Result<Vec<Match>, SearchError> {
        Ok(self
            .search_over_graph(pattern)?
            .into_values()
            .flatten()
            .collect())
    }

    /// Distinct elements bound to `slot` across all matches from `seeds`.
    pub fn search_and_collect(
        &self,
        seeds: &[NodeId],
        pattern: &Pattern,
        slot: usize,
    ) -> Result<BTreeSet<NodeId>, SearchError> {
        check_slot(pattern, slot)?;
        let matches = self.search_seeds(seeds, pattern)?;
        Ok(project(matches.values().flatten(), slot))
    }

    /// Like [`search_and_collect`](Self::search_and_collect), keeping only
    /// elements that are instances of `ty`.
    pub fn search_and_collect_of_type(
        &self,
        seeds: &[NodeId],
        pattern: &Pattern,
        slot: usize,
        ty: &TypeTag,
    ) -> Result<BTreeSet<NodeId>, SearchError> {
        let mut collected = self.search_and_collect(seeds, pattern, slot)?;
        collected.retain(|&id| self.graph.is_instance(id, ty));
        Ok(collected)
    }

    /// Distinct elements bound to `slot` across the whole graph.
    pub fn search_and_collect_over_graph(
        &self,
        pattern: &Pattern,
        slot: usize,
    ) -> Result<BTreeSet<NodeId>, SearchError> {
        check_slot(pattern, slot)?;
        let matches = self.search_over_graph(pattern)?;
        Ok(project(matches.values().flatten(), slot))
    }

    /// Checks whether `pattern` has at least one match with `seeds[i]` in slot `i`.
    ///
    /// Stops at the first match found.
    pub fn has_solution(&self, pattern: &Pattern, seeds: &[NodeId]) -> Result<bool, SearchError> {
        let Some(&seed) = seeds.first() else {
            return Err(SearchError::UnboundSeed);
        };
        if seeds.len() > pattern.variable_count() {
            return Err(SearchError::MatchSize {
                expected: pattern.variable_count(),
                actual: seeds.len(),
            });
        }
        if !self.graph.is_instance(seed, pattern.seed_type()) {
            return Err(SearchError::SeedTypeMismatch {
                seed,
                expected: pattern.seed_type().clone(),
            });
        }
        let mut start = Match::new(pattern.variable_count());
        for (i, &id) in seeds.iter().enumerate() {
            start.set(i, id);
        }
        let flow = self.walk(pattern, &mut start, 0, &mut |_: &Match| ControlFlow::Break(()))?;
        Ok(flow.is_break())
    }

    /// Runs one seed to completion, applying the per-seed options.
    fn collect(&self, pattern: &Pattern, start: &mut Match) -> Result<Vec<Match>, SearchError> {
        let cap = self.options.matches_per_seed.unwrap_or(usize::MAX);
        if cap == 0 {
            return Ok(Vec::new());
        }
        let deduplicate = self.options.deduplicate;
        let mut seen: HashSet<HashValue> = HashSet::new();
        let mut results = Vec::new();
        self.walk(pattern, start, 0, &mut |m: &Match| {
            if deduplicate && !seen.insert(m.element_fingerprint()) {
                trace!(%m, "dropping duplicate element set");
                return ControlFlow::Continue(());
            }
            results.push(m.clone());
            if results.len() >= cap {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        debug!(seed = ?start.first(), matches = results.len(), "seed searched");
        Ok(results)
    }

    /// Processes `constraints[k..]` against `m`, handing complete matches to `sink`.
    ///
    /// `m` is restored to its entry state before returning.
    fn walk(
        &self,
        pattern: &Pattern,
        m: &mut Match,
        k: usize,
        sink: &mut dyn FnMut(&Match) -> ControlFlow<()>,
    ) -> Result<ControlFlow<()>, SearchError> {
        let Some(mc) = pattern.constraints().get(k) else {
            trace!(%m, "match found");
            return Ok(sink(m));
        };

        let output = mc.output();
        if mc.is_generative() && m.get(output).is_none() {
            let candidates = mc
                .generate(self.graph, m.bindings())
                .map_err(|unbound| unbound_slot(k, unbound))?;
            trace!(constraint = k, slot = output, candidates = candidates.len(), "branching");
            for candidate in candidates {
                m.set(output, candidate);
                let flow = self.walk(pattern, m, k + 1, sink);
                m.unset(output);
                if flow?.is_break() {
                    return Ok(ControlFlow::Break(()));
                }
            }
            return Ok(ControlFlow::Continue(()));
        }

        let accepted = mc
            .satisfies(self.graph, m.bindings())
            .map_err(|unbound| unbound_slot(k, unbound))?;
        if !accepted {
            trace!(constraint = k, "rejected");
            return Ok(ControlFlow::Continue(()));
        }
        self.walk(pattern, m, k + 1, sink)
    }
}

fn unbound_slot(constraint: usize, Unbound(slot): Unbound) -> SearchError {
    warn!(constraint, slot, "constraint evaluated with an unbound slot");
    SearchError::UnboundSlot { constraint, slot }
}

fn check_slot(pattern: &Pattern, slot: usize) -> Result<(), SearchError> {
    if slot >= pattern.variable_count() {
        return Err(SearchError::SlotOutOfRange {
            slot,
            variable_count: pattern.variable_count(),
        });
    }
    Ok(())
}

fn project<'a>(matches: impl Iterator<Item = &'a Match>, slot: usize) -> BTreeSet<NodeId> {
    matches.filter_map(|m| m.get(slot)).collect()
}
