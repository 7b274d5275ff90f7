//! Patterns: ordered constraint sequences over numbered slots.
//!
//! A pattern describes a reusable subgraph shape. Slot 0 holds the seed; every
//! other slot is produced by a generative constraint (or by a spliced
//! sub-pattern). The order of the constraint sequence is significant: each
//! constraint may only read slots produced by earlier ones, and cheap filters
//! placed early prune the search before expensive traversals.
//!
//! Patterns are assembled from smaller ones with [`Pattern::add_pattern`],
//! which renumbers the sub-pattern's slots and unifies shared labels.

use crate::constraint::{Constraint, MappedConst};
use crate::core::TypeTag;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Errors raised while building a pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// A constraint was mapped onto the wrong number of slots.
    #[error("constraint expects {expected} positions, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    /// A constraint was mapped onto no slots at all.
    #[error("constraint mapped onto an empty position list")]
    EmptyMapping,
    /// A slot index does not exist (yet) in the pattern.
    #[error("index {index} is out of range for a pattern with {variable_count} variables")]
    IndexOutOfRange { index: usize, variable_count: usize },
    /// A generative constraint tried to produce a slot beyond the next free one.
    #[error("generated index {index} skips ahead; the next free index is {next}")]
    GeneratedIndexTooLarge { index: usize, next: usize },
    /// The label is already in use.
    #[error("label \"{0}\" already exists")]
    DuplicateLabel(String),
    /// The index already carries a label.
    #[error("index {index} already has the label \"{label}\"")]
    IndexAlreadyLabeled { index: usize, label: String },
    /// The label is absent from the pattern.
    #[error("the label \"{0}\" is absent in pattern")]
    UnknownLabel(String),
    /// A label names different slots in the two patterns being spliced.
    #[error("label \"{label}\" is at index {existing}, but the splice anchors it at {anchor}")]
    LabelConflict {
        label: String,
        existing: usize,
        anchor: usize,
    },
    /// Label-driven splicing needs a label on the sub-pattern's seed.
    #[error("the seed of the spliced pattern has no label")]
    UnlabeledSeed,
    /// Point constraints must read exactly one slot.
    #[error("point constraints must have arity 1, got {arity}")]
    NotUnary { arity: usize },
    /// A generative combinator member reads the position it generates into.
    #[error("combinator member reads its own output position {position}")]
    OutputReadAsInput { position: usize },
    /// A combinator received too few members.
    #[error("`{combinator}` needs at least two members, got {count}")]
    TooFewMembers {
        combinator: &'static str,
        count: usize,
    },
}

/// An ordered list of mapped constraints plus slot bookkeeping.
///
/// # Invariants
/// - Every mapped position is `< variable_count`.
/// - Labels and labeled indices are in one-to-one correspondence.
/// - A constraint only reads slots produced by earlier constraints (or slot 0);
///   this is enforced for constraints added through the builder methods.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Required type of the seed element.
    seed_type: TypeTag,
    /// Number of slots in a match of this pattern.
    variable_count: usize,
    /// Constraint sequence, in evaluation order.
    constraints: Vec<MappedConst>,
    /// Label -> slot.
    labels: BTreeMap<String, usize>,
    /// Slot -> label, kept in sync with `labels`.
    slot_labels: BTreeMap<usize, String>,
}

impl Pattern {
    /// Creates a pattern with a single (seed) slot and no constraints.
    pub fn new(seed_type: impl Into<TypeTag>) -> Self {
        Self {
            seed_type: seed_type.into(),
            variable_count: 1,
            constraints: Vec::new(),
            labels: BTreeMap::new(),
            slot_labels: BTreeMap::new(),
        }
    }

    /// Creates a pattern whose seed slot carries `label`.
    pub fn with_label(seed_type: impl Into<TypeTag>, label: &str) -> Result<Self, PatternError> {
        let mut pattern = Self::new(seed_type);
        pattern.label(label, 0)?;
        Ok(pattern)
    }

    /// Required type of the seed element.
    pub fn seed_type(&self) -> &TypeTag {
        &self.seed_type
    }

    /// Number of slots in a match.
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// The constraint sequence in evaluation order.
    pub fn constraints(&self) -> &[MappedConst] {
        &self.constraints
    }

    /// Maps `constraint` onto `positions` and appends it.
    ///
    /// Non-output positions must already exist. A generative constraint may
    /// name `variable_count` as its output, which allocates a new slot.
    pub fn add_constraint(
        &mut self,
        constraint: Arc<dyn Constraint>,
        positions: &[usize],
    ) -> Result<(), PatternError> {
        let mc = MappedConst::new(constraint, positions.to_vec())?;
        let generative = mc.is_generative();
        let inputs = if generative {
            &positions[..positions.len() - 1]
        } else {
            positions
        };
        if let Some(&index) = inputs.iter().find(|&&p| p >= self.variable_count) {
            return Err(PatternError::IndexOutOfRange {
                index,
                variable_count: self.variable_count,
            });
        }
        let output = mc.output();
        if generative && output > self.variable_count {
            return Err(PatternError::GeneratedIndexTooLarge {
                index: output,
                next: self.variable_count,
            });
        }
        if generative && output == self.variable_count {
            self.variable_count += 1;
        }
        self.constraints.push(mc);
        Ok(())
    }

    /// Like [`add_constraint`](Self::add_constraint), then labels the last position.
    pub fn add_constraint_labeled(
        &mut self,
        constraint: Arc<dyn Constraint>,
        label: &str,
        positions: &[usize],
    ) -> Result<(), PatternError> {
        if let Some(&target) = positions.last() {
            self.check_label_free(label, target)?;
        }
        self.add_constraint(constraint, positions)?;
        self.label(label, positions[positions.len() - 1])
    }

    /// Adds a constraint addressed by labels instead of indices.
    ///
    /// Every label must exist, except that the last label of a generative
    /// constraint may be new: it then names a freshly allocated slot.
    pub fn add_labeled(
        &mut self,
        constraint: Arc<dyn Constraint>,
        labels: &[&str],
    ) -> Result<(), PatternError> {
        let generative = constraint.is_generative();
        let mut positions = Vec::with_capacity(labels.len());
        let mut fresh = None;
        for (i, &label) in labels.iter().enumerate() {
            match self.labels.get(label) {
                Some(&index) => positions.push(index),
                None if generative && i + 1 == labels.len() => {
                    positions.push(self.variable_count);
                    fresh = Some(label);
                }
                None => return Err(PatternError::UnknownLabel(label.to_owned())),
            }
        }
        self.add_constraint(constraint, &positions)?;
        if let Some(label) = fresh {
            self.label(label, self.variable_count - 1)?;
        }
        Ok(())
    }

    /// Reserves a slot that the caller binds before searching.
    ///
    /// Used with [`Searcher::search_from`](crate::search::Searcher::search_from)
    /// and [`Searcher::has_solution`](crate::search::Searcher::has_solution);
    /// searching with the slot left unbound fails with `UnboundSlot`.
    pub fn add_variable(&mut self) -> usize {
        self.variable_count += 1;
        self.variable_count - 1
    }

    /// Attaches `label` to slot `index`.
    pub fn label(&mut self, label: &str, index: usize) -> Result<(), PatternError> {
        self.check_label_free(label, index)?;
        if index >= self.variable_count {
            return Err(PatternError::IndexOutOfRange {
                index,
                variable_count: self.variable_count,
            });
        }
        self.insert_label(label.to_owned(), index);
        Ok(())
    }

    /// Renames an existing label.
    pub fn update_label(&mut self, old: &str, new: &str) -> Result<(), PatternError> {
        if self.has_label(new) {
            return Err(PatternError::DuplicateLabel(new.to_owned()));
        }
        let index = self.index_of(old)?;
        self.labels.remove(old);
        self.insert_label(new.to_owned(), index);
        Ok(())
    }

    /// Returns the slot named by `label`.
    pub fn index_of(&self, label: &str) -> Result<usize, PatternError> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| PatternError::UnknownLabel(label.to_owned()))
    }

    /// Returns the label of slot `index`, if any.
    pub fn label_of(&self, index: usize) -> Option<&str> {
        self.slot_labels.get(&index).map(String::as_str)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }

    /// Label -> slot pairs in label order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, usize)> {
        self.labels.iter().map(|(l, &i)| (l.as_str(), i))
    }

    /// Splices `sub` into this pattern, identifying `sub`'s seed with `anchor`.
    ///
    /// Slots of `sub` whose label also exists here are unified with the
    /// existing slot. All other slots of `sub` (except the seed) get fresh
    /// indices after the current `variable_count`, in `sub`'s order, and
    /// carry their labels over.
    pub fn add_pattern(&mut self, sub: &Pattern, anchor: usize) -> Result<(), PatternError> {
        if anchor >= self.variable_count {
            return Err(PatternError::IndexOutOfRange {
                index: anchor,
                variable_count: self.variable_count,
            });
        }
        let seed_label = sub.label_of(0);
        if let Some(label) = seed_label {
            if let Some(&existing) = self.labels.get(label) {
                if existing != anchor {
                    return Err(PatternError::LabelConflict {
                        label: label.to_owned(),
                        existing,
                        anchor,
                    });
                }
            }
        }

        let table = self.splice_table(sub, anchor);
        let next = self.variable_count + table.fresh.len();

        self.constraints
            .extend(sub.constraints.iter().map(|mc| mc.remap(&table.slots)));
        self.variable_count = next;
        for (label, index) in table.fresh {
            if let Some(label) = label {
                self.insert_label(label, index);
            }
        }
        if let Some(label) = seed_label {
            if !self.has_label(label) && self.label_of(anchor).is_none() {
                self.insert_label(label.to_owned(), anchor);
            }
        }
        debug!(
            anchor,
            unified = table.unified,
            variable_count = self.variable_count,
            "spliced sub-pattern"
        );
        Ok(())
    }

    /// Splices `sub` at the slot carrying the same label as `sub`'s seed.
    pub fn add_pattern_by_label(&mut self, sub: &Pattern) -> Result<(), PatternError> {
        let label = sub.label_of(0).ok_or(PatternError::UnlabeledSeed)?;
        let anchor = self.index_of(label)?;
        self.add_pattern(sub, anchor)
    }

    /// Inserts a unary constraint right after the producer of each slot.
    ///
    /// For each index, the constraint lands immediately after the last mapped
    /// constraint whose final position is that index. Slots that no
    /// constraint ends at (the seed, or slots bound by the caller) are checked
    /// first, so the constraint goes to the front.
    pub fn insert_point_constraint(
        &mut self,
        constraint: Arc<dyn Constraint>,
        indices: &[usize],
    ) -> Result<(), PatternError> {
        if constraint.arity() != 1 {
            return Err(PatternError::NotUnary {
                arity: constraint.arity(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= self.variable_count) {
            return Err(PatternError::IndexOutOfRange {
                index,
                variable_count: self.variable_count,
            });
        }
        for &index in indices {
            let at = self
                .constraints
                .iter()
                .rposition(|mc| mc.output() == index)
                .map_or(0, |producer| producer + 1);
            let mc = MappedConst::new(Arc::clone(&constraint), vec![index])?;
            self.constraints.insert(at, mc);
        }
        Ok(())
    }

    /// Builds the slot renumbering for splicing `sub` at `anchor`.
    fn splice_table(&self, sub: &Pattern, anchor: usize) -> SpliceTable {
        let mut slots = Vec::with_capacity(sub.variable_count);
        let mut fresh = Vec::new();
        let mut unified = 0;
        slots.push(anchor);
        for j in 1..sub.variable_count {
            let label = sub.label_of(j);
            match label.and_then(|l| self.labels.get(l)) {
                Some(&existing) => {
                    slots.push(existing);
                    unified += 1;
                }
                None => {
                    let index = self.variable_count + fresh.len();
                    slots.push(index);
                    fresh.push((label.map(str::to_owned), index));
                }
            }
        }
        SpliceTable {
            slots,
            fresh,
            unified,
        }
    }

    fn check_label_free(&self, label: &str, index: usize) -> Result<(), PatternError> {
        if self.has_label(label) {
            return Err(PatternError::DuplicateLabel(label.to_owned()));
        }
        if let Some(existing) = self.label_of(index) {
            return Err(PatternError::IndexAlreadyLabeled {
                index,
                label: existing.to_owned(),
            });
        }
        Ok(())
    }

    fn insert_label(&mut self, label: String, index: usize) {
        self.slot_labels.insert(index, label.clone());
        self.labels.insert(label, index);
    }
}

/// Renumbering produced for one `add_pattern` call.
struct SpliceTable {
    /// `slots[j]` is the slot in the host pattern that `sub` slot `j` maps to.
    slots: Vec<usize>,
    /// Freshly allocated host slots with the label they inherit.
    fresh: Vec<(Option<String>, usize)>,
    /// Number of non-seed slots unified through shared labels.
    unified: usize,
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Pattern<{}> ({} variables)",
            self.seed_type, self.variable_count
        )?;
        for (k, mc) in self.constraints.iter().enumerate() {
            let slots: Vec<String> = mc
                .positions()
                .iter()
                .map(|&p| match self.label_of(p) {
                    Some(label) => format!("{p}:{label}"),
                    None => p.to_string(),
                })
                .collect();
            let kind = if mc.is_generative() { "gen" } else { "chk" };
            writeln!(f, "  {k:>3} {kind} {:?} [{}]", mc.constraint(), slots.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Equality, IsType, Traverse};

    fn traverse(relation: &str) -> Arc<dyn Constraint> {
        Arc::new(Traverse::new(relation))
    }

    fn not_equal() -> Arc<dyn Constraint> {
        Arc::new(Equality::not_equal())
    }

    fn positions(pattern: &Pattern) -> Vec<Vec<usize>> {
        pattern
            .constraints()
            .iter()
            .map(|mc| mc.positions().to_vec())
            .collect()
    }

    #[test]
    fn empty_pattern_has_only_the_seed() {
        let pattern = Pattern::new("Member");
        assert_eq!(pattern.variable_count(), 1);
        assert!(pattern.constraints().is_empty());
        assert_eq!(pattern.seed_type(), &TypeTag::new("Member"));
    }

    #[test]
    fn generative_constraints_allocate_slots() {
        let mut p = Pattern::new("Member");
        p.add_constraint(traverse("memberOf"), &[0, 1]).unwrap();
        p.add_constraint(traverse("membersOf"), &[1, 2]).unwrap();
        p.add_constraint(not_equal(), &[0, 2]).unwrap();
        assert_eq!(p.variable_count(), 3);
        assert_eq!(positions(&p), vec![vec![0, 1], vec![1, 2], vec![0, 2]]);
    }

    #[test]
    fn construction_errors_are_eager() {
        let mut p = Pattern::new("Member");
        assert_eq!(
            p.add_constraint(traverse("r"), &[0]),
            Err(PatternError::ArityMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            p.add_constraint(traverse("r"), &[0, 2]),
            Err(PatternError::GeneratedIndexTooLarge { index: 2, next: 1 })
        );
        assert_eq!(
            p.add_constraint(traverse("r"), &[1, 1]),
            Err(PatternError::IndexOutOfRange {
                index: 1,
                variable_count: 1
            })
        );
        assert_eq!(
            p.add_constraint(not_equal(), &[0, 1]),
            Err(PatternError::IndexOutOfRange {
                index: 1,
                variable_count: 1
            })
        );
        assert!(p.constraints().is_empty());
        assert_eq!(p.variable_count(), 1);
    }

    #[test]
    fn labels_roundtrip_and_reject_duplicates() {
        let mut p = Pattern::with_label("Member", "member1").unwrap();
        p.add_constraint_labeled(traverse("memberOf"), "parent", &[0, 1])
            .unwrap();
        assert_eq!(p.index_of("member1"), Ok(0));
        assert_eq!(p.index_of("parent"), Ok(1));
        assert_eq!(p.label_of(1), Some("parent"));

        assert_eq!(
            p.label("parent", 0),
            Err(PatternError::DuplicateLabel("parent".into()))
        );
        assert_eq!(
            p.label("other", 1),
            Err(PatternError::IndexAlreadyLabeled {
                index: 1,
                label: "parent".into()
            })
        );
        assert_eq!(
            p.label("far", 5),
            Err(PatternError::IndexOutOfRange {
                index: 5,
                variable_count: 2
            })
        );
        assert_eq!(
            p.index_of("missing"),
            Err(PatternError::UnknownLabel("missing".into()))
        );
    }

    #[test]
    fn labeled_add_validates_before_mutating() {
        let mut p = Pattern::with_label("Member", "member1").unwrap();
        let err = p
            .add_constraint_labeled(traverse("memberOf"), "member1", &[0, 1])
            .unwrap_err();
        assert_eq!(err, PatternError::DuplicateLabel("member1".into()));
        assert!(p.constraints().is_empty());
        assert_eq!(p.variable_count(), 1);
    }

    #[test]
    fn update_label_moves_the_name() {
        let mut p = Pattern::with_label("Member", "a").unwrap();
        p.update_label("a", "b").unwrap();
        assert!(!p.has_label("a"));
        assert_eq!(p.index_of("b"), Ok(0));
        assert_eq!(p.label_of(0), Some("b"));
        assert_eq!(
            p.update_label("missing", "c"),
            Err(PatternError::UnknownLabel("missing".into()))
        );
    }

    #[test]
    fn add_labeled_allocates_new_generated_label() {
        let mut p = Pattern::with_label("Member", "member1").unwrap();
        p.add_labeled(traverse("memberOf"), &["member1", "parent"])
            .unwrap();
        p.add_labeled(traverse("membersOf"), &["parent", "member2"])
            .unwrap();
        p.add_labeled(not_equal(), &["member1", "member2"]).unwrap();
        assert_eq!(p.variable_count(), 3);
        assert_eq!(p.index_of("member2"), Ok(2));
        assert_eq!(positions(&p), vec![vec![0, 1], vec![1, 2], vec![0, 2]]);

        assert_eq!(
            p.add_labeled(not_equal(), &["member1", "nowhere"]),
            Err(PatternError::UnknownLabel("nowhere".into()))
        );
    }

    fn sibling_sub() -> Pattern {
        let mut sub = Pattern::with_label("Member", "member").unwrap();
        sub.add_constraint_labeled(traverse("memberOf"), "parent", &[0, 1])
            .unwrap();
        sub.add_constraint_labeled(traverse("membersOf"), "sibling", &[1, 2])
            .unwrap();
        sub.add_constraint(not_equal(), &[0, 2]).unwrap();
        sub
    }

    #[test]
    fn splice_anchors_seed_and_appends_fresh_slots() {
        let mut host = Pattern::with_label("Complex", "complex").unwrap();
        host.add_constraint_labeled(traverse("membersOf"), "member", &[0, 1])
            .unwrap();

        let sub = sibling_sub();
        host.add_pattern(&sub, 1).unwrap();

        // sub slot 0 -> 1 (anchor), "parent" -> 2, "sibling" -> 3
        assert_eq!(host.variable_count(), 4);
        assert_eq!(
            positions(&host),
            vec![vec![0, 1], vec![1, 2], vec![2, 3], vec![1, 3]]
        );
        assert_eq!(host.index_of("parent"), Ok(2));
        assert_eq!(host.index_of("sibling"), Ok(3));
        assert_eq!(host.index_of("member"), Ok(1));
    }

    #[test]
    fn splice_unifies_shared_labels() {
        let mut host = Pattern::with_label("Member", "member").unwrap();
        host.add_constraint_labeled(traverse("memberOf"), "parent", &[0, 1])
            .unwrap();

        let sub = sibling_sub();
        host.add_pattern(&sub, 0).unwrap();

        // "parent" is shared, so only "sibling" is new:
        // growth = sub.variable_count - (1 + 1 unified) = 1
        assert_eq!(host.variable_count(), 3);
        assert_eq!(
            positions(&host),
            vec![vec![0, 1], vec![0, 1], vec![1, 2], vec![0, 2]]
        );
        assert_eq!(host.index_of("sibling"), Ok(2));
    }

    #[test]
    fn splice_seed_label_conflict_is_rejected() {
        let mut host = Pattern::with_label("Complex", "member").unwrap();
        host.add_constraint_labeled(traverse("membersOf"), "m", &[0, 1])
            .unwrap();
        let err = host.add_pattern(&sibling_sub(), 1).unwrap_err();
        assert_eq!(
            err,
            PatternError::LabelConflict {
                label: "member".into(),
                existing: 0,
                anchor: 1
            }
        );
        assert_eq!(host.constraints().len(), 1);
    }

    #[test]
    fn splice_unlabeled_seed_is_not_renumbered() {
        let mut sub = Pattern::new("Member");
        sub.add_constraint(traverse("memberOf"), &[0, 1]).unwrap();

        let mut host = Pattern::new("Complex");
        host.add_constraint(traverse("membersOf"), &[0, 1]).unwrap();
        host.add_pattern(&sub, 1).unwrap();
        host.add_pattern(&sub, 1).unwrap();

        assert_eq!(host.variable_count(), 4);
        assert_eq!(positions(&host), vec![vec![0, 1], vec![1, 2], vec![1, 3]]);
    }

    #[test]
    fn splice_by_label_finds_the_anchor() {
        let mut host = Pattern::with_label("Complex", "complex").unwrap();
        host.add_constraint_labeled(traverse("membersOf"), "member", &[0, 1])
            .unwrap();
        host.add_pattern_by_label(&sibling_sub()).unwrap();
        assert_eq!(host.index_of("sibling"), Ok(3));

        let unlabeled = Pattern::new("Member");
        assert_eq!(
            host.add_pattern_by_label(&unlabeled),
            Err(PatternError::UnlabeledSeed)
        );
        assert_eq!(
            host.add_pattern(&unlabeled, 9),
            Err(PatternError::IndexOutOfRange {
                index: 9,
                variable_count: 4
            })
        );
    }

    #[test]
    fn point_constraint_follows_last_producer() {
        let mut p = Pattern::new("Member");
        p.add_constraint(traverse("memberOf"), &[0, 1]).unwrap();
        p.add_constraint(traverse("membersOf"), &[1, 2]).unwrap();
        p.add_constraint(traverse("partnerOf"), &[2, 3]).unwrap();

        let filter: Arc<dyn Constraint> = Arc::new(IsType::new("Complex"));
        p.insert_point_constraint(filter, &[1, 3]).unwrap();
        assert_eq!(
            positions(&p),
            vec![vec![0, 1], vec![1], vec![1, 2], vec![2, 3], vec![3]]
        );
    }

    #[test]
    fn point_constraint_uses_the_last_constraint_ending_at_slot() {
        let mut p = Pattern::new("Member");
        p.add_constraint(traverse("memberOf"), &[0, 1]).unwrap();
        p.add_constraint(traverse("membersOf"), &[1, 2]).unwrap();
        p.add_constraint(not_equal(), &[0, 2]).unwrap();
        p.add_constraint(traverse("partnerOf"), &[2, 3]).unwrap();

        p.insert_point_constraint(Arc::new(IsType::new("Member")), &[2])
            .unwrap();
        assert_eq!(
            positions(&p),
            vec![vec![0, 1], vec![1, 2], vec![0, 2], vec![2], vec![2, 3]]
        );
    }

    #[test]
    fn point_constraint_on_seed_goes_first() {
        let mut p = Pattern::new("Member");
        p.add_constraint(traverse("memberOf"), &[0, 1]).unwrap();
        p.insert_point_constraint(Arc::new(IsType::new("Member")), &[0])
            .unwrap();
        assert_eq!(positions(&p), vec![vec![0], vec![0, 1]]);
    }

    #[test]
    fn reserved_variable_is_checked_up_front() {
        let mut p = Pattern::new("Member");
        p.add_constraint(traverse("memberOf"), &[0, 1]).unwrap();
        let target = p.add_variable();
        assert_eq!(target, 2);
        p.add_constraint(Arc::new(Equality::equal()), &[target, 1])
            .unwrap();
        p.insert_point_constraint(Arc::new(IsType::new("Complex")), &[target])
            .unwrap();
        assert_eq!(positions(&p), vec![vec![2], vec![0, 1], vec![2, 1]]);
    }

    #[test]
    fn point_constraint_must_be_unary_and_in_range() {
        let mut p = Pattern::new("Member");
        assert_eq!(
            p.insert_point_constraint(not_equal(), &[0]),
            Err(PatternError::NotUnary { arity: 2 })
        );
        assert_eq!(
            p.insert_point_constraint(Arc::new(IsType::new("Member")), &[3]),
            Err(PatternError::IndexOutOfRange {
                index: 3,
                variable_count: 1
            })
        );
    }

    #[test]
    fn display_lists_constraints_with_labels() {
        let mut p = Pattern::with_label("Member", "member1").unwrap();
        p.add_constraint_labeled(traverse("memberOf"), "parent", &[0, 1])
            .unwrap();
        let text = p.to_string();
        assert!(text.starts_with("Pattern<Member> (2 variables)"));
        assert!(text.contains("gen"));
        assert!(text.contains("0:member1, 1:parent"));
    }
}
