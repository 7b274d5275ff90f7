//! Match: the binding array a search fills in.
//!
//! A match has one slot per pattern variable. Slots hold element handles, so
//! cloning a match copies the binding array and never the elements.

use crate::core::{Graph, NodeId};
use crate::fingerprint::{element_set_fingerprint, slot_fingerprint, HashValue};
use crate::pattern::{Pattern, PatternError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-length array of (possibly unbound) element bindings.
///
/// # Invariant
/// - The length equals the owning pattern's `variable_count`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    slots: Vec<Option<NodeId>>,
}

impl Match {
    /// Creates a match with `size` unbound slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    /// Creates a match sized for `pattern` with `seed` bound to slot 0.
    pub fn seeded(pattern: &Pattern, seed: NodeId) -> Self {
        let mut m = Self::new(pattern.variable_count());
        m.set(0, seed);
        m
    }

    /// Returns the element at `index`, or `None` if unbound or out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.slots.get(index).copied().flatten()
    }

    /// Returns the element bound to the slot `label` names in `pattern`.
    pub fn get_by_label(&self, label: &str, pattern: &Pattern) -> Result<Option<NodeId>, PatternError> {
        Ok(self.get(pattern.index_of(label)?))
    }

    /// Binds `element` to slot `index`.
    ///
    /// # Panics
    /// If `index` is out of range.
    #[inline]
    pub fn set(&mut self, index: usize, element: NodeId) {
        self.slots[index] = Some(element);
    }

    /// Clears slot `index`.
    ///
    /// # Panics
    /// If `index` is out of range.
    #[inline]
    pub fn unset(&mut self, index: usize) {
        self.slots[index] = None;
    }

    /// Returns the element in slot 0 (the seed).
    pub fn first(&self) -> Option<NodeId> {
        self.get(0)
    }

    /// Returns the element in the last slot.
    pub fn last(&self) -> Option<NodeId> {
        self.slots.last().copied().flatten()
    }

    /// Checks that every listed slot is bound.
    pub fn all_bound(&self, indices: &[usize]) -> bool {
        indices.iter().all(|&i| self.get(i).is_some())
    }

    /// Checks that every slot is bound.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The raw binding array.
    #[inline]
    pub fn bindings(&self) -> &[Option<NodeId>] {
        &self.slots
    }

    /// Bound elements in slot order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Returns a match restricted to `indices`, in the given order.
    pub fn project(&self, indices: &[usize]) -> Match {
        Match {
            slots: indices.iter().map(|&i| self.get(i)).collect(),
        }
    }

    /// Slot-by-slot fingerprint.
    pub fn fingerprint(&self) -> HashValue {
        slot_fingerprint(self)
    }

    /// Fingerprint of the bound element set, ignoring slot order.
    pub fn element_fingerprint(&self) -> HashValue {
        element_set_fingerprint(self)
    }

    /// Renders one line per bound slot as `index - name (Type)`.
    ///
    /// Elements without a display name fall back to their id.
    pub fn describe(&self, graph: &dyn Graph) -> String {
        let mut out = String::new();
        for (i, slot) in self.slots.iter().enumerate() {
            let Some(id) = slot else { continue };
            let name = graph.display_name(*id).unwrap_or_else(|| id.to_string());
            match graph.type_of(*id) {
                Some(ty) => out.push_str(&format!("{i} - {name} ({ty})\n")),
                None => out.push_str(&format!("{i} - {name}\n")),
            }
        }
        out
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match slot {
                Some(id) => write!(f, "{}", id.as_u64())?,
                None => f.write_str("_")?,
            }
        }
        f.write_str("]")
    }
}
