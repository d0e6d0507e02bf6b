#![forbid(unsafe_code)]

//! Slot-to-content permutation.
//!
//! A [`SlotAssignment`] of length N maps slot `i` to content index
//! `assignment[i]`. Every index in `0..N` appears exactly once; constructors
//! reject anything else, and [`SlotAssignment::swap`] is the only mutation,
//! so the permutation property holds for the life of the value.

use std::fmt;

use offergrid_layout::SlotId;
use serde::{Deserialize, Serialize};

/// Why a requested swap did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapNoopReason {
    /// Source and target are the same slot.
    SameSlot,
    /// One of the slots is outside the assignment.
    UnknownSlot(SlotId),
}

impl SwapNoopReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SameSlot => "same_slot",
            Self::UnknownSlot(_) => "unknown_slot",
        }
    }
}

/// Result of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    Swapped { a: SlotId, b: SlotId },
    Noop(SwapNoopReason),
}

impl SwapOutcome {
    #[must_use]
    pub const fn is_swapped(self) -> bool {
        matches!(self, Self::Swapped { .. })
    }
}

/// Anything that can exchange the content of two slots.
///
/// Implemented by [`SlotAssignment`] and by the persisting
/// [`AssignmentStore`](crate::AssignmentStore), so drag controllers can drive
/// either.
pub trait SlotSwap {
    fn swap_slots(&mut self, a: SlotId, b: SlotId) -> SwapOutcome;
}

/// Rejected assignment input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    /// Input length differs from the slot count.
    WrongLength { expected: usize, found: usize },
    /// A content index is `>= slot_count`.
    OutOfRange { content_index: usize, slot_count: usize },
    /// A content index appears more than once.
    Duplicate { content_index: usize },
}

impl fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { expected, found } => {
                write!(f, "assignment has {found} entries, expected {expected}")
            }
            Self::OutOfRange {
                content_index,
                slot_count,
            } => write!(
                f,
                "content index {content_index} out of range for {slot_count} slots"
            ),
            Self::Duplicate { content_index } => {
                write!(f, "content index {content_index} assigned more than once")
            }
        }
    }
}

impl std::error::Error for AssignmentError {}

/// One `(slot, content)` pair of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssignmentEntry {
    pub slot_id: SlotId,
    pub content_index: usize,
}

/// Permutation of `0..N` keyed by slot index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotAssignment {
    content: Vec<usize>,
}

impl SlotAssignment {
    /// Slot `i` shows content `i`.
    #[must_use]
    pub fn identity(slot_count: usize) -> Self {
        Self {
            content: (0..slot_count).collect(),
        }
    }

    /// Validate `indices` as a permutation of `0..slot_count`.
    pub fn new(indices: Vec<usize>, slot_count: usize) -> Result<Self, AssignmentError> {
        if indices.len() != slot_count {
            return Err(AssignmentError::WrongLength {
                expected: slot_count,
                found: indices.len(),
            });
        }
        let mut seen = vec![false; slot_count];
        for &content_index in &indices {
            let Some(flag) = seen.get_mut(content_index) else {
                return Err(AssignmentError::OutOfRange {
                    content_index,
                    slot_count,
                });
            };
            if *flag {
                return Err(AssignmentError::Duplicate { content_index });
            }
            *flag = true;
        }
        Ok(Self { content: indices })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.content.iter().enumerate().all(|(slot, &c)| slot == c)
    }

    /// Content index shown in `slot`.
    #[must_use]
    pub fn content_index(&self, slot: SlotId) -> Option<usize> {
        self.content.get(slot.index()).copied()
    }

    /// Slot currently showing `content_index`.
    #[must_use]
    pub fn slot_showing(&self, content_index: usize) -> Option<SlotId> {
        self.content
            .iter()
            .position(|&c| c == content_index)
            .and_then(|slot| u8::try_from(slot).ok())
            .map(SlotId::new)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.content
    }

    pub fn entries(&self) -> impl Iterator<Item = AssignmentEntry> + '_ {
        self.content
            .iter()
            .enumerate()
            .filter_map(|(slot, &content_index)| {
                u8::try_from(slot).ok().map(|raw| AssignmentEntry {
                    slot_id: SlotId::new(raw),
                    content_index,
                })
            })
    }

    /// Exchange the content of two slots.
    ///
    /// Swapping a slot with itself or naming a slot outside the assignment
    /// leaves it untouched.
    pub fn swap(&mut self, a: SlotId, b: SlotId) -> SwapOutcome {
        for slot in [a, b] {
            if slot.index() >= self.content.len() {
                return SwapOutcome::Noop(SwapNoopReason::UnknownSlot(slot));
            }
        }
        if a == b {
            return SwapOutcome::Noop(SwapNoopReason::SameSlot);
        }
        self.content.swap(a.index(), b.index());
        SwapOutcome::Swapped { a, b }
    }
}

impl SlotSwap for SlotAssignment {
    fn swap_slots(&mut self, a: SlotId, b: SlotId) -> SwapOutcome {
        self.swap(a, b)
    }
}
