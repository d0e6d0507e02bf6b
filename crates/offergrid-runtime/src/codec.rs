#![forbid(unsafe_code)]

//! JSON codec for persisted assignments.
//!
//! Two shapes are accepted on decode:
//!
//! ```json
//! [2, 1, 0, 3, 4, 5, 6]
//! [{"slotId": 0, "contentIndex": 2}, {"slotId": 1, "contentIndex": 1}, ...]
//! ```
//!
//! The positional array is what [`encode_assignment`] writes. The pair form
//! may list slots in any order but must name each slot exactly once. Either
//! shape must decode to a full permutation for the current slot count or
//! the whole value is rejected; partial values are never merged.

use std::fmt;

use offergrid_layout::SlotId;
use serde::Deserialize;

use crate::assignment::{AssignmentEntry, AssignmentError, SlotAssignment};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PersistedAssignment {
    Positional(Vec<usize>),
    Pairs(Vec<AssignmentEntry>),
}

/// Why a persisted value could not be used.
#[derive(Debug)]
pub enum AssignmentDecodeError {
    /// Not JSON, or JSON of the wrong shape.
    Json(serde_json::Error),
    /// A pair names a slot outside the plan.
    SlotOutOfRange { slot: SlotId, slot_count: usize },
    /// A pair names the same slot twice.
    DuplicateSlot { slot: SlotId },
    /// The decoded indices are not a permutation.
    Invalid(AssignmentError),
}

impl AssignmentDecodeError {
    /// Short stable label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Json(_) => "malformed_json",
            Self::SlotOutOfRange { .. } => "slot_out_of_range",
            Self::DuplicateSlot { .. } => "duplicate_slot",
            Self::Invalid(AssignmentError::WrongLength { .. }) => "wrong_length",
            Self::Invalid(_) => "not_a_permutation",
        }
    }
}

impl fmt::Display for AssignmentDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::SlotOutOfRange { slot, slot_count } => {
                write!(f, "{slot} out of range for {slot_count} slots")
            }
            Self::DuplicateSlot { slot } => write!(f, "{slot} listed more than once"),
            Self::Invalid(e) => write!(f, "invalid assignment: {e}"),
        }
    }
}

impl std::error::Error for AssignmentDecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Invalid(e) => Some(e),
            Self::SlotOutOfRange { .. } | Self::DuplicateSlot { .. } => None,
        }
    }
}

impl From<serde_json::Error> for AssignmentDecodeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<AssignmentError> for AssignmentDecodeError {
    fn from(e: AssignmentError) -> Self {
        Self::Invalid(e)
    }
}

/// Serialize as a positional JSON array.
pub fn encode_assignment(assignment: &SlotAssignment) -> serde_json::Result<String> {
    serde_json::to_string(assignment.as_slice())
}

/// Parse and validate a persisted assignment for `slot_count` slots.
pub fn decode_assignment(
    raw: &str,
    slot_count: usize,
) -> Result<SlotAssignment, AssignmentDecodeError> {
    let indices = match serde_json::from_str::<PersistedAssignment>(raw)? {
        PersistedAssignment::Positional(indices) => indices,
        PersistedAssignment::Pairs(pairs) => positional_from_pairs(&pairs, slot_count)?,
    };
    Ok(SlotAssignment::new(indices, slot_count)?)
}

fn positional_from_pairs(
    pairs: &[AssignmentEntry],
    slot_count: usize,
) -> Result<Vec<usize>, AssignmentDecodeError> {
    if pairs.len() != slot_count {
        return Err(AssignmentError::WrongLength {
            expected: slot_count,
            found: pairs.len(),
        }
        .into());
    }
    let mut indices: Vec<Option<usize>> = vec![None; slot_count];
    for pair in pairs {
        let cell = indices
            .get_mut(pair.slot_id.index())
            .ok_or(AssignmentDecodeError::SlotOutOfRange {
                slot: pair.slot_id,
                slot_count,
            })?;
        if cell.is_some() {
            return Err(AssignmentDecodeError::DuplicateSlot { slot: pair.slot_id });
        }
        *cell = Some(pair.content_index);
    }
    // Length matches and no slot repeats, so every cell is filled.
    Ok(indices.into_iter().flatten().collect())
}
