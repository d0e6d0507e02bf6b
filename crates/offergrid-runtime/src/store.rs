#![forbid(unsafe_code)]

//! Load-once, save-after-swap ownership of the persisted assignment.
//!
//! # Failure Modes
//!
//! | Situation | Result | Log |
//! |-----------|--------|-----|
//! | key absent | identity, [`LoadSource::Missing`] | `debug` |
//! | backend read fails | identity, [`RecoveryReason::StorageRead`] | `warn` |
//! | value fails to decode | identity, [`RecoveryReason::Decode`] | `warn` |
//! | write fails | in-memory state kept, [`SaveOutcome::Failed`] | `warn` |
//!
//! A corrupt value is left in storage until the next successful save
//! overwrites it.

use offergrid_layout::SlotId;

use crate::assignment::{SlotAssignment, SlotSwap, SwapOutcome};
use crate::codec::{decode_assignment, encode_assignment};
use crate::state_persistence::StorageBackend;

/// Why persisted state was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryReason {
    /// The backend returned an error on read.
    StorageRead(String),
    /// The stored value was present but unusable.
    Decode { kind: &'static str, detail: String },
}

/// Where a loaded assignment came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Persisted,
    Missing,
    Recovered(RecoveryReason),
}

impl LoadSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Persisted => "persisted",
            Self::Missing => "missing",
            Self::Recovered(_) => "recovered",
        }
    }
}

/// Result of a save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed(String),
}

impl SaveOutcome {
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Read the assignment under `key`, falling back to identity.
pub fn load_assignment<B: StorageBackend + ?Sized>(
    backend: &B,
    key: &str,
    slot_count: usize,
) -> (SlotAssignment, LoadSource) {
    let raw = match backend.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(
                target: "offergrid.assignment",
                backend = backend.name(),
                key,
                "no persisted assignment"
            );
            return (SlotAssignment::identity(slot_count), LoadSource::Missing);
        }
        Err(e) => {
            tracing::warn!(
                target: "offergrid.storage",
                backend = backend.name(),
                key,
                error = %e,
                "storage read failed; using identity assignment"
            );
            return (
                SlotAssignment::identity(slot_count),
                LoadSource::Recovered(RecoveryReason::StorageRead(e.to_string())),
            );
        }
    };

    match decode_assignment(&raw, slot_count) {
        Ok(assignment) => {
            tracing::debug!(
                target: "offergrid.assignment",
                backend = backend.name(),
                key,
                assignment = ?assignment.as_slice(),
                "loaded persisted assignment"
            );
            (assignment, LoadSource::Persisted)
        }
        Err(e) => {
            tracing::warn!(
                target: "offergrid.assignment",
                backend = backend.name(),
                key,
                kind = e.kind(),
                error = %e,
                "discarding persisted assignment; using identity"
            );
            (
                SlotAssignment::identity(slot_count),
                LoadSource::Recovered(RecoveryReason::Decode {
                    kind: e.kind(),
                    detail: e.to_string(),
                }),
            )
        }
    }
}

/// Write `assignment` under `key`. Failures are logged and reported, never raised.
pub fn save_assignment<B: StorageBackend + ?Sized>(
    backend: &mut B,
    key: &str,
    assignment: &SlotAssignment,
) -> SaveOutcome {
    let result = encode_assignment(assignment)
        .map_err(|e| e.to_string())
        .and_then(|raw| backend.save(key, &raw).map_err(|e| e.to_string()));
    match result {
        Ok(()) => {
            tracing::debug!(
                target: "offergrid.storage",
                backend = backend.name(),
                key,
                assignment = ?assignment.as_slice(),
                "saved assignment"
            );
            SaveOutcome::Saved
        }
        Err(reason) => {
            tracing::warn!(
                target: "offergrid.storage",
                backend = backend.name(),
                key,
                %reason,
                "failed to persist assignment"
            );
            SaveOutcome::Failed(reason)
        }
    }
}

/// Owns one assignment and its storage slot.
#[derive(Debug)]
pub struct AssignmentStore<B> {
    backend: B,
    key: String,
    assignment: SlotAssignment,
    source: LoadSource,
    last_save: Option<SaveOutcome>,
}

impl<B: StorageBackend> AssignmentStore<B> {
    /// Load once from `backend`. Never fails; see the module table.
    pub fn load(backend: B, key: impl Into<String>, slot_count: usize) -> Self {
        let key = key.into();
        let (assignment, source) = load_assignment(&backend, &key, slot_count);
        Self {
            backend,
            key,
            assignment,
            source,
            last_save: None,
        }
    }

    #[must_use]
    pub fn assignment(&self) -> &SlotAssignment {
        &self.assignment
    }

    #[must_use]
    pub fn source(&self) -> &LoadSource {
        &self.source
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn last_save(&self) -> Option<&SaveOutcome> {
        self.last_save.as_ref()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Persist the current assignment.
    pub fn save(&mut self) -> SaveOutcome {
        let outcome = save_assignment(&mut self.backend, &self.key, &self.assignment);
        self.last_save = Some(outcome.clone());
        outcome
    }

    /// Swap two slots and persist on success.
    pub fn swap(&mut self, a: SlotId, b: SlotId) -> SwapOutcome {
        let outcome = self.assignment.swap(a, b);
        if outcome.is_swapped() {
            self.save();
        }
        outcome
    }
}

impl<B: StorageBackend> SlotSwap for AssignmentStore<B> {
    fn swap_slots(&mut self, a: SlotId, b: SlotId) -> SwapOutcome {
        self.swap(a, b)
    }
}
