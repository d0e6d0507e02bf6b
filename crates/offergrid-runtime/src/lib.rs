#![forbid(unsafe_code)]

//! Slot assignment and persistence for the offers grid.
//!
//! # Key Components
//!
//! - [`SlotAssignment`] - permutation mapping each slot to a content index
//! - [`codec`] - JSON encoding with full validation on decode
//! - [`StorageBackend`] - synchronous key/value persistence ([`MemoryStorage`],
//!   `FileStorage`, and the browser backend in `offergrid-wasm`)
//! - [`AssignmentStore`] - owns one assignment, loads it once, and saves after
//!   every successful swap
//! - [`GridConfig`] - storage key, pixel metrics, direction, and log format
//!
//! # Failure policy
//! Corrupt or missing persisted state falls back to the identity assignment,
//! and storage write failures are swallowed. Both are logged at `warn` on the
//! `offergrid.assignment` / `offergrid.storage` targets and never reach the
//! caller as errors: the layout is cosmetic state.

pub mod assignment;
pub mod codec;
pub mod config;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod state_persistence;
pub mod store;

pub use assignment::{
    AssignmentEntry, AssignmentError, SlotAssignment, SlotSwap, SwapNoopReason, SwapOutcome,
};
pub use codec::{AssignmentDecodeError, decode_assignment, encode_assignment};
pub use config::{ConfigError, DEFAULT_STORAGE_KEY, GridConfig, LogFormat};
#[cfg(feature = "file-storage")]
pub use state_persistence::FileStorage;
pub use state_persistence::{MemoryStorage, StorageBackend, StorageError, StorageResult};
pub use store::{
    AssignmentStore, LoadSource, RecoveryReason, SaveOutcome, load_assignment, save_assignment,
};
