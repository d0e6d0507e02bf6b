#![forbid(unsafe_code)]

//! Offers grid public facade crate.
//!
//! Re-exports the types a host needs to pack the seven-slot offers grid,
//! persist the content permutation, and drive drag-to-swap from mouse or touch
//! input. Internal crates stay reachable through the module aliases at the
//! bottom.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use offergrid_core::{ContentId, ContentItem, PointerButton, PointerKind, PointerPosition, Rect};

// --- Layout re-exports -----------------------------------------------------

pub use offergrid_layout::{
    FlowDirection, GridMetrics, HitMap, PackCache, PackError, PackedGrid, PlacedSlot, SizeClass,
    SlotDefinition, SlotId, SlotPlan, SlotPlanError, pack,
};

// --- Runtime re-exports ----------------------------------------------------

pub use offergrid_runtime::{
    AssignmentError, AssignmentStore, ConfigError, DEFAULT_STORAGE_KEY, GridConfig, LoadSource,
    MemoryStorage, RecoveryReason, SaveOutcome, SlotAssignment, SlotSwap, StorageBackend,
    StorageError, SwapOutcome,
};

#[cfg(feature = "file-storage")]
pub use offergrid_runtime::FileStorage;

// --- Web re-exports --------------------------------------------------------

pub use offergrid_web::{
    DragCancelReason, DragSwapController, DragSwapEffect, DragSwapState, GridPointerAdapter,
    OfferGrid, PointerConfig, PointerDispatch, TileView,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error for building a grid.
#[derive(Debug)]
pub enum Error {
    /// Configuration failed to parse or validate.
    Config(ConfigError),
    /// The slot plan could not be packed.
    Layout(PackError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Layout(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Layout(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<PackError> for Error {
    fn from(err: PackError) -> Self {
        Self::Layout(err)
    }
}

/// Standard result type for offergrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build the offers grid from a JSON config and load its persisted
/// assignment from `backend`.
pub fn open_json<B: StorageBackend>(config_json: &str, backend: B) -> Result<OfferGrid<B>> {
    let config = GridConfig::from_json_str_validated(config_json)?;
    Ok(OfferGrid::offers(&config, backend)?)
}

/// Build the offers grid persisting to the config's `storage_path`.
#[cfg(feature = "file-storage")]
pub fn open_file(config: &GridConfig) -> Result<OfferGrid<FileStorage>> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors).into());
    }
    let backend = config.file_storage()?;
    Ok(OfferGrid::offers(config, backend)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, FlowDirection, GridConfig, GridMetrics, MemoryStorage, OfferGrid, PointerButton,
        PointerKind, PointerPosition, Result, SlotAssignment, SlotId, SlotPlan, StorageBackend,
    };

    pub use crate::{core, layout, runtime, web};
}

pub use offergrid_core as core;
pub use offergrid_layout as layout;
pub use offergrid_runtime as runtime;
pub use offergrid_web as web;
