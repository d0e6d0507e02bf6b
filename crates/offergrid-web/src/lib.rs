#![forbid(unsafe_code)]

//! Interaction layer for the offers grid.
//!
//! - [`drag_swap`]: host-agnostic drag-to-swap state machine
//! - [`pointer`]: one-pointer adapter unifying mouse and touch lifecycles
//! - [`grid`]: the [`OfferGrid`] component wiring plan, packing, persistence,
//!   and input together
//!
//! Nothing here touches the DOM; `offergrid-wasm` binds these types to the
//! browser.

pub mod drag_swap;
pub mod grid;
pub mod pointer;

pub use drag_swap::{
    DragCancelReason, DragSwapController, DragSwapEffect, DragSwapNoopReason, DragSwapState,
    DragSwapTransition,
};
pub use grid::{OfferGrid, TileView};
pub use pointer::{
    GridPointerAdapter, PointerConfig, PointerDispatch, PointerIgnoredReason,
    PointerLifecyclePhase, PointerLogEntry, PointerLogOutcome,
};
