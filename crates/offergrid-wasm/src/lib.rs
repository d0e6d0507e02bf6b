#![forbid(unsafe_code)]

//! Browser runner for the offers grid.
//!
//! [`OfferGridRunner`] is a `wasm-bindgen`-exported struct wrapping the grid
//! component. The host forwards DOM pointer events, reads back a layout
//! snapshot as JSON, and renders tiles itself. The assignment is persisted to
//! `localStorage` when available and kept in memory otherwise.

#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::OfferGridRunner;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;
