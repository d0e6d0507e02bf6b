#![forbid(unsafe_code)]

//! Core primitives for the offers grid.
//!
//! # Role in offergrid
//! `offergrid-core` holds the host-agnostic vocabulary shared by every other
//! crate: pixel geometry used for hit-testing, the pointer types that mouse and
//! touch input are normalized into, and the content record supplied by the
//! surrounding page.
//!
//! # How it fits in the system
//! The layout crate packs slots and turns them into [`Rect`]s; the web crate
//! feeds [`PointerPosition`]s through those rects to find the tile under a
//! finger. Nothing here knows about slots, assignments, or storage.

pub mod event;
pub mod geometry;
pub mod item;

pub use event::{PointerButton, PointerKind, PointerPosition};
pub use geometry::Rect;
pub use item::{ContentId, ContentItem};
