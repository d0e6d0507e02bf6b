#![forbid(unsafe_code)]

//! Slot plan and packing for the offers grid.
//!
//! The grid shows a fixed set of differently sized tiles. Each tile position is
//! a *slot* with a stable id; what content a slot shows is decided elsewhere
//! (see `offergrid-runtime`). This crate answers only "where does each slot
//! go":
//!
//! - [`SlotPlan`] is the ordered, versioned list of slot footprints.
//! - [`pack`] places every slot by greedy first-fit and mirrors columns for
//!   right-to-left layouts.
//! - [`PackCache`] memoizes the two packings of a plan.
//! - [`GridMetrics`] and [`HitMap`] turn placements into pixel rectangles and
//!   resolve which slot sits under a pointer.

pub mod cache;
pub mod metrics;
pub mod packer;
pub mod slot;

pub use cache::{PackCache, PackCacheKey, PackCacheStats};
pub use metrics::{GridMetrics, HitMap};
pub use offergrid_core::geometry::Rect;
pub use packer::{PackError, PackedGrid, PlacedSlot, pack};
pub use slot::{
    OFFER_GRID_COLUMNS, OFFER_GRID_ROWS, OFFER_SLOTS, SLOT_PLAN_SCHEMA_VERSION, SizeClass,
    SlotDefinition, SlotId, SlotPlan, SlotPlanError,
};

use serde::{Deserialize, Serialize};

/// Reading direction of the page hosting the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

/// Primary language subtags written right to left.
const RTL_LANGUAGES: &[&str] = &[
    "ar", "arc", "ckb", "dv", "fa", "he", "iw", "ks", "ku", "ps", "sd", "ug", "ur", "yi",
];

impl FlowDirection {
    /// Map the boolean `rtl` flag most locale contexts expose.
    #[must_use]
    pub const fn from_rtl(rtl: bool) -> Self {
        if rtl { Self::Rtl } else { Self::Ltr }
    }

    /// Derive the direction from a BCP 47 language tag such as `fa-IR`.
    ///
    /// Unknown or empty tags read left to right.
    #[must_use]
    pub fn from_locale_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::from_rtl(RTL_LANGUAGES.contains(&primary.as_str()))
    }

    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }

    /// Transform a left-to-right column origin for this direction.
    ///
    /// For RTL the span is mirrored around the grid's vertical axis:
    /// `columns - col - span`.
    #[must_use]
    pub const fn mirror_col(self, col: u16, span: u16, columns: u16) -> u16 {
        match self {
            Self::Ltr => col,
            Self::Rtl => columns.saturating_sub(col).saturating_sub(span),
        }
    }
}
