//! Pixel metrics and hit-testing for packed grids.

use offergrid_core::{PointerPosition, Rect};
use serde::{Deserialize, Serialize};

use crate::packer::{PackedGrid, PlacedSlot};
use crate::slot::SlotId;

/// Track sizes used to turn grid cells into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridMetrics {
    /// Width of one column track in pixels.
    pub cell_width: u32,
    /// Height of one row track in pixels.
    pub cell_height: u32,
    /// Gap between adjacent tracks in pixels.
    pub gap: u32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            cell_width: 280,
            cell_height: 180,
            gap: 12,
        }
    }
}

impl GridMetrics {
    #[must_use]
    pub const fn new(cell_width: u32, cell_height: u32, gap: u32) -> Self {
        Self {
            cell_width,
            cell_height,
            gap,
        }
    }

    fn span_extent(track: u32, gap: u32, span: u16) -> u32 {
        let span = u32::from(span);
        track
            .saturating_mul(span)
            .saturating_add(gap.saturating_mul(span.saturating_sub(1)))
    }

    fn track_offset(track: u32, gap: u32, index: u16) -> u32 {
        track.saturating_add(gap).saturating_mul(u32::from(index))
    }

    /// Pixel bounds of a placed slot. Spanning tiles absorb the gaps they cross.
    #[must_use]
    pub fn slot_rect(&self, placed: &PlacedSlot) -> Rect {
        Rect::new(
            Self::track_offset(self.cell_width, self.gap, placed.origin_col),
            Self::track_offset(self.cell_height, self.gap, placed.origin_row),
            Self::span_extent(self.cell_width, self.gap, placed.col_span),
            Self::span_extent(self.cell_height, self.gap, placed.row_span),
        )
    }

    /// Pixel bounds of the whole grid container.
    #[must_use]
    pub fn container_rect(&self, grid: &PackedGrid) -> Rect {
        Rect::new(
            0,
            0,
            Self::span_extent(self.cell_width, self.gap, grid.columns()),
            Self::span_extent(self.cell_height, self.gap, grid.rows()),
        )
    }
}

/// Slot rectangles for one packed grid, in plan order.
///
/// Rebuilt whenever the packing or metrics change (direction switch, resize).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitMap {
    regions: Vec<(SlotId, Rect)>,
}

impl HitMap {
    #[must_use]
    pub fn new(grid: &PackedGrid, metrics: &GridMetrics) -> Self {
        Self {
            regions: grid
                .slots()
                .iter()
                .map(|placed| (placed.id, metrics.slot_rect(placed)))
                .collect(),
        }
    }

    /// Slot under a pointer; gaps and positions outside the grid hit nothing.
    #[must_use]
    pub fn hit_test(&self, position: PointerPosition) -> Option<SlotId> {
        self.regions
            .iter()
            .find(|(_, rect)| rect.contains(position))
            .map(|(id, _)| *id)
    }

    #[must_use]
    pub fn rect(&self, id: SlotId) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(slot, _)| *slot == id)
            .map(|(_, rect)| *rect)
    }

    #[must_use]
    pub fn regions(&self) -> &[(SlotId, Rect)] {
        &self.regions
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
