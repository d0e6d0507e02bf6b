//! Greedy first-fit packer.
//!
//! # Algorithm
//!
//! Slots are placed in plan order. For each slot the packer scans rows top to
//! bottom and, within a row, columns left to right; the first origin where the
//! whole `col_span x row_span` rectangle is unoccupied wins. Rows are grown
//! lazily, so a slot no wider than the grid always finds a place at or below
//! the first empty row.
//!
//! Right-to-left layouts reuse the left-to-right decision and only mirror the
//! chosen column (`columns - col - col_span`), so both directions produce
//! congruent layouts.
//!
//! # Invariants
//!
//! 1. No two placements share a cell.
//! 2. The output is a pure function of `(plan, direction)`.
//! 3. Row origins are identical between LTR and RTL.
//!
//! # Failure Modes
//!
//! | Failure | Cause |
//! |---------|-------|
//! | [`PackError::TooWide`] | A slot spans more columns than the grid has |
//! | [`PackError::RowLimitExceeded`] | The first free origin would cross the plan's row bound |
//! | [`PackError::RowOverflow`] | The first free origin plus the row span does not fit in `u16` |
//!
//! All are configuration errors: the plan is a constant, so they surface in
//! tests rather than at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::FlowDirection;
use crate::slot::{SizeClass, SlotDefinition, SlotId, SlotPlan};

/// A slot with its computed grid origin. Derived and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedSlot {
    pub id: SlotId,
    pub size_class: SizeClass,
    pub origin_col: u16,
    pub origin_row: u16,
    pub col_span: u16,
    pub row_span: u16,
}

impl PlacedSlot {
    fn from_definition(definition: &SlotDefinition, origin_col: u16, origin_row: u16) -> Self {
        Self {
            id: definition.id,
            size_class: definition.size_class,
            origin_col,
            origin_row,
            col_span: definition.col_span,
            row_span: definition.row_span,
        }
    }

    /// Column just past the right edge.
    #[must_use]
    pub const fn end_col(&self) -> u16 {
        self.origin_col.saturating_add(self.col_span)
    }

    /// Row just past the bottom edge.
    #[must_use]
    pub const fn end_row(&self) -> u16 {
        self.origin_row.saturating_add(self.row_span)
    }

    #[must_use]
    pub const fn covers(&self, col: u16, row: u16) -> bool {
        col >= self.origin_col && col < self.end_col() && row >= self.origin_row && row < self.end_row()
    }

    #[must_use]
    pub const fn overlaps(&self, other: &PlacedSlot) -> bool {
        self.origin_col < other.end_col()
            && other.origin_col < self.end_col()
            && self.origin_row < other.end_row()
            && other.origin_row < self.end_row()
    }

    /// Iterate covered cells as `(col, row)`.
    pub fn cells(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        (self.origin_row..self.end_row())
            .flat_map(move |row| (self.origin_col..self.end_col()).map(move |col| (col, row)))
    }
}

/// Why a plan could not be packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    TooWide {
        slot: SlotId,
        col_span: u16,
        columns: u16,
    },
    RowLimitExceeded {
        slot: SlotId,
        origin_row: u16,
        row_span: u16,
        max_rows: u16,
    },
    RowOverflow {
        slot: SlotId,
        origin_row: u16,
        row_span: u16,
    },
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooWide {
                slot,
                col_span,
                columns,
            } => write!(
                f,
                "{slot} spans {col_span} columns but the grid has only {columns}"
            ),
            Self::RowLimitExceeded {
                slot,
                origin_row,
                row_span,
                max_rows,
            } => write!(
                f,
                "{slot} first fits at row {origin_row} with span {row_span}, beyond the {max_rows}-row bound"
            ),
            Self::RowOverflow {
                slot,
                origin_row,
                row_span,
            } => write!(
                f,
                "{slot} first fits at row {origin_row} but span {row_span} overflows the row index"
            ),
        }
    }
}

impl std::error::Error for PackError {}

/// Result of packing a plan in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedGrid {
    direction: FlowDirection,
    columns: u16,
    rows: u16,
    slots: Vec<PlacedSlot>,
}

impl PackedGrid {
    #[must_use]
    pub const fn direction(&self) -> FlowDirection {
        self.direction
    }

    #[must_use]
    pub const fn columns(&self) -> u16 {
        self.columns
    }

    /// Rows actually used.
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Placements in plan order.
    #[must_use]
    pub fn slots(&self) -> &[PlacedSlot] {
        &self.slots
    }

    #[must_use]
    pub fn slot(&self, id: SlotId) -> Option<&PlacedSlot> {
        self.slots.get(id.index()).filter(|placed| placed.id == id)
    }

    /// Slot covering a cell, if any.
    #[must_use]
    pub fn cell_owner(&self, col: u16, row: u16) -> Option<SlotId> {
        self.slots
            .iter()
            .find(|placed| placed.covers(col, row))
            .map(|placed| placed.id)
    }

    /// Number of cells covered by some slot.
    #[must_use]
    pub fn occupied_cells(&self) -> u32 {
        self.slots
            .iter()
            .map(|placed| u32::from(placed.col_span) * u32::from(placed.row_span))
            .sum()
    }

    /// Whether every cell of the `columns x rows` bounding box is covered.
    #[must_use]
    pub fn is_fully_tiled(&self) -> bool {
        (0..self.rows).all(|row| (0..self.columns).all(|col| self.cell_owner(col, row).is_some()))
    }
}

/// Row-major occupancy bitmap with a fixed width and lazily grown height.
#[derive(Debug, Clone)]
struct Occupancy {
    columns: u16,
    rows: u16,
    cells: Vec<bool>,
}

impl Occupancy {
    fn new(columns: u16) -> Self {
        Self {
            columns,
            rows: 0,
            cells: Vec::new(),
        }
    }

    fn is_free(&self, col: u16, row: u16) -> bool {
        if row >= self.rows {
            return true;
        }
        !self.cells[usize::from(row) * usize::from(self.columns) + usize::from(col)]
    }

    fn fits(&self, col: u16, row: u16, col_span: u16, row_span: u16) -> bool {
        let (Some(end_col), Some(end_row)) = (col.checked_add(col_span), row.checked_add(row_span))
        else {
            return false;
        };
        if end_col > self.columns {
            return false;
        }
        (row..end_row).all(|r| (col..end_col).all(|c| self.is_free(c, r)))
    }

    /// Caller guarantees `col + col_span <= columns` and `end_row = row + row_span`.
    fn mark(&mut self, col: u16, row: u16, col_span: u16, end_row: u16) {
        if end_row > self.rows {
            self.rows = end_row;
            self.cells
                .resize(usize::from(self.rows) * usize::from(self.columns), false);
        }
        for r in row..end_row {
            for c in col..col + col_span {
                self.cells[usize::from(r) * usize::from(self.columns) + usize::from(c)] = true;
            }
        }
    }

    /// First origin where the rectangle fits. Falls back to the first empty
    /// row, which is entirely free; the caller checks that the span fits below it.
    fn first_fit(&self, col_span: u16, row_span: u16) -> (u16, u16) {
        for row in 0..self.rows {
            for col in 0..=(self.columns - col_span) {
                if self.fits(col, row, col_span, row_span) {
                    return (col, row);
                }
            }
        }
        (0, self.rows)
    }
}

/// Pack every slot of `plan` and mirror columns for `direction`.
pub fn pack(plan: &SlotPlan, direction: FlowDirection) -> Result<PackedGrid, PackError> {
    let _span = tracing::debug_span!(target: "offergrid.pack", "pack", ?direction).entered();
    let columns = plan.columns();
    let mut occupancy = Occupancy::new(columns);
    let mut slots = Vec::with_capacity(plan.len());

    for definition in plan.slots() {
        if definition.col_span > columns {
            return Err(PackError::TooWide {
                slot: definition.id,
                col_span: definition.col_span,
                columns,
            });
        }
        let (col, row) = occupancy.first_fit(definition.col_span, definition.row_span);
        let Some(end_row) = row.checked_add(definition.row_span) else {
            return Err(PackError::RowOverflow {
                slot: definition.id,
                origin_row: row,
                row_span: definition.row_span,
            });
        };
        if let Some(max_rows) = plan.max_rows()
            && end_row > max_rows
        {
            return Err(PackError::RowLimitExceeded {
                slot: definition.id,
                origin_row: row,
                row_span: definition.row_span,
                max_rows,
            });
        }
        occupancy.mark(col, row, definition.col_span, end_row);
        slots.push(PlacedSlot::from_definition(definition, col, row));
    }

    for placed in &mut slots {
        placed.origin_col = direction.mirror_col(placed.origin_col, placed.col_span, columns);
    }

    tracing::debug!(
        target: "offergrid.pack",
        direction = ?direction,
        slots = slots.len(),
        rows = occupancy.rows,
        "packed slot plan"
    );

    Ok(PackedGrid {
        direction,
        columns,
        rows: occupancy.rows,
        slots,
    })
}
