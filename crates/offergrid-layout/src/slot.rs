//! Slot definitions and the ordered slot plan.
//!
//! A slot is a fixed position in the grid, identified by a stable id and sized
//! by a column/row span. The plan is an *ordered* list: the packer places
//! slots in declaration order, so reordering the plan changes the layout.

use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Current slot plan schema version.
///
/// Bump when slot footprints or their order change; persisted assignments
/// are only meaningful against the plan they were written for.
pub const SLOT_PLAN_SCHEMA_VERSION: u16 = 1;

/// Column count of the offers grid.
pub const OFFER_GRID_COLUMNS: u16 = 4;

/// Row bound of the offers grid.
pub const OFFER_GRID_ROWS: u16 = 3;

/// Stable identifier of a slot (a position in the layout, not its content).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(u8);

impl SlotId {
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Position of this slot in plan order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

/// Visual size class of a tile. Callers use it for pixel sizing and artwork
/// selection; the packer ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Large,
    Medium,
    Small,
    Poster,
}

impl SizeClass {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Large => "large",
            Self::Medium => "medium",
            Self::Small => "small",
            Self::Poster => "poster",
        }
    }
}

/// Footprint of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotDefinition {
    pub id: SlotId,
    pub size_class: SizeClass,
    pub col_span: u16,
    pub row_span: u16,
}

impl SlotDefinition {
    #[must_use]
    pub const fn new(id: u8, size_class: SizeClass, col_span: u16, row_span: u16) -> Self {
        Self {
            id: SlotId::new(id),
            size_class,
            col_span,
            row_span,
        }
    }

    /// Number of grid cells covered.
    #[must_use]
    pub const fn area(&self) -> u32 {
        self.col_span as u32 * self.row_span as u32
    }
}

/// The seven offer slots, in packing order.
///
/// ```text
/// LTR packing on a 4x3 grid:
/// +-------+---+---+
/// |       | 1 1 |
/// |   0   +---+---+
/// |       | 2 | 3 |
/// +---+---+---+   |
/// | 4 | 5 | 6 |   |
/// +---+---+---+---+
/// ```
pub const OFFER_SLOTS: [SlotDefinition; 7] = [
    SlotDefinition::new(0, SizeClass::Large, 2, 2),
    SlotDefinition::new(1, SizeClass::Medium, 2, 1),
    SlotDefinition::new(2, SizeClass::Small, 1, 1),
    SlotDefinition::new(3, SizeClass::Poster, 1, 2),
    SlotDefinition::new(4, SizeClass::Small, 1, 1),
    SlotDefinition::new(5, SizeClass::Small, 1, 1),
    SlotDefinition::new(6, SizeClass::Small, 1, 1),
];

/// Structural problems detected when building a [`SlotPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotPlanError {
    ZeroColumns,
    ZeroRowBound,
    Empty,
    TooManySlots { count: usize },
    IdOutOfOrder { position: usize, id: SlotId },
    ZeroSpan { slot: SlotId },
}

impl fmt::Display for SlotPlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroColumns => write!(f, "slot plan must have at least one column"),
            Self::ZeroRowBound => write!(f, "slot plan row bound must be positive"),
            Self::Empty => write!(f, "slot plan has no slots"),
            Self::TooManySlots { count } => {
                write!(f, "slot plan has {count} slots; at most 256 are addressable")
            }
            Self::IdOutOfOrder { position, id } => write!(
                f,
                "slot at position {position} has id {id}; ids must equal declaration order"
            ),
            Self::ZeroSpan { slot } => write!(f, "{slot} has a zero column or row span"),
        }
    }
}

impl std::error::Error for SlotPlanError {}

/// Ordered, versioned list of slot footprints for one grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotPlan {
    version: u16,
    columns: u16,
    max_rows: Option<u16>,
    slots: Vec<SlotDefinition>,
}

impl SlotPlan {
    /// Build a plan, rejecting structurally invalid slot lists.
    ///
    /// Geometry (a slot wider than the grid, or a plan that cannot fit in
    /// `max_rows`) is checked by the packer, not here.
    pub fn new(
        columns: u16,
        max_rows: Option<u16>,
        slots: Vec<SlotDefinition>,
    ) -> Result<Self, SlotPlanError> {
        if columns == 0 {
            return Err(SlotPlanError::ZeroColumns);
        }
        if max_rows == Some(0) {
            return Err(SlotPlanError::ZeroRowBound);
        }
        if slots.is_empty() {
            return Err(SlotPlanError::Empty);
        }
        if slots.len() > usize::from(u8::MAX) + 1 {
            return Err(SlotPlanError::TooManySlots { count: slots.len() });
        }
        for (position, slot) in slots.iter().enumerate() {
            if slot.id.index() != position {
                return Err(SlotPlanError::IdOutOfOrder {
                    position,
                    id: slot.id,
                });
            }
            if slot.col_span == 0 || slot.row_span == 0 {
                return Err(SlotPlanError::ZeroSpan { slot: slot.id });
            }
        }
        Ok(Self {
            version: SLOT_PLAN_SCHEMA_VERSION,
            columns,
            max_rows,
            slots,
        })
    }

    /// The promotional offers plan: seven slots tiling a 4x3 grid.
    #[must_use]
    pub fn offers() -> Self {
        Self {
            version: SLOT_PLAN_SCHEMA_VERSION,
            columns: OFFER_GRID_COLUMNS,
            max_rows: Some(OFFER_GRID_ROWS),
            slots: OFFER_SLOTS.to_vec(),
        }
    }

    #[must_use]
    pub const fn version(&self) -> u16 {
        self.version
    }

    #[must_use]
    pub const fn columns(&self) -> u16 {
        self.columns
    }

    #[must_use]
    pub const fn max_rows(&self) -> Option<u16> {
        self.max_rows
    }

    #[must_use]
    pub fn slots(&self) -> &[SlotDefinition] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: SlotId) -> Option<&SlotDefinition> {
        self.slots.get(id.index())
    }

    #[must_use]
    pub fn contains(&self, id: SlotId) -> bool {
        id.index() < self.slots.len()
    }

    /// Iterate slot ids in plan order.
    pub fn ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.slots.iter().map(|slot| slot.id)
    }

    /// Sum of slot areas in cells.
    #[must_use]
    pub fn total_area(&self) -> u32 {
        self.slots.iter().map(SlotDefinition::area).sum()
    }

    /// Stable fingerprint of everything that affects packing.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.version.hash(&mut hasher);
        self.columns.hash(&mut hasher);
        self.max_rows.hash(&mut hasher);
        for slot in &self.slots {
            slot.id.hash(&mut hasher);
            slot.col_span.hash(&mut hasher);
            slot.row_span.hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl Default for SlotPlan {
    fn default() -> Self {
        Self::offers()
    }
}
