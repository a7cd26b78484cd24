//! Static board geometry: peg lattice, walls, and buckets
//!
//! Screen coordinates: origin at the board's top-left corner, y grows downward.
//! The layout is a pure function of [`BoardConfig`]; the same config always
//! produces the same pegs in the same order.

use serde::{Deserialize, Serialize};

use super::state::Peg;
use crate::consts::*;
use crate::error::{BoardError, SimError};

/// Clearance beyond the ball diameter for a wall gap to count as passable
const EDGE_SLACK: f32 = 2.0;

/// Board dimensions supplied by the page layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    pub width: f32,
    pub height: f32,
    pub peg_rows: u16,
    /// Border inset on every side (also the wall thickness)
    pub css_border: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 640.0,
            peg_rows: 12,
            css_border: 8.0,
        }
    }
}

/// Horizontal extent of one bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotBounds {
    pub left: f32,
    pub right: f32,
}

impl SlotBounds {
    #[inline]
    pub fn center(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }
}

/// Named starting positions at the top of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropZone {
    Left,
    Center,
    Right,
}

impl DropZone {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Some(DropZone::Left),
            "center" | "centre" | "c" => Some(DropZone::Center),
            "right" | "r" => Some(DropZone::Right),
            _ => None,
        }
    }

    /// Fraction of the content width where the zone sits
    fn fraction(&self) -> f32 {
        match self {
            DropZone::Left => 0.25,
            DropZone::Center => 0.5,
            DropZone::Right => 0.75,
        }
    }
}

/// Fully laid-out board, computed once and shared read-only by every drop
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardGeometry {
    pub config: BoardConfig,
    pegs: Vec<Peg>,
    /// Left edge of the content area (inner face of the left wall)
    pub inner_left: f32,
    /// Right edge of the content area
    pub inner_right: f32,
    /// Inner face of the top border
    pub top: f32,
    /// Bucket floor
    pub floor_y: f32,
    /// Top edge of the bucket dividers
    pub bucket_top: f32,
    pub first_row_y: f32,
    pub last_row_y: f32,
    /// Horizontal distance between neighbouring pegs in one row
    pub peg_spacing: f32,
    pub row_spacing: f32,
    slot_count: usize,
}

impl BoardGeometry {
    pub fn new(config: BoardConfig) -> Result<Self, BoardError> {
        let BoardConfig {
            width,
            height,
            peg_rows,
            css_border,
        } = config;

        for (name, value) in [("width", width), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(BoardError::NonPositiveDimension { name, value });
            }
        }
        if !css_border.is_finite() || css_border < 0.0 {
            return Err(BoardError::NonPositiveDimension {
                name: "css border",
                value: css_border,
            });
        }
        if peg_rows == 0 {
            return Err(BoardError::NoRows);
        }

        let inner_left = css_border;
        let inner_right = width - css_border;
        let top = css_border;
        let floor_y = height - css_border;
        if inner_right <= inner_left || floor_y <= top {
            return Err(BoardError::BorderTooWide {
                border: css_border,
                width,
                height,
            });
        }

        let bucket_top = floor_y - BUCKET_HEIGHT;
        let first_row_y = top + DROP_ZONE_HEIGHT;
        let last_row_y = bucket_top - PEG_BOTTOM_MARGIN;
        let available = last_row_y - first_row_y;
        if available < 0.0 {
            return Err(BoardError::RowsDoNotFit {
                rows: peg_rows,
                available,
            });
        }

        let (first_row_y, row_spacing) = if peg_rows == 1 {
            (last_row_y, 0.0)
        } else {
            (first_row_y, available / (peg_rows - 1) as f32)
        };

        let slot_count = peg_rows as usize + 1;
        let content_width = inner_right - inner_left;
        let peg_spacing = content_width / slot_count as f32;

        // Same-row gap, then the diagonal gap to the staggered neighbour below
        let required = 2.0 * BALL_RADIUS;
        let row_gap = peg_spacing - 2.0 * PEG_RADIUS;
        if row_gap <= required {
            return Err(BoardError::NarrowGap {
                gap: row_gap,
                required,
            });
        }
        if peg_rows > 1 {
            let diagonal = (peg_spacing * 0.5).hypot(row_spacing) - 2.0 * PEG_RADIUS;
            if diagonal <= required {
                return Err(BoardError::RowsDoNotFit {
                    rows: peg_rows,
                    available,
                });
            }
        }

        let min_x = inner_left + PEG_RADIUS;
        let max_x = inner_right - PEG_RADIUS;
        let mut pegs = Vec::with_capacity(slot_count * peg_rows as usize + peg_rows as usize);
        for row in 0..peg_rows {
            let y = first_row_y + row as f32 * row_spacing;
            // Even rows sit on the slot boundaries, odd rows between them
            let (count, offset) = if row % 2 == 0 {
                (slot_count + 1, 0.0)
            } else {
                (slot_count, peg_spacing * 0.5)
            };
            for col in 0..count {
                let x = seal_edge(
                    (inner_left + offset + col as f32 * peg_spacing).clamp(min_x, max_x),
                    min_x,
                    max_x,
                );
                pegs.push(Peg {
                    row,
                    col: col as u16,
                    x,
                    y,
                });
            }
        }

        log::debug!(
            "Board {}x{}: {} rows, {} pegs, {} slots, spacing {:.2}x{:.2}",
            width,
            height,
            peg_rows,
            pegs.len(),
            slot_count,
            peg_spacing,
            row_spacing
        );

        Ok(Self {
            config,
            pegs,
            inner_left,
            inner_right,
            top,
            floor_y,
            bucket_top,
            first_row_y,
            last_row_y,
            peg_spacing,
            row_spacing,
            slot_count,
        })
    }

    /// Pegs in row-major order
    pub fn pegs(&self) -> &[Peg] {
        &self.pegs
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Widest row (even rows carry one extra peg)
    pub fn max_cols(&self) -> usize {
        self.slot_count + 1
    }

    pub fn content_width(&self) -> f32 {
        self.inner_right - self.inner_left
    }

    /// Bounds of bucket `index`
    pub fn slot_bounds(&self, index: usize) -> Result<SlotBounds, SimError> {
        if index >= self.slot_count {
            return Err(SimError::SlotOutOfRange {
                index,
                slot_count: self.slot_count,
            });
        }
        let left = self.inner_left + index as f32 * self.peg_spacing;
        Ok(SlotBounds {
            left,
            right: left + self.peg_spacing,
        })
    }

    /// Bucket under a horizontal position (clamped to the outermost buckets)
    pub fn slot_of(&self, x: f32) -> usize {
        let raw = ((x - self.inner_left) / self.peg_spacing).floor();
        (raw.max(0.0) as usize).min(self.slot_count - 1)
    }

    /// X positions of the dividers between buckets
    pub fn bucket_walls(&self) -> impl Iterator<Item = f32> + '_ {
        (1..self.slot_count).map(|k| self.inner_left + k as f32 * self.peg_spacing)
    }

    pub fn drop_zone_x(&self, zone: DropZone) -> f32 {
        self.inner_left + self.content_width() * zone.fraction()
    }

    /// Check that caller-supplied bounds describe a bucket the ball can rest in
    pub fn validate_slot_bounds(&self, bounds: SlotBounds) -> Result<(), SimError> {
        let usable = bounds.width() - BUCKET_WALL_THICKNESS;
        if !bounds.left.is_finite()
            || !bounds.right.is_finite()
            || bounds.left < self.inner_left
            || bounds.right > self.inner_right
            || usable < 2.0 * BALL_RADIUS
        {
            return Err(SimError::UnreachableSlot {
                left: bounds.left,
                right: bounds.right,
            });
        }
        Ok(())
    }
}

/// Pull a peg flush against a wall when the gap beside it would trap the ball
///
/// A gap narrower than the ball wedges it between the wall and the peg; a
/// flush peg leaves no gap at all, so the ball rolls off its top instead.
fn seal_edge(x: f32, min_x: f32, max_x: f32) -> f32 {
    let clearance = 2.0 * BALL_RADIUS + EDGE_SLACK;
    if x - min_x < clearance {
        min_x
    } else if max_x - x < clearance {
        max_x
    } else {
        x
    }
}

/// Lay out the staggered peg lattice for a board
pub fn generate_peg_layout(
    board_width: f32,
    board_height: f32,
    peg_rows: u16,
    css_border: f32,
) -> Result<Vec<Peg>, BoardError> {
    let geometry = BoardGeometry::new(BoardConfig {
        width: board_width,
        height: board_height,
        peg_rows,
        css_border,
    })?;
    Ok(geometry.pegs)
}
