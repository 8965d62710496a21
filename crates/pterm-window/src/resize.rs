#![forbid(unsafe_code)]

//! Edge and corner resize handles.

use pterm_core::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Which edge or corner a resize gesture grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeDirection {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeDirection {
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    /// Short handle name (`n`, `se`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::South => "s",
            Self::East => "e",
            Self::West => "w",
            Self::NorthEast => "ne",
            Self::NorthWest => "nw",
            Self::SouthEast => "se",
            Self::SouthWest => "sw",
        }
    }

    /// Parse a short handle name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dir| dir.as_str().eq_ignore_ascii_case(s))
    }

    #[must_use]
    pub const fn moves_left(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    #[must_use]
    pub const fn moves_right(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    #[must_use]
    pub const fn moves_top(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    #[must_use]
    pub const fn moves_bottom(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::NorthEast | Self::NorthWest | Self::SouthEast | Self::SouthWest
        )
    }

    /// Resize `start` by the pointer delta `(dx, dy)`.
    ///
    /// Leading edges (left/top) move the origin so the opposite edge stays
    /// put. The grown dimension never exceeds the viewport measured from the
    /// anchored edge, and never drops below `min`.
    #[must_use]
    pub fn apply(self, start: Rect, dx: i32, dy: i32, min: Size, viewport: Size) -> Rect {
        let mut rect = start;

        if self.moves_right() {
            let max_width = (viewport.width - start.x).max(min.width);
            rect.width = start.width.saturating_add(dx).clamp(min.width, max_width);
        } else if self.moves_left() {
            let right = start.right();
            let max_width = right.max(min.width);
            rect.width = start.width.saturating_sub(dx).clamp(min.width, max_width);
            rect.x = right - rect.width;
        }

        if self.moves_bottom() {
            let max_height = (viewport.height - start.y).max(min.height);
            rect.height = start.height.saturating_add(dy).clamp(min.height, max_height);
        } else if self.moves_top() {
            let bottom = start.bottom();
            let max_height = bottom.max(min.height);
            rect.height = start.height.saturating_sub(dy).clamp(min.height, max_height);
            rect.y = bottom - rect.height;
        }

        rect
    }
}
