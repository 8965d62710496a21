#![forbid(unsafe_code)]

//! Window geometry and chrome flags.

use pterm_core::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::constraints::WindowConstraints;

/// Position, size, and chrome state of the floating window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub position: Point,
    pub size: Size,
    pub is_maximized: bool,
    pub is_minimized: bool,
}

impl WindowGeometry {
    /// Centered default geometry for `viewport`.
    #[must_use]
    pub fn centered(constraints: &WindowConstraints, viewport: Size) -> Self {
        Self::from_rect(constraints.default_rect(viewport))
    }

    /// Plain (not maximized, not minimized) geometry covering `rect`.
    #[must_use]
    pub const fn from_rect(rect: Rect) -> Self {
        Self {
            position: rect.origin(),
            size: rect.size(),
            is_maximized: false,
            is_minimized: false,
        }
    }

    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.position = rect.origin();
        self.size = rect.size();
    }

    /// Whether the geometry satisfies the size and visibility invariants.
    #[must_use]
    pub fn satisfies(&self, constraints: &WindowConstraints, viewport: Size) -> bool {
        let min = constraints.min_size(viewport);
        if self.size.width < min.width || self.size.height < min.height {
            return false;
        }
        if self.is_maximized {
            return true;
        }
        let rect = self.rect();
        let visible = constraints.min_visible_area;
        rect.visible_width(viewport) >= visible.min(viewport.width)
            && rect.visible_height(viewport) >= visible.min(viewport.height)
    }
}
