#![forbid(unsafe_code)]

//! Size and visibility constraints for the floating window.

use pterm_core::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Minimum window width on regular viewports.
pub const MIN_WIDTH: i32 = 400;
/// Minimum window height on regular viewports.
pub const MIN_HEIGHT: i32 = 300;
/// Minimum window width on narrow viewports.
pub const NARROW_MIN_WIDTH: i32 = 280;
/// Minimum window height on narrow viewports.
pub const NARROW_MIN_HEIGHT: i32 = 200;
/// Viewports narrower than this use the narrow minimums.
pub const NARROW_VIEWPORT_BREAKPOINT: i32 = 768;
/// Pixels of the window that must stay on-screen on each axis.
pub const MIN_VISIBLE_AREA: i32 = 100;

/// Geometry limits applied by the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConstraints {
    pub min_width: i32,
    pub min_height: i32,
    pub narrow_min_width: i32,
    pub narrow_min_height: i32,
    pub narrow_breakpoint: i32,
    pub min_visible_area: i32,
    /// Share of the viewport the default window covers, in percent.
    pub default_fill_percent: u8,
}

impl Default for WindowConstraints {
    fn default() -> Self {
        Self {
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            narrow_min_width: NARROW_MIN_WIDTH,
            narrow_min_height: NARROW_MIN_HEIGHT,
            narrow_breakpoint: NARROW_VIEWPORT_BREAKPOINT,
            min_visible_area: MIN_VISIBLE_AREA,
            default_fill_percent: 80,
        }
    }
}

impl WindowConstraints {
    /// Set the regular minimum size.
    #[must_use]
    pub fn with_min_size(mut self, width: i32, height: i32) -> Self {
        self.min_width = width;
        self.min_height = height;
        self
    }

    /// Set the minimum on-screen area.
    #[must_use]
    pub fn with_min_visible_area(mut self, pixels: i32) -> Self {
        self.min_visible_area = pixels;
        self
    }

    /// Whether `viewport` counts as narrow.
    #[must_use]
    pub fn is_narrow(&self, viewport: Size) -> bool {
        viewport.width < self.narrow_breakpoint
    }

    /// Minimum size active for `viewport`.
    #[must_use]
    pub fn min_size(&self, viewport: Size) -> Size {
        if self.is_narrow(viewport) {
            Size::new(self.narrow_min_width, self.narrow_min_height)
        } else {
            Size::new(self.min_width, self.min_height)
        }
    }

    /// Clamp `size` to fit the viewport, never below the active minimums.
    ///
    /// When the viewport is smaller than the minimums, the minimums win.
    #[must_use]
    pub fn clamp_size(&self, size: Size, viewport: Size) -> Size {
        let min = self.min_size(viewport);
        Size::new(
            size.width.min(viewport.width).max(min.width),
            size.height.min(viewport.height).max(min.height),
        )
    }

    /// Clamp the origin of `rect` so the minimum visible area stays on-screen.
    ///
    /// The title bar is never allowed above the top edge.
    #[must_use]
    pub fn clamp_position(&self, rect: Rect, viewport: Size) -> Point {
        let visible_x = self.min_visible_area.min(rect.width);
        let visible_y = self.min_visible_area.min(rect.height);

        let min_x = visible_x - rect.width;
        let max_x = (viewport.width - visible_x).max(min_x);
        let max_y = (viewport.height - visible_y).max(0);

        Point::new(rect.x.clamp(min_x, max_x), rect.y.clamp(0, max_y))
    }

    /// Clamp both size and position.
    #[must_use]
    pub fn clamp_rect(&self, rect: Rect, viewport: Size) -> Rect {
        let size = self.clamp_size(rect.size(), viewport);
        let sized = Rect::from_parts(rect.origin(), size);
        Rect::from_parts(self.clamp_position(sized, viewport), size)
    }

    /// Centered near-fullscreen default for `viewport`.
    #[must_use]
    pub fn default_rect(&self, viewport: Size) -> Rect {
        let fill = i32::from(self.default_fill_percent.min(100));
        let wanted = Size::new(viewport.width * fill / 100, viewport.height * fill / 100);
        let size = self.clamp_size(wanted, viewport);
        let origin = Point::new(
            (viewport.width - size.width) / 2,
            (viewport.height - size.height) / 2,
        );
        self.clamp_rect(Rect::from_parts(origin, size), viewport)
    }

    /// Basic sanity checks, returning human-readable problems.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.min_width <= 0 || self.min_height <= 0 {
            errors.push(format!(
                "window.min_width/min_height must be > 0, got {}x{}",
                self.min_width, self.min_height
            ));
        }
        if self.narrow_min_width <= 0 || self.narrow_min_height <= 0 {
            errors.push("window.narrow_min_width/narrow_min_height must be > 0".into());
        }
        if self.min_visible_area <= 0 {
            errors.push(format!(
                "window.min_visible_area must be > 0, got {}",
                self.min_visible_area
            ));
        }
        if self.default_fill_percent == 0 || self.default_fill_percent > 100 {
            errors.push(format!(
                "window.default_fill_percent must be in 1..=100, got {}",
                self.default_fill_percent
            ));
        }
        errors
    }
}
