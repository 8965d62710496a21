#![forbid(unsafe_code)]

//! Window Manager for the floating terminal widget.
//!
//! Owns the widget's screen geometry and chrome state. All mutations go
//! through [`WindowManager::update`] (or the equivalent direct methods), and
//! the only effect it ever asks of the host is an animation-frame callback
//! used to coalesce continuous pointer input.
//!
//! Invariants maintained after every operation:
//! - size never drops below the active minimums from [`WindowConstraints`];
//! - unless maximized, at least `min_visible_area` pixels stay inside the
//!   viewport on both axes.

pub mod constraints;
pub mod geometry;
pub mod manager;
pub mod resize;

pub use constraints::{
    MIN_HEIGHT, MIN_VISIBLE_AREA, MIN_WIDTH, NARROW_MIN_HEIGHT, NARROW_MIN_WIDTH,
    NARROW_VIEWPORT_BREAKPOINT, WindowConstraints,
};
pub use geometry::WindowGeometry;
pub use manager::{Gesture, WindowAction, WindowEffect, WindowManager};
pub use resize::ResizeDirection;
