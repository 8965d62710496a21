#![forbid(unsafe_code)]

//! Window Manager reducer.
//!
//! Pointer gestures are modelled the same way for drag and resize: a
//! `begin_*` call records the pointer origin and the starting rectangle, each
//! `update_*` stores the latest pointer position in a [`FrameCoalescer`], and
//! the geometry is committed once per [`WindowAction::AnimationFrame`].
//! `end_*` commits whatever is still pending so the final position is never
//! lost.

use pterm_core::{Cmd, FrameCoalescer, Model, Point, Rect, Size};

use crate::constraints::WindowConstraints;
use crate::geometry::WindowGeometry;
use crate::resize::ResizeDirection;

/// Active pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        origin: Point,
        start: Rect,
    },
    Resizing {
        direction: ResizeDirection,
        origin: Point,
        start: Rect,
    },
}

/// Inputs to the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    BeginDrag(Point),
    UpdateDrag(Point),
    EndDrag,
    BeginResize(ResizeDirection, Point),
    UpdateResize(Point),
    EndResize,
    /// Display frame callback; commits coalesced pointer input.
    AnimationFrame,
    Maximize,
    Restore,
    ToggleMaximize,
    Minimize,
    Show,
    ViewportResized(Size),
    /// Explicit close: back to the default geometry.
    Reset,
}

/// Effects requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEffect {
    /// Schedule one [`WindowAction::AnimationFrame`].
    RequestAnimationFrame,
}

/// Owns the floating window's geometry and chrome state.
#[derive(Debug, Clone)]
pub struct WindowManager {
    constraints: WindowConstraints,
    viewport: Size,
    geometry: WindowGeometry,
    /// Geometry to return to when leaving the maximized state.
    restore_rect: Option<Rect>,
    gesture: Gesture,
    pointer: FrameCoalescer<Point>,
}

impl WindowManager {
    /// Create a window with the centered default geometry.
    #[must_use]
    pub fn new(constraints: WindowConstraints, viewport: Size) -> Self {
        Self {
            geometry: WindowGeometry::centered(&constraints, viewport),
            constraints,
            viewport,
            restore_rect: None,
            gesture: Gesture::Idle,
            pointer: FrameCoalescer::new(),
        }
    }

    #[must_use]
    pub const fn geometry(&self) -> WindowGeometry {
        self.geometry
    }

    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub const fn constraints(&self) -> &WindowConstraints {
        &self.constraints
    }

    #[must_use]
    pub const fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Number of pointer updates folded into a later frame.
    #[must_use]
    pub const fn coalesced_updates(&self) -> u64 {
        self.pointer.coalesced_total()
    }

    /// Adopt previously saved geometry, re-clamped to the current viewport.
    ///
    /// The window always comes back visible.
    pub fn restore_geometry(&mut self, saved: WindowGeometry) {
        self.cancel_gesture();
        self.restore_rect = None;
        if saved.is_maximized {
            self.geometry = WindowGeometry {
                is_maximized: true,
                ..WindowGeometry::from_rect(Rect::from_size(self.viewport))
            };
        } else {
            let rect = self.constraints.clamp_rect(saved.rect(), self.viewport);
            self.geometry = WindowGeometry::from_rect(rect);
        }
        tracing::debug!(geometry = ?self.geometry, "window geometry restored");
    }

    fn chrome_locked(&self) -> bool {
        self.geometry.is_maximized || self.geometry.is_minimized
    }

    /// Start dragging by the title bar. Rejected while maximized or minimized.
    pub fn begin_drag(&mut self, pointer: Point) -> bool {
        if self.chrome_locked() || self.gesture != Gesture::Idle {
            tracing::debug!(gesture = ?self.gesture, "drag rejected");
            return false;
        }
        self.gesture = Gesture::Dragging {
            origin: pointer,
            start: self.geometry.rect(),
        };
        tracing::debug!(x = pointer.x, y = pointer.y, "drag started");
        true
    }

    /// Queue a drag pointer position for the next frame.
    pub fn update_drag(&mut self, pointer: Point) -> Cmd<WindowEffect> {
        if matches!(self.gesture, Gesture::Dragging { .. }) {
            self.queue_pointer(pointer)
        } else {
            Cmd::none()
        }
    }

    /// Finish a drag, committing any pending position.
    pub fn end_drag(&mut self) {
        if matches!(self.gesture, Gesture::Dragging { .. }) {
            self.commit_frame();
            self.gesture = Gesture::Idle;
            tracing::debug!(geometry = ?self.geometry, "drag ended");
        }
    }

    /// Start resizing from an edge or corner. Rejected while maximized or minimized.
    pub fn begin_resize(&mut self, direction: ResizeDirection, pointer: Point) -> bool {
        if self.chrome_locked() || self.gesture != Gesture::Idle {
            tracing::debug!(gesture = ?self.gesture, ?direction, "resize rejected");
            return false;
        }
        self.gesture = Gesture::Resizing {
            direction,
            origin: pointer,
            start: self.geometry.rect(),
        };
        tracing::debug!(?direction, x = pointer.x, y = pointer.y, "resize started");
        true
    }

    /// Queue a resize pointer position for the next frame.
    pub fn update_resize(&mut self, pointer: Point) -> Cmd<WindowEffect> {
        if matches!(self.gesture, Gesture::Resizing { .. }) {
            self.queue_pointer(pointer)
        } else {
            Cmd::none()
        }
    }

    /// Finish a resize, committing any pending size.
    pub fn end_resize(&mut self) {
        if matches!(self.gesture, Gesture::Resizing { .. }) {
            self.commit_frame();
            self.gesture = Gesture::Idle;
            tracing::debug!(geometry = ?self.geometry, "resize ended");
        }
    }

    fn queue_pointer(&mut self, pointer: Point) -> Cmd<WindowEffect> {
        if self.pointer.push(pointer) {
            Cmd::effect(WindowEffect::RequestAnimationFrame)
        } else {
            Cmd::none()
        }
    }

    /// Apply the latest queued pointer position, if any.
    pub fn commit_frame(&mut self) {
        let Some(pointer) = self.pointer.take() else {
            return;
        };
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Dragging { origin, start } => {
                let (dx, dy) = pointer.delta_from(origin);
                let moved = Rect::from_parts(start.origin().offset(dx, dy), start.size());
                let position = self.constraints.clamp_position(moved, self.viewport);
                self.geometry.position = position;
            }
            Gesture::Resizing {
                direction,
                origin,
                start,
            } => {
                let (dx, dy) = pointer.delta_from(origin);
                let min = self.constraints.min_size(self.viewport);
                let rect = direction.apply(start, dx, dy, min, self.viewport);
                let position = self.constraints.clamp_position(rect, self.viewport);
                self.geometry.set_rect(Rect::from_parts(position, rect.size()));
            }
        }
        tracing::trace!(geometry = ?self.geometry, "frame committed");
    }

    fn cancel_gesture(&mut self) {
        self.pointer.clear();
        self.gesture = Gesture::Idle;
    }

    /// Fill the viewport, remembering the current geometry for [`Self::restore`].
    pub fn maximize(&mut self) {
        if self.geometry.is_maximized {
            return;
        }
        self.cancel_gesture();
        self.restore_rect = Some(self.geometry.rect());
        self.geometry.set_rect(Rect::from_size(self.viewport));
        self.geometry.is_maximized = true;
        tracing::debug!("window maximized");
    }

    /// Leave the maximized state.
    pub fn restore(&mut self) {
        if !self.geometry.is_maximized {
            return;
        }
        let rect = match self.restore_rect.take() {
            Some(rect) => self.constraints.clamp_rect(rect, self.viewport),
            None => self.constraints.default_rect(self.viewport),
        };
        self.geometry.set_rect(rect);
        self.geometry.is_maximized = false;
        tracing::debug!(geometry = ?self.geometry, "window restored");
    }

    pub fn toggle_maximize(&mut self) {
        if self.geometry.is_maximized {
            self.restore();
        } else {
            self.maximize();
        }
    }

    /// Hide the window, keeping its geometry.
    pub fn minimize(&mut self) {
        self.cancel_gesture();
        self.geometry.is_minimized = true;
        tracing::debug!("window minimized");
    }

    /// Show a minimized window.
    pub fn show(&mut self) {
        self.geometry.is_minimized = false;
    }

    /// Re-clamp stored geometry after the host viewport changed size.
    pub fn on_viewport_resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.cancel_gesture();
        if self.geometry.is_maximized {
            self.geometry.set_rect(Rect::from_size(viewport));
        } else {
            let rect = self.constraints.clamp_rect(self.geometry.rect(), viewport);
            self.geometry.set_rect(rect);
        }
        tracing::debug!(?viewport, geometry = ?self.geometry, "viewport resized");
    }

    /// Back to the default geometry, as after an explicit close.
    pub fn reset(&mut self) {
        self.cancel_gesture();
        self.restore_rect = None;
        self.geometry = WindowGeometry::centered(&self.constraints, self.viewport);
    }
}

impl Model for WindowManager {
    type Action = WindowAction;
    type Effect = WindowEffect;

    fn update(&mut self, action: WindowAction) -> Cmd<WindowEffect> {
        match action {
            WindowAction::BeginDrag(p) => {
                self.begin_drag(p);
            }
            WindowAction::UpdateDrag(p) => return self.update_drag(p),
            WindowAction::EndDrag => self.end_drag(),
            WindowAction::BeginResize(direction, p) => {
                self.begin_resize(direction, p);
            }
            WindowAction::UpdateResize(p) => return self.update_resize(p),
            WindowAction::EndResize => self.end_resize(),
            WindowAction::AnimationFrame => self.commit_frame(),
            WindowAction::Maximize => self.maximize(),
            WindowAction::Restore => self.restore(),
            WindowAction::ToggleMaximize => self.toggle_maximize(),
            WindowAction::Minimize => self.minimize(),
            WindowAction::Show => self.show(),
            WindowAction::ViewportResized(size) => self.on_viewport_resize(size),
            WindowAction::Reset => self.reset(),
        }
        Cmd::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VIEWPORT: Size = Size::new(1280, 800);

    fn manager() -> WindowManager {
        WindowManager::new(WindowConstraints::default(), VIEWPORT)
    }

    #[test]
    fn starts_centered() {
        let wm = manager();
        assert_eq!(wm.geometry().rect(), Rect::new(128, 80, 1024, 640));
        assert_eq!(wm.gesture(), Gesture::Idle);
    }

    #[test]
    fn drag_is_coalesced_per_frame() {
        let mut wm = manager();
        assert!(wm.begin_drag(Point::new(500, 90)));

        let first = wm.update(WindowAction::UpdateDrag(Point::new(510, 95)));
        assert_eq!(first, Cmd::effect(WindowEffect::RequestAnimationFrame));
        let second = wm.update(WindowAction::UpdateDrag(Point::new(520, 100)));
        assert!(second.is_none());

        // Nothing moves until the frame arrives.
        assert_eq!(wm.geometry().position, Point::new(128, 80));

        wm.update(WindowAction::AnimationFrame);
        assert_eq!(wm.geometry().position, Point::new(148, 90));
        assert_eq!(wm.coalesced_updates(), 1);
    }

    #[test]
    fn end_drag_commits_pending_pointer() {
        let mut wm = manager();
        wm.begin_drag(Point::new(0, 0));
        let _ = wm.update_drag(Point::new(-30, 40));
        wm.end_drag();
        assert_eq!(wm.geometry().position, Point::new(98, 120));
        assert_eq!(wm.gesture(), Gesture::Idle);
    }

    #[test]
    fn drag_rejected_while_maximized_or_minimized() {
        let mut wm = manager();
        wm.maximize();
        assert!(!wm.begin_drag(Point::new(1, 1)));
        assert!(!wm.begin_resize(ResizeDirection::East, Point::new(1, 1)));

        let mut wm = manager();
        wm.minimize();
        assert!(!wm.begin_drag(Point::new(1, 1)));
    }

    #[test]
    fn drag_clamps_to_visible_area() {
        let mut wm = manager();
        wm.begin_drag(Point::new(0, 0));
        let _ = wm.update_drag(Point::new(-10_000, -10_000));
        wm.end_drag();
        let g = wm.geometry();
        assert_eq!(g.position, Point::new(100 - 1024, 0));
        assert!(g.satisfies(wm.constraints(), VIEWPORT));
    }

    #[test]
    fn maximize_then_restore_returns_to_snapshot() {
        let mut wm = manager();
        wm.begin_drag(Point::new(0, 0));
        let _ = wm.update_drag(Point::new(10, 10));
        wm.end_drag();
        let before = wm.geometry().rect();

        wm.update(WindowAction::Maximize);
        assert!(wm.geometry().is_maximized);
        assert_eq!(wm.geometry().rect(), Rect::from_size(VIEWPORT));

        wm.update(WindowAction::Restore);
        assert!(!wm.geometry().is_maximized);
        assert_eq!(wm.geometry().rect(), before);
    }

    #[test]
    fn restore_without_snapshot_uses_default() {
        let mut wm = manager();
        wm.restore_geometry(WindowGeometry {
            is_maximized: true,
            ..wm.geometry()
        });
        assert!(wm.geometry().is_maximized);
        wm.restore();
        assert_eq!(
            wm.geometry().rect(),
            WindowConstraints::default().default_rect(VIEWPORT)
        );
    }

    #[test]
    fn toggle_maximize_round_trips() {
        let mut wm = manager();
        let before = wm.geometry();
        wm.update(WindowAction::ToggleMaximize);
        wm.update(WindowAction::ToggleMaximize);
        assert_eq!(wm.geometry(), before);
    }

    #[test]
    fn minimize_keeps_geometry() {
        let mut wm = manager();
        let before = wm.geometry().rect();
        wm.update(WindowAction::Minimize);
        assert!(wm.geometry().is_minimized);
        wm.update(WindowAction::Show);
        assert!(!wm.geometry().is_minimized);
        assert_eq!(wm.geometry().rect(), before);
    }

    #[test]
    fn viewport_shrink_reclamps() {
        let mut wm = manager();
        wm.update(WindowAction::ViewportResized(Size::new(600, 500)));
        let g = wm.geometry();
        assert_eq!(g.size, Size::new(600, 500));
        assert!(g.satisfies(wm.constraints(), Size::new(600, 500)));
    }

    #[test]
    fn viewport_resize_while_maximized_fills_new_viewport() {
        let mut wm = manager();
        wm.maximize();
        wm.on_viewport_resize(Size::new(1024, 768));
        assert_eq!(wm.geometry().rect(), Rect::new(0, 0, 1024, 768));
    }

    #[test]
    fn resize_from_west_keeps_right_edge() {
        let mut wm = manager();
        let right = wm.geometry().rect().right();
        assert!(wm.begin_resize(ResizeDirection::West, Point::new(128, 400)));
        let _ = wm.update_resize(Point::new(700, 400));
        wm.update(WindowAction::EndResize);
        let rect = wm.geometry().rect();
        assert_eq!(rect.width, 452);
        assert_eq!(rect.right(), right);
    }

    #[test]
    fn restore_geometry_forces_visible_and_clamps() {
        let mut wm = manager();
        let saved = WindowGeometry {
            position: Point::new(5000, 5000),
            size: Size::new(10, 10),
            is_maximized: false,
            is_minimized: true,
        };
        wm.restore_geometry(saved);
        let g = wm.geometry();
        assert!(!g.is_minimized);
        assert_eq!(g.size, Size::new(400, 300));
        assert!(g.satisfies(wm.constraints(), VIEWPORT));
    }

    #[test]
    fn reset_returns_to_default() {
        let mut wm = manager();
        wm.maximize();
        wm.minimize();
        wm.update(WindowAction::Reset);
        assert_eq!(
            wm.geometry(),
            WindowGeometry::centered(&WindowConstraints::default(), VIEWPORT)
        );
    }
}
