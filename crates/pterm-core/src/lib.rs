#![forbid(unsafe_code)]

//! Core building blocks for the pterm terminal widget.
//!
//! # Key Components
//!
//! - [`Cmd`] - Effect tree returned by reducers, executed by the host adapter
//! - [`Model`] - Trait for reducer-style state machines
//! - [`DeterministicClock`] - Monotonic clock advanced explicitly by the host
//! - [`FrameCoalescer`] - Latest-wins buffer committing at most once per frame
//! - [`Point`], [`Size`], [`Rect`] - Pixel-space geometry
//!
//! Nothing in this crate touches a rendering surface. Components built on it
//! are plain reducers that can be driven from tests or a headless binary.

pub mod clock;
pub mod cmd;
pub mod frame_coalescer;
pub mod geometry;
pub mod serde_millis;

pub use clock::{Clock, DeterministicClock, MonotonicClock};
pub use cmd::{Cmd, Model, Scheduled};
pub use frame_coalescer::FrameCoalescer;
pub use geometry::{Point, Rect, Size};
