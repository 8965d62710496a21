#![forbid(unsafe_code)]

//! Reducer-style state machines and the effects they return.
//!
//! Components implement [`Model`]: every input is an action, every side
//! effect is a value in the returned [`Cmd`] tree. The host adapter walks the
//! tree and performs the effects; nothing inside a model touches the outside
//! world directly.
//!
//! # Example
//!
//! ```
//! use pterm_core::cmd::{Cmd, Model};
//! use std::time::Duration;
//!
//! #[derive(Default)]
//! struct Lamp {
//!     on: bool,
//! }
//!
//! enum LampAction {
//!     Toggle,
//! }
//!
//! #[derive(Debug, PartialEq)]
//! enum LampEffect {
//!     Beep,
//!     Persist(bool),
//! }
//!
//! impl Model for Lamp {
//!     type Action = LampAction;
//!     type Effect = LampEffect;
//!
//!     fn update(&mut self, action: LampAction) -> Cmd<LampEffect> {
//!         match action {
//!             LampAction::Toggle => {
//!                 self.on = !self.on;
//!                 Cmd::batch(vec![
//!                     Cmd::effect(LampEffect::Beep),
//!                     Cmd::after(Duration::from_millis(50), Cmd::effect(LampEffect::Persist(self.on))),
//!                 ])
//!             }
//!         }
//!     }
//! }
//!
//! let mut lamp = Lamp::default();
//! let scheduled = lamp.update(LampAction::Toggle).into_scheduled();
//! assert_eq!(scheduled.len(), 2);
//! assert_eq!(scheduled[1].delay, Duration::from_millis(50));
//! ```

use std::time::Duration;

/// A state machine driven by actions.
pub trait Model {
    /// Inputs accepted by the model.
    type Action;
    /// Side effects the model asks the host to perform.
    type Effect;

    /// Apply one action and return the effects it produced.
    fn update(&mut self, action: Self::Action) -> Cmd<Self::Effect>;
}

/// Effects returned by a [`Model`] for the host to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd<E> {
    /// No operation.
    None,
    /// Execute commands in order.
    Batch(Vec<Cmd<E>>),
    /// A single effect.
    Effect(E),
    /// Execute the inner command after a delay.
    After(Duration, Box<Cmd<E>>),
}

impl<E> Cmd<E> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a single-effect command.
    #[inline]
    pub fn effect(effect: E) -> Self {
        Self::Effect(effect)
    }

    /// Create a batch of commands, collapsing trivial cases.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or_default(),
            _ => Self::Batch(cmds),
        }
    }

    /// Run `cmd` after `delay`.
    pub fn after(delay: Duration, cmd: Self) -> Self {
        if cmd.is_none() {
            Self::None
        } else if delay.is_zero() {
            cmd
        } else {
            Self::After(delay, Box::new(cmd))
        }
    }

    /// Whether this command does nothing.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Convert every effect with `f`, preserving structure and delays.
    pub fn map<F>(self, f: impl Fn(E) -> F) -> Cmd<F> {
        self.map_with(&f)
    }

    fn map_with<F>(self, f: &dyn Fn(E) -> F) -> Cmd<F> {
        match self {
            Self::None => Cmd::None,
            Self::Effect(effect) => Cmd::Effect(f(effect)),
            Self::Batch(cmds) => Cmd::Batch(cmds.into_iter().map(|c| c.map_with(f)).collect()),
            Self::After(delay, cmd) => Cmd::After(delay, Box::new(cmd.map_with(f))),
        }
    }

    /// Flatten into effects tagged with their cumulative delay, in execution order.
    pub fn into_scheduled(self) -> Vec<Scheduled<E>> {
        let mut out = Vec::new();
        self.flatten_into(Duration::ZERO, &mut out);
        out
    }

    fn flatten_into(self, base: Duration, out: &mut Vec<Scheduled<E>>) {
        match self {
            Self::None => {}
            Self::Effect(effect) => out.push(Scheduled {
                delay: base,
                effect,
            }),
            Self::Batch(cmds) => {
                for cmd in cmds {
                    cmd.flatten_into(base, out);
                }
            }
            Self::After(delay, cmd) => cmd.flatten_into(base.saturating_add(delay), out),
        }
    }
}

impl<E> Default for Cmd<E> {
    fn default() -> Self {
        Self::None
    }
}

/// One effect with the delay after which it should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled<E> {
    pub delay: Duration,
    pub effect: E,
}
