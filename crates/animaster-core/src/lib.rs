//! Declarative animation sequencer for visual elements.
//!
//! Callers compose a sequence of timed visual-state changes (move, scale,
//! fade, pause) with an immutable builder and play it against an element. A
//! playback can loop, and the handle it returns can stop it or reset the
//! element to where it started.
//!
//! # Architecture
//!
//! ```text
//! Sequencer (immutable step list)
//!   └── play ──► Playback (cursor + tick chain on a Scheduler)
//!                  ├── adapter::apply_step ──► Element
//!                  └── PlaybackHandle (stop / reset via ElementSnapshot)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use animaster_core::{ElementRef, Sequencer, TimerQueue, VirtualElement};
//!
//! let queue = TimerQueue::new();
//! let block: ElementRef = Rc::new(VirtualElement::new("block"));
//! let handle = Sequencer::new(Rc::new(queue.clone())).heart_beating(&block);
//!
//! queue.advance(2500.0);
//! handle.stop();
//! ```

pub mod adapter;
pub mod element;
pub mod playback;
pub mod recipes;
pub mod scheduler;
pub mod sequencer;
pub mod step;

pub use adapter::{ElementSnapshot, HIDE_CLASS, SHOW_CLASS, apply_step};
pub use element::{Element, ElementError, ElementRef, StyleProperty, VirtualElement};
pub use playback::{PlaybackHandle, PlaybackId};
pub use recipes::{move_and_hide_split, show_and_hide_split};
pub use scheduler::{Scheduler, Task, TimerQueue};
pub use sequencer::{Sequencer, create_sequencer};
pub use step::{StepDescriptor, StepKind, Translation};
