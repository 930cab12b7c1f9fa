//! Playback engine: drives one step sequence against one element.
//!
//! A playback owns a cursor into the sequence captured when it started and a
//! chain of scheduled ticks. Each tick:
//!
//! 1. halts if the playback was cancelled,
//! 2. wraps the cursor to 0 at the end of a cycled sequence, or halts,
//! 3. applies the current step to the element,
//! 4. advances the cursor,
//! 5. schedules the next tick after the applied step's duration.
//!
//! The first tick runs synchronously inside `Playback::start`, so step *k*
//! begins after the durations of steps `0..k` have elapsed.
//!
//! Cancellation is cooperative. `PlaybackHandle::stop` only sets a flag; the
//! tick that is already queued still fires and returns immediately.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace, warn};

use super::adapter::{ElementSnapshot, apply_step};
use super::element::{Element, ElementRef};
use super::scheduler::Scheduler;
use super::step::StepDescriptor;

/// Unique identifier of a playback, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackId(pub u64);

impl PlaybackId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for PlaybackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State shared between the tick chain and every clone of the handle.
struct Session {
    id: PlaybackId,
    element: ElementRef,
    snapshot: ElementSnapshot,
    cancelled: Cell<bool>,
}

pub(crate) struct Playback {
    session: Rc<Session>,
    steps: Rc<[StepDescriptor]>,
    cycled: bool,
    cursor: Cell<usize>,
    scheduler: Rc<dyn Scheduler>,
}

impl Playback {
    /// Snapshot `element`, run the first tick, and hand back the control handle.
    pub(crate) fn start(
        scheduler: Rc<dyn Scheduler>,
        element: ElementRef,
        steps: Rc<[StepDescriptor]>,
        cycled: bool,
    ) -> PlaybackHandle {
        let session = Rc::new(Session {
            id: PlaybackId::new(),
            snapshot: ElementSnapshot::capture(&*element),
            element,
            cancelled: Cell::new(false),
        });
        debug!(
            playback = %session.id,
            element = %session.element.label(),
            steps = steps.len(),
            cycled,
            snapshot = ?session.snapshot,
            "playback started"
        );

        let playback = Rc::new(Playback {
            session: Rc::clone(&session),
            steps,
            cycled,
            cursor: Cell::new(0),
            scheduler,
        });
        playback.tick();

        PlaybackHandle { session }
    }

    fn tick(self: Rc<Self>) {
        let session = &self.session;
        if session.cancelled.get() {
            trace!(playback = %session.id, "tick after cancel, halting");
            return;
        }

        let mut cursor = self.cursor.get();
        if cursor >= self.steps.len() {
            if !self.cycled {
                debug!(playback = %session.id, "playback finished");
                return;
            }
            if self.steps.is_empty() {
                debug!(playback = %session.id, "cycled sequence is empty, nothing to play");
                return;
            }
            trace!(playback = %session.id, "cycle wrapped");
            cursor = 0;
        }

        let step = self.steps[cursor];
        trace!(
            playback = %session.id,
            at_ms = self.scheduler.now_ms(),
            index = cursor,
            "tick"
        );
        if let Err(err) = apply_step(&*session.element, &step) {
            warn!(
                playback = %session.id,
                step = ?step.kind(),
                error = %err,
                "element rejected step, halting playback"
            );
            return;
        }
        debug!(
            playback = %session.id,
            step = ?step.kind(),
            duration_ms = step.duration(),
            "step applied"
        );
        self.cursor.set(cursor + 1);

        let scheduler = Rc::clone(&self.scheduler);
        scheduler.schedule_after(step.duration(), Box::new(move || self.tick()));
    }
}

/// Control handle returned by `play`.
///
/// Dropping the handle does not stop the playback. Both `stop` and `reset`
/// take effect once: after either has been called, further calls do nothing.
#[derive(Clone)]
pub struct PlaybackHandle {
    session: Rc<Session>,
}

impl PlaybackHandle {
    pub fn id(&self) -> PlaybackId {
        self.session.id
    }

    /// Halt the playback before its next step. The element keeps whatever
    /// state the steps applied so far left it in.
    pub fn stop(&self) {
        if self.session.cancelled.replace(true) {
            return;
        }
        debug!(playback = %self.session.id, "playback stopped");
    }

    /// Halt the playback and put the element back into the state captured
    /// when it started, with every style override cleared.
    pub fn reset(&self) {
        if self.session.cancelled.replace(true) {
            return;
        }
        let session = &self.session;
        match session.snapshot.restore(&*session.element) {
            Ok(()) => debug!(playback = %session.id, "playback reset"),
            Err(err) => warn!(
                playback = %session.id,
                error = %err,
                "failed to restore element on reset"
            ),
        }
    }

    /// Whether `stop` or `reset` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.session.cancelled.get()
    }
}

impl fmt::Debug for PlaybackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackHandle")
            .field("id", &self.session.id)
            .field("element", &self.session.element.label())
            .field("cancelled", &self.session.cancelled.get())
            .finish()
    }
}
