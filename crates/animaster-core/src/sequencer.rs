//! Immutable, chainable sequence builder.
//!
//! Every `add_*` call returns a new `Sequencer` whose step list is the
//! receiver's list plus one appended step. The receiver is never touched, so a
//! partially built sequence can be shared and extended in different directions:
//!
//! ```ignore
//! let queue = TimerQueue::new();
//! let base = Sequencer::new(Rc::new(queue.clone())).add_fade_in(500.0);
//! let blink = base.add_fade_out(500.0);
//! let drift = base.add_move(1000.0, (40.0, 0.0));
//! assert_eq!(base.len(), 1);
//!
//! let handle = blink.play(&element, true);
//! handle.stop();
//! ```

use std::fmt;
use std::iter;
use std::rc::Rc;

use tracing::debug;

use super::element::ElementRef;
use super::playback::{Playback, PlaybackHandle};
use super::scheduler::Scheduler;
use super::step::{StepDescriptor, Translation};

/// Start a sequencer on `scheduler`, seeded with `initial_steps`.
pub fn create_sequencer<I>(scheduler: Rc<dyn Scheduler>, initial_steps: I) -> Sequencer
where
    I: IntoIterator<Item = StepDescriptor>,
{
    Sequencer::with_steps(scheduler, initial_steps)
}

/// Persistent builder of an ordered step sequence.
///
/// Equality compares the step sequence only.
#[derive(Clone)]
pub struct Sequencer {
    scheduler: Rc<dyn Scheduler>,
    steps: Rc<[StepDescriptor]>,
}

impl Sequencer {
    /// Create an empty sequencer.
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            steps: Rc::from(Vec::new()),
        }
    }

    /// Create a sequencer from an explicit prior sequence.
    pub fn with_steps<I>(scheduler: Rc<dyn Scheduler>, steps: I) -> Self
    where
        I: IntoIterator<Item = StepDescriptor>,
    {
        Self {
            scheduler,
            steps: steps.into_iter().collect(),
        }
    }

    /// A fresh, empty sequencer on the same scheduler.
    pub fn empty(&self) -> Self {
        Self::new(Rc::clone(&self.scheduler))
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of all step durations as built, in milliseconds.
    pub fn total_duration(&self) -> f64 {
        self.steps.iter().map(|s| s.duration()).sum()
    }

    pub fn scheduler(&self) -> Rc<dyn Scheduler> {
        Rc::clone(&self.scheduler)
    }

    /// Return a new sequencer with `step` appended.
    pub fn push(&self, step: StepDescriptor) -> Self {
        Self {
            scheduler: Rc::clone(&self.scheduler),
            steps: self.steps.iter().copied().chain(iter::once(step)).collect(),
        }
    }

    // ========== Step builders ==========

    pub fn add_move(&self, duration: f64, translation: impl Into<Translation>) -> Self {
        self.push(StepDescriptor::move_by(duration, translation))
    }

    pub fn add_scale(&self, duration: f64, ratio: f64) -> Self {
        self.push(StepDescriptor::scale(duration, ratio))
    }

    pub fn add_fade_in(&self, duration: f64) -> Self {
        self.push(StepDescriptor::fade_in(duration))
    }

    pub fn add_fade_out(&self, duration: f64) -> Self {
        self.push(StepDescriptor::fade_out(duration))
    }

    pub fn add_delay(&self, duration: f64) -> Self {
        self.push(StepDescriptor::delay(duration))
    }

    // ========== Playback ==========

    /// Play the current sequence against `element`.
    ///
    /// The first step is applied before this returns. With `cycled` the
    /// sequence repeats until the handle is stopped or reset.
    pub fn play(&self, element: &ElementRef, cycled: bool) -> PlaybackHandle {
        debug!(
            steps = self.len(),
            pass_ms = self.total_duration(),
            cycled,
            "playing sequence"
        );
        Playback::start(
            Rc::clone(&self.scheduler),
            Rc::clone(element),
            Rc::clone(&self.steps),
            cycled,
        )
    }

    /// Capture the current sequence as a reusable trigger.
    ///
    /// Each call of the returned closure starts an independent playback on the
    /// given element. Callers that only fire and forget may drop the handle.
    pub fn build_handler(
        &self,
        cycled: bool,
    ) -> impl Fn(&ElementRef) -> PlaybackHandle + Clone + use<> {
        let scheduler = Rc::clone(&self.scheduler);
        let steps = Rc::clone(&self.steps);
        move |element: &ElementRef| {
            Playback::start(
                Rc::clone(&scheduler),
                Rc::clone(element),
                Rc::clone(&steps),
                cycled,
            )
        }
    }

    // ========== One-shot shortcuts ==========

    /// Append a move step and play immediately.
    pub fn move_by(
        &self,
        element: &ElementRef,
        duration: f64,
        translation: impl Into<Translation>,
    ) -> PlaybackHandle {
        self.add_move(duration, translation).play(element, false)
    }

    /// Append a scale step and play immediately.
    pub fn scale(&self, element: &ElementRef, duration: f64, ratio: f64) -> PlaybackHandle {
        self.add_scale(duration, ratio).play(element, false)
    }

    /// Append a fade-in step and play immediately.
    pub fn fade_in(&self, element: &ElementRef, duration: f64) -> PlaybackHandle {
        self.add_fade_in(duration).play(element, false)
    }

    /// Append a fade-out step and play immediately.
    pub fn fade_out(&self, element: &ElementRef, duration: f64) -> PlaybackHandle {
        self.add_fade_out(duration).play(element, false)
    }
}

impl PartialEq for Sequencer {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

impl fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("steps", &self.steps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, StyleProperty, VirtualElement};
    use crate::scheduler::TimerQueue;
    use crate::step::StepKind;

    fn sequencer() -> (TimerQueue, Sequencer) {
        let queue = TimerQueue::new();
        let seq = Sequencer::new(Rc::new(queue.clone()));
        (queue, seq)
    }

    #[test]
    fn test_add_returns_new_builder() {
        let (_, base) = sequencer();
        let one = base.add_fade_in(100.0);
        let two = one.add_delay(50.0);

        assert!(base.is_empty());
        assert_eq!(one.steps(), &[StepDescriptor::fade_in(100.0)]);
        assert_eq!(
            two.steps(),
            &[StepDescriptor::fade_in(100.0), StepDescriptor::delay(50.0)]
        );
    }

    #[test]
    fn test_branching_from_shared_prefix() {
        let (_, base) = sequencer();
        let prefix = base.add_scale(100.0, 2.0);
        let a = prefix.add_fade_out(10.0);
        let b = prefix.add_move(20.0, (1.0, 2.0));

        assert_eq!(prefix.len(), 1);
        assert_eq!(a.steps()[1].kind(), StepKind::FadeOut);
        assert_eq!(b.steps()[1].kind(), StepKind::Move);
    }

    #[test]
    fn test_every_add_kind() {
        let (_, base) = sequencer();
        let seq = base
            .add_move(1.0, Translation::new(5.0, 6.0))
            .add_scale(2.0, 0.5)
            .add_fade_in(3.0)
            .add_fade_out(4.0)
            .add_delay(5.0);
        let kinds: Vec<_> = seq.steps().iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Move,
                StepKind::Scale,
                StepKind::FadeIn,
                StepKind::FadeOut,
                StepKind::Delay
            ]
        );
        assert_eq!(seq.total_duration(), 15.0);
    }

    #[test]
    fn test_create_from_prior_sequence() {
        let queue = TimerQueue::new();
        let seq = create_sequencer(
            Rc::new(queue),
            [StepDescriptor::fade_in(1.0), StepDescriptor::fade_out(2.0)],
        );
        assert_eq!(seq.len(), 2);
        let longer = seq.add_delay(3.0);
        assert_eq!(seq.len(), 2);
        assert_eq!(longer.len(), 3);
    }

    #[test]
    fn test_equality_ignores_scheduler() {
        let a = Sequencer::new(Rc::new(TimerQueue::new())).add_delay(1.0);
        let b = Sequencer::new(Rc::new(TimerQueue::new())).add_delay(1.0);
        assert_eq!(a, b);
        assert_ne!(a, b.add_delay(1.0));
    }

    #[test]
    fn test_shortcut_plays_single_step() {
        let (queue, seq) = sequencer();
        let el = VirtualElement::new("block").shared();
        let erased: ElementRef = el.clone();

        seq.scale(&erased, 1000.0, 1.25);
        assert_eq!(el.style(StyleProperty::Transform).as_deref(), Some("scale(1.25)"));
        assert_eq!(
            el.style(StyleProperty::TransitionDuration).as_deref(),
            Some("1000ms")
        );
        // the shortcut does not grow the receiver
        assert!(seq.is_empty());
        queue.advance(1000.0);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_build_handler_reuses_captured_steps() {
        let (queue, seq) = sequencer();
        let blink = seq.add_fade_in(100.0).add_fade_out(100.0);
        let handler = blink.build_handler(false);
        // later builders do not leak into the handler
        let _ = blink.add_scale(10.0, 9.0);

        let first: ElementRef = VirtualElement::new("first").shared();
        let second: ElementRef = VirtualElement::new("second").shared();
        handler(&first);
        handler(&second);
        assert!(first.has_class("show"));
        assert!(second.has_class("show"));

        queue.advance(100.0);
        assert!(first.has_class("hide"));
        assert!(second.has_class("hide"));
        assert_eq!(first.style(StyleProperty::Transform), None);
    }
}
