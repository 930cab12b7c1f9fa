//! Named convenience sequences built purely from `Sequencer` primitives.
//!
//! Each recipe starts from an empty sequencer on the receiver's scheduler, so
//! steps already added to the receiver are not part of the recipe.

use super::element::ElementRef;
use super::playback::PlaybackHandle;
use super::sequencer::Sequencer;
use super::step::Translation;

/// Offset used by `move_and_hide`.
pub const MOVE_AND_HIDE_TRANSLATION: Translation = Translation { x: 100.0, y: 20.0 };

/// Duration of each half of one heart beat, in milliseconds.
pub const HEART_BEAT_STEP_MS: f64 = 500.0;
/// Scale at the peak of a beat.
pub const HEART_BEAT_PEAK: f64 = 1.4;
/// Scale at rest between beats.
pub const HEART_BEAT_REST: f64 = 1.0;

/// Split a total into the move (2/5) and fade-out (3/5) phases.
pub fn move_and_hide_split(duration: f64) -> (f64, f64) {
    (duration * 2.0 / 5.0, duration * 3.0 / 5.0)
}

/// Split a total into three equal phases.
pub fn show_and_hide_split(duration: f64) -> f64 {
    duration / 3.0
}

impl Sequencer {
    /// Move by `MOVE_AND_HIDE_TRANSLATION`, then fade out.
    pub fn move_and_hide_sequence(&self, duration: f64) -> Sequencer {
        let (move_ms, fade_ms) = move_and_hide_split(duration);
        self.empty()
            .add_move(move_ms, MOVE_AND_HIDE_TRANSLATION)
            .add_fade_out(fade_ms)
    }

    /// Fade in, hold, fade out; each a third of `duration`.
    pub fn show_and_hide_sequence(&self, duration: f64) -> Sequencer {
        let third = show_and_hide_split(duration);
        self.empty()
            .add_fade_in(third)
            .add_delay(third)
            .add_fade_out(third)
    }

    /// One beat: grow to the peak, shrink back to rest.
    pub fn heart_beat_sequence(&self) -> Sequencer {
        self.empty()
            .add_scale(HEART_BEAT_STEP_MS, HEART_BEAT_PEAK)
            .add_scale(HEART_BEAT_STEP_MS, HEART_BEAT_REST)
    }

    pub fn move_and_hide(&self, element: &ElementRef, duration: f64) -> PlaybackHandle {
        self.move_and_hide_sequence(duration).play(element, false)
    }

    pub fn show_and_hide(&self, element: &ElementRef, duration: f64) -> PlaybackHandle {
        self.show_and_hide_sequence(duration).play(element, false)
    }

    /// Beat forever, until the handle is stopped or reset.
    pub fn heart_beating(&self, element: &ElementRef) -> PlaybackHandle {
        self.heart_beat_sequence().play(element, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TimerQueue;
    use crate::step::StepDescriptor;
    use std::rc::Rc;

    fn base() -> Sequencer {
        Sequencer::new(Rc::new(TimerQueue::new()))
    }

    #[test]
    fn test_move_and_hide_split() {
        assert_eq!(move_and_hide_split(1000.0), (400.0, 600.0));
        assert_eq!(
            base().move_and_hide_sequence(1000.0).steps(),
            &[
                StepDescriptor::move_by(400.0, (100.0, 20.0)),
                StepDescriptor::fade_out(600.0),
            ]
        );
    }

    #[test]
    fn test_show_and_hide_split() {
        assert_eq!(
            base().show_and_hide_sequence(3000.0).steps(),
            &[
                StepDescriptor::fade_in(1000.0),
                StepDescriptor::delay(1000.0),
                StepDescriptor::fade_out(1000.0),
            ]
        );
    }

    #[test]
    fn test_heart_beat_steps() {
        let beat = base().heart_beat_sequence();
        assert_eq!(
            beat.steps(),
            &[StepDescriptor::scale(500.0, 1.4), StepDescriptor::scale(500.0, 1.0)]
        );
        assert_eq!(beat.total_duration(), 1000.0);
    }

    #[test]
    fn test_recipes_ignore_receiver_steps() {
        let seeded = base().add_delay(99.0);
        assert_eq!(seeded.show_and_hide_sequence(30.0).len(), 3);
        assert_eq!(seeded.len(), 1);
    }
}
