//! Step descriptors: the data shape of one animation step.
//!
//! A sequence is an ordered list of `StepDescriptor`s. Each descriptor carries
//! its own duration in milliseconds plus whatever the kind needs:
//! - `Move`: a translation offset
//! - `Scale`: a scale ratio
//! - `FadeIn` / `FadeOut` / `Delay`: nothing beyond the duration

use serde::{Deserialize, Serialize};

/// 2D translation offset in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
}

impl Translation {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Translation {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// One step of an animation sequence.
///
/// Durations are not validated. A negative duration is stored as given and is
/// treated as zero by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepDescriptor {
    /// Translate the element by `translation`.
    Move {
        duration: f64,
        translation: Translation,
    },
    /// Scale the element by `ratio`.
    Scale { duration: f64, ratio: f64 },
    /// Switch the element to its shown state.
    FadeIn { duration: f64 },
    /// Switch the element to its hidden state.
    FadeOut { duration: f64 },
    /// Hold the current state.
    Delay { duration: f64 },
}

impl StepDescriptor {
    pub fn move_by(duration: f64, translation: impl Into<Translation>) -> Self {
        Self::Move {
            duration,
            translation: translation.into(),
        }
    }

    pub fn scale(duration: f64, ratio: f64) -> Self {
        Self::Scale { duration, ratio }
    }

    pub fn fade_in(duration: f64) -> Self {
        Self::FadeIn { duration }
    }

    pub fn fade_out(duration: f64) -> Self {
        Self::FadeOut { duration }
    }

    pub fn delay(duration: f64) -> Self {
        Self::Delay { duration }
    }

    /// Duration of this step in milliseconds, exactly as it was built.
    pub fn duration(&self) -> f64 {
        match self {
            Self::Move { duration, .. }
            | Self::Scale { duration, .. }
            | Self::FadeIn { duration }
            | Self::FadeOut { duration }
            | Self::Delay { duration } => *duration,
        }
    }

    pub fn kind(&self) -> StepKind {
        match self {
            Self::Move { .. } => StepKind::Move,
            Self::Scale { .. } => StepKind::Scale,
            Self::FadeIn { .. } => StepKind::FadeIn,
            Self::FadeOut { .. } => StepKind::FadeOut,
            Self::Delay { .. } => StepKind::Delay,
        }
    }
}

/// Fieldless discriminant of a `StepDescriptor`, handy for logging and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Move,
    Scale,
    FadeIn,
    FadeOut,
    Delay,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_and_kind() {
        let steps = [
            (StepDescriptor::move_by(400.0, (100.0, 20.0)), StepKind::Move),
            (StepDescriptor::scale(500.0, 1.4), StepKind::Scale),
            (StepDescriptor::fade_in(1000.0), StepKind::FadeIn),
            (StepDescriptor::fade_out(600.0), StepKind::FadeOut),
            (StepDescriptor::delay(0.0), StepKind::Delay),
        ];
        let durations: Vec<f64> = steps.iter().map(|(s, _)| s.duration()).collect();
        assert_eq!(durations, vec![400.0, 500.0, 1000.0, 600.0, 0.0]);
        for (step, kind) in steps {
            assert_eq!(step.kind(), kind);
        }
    }

    #[test]
    fn test_negative_duration_passes_through() {
        let step = StepDescriptor::fade_in(-250.0);
        assert_eq!(step.duration(), -250.0);
    }

    #[test]
    fn test_serde_tagged_shape() {
        let step = StepDescriptor::move_by(400.0, (100.0, 20.0));
        let value = serde_json::to_value(step).unwrap();
        assert_eq!(value["kind"], "move");
        assert_eq!(value["translation"]["x"], 100.0);

        let parsed: StepDescriptor =
            serde_json::from_str(r#"{"kind":"fade_out","duration":600}"#).unwrap();
        assert_eq!(parsed, StepDescriptor::fade_out(600.0));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = serde_json::from_str::<StepDescriptor>(r#"{"kind":"spin","duration":1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("spin"));
    }
}
