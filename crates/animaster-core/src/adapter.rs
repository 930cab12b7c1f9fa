//! Element state adapter: snapshot, apply a step, restore.
//!
//! This is the only place that knows how a step maps onto element state:
//!
//! | Step      | transition-duration | transform               | classes              | opacity |
//! |-----------|---------------------|-------------------------|----------------------|---------|
//! | Move      | `{d}ms`             | `translate({x}px,{y}px)`| -                    | -       |
//! | Scale     | `{d}ms`             | `scale({r})`            | -                    | -       |
//! | FadeIn    | `{d}ms`             | -                       | `-hide +show`        | cleared |
//! | FadeOut   | `{d}ms`             | -                       | `-show +hide`        | -       |
//! | Delay     | -                   | -                       | -                    | -       |
//!
//! FadeOut deliberately leaves opacity alone: the `hide` marker carries the
//! transparent styling.

use super::element::{Element, ElementError, StyleProperty};
use super::step::{StepDescriptor, Translation};

/// Class marker for the shown state.
pub const SHOW_CLASS: &str = "show";
/// Class marker for the hidden state.
pub const HIDE_CLASS: &str = "hide";

/// The element state a playback may overwrite, captured before it starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSnapshot {
    /// Class markers in their original order.
    pub classes: Vec<String>,
    pub transition_duration: Option<String>,
    pub transform: Option<String>,
}

impl ElementSnapshot {
    /// Capture the current state of `element`.
    pub fn capture(element: &dyn Element) -> Self {
        Self {
            classes: element.classes(),
            transition_duration: element.style(StyleProperty::TransitionDuration),
            transform: element.style(StyleProperty::Transform),
        }
    }

    /// Put `element` back into the captured class state.
    ///
    /// Style overrides are cleared rather than restored to the captured
    /// values, so the element falls back to whatever its stylesheet says.
    pub fn restore(&self, element: &dyn Element) -> Result<(), ElementError> {
        for property in StyleProperty::ALL {
            element.set_style(property, None)?;
        }
        element.clear_classes()?;
        for class in &self.classes {
            element.add_class(class)?;
        }
        Ok(())
    }
}

/// Format a millisecond duration the way CSS expects it.
pub fn format_duration(duration: f64) -> String {
    format!("{duration}ms")
}

pub fn translate_transform(translation: Translation) -> String {
    format!("translate({}px,{}px)", translation.x, translation.y)
}

pub fn scale_transform(ratio: f64) -> String {
    format!("scale({ratio})")
}

/// Apply the side effect of one step to `element`.
pub fn apply_step(element: &dyn Element, step: &StepDescriptor) -> Result<(), ElementError> {
    match *step {
        StepDescriptor::Move {
            duration,
            translation,
        } => {
            set_transition(element, duration)?;
            element.set_style(
                StyleProperty::Transform,
                Some(translate_transform(translation)),
            )
        }
        StepDescriptor::Scale { duration, ratio } => {
            set_transition(element, duration)?;
            element.set_style(StyleProperty::Transform, Some(scale_transform(ratio)))
        }
        StepDescriptor::FadeIn { duration } => {
            set_transition(element, duration)?;
            element.remove_class(HIDE_CLASS)?;
            element.add_class(SHOW_CLASS)?;
            element.set_style(StyleProperty::Opacity, None)
        }
        StepDescriptor::FadeOut { duration } => {
            set_transition(element, duration)?;
            element.remove_class(SHOW_CLASS)?;
            element.add_class(HIDE_CLASS)
        }
        StepDescriptor::Delay { .. } => Ok(()),
    }
}

fn set_transition(element: &dyn Element, duration: f64) -> Result<(), ElementError> {
    element.set_style(
        StyleProperty::TransitionDuration,
        Some(format_duration(duration)),
    )
}
