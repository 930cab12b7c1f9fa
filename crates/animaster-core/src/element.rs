//! The visual element a sequence is played against.
//!
//! The engine never renders anything itself. It only needs an element that can
//! hold a few style overrides and a list of class markers, and leaves the
//! actual transition to whoever renders that element. `Element` is that
//! capability; `VirtualElement` is an in-memory implementation used by tests
//! and the demo shell.
//!
//! Elements are shared between the caller and every in-flight playback, so all
//! methods take `&self` and implementations use interior mutability.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared reference to a type-erased element.
pub type ElementRef = Rc<dyn Element>;

/// Style properties the engine reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    /// CSS `transition-duration`, e.g. `400ms`.
    TransitionDuration,
    /// CSS `transform`, e.g. `translate(100px,20px)` or `scale(1.4)`.
    Transform,
    /// CSS `opacity`.
    Opacity,
}

impl StyleProperty {
    pub const ALL: [StyleProperty; 3] = [Self::TransitionDuration, Self::Transform, Self::Opacity];

    /// CSS property name.
    pub fn css_name(&self) -> &'static str {
        match self {
            Self::TransitionDuration => "transition-duration",
            Self::Transform => "transform",
            Self::Opacity => "opacity",
        }
    }
}

/// Failure reported by an element while being mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementError {
    #[error("element `{element}` is detached")]
    Detached { element: String },
    #[error("element `{element}` rejected the change: {reason}")]
    Rejected { element: String, reason: String },
}

/// Capability surface of a target element.
pub trait Element {
    /// Human-readable label used in log output.
    fn label(&self) -> String;

    /// Current override for `property`, `None` if unset.
    fn style(&self, property: StyleProperty) -> Option<String>;

    /// Set (`Some`) or clear (`None`) the override for `property`.
    fn set_style(&self, property: StyleProperty, value: Option<String>) -> Result<(), ElementError>;

    /// Class markers in insertion order.
    fn classes(&self) -> Vec<String>;

    /// Add a class marker. Adding a marker that is already present is a no-op.
    fn add_class(&self, class: &str) -> Result<(), ElementError>;

    /// Remove a class marker if present.
    fn remove_class(&self, class: &str) -> Result<(), ElementError>;

    /// Remove every class marker.
    fn clear_classes(&self) -> Result<(), ElementError>;

    fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }
}

#[derive(Debug, Default)]
struct ElementState {
    classes: Vec<String>,
    transition_duration: Option<String>,
    transform: Option<String>,
    opacity: Option<String>,
    detached: bool,
}

impl ElementState {
    fn slot(&mut self, property: StyleProperty) -> &mut Option<String> {
        match property {
            StyleProperty::TransitionDuration => &mut self.transition_duration,
            StyleProperty::Transform => &mut self.transform,
            StyleProperty::Opacity => &mut self.opacity,
        }
    }
}

/// In-memory element with class markers and style overrides.
#[derive(Debug)]
pub struct VirtualElement {
    label: String,
    state: RefCell<ElementState>,
}

impl VirtualElement {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: RefCell::new(ElementState::default()),
        }
    }

    /// Create an element that already carries the given class markers.
    pub fn with_classes<I, S>(label: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let element = Self::new(label);
        {
            let mut state = element.state.borrow_mut();
            for class in classes {
                let class = class.into();
                if !state.classes.contains(&class) {
                    state.classes.push(class);
                }
            }
        }
        element
    }

    /// Convenience for building a shared, type-erased handle.
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Simulate the element being removed from its document. Every later
    /// mutation fails with `ElementError::Detached`; reads keep working.
    pub fn detach(&self) {
        self.state.borrow_mut().detached = true;
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut ElementState) -> R) -> Result<R, ElementError> {
        let mut state = self.state.borrow_mut();
        if state.detached {
            return Err(ElementError::Detached {
                element: self.label.clone(),
            });
        }
        Ok(f(&mut state))
    }

    /// Class tokens must be non-empty and free of whitespace.
    fn check_token(&self, class: &str) -> Result<(), ElementError> {
        if class.is_empty() || class.chars().any(char::is_whitespace) {
            return Err(ElementError::Rejected {
                element: self.label.clone(),
                reason: format!("invalid class token {class:?}"),
            });
        }
        Ok(())
    }
}

impl Element for VirtualElement {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn style(&self, property: StyleProperty) -> Option<String> {
        let state = self.state.borrow();
        match property {
            StyleProperty::TransitionDuration => state.transition_duration.clone(),
            StyleProperty::Transform => state.transform.clone(),
            StyleProperty::Opacity => state.opacity.clone(),
        }
    }

    fn set_style(&self, property: StyleProperty, value: Option<String>) -> Result<(), ElementError> {
        self.mutate(|state| *state.slot(property) = value)
    }

    fn classes(&self) -> Vec<String> {
        self.state.borrow().classes.clone()
    }

    fn add_class(&self, class: &str) -> Result<(), ElementError> {
        self.check_token(class)?;
        self.mutate(|state| {
            if !state.classes.iter().any(|c| c == class) {
                state.classes.push(class.to_string());
            }
        })
    }

    fn remove_class(&self, class: &str) -> Result<(), ElementError> {
        self.check_token(class)?;
        self.mutate(|state| state.classes.retain(|c| c != class))
    }

    fn clear_classes(&self) -> Result<(), ElementError> {
        self.mutate(|state| state.classes.clear())
    }
}

impl fmt::Display for VirtualElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        write!(f, "{} [{}]", self.label, state.classes.join(" "))?;
        for (name, value) in [
            ("transition-duration", &state.transition_duration),
            ("transform", &state.transform),
            ("opacity", &state.opacity),
        ] {
            if let Some(value) = value {
                write!(f, " {name}: {value};")?;
            }
        }
        if state.detached {
            write!(f, " (detached)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_set_semantics() {
        let el = VirtualElement::with_classes("block", ["a", "b", "a"]);
        assert_eq!(el.classes(), vec!["a", "b"]);

        el.add_class("b").unwrap();
        el.add_class("show").unwrap();
        assert_eq!(el.classes(), vec!["a", "b", "show"]);

        el.remove_class("a").unwrap();
        el.remove_class("missing").unwrap();
        assert_eq!(el.classes(), vec!["b", "show"]);
        assert!(el.has_class("show"));

        el.clear_classes().unwrap();
        assert!(el.classes().is_empty());
    }

    #[test]
    fn test_style_overrides() {
        let el = VirtualElement::new("block");
        assert_eq!(el.style(StyleProperty::Transform), None);

        el.set_style(StyleProperty::Transform, Some("scale(2)".into()))
            .unwrap();
        assert_eq!(el.style(StyleProperty::Transform).as_deref(), Some("scale(2)"));
        assert_eq!(el.style(StyleProperty::Opacity), None);

        el.set_style(StyleProperty::Transform, None).unwrap();
        assert_eq!(el.style(StyleProperty::Transform), None);
    }

    #[test]
    fn test_detached_rejects_mutation() {
        let el = VirtualElement::with_classes("gone", ["a"]);
        el.detach();
        assert!(el.to_string().ends_with("(detached)"));

        let err = el.add_class("show").unwrap_err();
        assert_eq!(
            err,
            ElementError::Detached {
                element: "gone".into()
            }
        );
        assert!(el.set_style(StyleProperty::Opacity, None).is_err());
        // reads still work
        assert_eq!(el.classes(), vec!["a"]);
    }

    #[test]
    fn test_invalid_class_tokens_are_rejected() {
        let el = VirtualElement::with_classes("block", ["a"]);
        for bad in ["", "two words", "tab\there"] {
            let err = el.add_class(bad).unwrap_err();
            assert!(matches!(err, ElementError::Rejected { ref element, .. } if element == "block"));
            assert!(el.remove_class(bad).is_err());
        }
        assert_eq!(el.classes(), vec!["a"]);
    }

    #[test]
    fn test_display_summary() {
        let el = VirtualElement::with_classes("moveBlock", ["block"]);
        el.set_style(StyleProperty::TransitionDuration, Some("400ms".into()))
            .unwrap();
        el.set_style(StyleProperty::Transform, Some("translate(100px,20px)".into()))
            .unwrap();
        assert_eq!(
            el.to_string(),
            "moveBlock [block] transition-duration: 400ms; transform: translate(100px,20px);"
        );
    }

    #[test]
    fn test_css_names() {
        let names: Vec<_> = StyleProperty::ALL.iter().map(|p| p.css_name()).collect();
        assert_eq!(names, vec!["transition-duration", "transform", "opacity"]);
    }
}
