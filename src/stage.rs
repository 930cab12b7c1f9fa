//! Event wiring for the demo: named triggers mapped onto recipe calls.
//!
//! Each recipe plays on its own block element. Stop/reset triggers act on the
//! most recent handle of their recipe and do nothing before it was started.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::str::FromStr;

use animaster_config::RecipeDurations;
use animaster_core::{ElementRef, PlaybackHandle, Sequencer, TimerQueue, VirtualElement};
use anyhow::{Result, bail};

/// Something the outside world can ask the stage to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    FadeIn,
    FadeOut,
    Move,
    Scale,
    ShowAndHide,
    MoveAndHide,
    MoveAndHideReset,
    HeartBeating,
    HeartBeatingStop,
}

impl Trigger {
    pub const ALL: [Trigger; 9] = [
        Self::FadeIn,
        Self::FadeOut,
        Self::Move,
        Self::Scale,
        Self::ShowAndHide,
        Self::MoveAndHide,
        Self::MoveAndHideReset,
        Self::HeartBeating,
        Self::HeartBeatingStop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::FadeIn => "fade-in",
            Self::FadeOut => "fade-out",
            Self::Move => "move",
            Self::Scale => "scale",
            Self::ShowAndHide => "show-and-hide",
            Self::MoveAndHide => "move-and-hide",
            Self::MoveAndHideReset => "move-and-hide-reset",
            Self::HeartBeating => "heart-beating",
            Self::HeartBeatingStop => "heart-beating-stop",
        }
    }

    /// Label of the block element this trigger acts on.
    pub fn target(&self) -> &'static str {
        match self {
            Self::FadeIn | Self::FadeOut => "fade-block",
            Self::Move => "move-block",
            Self::Scale => "scale-block",
            Self::ShowAndHide => "show-and-hide-block",
            Self::MoveAndHide | Self::MoveAndHideReset => "move-and-hide-block",
            Self::HeartBeating | Self::HeartBeatingStop => "heart-beating-block",
        }
    }
}

impl FromStr for Trigger {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match Self::ALL.iter().find(|t| t.name() == s) {
            Some(trigger) => Ok(*trigger),
            None => bail!(
                "unknown trigger `{s}`, expected one of: {}",
                Self::ALL.map(|t| t.name()).join(", ")
            ),
        }
    }
}

/// Block elements plus the handles the stop/reset triggers need.
pub struct Stage {
    sequencer: Sequencer,
    durations: RecipeDurations,
    blocks: BTreeMap<&'static str, Rc<VirtualElement>>,
    move_and_hide: Option<PlaybackHandle>,
    heart_beating: Option<PlaybackHandle>,
}

impl Stage {
    pub fn new(queue: &TimerQueue, durations: RecipeDurations) -> Self {
        let mut blocks = BTreeMap::new();
        for trigger in Trigger::ALL {
            let label = trigger.target();
            blocks.entry(label).or_insert_with(|| {
                let classes: &[&str] = match trigger {
                    Trigger::FadeIn | Trigger::FadeOut | Trigger::ShowAndHide => {
                        &["block", "hide"]
                    }
                    _ => &["block"],
                };
                VirtualElement::with_classes(label, classes.iter().copied()).shared()
            });
        }

        Self {
            sequencer: Sequencer::new(Rc::new(queue.clone())),
            durations,
            blocks,
            move_and_hide: None,
            heart_beating: None,
        }
    }

    fn element(&self, trigger: Trigger) -> Option<ElementRef> {
        let block = self.blocks.get(trigger.target())?;
        let element: ElementRef = block.clone();
        Some(element)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &VirtualElement> {
        self.blocks.values().map(|b| b.as_ref())
    }

    pub fn fire(&mut self, trigger: Trigger) {
        let Some(el) = self.element(trigger) else {
            log::warn!("no block for trigger {}", trigger.name());
            return;
        };
        log::info!("trigger {} on {}", trigger.name(), trigger.target());

        let d = &self.durations;
        let seq = &self.sequencer;
        match trigger {
            Trigger::FadeIn => {
                seq.fade_in(&el, d.fade_ms);
            }
            Trigger::FadeOut => {
                seq.fade_out(&el, d.fade_ms);
            }
            Trigger::Move => {
                seq.move_by(&el, d.move_ms, (d.move_x, d.move_y));
            }
            Trigger::Scale => {
                seq.scale(&el, d.scale_ms, d.scale_ratio);
            }
            Trigger::ShowAndHide => {
                seq.show_and_hide(&el, d.show_and_hide_ms);
            }
            Trigger::MoveAndHide => {
                self.move_and_hide = Some(seq.move_and_hide(&el, d.move_and_hide_ms));
            }
            Trigger::MoveAndHideReset => {
                if let Some(handle) = &self.move_and_hide {
                    handle.reset();
                }
            }
            Trigger::HeartBeating => {
                self.heart_beating = Some(seq.heart_beating(&el));
            }
            Trigger::HeartBeatingStop => {
                if let Some(handle) = &self.heart_beating {
                    handle.stop();
                }
            }
        }
    }
}
