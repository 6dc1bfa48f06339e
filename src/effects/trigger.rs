use serde::Deserialize;
use strum::EnumString;

/// The events that start an animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnimateTrigger {
    /// Start when the pointer enters the text, reveal everything when it leaves.
    #[default]
    Hover,

    /// Start the first time the text becomes visible.
    View,

    /// Both of the above.
    Both,
}

impl AnimateTrigger {
    pub fn on_hover(&self) -> bool {
        matches!(self, Self::Hover | Self::Both)
    }

    pub fn on_view(&self) -> bool {
        matches!(self, Self::View | Self::Both)
    }
}

/// A one-shot visibility trigger.
///
/// This fires the first time the visible fraction of a text reaches a threshold and never again.
#[derive(Clone, Debug)]
pub(crate) struct ViewTrigger {
    threshold: f32,
    fired: bool,
}

impl ViewTrigger {
    pub(crate) fn new(threshold: f32) -> Self {
        Self { threshold, fired: false }
    }

    /// Report the currently visible fraction, returning whether the trigger fires now.
    pub(crate) fn observe(&mut self, visible_ratio: f32) -> bool {
        if self.fired || !(visible_ratio > 0.0 && visible_ratio >= self.threshold) {
            return false;
        }
        self.fired = true;
        true
    }

    pub(crate) fn has_fired(&self) -> bool {
        self.fired
    }
}
