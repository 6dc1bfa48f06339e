use crate::effects::{hsl_to_rgb, AnimateTrigger, RevealDirection, DEFAULT_CHARACTERS};
use crossterm::style::Color;
use serde::{Deserialize, Deserializer};
use std::{collections::BTreeMap, str::FromStr, time::Duration};

/// The attribute that marks an element as a scrambled text.
pub const MARKER_ATTRIBUTE: &str = "decrypted";

const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
const DEFAULT_MAX_ITERATIONS: u32 = 10;
const DEFAULT_VIEW_THRESHOLD: f32 = 0.1;

/// The configuration for a single scrambled text.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScrambleConfig {
    /// The time between ticks, in milliseconds.
    pub tick_interval_ms: u64,

    /// The number of scramble ticks before the text is revealed when not in sequential mode.
    pub max_iterations: u32,

    /// Reveal one character per tick rather than scrambling for a fixed number of ticks.
    pub sequential: bool,

    /// The order in which characters are revealed in sequential mode.
    pub reveal_direction: RevealDirection,

    /// Only use characters that appear in the text itself as substitutes.
    pub use_original_chars_only: bool,

    /// The substitute characters to use.
    pub characters: String,

    /// The events that start the animation.
    pub animate_on: AnimateTrigger,

    /// The visible fraction of the text that fires the view trigger.
    pub view_threshold: f32,

    /// The color of characters that are showing a substitute.
    #[serde(deserialize_with = "deserialize_color")]
    pub encrypted_color: Color,

    /// The color of characters that are showing their original value.
    #[serde(deserialize_with = "deserialize_color")]
    pub revealed_color: Color,
}

impl ScrambleConfig {
    /// Build a configuration out of an element's string attributes.
    ///
    /// Nothing here fails: missing or malformed values silently use their defaults.
    pub fn from_attributes(attributes: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let get = |name: &str| attributes.get(name).map(String::as_str);
        Self {
            tick_interval_ms: get("speed")
                .and_then(parse_positive)
                .unwrap_or(defaults.tick_interval_ms),
            max_iterations: get("max-iterations")
                .and_then(parse_positive)
                .unwrap_or(defaults.max_iterations),
            sequential: get("sequential") == Some("true"),
            reveal_direction: get("reveal-direction")
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.reveal_direction),
            use_original_chars_only: get("use-original-chars-only") == Some("true"),
            characters: get("characters")
                .filter(|value| !value.is_empty())
                .map(ToString::to_string)
                .unwrap_or(defaults.characters),
            animate_on: get("animate-on").and_then(|value| value.parse().ok()).unwrap_or(defaults.animate_on),
            view_threshold: get("threshold")
                .and_then(|value| value.trim().parse::<f32>().ok())
                .filter(|value| (0.0..=1.0).contains(value))
                .unwrap_or(defaults.view_threshold),
            encrypted_color: get("encrypted-color").and_then(parse_color).unwrap_or(defaults.encrypted_color),
            revealed_color: get("revealed-color").and_then(parse_color).unwrap_or(defaults.revealed_color),
        }
    }

    /// Replace out of range values with their defaults.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if self.tick_interval_ms == 0 {
            self.tick_interval_ms = defaults.tick_interval_ms;
        }
        if self.max_iterations == 0 {
            self.max_iterations = defaults.max_iterations;
        }
        if !(0.0..=1.0).contains(&self.view_threshold) {
            self.view_threshold = defaults.view_threshold;
        }
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            sequential: false,
            reveal_direction: RevealDirection::default(),
            use_original_chars_only: false,
            characters: DEFAULT_CHARACTERS.to_string(),
            animate_on: AnimateTrigger::default(),
            view_threshold: DEFAULT_VIEW_THRESHOLD,
            // Matrix green while hidden, warm white ink once revealed
            encrypted_color: hsl_to_rgb(120.0, 85.0, 55.0),
            revealed_color: hsl_to_rgb(40.0, 20.0, 85.0),
        }
    }
}

/// Parse a color, either as `#rrggbb` or as a terminal color name like `red` or `dark_grey`.
pub fn parse_color(input: &str) -> Option<Color> {
    let input = input.trim();
    if let Some(hex) = input.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
        return Some(Color::Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? });
    }
    Color::try_from(input.to_lowercase().as_str()).ok()
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let input = String::deserialize(deserializer)?;
    parse_color(&input).ok_or_else(|| serde::de::Error::custom(format!("invalid color '{input}'")))
}

/// Parse a strictly positive integer, tolerating surrounding whitespace.
fn parse_positive<T>(value: &str) -> Option<T>
where
    T: FromStr + Default + PartialOrd,
{
    value.trim().parse::<T>().ok().filter(|value| *value > T::default())
}
