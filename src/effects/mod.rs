mod charset;
mod common;
mod decrypt;
mod direction;
mod trigger;

pub use charset::DEFAULT_CHARACTERS;
pub use common::{CharCell, CharState};
pub(crate) use common::hsl_to_rgb;
pub use decrypt::DecryptedText;
pub use direction::RevealDirection;
pub use trigger::AnimateTrigger;
