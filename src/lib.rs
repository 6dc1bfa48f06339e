//! A "decrypting text" effect: texts scramble into random characters and then resolve back into
//! their original content, either one character at a time or after a fixed number of scrambles.
//!
//! The engine is independent of any clock or output device. Animations are ticked through a
//! [Scheduler] and draw their substitutes from a [RandomSource], which makes every frame
//! reproducible in tests.

pub mod bind;
pub mod config;
pub mod effects;
pub mod random;
pub mod render;
pub mod scheduler;

pub use bind::{auto_bind, BindError, BoundElement, Page, PageElement};
pub use config::ScrambleConfig;
pub use effects::{AnimateTrigger, CharCell, CharState, DecryptedText, RevealDirection};
pub use random::{FastRandom, RandomSource, ScriptedRandom};
pub use render::TerminalRenderer;
pub use scheduler::{CancelToken, ClockScheduler, ManualScheduler, Scheduler};
