//! "Invisible ink" spoiler effect.
//!
//! Obscures a line of text with a drifting cloud of tiny particles, confined
//! to a feathered rounded rectangle around the laid-out text box:
//! - Particle placement by rejection sampling against a signed distance field
//! - Curl-noise drift with an irregular, jittered edge fade
//! - Local reveal around the pointer or finger, whole-text reveal on click
//! - Pre-rasterized sprites blitted on the device pixel grid
//!
//! Everything below `component`/`dom` is plain Rust and talks to the page only
//! through the traits in [`host`].
//!
//! # Example
//!
//! ```ignore
//! use styled_text::{SpoilerSettings, SpoilerText};
//!
//! view! { <SpoilerText text="Rosebud was the sled" settings=SpoilerSettings::default() /> }
//! ```

pub mod color;
mod component;
mod dom;
pub mod field;
pub mod geometry;
pub mod host;
pub mod interaction;
pub mod settings;
pub mod simulation;
pub mod sprite;
pub mod state;
pub mod tuning;

pub use component::{INNER_SELECTOR, SpoilerInstance, SpoilerText, bind_spoiler};
pub use dom::{CANVAS_CLASS, REVEALED_CLASS};
pub use settings::{DesktopTrigger, MobileTrigger, SpoilerSettings};
pub use state::SimulationState;
pub use tuning::SpoilerTuning;
