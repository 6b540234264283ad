//! Typewriter text effect.
//!
//! Types the text of a widget one character at a time with a cursor element
//! after it, optionally restarting after a pause.

mod component;
pub mod state;

pub use component::{CURSOR_CLASS, TypewriterInstance, TypewriterText, bind_typewriter};
pub use state::{Typewriter, TypingSettings};
