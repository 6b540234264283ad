//! Text effect components.

pub mod spoiler;
pub mod typewriter;
