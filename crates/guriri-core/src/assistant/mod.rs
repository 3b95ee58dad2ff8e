//! Assistant ("THOR") mode switch, in-band command grammar, and prompt text.

pub mod command;
pub mod gate;
pub mod prompt;
