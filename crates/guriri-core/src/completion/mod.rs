//! Text-completion port used for assistant replies.

pub mod provider;
