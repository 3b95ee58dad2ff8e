//! In-band `/thor on|off` command parsing.

/// A recognized assistant-mode command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantCommand {
    On,
    Off,
}

impl AssistantCommand {
    /// Parse chat text into a command.
    ///
    /// Matching is case-insensitive after trimming. The first token must be
    /// exactly `/thor` and the second `on` or `off`; trailing tokens are
    /// ignored. Anything else is ordinary chat and returns `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = text.trim().to_lowercase();
        let mut tokens = normalized.split_whitespace();
        if tokens.next()? != "/thor" {
            return None;
        }
        match tokens.next()? {
            "on" => Some(AssistantCommand::On),
            "off" => Some(AssistantCommand::Off),
            _ => None,
        }
    }

    /// The mode this command requests.
    pub fn activates(self) -> bool {
        matches!(self, AssistantCommand::On)
    }
}
