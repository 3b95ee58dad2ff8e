//! Prompt construction for assistant replies.

/// Instruction appended to every prompt.
pub const ASSISTANT_PERSONA: &str =
    "Respond as THOR assistant for Guriri Express. Keep short, give actions or confirmations only.";

/// Reply broadcast when the completion backend fails or times out.
pub const FALLBACK_REPLY: &str = "Erro interno: Schumacher não pôde responder no momento.";

/// Build the completion prompt for a chat line.
pub fn build_prompt(room: &str, sender: &str, text: &str) -> String {
    format!("Room: {room}\nSender: {sender}\nMessage: {text}\n\n{ASSISTANT_PERSONA}")
}
