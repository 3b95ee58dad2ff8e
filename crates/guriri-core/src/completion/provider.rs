//! CompletionProvider trait definition.
//!
//! Uses RPITIT like the repository ports. The HTTP implementation lives in
//! guriri-infra (`OllamaProvider`).

use guriri_types::completion::CompletionRequest;
use guriri_types::error::CompletionError;

/// A backend that turns a prompt into reply text.
pub trait CompletionProvider: Send + Sync + 'static {
    /// Short backend name for logs (e.g. "ollama").
    fn name(&self) -> &str;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Produce a completion. Callers bound this with their own timeout.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send;
}
