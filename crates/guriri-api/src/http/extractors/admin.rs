//! Admin credential extractor.
//!
//! Reads the credential from:
//! - `X-Admin-Token: <token>` header
//! - `?admin_token=<token>` query parameter
//!
//! A blank header falls through to the query parameter. Whether the
//! credential is valid is decided by the assistant gate.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use crate::http::error::AppError;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// The credential presented with the request, if any.
#[derive(Debug, Clone, Default)]
pub struct AdminCredential(pub Option<String>);

impl AdminCredential {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[derive(Deserialize)]
struct TokenQuery {
    admin_token: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for AdminCredential {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(value) = parts.headers.get(ADMIN_TOKEN_HEADER) {
            let token = value.to_str().map_err(|_| {
                AppError::Unauthorized("Invalid X-Admin-Token header encoding".to_string())
            })?;
            let token = token.trim();
            if !token.is_empty() {
                return Ok(AdminCredential(Some(token.to_string())));
            }
        }

        let from_query = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.admin_token);
        Ok(AdminCredential(from_query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Option<String> {
        let (mut parts, _) = request.into_parts();
        AdminCredential::from_request_parts(&mut parts, &())
            .await
            .unwrap()
            .0
    }

    #[tokio::test]
    async fn test_blank_header_falls_back_to_query() {
        let request = Request::builder()
            .uri("/admin/assistant-mode?action=on&admin_token=from-query")
            .header("X-Admin-Token", "   ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_deref(), Some("from-query"));
    }

    #[tokio::test]
    async fn test_header_wins_over_query() {
        let request = Request::builder()
            .uri("/admin/assistant-mode?action=on&admin_token=from-query")
            .header("X-Admin-Token", " from-header ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_deref(), Some("from-header"));
    }

    #[tokio::test]
    async fn test_falls_back_to_query_parameter() {
        let request = Request::builder()
            .uri("/admin/assistant-mode?action=off&admin_token=abc")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_absent_credential_is_none() {
        let request = Request::builder()
            .uri("/admin/assistant-mode?action=on")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, None);
    }
}
