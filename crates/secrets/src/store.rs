//! Secret store abstraction.

use std::future::Future;

/// Value half of a `GetSecretValue` response.
///
/// Secrets Manager populates exactly one of `SecretString` or
/// `SecretBinary`; `Empty` covers a response carrying neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretPayload {
    Text(String),
    Binary(Vec<u8>),
    Empty,
}

/// A request the secret store refused or could not complete.
///
/// `code` is the service error code (`ResourceNotFoundException`, ...) and
/// is `None` when the request never produced a service response (DNS,
/// TLS, timeouts, missing AWS credentials).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {message}", code.as_deref().unwrap_or("NoServiceResponse"))]
pub struct StoreError {
    pub code: Option<String>,
    pub message: String,
}

impl StoreError {
    /// An error carrying a service error code.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// An error raised before any service response was received.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

/// Read access to a remote secret store.
pub trait SecretStore: Send + Sync {
    /// Fetch the current value of `secret_id`.
    fn get_secret_value(
        &self,
        secret_id: &str,
    ) -> impl Future<Output = Result<SecretPayload, StoreError>> + Send;
}
