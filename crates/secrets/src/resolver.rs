//! Credential lookup on top of a [`SecretStore`].
//!
//! Failure handling follows three tiers:
//!
//! - the five [`SecretErrorCode`] service errors and transport failures are
//!   returned to the caller with the original [`StoreError`] attached;
//! - any other service error code is logged and the resolver yields
//!   `Ok(None)`, leaving the caller without credentials;
//! - binary, empty, or malformed payloads fail with a descriptive error.

use pgcall_core::credentials::CredentialBundle;

use crate::error::{SecretError, SecretErrorCode};
use crate::store::{SecretPayload, SecretStore, StoreError};

pub struct SecretResolver<S> {
    store: S,
}

impl<S: SecretStore> SecretResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetch and decode the credential bundle stored under `secret_id`.
    ///
    /// A blank `secret_id` is rejected before the store is contacted.
    pub async fn resolve(&self, secret_id: &str) -> Result<Option<CredentialBundle>, SecretError> {
        if secret_id.trim().is_empty() {
            return Err(SecretError::MissingSecretName);
        }

        tracing::info!(secret_id, "Fetching database credentials");

        let payload = match self.store.get_secret_value(secret_id).await {
            Ok(payload) => payload,
            Err(err) => return classify_store_error(secret_id, err),
        };

        match payload {
            SecretPayload::Text(text) => CredentialBundle::from_secret_string(&text)
                .map(Some)
                .map_err(|source| SecretError::Decode {
                    secret_id: secret_id.to_string(),
                    source,
                }),
            SecretPayload::Binary(bytes) => Err(SecretError::BinaryPayload {
                secret_id: secret_id.to_string(),
                len: bytes.len(),
            }),
            SecretPayload::Empty => Err(SecretError::EmptyPayload {
                secret_id: secret_id.to_string(),
            }),
        }
    }
}

fn classify_store_error(
    secret_id: &str,
    err: StoreError,
) -> Result<Option<CredentialBundle>, SecretError> {
    let Some(code) = err.code.as_deref() else {
        return Err(SecretError::Transport {
            secret_id: secret_id.to_string(),
            source: err,
        });
    };

    match SecretErrorCode::from_code(code) {
        Some(code) => Err(SecretError::Service {
            secret_id: secret_id.to_string(),
            code,
            source: err,
        }),
        None => {
            tracing::error!(
                secret_id,
                error = %err,
                "Error while getting values from secret manager",
            );
            Ok(None)
        }
    }
}
