use std::fmt;

use pgcall_core::error::CoreError;

use crate::store::StoreError;

/// Service error codes the resolver propagates to its caller.
///
/// Any other code is logged and swallowed by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretErrorCode {
    /// The secret could not be decrypted with its KMS key.
    DecryptionFailure,
    /// Server-side failure in Secrets Manager.
    InternalServiceError,
    /// A request parameter has an invalid value.
    InvalidParameter,
    /// A parameter is invalid for the current state of the secret.
    InvalidRequest,
    /// No secret with the requested identifier exists.
    ResourceNotFound,
}

impl SecretErrorCode {
    pub const ALL: [SecretErrorCode; 5] = [
        Self::DecryptionFailure,
        Self::InternalServiceError,
        Self::InvalidParameter,
        Self::InvalidRequest,
        Self::ResourceNotFound,
    ];

    /// Match a service error code string.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DecryptionFailure => "DecryptionFailureException",
            Self::InternalServiceError => "InternalServiceErrorException",
            Self::InvalidParameter => "InvalidParameterException",
            Self::InvalidRequest => "InvalidRequestException",
            Self::ResourceNotFound => "ResourceNotFoundException",
        }
    }
}

impl fmt::Display for SecretErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("Secret name can't be empty")]
    MissingSecretName,

    /// One of the [`SecretErrorCode`] failures, with the store error as-is.
    #[error("Secrets Manager rejected '{secret_id}': {source}")]
    Service {
        secret_id: String,
        code: SecretErrorCode,
        #[source]
        source: StoreError,
    },

    /// The request never reached a service response.
    #[error("Secrets Manager request for '{secret_id}' failed: {source}")]
    Transport {
        secret_id: String,
        #[source]
        source: StoreError,
    },

    #[error(
        "Secret '{secret_id}' only holds a binary payload ({len} bytes); \
         credentials must be stored as a JSON SecretString"
    )]
    BinaryPayload { secret_id: String, len: usize },

    #[error("Secret '{secret_id}' has neither a SecretString nor a SecretBinary value")]
    EmptyPayload { secret_id: String },

    #[error("Secret '{secret_id}' is not a valid credential bundle: {source}")]
    Decode {
        secret_id: String,
        #[source]
        source: CoreError,
    },
}

impl SecretError {
    /// The untouched store error for service and transport failures.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Service { source, .. } | Self::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
