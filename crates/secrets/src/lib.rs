//! Secret Resolver: fetches database credentials from AWS Secrets Manager.
//!
//! [`SecretStore`] is the seam between the resolver and the remote service.
//! [`AwsSecretStore`] is the production implementation; tests supply their
//! own.

pub mod aws;
pub mod error;
pub mod resolver;
pub mod store;

pub use aws::AwsSecretStore;
pub use error::{SecretError, SecretErrorCode};
pub use resolver::SecretResolver;
pub use store::{SecretPayload, SecretStore, StoreError};
