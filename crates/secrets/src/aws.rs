//! AWS Secrets Manager implementation of [`SecretStore`].

use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_secretsmanager::Client;

use crate::store::{SecretPayload, SecretStore, StoreError};

/// Secrets Manager client scoped to one region.
pub struct AwsSecretStore {
    client: Client,
}

impl AwsSecretStore {
    /// Build a client from the default AWS configuration chain.
    ///
    /// `region` overrides the region provider chain when set.
    /// `endpoint_url` points the client at a local emulator instead of the
    /// regional endpoint.
    pub async fn connect(region: Option<&str>, endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        if let Some(url) = endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let config = loader.load().await;

        tracing::debug!(
            region = config.region().map(|r| r.as_ref()).unwrap_or("<unset>"),
            "Secrets Manager client configured",
        );

        Self {
            client: Client::new(&config),
        }
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl SecretStore for AwsSecretStore {
    async fn get_secret_value(&self, secret_id: &str) -> Result<SecretPayload, StoreError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|err| match err.code() {
                Some(code) => StoreError::service(code, err.message().unwrap_or_default()),
                None => StoreError::transport(DisplayErrorContext(&err).to_string()),
            })?;

        if let Some(text) = output.secret_string() {
            return Ok(SecretPayload::Text(text.to_string()));
        }
        if let Some(blob) = output.secret_binary() {
            return Ok(SecretPayload::Binary(blob.as_ref().to_vec()));
        }
        Ok(SecretPayload::Empty)
    }
}
