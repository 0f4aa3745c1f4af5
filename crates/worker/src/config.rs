/// Environment variable naming the Secrets Manager secret.
pub const SECRET_NAME_VAR: &str = "secretname";

/// Environment variable naming the AWS region of the secret.
pub const REGION_VAR: &str = "Region";

/// Optional Secrets Manager endpoint override (local emulators).
pub const SECRETS_ENDPOINT_VAR: &str = "SECRETS_ENDPOINT_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Secret Name can't be null.")]
    MissingSecretName,
}

/// Job configuration loaded from environment variables.
///
/// | Env Var                | Required | Default                        |
/// |------------------------|----------|--------------------------------|
/// | `secretname`           | yes      | --                             |
/// | `Region`               | no       | AWS region provider chain      |
/// | `SECRETS_ENDPOINT_URL` | no       | regional Secrets Manager URL   |
///
/// Blank values are treated as unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub secret_name: String,
    pub region: Option<String>,
    pub secrets_endpoint_url: Option<String>,
}

impl JobConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret_name = non_blank(SECRET_NAME_VAR).ok_or(ConfigError::MissingSecretName)?;

        Ok(Self {
            secret_name,
            region: non_blank(REGION_VAR),
            secrets_endpoint_url: non_blank(SECRETS_ENDPOINT_VAR),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_secret_name_and_region() {
        let config =
            JobConfig::from_lookup(lookup(&[("secretname", "prod/db"), ("Region", "eu-west-1")]))
                .unwrap();
        assert_eq!(config.secret_name, "prod/db");
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.secrets_endpoint_url, None);
    }

    #[test]
    fn missing_secret_name_is_an_error() {
        let result = JobConfig::from_lookup(lookup(&[("Region", "eu-west-1")]));
        assert_matches!(result, Err(ConfigError::MissingSecretName));
    }

    #[test]
    fn blank_secret_name_is_an_error() {
        let result = JobConfig::from_lookup(lookup(&[("secretname", "  ")]));
        assert_matches!(result, Err(ConfigError::MissingSecretName));
    }

    #[test]
    fn variable_names_are_case_sensitive() {
        let result = JobConfig::from_lookup(lookup(&[("SECRETNAME", "prod/db")]));
        assert_matches!(result, Err(ConfigError::MissingSecretName));
    }

    #[test]
    fn region_and_endpoint_are_optional() {
        let config = JobConfig::from_lookup(lookup(&[
            ("secretname", "prod/db"),
            ("Region", ""),
            ("SECRETS_ENDPOINT_URL", "http://localhost:4566"),
        ]))
        .unwrap();
        assert_eq!(config.region, None);
        assert_eq!(
            config.secrets_endpoint_url.as_deref(),
            Some("http://localhost:4566")
        );
    }

    #[test]
    fn missing_secret_name_message() {
        assert_eq!(
            ConfigError::MissingSecretName.to_string(),
            "Secret Name can't be null."
        );
    }
}
