//! Database credential bundle decoded from a secret payload.
//!
//! Secrets Manager stores RDS credentials as a JSON object in the
//! `SecretString` field. The four connection fields are required; RDS-managed
//! secrets also carry `port` and `engine`, and anything else is kept in
//! [`CredentialBundle::extra`] untouched.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::CoreError;

/// PostgreSQL port used when the secret does not name one.
pub const DEFAULT_PORT: u16 = 5432;

/// Connection parameters for a single database session.
///
/// `Debug` output never includes the password.
#[derive(Clone, PartialEq, Deserialize)]
pub struct CredentialBundle {
    pub host: String,
    pub username: String,
    pub password: String,
    pub dbname: String,
    /// RDS writes this as a number; hand-made secrets often use a string.
    #[serde(default, deserialize_with = "deserialize_port")]
    pub port: Option<u16>,
    #[serde(default)]
    pub engine: Option<String>,
    /// Keys not modelled above (`dbInstanceIdentifier`, etc.).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CredentialBundle {
    /// Decode a `SecretString` payload.
    pub fn from_secret_string(payload: &str) -> Result<Self, CoreError> {
        let bundle: Self = serde_json::from_str(payload)?;
        Ok(bundle)
    }

    /// The port to connect to, falling back to [`DEFAULT_PORT`].
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .field("port", &self.port)
            .field("engine", &self.engine)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortRepr {
        Number(u16),
        Text(String),
    }

    match Option::<PortRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PortRepr::Number(port)) => Ok(Some(port)),
        Some(PortRepr::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(PortRepr::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid port '{text}'"))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn decodes_the_four_connection_fields() {
        let bundle = CredentialBundle::from_secret_string(
            r#"{"host":"x","username":"y","password":"z","dbname":"w"}"#,
        )
        .unwrap();

        assert_eq!(bundle.host, "x");
        assert_eq!(bundle.username, "y");
        assert_eq!(bundle.password, "z");
        assert_eq!(bundle.dbname, "w");
        assert_eq!(bundle.port, None);
        assert_eq!(bundle.engine, None);
        assert!(bundle.extra.is_empty());
    }

    #[test]
    fn decodes_rds_managed_secret() {
        let bundle = CredentialBundle::from_secret_string(
            r#"{
                "username": "postgres",
                "password": "s3cr3t",
                "engine": "postgres",
                "host": "db.cluster.eu-west-1.rds.amazonaws.com",
                "port": 6543,
                "dbname": "app",
                "dbInstanceIdentifier": "app-db"
            }"#,
        )
        .unwrap();

        assert_eq!(bundle.port, Some(6543));
        assert_eq!(bundle.port_or_default(), 6543);
        assert_eq!(bundle.engine.as_deref(), Some("postgres"));
        assert_eq!(bundle.extra["dbInstanceIdentifier"], "app-db");
    }

    #[test]
    fn port_accepts_numeric_string() {
        let bundle = CredentialBundle::from_secret_string(
            r#"{"host":"h","username":"u","password":"p","dbname":"d","port":"5433"}"#,
        )
        .unwrap();
        assert_eq!(bundle.port, Some(5433));
    }

    #[test]
    fn missing_port_uses_default() {
        let bundle = CredentialBundle::from_secret_string(
            r#"{"host":"h","username":"u","password":"p","dbname":"d","port":null}"#,
        )
        .unwrap();
        assert_eq!(bundle.port_or_default(), DEFAULT_PORT);
    }

    #[test]
    fn rejects_non_numeric_port() {
        let result = CredentialBundle::from_secret_string(
            r#"{"host":"h","username":"u","password":"p","dbname":"d","port":"five"}"#,
        );
        assert_matches!(result, Err(CoreError::Decode(_)));
    }

    #[test]
    fn rejects_missing_required_field() {
        let err = CredentialBundle::from_secret_string(r#"{"host":"h","username":"u"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn rejects_non_object_payload() {
        let result = CredentialBundle::from_secret_string("plain-text-password");
        assert_matches!(result, Err(CoreError::Decode(_)));
    }

    #[test]
    fn debug_redacts_password() {
        let bundle = CredentialBundle::from_secret_string(
            r#"{"host":"h","username":"u","password":"hunter2","dbname":"d"}"#,
        )
        .unwrap();
        let rendered = format!("{bundle:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
