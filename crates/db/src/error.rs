#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Failed to connect to {host}:{port}/{dbname}: {source}")]
    Connect {
        host: String,
        port: u16,
        dbname: String,
        #[source]
        source: sqlx::Error,
    },

    /// The call itself or fetching one of its rows failed.
    #[error("Call to procedure '{name}' failed: {source}")]
    Procedure {
        name: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to close connection: {0}")]
    Close(#[source] sqlx::Error),
}
