//! Job Executor: resolve credentials, call the procedure, release the
//! connection.
//!
//! Secret-store failures abort the run and reach the caller. Database
//! failures (connect, call, fetch) are logged and folded into the
//! [`JobReport`]; the run itself still succeeds. The connection is closed
//! only if it was opened.

use pgcall_core::error::CoreError;
use pgcall_core::procedure::ProcedureCall;
use pgcall_db::{ConnectParams, Connector, ProcedureSession, ResultRow, RowSink};
use pgcall_secrets::{SecretError, SecretResolver, SecretStore};

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Secret(#[from] SecretError),

    /// The resolver swallowed an unrecognized store error and produced no
    /// credentials.
    #[error("No database credentials were resolved from secret '{secret_id}'")]
    CredentialsUnresolved { secret_id: String },

    #[error("Invalid procedure call: {0}")]
    InvalidCall(#[from] CoreError),
}

/// How the database part of the run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Completed,
    /// Connect, call, or fetch failed; holds the logged error message.
    Failed(String),
}

/// Summary of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    /// Rows delivered to the sink, including any before a fetch failure.
    pub rows: u64,
    pub outcome: CallOutcome,
    /// `true` only when a connection was opened and then closed cleanly.
    pub connection_closed: bool,
}

pub struct JobExecutor<S, C> {
    resolver: SecretResolver<S>,
    connector: C,
    call: ProcedureCall,
}

impl<S: SecretStore, C: Connector> JobExecutor<S, C> {
    /// An executor that invokes `concat_lower_or_upper('hello', 'world', 'true')`.
    pub fn new(store: S, connector: C) -> Result<Self, JobError> {
        Ok(Self {
            resolver: SecretResolver::new(store),
            connector,
            call: ProcedureCall::concat_lower_or_upper()?,
        })
    }

    pub fn call(&self) -> &ProcedureCall {
        &self.call
    }

    /// Run the job once, streaming result rows into `sink`.
    pub async fn run<K: RowSink>(
        &self,
        secret_id: &str,
        sink: &mut K,
    ) -> Result<JobReport, JobError> {
        let bundle = self
            .resolver
            .resolve(secret_id)
            .await?
            .ok_or_else(|| JobError::CredentialsUnresolved {
                secret_id: secret_id.to_string(),
            })?;

        let params = ConnectParams::from(&bundle);
        Ok(self.call_and_release(&params, sink).await)
    }

    async fn call_and_release<K: RowSink>(
        &self,
        params: &ConnectParams,
        sink: &mut K,
    ) -> JobReport {
        let mut session = match self.connector.connect(params).await {
            Ok(session) => session,
            Err(err) => {
                tracing::error!(error = %err, "Error while connecting to PostgreSQL");
                return JobReport {
                    rows: 0,
                    outcome: CallOutcome::Failed(err.to_string()),
                    connection_closed: false,
                };
            }
        };

        tracing::info!(procedure = self.call.name(), "Calling postgresql function");

        let mut counting = CountingSink {
            inner: sink,
            rows: 0,
        };
        let outcome = match session.call_procedure(&self.call, &mut counting).await {
            Ok(_) => CallOutcome::Completed,
            Err(err) => {
                tracing::error!(error = %err, "Error while connecting to PostgreSQL");
                CallOutcome::Failed(err.to_string())
            }
        };
        let rows = counting.rows;

        let connection_closed = match session.close().await {
            Ok(()) => {
                tracing::info!("PostgreSQL connection is closed");
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to close PostgreSQL connection");
                false
            }
        };

        JobReport {
            rows,
            outcome,
            connection_closed,
        }
    }
}

/// Forwards rows and counts them, so rows delivered before a fetch
/// failure are still reported.
struct CountingSink<'a, K> {
    inner: &'a mut K,
    rows: u64,
}

impl<K: RowSink> RowSink for CountingSink<'_, K> {
    fn write_row(&mut self, row: &ResultRow) {
        self.inner.write_row(row);
        self.rows += 1;
    }
}
