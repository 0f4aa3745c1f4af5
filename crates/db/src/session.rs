//! Connection lifecycle abstraction.

use std::fmt;
use std::future::Future;

use sqlx::postgres::PgConnectOptions;

use pgcall_core::credentials::CredentialBundle;
use pgcall_core::procedure::ProcedureCall;

use crate::error::DbError;
use crate::row::RowSink;

/// Everything needed to open one database session.
///
/// `Debug` output never includes the password.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub dbname: String,
}

impl From<&CredentialBundle> for ConnectParams {
    fn from(bundle: &CredentialBundle) -> Self {
        Self {
            host: bundle.host.clone(),
            port: bundle.port_or_default(),
            username: bundle.username.clone(),
            password: bundle.password.clone(),
            dbname: bundle.dbname.clone(),
        }
    }
}

impl ConnectParams {
    /// sqlx connect options for these parameters.
    ///
    /// Settings not covered here (`sslmode`, `application_name`, ...) keep
    /// the defaults sqlx derives from the `PG*` environment variables.
    pub fn to_pg_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.dbname)
    }
}

impl fmt::Debug for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .finish()
    }
}

/// An open database session that can run procedure calls.
pub trait ProcedureSession: Send + Sized {
    /// Invoke `call` and hand each result row to `sink` as it arrives.
    ///
    /// Returns the number of rows delivered.
    fn call_procedure<K: RowSink>(
        &mut self,
        call: &ProcedureCall,
        sink: &mut K,
    ) -> impl Future<Output = Result<u64, DbError>> + Send;

    /// Terminate the session.
    fn close(self) -> impl Future<Output = Result<(), DbError>> + Send;
}

/// Opens [`ProcedureSession`]s.
pub trait Connector: Send + Sync {
    type Session: ProcedureSession;

    fn connect(
        &self,
        params: &ConnectParams,
    ) -> impl Future<Output = Result<Self::Session, DbError>> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
