//! sqlx-backed [`Connector`] and [`ProcedureSession`].

use futures::TryStreamExt;
use sqlx::{Connection, PgConnection};

use pgcall_core::procedure::ProcedureCall;

use crate::error::DbError;
use crate::row::{ResultRow, RowSink};
use crate::session::{ConnectParams, Connector, ProcedureSession};

/// Opens one direct PostgreSQL connection per [`Connector::connect`] call.
#[derive(Debug, Default, Clone, Copy)]
pub struct PgConnector;

impl Connector for PgConnector {
    type Session = PgSession;

    async fn connect(&self, params: &ConnectParams) -> Result<PgSession, DbError> {
        tracing::info!(
            host = %params.host,
            port = params.port,
            dbname = %params.dbname,
            username = %params.username,
            "Connecting to PostgreSQL",
        );

        let options = params.to_pg_options();
        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(|source| DbError::Connect {
                host: params.host.clone(),
                port: params.port,
                dbname: params.dbname.clone(),
                source,
            })?;

        Ok(PgSession::new(conn))
    }
}

/// A single open PostgreSQL connection.
pub struct PgSession {
    conn: PgConnection,
}

impl PgSession {
    pub fn new(conn: PgConnection) -> Self {
        Self { conn }
    }
}

impl ProcedureSession for PgSession {
    async fn call_procedure<K: RowSink>(
        &mut self,
        call: &ProcedureCall,
        sink: &mut K,
    ) -> Result<u64, DbError> {
        let sql = call.to_sql();
        tracing::debug!(sql = %sql, "Invoking procedure");

        let procedure_error = |source: sqlx::Error| DbError::Procedure {
            name: call.name().to_string(),
            source,
        };

        let mut rows = sqlx::query(&sql).fetch(&mut self.conn);
        let mut delivered = 0;
        while let Some(row) = rows.try_next().await.map_err(procedure_error)? {
            sink.write_row(&ResultRow::from_pg_row(&row));
            delivered += 1;
        }

        Ok(delivered)
    }

    async fn close(self) -> Result<(), DbError> {
        self.conn.close().await.map_err(DbError::Close)
    }
}
