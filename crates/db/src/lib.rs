//! PostgreSQL access for the procedure job.
//!
//! [`Connector`] and [`ProcedureSession`] describe the single-connection
//! lifecycle the job needs (open, call, close). [`PgConnector`] implements
//! them on a plain `sqlx::PgConnection`; there is no pool.

pub mod error;
pub mod postgres;
pub mod row;
pub mod session;

pub use error::DbError;
pub use postgres::{PgConnector, PgSession};
pub use row::{CellValue, ResultRow, RowSink};
pub use session::{ConnectParams, Connector, ProcedureSession};
