//! `pgcall-worker` -- one-shot stored procedure job.
//!
//! Looks up PostgreSQL credentials in AWS Secrets Manager, calls
//! `concat_lower_or_upper('hello', 'world', 'true')`, prints every result
//! row to stdout, and closes the connection.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default | Description                          |
//! |------------------------|----------|---------|--------------------------------------|
//! | `secretname`           | yes      | --      | Secrets Manager secret id or ARN     |
//! | `Region`               | no       | AWS provider chain | Region of the secret      |
//! | `SECRETS_ENDPOINT_URL` | no       | --      | Endpoint override for local emulators |
//! | `RUST_LOG`             | no       | `pgcall_worker=info,...` | Log filter          |
//!
//! A missing `secretname` is logged and the process exits 0 without
//! contacting AWS. Database failures are logged and the process still
//! exits 0. A named Secrets Manager error or unresolved credentials exit 1.

use pgcall_db::PgConnector;
use pgcall_secrets::AwsSecretStore;
use pgcall_worker::config::JobConfig;
use pgcall_worker::job::{CallOutcome, JobExecutor};
use pgcall_worker::output::WriterSink;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pgcall_worker=info,pgcall_secrets=info,pgcall_db=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match JobConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return;
        }
    };

    tracing::info!(
        secret_name = %config.secret_name,
        region = config.region.as_deref().unwrap_or("<default>"),
        "Starting pgcall-worker",
    );

    let store = AwsSecretStore::connect(
        config.region.as_deref(),
        config.secrets_endpoint_url.as_deref(),
    )
    .await;
    let executor = JobExecutor::new(store, PgConnector).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Job aborted");
        std::process::exit(1);
    });
    let mut sink = WriterSink::stdout();

    match executor.run(&config.secret_name, &mut sink).await {
        Ok(report) => {
            tracing::info!(
                rows = report.rows,
                completed = report.outcome == CallOutcome::Completed,
                connection_closed = report.connection_closed,
                "Job finished",
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Job aborted");
            std::process::exit(1);
        }
    }
}
