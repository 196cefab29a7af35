use lambda_http::{Error, run, service_fn};
use tracing_subscriber::EnvFilter;

use projects_core::ProjectStore;

mod errors;
mod ids;
mod response;
mod routes;

use routes::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let table_name =
        std::env::var("PROJECTS_TABLE").map_err(|_| Error::from("PROJECTS_TABLE not set"))?;

    // One store handle for the process lifetime, reused across invocations.
    let store = ProjectStore::new(table_name).await;

    run(service_fn(|event| function_handler(&store, event))).await
}
