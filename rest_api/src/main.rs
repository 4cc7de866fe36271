// rest_api/src/main.rs

use tracing_subscriber::EnvFilter;

use rest_api::config::{jwt_secret, load_config};
use rest_api::start_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = load_config(None)?;
    let secret = jwt_secret();
    start_server(config, secret).await
}
