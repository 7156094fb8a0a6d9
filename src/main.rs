use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = fupisha::config::load_from_env()?;
    fupisha::telemetry::init(&config)?;
    config.print_summary();

    fupisha::server::run(config).await
}
