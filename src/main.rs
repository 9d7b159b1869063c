use captioncraft::{config::Config, server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    telemetry::init_tracing("captioncraft=info,tower_http=info");
    if let Ok(path) = dotenv {
        tracing::debug!(".env read from {}", path.display());
    }

    let config = Config::from_env()?;
    server::run(config).await
}
