use emergency_relay::app::RelayServices;
use emergency_relay::config::AppConfig;
use emergency_relay::server::start_server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    tracing::info!(
        environment = ?config.server.environment,
        siren_duration_secs = config.sirens.duration_secs,
        siren_max_active = config.sirens.max_active,
        "Starting emergency relay"
    );

    let services = RelayServices::in_memory(&config.sirens);
    start_server(&config, services).await?;
    Ok(())
}

/// `RUST_LOG` wins over the configured level; production logs are JSON.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}
