use anyhow::Context;
use customer_hub::{
    cli::{Cli, Commands},
    create_app,
    metrics::set_customers_count,
    utils::toml_config::LogFormat,
    AppConfig, AppState,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();

    let config_found = cli.config.exists();
    let config = if config_found {
        AppConfig::load(&cli.config)
            .with_context(|| format!("Failed to load {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };

    init_tracing(cli.log_level(&config.server.log_level), config.server.log_format);

    if !config_found {
        warn!(path = %cli.config.display(), "configuration file not found, using defaults");
    }

    if let Some(Commands::Config { validate }) = cli.command {
        return show_config(&config, validate);
    }

    let jwt_secret = config.jwt_secret().context("JWT secret unavailable")?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::from_config(config, &jwt_secret)
        .await
        .context("Failed to initialize application state")?;

    match state.customers.count().await {
        Ok(count) => {
            set_customers_count(count);
            info!(customers = count, "customer store ready");
        }
        Err(e) => warn!(error = %e, "could not read initial customer count"),
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Customer Hub listening on http://{}", addr);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("customer_hub={level},tower_http={level}"))
    });

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_timer(fmt::time::SystemTime)
                    .with_target(false),
            )
            .init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

fn show_config(config: &AppConfig, validate: bool) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{}", rendered);

    if validate {
        config.validate()?;
        config.jwt_secret()?;
        println!("Configuration is valid");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Received Ctrl+C, shutting down"),
        _ = terminate => warn!("Received SIGTERM, shutting down"),
    }
}
