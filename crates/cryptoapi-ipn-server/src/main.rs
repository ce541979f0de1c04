use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ipn_server::{config::ServerConfig, cors, metrics, routes, state::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    tracing::debug!(?config, "configuration loaded");

    let state = match AppState::from_config(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            tracing::error!("Failed to initialize address fetcher: {e}");
            std::process::exit(1);
        }
    };

    metrics::register_metrics();

    let port = config.port;
    let allowed_origins = config.allowed_origins.clone();

    tracing::info!("IPN server listening on port {port}");
    tracing::info!(
        "Providers: {}",
        config.providers.names().collect::<Vec<_>>().join(", ")
    );
    tracing::info!("  POST http://localhost:{port}/ipn");
    tracing::info!("  GET  http://localhost:{port}/give");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors::build_cors(&allowed_origins))
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(65_536))
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
