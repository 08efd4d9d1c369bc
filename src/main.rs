mod app;
mod appointments;
mod auth;
mod config;
mod db;
mod error;
mod hotels;
mod state;

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "hotel_booking=debug,axum=info,tower_http=info";

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let fmt = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        fmt.with_target(false).json().init();
    } else {
        fmt.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::AppConfig::from_env()?;
    init_tracing(config.json_logs);

    let addr = config.bind_addr()?;
    let app_state = state::AppState::init(config).await?;
    app::serve(app::build_app(app_state), addr).await
}
