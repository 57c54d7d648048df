use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use board_server::config::AppConfig;
use board_server::darwin::{DarwinClient, MockDarwinClient};
use board_server::domain::london_now;
use board_server::refresh::{FileDirectionStore, Scheduler, Session, Upstream};
use board_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("board_server=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "board server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let upstream = match &config.mock_data {
        Some(dir) => {
            info!(dir = %dir.display(), "serving sample boards");
            Upstream::Mock(MockDarwinClient::new(dir)?)
        }
        None => {
            if config.darwin.access_token.is_none() {
                warn!("HUXLEY_ACCESS_TOKEN not set, relying on the server's own token");
            }
            Upstream::Live(DarwinClient::new(config.darwin.clone())?)
        }
    };

    let store = Arc::new(FileDirectionStore::new(&config.direction_file));
    let session = Session::restore(store.as_ref(), london_now(), config.cutoff_hour);
    info!(
        home = %config.route.home.name,
        city = %config.route.city.name,
        direction = ?session.direction(),
        "starting board"
    );

    let scheduler = Scheduler::new(
        upstream,
        config.route.clone(),
        session,
        store,
        config.engine.clone(),
        config.scheduler.clone(),
    );
    scheduler.start().await;

    let app = create_router(AppState::new(scheduler.clone()), &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, "departure board listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "couldn't listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    scheduler.shutdown().await;
    info!("shut down");
    Ok(())
}
