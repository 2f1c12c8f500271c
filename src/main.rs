#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use crate::{
    config::RuntimeConfiguration,
    data::store::StudentStore,
    error::{BindListenerSnafu, CollegeResult, ServeSnafu},
    routes::router,
    state::CollegeState,
};
use snafu::ResultExt;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod config;
mod data;
mod error;
mod routes;
mod state;

async fn shutdown_signal(state: CollegeState) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
    state.sensible_shutdown().await;
}

#[snafu::report]
#[tokio::main]
async fn main() -> CollegeResult<()> {
    //a missing .env is fine, everything has a default
    let dotenv = dotenvy::dotenv();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");
    if let Err(e) = dotenv {
        warn!(?e, "Unable to load .env file");
    }

    let config = RuntimeConfiguration::new()?;
    let server_ip = config.server_config().address.clone();
    let state = CollegeState::new(StudentStore::seeded(), config);

    let app = router(state.clone());

    let listener = TcpListener::bind(&server_ip)
        .await
        .context(BindListenerSnafu {
            address: server_ip.clone(),
        })?;

    info!(?server_ip, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .context(ServeSnafu)
}
