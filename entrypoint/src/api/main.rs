use std::sync::Arc;

use clap::Parser;
use common::regions::DEFAULT_REGION;
use mimalloc::MiMalloc;
use server::{
    ServerState, build_router, config::Config, errors::StartupError, logger::configure_logger,
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

async fn run(config: Config) -> Result<(), StartupError> {
    let state = Arc::new(ServerState::from_config(&config).await?);

    if config.sync_on_startup {
        let pricing = state.sync.ensure_pricing(DEFAULT_REGION).await;
        info!("{}", pricing.message);

        let allotments = state.sync.ensure_allotments().await;
        info!("{}", allotments.message);
    }

    let _periodic = state.sync.clone().spawn_periodic(config.sync_interval_hours);

    let app = build_router(state, config.cors_origin.as_deref());

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!("Listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(StartupError::Serve)
}

#[tokio::main]
async fn main() {
    configure_logger();

    let config = Config::parse();

    if let Err(err) = run(config).await {
        error!("{err}");
        std::process::exit(1);
    }
}
