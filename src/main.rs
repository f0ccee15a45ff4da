use std::sync::Arc;

use chatrelay::broker::{ChannelHub, Publisher, Relay};
use chatrelay::config::{Settings, load_config};
use chatrelay::persistence::{MessageLog, SledStore};
use chatrelay::transport::{AppState, router, serve};
use chatrelay::utils::logging;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    logging::init(&settings.log.level);

    if let Err(e) = run_server(settings).await {
        error!("Server failed: {e}");
        std::process::exit(1);
    }
}

async fn run_server(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(SledStore::open(&settings.storage)?);
    let hub = Arc::new(ChannelHub::with_capacity(settings.relay.broadcast_capacity));
    let relay = Arc::new(Relay::new(
        MessageLog::new(store.clone()),
        Publisher::new(hub.clone()),
        &settings.relay,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let state = AppState::new(
        relay,
        hub.clone(),
        settings.relay.max_viewers,
        shutdown_rx.clone(),
    );
    let app = router(state, &settings.server.route_prefix);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Chat relay listening on http://{addr}{}", settings.server.route_prefix);

    let mut server = tokio::spawn(serve(listener, app, shutdown_rx));

    tokio::select! {
        result = &mut server => {
            error!("HTTP server exited unexpectedly.");
            result??;
            return Ok(());
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown signal received. Closing viewers.");
        }
    }

    let _ = shutdown_tx.send(true);

    server.await??;
    hub.close_all();
    store.flush()?;
    Ok(())
}
