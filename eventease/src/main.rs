//! EventEase bootstrap
//!
//! Builds the store against the configured backend, restores the session and
//! loads the data the landing page needs, then prints what it found.
//!
//! ```bash
//! EVENTEASE_API_URL=http://localhost:5000/api cargo run -p eventease
//! ```
//!
//! With `EVENTEASE_METRICS_ADDR=127.0.0.1:9000` set, the process keeps the
//! Prometheus endpoint up until Ctrl+C.

use eventease::{
    build_store, AppAction, AppStore, AuthAction, CategoryAction, EventAction, EventEaseConfig,
    EventEaseEnvironment,
};
use eventease_client::{ApiClient, EventQuery};
use eventease_core::environment::SystemClock;
use eventease_runtime::metrics::MetricsServer;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = EventEaseConfig::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.runtime.log_filter)
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let metrics = config.runtime.metrics_addr.map(MetricsServer::new);
    if let Some(server) = &metrics {
        server.start()?;
    }

    let api = ApiClient::new(&config.client_config())?;
    tracing::info!(base_url = api.base_url(), "Connecting to EventEase API");

    let environment = EventEaseEnvironment::new(Arc::new(api), Arc::new(SystemClock))
        .with_session(config.session);
    let store = build_store(environment);

    load(&store, AuthAction::FetchCurrentUser.into()).await?;
    load(&store, CategoryAction::FetchCategories.into()).await?;
    load(&store, EventAction::FetchEvents(EventQuery::new()).into()).await?;

    let state = store.state(Clone::clone).await;
    match &state.auth.user {
        Some(user) => println!("Signed in as {} <{}> ({:?})", user.name, user.email, user.role),
        None => println!("Not signed in"),
    }
    println!("{} categories ({})", state.category.categories.len(), state.category.status);
    for event in &state.event.events {
        println!("  {} {} {}", event.event_id, event.date.format("%Y-%m-%d"), event.title);
    }
    if let Some(error) = &state.event.error {
        println!("Events: {error}");
    }

    if metrics.is_some() {
        tracing::info!("Serving metrics, press Ctrl+C to exit");
        tokio::signal::ctrl_c().await?;
    }

    store.shutdown(config.runtime.shutdown_timeout).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Send `action` and wait for every effect it cascades into
async fn load(store: &AppStore, action: AppAction) -> anyhow::Result<()> {
    let mut handle = store.send_cascading(action).await?;
    handle.wait_with_timeout(LOAD_TIMEOUT).await?;
    Ok(())
}
