use std::sync::Arc;

use shiptrack_core::{Clock, SystemClock};
use shiptrack_deliveries::DeliveryRepository;
use shiptrack_infra::{AppConfig, InMemoryDeliveryRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shiptrack_observability::init();

    let config = AppConfig::from_env();

    #[cfg(feature = "postgres")]
    let database = match config.database_url.as_deref() {
        Some(url) => Some(shiptrack_infra::Database::connect(url).await?),
        None => None,
    };

    #[cfg(feature = "postgres")]
    let repository: Arc<dyn DeliveryRepository> = match &database {
        Some(db) => {
            tracing::info!("using Postgres delivery store");
            Arc::new(shiptrack_infra::PostgresDeliveryRepository::new(db))
        }
        None => in_memory_store(),
    };

    #[cfg(not(feature = "postgres"))]
    let repository: Arc<dyn DeliveryRepository> = {
        if config.database_url.is_some() {
            tracing::warn!("DATABASE_URL is set but this build has no postgres support");
        }
        in_memory_store()
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let services = Arc::new(shiptrack_api::app::services::build_services(repository, clock)?);

    services.polling.start(config.polling.interval());

    let app = shiptrack_api::app::build_app(services.clone());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    services.polling.stop();

    #[cfg(feature = "postgres")]
    if let Some(db) = database {
        db.close().await;
    }

    tracing::info!("shutdown complete");
    Ok(())
}

fn in_memory_store() -> Arc<dyn DeliveryRepository> {
    tracing::info!("using in-memory delivery store");
    Arc::new(InMemoryDeliveryRepository::new())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
