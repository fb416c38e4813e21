//! Prompt Market entitlement service.
//!
//! Loads configuration, connects to PostgreSQL, spawns the expiry sweeper and
//! serves the HTTP API until Ctrl-C or SIGTERM.

use std::sync::Arc;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prompt_market::adapters::http::{app_router, AuthState, PaymentsAppState, RouterSettings, UsageAppState};
use prompt_market::adapters::{
    ExpirySweeper, HostedCheckoutLink, JwtSessionValidator, PostgresEntitlementStore,
    PostgresUsageCounterStore, SystemClock,
};
use prompt_market::application::handlers::{
    ApplyPaymentHandler, CheckAndConsumeHandler, CreateCheckoutSessionHandler, GetMyPlanHandler,
    HandlePaymentWebhookHandler, SweepExpiredHandler,
};
use prompt_market::config::{AppConfig, ServerConfig};
use prompt_market::domain::entitlement::PlanCatalog;
use prompt_market::domain::payment::SignatureVerifier;
use prompt_market::ports::{Clock, EntitlementStore, UsageCounterStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    // Ports
    let store: Arc<dyn EntitlementStore> = Arc::new(PostgresEntitlementStore::new(pool.clone()));
    let counters: Arc<dyn UsageCounterStore> = Arc::new(PostgresUsageCounterStore::new(pool));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let checkout = Arc::new(HostedCheckoutLink::new(
        config.payment.checkout_base_url()?,
        config.payment.return_url()?,
    ));
    let validator: AuthState = Arc::new(JwtSessionValidator::new(
        &config.auth.jwt_secret,
        &config.auth.issuer,
        &config.auth.audience,
    ));

    let retry = config.retry.policy();
    let catalog = PlanCatalog::new(
        config.payment.periodic_product_id.trim(),
        config.payment.perpetual_product_id.trim(),
    );

    let verifier = SignatureVerifier::new(config.payment.webhook_secret());
    if !verifier.is_configured() {
        tracing::warn!(
            "PAYMENT WEBHOOK SECRET IS NOT SET: webhook signatures are NOT verified and any caller can grant paid tiers"
        );
    }

    // Handlers
    let apply = Arc::new(ApplyPaymentHandler::new(store.clone(), clock.clone(), retry));
    let payments = PaymentsAppState {
        webhook_handler: Arc::new(HandlePaymentWebhookHandler::new(
            verifier,
            catalog.clone(),
            apply,
            config.payment.webhook_timeout(),
        )),
        checkout_handler: Arc::new(CreateCheckoutSessionHandler::new(
            store.clone(),
            checkout,
            catalog,
            retry,
        )),
        plan_handler: Arc::new(GetMyPlanHandler::new(store.clone(), clock.clone(), retry)),
        signature_header: config.payment.signature_header_name()?,
    };
    let usage = UsageAppState {
        gate: Arc::new(CheckAndConsumeHandler::new(
            store.clone(),
            counters,
            config.usage.quota(),
            retry,
        )),
    };

    // Sweeper
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper_task = if config.sweeper.enabled {
        let handler = Arc::new(SweepExpiredHandler::new(
            store,
            clock.clone(),
            retry,
            config.sweeper.concurrency,
        ));
        let sweeper = ExpirySweeper::new(handler, clock, config.sweeper.schedule());
        Some(tokio::spawn(async move { sweeper.run(shutdown_rx).await }))
    } else {
        tracing::info!("Expiry sweeper disabled");
        None
    };

    let settings = RouterSettings {
        request_timeout: config.server.request_timeout(),
        cors_origins: cors_origins(&config.server),
    };
    let app = app_router(payments, usage, validator, &settings);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await?;

    if let Some(task) = sweeper_task {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Expiry sweeper task panicked");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` overrides
/// the configured filter.
fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let json = server.is_production();

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

fn cors_origins(server: &ServerConfig) -> Vec<HeaderValue> {
    server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
