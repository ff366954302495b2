use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;
mod services;

use adapters::{
    ClarifaiClassifier, PgFoodJournalRepository, PgVitalsRepository, TracingNotificationSink,
    WebhookNotificationSink,
};
use application::{FoodService, VitalsService};
use auth::ApiKey;
use buddy::{FoodClassifier, NotificationSink, SystemClock, VitalsEngine};
use config::ServerConfig;
use services::scheduler::VitalsTicker;

/// Type aliases for application services with concrete repository implementations
pub type AppVitalsService = VitalsService<PgVitalsRepository>;
pub type AppFoodService = FoodService<PgVitalsRepository, PgFoodJournalRepository>;
pub type AppTicker = VitalsTicker<PgVitalsRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub vitals: Arc<AppVitalsService>,
    pub food: Arc<AppFoodService>,
    pub ticker: Arc<AppTicker>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Buddy API is running - eat, drink, sleep".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Axum server that stops every ticker before exiting
struct BuddyServer {
    router: Router,
    ticker: Arc<AppTicker>,
}

#[shuttle_runtime::async_trait]
impl shuttle_runtime::Service for BuddyServer {
    async fn bind(self, addr: SocketAddr) -> Result<(), shuttle_runtime::Error> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(anyhow::Error::from)?;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!("⚠️  Failed to listen for shutdown signal: {}", e);
                    std::future::pending::<()>().await;
                }
            })
            .await
            .map_err(anyhow::Error::from)?;

        tracing::info!("🛑 Shutting down tickers...");
        self.ticker.stop_all().await;
        Ok(())
    }
}

fn notification_sink(config: &ServerConfig) -> Arc<dyn NotificationSink> {
    match &config.webhook_url {
        Some(url) => match WebhookNotificationSink::new(url.clone(), config.webhook_secret.clone()) {
            Ok(sink) => {
                tracing::info!("🔔 Webhook notifications enabled");
                Arc::new(sink)
            }
            Err(e) => {
                tracing::warn!("⚠️  Webhook sink unavailable ({}), logging notifications", e);
                Arc::new(TracingNotificationSink)
            }
        },
        None => {
            tracing::warn!("⚠️  No NOTIFY_WEBHOOK_URL set - notifications go to the log");
            Arc::new(TracingNotificationSink)
        }
    }
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> Result<BuddyServer, shuttle_runtime::Error> {
    tracing::info!("🐣 Buddy API initializing...");

    let config = ServerConfig::from_secrets(&secrets);

    let api_key = ApiKey::new(config.api_key.clone());
    if api_key.is_enabled() {
        tracing::info!("🔐 API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No BUDDY_API_KEY set - authentication disabled");
    }

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {e}"))?;

    tracing::info!("✅ Database migrations completed");

    // Initialize food classifier if configured
    let classifier = config.clarifai_pat.clone().map(|pat| {
        tracing::info!("🥗 Clarifai food classifier initialized");
        Arc::new(ClarifaiClassifier::new(pat)) as Arc<dyn FoodClassifier>
    });

    if classifier.is_none() {
        tracing::warn!("⚠️  No CLARIFAI_PAT set - photo feeding disabled");
    }

    // Initialize application services
    let vitals_repo = Arc::new(PgVitalsRepository::new(pool.clone()));
    let journal_repo = Arc::new(PgFoodJournalRepository::new(pool));
    let vitals = Arc::new(VitalsService::new(
        vitals_repo,
        VitalsEngine::new(config.vitals.clone()),
        notification_sink(&config),
        Arc::new(SystemClock),
        config.retry.clone(),
    ));
    let food = Arc::new(FoodService::new(vitals.clone(), journal_repo, classifier));
    let ticker = Arc::new(VitalsTicker::new(vitals.clone(), Some(config.ticker.clone())));

    // Resume ticking every known buddy
    if ticker.config().enabled {
        match vitals.list_ids().await {
            Ok(ids) => {
                for id in ids {
                    ticker.start(id);
                }
                tracing::info!(
                    "⏰ Vitals ticker started for {} buddies (interval: {:?})",
                    ticker.active_count(),
                    ticker.config().interval
                );
            }
            Err(e) => tracing::warn!("⚠️  Could not load buddies for ticking: {}", e),
        }
    } else {
        tracing::warn!("⚠️  Vitals ticker disabled");
    }

    // Create application state
    let state = AppState {
        vitals,
        food,
        ticker: ticker.clone(),
    };

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::vitals::router())
        .merge(routes::food::router())
        .merge(routes::session::router())
        .layer(middleware::from_fn_with_state(api_key, auth::auth_middleware));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    // Build router with shared state
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Buddy API ready");

    Ok(BuddyServer { router, ticker })
}
