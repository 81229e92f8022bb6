// Duologue API server
//
// Serves a live two-persona dialogue (in-memory log, turn-by-turn generation,
// SSE streaming) plus optional durable conversation storage when DATABASE_URL
// is configured.

mod common;
mod config;
mod conversations;
mod convo;
mod presets;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Json, Router};
use duologue_core::{Agent, CompletionProvider, DialogueOrchestrator, SpeakerRole};
use duologue_groq::GroqProvider;
use duologue_storage::Database;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::common::ListResponse;
use crate::config::DialogueConfig;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model: String,
    persistence: bool,
}

async fn health(
    axum::extract::State(state): axum::extract::State<HealthState>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model: state.model.clone(),
        persistence: state.persistence,
    })
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    model: String,
    persistence: bool,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        convo::get_conversation,
        convo::generate,
        convo::reset_conversation,
        convo::stream_turn,
        presets::list_presets,
        conversations::create_conversation,
        conversations::list_conversations,
        conversations::get_conversation,
        conversations::append_message,
        conversations::delete_conversation,
    ),
    components(
        schemas(
            SpeakerRole,
            convo::ConversationData,
            convo::ConversationMetadata,
            convo::WireMessage,
            convo::StreamRequest,
            convo::StreamTurn,
            conversations::CreateConversationRequest,
            conversations::AppendMessageRequest,
            conversations::ConversationDetail,
            conversations::ConversationSummary,
            conversations::ConversationsPage,
            conversations::Participant,
            conversations::StoredMessage,
            presets::PresetInfo,
            ListResponse<presets::PresetInfo>,
        )
    ),
    tags(
        (name = "conversation", description = "Live dialogue endpoints"),
        (name = "conversations", description = "Durable conversation endpoints"),
        (name = "presets", description = "Persona preset endpoints")
    ),
    info(
        title = "Duologue API",
        version = "0.1.0",
        description = "API for running a turn-based dialogue between two LLM personas",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

/// Build the roster for the configured personas, initiator first
fn build_roster(config: &DialogueConfig, provider: Arc<dyn CompletionProvider>) -> Vec<Agent> {
    config
        .personas()
        .into_iter()
        .map(|persona| Agent::new(persona, provider.clone()))
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duologue_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("duologue-api starting...");

    let config = DialogueConfig::from_env();
    tracing::info!(
        model = %config.model,
        user = %config.user_name,
        assistant = %config.assistant_name,
        "Dialogue roster configured"
    );

    let provider: Arc<dyn CompletionProvider> =
        Arc::new(GroqProvider::new().context("Failed to configure Groq provider")?);

    let orchestrator = DialogueOrchestrator::new(build_roster(&config, provider.clone()))
        .context("Failed to build orchestrator")?;

    let convo_state = convo::AppState {
        orchestrator: Arc::new(Mutex::new(orchestrator)),
        agents: Arc::new(build_roster(&config, provider.clone())),
        metadata: convo::ConversationMetadata {
            llm1_name: config.user_name.clone(),
            llm2_name: config.assistant_name.clone(),
            topic: config.topic.clone(),
        },
    };

    // Durable storage is optional: mounted only when DATABASE_URL is set
    let db = match std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()) {
        Some(url) => {
            let db = Database::from_url(&url)
                .await
                .context("Failed to connect to database")?;
            db.run_migrations()
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Connected to database");
            Some(Arc::new(db))
        }
        None => {
            tracing::info!("DATABASE_URL not set, durable conversation storage disabled");
            None
        }
    };

    let health_state = HealthState {
        model: config.model.clone(),
        persistence: db.is_some(),
    };

    // Load CORS allowed origins from environment (optional)
    // Example: CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    let mut app = Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(convo::routes(convo_state))
        .merge(presets::routes());

    if let Some(db) = db {
        app = app.merge(conversations::routes(conversations::AppState { db }));
    }

    // Add Swagger UI
    let app =
        app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::ACCEPT,
                    header::ORIGIN,
                    header::CACHE_CONTROL,
                ]),
        )
    } else {
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
