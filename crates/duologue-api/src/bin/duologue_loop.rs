// Headless autonomous dialogue loop
//
// Seeds the conversation with an opening line and lets the two personas talk
// until the process is stopped or a turn fails. Useful for smoke-testing a
// roster without the HTTP surface.

use anyhow::{Context, Result};
use duologue_core::{Agent, CompletionProvider, DialogueOrchestrator, Persona, SpeakerRole};
use duologue_groq::GroqProvider;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_MODEL: &str = "moonshotai/kimi-k2-instruct";
const DEFAULT_OPENING: &str = "Hello, I am John :)";

const DEFAULT_USER_NAME: &str = "John";
const DEFAULT_USER_GOAL: &str = "You are John, a stubborn contrarian who has never once \
changed his mind. You try to charm the other person into seeing your perspective and \
reject any suggestion to reconsider. Always respond in a short single sentence.";

const DEFAULT_ASSISTANT_NAME: &str = "Samantha";
const DEFAULT_ASSISTANT_GOAL: &str = "You are Samantha, a patient therapist. You help \
people question their fixed ideas. Always respond in a short single sentence.";

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duologue_loop=info,duologue_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let model = env_or("DUOLOGUE_MODEL", DEFAULT_MODEL);
    let opening = env_or("DUOLOGUE_OPENING", DEFAULT_OPENING);

    let user = Persona::new(
        env_or("DUOLOGUE_USER_NAME", DEFAULT_USER_NAME),
        SpeakerRole::User,
        env_or("DUOLOGUE_USER_GOAL", DEFAULT_USER_GOAL),
        &model,
    );
    let assistant = Persona::new(
        env_or("DUOLOGUE_ASSISTANT_NAME", DEFAULT_ASSISTANT_NAME),
        SpeakerRole::Assistant,
        env_or("DUOLOGUE_ASSISTANT_GOAL", DEFAULT_ASSISTANT_GOAL),
        &model,
    );

    tracing::info!(
        model = %model,
        user = %user.name,
        assistant = %assistant.name,
        "starting autonomous dialogue"
    );

    let provider: Arc<dyn CompletionProvider> =
        Arc::new(GroqProvider::new().context("Failed to configure Groq provider")?);

    let roster = vec![
        Agent::new(user, provider.clone()),
        Agent::new(assistant, provider),
    ];

    let mut orchestrator =
        DialogueOrchestrator::new(roster).context("Failed to build orchestrator")?;

    orchestrator.run(opening).await.context("Dialogue stopped")
}
