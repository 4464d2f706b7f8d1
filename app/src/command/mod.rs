//! Static strategy pattern for CLI commands.
//!
//! Each command is a unit struct implementing [`CommandStrategy`] with its own
//! input type. Commands that touch the store share [`Engine::open`].

use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use worldlens_config::Config;
use worldlens_engine::{DatabaseStore, MechanismMatcher, PatternLifecycleManager};
use worldlens_providers::OpenAiCompatibleProvider;

mod info;
mod init;
mod integrate;
mod maintain;
mod matching;
mod quality;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use integrate::{IntegrateInput, IntegrateStrategy};
pub use maintain::{CleanupStrategy, DecayStrategy, MaintainStrategy};
pub use matching::{MatchInput, MatchStrategy};
pub use quality::{QualityInput, QualityStrategy};
pub use version::VersionStrategy;

/// Contract for all command strategies.
///
/// Dispatch is static: every strategy is a distinct type with its own
/// associated input.
pub trait CommandStrategy: Send + Sync + 'static {
    type Input;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Everything a store-backed command needs, wired from the config file.
pub struct Engine {
    pub config: Config,
    pub store: Arc<DatabaseStore>,
    pub lifecycle: PatternLifecycleManager,
    pub matcher: MechanismMatcher,
}

impl Engine {
    pub async fn open() -> anyhow::Result<Self> {
        let config = Config::load()?;
        info!("Loaded config from ~/worldlens/config.json");

        let store = Arc::new(DatabaseStore::connect(&config.database.url).await?);
        store.ensure_schema().await?;

        let providers = &config.providers;
        let provider = Arc::new(
            OpenAiCompatibleProvider::new(
                providers.api_key.clone(),
                &providers.base_url,
                Duration::from_secs(providers.timeout_secs),
            )?
            .with_chat_model(providers.chat_model.clone())
            .with_embedding_model(providers.embedding_model.clone()),
        );

        let lifecycle = PatternLifecycleManager::new(
            store.clone(),
            store.clone(),
            provider.clone(),
            config.lifecycle.clone(),
        )
        .with_text_generator(provider);

        let matcher = MechanismMatcher::new(
            store.clone(),
            store.clone(),
            store.clone(),
            config.matcher.clone(),
        );

        Ok(Self {
            config,
            store,
            lifecycle,
            matcher,
        })
    }
}

/// Pretty-print a stats value as JSON on stdout.
fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
