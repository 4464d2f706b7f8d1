#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

use command::{
    CleanupStrategy, CommandStrategy, DecayStrategy, InfoStrategy, InitStrategy, IntegrateInput,
    IntegrateStrategy, MaintainStrategy, MatchInput, MatchStrategy, QualityInput,
    QualityStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "worldlens")]
#[command(about = "Worldview pattern lifecycle and mechanism matching", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Init,
    /// Show configuration and store status
    Info,
    /// Show version
    Version,
    /// Fold one perception's layered items into a worldview
    Integrate {
        #[arg(short, long)]
        worldview: Uuid,
        #[arg(short, long)]
        perception: Uuid,
    },
    /// Apply time decay to live patterns
    Decay {
        #[arg(short, long)]
        worldview: Option<Uuid>,
    },
    /// Delete dead patterns
    Cleanup {
        #[arg(short, long)]
        worldview: Option<Uuid>,
    },
    /// Daily job: decay everything, then delete what died
    Maintain,
    /// Mark low-information surface patterns dead
    Quality {
        #[arg(short, long)]
        worldview: Uuid,
        /// Strength below which patterns are checked
        #[arg(short, long)]
        threshold: Option<f64>,
    },
    /// Link perceptions to worldviews by mechanism
    Match {
        /// Minimum match score
        #[arg(short, long)]
        threshold: Option<f64>,
        /// Re-match a single perception instead of all
        #[arg(short, long)]
        perception: Option<Uuid>,
        /// Score against an in-memory copy and print the links without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
        Commands::Integrate {
            worldview,
            perception,
        } => {
            IntegrateStrategy
                .execute(IntegrateInput {
                    worldview,
                    perception,
                })
                .await
        }
        Commands::Decay { worldview } => DecayStrategy.execute(worldview).await,
        Commands::Cleanup { worldview } => CleanupStrategy.execute(worldview).await,
        Commands::Maintain => MaintainStrategy.execute(()).await,
        Commands::Quality {
            worldview,
            threshold,
        } => {
            QualityStrategy
                .execute(QualityInput {
                    worldview,
                    threshold,
                })
                .await
        }
        Commands::Match {
            threshold,
            perception,
            dry_run,
        } => {
            MatchStrategy
                .execute(MatchInput {
                    threshold,
                    perception,
                    dry_run,
                })
                .await
        }
    }
}
