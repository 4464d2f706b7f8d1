#![warn(
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
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

pub mod decay;
pub mod filter;
mod integrity;
mod lifecycle;
mod locks;
pub mod matcher;
pub mod quality;
pub mod scoring;
pub mod store;

pub use decay::{DecayOutcome, DecayStats, LayerDecayStats};
pub use filter::{FastFilter, FilterVerdict, RejectReason};
pub use lifecycle::{IntegrationStats, LayerIntegrationStats, PatternLifecycleManager};
pub use locks::WorldviewLocks;
pub use matcher::{
    FixedPolicy, MatchScore, MechanismCountClassifier, MechanismMatcher, PolicyClassifier,
    ScoringPolicy, Weights,
};
pub use quality::{FlaggedPattern, QualityReport, QualityStats};
pub use store::{DatabaseStore, MemoryStore};
