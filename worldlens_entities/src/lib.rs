//! sea-orm entity models for the worldview pattern store.

pub mod layered_perceptions;
pub mod perception_worldview_links;
pub mod worldview_patterns;
pub mod worldviews;

pub mod prelude {
    pub use super::layered_perceptions::Entity as LayeredPerceptions;
    pub use super::perception_worldview_links::Entity as PerceptionWorldviewLinks;
    pub use super::worldview_patterns::Entity as WorldviewPatterns;
    pub use super::worldviews::Entity as Worldviews;
}

/// DDL for the four tables, including the partial unique index that backs
/// pattern deduplication across processes.
pub const SCHEMA_SQL: &str = include_str!("../schema.sql");
