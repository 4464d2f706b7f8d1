//! Repository implementations: sea-orm for deployments, an in-process map
//! for tests and dry runs.

mod convert;
mod database;
mod memory;

pub use database::DatabaseStore;
pub use memory::MemoryStore;
