mod layer;
mod pattern;
mod perception;
mod worldview;

pub use layer::{Layer, PatternStatus};
pub use pattern::Pattern;
pub use perception::{Actor, Perception};
pub use worldview::{ActorField, LogicPattern, PerceptionLink, Worldview, WorldviewFrame};
