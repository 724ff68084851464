pub mod geometry;
pub mod id;
pub mod model;
pub mod parser;
pub mod source;

pub use geometry::{MARGIN, Viewport};
pub use id::OverlayId;
pub use model::*;
pub use parser::{SkipReason, SkippedLine, parse_map, skipped_lines};
pub use source::patch_component_position;

// Re-export kurbo's point types so downstream crates share one geometry vocabulary
pub use kurbo::{Point, Vec2};
