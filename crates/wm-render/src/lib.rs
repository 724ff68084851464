pub mod handles;
pub mod hit;
pub mod measure;
pub mod project;
pub mod reveal;
pub mod svg;

pub use handles::{Handle, ShapeFrame, TextResize, resize_handle_at, resize_shape, resize_text};
pub use hit::{Hit, hit_test, hit_test_sequence_target};
pub use measure::{ApproxMeasure, TextMeasure};
pub use reveal::{RevealPlan, reveal_plan};
pub use svg::render_svg;
