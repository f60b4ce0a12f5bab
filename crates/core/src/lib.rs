pub mod mode;
pub mod selection;
pub mod viewport;

pub use mode::Mode;
pub use selection::{Range, Selection};
pub use viewport::{visible_range, GridMetrics, Viewport, VisibleRange};
