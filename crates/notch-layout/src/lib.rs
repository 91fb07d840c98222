pub mod input;
pub mod store;
pub mod types;

pub use input::parse_end_input;
pub use store::NotchLayout;
pub use types::{BoundsIssue, LayoutError, LayoutState};
