pub mod config;
pub mod notch;
pub mod units;

pub use config::*;
pub use notch::*;
pub use units::*;
