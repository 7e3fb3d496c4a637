pub mod config;
pub mod platform;
pub mod types;

pub use config::Config;
pub use platform::classify;
pub use types::*;
