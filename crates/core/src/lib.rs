pub mod config;
pub mod document;
pub mod error;
pub mod rule;
pub mod segment;

pub use config::{CacheConfig, Config, LimitsConfig};
pub use document::*;
pub use error::*;
pub use rule::*;
pub use segment::*;
