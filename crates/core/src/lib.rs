pub mod config;
pub mod error;
pub mod text;
pub mod types;

pub use config::{load_global_config, parse_blog_toml};
pub use error::{Error, Result};
pub use types::*;
