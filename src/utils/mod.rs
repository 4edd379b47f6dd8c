pub mod app_config;
pub mod constants;
pub mod helpers;
pub mod logging;

pub use app_config::{AppConfig, ThemeConfig};
pub use logging::{init_logging, LOG_ENV};
pub use constants::*;
pub use helpers::*;
