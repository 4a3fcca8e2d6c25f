pub mod config;
pub mod logging;

pub use config::{load_config, save_config, save_filter_names};
pub use logging::init_logging;
