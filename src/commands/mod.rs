mod analyze;
mod config;
mod contrast;

pub use analyze::run_analyze;
pub use config::run_config;
pub use contrast::run_contrast;
