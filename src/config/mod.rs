pub mod generation;
pub mod manager;
pub mod traits;

pub use generation::GenerationConfig;
pub use manager::{AppConfig, ConfigManager};
pub use traits::ConfigSection;
