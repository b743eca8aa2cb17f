pub mod defaults;
pub mod settings;

pub use settings::{Config, OutputConfig, ScanConfig, TraversalConfig};
