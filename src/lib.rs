pub mod config;
pub mod models;
pub mod output;
pub mod scanner;

// 重新导出常用模块
pub use config::{Config, TraversalConfig};
pub use models::{FileMetrics, FileStatistics, StatisticsMap};
pub use output::{OutputFormat, ResultFormatter};
pub use scanner::{collect_statistics, TreeWalker, WalkOutcome, WalkSummary};
