pub mod file_statistics;

pub use file_statistics::{FileMetrics, FileStatistics, StatisticsMap};
