pub mod aggregator;
pub mod extension;
pub mod file_analyzer;
pub mod ignore_matcher;
pub mod tree_walker;

pub use aggregator::StatisticsAggregator;
pub use extension::{extension_of, extension_of_name};
pub use file_analyzer::FileAnalyzer;
pub use ignore_matcher::IgnoreMatcher;
pub use tree_walker::{collect_statistics, TreeWalker, WalkOutcome, WalkSummary};
