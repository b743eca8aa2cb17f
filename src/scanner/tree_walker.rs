use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::config::TraversalConfig;
use crate::models::StatisticsMap;
use crate::scanner::{extension_of, FileAnalyzer, IgnoreMatcher, StatisticsAggregator};

/// 目录遍历器 - 在当前线程上枚举文件，并把文件分析派发到固定大小的线程池
pub struct TreeWalker {
    config: TraversalConfig,

    /// 仅在启用忽略文件时存在，遍历开始前加载，之后只读
    ignore_matcher: Option<IgnoreMatcher>,
}

/// 遍历过程的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// 派发给工作线程的文件数量
    pub files_dispatched: usize,

    /// 成功分析的文件数量
    pub files_analyzed: usize,

    /// 读取或解码失败而跳过的文件数量
    pub files_failed: usize,

    /// 被扩展名过滤掉的文件数量
    pub files_filtered: usize,

    /// 被忽略规则排除的文件数量
    pub files_ignored: usize,

    /// 遍历时遇到的目录或条目错误数量
    pub traversal_errors: usize,
}

/// 遍历结果
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    pub statistics: StatisticsMap,
    pub summary: WalkSummary,
}

/// 单个文件的过滤结果
#[derive(Debug, PartialEq)]
enum Candidate {
    Accepted(String),
    Filtered,
    Ignored,
}

impl TreeWalker {
    /// 校验根目录并加载忽略规则，任何失败都属于启动错误
    pub fn new(config: TraversalConfig) -> Result<Self> {
        let root_path = &config.root_path;
        if !root_path.exists() {
            bail!("路径不存在: {}", root_path.display());
        }
        if !root_path.is_dir() {
            bail!("不是目录: {}", root_path.display());
        }

        let ignore_matcher = if config.honor_ignore_file {
            Some(IgnoreMatcher::load(root_path, &config.ignore_file_name)?)
        } else {
            None
        };

        Ok(Self {
            config,
            ignore_matcher,
        })
    }

    /// 遍历目录树并汇总统计，所有派发的任务完成后才返回
    pub fn walk(&self) -> Result<WalkOutcome> {
        let worker_count = self.config.worker_count.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|index| format!("file-stats-worker-{}", index))
            .build()
            .context("无法创建工作线程池")?;

        let aggregator = StatisticsAggregator::new(worker_count);
        let files_analyzed = AtomicUsize::new(0);
        let files_failed = AtomicUsize::new(0);
        let mut summary = WalkSummary::default();

        // 创建进度条（在测试时禁用）
        let progress = if cfg!(test) {
            ProgressBar::hidden()
        } else {
            Self::create_progress_bar()
        };

        tracing::info!(
            "开始扫描: {} (递归: {}, 线程数: {})",
            self.config.root_path.display(),
            self.config.recursive,
            worker_count
        );

        // 闭包在当前线程执行，返回前等待所有派发的任务结束
        pool.in_place_scope(|scope| {
            let aggregator = &aggregator;
            let files_analyzed = &files_analyzed;
            let files_failed = &files_failed;

            for entry in self.build_walker() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        tracing::warn!("遍历目录时出错: {}", err);
                        summary.traversal_errors += 1;
                        continue;
                    }
                };

                if !Self::is_file_entry(&entry) {
                    continue;
                }

                let path = entry.into_path();
                let extension = match self.classify(&path) {
                    Candidate::Accepted(extension) => extension,
                    Candidate::Filtered => {
                        summary.files_filtered += 1;
                        continue;
                    }
                    Candidate::Ignored => {
                        tracing::debug!("忽略文件: {}", path.display());
                        summary.files_ignored += 1;
                        continue;
                    }
                };

                summary.files_dispatched += 1;
                let progress = progress.clone();

                scope.spawn(move |_| match FileAnalyzer::analyze(&path) {
                    Ok(metrics) => {
                        aggregator.merge_file_result(&extension, &metrics);
                        files_analyzed.fetch_add(1, Ordering::Relaxed);
                        progress.inc(1);
                    }
                    Err(err) => {
                        tracing::warn!("跳过文件: {:#}", err);
                        files_failed.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });

        progress.finish_and_clear();

        summary.files_analyzed = files_analyzed.into_inner();
        summary.files_failed = files_failed.into_inner();

        tracing::info!(
            "扫描完成: 分析 {} 个文件, 失败 {} 个, 过滤 {} 个, 忽略 {} 个, 遍历错误 {} 个",
            summary.files_analyzed,
            summary.files_failed,
            summary.files_filtered,
            summary.files_ignored,
            summary.traversal_errors
        );

        Ok(WalkOutcome {
            statistics: aggregator.into_statistics(),
            summary,
        })
    }

    /// 按递归和深度配置构建 walkdir 遍历器
    fn build_walker(&self) -> walkdir::IntoIter {
        let mut walker = WalkDir::new(&self.config.root_path)
            .follow_links(self.config.follow_symlinks);

        if let Some(depth) = self.config.walk_depth_limit() {
            walker = walker.max_depth(depth);
        }

        walker.into_iter()
    }

    /// 普通文件，或（不跟随链接时）指向普通文件的符号链接；指向目录的链接不进入
    fn is_file_entry(entry: &walkdir::DirEntry) -> bool {
        if entry.file_type().is_file() {
            return true;
        }

        entry.path_is_symlink()
            && std::fs::metadata(entry.path())
                .map(|metadata| metadata.is_file())
                .unwrap_or(false)
    }

    /// 依次应用包含扩展名、排除扩展名和忽略规则
    fn classify(&self, path: &Path) -> Candidate {
        let extension = extension_of(path);

        if !self.config.accepts_extension(&extension) {
            return Candidate::Filtered;
        }

        if let Some(matcher) = &self.ignore_matcher {
            if matcher.is_ignored(path) {
                return Candidate::Ignored;
            }
        }

        Candidate::Accepted(extension)
    }

    /// 创建进度条
    fn create_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] 已分析 {pos} 个文件")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        pb.set_style(style);
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// 便捷入口：构建遍历器并执行一次完整扫描
pub fn collect_statistics(config: TraversalConfig) -> Result<WalkOutcome> {
    TreeWalker::new(config)?.walk()
}
