use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

use crate::config::defaults::DefaultConfig;
use crate::output::OutputFormat;

/// 持久化的默认配置（TOML 文件）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 扫描配置
    pub scan: ScanConfig,

    /// 输出配置
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 工作线程数
    pub worker_count: usize,

    /// 是否跟随符号链接
    pub follow_symlinks: bool,

    /// 忽略文件名
    pub ignore_file_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 默认输出格式
    pub format: OutputFormat,

    /// JSON 是否缩进输出
    pub pretty_json: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            worker_count: DefaultConfig::default_worker_count(),
            follow_symlinks: false,
            ignore_file_name: DefaultConfig::default_ignore_file_name(),
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("配置文件格式错误: {}", path.display()))?;
        Ok(config)
    }

    /// 获取默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push(DefaultConfig::config_dir_name());
        path.push(DefaultConfig::config_file_name());
        Some(path)
    }

    /// 加载默认位置的配置，文件不存在时使用内置默认值（不会创建文件）
    pub fn load_or_default() -> Result<Self> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// 单次运行的遍历配置，运行期间不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// 扫描根目录
    pub root_path: PathBuf,

    /// 是否递归进入子目录
    pub recursive: bool,

    /// 最大目录深度，`None` 表示不限制
    pub max_depth: Option<usize>,

    /// 工作线程数
    pub worker_count: usize,

    /// 只统计这些扩展名（为空时不限制）
    pub include_extensions: HashSet<String>,

    /// 排除这些扩展名
    pub exclude_extensions: HashSet<String>,

    /// 是否读取并应用忽略文件
    pub honor_ignore_file: bool,

    /// 忽略文件名
    pub ignore_file_name: String,

    /// 是否跟随符号链接
    pub follow_symlinks: bool,

    /// 输出格式
    pub output_format: OutputFormat,
}

impl TraversalConfig {
    /// 以持久化配置为默认值创建遍历配置
    pub fn new(root_path: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            root_path: root_path.into(),
            recursive: false,
            max_depth: None,
            worker_count: config.scan.worker_count.max(1),
            include_extensions: HashSet::new(),
            exclude_extensions: HashSet::new(),
            honor_ignore_file: false,
            ignore_file_name: config.scan.ignore_file_name.clone(),
            follow_symlinks: config.scan.follow_symlinks,
            output_format: config.output.format,
        }
    }

    /// 判断扩展名是否通过包含/排除过滤
    pub fn accepts_extension(&self, extension: &str) -> bool {
        if !self.include_extensions.is_empty() && !self.include_extensions.contains(extension) {
            return false;
        }
        !self.exclude_extensions.contains(extension)
    }

    /// 换算成 walkdir 的深度上限（根目录为 0，根目录下的文件为 1）
    pub fn walk_depth_limit(&self) -> Option<usize> {
        if !self.recursive {
            return Some(1);
        }
        self.max_depth.map(|depth| depth.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_from_file_partial() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[scan]\nworker_count = 3\n\n[output]\nformat = \"json\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.scan.worker_count, 3);
        assert_eq!(config.scan.ignore_file_name, ".gitignore");
        assert!(!config.scan.follow_symlinks);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_from_file_invalid() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[scan\nworker_count = ").unwrap();

        assert!(Config::load_from_file(&path).is_err());
        assert!(Config::load_from_file(&temp_dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_accepts_extension() {
        let mut traversal = TraversalConfig::new(".", &Config::default());
        assert!(traversal.accepts_extension("txt"));

        traversal.include_extensions.insert("txt".to_string());
        traversal.include_extensions.insert("md".to_string());
        traversal.exclude_extensions.insert("md".to_string());

        assert!(traversal.accepts_extension("txt"));
        assert!(!traversal.accepts_extension("md"));
        assert!(!traversal.accepts_extension("rs"));
    }

    #[test]
    fn test_walk_depth_limit() {
        let mut traversal = TraversalConfig::new(".", &Config::default());
        assert_eq!(traversal.walk_depth_limit(), Some(1));

        traversal.recursive = true;
        assert_eq!(traversal.walk_depth_limit(), None);

        traversal.max_depth = Some(0);
        assert_eq!(traversal.walk_depth_limit(), Some(1));

        traversal.max_depth = Some(2);
        assert_eq!(traversal.walk_depth_limit(), Some(3));
    }
}
