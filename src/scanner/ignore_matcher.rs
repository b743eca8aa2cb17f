use std::path::{Path, PathBuf};
use std::collections::HashSet;
use anyhow::{Context, Result};

/// 忽略规则匹配器 - 从扫描根目录的忽略文件中读取规则
///
/// 规则只做子串匹配：只要某条规则是相对路径的子串，该文件就被忽略。
/// 不支持通配符、目录锚定和取反等 gitignore 语法。
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    /// 扫描根路径
    root_path: PathBuf,

    /// 原始规则集合，构造后不再修改
    patterns: HashSet<String>,
}

impl IgnoreMatcher {
    /// 读取 `root_path/ignore_file_name`，文件不存在时得到空规则集
    pub fn load(root_path: &Path, ignore_file_name: &str) -> Result<Self> {
        let ignore_path = root_path.join(ignore_file_name);

        let patterns = if ignore_path.is_file() {
            let content = std::fs::read_to_string(&ignore_path)
                .with_context(|| format!("无法读取忽略文件: {}", ignore_path.display()))?;
            Self::parse_patterns(&content)
        } else {
            tracing::debug!("忽略文件不存在: {}", ignore_path.display());
            HashSet::new()
        };

        tracing::info!("加载了 {} 条忽略规则", patterns.len());

        Ok(Self {
            root_path: root_path.to_path_buf(),
            patterns,
        })
    }

    /// 直接用给定的规则构造
    pub fn with_patterns<I, S>(root_path: &Path, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root_path: root_path.to_path_buf(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// 解析忽略文件内容：跳过空行和 `#` 注释行，其余行去除首尾空白
    pub fn parse_patterns(content: &str) -> HashSet<String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    }

    pub fn patterns(&self) -> &HashSet<String> {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// 检查路径是否应该被忽略，路径可以是绝对路径或相对根目录的路径
    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let relative = Self::relative_path_string(&self.root_path, path);
        self.matches_relative(&relative)
    }

    /// 对已经是正斜杠形式的相对路径做匹配
    pub fn matches_relative(&self, relative_path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| relative_path.contains(pattern.as_str()))
    }

    /// 相对根目录的路径，统一使用 `/` 作为分隔符
    fn relative_path_string(root_path: &Path, path: &Path) -> String {
        let relative = path.strip_prefix(root_path).unwrap_or(path);

        relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
