use std::path::Path;
use anyhow::{Context, Result};

use crate::models::FileMetrics;

/// 文件分析器 - 读取单个文件并统计行数、字节数和注释行
///
/// 注释检测只看去除首尾空白后的行是否以 `//` 或 `#` 开头，与语言无关。
pub struct FileAnalyzer;

impl FileAnalyzer {
    /// 分析文件。读取失败或内容不是合法 UTF-8 时返回错误
    pub fn analyze(path: &Path) -> Result<FileMetrics> {
        let byte_count = std::fs::metadata(path)
            .with_context(|| format!("无法获取文件元数据: {}", path.display()))?
            .len();

        let bytes = std::fs::read(path)
            .with_context(|| format!("无法读取文件: {}", path.display()))?;
        let content = String::from_utf8(bytes)
            .with_context(|| format!("文件不是合法的 UTF-8 文本: {}", path.display()))?;

        let mut metrics = Self::analyze_text(&content);
        metrics.byte_count = byte_count;

        Ok(metrics)
    }

    /// 统计文本的行信息（不含字节数）
    pub fn analyze_text(content: &str) -> FileMetrics {
        let mut metrics = FileMetrics::default();

        for line in split_lines(content) {
            metrics.line_count += 1;

            let trimmed = line.trim();
            if !trimmed.is_empty() {
                metrics.non_empty_line_count += 1;
            }
            if is_comment_line(trimmed) {
                metrics.comment_line_count += 1;
            }
        }

        metrics
    }
}

/// 判断去除空白后的行是否是注释行
pub fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("//") || trimmed.starts_with('#')
}

/// 按 `\n`、`\r\n` 或单独的 `\r` 分行，末尾的换行符不会产生额外的空行
pub fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;

    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        match rest.find(['\n', '\r']) {
            Some(index) => {
                let line = &rest[..index];
                let separator_len = if rest[index..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[index + separator_len..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}
