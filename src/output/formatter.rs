use std::fmt::Write as _;
use std::str::FromStr;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{FileStatistics, StatisticsMap};

/// 输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 纯文本格式
    #[default]
    Plain,
    /// JSON 格式
    Json,
    /// XML 格式
    Xml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(anyhow!("不支持的输出格式: {} (可选: plain, json, xml)", other)),
        }
    }
}

/// 结果格式化器 - 把最终的统计结果渲染为文本
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultFormatter {
    format: OutputFormat,
    pretty_json: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty_json: false,
        }
    }

    /// JSON 是否缩进输出
    pub fn with_pretty_json(mut self, pretty_json: bool) -> Self {
        self.pretty_json = pretty_json;
        self
    }

    /// 按扩展名排序渲染，结果非空时以换行结尾
    pub fn render(&self, statistics: &StatisticsMap) -> Result<String> {
        match self.format {
            OutputFormat::Plain => Ok(render_plain(statistics)),
            OutputFormat::Json => render_json(statistics, self.pretty_json),
            OutputFormat::Xml => render_xml(statistics),
        }
    }
}

fn render_plain(statistics: &StatisticsMap) -> String {
    let blocks: Vec<String> = statistics
        .iter()
        .map(|(extension, stats)| plain_block(extension, stats))
        .collect();

    blocks.join("\n")
}

fn plain_block(extension: &str, stats: &FileStatistics) -> String {
    format!(
        "{}:\n文件数量: {}\n字节数: {}\n总行数: {}\n非空行数: {}\n注释行数: {}\n",
        extension,
        stats.file_count,
        stats.byte_count,
        stats.line_count,
        stats.non_empty_line_count,
        stats.comment_line_count,
    )
}

fn render_json(statistics: &StatisticsMap, pretty: bool) -> Result<String> {
    let serialized = if pretty {
        serde_json::to_string_pretty(statistics)
    } else {
        serde_json::to_string(statistics)
    };
    let mut json = serialized.context("序列化 JSON 失败")?;

    json.push('\n');
    Ok(json)
}

fn render_xml(statistics: &StatisticsMap) -> Result<String> {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

    if statistics.is_empty() {
        xml.push_str("<statistics/>\n");
        return Ok(xml);
    }

    xml.push_str("<statistics>\n");
    for (extension, stats) in statistics.iter() {
        write!(
            xml,
            "  <entry>\n    <key>{}</key>\n    <value fileCount=\"{}\" byteCount=\"{}\" lineCount=\"{}\" nonEmptyLineCount=\"{}\" commentLineCount=\"{}\"/>\n  </entry>\n",
            escape_xml(extension),
            stats.file_count,
            stats.byte_count,
            stats.line_count,
            stats.non_empty_line_count,
            stats.comment_line_count,
        )
        .context("序列化 XML 失败")?;
    }
    xml.push_str("</statistics>\n");

    Ok(xml)
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
