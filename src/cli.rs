use clap::Parser;
use std::collections::HashSet;
use std::path::PathBuf;
use anyhow::{anyhow, bail, Context, Result};

use file_stats_cli::{Config, OutputFormat, TraversalConfig};

#[derive(Parser, Debug)]
#[command(name = "file-stats")]
#[command(about = "递归扫描目录，按扩展名统计文件数、字节数、行数和注释行")]
#[command(version)]
pub struct Cli {
    /// 配置文件路径
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 详细输出
    #[arg(long)]
    pub verbose: bool,

    /// 目标目录，首个字符作为前缀会被去掉 (例如 `-/home/me/project`)
    #[arg(allow_hyphen_values = true)]
    pub target: String,

    /// 扫描参数: -recursive -git-ignore -max-depth=N -include-ext=a,b
    /// -exclude-ext=a,b -output=plain|json|xml -threads=N
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub flags: Vec<String>,
}

/// 从单横线参数解析出的选项，未出现的参数保持 `None` 或默认值
#[derive(Debug, Default, PartialEq)]
pub struct FlagOptions {
    pub recursive: bool,
    pub honor_ignore_file: bool,
    pub max_depth: Option<usize>,
    pub include_extensions: HashSet<String>,
    pub exclude_extensions: HashSet<String>,
    pub output_format: Option<OutputFormat>,
    pub threads: Option<usize>,
}

impl Cli {
    /// 把出现在目标目录之后的 `--verbose`、`--config <path>`、`--config=<path>`
    /// 从单横线参数中取出，与写在目标目录之前的效果相同
    pub fn extract_long_options(&mut self) -> Result<()> {
        let mut flags = std::mem::take(&mut self.flags).into_iter();
        let mut remaining = Vec::new();

        while let Some(flag) = flags.next() {
            if let Some(path) = flag.strip_prefix("--config=") {
                self.config = Some(PathBuf::from(path));
                continue;
            }

            match flag.as_str() {
                "--verbose" => self.verbose = true,
                "--config" => {
                    let path = flags
                        .next()
                        .ok_or_else(|| anyhow!("参数缺少取值: --config <path>"))?;
                    self.config = Some(PathBuf::from(path));
                }
                _ => remaining.push(flag),
            }
        }

        self.flags = remaining;
        Ok(())
    }

    /// 目标目录（去掉首字符前缀）
    pub fn target_path(&self) -> Result<PathBuf> {
        let mut chars = self.target.chars();
        chars.next();
        let stripped = chars.as_str();

        if stripped.is_empty() {
            bail!("缺少目标目录: {:?}", self.target);
        }

        Ok(PathBuf::from(stripped))
    }

    /// 以配置文件为默认值，叠加命令行参数得到遍历配置
    pub fn traversal_config(&self, config: &Config) -> Result<TraversalConfig> {
        let options = parse_flags(&self.flags)?;
        let mut traversal = TraversalConfig::new(self.target_path()?, config);

        traversal.recursive = options.recursive;
        traversal.honor_ignore_file = options.honor_ignore_file;
        traversal.max_depth = options.max_depth;
        traversal.include_extensions = options.include_extensions;
        traversal.exclude_extensions = options.exclude_extensions;
        if let Some(format) = options.output_format {
            traversal.output_format = format;
        }
        if let Some(threads) = options.threads {
            traversal.worker_count = threads;
        }

        Ok(traversal)
    }
}

/// 解析单横线参数，无法识别的参数会被忽略
pub fn parse_flags(flags: &[String]) -> Result<FlagOptions> {
    let mut options = FlagOptions::default();

    for flag in flags {
        let (name, value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag.as_str(), None),
        };

        match name {
            "-recursive" => options.recursive = true,
            "-git-ignore" => options.honor_ignore_file = true,
            "-max-depth" => {
                let value = require_value(flag, value)?;
                let depth = value
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("无效的最大深度: {}", flag))?;
                options.max_depth = Some(depth);
            }
            "-include-ext" => {
                options
                    .include_extensions
                    .extend(parse_extension_list(require_value(flag, value)?));
            }
            "-exclude-ext" => {
                options
                    .exclude_extensions
                    .extend(parse_extension_list(require_value(flag, value)?));
            }
            "-output" => {
                let format = require_value(flag, value)?.parse::<OutputFormat>()?;
                options.output_format = Some(format);
            }
            "-threads" => {
                let value = require_value(flag, value)?;
                let threads = value
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|&threads| threads > 0)
                    .ok_or_else(|| anyhow!("无效的线程数: {}", flag))?;
                options.threads = Some(threads);
            }
            _ => tracing::debug!("忽略无法识别的参数: {}", flag),
        }
    }

    Ok(options)
}

fn require_value<'a>(flag: &str, value: Option<&'a str>) -> Result<&'a str> {
    value.ok_or_else(|| anyhow!("参数缺少取值: {} (格式: {}=...)", flag, flag))
}

/// 逗号分隔的扩展名列表，去掉空白、空项和前导的 `.`
fn parse_extension_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(|item| item.trim())
        .map(|item| item.strip_prefix('.').unwrap_or(item))
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}
