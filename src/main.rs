mod cli;

use std::io::Write;
use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use file_stats_cli::{collect_statistics, Config, ResultFormatter};

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    cli.extract_long_options()?;

    // 日志输出到 stderr，stdout 只用于统计报告
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // 加载配置
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_file(config_path)?
    } else {
        Config::load_or_default()?
    };

    let traversal = cli.traversal_config(&config)?;
    let formatter = ResultFormatter::new(traversal.output_format)
        .with_pretty_json(config.output.pretty_json);

    let outcome = collect_statistics(traversal)?;
    let report = formatter.render(&outcome.statistics)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(report.as_bytes())
        .and_then(|_| stdout.flush())
        .context("无法写入标准输出")?;

    Ok(())
}
