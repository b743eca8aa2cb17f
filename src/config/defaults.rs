pub struct DefaultConfig;

impl DefaultConfig {
    /// 默认的忽略文件名（位于扫描根目录）
    pub fn default_ignore_file_name() -> String {
        ".gitignore".to_string()
    }

    /// 默认工作线程数，至少为 1
    pub fn default_worker_count() -> usize {
        num_cpus::get().max(1)
    }

    /// 默认配置文件所在的目录名
    pub fn config_dir_name() -> &'static str {
        "file-stats-cli"
    }

    /// 默认配置文件名
    pub fn config_file_name() -> &'static str {
        "config.toml"
    }
}
