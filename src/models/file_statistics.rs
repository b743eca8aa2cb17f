use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单个文件的统计结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileMetrics {
    /// 文件字节数（来自文件元数据，而非解码后的文本）
    pub byte_count: u64,

    /// 总行数
    pub line_count: u64,

    /// 非空行数
    pub non_empty_line_count: u64,

    /// 注释行数（以 `//` 或 `#` 开头）
    pub comment_line_count: u64,
}

/// 按扩展名累计的统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatistics {
    /// 文件数量
    pub file_count: u64,

    /// 总字节数
    pub byte_count: u64,

    /// 总行数
    pub line_count: u64,

    /// 非空行数
    pub non_empty_line_count: u64,

    /// 注释行数
    pub comment_line_count: u64,
}

impl FileStatistics {
    /// 合并一个文件的统计结果，文件数加一
    pub fn add_file(&mut self, metrics: &FileMetrics) {
        self.file_count += 1;
        self.byte_count += metrics.byte_count;
        self.line_count += metrics.line_count;
        self.non_empty_line_count += metrics.non_empty_line_count;
        self.comment_line_count += metrics.comment_line_count;
    }

    /// 合并另一个累计结果
    pub fn absorb(&mut self, other: &FileStatistics) {
        self.file_count += other.file_count;
        self.byte_count += other.byte_count;
        self.line_count += other.line_count;
        self.non_empty_line_count += other.non_empty_line_count;
        self.comment_line_count += other.comment_line_count;
    }
}

/// 扩展名（不含前导点）到统计信息的映射
///
/// 使用 `BTreeMap`，遍历顺序即扩展名的字典序，输出因此是确定的。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatisticsMap {
    entries: BTreeMap<String, FileStatistics>,
}

impl StatisticsMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并单个文件的结果，首次遇到的扩展名会自动创建条目
    pub fn merge_file(&mut self, extension: &str, metrics: &FileMetrics) {
        match self.entries.get_mut(extension) {
            Some(stats) => stats.add_file(metrics),
            None => {
                let mut stats = FileStatistics::default();
                stats.add_file(metrics);
                self.entries.insert(extension.to_string(), stats);
            }
        }
    }

    /// 合并另一张映射（满足交换律和结合律）
    pub fn merge(&mut self, other: StatisticsMap) {
        for (extension, stats) in other.entries {
            self.entries.entry(extension).or_default().absorb(&stats);
        }
    }

    pub fn get(&self, extension: &str) -> Option<&FileStatistics> {
        self.entries.get(extension)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按扩展名排序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileStatistics)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 所有扩展名的总计
    pub fn totals(&self) -> FileStatistics {
        let mut total = FileStatistics::default();
        for stats in self.entries.values() {
            total.absorb(stats);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(bytes: u64, lines: u64, non_empty: u64, comments: u64) -> FileMetrics {
        FileMetrics {
            byte_count: bytes,
            line_count: lines,
            non_empty_line_count: non_empty,
            comment_line_count: comments,
        }
    }

    #[test]
    fn test_merge_file_creates_entry_lazily() {
        let mut map = StatisticsMap::new();
        assert!(map.is_empty());

        map.merge_file("rs", &metrics(10, 3, 2, 1));
        map.merge_file("rs", &metrics(5, 1, 1, 0));
        map.merge_file("md", &metrics(7, 2, 2, 0));

        assert_eq!(map.len(), 2);
        let rs = map.get("rs").unwrap();
        assert_eq!(rs.file_count, 2);
        assert_eq!(rs.byte_count, 15);
        assert_eq!(rs.line_count, 4);
        assert_eq!(rs.non_empty_line_count, 3);
        assert_eq!(rs.comment_line_count, 1);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let inputs = [
            ("rs", metrics(10, 3, 2, 1)),
            ("md", metrics(4, 1, 1, 0)),
            ("rs", metrics(8, 2, 2, 2)),
            ("toml", metrics(1, 1, 0, 0)),
        ];

        let mut forward = StatisticsMap::new();
        for (ext, m) in inputs.iter() {
            forward.merge_file(ext, m);
        }

        // 拆成两半再合并，顺序颠倒
        let mut left = StatisticsMap::new();
        let mut right = StatisticsMap::new();
        for (ext, m) in inputs.iter().rev().take(2) {
            left.merge_file(ext, m);
        }
        for (ext, m) in inputs.iter().take(2) {
            right.merge_file(ext, m);
        }
        right.merge(left);

        assert_eq!(forward, right);
    }

    #[test]
    fn test_iter_is_sorted_and_totals() {
        let mut map = StatisticsMap::new();
        map.merge_file("txt", &metrics(1, 1, 1, 0));
        map.merge_file("c", &metrics(2, 2, 1, 1));
        map.merge_file("md", &metrics(3, 3, 3, 0));

        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["c", "md", "txt"]);

        let total = map.totals();
        assert_eq!(total.file_count, 3);
        assert_eq!(total.byte_count, 6);
        assert_eq!(total.line_count, 6);
    }
}
