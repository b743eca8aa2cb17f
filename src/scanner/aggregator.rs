use std::sync::Mutex;

use crate::models::{FileMetrics, StatisticsMap};

/// 并发安全的统计累加器
///
/// 每个工作线程写入自己的分片（按 rayon 线程下标选择），分片之间没有锁竞争；
/// 线程池之外的调用方共用最后一个分片。所有写入方结束后通过
/// [`StatisticsAggregator::into_statistics`] 消费自身并合并分片，
/// 因此读取只能发生在写入全部完成之后。
pub struct StatisticsAggregator {
    shards: Vec<Mutex<StatisticsMap>>,
}

impl StatisticsAggregator {
    /// 为 `worker_count` 个工作线程创建累加器
    pub fn new(worker_count: usize) -> Self {
        // 额外的一个分片留给线程池之外的调用方
        let shards = (0..worker_count.max(1) + 1)
            .map(|_| Mutex::new(StatisticsMap::new()))
            .collect();

        Self { shards }
    }

    /// 合并单个文件的结果，可以从多个线程并发调用
    pub fn merge_file_result(&self, extension: &str, metrics: &FileMetrics) {
        let fallback = self.shards.len() - 1;
        let index = rayon::current_thread_index()
            .filter(|&index| index < fallback)
            .unwrap_or(fallback);

        // 某个写入方 panic 导致锁中毒时，已写入的计数依然有效
        let mut shard = match self.shards[index].lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        shard.merge_file(extension, metrics);
    }

    /// 合并所有分片，得到最终的统计结果
    pub fn into_statistics(self) -> StatisticsMap {
        self.shards
            .into_iter()
            .map(|shard| match shard.into_inner() {
                Ok(map) => map,
                Err(poisoned) => poisoned.into_inner(),
            })
            .fold(StatisticsMap::new(), |mut total, map| {
                total.merge(map);
                total
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn one_line() -> FileMetrics {
        FileMetrics {
            byte_count: 5,
            line_count: 1,
            non_empty_line_count: 1,
            comment_line_count: 0,
        }
    }

    #[test]
    fn test_merge_from_caller_thread() {
        let aggregator = StatisticsAggregator::new(2);
        aggregator.merge_file_result("rs", &one_line());
        aggregator.merge_file_result("rs", &one_line());

        let stats = aggregator.into_statistics();
        assert_eq!(stats.get("rs").unwrap().file_count, 2);
        assert_eq!(stats.get("rs").unwrap().byte_count, 10);
    }

    #[test]
    fn test_no_lost_updates_in_thread_pool() {
        let workers = 4;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .unwrap();
        let aggregator = StatisticsAggregator::new(workers);

        pool.scope(|scope| {
            for i in 0..1000 {
                let aggregator = &aggregator;
                scope.spawn(move |_| {
                    let extension = if i % 2 == 0 { "even" } else { "odd" };
                    aggregator.merge_file_result(extension, &one_line());
                });
            }
        });

        let stats = aggregator.into_statistics();
        assert_eq!(stats.get("even").unwrap().file_count, 500);
        assert_eq!(stats.get("odd").unwrap().file_count, 500);
        assert_eq!(stats.totals().byte_count, 5000);
    }

    #[test]
    fn test_no_lost_updates_from_plain_threads() {
        let aggregator = Arc::new(StatisticsAggregator::new(1));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let aggregator = aggregator.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        aggregator.merge_file_result("txt", &one_line());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let aggregator = Arc::try_unwrap(aggregator).ok().unwrap();
        let stats = aggregator.into_statistics();
        assert_eq!(stats.get("txt").unwrap().file_count, 800);
        assert_eq!(stats.get("txt").unwrap().line_count, 800);
    }
}
