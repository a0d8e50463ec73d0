//! 性能指标收集模块
//!
//! 记录求解次数、增广次数、BFS 次数和耗时，支持快照与 Prometheus 文本导出

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 求解器全局指标
#[derive(Debug)]
pub struct Metrics {
    /// 求解统计
    solve_stats: SolveStats,
    /// 算法内部统计
    search_stats: SearchStats,
    /// 启动时间
    start_time: Instant,
}

/// 求解统计
#[derive(Debug)]
struct SolveStats {
    /// 总求解数
    total_solves: AtomicU64,
    /// 成功求解数
    success_solves: AtomicU64,
    /// 失败求解数
    failed_solves: AtomicU64,
    /// 求解总耗时（微秒）
    total_duration_us: AtomicU64,
    /// 守恒校验失败数
    conservation_failures: AtomicU64,
}

/// 搜索统计
#[derive(Debug)]
struct SearchStats {
    /// 增广次数
    augmentations: AtomicU64,
    /// BFS 次数
    bfs_runs: AtomicU64,
}

/// 可导出的指标快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_solves: u64,
    pub success_solves: u64,
    pub failed_solves: u64,
    pub avg_solve_duration_us: f64,
    pub conservation_failures: u64,

    pub augmentations: u64,
    pub bfs_runs: u64,

    pub uptime_seconds: u64,
}

/// Prometheus 格式指标
#[derive(Debug, Clone)]
pub struct PrometheusMetrics {
    pub content: String,
}

impl Metrics {
    /// 创建新的指标收集器
    pub fn new() -> Self {
        Self {
            solve_stats: SolveStats {
                total_solves: AtomicU64::new(0),
                success_solves: AtomicU64::new(0),
                failed_solves: AtomicU64::new(0),
                total_duration_us: AtomicU64::new(0),
                conservation_failures: AtomicU64::new(0),
            },
            search_stats: SearchStats {
                augmentations: AtomicU64::new(0),
                bfs_runs: AtomicU64::new(0),
            },
            start_time: Instant::now(),
        }
    }

    /// 记录求解开始
    pub fn record_solve_start(&self) -> SolveTimer {
        self.solve_stats.total_solves.fetch_add(1, Ordering::Relaxed);
        SolveTimer::new()
    }

    /// 记录求解完成，返回本次耗时
    pub fn record_solve_complete(&self, timer: SolveTimer, success: bool) -> Duration {
        let duration = timer.elapsed();

        if success {
            self.solve_stats.success_solves.fetch_add(1, Ordering::Relaxed);
        } else {
            self.solve_stats.failed_solves.fetch_add(1, Ordering::Relaxed);
        }

        self.solve_stats
            .total_duration_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);

        duration
    }

    /// 记录一次增广
    pub fn record_augmentation(&self) {
        self.search_stats.augmentations.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录一次 BFS
    pub fn record_bfs(&self) {
        self.search_stats.bfs_runs.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录守恒校验失败
    pub fn record_conservation_failure(&self) {
        self.solve_stats
            .conservation_failures
            .fetch_add(1, Ordering::Relaxed);
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_solves = self.solve_stats.total_solves.load(Ordering::Relaxed);
        let total_duration_us = self.solve_stats.total_duration_us.load(Ordering::Relaxed);

        let avg_solve_duration_us = if total_solves > 0 {
            (total_duration_us as f64) / (total_solves as f64)
        } else {
            0.0
        };

        MetricsSnapshot {
            total_solves,
            success_solves: self.solve_stats.success_solves.load(Ordering::Relaxed),
            failed_solves: self.solve_stats.failed_solves.load(Ordering::Relaxed),
            avg_solve_duration_us,
            conservation_failures: self
                .solve_stats
                .conservation_failures
                .load(Ordering::Relaxed),
            augmentations: self.search_stats.augmentations.load(Ordering::Relaxed),
            bfs_runs: self.search_stats.bfs_runs.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// 导出为 Prometheus 格式
    pub fn to_prometheus(&self) -> PrometheusMetrics {
        let snapshot = self.snapshot();

        let mut content = String::new();
        let mut push = |name: &str, kind: &str, help: &str, value: String| {
            content.push_str(&format!("# HELP flowmatrix_{} {}\n", name, help));
            content.push_str(&format!("# TYPE flowmatrix_{} {}\n", name, kind));
            content.push_str(&format!("flowmatrix_{} {}\n", name, value));
        };

        push(
            "solves_total",
            "counter",
            "Total number of max-flow solves",
            snapshot.total_solves.to_string(),
        );
        push(
            "solves_success_total",
            "counter",
            "Number of successful solves",
            snapshot.success_solves.to_string(),
        );
        push(
            "solves_failed_total",
            "counter",
            "Number of rejected or failed solves",
            snapshot.failed_solves.to_string(),
        );
        push(
            "solve_duration_avg_us",
            "gauge",
            "Average solve duration in microseconds",
            format!("{:.2}", snapshot.avg_solve_duration_us),
        );
        push(
            "conservation_failures_total",
            "counter",
            "Number of derived flow matrices failing conservation",
            snapshot.conservation_failures.to_string(),
        );
        push(
            "augmentations_total",
            "counter",
            "Total augmenting paths applied",
            snapshot.augmentations.to_string(),
        );
        push(
            "bfs_runs_total",
            "counter",
            "Total breadth-first searches over residual graphs",
            snapshot.bfs_runs.to_string(),
        );
        push(
            "uptime_seconds",
            "counter",
            "Process uptime in seconds",
            snapshot.uptime_seconds.to_string(),
        );

        PrometheusMetrics { content }
    }

    /// 重置所有指标
    pub fn reset(&self) {
        self.solve_stats.total_solves.store(0, Ordering::Relaxed);
        self.solve_stats.success_solves.store(0, Ordering::Relaxed);
        self.solve_stats.failed_solves.store(0, Ordering::Relaxed);
        self.solve_stats.total_duration_us.store(0, Ordering::Relaxed);
        self.solve_stats
            .conservation_failures
            .store(0, Ordering::Relaxed);

        self.search_stats.augmentations.store(0, Ordering::Relaxed);
        self.search_stats.bfs_runs.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// 求解计时器
pub struct SolveTimer {
    start: Instant,
}

impl SolveTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// 全局指标实例
static METRICS: once_cell::sync::Lazy<Arc<Metrics>> =
    once_cell::sync::Lazy::new(|| Arc::new(Metrics::new()));

/// 获取全局指标实例
pub fn global_metrics() -> Arc<Metrics> {
    METRICS.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_snapshot() {
        let metrics = Metrics::new();

        let timer = metrics.record_solve_start();
        std::thread::sleep(Duration::from_millis(2));
        let elapsed = metrics.record_solve_complete(timer, true);
        assert!(elapsed >= Duration::from_millis(2));

        let timer = metrics.record_solve_start();
        metrics.record_solve_complete(timer, false);

        metrics.record_bfs();
        metrics.record_bfs();
        metrics.record_augmentation();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_solves, 2);
        assert_eq!(snapshot.success_solves, 1);
        assert_eq!(snapshot.failed_solves, 1);
        assert_eq!(snapshot.bfs_runs, 2);
        assert_eq!(snapshot.augmentations, 1);
        assert!(snapshot.avg_solve_duration_us >= 1000.0);
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = Metrics::new();
        metrics.record_solve_start();
        metrics.record_augmentation();

        let prom = metrics.to_prometheus();
        assert!(prom.content.contains("flowmatrix_solves_total 1"));
        assert!(prom.content.contains("flowmatrix_augmentations_total 1"));
        assert!(prom.content.contains("# TYPE flowmatrix_bfs_runs_total counter"));
    }

    #[test]
    fn test_reset() {
        let metrics = Metrics::new();
        metrics.record_solve_start();
        metrics.record_conservation_failure();
        metrics.reset();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_solves, 0);
        assert_eq!(snapshot.conservation_failures, 0);
    }
}
