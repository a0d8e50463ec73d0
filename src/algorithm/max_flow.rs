//! 最大流算法
//!
//! 实现 Edmonds-Karp 算法（基于 BFS 的 Ford-Fulkerson），
//! 在稠密容量矩阵上计算源点到汇点的最大流

use super::augment::FlowAugmenter;
use super::bfs::{AugmentingPath, AugmentingPathFinder};
use super::flow_matrix::{check_conservation, derive_flow_matrix};
use crate::error::{Error, Result};
use crate::graph::{CapacityMatrix, Edge, FlowMatrix, ResidualGraph};
use crate::metrics::global_metrics;
use crate::types::{Capacity, NodeIndex};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// 一次增广记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Augmentation {
    /// 增广路径
    pub path: AugmentingPath,
    /// 本次推入的流量
    pub bottleneck: Capacity,
}

/// 最大流结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxFlow {
    /// 最大流量值
    pub value: Capacity,
    /// 每条边的实际流量
    pub flow: FlowMatrix,
    /// 最终残量图
    pub residual: ResidualGraph,
    /// 最小割的源侧节点，升序
    pub source_side: Vec<NodeIndex>,
    /// 最小割边（源侧指向汇侧的原始边），容量之和等于 `value`
    pub min_cut_edges: Vec<Edge>,
    /// 增广次数
    pub augmentations: usize,
    /// 增广路径明细（需开启路径记录）
    pub paths: Vec<Augmentation>,
    /// 流量矩阵是否满足守恒
    pub conservation_valid: bool,
    /// 求解耗时（微秒）
    pub elapsed_us: u64,
}

impl MaxFlow {
    /// 实际流量非零的边
    pub fn flow_edges(&self) -> Vec<Edge> {
        self.flow.edges().collect()
    }
}

/// 单个最大流问题，用于批量求解
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowProblem {
    pub capacity: CapacityMatrix,
    pub source: NodeIndex,
    pub sink: NodeIndex,
}

impl FlowProblem {
    pub fn new(capacity: CapacityMatrix, source: NodeIndex, sink: NodeIndex) -> Self {
        Self {
            capacity,
            source,
            sink,
        }
    }
}

/// 增广主循环的产物
struct Run {
    residual: ResidualGraph,
    value: Capacity,
    augmentations: usize,
    paths: Vec<Augmentation>,
}

/// Edmonds-Karp 最大流算法
///
/// 每次调用独占一份新建的残量图；上一次调用留下的残量图只用于读取，
/// 不影响下一次计算。
#[derive(Debug, Default)]
pub struct EdmondsKarp {
    /// 是否记录每条增广路径
    record_paths: bool,
    /// 最近一次成功计算的残量图
    residual: Option<ResidualGraph>,
}

impl EdmondsKarp {
    /// 创建算法实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置是否记录增广路径
    pub fn with_path_recording(mut self, record: bool) -> Self {
        self.record_paths = record;
        self
    }

    /// 计算从 source 到 sink 的最大流值
    ///
    /// 成功后可通过 [`residual_graph`](Self::residual_graph) 取得最终残量图。
    pub fn compute_max_flow(
        &mut self,
        capacity: &CapacityMatrix,
        source: NodeIndex,
        sink: NodeIndex,
    ) -> Result<Capacity> {
        self.residual = None;
        let metrics = global_metrics();
        let timer = metrics.record_solve_start();

        let run = self.run(capacity, source, sink);
        metrics.record_solve_complete(timer, run.is_ok());

        let run = run?;
        let value = run.value;
        self.residual = Some(run.residual);
        Ok(value)
    }

    /// 最近一次成功计算后的残量图
    pub fn residual_graph(&self) -> Option<&ResidualGraph> {
        self.residual.as_ref()
    }

    /// 计算最大流并推导流量矩阵、最小割和守恒校验结果
    pub fn solve(
        &mut self,
        capacity: &CapacityMatrix,
        source: NodeIndex,
        sink: NodeIndex,
    ) -> Result<MaxFlow> {
        self.residual = None;
        let metrics = global_metrics();
        let timer = metrics.record_solve_start();

        let result = self.run(capacity, source, sink).and_then(|run| {
            let flow = derive_flow_matrix(capacity, &run.residual)?;
            let conservation_valid = check_conservation(&flow, source, sink)?.is_valid();
            Ok((run, flow, conservation_valid))
        });
        let elapsed = metrics.record_solve_complete(timer, result.is_ok());
        let (run, flow, conservation_valid) = result?;

        if !conservation_valid {
            metrics.record_conservation_failure();
            tracing::warn!(source, sink, "流量矩阵不满足守恒");
        }

        let reachable = AugmentingPathFinder::new(&run.residual).reachable_from(source);
        let source_side: Vec<NodeIndex> = reachable
            .iter()
            .enumerate()
            .filter(|&(_, &r)| r)
            .map(|(i, _)| i)
            .collect();
        let min_cut_edges: Vec<Edge> = capacity
            .edges()
            .filter(|e| reachable[e.from] && !reachable[e.to])
            .collect();

        self.residual = Some(run.residual.clone());

        Ok(MaxFlow {
            value: run.value,
            flow,
            residual: run.residual,
            source_side,
            min_cut_edges,
            augmentations: run.augmentations,
            paths: run.paths,
            conservation_valid,
            elapsed_us: elapsed.as_micros() as u64,
        })
    }

    /// 校验输入
    fn validate(capacity: &CapacityMatrix, source: NodeIndex, sink: NodeIndex) -> Result<()> {
        capacity.check_index(source)?;
        capacity.check_index(sink)?;
        if source == sink {
            return Err(Error::SameSourceSink(source));
        }
        Ok(())
    }

    /// 增广主循环：反复 BFS 找增广路径，直到不存在为止
    fn run(&self, capacity: &CapacityMatrix, source: NodeIndex, sink: NodeIndex) -> Result<Run> {
        Self::validate(capacity, source, sink)?;

        let metrics = global_metrics();
        let mut residual = capacity.clone();
        let mut value: Capacity = 0;
        let mut augmentations = 0;
        let mut paths = Vec::new();

        loop {
            metrics.record_bfs();
            let path = match AugmentingPathFinder::new(&residual).find_path(source, sink) {
                Some(path) => path,
                None => break,
            };

            let bottleneck = FlowAugmenter::new(&mut residual).augment(&path)?;
            value = value
                .checked_add(bottleneck)
                .ok_or(Error::CapacityOverflow)?;
            augmentations += 1;
            metrics.record_augmentation();

            tracing::debug!(path = ?path.nodes(), bottleneck, total = value, "增广");

            if self.record_paths {
                paths.push(Augmentation { path, bottleneck });
            }
        }

        tracing::info!(
            nodes = capacity.size(),
            source,
            sink,
            value,
            augmentations,
            "最大流计算完成"
        );

        Ok(Run {
            residual,
            value,
            augmentations,
            paths,
        })
    }
}

/// 并行求解多个相互独立的最大流问题，结果顺序与输入一致
pub fn solve_batch(problems: &[FlowProblem], record_paths: bool) -> Vec<Result<MaxFlow>> {
    problems
        .par_iter()
        .map(|p| {
            EdmondsKarp::new()
                .with_path_recording(record_paths)
                .solve(&p.capacity, p.source, p.sink)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::validate_conservation;
    use crate::graph::Matrix;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn matrix(rows: Vec<Vec<Capacity>>) -> CapacityMatrix {
        Matrix::from_rows(rows).unwrap()
    }

    fn create_flow_graph() -> CapacityMatrix {
        //     10       10
        // S -----> A -----> T
        // |        ^        ^
        // |5       |5       |
        // v        |        |
        // B -----> C ------>|
        //     10       10
        //
        // S=0, A=1, B=2, C=3, T=4
        let mut m = Matrix::zeros(5);
        m.add_edge(0, 1, 10).unwrap();
        m.add_edge(0, 2, 5).unwrap();
        m.add_edge(1, 4, 10).unwrap();
        m.add_edge(2, 3, 10).unwrap();
        m.add_edge(3, 1, 5).unwrap();
        m.add_edge(3, 4, 10).unwrap();
        m
    }

    /// 枚举所有含源点、不含汇点的节点子集求最小割
    fn brute_force_min_cut(capacity: &CapacityMatrix, source: usize, sink: usize) -> u64 {
        let n = capacity.size();
        let mut best = u64::MAX;
        for mask in 0u32..(1 << n) {
            if mask & (1 << source) == 0 || mask & (1 << sink) != 0 {
                continue;
            }
            let mut cut = 0;
            for u in 0..n {
                for v in 0..n {
                    if mask & (1 << u) != 0 && mask & (1 << v) == 0 {
                        cut += capacity.get(u, v);
                    }
                }
            }
            best = best.min(cut);
        }
        best
    }

    fn random_matrix(rng: &mut StdRng, n: usize, density: f64, max: u64) -> CapacityMatrix {
        let mut m = Matrix::zeros(n);
        for u in 0..n {
            for v in 0..n {
                if u != v && rng.gen_bool(density) {
                    m.set(u, v, rng.gen_range(1..=max));
                }
            }
        }
        m
    }

    #[test]
    fn test_four_node_example() {
        let capacity = matrix(vec![
            vec![0, 3, 2, 0],
            vec![0, 0, 0, 2],
            vec![0, 0, 0, 3],
            vec![0, 0, 0, 0],
        ]);
        let mut algo = EdmondsKarp::new();
        assert_eq!(algo.compute_max_flow(&capacity, 0, 3).unwrap(), 4);

        let residual = algo.residual_graph().unwrap();
        let flow = derive_flow_matrix(&capacity, residual).unwrap();
        assert_eq!(
            flow.to_rows(),
            vec![
                vec![0, 2, 2, 0],
                vec![0, 0, 0, 2],
                vec![0, 0, 0, 2],
                vec![0, 0, 0, 0],
            ]
        );
        assert!(validate_conservation(&flow, 0, 3));
    }

    #[test]
    fn test_single_edge() {
        let capacity = matrix(vec![vec![0, 5], vec![0, 0]]);
        let mut algo = EdmondsKarp::new();
        assert_eq!(algo.compute_max_flow(&capacity, 0, 1).unwrap(), 5);

        let residual = algo.residual_graph().unwrap();
        assert_eq!(residual.get(0, 1), 0);
        assert_eq!(residual.get(1, 0), 5);
    }

    #[test]
    fn test_all_zero_matrix() {
        let capacity = Matrix::zeros(3);
        let result = EdmondsKarp::new().solve(&capacity, 0, 2).unwrap();
        assert_eq!(result.value, 0);
        assert_eq!(result.augmentations, 0);
        assert!(result.conservation_valid);
        assert!(validate_conservation(&result.flow, 0, 2));
    }

    #[test]
    fn test_disconnected_leaves_residual_unchanged() {
        let capacity = matrix(vec![
            vec![0, 4, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 7],
            vec![0, 0, 0, 0],
        ]);
        let mut algo = EdmondsKarp::new();
        assert_eq!(algo.compute_max_flow(&capacity, 0, 3).unwrap(), 0);
        assert_eq!(algo.residual_graph().unwrap(), &capacity);
    }

    #[test]
    fn test_max_flow_basic() {
        let capacity = create_flow_graph();
        let result = EdmondsKarp::new().solve(&capacity, 0, 4).unwrap();

        // 10 经 A, 5 经 B-C
        assert_eq!(result.value, 15);
        assert!(result.conservation_valid);
        // 两条源点出边均饱和
        assert_eq!(result.source_side, vec![0]);
        assert_eq!(result.min_cut_edges, vec![Edge::new(0, 1, 10), Edge::new(0, 2, 5)]);
        let cut: u64 = result.min_cut_edges.iter().map(|e| e.capacity).sum();
        assert_eq!(cut, 15);
    }

    #[test]
    fn test_flow_cancellation_through_reverse_edge() {
        // s=0, a=1, b=2, d=3, c=4, t=5，单位容量
        // 第一条最短路 s-a-d-t 占用 a->d，第二条必须经 d->a 反向边撤销
        let mut capacity = Matrix::zeros(6);
        for (u, v) in [(0, 1), (0, 2), (1, 3), (1, 4), (2, 3), (3, 5), (4, 5)] {
            capacity.add_edge(u, v, 1).unwrap();
        }

        let result = EdmondsKarp::new()
            .with_path_recording(true)
            .solve(&capacity, 0, 5)
            .unwrap();

        assert_eq!(result.value, 2);
        assert_eq!(result.paths.len(), 2);
        assert_eq!(result.paths[0].path.nodes(), &[0, 1, 3, 5]);
        assert_eq!(result.paths[1].path.nodes(), &[0, 2, 3, 1, 4, 5]);
        assert_eq!(result.flow.get(1, 3), 0);
        assert_eq!(result.flow.get(1, 4), 1);
        assert_eq!(result.flow.get(2, 3), 1);
        assert!(result.conservation_valid);
    }

    #[test]
    fn test_paths_not_recorded_by_default() {
        let result = EdmondsKarp::new().solve(&create_flow_graph(), 0, 4).unwrap();
        assert!(result.paths.is_empty());
        assert!(result.augmentations >= 2);
    }

    #[test]
    fn test_invalid_inputs() {
        let capacity = Matrix::zeros(3);
        let mut algo = EdmondsKarp::new();

        assert!(matches!(
            algo.compute_max_flow(&capacity, 3, 0),
            Err(Error::InvalidIndex { index: 3, size: 3 })
        ));
        assert!(matches!(
            algo.compute_max_flow(&capacity, 0, 9),
            Err(Error::InvalidIndex { index: 9, .. })
        ));
        assert!(matches!(
            algo.compute_max_flow(&capacity, 1, 1),
            Err(Error::SameSourceSink(1))
        ));
        assert!(matches!(
            algo.compute_max_flow(&Matrix::zeros(0), 0, 0),
            Err(Error::InvalidIndex { .. })
        ));
        assert!(algo.residual_graph().is_none());
    }

    #[test]
    fn test_total_flow_overflow() {
        let capacity = matrix(vec![
            vec![0, u64::MAX, u64::MAX, 0],
            vec![0, 0, 0, u64::MAX],
            vec![0, 0, 0, u64::MAX],
            vec![0, 0, 0, 0],
        ]);
        let err = EdmondsKarp::new().compute_max_flow(&capacity, 0, 3).unwrap_err();
        assert!(matches!(err, Error::CapacityOverflow));
    }

    #[test]
    fn test_recompute_after_edit() {
        let mut capacity = create_flow_graph();
        let mut algo = EdmondsKarp::new();
        assert_eq!(algo.compute_max_flow(&capacity, 0, 4).unwrap(), 15);

        // A 不再有出边，只剩 S-B-C-T
        capacity.remove_edge(1, 4).unwrap();
        assert_eq!(algo.compute_max_flow(&capacity, 0, 4).unwrap(), 5);

        capacity.add_edge(1, 4, 3).unwrap();
        assert_eq!(algo.compute_max_flow(&capacity, 0, 4).unwrap(), 8);

        capacity.set_capacity(0, 2, 20).unwrap();
        assert_eq!(algo.compute_max_flow(&capacity, 0, 4).unwrap(), 13);
    }

    #[test]
    fn test_matches_brute_force_min_cut() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let n = rng.gen_range(2..=7);
            let capacity = random_matrix(&mut rng, n, 0.45, 9);
            let source = rng.gen_range(0..n);
            let sink = (source + rng.gen_range(1..n)) % n;

            let result = EdmondsKarp::new().solve(&capacity, source, sink).unwrap();
            assert_eq!(result.value, brute_force_min_cut(&capacity, source, sink));
            assert!(result.conservation_valid);

            let cut: u64 = result.min_cut_edges.iter().map(|e| e.capacity).sum();
            assert_eq!(cut, result.value);
        }
    }

    #[test]
    fn test_residual_pairs_preserved() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let n = rng.gen_range(2..=8);
            let capacity = random_matrix(&mut rng, n, 0.5, 20);
            let mut algo = EdmondsKarp::new();
            algo.compute_max_flow(&capacity, 0, n - 1).unwrap();
            let residual = algo.residual_graph().unwrap();
            for u in 0..n {
                for v in 0..n {
                    assert_eq!(
                        residual.get(u, v) + residual.get(v, u),
                        capacity.get(u, v) + capacity.get(v, u)
                    );
                }
            }
        }
    }

    #[test]
    fn test_monotone_in_capacity() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let n = rng.gen_range(3..=7);
            let mut capacity = random_matrix(&mut rng, n, 0.4, 10);
            let before = EdmondsKarp::new().compute_max_flow(&capacity, 0, n - 1).unwrap();

            let u = rng.gen_range(0..n);
            let v = rng.gen_range(0..n);
            let bumped = capacity.get(u, v) + rng.gen_range(1..=5);
            capacity.set(u, v, bumped);
            let after = EdmondsKarp::new().compute_max_flow(&capacity, 0, n - 1).unwrap();

            assert!(after >= before, "{} -> {}", before, after);
        }
    }

    #[test]
    fn test_solve_batch_keeps_order() {
        let problems = vec![
            FlowProblem::new(create_flow_graph(), 0, 4),
            FlowProblem::new(matrix(vec![vec![0, 5], vec![0, 0]]), 0, 1),
            FlowProblem::new(Matrix::zeros(2), 0, 0),
        ];
        let results = solve_batch(&problems, false);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().value, 15);
        assert_eq!(results[1].as_ref().unwrap().value, 5);
        assert!(matches!(results[2], Err(Error::SameSourceSink(0))));
    }

    #[test]
    fn test_max_flow_serializes() {
        let result = EdmondsKarp::new()
            .with_path_recording(true)
            .solve(&matrix(vec![vec![0, 5], vec![0, 0]]), 0, 1)
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["value"], 5);
        assert_eq!(json["flow"], serde_json::json!([[0, 5], [0, 0]]));
        assert_eq!(json["paths"][0]["path"]["nodes"], serde_json::json!([0, 1]));
    }
}
