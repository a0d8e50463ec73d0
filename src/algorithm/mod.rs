//! 图算法模块
//!
//! 增广路径搜索、流量增广、Edmonds-Karp 最大流以及流量矩阵推导与校验

mod augment;
mod bfs;
mod flow_matrix;
mod max_flow;

pub use augment::FlowAugmenter;
pub use bfs::{AugmentingPath, AugmentingPathFinder};
pub use flow_matrix::{
    check_conservation, derive_flow_matrix, validate_conservation, ConservationReport,
    NodeImbalance,
};
pub use max_flow::{solve_batch, Augmentation, EdmondsKarp, FlowProblem, MaxFlow};
