//! FlowMatrix - 稠密容量矩阵上的最大流引擎
//!
//! 基于 Edmonds-Karp 算法，支持：
//! - BFS 增广路径搜索与残量图维护
//! - 流量矩阵推导与流量守恒校验
//! - 最小割计算
//! - 交互式编辑边并重新求解

pub mod algorithm;
pub mod cli;
pub mod error;
pub mod graph;
pub mod import;
pub mod metrics;
pub mod types;

// 重导出常用类型
pub use algorithm::{
    derive_flow_matrix, validate_conservation, AugmentingPathFinder, EdmondsKarp, FlowAugmenter,
    MaxFlow,
};
pub use error::{Error, Result};
pub use graph::{CapacityMatrix, Edge, FlowMatrix, Matrix, ResidualGraph};
pub use types::{Capacity, InputFormat, NodeIndex};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
