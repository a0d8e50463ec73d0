//! 边定义
//!
//! 容量矩阵中非零单元格的只读视图

use crate::types::{Capacity, NodeIndex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 有向边 `from -> to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// 起点
    pub from: NodeIndex,
    /// 终点
    pub to: NodeIndex,
    /// 容量（或流量，取决于来源矩阵）
    pub capacity: Capacity,
}

impl Edge {
    pub fn new(from: NodeIndex, to: NodeIndex, capacity: Capacity) -> Self {
        Self { from, to, capacity }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}: {}", self.from, self.to, self.capacity)
    }
}
