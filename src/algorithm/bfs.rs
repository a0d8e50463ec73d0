//! 增广路径搜索
//!
//! 在残量图上做广度优先搜索，只沿残量严格为正的边前进。
//! 邻居按节点索引升序访问（即矩阵列序），因此多条最短增广路径并存时
//! 找到的路径是确定的。

use crate::graph::ResidualGraph;
use crate::types::NodeIndex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::VecDeque;

/// 从源点到汇点的一条增广路径
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentingPath {
    /// 路径节点，`nodes[0]` 为源点，最后一个为汇点
    nodes: SmallVec<[NodeIndex; 8]>,
}

impl AugmentingPath {
    /// 根据 BFS 前驱表从汇点回溯到源点
    ///
    /// 汇点未被发现或前驱链断裂时返回 `None`。
    pub fn from_parents(
        parents: &[Option<NodeIndex>],
        source: NodeIndex,
        sink: NodeIndex,
    ) -> Option<Self> {
        if source == sink {
            return None;
        }

        let mut nodes: SmallVec<[NodeIndex; 8]> = SmallVec::new();
        let mut current = sink;
        nodes.push(current);
        while current != source {
            current = (*parents.get(current)?)?;
            nodes.push(current);
            // 前驱链成环说明前驱表不是 BFS 树
            if nodes.len() > parents.len() {
                return None;
            }
        }
        nodes.reverse();
        Some(Self { nodes })
    }

    /// 路径节点序列
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn source(&self) -> NodeIndex {
        self.nodes[0]
    }

    pub fn sink(&self) -> NodeIndex {
        self.nodes[self.nodes.len() - 1]
    }

    /// 路径上的边数
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 路径上的边 `(u, v)`，从源点到汇点
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.nodes.windows(2).map(|w| (w[0], w[1]))
    }
}

/// 增广路径查找器
///
/// 每次调用都重新分配 `visited` 和前驱表，调用之间不共享任何状态。
pub struct AugmentingPathFinder<'a> {
    residual: &'a ResidualGraph,
}

impl<'a> AugmentingPathFinder<'a> {
    pub fn new(residual: &'a ResidualGraph) -> Self {
        Self { residual }
    }

    /// BFS 前驱表：`parents[v]` 为 v 在 BFS 树中的前驱，源点与未访问节点为 `None`
    ///
    /// 汇点被访问后提前结束。源点越界时返回全 `None`。
    pub fn parents(&self, source: NodeIndex, sink: NodeIndex) -> Vec<Option<NodeIndex>> {
        let n = self.residual.size();
        let mut visited = vec![false; n];
        let mut parents = vec![None; n];
        if self.residual.check_index(source).is_err() {
            return parents;
        }
        let mut queue = VecDeque::new();

        visited[source] = true;
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            for (v, &residual) in self.residual.row(u).iter().enumerate() {
                if residual > 0 && !visited[v] {
                    visited[v] = true;
                    parents[v] = Some(u);
                    if v == sink {
                        return parents;
                    }
                    queue.push_back(v);
                }
            }
        }

        parents
    }

    /// 查找一条增广路径
    pub fn find_path(&self, source: NodeIndex, sink: NodeIndex) -> Option<AugmentingPath> {
        let parents = self.parents(source, sink);
        let path = AugmentingPath::from_parents(&parents, source, sink);
        tracing::trace!(source, sink, found = path.is_some(), "bfs");
        path
    }

    /// 残量图中从 source 可达的节点标记，源点越界时全为 `false`
    pub fn reachable_from(&self, source: NodeIndex) -> Vec<bool> {
        let n = self.residual.size();
        let mut visited = vec![false; n];
        if self.residual.check_index(source).is_err() {
            return visited;
        }
        let mut queue = VecDeque::new();

        visited[source] = true;
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            for (v, &residual) in self.residual.row(u).iter().enumerate() {
                if residual > 0 && !visited[v] {
                    visited[v] = true;
                    queue.push_back(v);
                }
            }
        }

        visited
    }
}
