//! 沿增广路径推流

use super::bfs::AugmentingPath;
use crate::error::{Error, Result};
use crate::graph::ResidualGraph;
use crate::types::Capacity;

/// 流量增广器
///
/// 路径必须来自同一残量图状态下的 [`AugmentingPathFinder`](super::AugmentingPathFinder)。
pub struct FlowAugmenter<'a> {
    residual: &'a mut ResidualGraph,
}

impl<'a> FlowAugmenter<'a> {
    pub fn new(residual: &'a mut ResidualGraph) -> Self {
        Self { residual }
    }

    /// 路径瓶颈：路径上残量的最小值
    pub fn bottleneck(&self, path: &AugmentingPath) -> Capacity {
        path.edges()
            .map(|(u, v)| self.residual.get(u, v))
            .min()
            .unwrap_or(0)
    }

    /// 计算瓶颈并沿路径推流，返回推入的流量
    ///
    /// 正向边减去瓶颈，反向边加上瓶颈。任一反向边溢出时不修改残量图。
    pub fn augment(&mut self, path: &AugmentingPath) -> Result<Capacity> {
        let bottleneck = self.bottleneck(path);
        if bottleneck == 0 {
            return Err(Error::MalformedMatrix(
                "增广路径包含残量为零的边".to_string(),
            ));
        }

        // 先检查所有反向边，保证失败时残量图保持原状
        for (u, v) in path.edges() {
            self.residual
                .get(v, u)
                .checked_add(bottleneck)
                .ok_or(Error::CapacityOverflow)?;
        }

        for (u, v) in path.edges() {
            self.residual.checked_sub(u, v, bottleneck)?;
            self.residual.checked_add(v, u, bottleneck)?;
        }

        Ok(bottleneck)
    }
}
