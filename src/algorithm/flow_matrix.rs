//! 流量矩阵推导与流量守恒校验

use crate::error::{Error, Result};
use crate::graph::{CapacityMatrix, FlowMatrix, Matrix, ResidualGraph};
use crate::types::NodeIndex;
use serde::{Deserialize, Serialize};

/// 由原容量矩阵和最终残量图推导每条边的实际流量
///
/// `flow[u][v] = max(0, capacity[u][v] - residual[u][v])`。两矩阵尺寸不同时失败。
pub fn derive_flow_matrix(
    capacity: &CapacityMatrix,
    residual: &ResidualGraph,
) -> Result<FlowMatrix> {
    if capacity.size() != residual.size() {
        return Err(Error::MalformedMatrix(format!(
            "容量矩阵为 {0}×{0}, 残量图为 {1}×{1}",
            capacity.size(),
            residual.size()
        )));
    }

    let n = capacity.size();
    let mut flow = Matrix::zeros(n);
    for u in 0..n {
        for v in 0..n {
            flow.set(u, v, capacity.get(u, v).saturating_sub(residual.get(u, v)));
        }
    }
    Ok(flow)
}

/// 单个节点的流入/流出不平衡
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeImbalance {
    pub node: NodeIndex,
    pub inflow: u128,
    pub outflow: u128,
}

/// 守恒校验报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConservationReport {
    /// 源点总流出
    pub source_outflow: u128,
    /// 汇点总流入
    pub sink_inflow: u128,
    /// 流入不等于流出的中间节点，按索引升序
    pub violations: Vec<NodeImbalance>,
}

impl ConservationReport {
    /// 源点流出等于汇点流入，且所有中间节点平衡
    pub fn is_valid(&self) -> bool {
        self.source_outflow == self.sink_inflow && self.violations.is_empty()
    }
}

/// 逐节点检查流量守恒
pub fn check_conservation(
    flow: &FlowMatrix,
    source: NodeIndex,
    sink: NodeIndex,
) -> Result<ConservationReport> {
    flow.check_index(source)?;
    flow.check_index(sink)?;

    let violations = (0..flow.size())
        .filter(|&node| node != source && node != sink)
        .filter_map(|node| {
            let inflow = flow.column_sum(node);
            let outflow = flow.row_sum(node);
            (inflow != outflow).then_some(NodeImbalance {
                node,
                inflow,
                outflow,
            })
        })
        .collect();

    Ok(ConservationReport {
        source_outflow: flow.row_sum(source),
        sink_inflow: flow.column_sum(sink),
        violations,
    })
}

/// 流量守恒校验，只返回是否通过
///
/// 索引越界视为不通过。
pub fn validate_conservation(flow: &FlowMatrix, source: NodeIndex, sink: NodeIndex) -> bool {
    match check_conservation(flow, source, sink) {
        Ok(report) => {
            if !report.is_valid() {
                tracing::warn!(
                    source_outflow = %report.source_outflow,
                    sink_inflow = %report.sink_inflow,
                    violations = report.violations.len(),
                    "流量守恒校验失败"
                );
            }
            report.is_valid()
        }
        Err(e) => {
            tracing::warn!(error = %e, "流量守恒校验参数无效");
            false
        }
    }
}
