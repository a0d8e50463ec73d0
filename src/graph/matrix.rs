//! 稠密矩阵
//!
//! `n×n` 非负整数矩阵，按行连续存储。容量矩阵、残量图和流量矩阵共用此结构。

use super::edge::Edge;
use crate::error::{Error, Result};
use crate::types::{Capacity, NodeIndex};
use serde::{Deserialize, Serialize};

/// `n×n` 稠密矩阵
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<Capacity>>", try_from = "Vec<Vec<Capacity>>")]
pub struct Matrix {
    /// 节点数
    size: usize,
    /// 行优先存储，长度 `size * size`
    cells: Vec<Capacity>,
}

/// 原始容量矩阵，`capacity[u][v] == 0` 表示无边
pub type CapacityMatrix = Matrix;

/// 残量图
pub type ResidualGraph = Matrix;

/// 每条边上实际通过的流量
pub type FlowMatrix = Matrix;

impl Matrix {
    /// 创建全零矩阵
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// 从行数据构建，要求为方阵
    pub fn from_rows(rows: Vec<Vec<Capacity>>) -> Result<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(Error::MalformedMatrix(format!(
                    "第 {} 行有 {} 列, 期望 {} 列",
                    i,
                    row.len(),
                    size
                )));
            }
            cells.extend(row);
        }
        Ok(Self { size, cells })
    }

    /// 节点数 n
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// 检查节点索引是否在 `[0, n)` 内
    pub fn check_index(&self, index: NodeIndex) -> Result<()> {
        if index < self.size {
            Ok(())
        } else {
            Err(Error::InvalidIndex {
                index,
                size: self.size,
            })
        }
    }

    #[inline]
    fn offset(&self, u: NodeIndex, v: NodeIndex) -> usize {
        u * self.size + v
    }

    /// 读取单元格，越界时 panic
    #[inline]
    pub fn get(&self, u: NodeIndex, v: NodeIndex) -> Capacity {
        self.cells[self.offset(u, v)]
    }

    /// 写入单元格，越界时 panic
    #[inline]
    pub fn set(&mut self, u: NodeIndex, v: NodeIndex, value: Capacity) {
        let offset = self.offset(u, v);
        self.cells[offset] = value;
    }

    /// `cell += amount`，溢出时返回错误且不修改矩阵
    pub fn checked_add(&mut self, u: NodeIndex, v: NodeIndex, amount: Capacity) -> Result<()> {
        let offset = self.offset(u, v);
        self.cells[offset] = self.cells[offset]
            .checked_add(amount)
            .ok_or(Error::CapacityOverflow)?;
        Ok(())
    }

    /// `cell -= amount`，结果为负时返回错误且不修改矩阵
    pub fn checked_sub(&mut self, u: NodeIndex, v: NodeIndex, amount: Capacity) -> Result<()> {
        let offset = self.offset(u, v);
        self.cells[offset] = self.cells[offset]
            .checked_sub(amount)
            .ok_or_else(|| {
                Error::MalformedMatrix(format!("单元格 ({}, {}) 将变为负数", u, v))
            })?;
        Ok(())
    }

    /// 第 u 行
    pub fn row(&self, u: NodeIndex) -> &[Capacity] {
        let start = u * self.size;
        &self.cells[start..start + self.size]
    }

    /// 按行迭代
    pub fn rows(&self) -> impl Iterator<Item = &[Capacity]> {
        // chunks(0) 会 panic，空矩阵直接返回空迭代器
        self.cells.chunks(self.size.max(1))
    }

    /// 转为嵌套行数组
    pub fn to_rows(&self) -> Vec<Vec<Capacity>> {
        self.rows().map(|r| r.to_vec()).collect()
    }

    /// 第 u 行之和（u 的总出量）
    pub fn row_sum(&self, u: NodeIndex) -> u128 {
        self.row(u).iter().map(|&c| c as u128).sum()
    }

    /// 第 v 列之和（v 的总入量）
    pub fn column_sum(&self, v: NodeIndex) -> u128 {
        (0..self.size).map(|u| self.get(u, v) as u128).sum()
    }

    /// 所有非零单元格，按 (行, 列) 升序
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(move |(i, &c)| Edge::new(i / size, i % size, c))
    }

    /// 非零单元格数
    pub fn edge_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    /// 最大单元格值
    pub fn max_capacity(&self) -> Capacity {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    fn check_edge_endpoints(&self, from: NodeIndex, to: NodeIndex) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Err(Error::SelfLoop(from));
        }
        Ok(())
    }

    /// 添加新边，边已存在（容量非零）时失败
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, capacity: Capacity) -> Result<()> {
        self.check_edge_endpoints(from, to)?;
        if self.get(from, to) != 0 {
            return Err(Error::EdgeExists { from, to });
        }
        self.set(from, to, capacity);
        Ok(())
    }

    /// 删除边，返回原容量
    pub fn remove_edge(&mut self, from: NodeIndex, to: NodeIndex) -> Result<Capacity> {
        self.check_edge_endpoints(from, to)?;
        let old = self.get(from, to);
        if old == 0 {
            return Err(Error::EdgeNotFound { from, to });
        }
        self.set(from, to, 0);
        Ok(old)
    }

    /// 修改已有边的容量，返回原容量
    pub fn set_capacity(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        capacity: Capacity,
    ) -> Result<Capacity> {
        self.check_edge_endpoints(from, to)?;
        let old = self.get(from, to);
        if old == 0 {
            return Err(Error::EdgeNotFound { from, to });
        }
        self.set(from, to, capacity);
        Ok(old)
    }

    /// 整行写入 `u` 的出边容量，对角线单元格必须为 0
    pub fn set_row(&mut self, u: NodeIndex, capacities: &[Capacity]) -> Result<()> {
        self.check_index(u)?;
        if capacities.len() != self.size {
            return Err(Error::MalformedMatrix(format!(
                "第 {} 行需要 {} 个容量, 实际 {} 个",
                u,
                self.size,
                capacities.len()
            )));
        }
        if capacities[u] != 0 {
            return Err(Error::SelfLoop(u));
        }
        let start = self.offset(u, 0);
        self.cells[start..start + self.size].copy_from_slice(capacities);
        Ok(())
    }
}

impl TryFrom<Vec<Vec<Capacity>>> for Matrix {
    type Error = Error;

    fn try_from(rows: Vec<Vec<Capacity>>) -> Result<Self> {
        Matrix::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<Capacity>> {
    fn from(m: Matrix) -> Self {
        m.to_rows()
    }
}
