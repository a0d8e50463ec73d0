//! 图核心模块
//!
//! 定义稠密容量矩阵和边视图

mod edge;
mod matrix;

pub use edge::Edge;
pub use matrix::{CapacityMatrix, FlowMatrix, Matrix, ResidualGraph};
