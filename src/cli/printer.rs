//! 结果打印器
//!
//! 提供矩阵表格、边列表和求解结果的文本输出

use crate::algorithm::MaxFlow;
use crate::graph::{Edge, Matrix};
use crate::metrics::MetricsSnapshot;
use crate::types::NodeIndex;
use colored::Colorize;
use prettytable::{format, row, Cell, Row, Table};

/// 打印模式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrintMode {
    /// 表格模式
    Table,
    /// 纯文本模式（每行空格分隔）
    Plain,
}

/// 结果打印器
#[derive(Debug)]
pub struct Printer {
    mode: PrintMode,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(PrintMode::Table)
    }
}

impl Printer {
    pub fn new(mode: PrintMode) -> Self {
        Self { mode }
    }

    /// 设置打印模式
    pub fn set_mode(&mut self, mode: PrintMode) {
        self.mode = mode;
    }

    /// 打印矩阵
    pub fn format_matrix(&self, matrix: &Matrix) -> String {
        match self.mode {
            PrintMode::Table => self.format_table(matrix),
            PrintMode::Plain => crate::import::format_text(matrix),
        }
    }

    /// 表格格式：首行为列索引，首列为行索引
    fn format_table(&self, matrix: &Matrix) -> String {
        if matrix.is_empty() {
            return "(空矩阵)\n".to_string();
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        let mut header = vec![Cell::new("")];
        header.extend((0..matrix.size()).map(|v| Cell::new(&v.to_string())));
        table.set_titles(Row::new(header));

        for (u, row_data) in matrix.rows().enumerate() {
            let mut cells = vec![Cell::new(&u.to_string())];
            cells.extend(row_data.iter().map(|c| Cell::new(&c.to_string())));
            table.add_row(Row::new(cells));
        }

        table.to_string()
    }

    /// 边列表：每行 `u - v: c`
    pub fn format_edges(&self, edges: &[Edge]) -> String {
        let mut output = String::new();
        for edge in edges {
            output.push_str(&format!("{}\n", edge));
        }
        output
    }

    /// 打印求解结果摘要、流量矩阵和流量边
    pub fn format_result(&self, result: &MaxFlow, source: NodeIndex, sink: NodeIndex) -> String {
        let mut output = format!(
            "\n从源点 {} 到汇点 {} 的最大流: {}\n",
            source,
            sink,
            result.value.to_string().bold()
        );
        output.push_str(&format!("耗时: {} 微秒\n", result.elapsed_us));

        let verdict = if result.conservation_valid {
            "通过".green()
        } else {
            "未通过".red()
        };
        output.push_str(&format!("流量守恒校验: {}\n", verdict));

        output.push_str(&format!(
            "最小割源侧: {:?}, 割边数: {}\n",
            result.source_side,
            result.min_cut_edges.len()
        ));

        if !result.paths.is_empty() {
            output.push_str("\n增广路径:\n");
            for (i, aug) in result.paths.iter().enumerate() {
                output.push_str(&format!(
                    "  {}: {:?} (+{})\n",
                    i + 1,
                    aug.path.nodes(),
                    aug.bottleneck
                ));
            }
        }

        output.push_str("\n流量矩阵:\n");
        output.push_str(&self.format_matrix(&result.flow));
        output.push('\n');
        output.push_str(&self.format_edges(&result.flow_edges()));
        output
    }

    /// 打印指标
    pub fn format_metrics(&self, snapshot: &MetricsSnapshot) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Metric", "Value"]);
        table.add_row(row!["Solves", snapshot.total_solves.to_string()]);
        table.add_row(row!["Succeeded", snapshot.success_solves.to_string()]);
        table.add_row(row!["Failed", snapshot.failed_solves.to_string()]);
        table.add_row(row![
            "Avg Duration (us)",
            format!("{:.2}", snapshot.avg_solve_duration_us)
        ]);
        table.add_row(row!["Augmentations", snapshot.augmentations.to_string()]);
        table.add_row(row!["BFS Runs", snapshot.bfs_runs.to_string()]);
        table.add_row(row![
            "Conservation Failures",
            snapshot.conservation_failures.to_string()
        ]);
        table.to_string()
    }

    /// 打印帮助信息
    pub fn help_text() -> String {
        r#"
═══════════════════════════════════════════════════════════════
                   FlowMatrix 控制台命令
═══════════════════════════════════════════════════════════════

  help, h, ?               显示帮助
  quit, exit, q            退出程序

  show                     显示当前容量矩阵
  solve                    重新计算最大流

  add <u> <v> <容量>       添加边 (边必须不存在)
  del <u> <v>              删除边
  set <u> <v> <容量>       修改已有边的容量
  row <u> <c0> <c1> ...    逐格写入节点 u 的全部出边容量
                           编辑后自动重新计算

  source <n>               设置源点
  sink <n>                 设置汇点
  paths on|off             是否显示增广路径
  mode table|plain         矩阵显示模式
  save <文件> [text|json]  保存容量矩阵
  stats                    显示求解统计

═══════════════════════════════════════════════════════════════
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::EdmondsKarp;

    #[test]
    fn test_plain_matrix() {
        let printer = Printer::new(PrintMode::Plain);
        let m = Matrix::from_rows(vec![vec![0, 5], vec![0, 0]]).unwrap();
        assert_eq!(printer.format_matrix(&m), "0 5\n0 0\n");
    }

    #[test]
    fn test_table_contains_indices_and_cells() {
        let printer = Printer::default();
        let m = Matrix::from_rows(vec![vec![0, 42], vec![7, 0]]).unwrap();
        let out = printer.format_matrix(&m);
        assert!(out.contains("42"));
        assert!(out.contains('7'));
        assert_eq!(printer.format_matrix(&Matrix::zeros(0)), "(空矩阵)\n");
    }

    #[test]
    fn test_format_result_lists_flow_edges() {
        colored::control::set_override(false);
        let m = Matrix::from_rows(vec![vec![0, 5], vec![0, 0]]).unwrap();
        let result = EdmondsKarp::new().solve(&m, 0, 1).unwrap();
        let out = Printer::new(PrintMode::Plain).format_result(&result, 0, 1);
        assert!(out.contains("最大流: 5"));
        assert!(out.contains("流量守恒校验: 通过"));
        assert!(out.contains("0 - 1: 5"));
    }
}
