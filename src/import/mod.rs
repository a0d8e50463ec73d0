//! 矩阵导入导出模块
//!
//! 支持两种格式：
//! - 文本：每个非空行为矩阵的一行，单元格以空白分隔，`#` 开头的行为注释
//! - JSON：`{"capacities": [[...], ...]}` 或直接的行数组

use crate::error::{Error, Result};
use crate::graph::{CapacityMatrix, Matrix};
use crate::types::{Capacity, InputFormat};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

/// JSON 输入的两种形态
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonMatrix {
    Wrapped { capacities: Vec<Vec<serde_json::Number>> },
    Bare(Vec<Vec<serde_json::Number>>),
}

/// 容量矩阵读取器
#[derive(Debug, Clone, Default)]
pub struct MatrixReader {
    format: InputFormat,
    expected_size: Option<usize>,
}

impl MatrixReader {
    /// 创建读取器
    pub fn new(format: InputFormat) -> Self {
        Self {
            format,
            expected_size: None,
        }
    }

    /// 要求读入的矩阵恰为 `size×size`
    pub fn with_expected_size(mut self, size: Option<usize>) -> Self {
        self.expected_size = size;
        self
    }

    /// 从文件读取
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<CapacityMatrix> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let matrix = self.read(BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            nodes = matrix.size(),
            edges = matrix.edge_count(),
            "矩阵已载入"
        );
        Ok(matrix)
    }

    /// 从任意输入流读取
    pub fn read<R: BufRead>(&self, reader: R) -> Result<CapacityMatrix> {
        let matrix = match self.format {
            InputFormat::Text => parse_text(reader)?,
            InputFormat::Json => parse_json(reader)?,
        };

        if let Some(expected) = self.expected_size {
            if matrix.size() != expected {
                return Err(Error::MalformedMatrix(format!(
                    "期望 {0}×{0} 矩阵, 实际为 {1}×{1}",
                    expected,
                    matrix.size()
                )));
            }
        }

        Ok(matrix)
    }

    /// 从字符串读取
    pub fn parse_str(&self, input: &str) -> Result<CapacityMatrix> {
        self.read(input.as_bytes())
    }
}

fn parse_cell(token: &str, line: usize, column: usize) -> Result<Capacity> {
    if let Ok(value) = token.parse::<Capacity>() {
        return Ok(value);
    }
    if token.parse::<i128>().map(|v| v < 0).unwrap_or(false) {
        return Err(Error::MalformedMatrix(format!(
            "第 {} 行第 {} 列容量为负数: {}",
            line, column, token
        )));
    }
    Err(Error::ParseError(format!(
        "第 {} 行第 {} 列不是非负整数: {}",
        line, column, token
    )))
}

fn parse_text<R: BufRead>(reader: R) -> Result<CapacityMatrix> {
    let mut rows = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let row = trimmed
            .split_whitespace()
            .enumerate()
            .map(|(j, token)| parse_cell(token, i + 1, j + 1))
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }

    Matrix::from_rows(rows)
}

fn json_cell(number: &serde_json::Number, row: usize, column: usize) -> Result<Capacity> {
    if let Some(value) = number.as_u64() {
        return Ok(value);
    }
    if number.as_i64().is_some() {
        return Err(Error::MalformedMatrix(format!(
            "单元格 ({}, {}) 容量为负数: {}",
            row, column, number
        )));
    }
    Err(Error::ParseError(format!(
        "单元格 ({}, {}) 不是整数: {}",
        row, column, number
    )))
}

fn parse_json<R: Read>(reader: R) -> Result<CapacityMatrix> {
    let parsed: JsonMatrix = serde_json::from_reader(reader)
        .map_err(|e| Error::ParseError(format!("JSON 解析错误: {}", e)))?;
    let raw = match parsed {
        JsonMatrix::Wrapped { capacities } => capacities,
        JsonMatrix::Bare(rows) => rows,
    };

    let rows = raw
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, n)| json_cell(n, i, j))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    Matrix::from_rows(rows)
}

/// 以文本格式输出矩阵（每行一行，空格分隔）
pub fn format_text(matrix: &Matrix) -> String {
    let mut out = String::new();
    for row in matrix.rows() {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

/// 将矩阵写入文件
pub fn write_path<P: AsRef<Path>>(matrix: &Matrix, path: P, format: InputFormat) -> Result<()> {
    let content = match format {
        InputFormat::Text => format_text(matrix),
        InputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "capacities": matrix.to_rows()
        }))?,
    };
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
