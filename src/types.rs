//! 通用类型定义

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 边容量（非负整数）
pub type Capacity = u64;

/// 节点索引，取值范围 `[0, n)`
pub type NodeIndex = usize;

/// 矩阵输入格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputFormat {
    /// 每行一行矩阵，空白分隔
    #[default]
    Text,
    /// JSON 行数组
    Json,
}

impl FromStr for InputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(InputFormat::Text),
            "json" => Ok(InputFormat::Json),
            other => Err(crate::Error::ParseError(format!(
                "不支持的格式: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Text => write!(f, "text"),
            InputFormat::Json => write!(f, "json"),
        }
    }
}
