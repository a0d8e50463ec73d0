//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("节点索引越界: {index} (节点数 {size})")]
    InvalidIndex { index: usize, size: usize },

    #[error("源点与汇点相同: {0}")]
    SameSourceSink(usize),

    #[error("矩阵格式错误: {0}")]
    MalformedMatrix(String),

    #[error("边已存在: {from} -> {to}")]
    EdgeExists { from: usize, to: usize },

    #[error("边不存在: {from} -> {to}")]
    EdgeNotFound { from: usize, to: usize },

    #[error("不允许自环: {0} -> {0}")]
    SelfLoop(usize),

    #[error("容量溢出")]
    CapacityOverflow,

    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}
