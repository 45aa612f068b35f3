//! 错误类型定义
//!
//! 只有调用方传入的非法引用才是硬错误；算法内部的前置条件
//! （模式限制、奇度顶点数量、空图、不可达终点）都以 Info 事件写入轨迹。

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("顶点不存在: {0}")]
    NodeNotFound(String),

    #[error("边不存在: {0} -> {1}")]
    EdgeNotFound(String, String),

    #[error("未知算法: {0}")]
    UnknownAlgorithm(String),

    #[error("缺少参数: {0}")]
    MissingArgument(&'static str),

    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    SerializationError(String),

    #[error("服务器错误: {0}")]
    ServerError(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}
