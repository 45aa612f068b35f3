//! 图核心模块
//!
//! 定义顶点、边、图存储和持久化文档

mod document;
mod edge;
mod node;
mod store;

pub use document::GraphDocument;
pub use edge::{Edge, Weight};
pub use node::{natural_cmp, sort_natural, NodeId, Position};
pub use store::{Adjacency, AdjacencyMatrix, GraphStore};
