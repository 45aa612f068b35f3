//! TraceGraph - 可回放的图算法引擎
//!
//! 在可编辑的带权图上运行经典图算法，并把每一步记录为轨迹事件，
//! 供前端逐步回放：
//! - 有向 / 无向模式切换，邻接表始终由原始边重建
//! - BFS、DFS、Dijkstra、二分图检测、Prim、Kruskal、最大流、Fleury、Hierholzer
//! - JSON 文档持久化和边列表导入
//! - 交互式 CLI 与 HTTP API

pub mod algorithm;
pub mod cli;
pub mod error;
pub mod graph;
pub mod import;
pub mod server;
pub mod trace;

// 重导出常用类型
pub use algorithm::{Algorithm, AlgorithmArgs, AlgorithmOutcome};
pub use error::{Error, Result};
pub use graph::{Edge, GraphDocument, GraphStore, NodeId, Position, Weight};
pub use trace::{ColorClass, Trace, TraceEvent, TraceSink};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
