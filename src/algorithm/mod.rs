//! 图算法模块
//!
//! 每个算法只读地借用 `GraphStore`，把执行过程记录为 `Trace`。
//! 包含遍历、最短路径、二分图检测、最小生成树、最大流和欧拉回路。

mod bipartite;
mod euler;
mod max_flow;
mod mst;
mod runner;
mod shortest_path;
mod traversal;
mod union_find;

pub use bipartite::{BipartiteChecker, BipartiteResult, Coloring};
pub use euler::{Fleury, Hierholzer};
pub use max_flow::{EdmondsKarp, Flow, MaxFlow};
pub use mst::{Kruskal, Prim};
pub use runner::{Algorithm, AlgorithmArgs, AlgorithmOutcome, ArgSpec};
pub use shortest_path::Dijkstra;
pub use traversal::Traversal;
pub use union_find::UnionFind;
