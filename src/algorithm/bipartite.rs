//! 二分图检测
//!
//! 对每个未着色顶点启动一次 BFS 双色染色；发现同色相邻即停止，
//! 此时返回的是冲突见证而不是完整着色。仅适用于无向图。

use crate::graph::{GraphStore, NodeId};
use crate::trace::{ColorClass, Trace, TraceSink};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// 顶点着色
pub type Coloring = IndexMap<NodeId, ColorClass>;

/// 检测结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BipartiteResult {
    /// 是否为二分图
    pub is_bipartite: bool,
    /// 轨迹
    pub trace: Trace,
    /// 着色；有向图上为 None
    pub coloring: Option<Coloring>,
}

impl BipartiteResult {
    /// 按颜色分成两组
    pub fn groups(&self) -> Option<(Vec<&NodeId>, Vec<&NodeId>)> {
        let coloring = self.coloring.as_ref()?;
        let (a, b): (Vec<_>, Vec<_>) = coloring.iter().partition(|&(_, &c)| c == ColorClass::A);
        Some((
            a.into_iter().map(|(id, _)| id).collect(),
            b.into_iter().map(|(id, _)| id).collect(),
        ))
    }
}

/// 二分图检测器
pub struct BipartiteChecker<'a> {
    graph: &'a GraphStore,
}

impl<'a> BipartiteChecker<'a> {
    pub fn new(graph: &'a GraphStore) -> Self {
        Self { graph }
    }

    /// 执行检测
    pub fn check(&self) -> BipartiteResult {
        let graph = self.graph;
        let mut sink = TraceSink::new();

        if graph.is_directed() {
            sink.info("Bipartite check only applies to undirected graphs");
            return BipartiteResult {
                is_bipartite: false,
                trace: sink.finish(),
                coloring: None,
            };
        }

        let mut colors: Coloring = IndexMap::new();
        for (seed, _) in graph.nodes() {
            if colors.contains_key(seed) {
                continue;
            }
            colors.insert(seed.clone(), ColorClass::A);
            sink.color(seed, ColorClass::A, "start group A");

            let mut queue = VecDeque::from([seed]);
            while let Some(u) = queue.pop_front() {
                let cu = colors[u];
                for (v, _) in graph.neighbors(u.as_str()) {
                    let existing = colors.get(v).copied();
                    match existing {
                        None => {
                            colors.insert(v.clone(), cu.flip());
                            sink.color(v, cu.flip(), "paint");
                            queue.push_back(v);
                        }
                        Some(cv) if cv == cu => {
                            debug!(u = %u, v = %v, "发现同色相邻顶点");
                            return BipartiteResult {
                                is_bipartite: false,
                                trace: sink.finish(),
                                coloring: Some(colors),
                            };
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        debug!(nodes = colors.len(), "二分图检测通过");
        BipartiteResult {
            is_bipartite: true,
            trace: sink.finish(),
            coloring: Some(colors),
        }
    }
}
