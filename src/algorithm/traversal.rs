//! 图遍历算法
//!
//! BFS 与 DFS；邻居按自然序访问，保证轨迹可复现。

use crate::error::Result;
use crate::graph::{GraphStore, NodeId, Weight};
use crate::trace::{Trace, TraceSink};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// 遍历器
pub struct Traversal<'a> {
    graph: &'a GraphStore,
}

impl<'a> Traversal<'a> {
    /// 创建遍历器
    pub fn new(graph: &'a GraphStore) -> Self {
        Self { graph }
    }

    /// 广度优先遍历
    ///
    /// 邻居在首次发现时即标记为已访问，先于入队。
    pub fn bfs(&self, start: &str) -> Result<Trace> {
        let graph = self.graph;
        let start = graph.require_node(start)?;
        let mut sink = TraceSink::new();

        let mut visited: HashSet<&NodeId> = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);
        sink.highlight(vec![start.clone()], format!("BFS Start: {}", start));

        while let Some(u) = queue.pop_front() {
            sink.current(u, format!("Pop {}", u));
            for (v, _) in graph.neighbors(u.as_str()) {
                if visited.insert(v) {
                    queue.push_back(v);
                    sink.traverse(u, v, format!("Visit {}", v));
                }
            }
        }

        debug!(start = %start, visited = visited.len(), events = sink.len(), "BFS 完成");
        Ok(sink.finish())
    }

    /// 深度优先遍历（先序）
    ///
    /// 用显式栈代替递归，每帧保存顶点和尚未检查的邻居。
    pub fn dfs(&self, start: &str) -> Result<Trace> {
        let graph = self.graph;
        let start = graph.require_node(start)?;
        let mut sink = TraceSink::new();

        let mut visited: HashSet<&NodeId> = HashSet::new();
        let mut stack: Vec<(&NodeId, std::vec::IntoIter<(&NodeId, Weight)>)> = Vec::new();

        visited.insert(start);
        sink.highlight(vec![start.clone()], format!("DFS Visit {}", start));
        stack.push((start, graph.neighbors(start.as_str()).into_iter()));

        while let Some((u, pending)) = stack.last_mut() {
            let u = *u;
            match pending.find(|(v, _)| !visited.contains(v)) {
                Some((v, _)) => {
                    sink.traverse(u, v, format!("Go to {}", v));
                    visited.insert(v);
                    sink.highlight(vec![v.clone()], format!("DFS Visit {}", v));
                    stack.push((v, graph.neighbors(v.as_str()).into_iter()));
                }
                None => {
                    stack.pop();
                }
            }
        }

        debug!(start = %start, visited = visited.len(), events = sink.len(), "DFS 完成");
        Ok(sink.finish())
    }
}
