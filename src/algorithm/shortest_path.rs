//! 最短路径算法
//!
//! Dijkstra（惰性删除优先队列），要求边权非负。

use crate::error::Result;
use crate::graph::{GraphStore, NodeId, Weight};
use crate::trace::{Trace, TraceSink};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use tracing::debug;

/// Dijkstra 最短路径
pub struct Dijkstra<'a> {
    graph: &'a GraphStore,
}

impl<'a> Dijkstra<'a> {
    /// 创建算法实例
    pub fn new(graph: &'a GraphStore) -> Self {
        Self { graph }
    }

    /// 计算 start 到 end 的最短路径
    ///
    /// 终点可达时以一个 Path 事件结尾，描述中带总权重；不可达时不产生 Path。
    pub fn shortest_path(&self, start: &str, end: &str) -> Result<Trace> {
        let graph = self.graph;
        let start = graph.require_node(start)?;
        let end = graph.require_node(end)?;
        let mut sink = TraceSink::new();

        // 缺省即无穷大
        let mut dist: HashMap<&NodeId, Weight> = HashMap::new();
        let mut parent: HashMap<&NodeId, &NodeId> = HashMap::new();
        let mut heap = BinaryHeap::new();

        dist.insert(start, 0);
        heap.push(Reverse((0, start)));

        while let Some(Reverse((d, u))) = heap.pop() {
            if dist.get(u).is_some_and(|&best| d > best) {
                continue;
            }
            sink.current(u, format!("Visit {} (min={})", u, d));
            if u == end {
                break;
            }

            for (v, w) in graph.neighbors(u.as_str()) {
                // 超出 Weight 范围的路线视为不可达
                let Some(candidate) = d.checked_add(w) else {
                    continue;
                };
                if dist.get(v).map_or(true, |&current| candidate < current) {
                    dist.insert(v, candidate);
                    parent.insert(v, u);
                    heap.push(Reverse((candidate, v)));
                    sink.relax(u, v, candidate, format!("Update {}={}", v, candidate));
                }
            }
        }

        if let Some(&total) = dist.get(end) {
            let path = Self::reconstruct_path(start, end, &parent);
            debug!(start = %start, end = %end, total, hops = path.len(), "最短路径已找到");
            sink.path(path, format!("Shortest Path: {}", total));
        } else {
            debug!(start = %start, end = %end, "终点不可达");
        }

        Ok(sink.finish())
    }

    /// 沿 parent 指针从终点回溯
    fn reconstruct_path(
        start: &NodeId,
        end: &NodeId,
        parent: &HashMap<&NodeId, &NodeId>,
    ) -> Vec<NodeId> {
        let mut path = vec![end.clone()];
        let mut current = end;
        while current != start {
            match parent.get(current) {
                Some(&prev) => {
                    path.push(prev.clone());
                    current = prev;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}
