//! 最小生成树
//!
//! Prim 从单个起点生长（不跨连通分量重启），Kruskal 扫描全部排序后的边。
//! 两者都只适用于无向图。

use super::union_find::UnionFind;
use crate::error::Result;
use crate::graph::{GraphStore, NodeId, Weight};
use crate::trace::{Trace, TraceSink};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::debug;

/// Prim 算法
pub struct Prim<'a> {
    graph: &'a GraphStore,
}

impl<'a> Prim<'a> {
    pub fn new(graph: &'a GraphStore) -> Self {
        Self { graph }
    }

    /// 从 start（缺省为插入顺序第一个顶点）生长最小生成树
    pub fn run(&self, start: Option<&str>) -> Result<Trace> {
        let graph = self.graph;
        let mut sink = TraceSink::new();

        if graph.is_directed() {
            sink.info("Prim (MST) only applies to undirected graphs");
            return Ok(sink.finish());
        }

        let start = match start {
            Some(id) => Some(graph.require_node(id)?),
            None => graph.first_node(),
        };
        let Some(start) = start else {
            return Ok(sink.finish());
        };

        let mut in_tree: HashSet<&NodeId> = HashSet::new();
        let mut heap: BinaryHeap<Reverse<(Weight, &NodeId, &NodeId)>> = BinaryHeap::new();

        in_tree.insert(start);
        for (v, w) in graph.neighbors(start.as_str()) {
            heap.push(Reverse((w, start, v)));
        }
        sink.highlight(vec![start.clone()], format!("Prim Start: {}", start));

        let mut total: u128 = 0;
        while let Some(Reverse((w, u, v))) = heap.pop() {
            if !in_tree.insert(v) {
                continue;
            }
            total += u128::from(w);
            sink.traverse(u, v, format!("Add Edge {}-{} (w={})", u, v, w));

            for (nv, nw) in graph.neighbors(v.as_str()) {
                if !in_tree.contains(nv) {
                    heap.push(Reverse((nw, v, nv)));
                }
            }
        }

        debug!(start = %start, tree_nodes = in_tree.len(), total, "Prim 完成");
        Ok(sink.finish())
    }
}

/// Kruskal 算法
pub struct Kruskal<'a> {
    graph: &'a GraphStore,
}

impl<'a> Kruskal<'a> {
    pub fn new(graph: &'a GraphStore) -> Self {
        Self { graph }
    }

    /// 按 (权重, u, v) 升序扫描所有边，合并不同集合的端点
    pub fn run(&self) -> Trace {
        let graph = self.graph;
        let mut sink = TraceSink::new();

        if graph.is_directed() {
            sink.info("Kruskal (MST) only applies to undirected graphs");
            return sink.finish();
        }

        let index: HashMap<&NodeId, usize> = graph
            .nodes()
            .enumerate()
            .map(|(i, (id, _))| (id, i))
            .collect();

        // u < v 作为规范方向，每条无向边只取一次
        let mut edges: Vec<(Weight, &NodeId, &NodeId)> = graph
            .adjacency()
            .iter()
            .flat_map(|(u, neighbors)| {
                neighbors
                    .iter()
                    .filter(move |(v, _)| u < *v)
                    .map(move |(v, &w)| (w, u, v))
            })
            .collect();
        edges.sort();
        edges.dedup();

        let mut sets = UnionFind::new(index.len());
        let mut picked = 0usize;
        for (w, u, v) in edges {
            let (Some(&a), Some(&b)) = (index.get(u), index.get(v)) else {
                continue;
            };
            if sets.union(a, b) {
                picked += 1;
                sink.traverse(u, v, format!("Kruskal picks {}-{} (w={})", u, v, w));
            }
        }

        debug!(picked, "Kruskal 完成");
        sink.finish()
    }
}
