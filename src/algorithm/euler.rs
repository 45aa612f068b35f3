//! 欧拉路径 / 回路
//!
//! Fleury 每一步对每条候选边重新做可达性检查来避开桥，复杂度偏高，
//! 只适合教学规模的图；Hierholzer 用显式栈构造回路。两者仅适用于无向图。

use crate::error::Result;
use crate::graph::{natural_cmp, GraphStore, NodeId};
use crate::trace::{Trace, TraceSink};
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// 剩余边表：邻接表的私有可变副本（只保留邻居，不含权重）
struct EdgePool<'a> {
    remaining: IndexMap<&'a NodeId, Vec<&'a NodeId>>,
}

impl<'a> EdgePool<'a> {
    fn new(graph: &'a GraphStore) -> Self {
        let remaining = graph
            .adjacency()
            .iter()
            .map(|(u, neighbors)| (u, neighbors.keys().collect()))
            .collect();
        Self { remaining }
    }

    fn has_edges(&self) -> bool {
        self.remaining.values().any(|n| !n.is_empty())
    }

    fn has_edges_at(&self, u: &NodeId) -> bool {
        self.remaining.get(u).is_some_and(|n| !n.is_empty())
    }

    /// 按自然序排列的剩余邻居
    fn sorted_neighbors(&self, u: &NodeId) -> Vec<&'a NodeId> {
        let mut neighbors = self.remaining.get(u).cloned().unwrap_or_default();
        neighbors.sort_by(|a, b| natural_cmp(a.as_str(), b.as_str()));
        neighbors
    }

    fn first_neighbor(&self, u: &NodeId) -> Option<&'a NodeId> {
        self.remaining
            .get(u)?
            .iter()
            .copied()
            .min_by(|a, b| natural_cmp(a.as_str(), b.as_str()))
    }

    /// 从两端各移除一次；自环只在表中出现一次
    fn remove(&mut self, u: &'a NodeId, v: &'a NodeId) {
        Self::remove_one(&mut self.remaining, u, v);
        if u != v {
            Self::remove_one(&mut self.remaining, v, u);
        }
    }

    fn restore(&mut self, u: &'a NodeId, v: &'a NodeId) {
        self.remaining.entry(u).or_default().push(v);
        if u != v {
            self.remaining.entry(v).or_default().push(u);
        }
    }

    fn remove_one(remaining: &mut IndexMap<&'a NodeId, Vec<&'a NodeId>>, from: &NodeId, to: &NodeId) {
        if let Some(list) = remaining.get_mut(from) {
            if let Some(pos) = list.iter().position(|&n| n == to) {
                list.remove(pos);
            }
        }
    }

    /// 在剩余边上 from 能否到达 to
    fn reachable(&self, from: &'a NodeId, to: &NodeId) -> bool {
        let mut seen: HashSet<&NodeId> = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);
        while let Some(u) = queue.pop_front() {
            if u == to {
                return true;
            }
            for &next in self.remaining.get(u).into_iter().flatten() {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// 暂时删去 u-v 后 u 仍能到达 v，即 u-v 不是桥
    fn is_non_bridge(&mut self, u: &'a NodeId, v: &'a NodeId) -> bool {
        self.remove(u, v);
        let reachable = self.reachable(u, v);
        self.restore(u, v);
        reachable
    }
}

/// 奇度顶点（按邻接表顺序）
fn odd_degree_nodes(graph: &GraphStore) -> Vec<&NodeId> {
    graph
        .adjacency()
        .iter()
        .filter(|(_, neighbors)| neighbors.len() % 2 == 1)
        .map(|(id, _)| id)
        .collect()
}

/// 第一个有边的顶点，没有则取第一个顶点
fn default_start(graph: &GraphStore) -> Option<&NodeId> {
    graph
        .nodes()
        .map(|(id, _)| id)
        .find(|id| graph.degree(id.as_str()) > 0)
        .or_else(|| graph.first_node())
}

/// Fleury 算法
pub struct Fleury<'a> {
    graph: &'a GraphStore,
}

impl<'a> Fleury<'a> {
    pub fn new(graph: &'a GraphStore) -> Self {
        Self { graph }
    }

    /// 构造欧拉路径或回路
    ///
    /// 存在奇度顶点时必须从奇度顶点出发，给定的 start 不满足时改用第一个奇度顶点。
    pub fn run(&self, start: Option<&str>) -> Result<Trace> {
        let graph = self.graph;
        let mut sink = TraceSink::new();

        if graph.is_directed() {
            sink.info("Fleury (Euler) only applies to undirected graphs");
            return Ok(sink.finish());
        }
        let requested = start.map(|id| graph.require_node(id)).transpose()?;
        if graph.node_count() == 0 {
            return Ok(sink.finish());
        }

        let odd = odd_degree_nodes(graph);
        if odd.len() > 2 {
            sink.info(format!(
                "No Euler path: {} odd-degree nodes (at most 2 allowed)",
                odd.len()
            ));
            return Ok(sink.finish());
        }

        let start = match (odd.first(), requested) {
            (Some(_), Some(r)) if odd.contains(&r) => r,
            (Some(&first_odd), _) => first_odd,
            (None, Some(r)) => r,
            (None, None) => match default_start(graph) {
                Some(id) => id,
                None => return Ok(sink.finish()),
            },
        };

        let mut pool = EdgePool::new(graph);
        let mut current = start;
        let mut walk = vec![current.clone()];
        sink.highlight(vec![current.clone()], format!("Start Fleury: {}", current));

        while pool.has_edges() {
            let candidates = pool.sorted_neighbors(current);
            let chosen = match candidates.as_slice() {
                [] => break,
                [only] => *only,
                [first, ..] => candidates
                    .iter()
                    .copied()
                    .find(|&v| pool.is_non_bridge(current, v))
                    .unwrap_or(*first),
            };

            sink.traverse(current, chosen, format!("Cross {}-{}", current, chosen));
            pool.remove(current, chosen);
            current = chosen;
            walk.push(current.clone());
        }

        debug!(start = %start, steps = walk.len() - 1, "Fleury 完成");
        sink.path(walk, "Fleury Done");
        Ok(sink.finish())
    }
}

/// Hierholzer 算法
pub struct Hierholzer<'a> {
    graph: &'a GraphStore,
}

impl<'a> Hierholzer<'a> {
    pub fn new(graph: &'a GraphStore) -> Self {
        Self { graph }
    }

    /// 构造欧拉回路；要求没有奇度顶点
    ///
    /// 不检查整体连通性，孤立顶点不会出现在回路中。
    pub fn run(&self, start: Option<&str>) -> Result<Trace> {
        let graph = self.graph;
        let mut sink = TraceSink::new();

        if graph.is_directed() {
            sink.info("Hierholzer only applies to undirected graphs");
            return Ok(sink.finish());
        }
        let requested = start.map(|id| graph.require_node(id)).transpose()?;
        if graph.node_count() == 0 {
            return Ok(sink.finish());
        }

        let odd = odd_degree_nodes(graph);
        if !odd.is_empty() {
            sink.info(format!(
                "No Euler circuit: {} odd-degree nodes",
                odd.len()
            ));
            return Ok(sink.finish());
        }

        let mut pool = EdgePool::new(graph);
        let start = match requested {
            Some(r) if pool.has_edges_at(r) => r,
            _ => match default_start(graph) {
                Some(id) => id,
                None => return Ok(sink.finish()),
            },
        };

        let mut stack = vec![start];
        let mut circuit = Vec::new();
        sink.highlight(vec![start.clone()], format!("Hierholzer Start: {}", start));

        while let Some(&u) = stack.last() {
            match pool.first_neighbor(u) {
                Some(v) => {
                    stack.push(v);
                    pool.remove(u, v);
                    sink.traverse(u, v, format!("Go {}->{}", u, v));
                }
                None => {
                    stack.pop();
                    circuit.push(u.clone());
                    sink.current(u, format!("Backtrack {}", u));
                }
            }
        }

        circuit.reverse();
        debug!(start = %start, length = circuit.len(), "Hierholzer 完成");
        sink.path(circuit, "Euler Circuit Found");
        Ok(sink.finish())
    }
}
