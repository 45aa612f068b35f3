//! 图存储
//!
//! 原始边列表是唯一数据来源，邻接表是它在当前模式下的投影：
//! 任何时刻邻接表都必须与 `rebuild_adjacency()` 的结果一致。

use super::edge::{Edge, Weight};
use super::node::{natural_cmp, sort_natural, NodeId, Position};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// 邻接表：顶点 -> (邻居 -> 权重)，保持插入顺序
pub type Adjacency = IndexMap<NodeId, IndexMap<NodeId, Weight>>;

/// 邻接矩阵
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyMatrix {
    /// 行列顺序（自然序）
    pub nodes: Vec<NodeId>,
    /// 权重矩阵，无边处为 0
    pub weights: Vec<Vec<Weight>>,
}

/// 图存储
#[derive(Debug, Clone)]
pub struct GraphStore {
    /// 顶点坐标（插入顺序）
    nodes: IndexMap<NodeId, Position>,
    /// 原始边列表，每个有序对 (u, v) 至多一条
    raw_edges: Vec<Edge>,
    /// 派生邻接表
    adj: Adjacency,
    /// 是否有向
    directed: bool,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(true)
    }
}

impl GraphStore {
    /// 创建空图
    pub fn new(directed: bool) -> Self {
        Self {
            nodes: IndexMap::new(),
            raw_edges: Vec::new(),
            adj: IndexMap::new(),
            directed,
        }
    }

    // ==================== 顶点操作 ====================

    /// 添加顶点；已存在时只更新坐标
    pub fn add_node(&mut self, id: impl Into<NodeId>, x: f64, y: f64) {
        let id = id.into();
        self.nodes.insert(id.clone(), Position::new(x, y));
        self.adj.entry(id).or_default();
    }

    /// 删除顶点及其所有关联边；返回顶点是否存在
    pub fn remove_node(&mut self, id: &str) -> bool {
        let existed = self.nodes.shift_remove(id).is_some();
        self.adj.shift_remove(id);
        self.raw_edges.retain(|e| !e.touches(id));
        for neighbors in self.adj.values_mut() {
            neighbors.shift_remove(id);
        }
        existed
    }

    /// 顶点是否存在
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// 查找顶点，不存在时返回 `NodeNotFound`
    pub fn require_node(&self, id: &str) -> Result<&NodeId> {
        self.nodes
            .get_key_value(id)
            .map(|(k, _)| k)
            .ok_or_else(|| Error::NodeNotFound(id.to_string()))
    }

    /// 获取顶点坐标
    pub fn position(&self, id: &str) -> Option<Position> {
        self.nodes.get(id).copied()
    }

    /// 按插入顺序遍历顶点
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &Position)> {
        self.nodes.iter()
    }

    /// 按插入顺序的第一个顶点
    pub fn first_node(&self) -> Option<&NodeId> {
        self.nodes.keys().next()
    }

    /// 获取顶点数量
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 下一个可用的数字 ID（现有最大数字 ID + 1）
    pub fn next_node_id(&self) -> NodeId {
        let max = self
            .nodes
            .keys()
            .filter_map(|id| id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        NodeId::from(max + 1)
    }

    // ==================== 边操作 ====================

    /// 添加边；任一端点不存在时忽略并返回 false
    pub fn add_edge(&mut self, u: &str, v: &str, weight: Weight) -> bool {
        let (Some(u), Some(v)) = (
            self.nodes.get_key_value(u).map(|(k, _)| k.clone()),
            self.nodes.get_key_value(v).map(|(k, _)| k.clone()),
        ) else {
            warn!(u, v, "忽略边：端点不存在");
            return false;
        };

        let position = match self.raw_edges.iter().position(|e| e.connects(u.as_str(), v.as_str())) {
            Some(i) => {
                self.raw_edges[i].set_weight(weight);
                i
            }
            None => {
                self.raw_edges.push(Edge::new(u.clone(), v.clone(), weight));
                self.raw_edges.len() - 1
            }
        };

        // 无向模式下 (u, v) 与 (v, u) 共用一组邻接项，原始列表中靠后的那条决定权重
        let effective = match self.raw_edges.iter().rposition(|e| e.connects(v.as_str(), u.as_str())) {
            Some(j) if !self.directed && j > position => self.raw_edges[j].weight(),
            _ => weight,
        };

        Self::add_to_adjacency(&mut self.adj, self.directed, u, v, effective);
        true
    }

    /// 删除原始边 (u, v) 并重建邻接表
    pub fn remove_edge(&mut self, u: &str, v: &str) -> Result<()> {
        let before = self.raw_edges.len();
        self.raw_edges.retain(|e| !e.connects(u, v));
        if self.raw_edges.len() == before {
            return Err(Error::EdgeNotFound(u.to_string(), v.to_string()));
        }
        self.rebuild_adjacency();
        Ok(())
    }

    fn add_to_adjacency(adj: &mut Adjacency, directed: bool, u: NodeId, v: NodeId, w: Weight) {
        adj.entry(u.clone()).or_default().insert(v.clone(), w);
        if !directed {
            adj.entry(v).or_default().insert(u, w);
        }
    }

    /// 原始边列表
    pub fn raw_edges(&self) -> &[Edge] {
        &self.raw_edges
    }

    /// 获取原始边数量
    pub fn edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    // ==================== 模式与邻接表 ====================

    /// 是否有向
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// 切换有向/无向；模式变化时整体重建邻接表
    pub fn set_mode(&mut self, directed: bool) {
        if self.directed == directed {
            return;
        }
        self.directed = directed;
        self.rebuild_adjacency();
        info!(directed, "图模式已切换");
    }

    /// 清空邻接表后按当前模式重放全部原始边
    pub fn rebuild_adjacency(&mut self) {
        let mut adj: Adjacency = self
            .nodes
            .keys()
            .map(|id| (id.clone(), IndexMap::new()))
            .collect();
        for edge in &self.raw_edges {
            Self::add_to_adjacency(
                &mut adj,
                self.directed,
                edge.src().clone(),
                edge.dst().clone(),
                edge.weight(),
            );
        }
        self.adj = adj;
        debug!(edges = self.raw_edges.len(), "邻接表已重建");
    }

    /// 派生邻接表
    pub fn adjacency(&self) -> &Adjacency {
        &self.adj
    }

    /// 按自然序排列的邻居及权重
    pub fn neighbors(&self, id: &str) -> Vec<(&NodeId, Weight)> {
        let mut neighbors: Vec<(&NodeId, Weight)> = self
            .adj
            .get(id)
            .map(|n| n.iter().map(|(v, &w)| (v, w)).collect())
            .unwrap_or_default();
        neighbors.sort_by(|a, b| a.0.natural_cmp(b.0));
        neighbors
    }

    /// 顶点度数（邻居表大小）
    pub fn degree(&self, id: &str) -> usize {
        self.adj.get(id).map_or(0, |n| n.len())
    }

    /// 邻接矩阵
    pub fn matrix(&self) -> AdjacencyMatrix {
        let mut nodes: Vec<NodeId> = self.nodes.keys().cloned().collect();
        sort_natural(&mut nodes);
        let index: IndexMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut weights = vec![vec![0; nodes.len()]; nodes.len()];
        for (u, neighbors) in &self.adj {
            for (v, &w) in neighbors {
                if let (Some(&i), Some(&j)) = (index.get(u.as_str()), index.get(v.as_str())) {
                    weights[i][j] = w;
                }
            }
        }

        AdjacencyMatrix { nodes, weights }
    }

    /// 边列表；无向模式下 (u, v) 与 (v, u) 只出现一次
    pub fn edge_list(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        for (u, neighbors) in &self.adj {
            for (v, &w) in neighbors {
                if !self.directed {
                    let key = if natural_cmp(u.as_str(), v.as_str()).is_le() {
                        (u.as_str(), v.as_str())
                    } else {
                        (v.as_str(), u.as_str())
                    };
                    if !seen.insert(key) {
                        continue;
                    }
                }
                edges.push(Edge::new(u.clone(), v.clone(), w));
            }
        }
        edges
    }

    /// 清空顶点和边，保留模式
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.raw_edges.clear();
        self.adj.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(directed: bool) -> GraphStore {
        let mut graph = GraphStore::new(directed);
        for id in ["1", "2", "3"] {
            graph.add_node(id, 0.0, 0.0);
        }
        graph.add_edge("1", "2", 1);
        graph.add_edge("2", "3", 2);
        graph.add_edge("1", "3", 5);
        graph
    }

    #[test]
    fn test_add_edge_requires_nodes() {
        let mut graph = GraphStore::new(true);
        graph.add_node("1", 0.0, 0.0);

        assert!(!graph.add_edge("1", "2", 3));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.adjacency()["1"].is_empty());
    }

    #[test]
    fn test_add_edge_overwrites_weight() {
        let mut graph = triangle(true);
        graph.add_edge("1", "2", 9);

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.adjacency()["1"]["2"], 9);
        assert_eq!(graph.raw_edges()[0], Edge::new("1", "2", 9));
    }

    #[test]
    fn test_undirected_adjacency_is_symmetric() {
        let graph = triangle(false);

        for (u, neighbors) in graph.adjacency() {
            for (v, w) in neighbors {
                assert_eq!(graph.adjacency()[v.as_str()].get(u.as_str()), Some(w));
            }
        }
        // 原始边仍只记录提交的方向
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_set_mode_rebuilds() {
        let mut graph = triangle(true);
        assert!(graph.adjacency()["2"].get("1").is_none());

        graph.set_mode(false);
        assert_eq!(graph.adjacency()["2"]["1"], 1);

        graph.set_mode(true);
        assert!(graph.adjacency()["2"].get("1").is_none());
        assert_eq!(graph.adjacency()["1"]["2"], 1);
    }

    #[test]
    fn test_rebuild_idempotent() {
        let mut graph = triangle(false);
        graph.add_node("4", 1.0, 1.0);
        graph.add_edge("4", "1", 7);
        graph.remove_node("2");

        graph.rebuild_adjacency();
        let first = graph.adjacency().clone();
        graph.rebuild_adjacency();
        assert_eq!(&first, graph.adjacency());
    }

    #[test]
    fn test_incremental_matches_rebuild() {
        let mut graph = triangle(false);
        graph.add_edge("3", "1", 4);
        let incremental = graph.adjacency().clone();

        graph.rebuild_adjacency();
        assert_eq!(&incremental, graph.adjacency());
    }

    #[test]
    fn test_remove_node() {
        let mut graph = triangle(false);

        assert!(graph.remove_node("2"));
        assert!(!graph.contains_node("2"));
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.adjacency().get("2").is_none());
        assert!(graph.adjacency()["1"].get("2").is_none());
        assert!(graph.adjacency()["3"].get("2").is_none());
        assert!(!graph.remove_node("2"));
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = triangle(false);

        graph.remove_edge("1", "2").unwrap();
        assert!(graph.adjacency()["1"].get("2").is_none());
        assert!(graph.adjacency()["2"].get("1").is_none());
        assert!(matches!(
            graph.remove_edge("1", "2"),
            Err(Error::EdgeNotFound(_, _))
        ));
    }

    #[test]
    fn test_readding_node_keeps_edges() {
        let mut graph = triangle(true);
        graph.add_node("1", 50.0, 60.0);

        assert_eq!(graph.position("1"), Some(Position::new(50.0, 60.0)));
        assert_eq!(graph.adjacency()["1"].len(), 2);
        assert_eq!(graph.first_node().map(|n| n.as_str()), Some("1"));
    }

    #[test]
    fn test_matrix_natural_order() {
        let mut graph = GraphStore::new(true);
        for id in ["10", "2", "a"] {
            graph.add_node(id, 0.0, 0.0);
        }
        graph.add_edge("10", "a", 3);
        graph.add_edge("2", "10", 4);

        let m = graph.matrix();
        let order: Vec<&str> = m.nodes.iter().map(|n| n.as_str()).collect();
        assert_eq!(order, vec!["2", "10", "a"]);
        assert_eq!(m.weights, vec![vec![0, 4, 0], vec![0, 0, 3], vec![0, 0, 0]]);
    }

    #[test]
    fn test_edge_list_collapses_undirected() {
        let graph = triangle(false);
        assert_eq!(graph.edge_list().len(), 3);

        let graph = triangle(true);
        assert_eq!(graph.edge_list().len(), 3);

        let mut graph = triangle(true);
        graph.add_edge("2", "1", 8);
        assert_eq!(graph.edge_list().len(), 4);
        graph.set_mode(false);
        assert_eq!(graph.edge_list().len(), 3);
    }

    #[test]
    fn test_neighbors_natural_order() {
        let mut graph = GraphStore::new(true);
        for id in ["1", "10", "9", "b"] {
            graph.add_node(id, 0.0, 0.0);
        }
        graph.add_edge("1", "b", 1);
        graph.add_edge("1", "10", 1);
        graph.add_edge("1", "9", 1);

        let order: Vec<&str> = graph.neighbors("1").iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(order, vec!["9", "10", "b"]);
    }

    #[test]
    fn test_next_node_id() {
        let mut graph = GraphStore::default();
        assert_eq!(graph.next_node_id().as_str(), "1");

        graph.add_node("7", 0.0, 0.0);
        graph.add_node("x", 0.0, 0.0);
        assert_eq!(graph.next_node_id().as_str(), "8");
    }

    #[test]
    fn test_clear_keeps_mode() {
        let mut graph = triangle(false);
        graph.clear();

        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(!graph.is_directed());
    }

    #[test]
    fn test_reverse_raw_edge_overwrite_matches_rebuild() {
        let mut graph = GraphStore::new(false);
        graph.add_node("1", 0.0, 0.0);
        graph.add_node("2", 0.0, 0.0);
        graph.add_edge("1", "2", 3);
        graph.add_edge("2", "1", 5);
        // (1, 2) 排在 (2, 1) 之前，重建时 (2, 1) 的权重胜出
        graph.add_edge("1", "2", 7);

        let mut rebuilt = graph.clone();
        rebuilt.rebuild_adjacency();
        assert_eq!(graph.adjacency(), rebuilt.adjacency());
        assert_eq!(graph.adjacency()["1"]["2"], 5);
        assert_eq!(graph.edge_count(), 2);
    }
}
