//! 最大流算法
//!
//! 实现 Edmonds-Karp 算法（基于 BFS 的 Ford-Fulkerson）。
//! 在邻接表的私有残量副本上运行，不修改图存储；有向、无向模式均可。

use crate::error::Result;
use crate::graph::{GraphStore, NodeId};
use crate::trace::{Trace, TraceSink};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::debug;

/// 流量值。比 [`Weight`](crate::graph::Weight) 宽，边权之和与反向弧累加都不会溢出
pub type Flow = u128;

/// 残量网络：u -> (v -> 剩余容量)
type Residual<'a> = IndexMap<&'a NodeId, IndexMap<&'a NodeId, Flow>>;

/// 最大流结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxFlow {
    /// 最大流量值
    pub value: Flow,
    /// 轨迹（每条增广路径一个 Path 事件和一个 Info 事件）
    pub trace: Trace,
    /// 最小割的源侧顶点集
    pub source_side: BTreeSet<NodeId>,
}

/// Edmonds-Karp 最大流算法
pub struct EdmondsKarp<'a> {
    graph: &'a GraphStore,
}

impl<'a> EdmondsKarp<'a> {
    /// 创建算法实例
    pub fn new(graph: &'a GraphStore) -> Self {
        Self { graph }
    }

    /// 计算从 source 到 sink 的最大流
    pub fn max_flow(&self, source: &str, sink: &str) -> Result<MaxFlow> {
        let graph = self.graph;
        let source = graph.require_node(source)?;
        let sink = graph.require_node(sink)?;
        let mut trace = TraceSink::new();

        if source == sink {
            trace.info("Source and sink must be different nodes");
            return Ok(MaxFlow {
                value: 0,
                trace: trace.finish(),
                source_side: BTreeSet::from([source.clone()]),
            });
        }

        // 容量即当前边权；反向弧在首次使用时以 0 创建
        let mut residual: Residual<'a> = graph
            .adjacency()
            .iter()
            .map(|(u, neighbors)| {
                (u, neighbors.iter().map(|(v, &w)| (v, Flow::from(w))).collect())
            })
            .collect();

        let mut max_flow_value: Flow = 0;

        // Edmonds-Karp: 重复 BFS 找增广路径
        while let Some((path, bottleneck)) = Self::bfs_find_path(source, sink, &residual) {
            trace.path(
                path.iter().map(|&n| n.clone()).collect(),
                format!("Flow +{}", bottleneck),
            );

            // 沿路径增广
            for pair in path.windows(2) {
                let (u, v) = (pair[0], pair[1]);
                if let Some(cap) = residual.get_mut(u).and_then(|arcs| arcs.get_mut(v)) {
                    *cap -= bottleneck;
                }
                *residual.entry(v).or_default().entry(u).or_insert(0) += bottleneck;
            }

            max_flow_value += bottleneck;
            trace.info(format!("Max Flow: {}", max_flow_value));
        }

        if max_flow_value == 0 {
            trace.info("Max Flow: 0");
        }

        let source_side = Self::find_source_side(source, &residual);
        debug!(
            source = %source,
            sink = %sink,
            value = max_flow_value,
            cut = source_side.len(),
            "最大流计算完成"
        );

        Ok(MaxFlow {
            value: max_flow_value,
            trace: trace.finish(),
            source_side,
        })
    }

    /// BFS 找增广路径，返回路径和瓶颈容量
    fn bfs_find_path(
        source: &'a NodeId,
        sink: &'a NodeId,
        residual: &Residual<'a>,
    ) -> Option<(Vec<&'a NodeId>, Flow)> {
        let mut parent: HashMap<&NodeId, &NodeId> = HashMap::new();
        let mut queue = VecDeque::new();
        queue.push_back(source);

        let mut found = false;
        while let Some(u) = queue.pop_front() {
            if u == sink {
                found = true;
                break;
            }

            if let Some(arcs) = residual.get(u) {
                for (&v, &cap) in arcs {
                    if cap > 0 && v != source && !parent.contains_key(v) {
                        parent.insert(v, u);
                        queue.push_back(v);
                    }
                }
            }
        }

        if !found {
            return None;
        }

        // 重构路径并计算瓶颈
        let mut path = vec![sink];
        let mut current = sink;
        while current != source {
            current = *parent.get(current)?;
            path.push(current);
        }
        path.reverse();

        let bottleneck = path
            .windows(2)
            .filter_map(|pair| residual.get(pair[0]).and_then(|arcs| arcs.get(pair[1])))
            .copied()
            .min()?;

        Some((path, bottleneck))
    }

    /// 找最小割的源侧顶点
    fn find_source_side(source: &NodeId, residual: &Residual<'a>) -> BTreeSet<NodeId> {
        let mut visited: HashSet<&NodeId> = HashSet::new();
        let mut queue = VecDeque::new();

        visited.insert(source);
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            if let Some(arcs) = residual.get(u) {
                for (&v, &cap) in arcs {
                    if cap > 0 && visited.insert(v) {
                        queue.push_back(v);
                    }
                }
            }
        }

        visited.into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::graph::Weight;
    use crate::trace::TraceEvent;

    fn create_flow_graph() -> GraphStore {
        // 经典最大流测试图
        //     10       10
        // S -----> A -----> T
        // |        ^        ^
        // |5       |5       |
        // v        |        |
        // B -----> C ------>|
        //     10       10
        let mut graph = GraphStore::new(true);
        for id in ["s", "a", "b", "c", "t"] {
            graph.add_node(id, 0.0, 0.0);
        }
        graph.add_edge("s", "a", 10);
        graph.add_edge("s", "b", 5);
        graph.add_edge("a", "t", 10);
        graph.add_edge("b", "c", 10);
        graph.add_edge("c", "a", 5);
        graph.add_edge("c", "t", 10);
        graph
    }

    #[test]
    fn test_max_flow_basic() {
        let graph = create_flow_graph();
        let result = EdmondsKarp::new(&graph).max_flow("s", "t").unwrap();

        // 10 经 A，5 经 B-C
        assert_eq!(result.value, 15);
        assert_eq!(result.trace.last_info(), Some("Max Flow: 15"));
        // s 的两条出边都已饱和
        assert_eq!(result.source_side, BTreeSet::from([NodeId::from("s")]));
    }

    #[test]
    fn test_simple_flow() {
        let mut graph = GraphStore::new(true);
        for id in ["1", "2", "3"] {
            graph.add_node(id, 0.0, 0.0);
        }
        graph.add_edge("1", "2", 5);
        graph.add_edge("2", "3", 3);

        let result = EdmondsKarp::new(&graph).max_flow("1", "3").unwrap();

        // 瓶颈在 2 -> 3
        assert_eq!(result.value, 3);
        let events = result.trace.events();
        assert_eq!(events.len(), 2);
        match &events[0] {
            TraceEvent::Path { nodes, description } => {
                let nodes: Vec<&str> = nodes.iter().map(|n| n.as_str()).collect();
                assert_eq!(nodes, vec!["1", "2", "3"]);
                assert_eq!(description, "Flow +3");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parallel_paths() {
        let mut graph = GraphStore::new(true);
        for id in ["s", "a", "b", "t"] {
            graph.add_node(id, 0.0, 0.0);
        }
        // S -> A -> T (5), S -> B -> T (10)
        graph.add_edge("s", "a", 5);
        graph.add_edge("a", "t", 5);
        graph.add_edge("s", "b", 10);
        graph.add_edge("b", "t", 10);

        let result = EdmondsKarp::new(&graph).max_flow("s", "t").unwrap();
        assert_eq!(result.value, 15);
        assert_eq!(result.trace.paths().count(), 2);
    }

    #[test]
    fn test_graph_untouched() {
        let graph = create_flow_graph();
        let before = graph.adjacency().clone();
        EdmondsKarp::new(&graph).max_flow("s", "t").unwrap();

        assert_eq!(&before, graph.adjacency());
    }

    #[test]
    fn test_no_path() {
        let graph = create_flow_graph();
        let result = EdmondsKarp::new(&graph).max_flow("t", "s").unwrap();

        assert_eq!(result.value, 0);
        assert_eq!(result.trace.last_info(), Some("Max Flow: 0"));
        assert_eq!(result.trace.len(), 1);
    }

    #[test]
    fn test_same_source_and_sink() {
        let graph = create_flow_graph();
        let result = EdmondsKarp::new(&graph).max_flow("s", "s").unwrap();

        assert_eq!(result.value, 0);
        assert_eq!(result.trace.len(), 1);
    }

    #[test]
    fn test_undirected_flow() {
        let mut graph = GraphStore::new(false);
        for id in ["1", "2", "3"] {
            graph.add_node(id, 0.0, 0.0);
        }
        graph.add_edge("2", "1", 4);
        graph.add_edge("3", "2", 6);

        let result = EdmondsKarp::new(&graph).max_flow("1", "3").unwrap();
        assert_eq!(result.value, 4);
    }

    #[test]
    fn test_flow_near_weight_limit() {
        let big: Weight = 1 << 63;
        let mut graph = GraphStore::new(false);
        graph.add_node("1", 0.0, 0.0);
        graph.add_node("2", 0.0, 0.0);
        graph.add_edge("1", "2", big);

        let result = EdmondsKarp::new(&graph).max_flow("1", "2").unwrap();
        assert_eq!(result.value, Flow::from(big));
        assert_eq!(
            result.trace.last_info(),
            Some(format!("Max Flow: {}", big).as_str())
        );

        // 两条满权并行路径，总量超出 Weight 范围
        let mut graph = GraphStore::new(true);
        for id in ["s", "a", "b", "t"] {
            graph.add_node(id, 0.0, 0.0);
        }
        for mid in ["a", "b"] {
            graph.add_edge("s", mid, Weight::MAX);
            graph.add_edge(mid, "t", Weight::MAX);
        }
        let result = EdmondsKarp::new(&graph).max_flow("s", "t").unwrap();
        assert_eq!(result.value, 2 * Flow::from(Weight::MAX));
    }

    #[test]
    fn test_missing_nodes() {
        let graph = create_flow_graph();
        assert!(matches!(
            EdmondsKarp::new(&graph).max_flow("s", "x"),
            Err(Error::NodeNotFound(_))
        ));
    }
}
