//! 按名称调用算法
//!
//! CLI 和 HTTP 服务共用的统一入口：解析算法名，检查参数，执行并包装结果。

use super::{BipartiteChecker, Coloring, EdmondsKarp, Fleury, Flow, Hierholzer, Kruskal, Prim};
use super::{Dijkstra, Traversal};
use crate::error::{Error, Result};
use crate::graph::{GraphStore, NodeId};
use crate::trace::Trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// 可调用的算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Bfs,
    Dfs,
    Dijkstra,
    Bipartite,
    Prim,
    Kruskal,
    FordFulkerson,
    Fleury,
    Hierholzer,
}

/// 算法所需参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSpec {
    /// 无参数
    None,
    /// 需要起点
    Start,
    /// 需要起点和终点
    StartEnd,
    /// 起点可选
    OptionalStart,
}

impl Algorithm {
    pub const ALL: [Algorithm; 9] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Dijkstra,
        Algorithm::Bipartite,
        Algorithm::Prim,
        Algorithm::Kruskal,
        Algorithm::FordFulkerson,
        Algorithm::Fleury,
        Algorithm::Hierholzer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Bipartite => "bipartite",
            Algorithm::Prim => "prim",
            Algorithm::Kruskal => "kruskal",
            Algorithm::FordFulkerson => "ford_fulkerson",
            Algorithm::Fleury => "fleury",
            Algorithm::Hierholzer => "hierholzer",
        }
    }

    pub fn arg_spec(self) -> ArgSpec {
        match self {
            Algorithm::Bfs | Algorithm::Dfs => ArgSpec::Start,
            Algorithm::Dijkstra | Algorithm::FordFulkerson => ArgSpec::StartEnd,
            Algorithm::Bipartite | Algorithm::Kruskal => ArgSpec::None,
            Algorithm::Prim | Algorithm::Fleury | Algorithm::Hierholzer => ArgSpec::OptionalStart,
        }
    }

    /// 执行算法
    pub fn run(self, graph: &GraphStore, args: &AlgorithmArgs) -> Result<AlgorithmOutcome> {
        let start = args.start.as_deref();
        let end = args.end.as_deref();
        let required_start = || start.ok_or(Error::MissingArgument("start"));
        let required_end = || end.ok_or(Error::MissingArgument("end"));

        let outcome = match self {
            Algorithm::Bfs => AlgorithmOutcome::from_trace(self, Traversal::new(graph).bfs(required_start()?)?),
            Algorithm::Dfs => AlgorithmOutcome::from_trace(self, Traversal::new(graph).dfs(required_start()?)?),
            Algorithm::Dijkstra => {
                let (s, e) = (required_start()?, required_end()?);
                AlgorithmOutcome::from_trace(self, Dijkstra::new(graph).shortest_path(s, e)?)
            }
            Algorithm::Bipartite => {
                let result = BipartiteChecker::new(graph).check();
                AlgorithmOutcome {
                    is_bipartite: Some(result.is_bipartite),
                    coloring: result.coloring,
                    ..AlgorithmOutcome::from_trace(self, result.trace)
                }
            }
            Algorithm::Prim => AlgorithmOutcome::from_trace(self, Prim::new(graph).run(start)?),
            Algorithm::Kruskal => AlgorithmOutcome::from_trace(self, Kruskal::new(graph).run()),
            Algorithm::FordFulkerson => {
                let (s, e) = (required_start()?, required_end()?);
                let flow = EdmondsKarp::new(graph).max_flow(s, e)?;
                AlgorithmOutcome {
                    max_flow: Some(flow.value),
                    source_side: Some(flow.source_side),
                    ..AlgorithmOutcome::from_trace(self, flow.trace)
                }
            }
            Algorithm::Fleury => AlgorithmOutcome::from_trace(self, Fleury::new(graph).run(start)?),
            Algorithm::Hierholzer => {
                AlgorithmOutcome::from_trace(self, Hierholzer::new(graph).run(start)?)
            }
        };

        debug!(
            algorithm = self.name(),
            start = ?start,
            end = ?end,
            events = outcome.trace.len(),
            "算法执行完成"
        );
        Ok(outcome)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "ford" | "maxflow" | "max_flow" => Ok(Algorithm::FordFulkerson),
            name => Algorithm::ALL
                .into_iter()
                .find(|a| a.name() == name)
                .ok_or_else(|| Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// 调用参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmArgs {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl AlgorithmArgs {
    pub fn new(start: Option<impl Into<String>>, end: Option<impl Into<String>>) -> Self {
        Self {
            start: start.map(Into::into),
            end: end.map(Into::into),
        }
    }
}

/// 执行结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmOutcome {
    pub algorithm: Algorithm,
    pub trace: Trace,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bipartite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coloring: Option<Coloring>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_flow: Option<Flow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_side: Option<BTreeSet<NodeId>>,
}

impl AlgorithmOutcome {
    fn from_trace(algorithm: Algorithm, trace: Trace) -> Self {
        Self {
            algorithm,
            trace,
            is_bipartite: None,
            coloring: None,
            max_flow: None,
            source_side: None,
        }
    }
}
