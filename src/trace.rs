//! 算法轨迹
//!
//! 每次算法调用都拥有一个新的 [`TraceSink`]，运行期间只追加，
//! 结束后交给调用方一个不可变的 [`Trace`]，供渲染层按节奏回放。

use crate::graph::{NodeId, Weight};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// 二分图着色类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ColorClass {
    A,
    B,
}

impl ColorClass {
    /// 另一种颜色
    pub fn flip(self) -> Self {
        match self {
            ColorClass::A => ColorClass::B,
            ColorClass::B => ColorClass::A,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            ColorClass::A => 0,
            ColorClass::B => 1,
        }
    }

    /// 渲染颜色
    pub fn hex(self) -> &'static str {
        match self {
            ColorClass::A => "#f44336",
            ColorClass::B => "#2196f3",
        }
    }
}

impl From<ColorClass> for u8 {
    fn from(c: ColorClass) -> Self {
        c.index()
    }
}

impl TryFrom<u8> for ColorClass {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(ColorClass::A),
            1 => Ok(ColorClass::B),
            other => Err(format!("invalid color class {}", other)),
        }
    }
}

/// 轨迹事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// 高亮一组顶点
    Highlight {
        nodes: Vec<NodeId>,
        #[serde(rename = "desc")]
        description: String,
    },
    /// 当前处理的顶点
    Current {
        node: NodeId,
        #[serde(rename = "desc")]
        description: String,
    },
    /// 经过边 u -> v
    Traverse {
        u: NodeId,
        v: NodeId,
        #[serde(rename = "desc")]
        description: String,
    },
    /// 松弛：v 的暂定距离更新为 new_cost
    Relax {
        u: NodeId,
        v: NodeId,
        new_cost: Weight,
        #[serde(rename = "desc")]
        description: String,
    },
    /// 为顶点着色
    Color {
        node: NodeId,
        color: ColorClass,
        #[serde(rename = "desc")]
        description: String,
    },
    /// 一条有序路径
    Path {
        nodes: Vec<NodeId>,
        #[serde(rename = "desc")]
        description: String,
    },
    /// 诊断或结果信息，不引用图元素
    Info {
        #[serde(rename = "desc")]
        description: String,
    },
}

impl TraceEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            TraceEvent::Highlight { .. } => "highlight",
            TraceEvent::Current { .. } => "current",
            TraceEvent::Traverse { .. } => "traverse",
            TraceEvent::Relax { .. } => "relax",
            TraceEvent::Color { .. } => "color",
            TraceEvent::Path { .. } => "path",
            TraceEvent::Info { .. } => "info",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            TraceEvent::Highlight { description, .. }
            | TraceEvent::Current { description, .. }
            | TraceEvent::Traverse { description, .. }
            | TraceEvent::Relax { description, .. }
            | TraceEvent::Color { description, .. }
            | TraceEvent::Path { description, .. }
            | TraceEvent::Info { description } => description,
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind(), self.description())
    }
}

/// 轨迹收集器（只追加）
#[derive(Debug, Default)]
pub struct TraceSink {
    events: Vec<TraceEvent>,
}

impl TraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn highlight(&mut self, nodes: Vec<NodeId>, description: impl Into<String>) {
        self.push(TraceEvent::Highlight {
            nodes,
            description: description.into(),
        });
    }

    pub fn current(&mut self, node: &NodeId, description: impl Into<String>) {
        self.push(TraceEvent::Current {
            node: node.clone(),
            description: description.into(),
        });
    }

    pub fn traverse(&mut self, u: &NodeId, v: &NodeId, description: impl Into<String>) {
        self.push(TraceEvent::Traverse {
            u: u.clone(),
            v: v.clone(),
            description: description.into(),
        });
    }

    pub fn relax(&mut self, u: &NodeId, v: &NodeId, new_cost: Weight, description: impl Into<String>) {
        self.push(TraceEvent::Relax {
            u: u.clone(),
            v: v.clone(),
            new_cost,
            description: description.into(),
        });
    }

    pub fn color(&mut self, node: &NodeId, color: ColorClass, description: impl Into<String>) {
        self.push(TraceEvent::Color {
            node: node.clone(),
            color,
            description: description.into(),
        });
    }

    pub fn path(&mut self, nodes: Vec<NodeId>, description: impl Into<String>) {
        self.push(TraceEvent::Path {
            nodes,
            description: description.into(),
        });
    }

    pub fn info(&mut self, description: impl Into<String>) {
        self.push(TraceEvent::Info {
            description: description.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 结束收集
    pub fn finish(self) -> Trace {
        Trace {
            events: self.events,
        }
    }
}

/// 完成的轨迹
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    /// 最后一个 Path 事件的顶点序列
    pub fn last_path(&self) -> Option<&[NodeId]> {
        self.events.iter().rev().find_map(|e| match e {
            TraceEvent::Path { nodes, .. } => Some(nodes.as_slice()),
            _ => None,
        })
    }

    /// 所有 Path 事件的顶点序列
    pub fn paths(&self) -> impl Iterator<Item = &[NodeId]> {
        self.events.iter().filter_map(|e| match e {
            TraceEvent::Path { nodes, .. } => Some(nodes.as_slice()),
            _ => None,
        })
    }

    /// 最后一个 Info 事件的描述
    pub fn last_info(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            TraceEvent::Info { description } => Some(description.as_str()),
            _ => None,
        })
    }

    /// Highlight / Current / Traverse 涉及的顶点，按首次出现顺序
    pub fn visited_nodes(&self) -> Vec<&NodeId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for event in &self.events {
            let nodes: Vec<&NodeId> = match event {
                TraceEvent::Highlight { nodes, .. } => nodes.iter().collect(),
                TraceEvent::Current { node, .. } => vec![node],
                TraceEvent::Traverse { v, .. } => vec![v],
                _ => continue,
            };
            for node in nodes {
                if seen.insert(node) {
                    order.push(node);
                }
            }
        }
        order
    }

    /// 所有 Traverse 事件的边
    pub fn traversed_edges(&self) -> Vec<(&NodeId, &NodeId)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Traverse { u, v, .. } => Some((u, v)),
                _ => None,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEvent;
    type IntoIter = std::slice::Iter<'a, TraceEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_event_json_shape() {
        let event = TraceEvent::Relax {
            u: id("1"),
            v: id("2"),
            new_cost: 5,
            description: "Update 2=5".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"type": "relax", "u": "1", "v": "2", "new_cost": 5, "desc": "Update 2=5"})
        );

        let color = TraceEvent::Color {
            node: id("3"),
            color: ColorClass::B,
            description: "paint".to_string(),
        };
        assert_eq!(serde_json::to_value(&color).unwrap()["color"], 1);
    }

    #[test]
    fn test_event_deserialize() {
        let event: TraceEvent =
            serde_json::from_str(r#"{"type": "info", "desc": "Max Flow: 3"}"#).unwrap();
        assert_eq!(event.description(), "Max Flow: 3");
        assert_eq!(event.kind(), "info");

        let bad: Result<TraceEvent, _> =
            serde_json::from_str(r#"{"type": "color", "node": "1", "color": 2, "desc": ""}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_sink_finish() {
        let mut sink = TraceSink::new();
        sink.highlight(vec![id("1")], "start");
        sink.current(&id("1"), "pop 1");
        sink.traverse(&id("1"), &id("2"), "visit 2");
        sink.traverse(&id("2"), &id("1"), "back to 1");
        sink.path(vec![id("1"), id("2")], "path");
        sink.info("done");
        assert_eq!(sink.len(), 6);

        let trace = sink.finish();
        assert_eq!(trace.visited_nodes(), vec![&id("1"), &id("2")]);
        assert_eq!(trace.traversed_edges().len(), 2);
        assert_eq!(trace.last_path(), Some(&[id("1"), id("2")][..]));
        assert_eq!(trace.last_info(), Some("done"));
    }

    #[test]
    fn test_color_class() {
        assert_eq!(ColorClass::A.flip(), ColorClass::B);
        assert_eq!(ColorClass::B.flip(), ColorClass::A);
        assert_eq!(ColorClass::A.hex(), "#f44336");
        assert_eq!(ColorClass::try_from(1u8), Ok(ColorClass::B));
    }
}
