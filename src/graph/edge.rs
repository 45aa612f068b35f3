//! 边定义
//!
//! 原始边是三元组 (src, dst, weight)，是邻接表的唯一数据来源。

use crate::graph::node::NodeId;
use serde::{Deserialize, Serialize};

/// 边权（非负整数）
pub type Weight = u64;

/// 边
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// 源顶点 ID
    src: NodeId,
    /// 目标顶点 ID
    dst: NodeId,
    /// 权重
    weight: Weight,
}

impl Edge {
    /// 创建新边
    pub fn new(src: impl Into<NodeId>, dst: impl Into<NodeId>, weight: Weight) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            weight,
        }
    }

    /// 获取源顶点
    pub fn src(&self) -> &NodeId {
        &self.src
    }

    /// 获取目标顶点
    pub fn dst(&self) -> &NodeId {
        &self.dst
    }

    /// 获取权重
    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub(crate) fn set_weight(&mut self, weight: Weight) {
        self.weight = weight;
    }

    /// 端点是否包含给定顶点
    pub fn touches(&self, id: &str) -> bool {
        self.src.as_str() == id || self.dst.as_str() == id
    }

    /// 是否为 (src, dst) 这一有序对
    pub fn connects(&self, src: &str, dst: &str) -> bool {
        self.src.as_str() == src && self.dst.as_str() == dst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_endpoints() {
        let e = Edge::new("1", "2", 5);

        assert_eq!(e.src().as_str(), "1");
        assert_eq!(e.dst().as_str(), "2");
        assert_eq!(e.weight(), 5);
        assert!(e.touches("2"));
        assert!(!e.touches("3"));
        assert!(e.connects("1", "2"));
        assert!(!e.connects("2", "1"));
    }
}
