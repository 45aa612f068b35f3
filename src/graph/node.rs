//! 顶点定义
//!
//! 顶点标识是不透明字符串；坐标只是布局元数据，算法从不读取。

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

/// 顶点 ID（图内唯一）
///
/// `Ord` 是普通字符串序，用于堆和 Kruskal 的规范方向；
/// 邻居遍历、矩阵输出使用 [`NodeId::natural_cmp`]。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 全部由 ASCII 数字组成
    pub fn is_numeric(&self) -> bool {
        is_numeric(&self.0)
    }

    /// 数值型 ID 按数值比较并排在非数值 ID 之前，其余按字典序
    pub fn natural_cmp(&self, other: &NodeId) -> Ordering {
        natural_cmp(&self.0, &other.0)
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// 自然序比较；任意长度的数字串都不会溢出
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (true, true) => {
            let ta = a.trim_start_matches('0');
            let tb = b.trim_start_matches('0');
            ta.len()
                .cmp(&tb.len())
                .then_with(|| ta.cmp(tb))
                .then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

/// 按自然序排序
pub fn sort_natural<T: Borrow<str>>(ids: &mut [T]) {
    ids.sort_by(|a, b| natural_cmp(a.borrow(), b.borrow()));
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// 顶点坐标，序列化为 `[x, y]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Position> for (f64, f64) {
    fn from(p: Position) -> Self {
        (p.x, p.y)
    }
}
