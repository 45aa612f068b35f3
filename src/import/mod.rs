//! 数据导入模块
//!
//! 从纯文本边列表导入图：每行 `u v [w]`，权重缺省为 1。
//! 顶点按字典序排列后均匀摆放在圆周上，然后依次回放所有边。

use crate::error::{Error, Result};
use crate::graph::{GraphStore, NodeId, Position, Weight};
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// 圆形布局的圆心
pub const LAYOUT_CENTER: (f64, f64) = (600.0, 400.0);
/// 圆形布局的半径
pub const LAYOUT_RADIUS: f64 = 250.0;

/// 导入统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub nodes_imported: usize,
    pub edges_imported: usize,
    pub skipped_lines: usize,
    pub duration_ms: u64,
}

/// 解析后的边列表
#[derive(Debug, Default, Clone)]
pub struct EdgeList {
    edges: Vec<(NodeId, NodeId, Weight)>,
    skipped_lines: usize,
}

impl EdgeList {
    /// 解析文本；不足两个字段的行被跳过，权重不是整数时报错
    pub fn parse(text: &str) -> Result<Self> {
        let mut list = EdgeList::default();
        for (lineno, line) in text.lines().enumerate() {
            list.push_line(lineno + 1, line)?;
        }
        Ok(list)
    }

    /// 从文件读取
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut list = EdgeList::default();
        for (lineno, line) in reader.lines().enumerate() {
            list.push_line(lineno + 1, &line?)?;
        }
        Ok(list)
    }

    fn push_line(&mut self, lineno: usize, line: &str) -> Result<()> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (u, v) = match parts.as_slice() {
            [u, v, ..] => (*u, *v),
            _ => {
                self.skipped_lines += 1;
                return Ok(());
            }
        };

        let weight = match parts.get(2) {
            Some(raw) => raw.parse::<Weight>().map_err(|e| {
                Error::ParseError(format!("第 {} 行权重无效 '{}': {}", lineno, raw, e))
            })?,
            None => 1,
        };

        self.edges.push((NodeId::from(u), NodeId::from(v), weight));
        Ok(())
    }

    /// 出现过的顶点（字典序）
    pub fn nodes(&self) -> Vec<&NodeId> {
        self.edges
            .iter()
            .flat_map(|(u, v, _)| [u, v])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn edges(&self) -> &[(NodeId, NodeId, Weight)] {
        &self.edges
    }

    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// 清空图（保留模式）后写入顶点和边
    pub fn apply_to(&self, graph: &mut GraphStore) -> ImportStats {
        let started = Instant::now();
        graph.clear();

        let nodes = self.nodes();
        for (id, pos) in nodes.iter().copied().zip(circle_layout(nodes.len())) {
            graph.add_node(id.clone(), pos.x, pos.y);
        }
        for (u, v, w) in &self.edges {
            graph.add_edge(u.as_str(), v.as_str(), *w);
        }

        let stats = ImportStats {
            nodes_imported: nodes.len(),
            edges_imported: self.edges.len(),
            skipped_lines: self.skipped_lines,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            nodes = stats.nodes_imported,
            edges = stats.edges_imported,
            skipped = stats.skipped_lines,
            "边列表导入完成"
        );
        stats
    }

    /// 构造新图
    pub fn into_graph(&self, directed: bool) -> (GraphStore, ImportStats) {
        let mut graph = GraphStore::new(directed);
        let stats = self.apply_to(&mut graph);
        (graph, stats)
    }
}

/// 在圆周上均匀摆放 count 个点，坐标截断为整数
pub fn circle_layout(count: usize) -> Vec<Position> {
    if count == 0 {
        return Vec::new();
    }
    let (cx, cy) = LAYOUT_CENTER;
    let step = 2.0 * PI / count as f64;
    let positions: Vec<Position> = (0..count)
        .map(|i| {
            let angle = i as f64 * step;
            Position::new(
                cx + (LAYOUT_RADIUS * angle.cos()).trunc(),
                cy + (LAYOUT_RADIUS * angle.sin()).trunc(),
            )
        })
        .collect();
    debug!(count, "生成圆形布局");
    positions
}

/// 从文件导入到已有的图
pub fn import_edge_list<P: AsRef<Path>>(path: P, graph: &mut GraphStore) -> Result<ImportStats> {
    let list = EdgeList::read(path)?;
    Ok(list.apply_to(graph))
}
