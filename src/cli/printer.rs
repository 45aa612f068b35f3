//! 结果打印器
//!
//! 邻接矩阵用 prettytable 输出表格，轨迹事件按类型着色。

use crate::algorithm::AlgorithmOutcome;
use crate::graph::{AdjacencyMatrix, GraphStore};
use crate::trace::{ColorClass, Trace, TraceEvent};
use colored::{ColoredString, Colorize};
use prettytable::{format, row, Cell, Row, Table};

/// 结果打印器
#[derive(Default)]
pub struct Printer;

impl Printer {
    pub fn new() -> Self {
        Self
    }

    /// 邻接矩阵表格，0 表示无边
    pub fn format_matrix(&self, matrix: &AdjacencyMatrix) -> String {
        if matrix.nodes.is_empty() {
            return "Empty graph\n".to_string();
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        let mut header = vec![Cell::new("")];
        header.extend(matrix.nodes.iter().map(|n| Cell::new(n.as_str())));
        table.set_titles(Row::new(header));

        for (id, weights) in matrix.nodes.iter().zip(&matrix.weights) {
            let mut cells = vec![Cell::new(id.as_str())];
            cells.extend(weights.iter().map(|w| Cell::new(&w.to_string())));
            table.add_row(Row::new(cells));
        }

        table.to_string()
    }

    /// 邻接表，每行 `u: v(w) ...`
    pub fn format_adjacency(&self, graph: &GraphStore) -> String {
        let mut output = String::new();
        for (id, _) in graph.nodes() {
            let neighbors: Vec<String> = graph
                .neighbors(id.as_str())
                .into_iter()
                .map(|(v, w)| format!("{}({})", v, w))
                .collect();
            output.push_str(&format!("{}: {}\n", id, neighbors.join(" ")));
        }
        output
    }

    /// 边列表；有向图用 `->`，无向图用 `--`
    pub fn format_edges(&self, graph: &GraphStore) -> String {
        let arrow = if graph.is_directed() { "->" } else { "--" };
        let edges = graph.edge_list();
        let mut output = String::new();
        for edge in &edges {
            output.push_str(&format!(
                "{} {} {} (w={})\n",
                edge.src(),
                arrow,
                edge.dst(),
                edge.weight()
            ));
        }
        output.push_str(&format!("{} edge(s)\n", edges.len()));
        output
    }

    /// 带编号的彩色事件列表
    pub fn format_trace(&self, trace: &Trace) -> String {
        if trace.is_empty() {
            return "(no events)\n".to_string();
        }

        let width = trace.len().to_string().len();
        let mut output = String::new();
        for (i, event) in trace.iter().enumerate() {
            output.push_str(&format!(
                "{:>width$}. {:<9} {}\n",
                i + 1,
                kind_label(event),
                event_detail(event),
                width = width
            ));
        }
        output
    }

    /// 轨迹加上算法结论
    pub fn format_outcome(&self, outcome: &AlgorithmOutcome) -> String {
        let mut output = format!("{} {}\n", "算法:".bold(), outcome.algorithm);
        output.push_str(&self.format_trace(&outcome.trace));

        if let Some(is_bipartite) = outcome.is_bipartite {
            let verdict = if is_bipartite { "是".green() } else { "否".red() };
            output.push_str(&format!("二分图: {}\n", verdict));
        }
        if let Some(coloring) = &outcome.coloring {
            for class in [ColorClass::A, ColorClass::B] {
                let members: Vec<&str> = coloring
                    .iter()
                    .filter(|&(_, &c)| c == class)
                    .map(|(id, _)| id.as_str())
                    .collect();
                output.push_str(&format!(
                    "  组 {}: {}\n",
                    paint_class(class, class.index().to_string()),
                    members.join(", ")
                ));
            }
        }
        if let Some(value) = outcome.max_flow {
            output.push_str(&format!("最大流: {}\n", value.to_string().bold()));
        }
        if let Some(source_side) = &outcome.source_side {
            let side: Vec<&str> = source_side.iter().map(|n| n.as_str()).collect();
            output.push_str(&format!("最小割源侧: {{{}}}\n", side.join(", ")));
        }
        if let Some(path) = outcome.trace.last_path() {
            let nodes: Vec<&str> = path.iter().map(|n| n.as_str()).collect();
            output.push_str(&format!("路径: {}\n", nodes.join(" -> ").cyan()));
        }

        output
    }

    /// 打印统计信息
    pub fn print_stats(&self, graph: &GraphStore) -> String {
        let mode = if graph.is_directed() { "directed" } else { "undirected" };
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Property", "Value"]);
        table.add_row(row!["Mode", mode]);
        table.add_row(row!["Node Count", graph.node_count().to_string()]);
        table.add_row(row!["Edge Count", graph.edge_count().to_string()]);
        table.add_row(row!["Distinct Edges", graph.edge_list().len().to_string()]);
        table.to_string()
    }

    /// 打印帮助信息
    pub fn print_help() -> String {
        r#"
═══════════════════════════════════════════════════════════════
                   TraceGraph CLI 命令帮助
═══════════════════════════════════════════════════════════════

图编辑:
  node <ID> [x y]        添加顶点（已存在则更新坐标）
  node+ [x y]            自动编号添加顶点
  edge <u> <v> [w]       添加边，权重缺省为 1
  rmnode <ID>            删除顶点及其关联边
  rmedge <u> <v>         删除边
  mode directed|undirected
                         切换有向 / 无向模式
  clear                  清空图（保留模式）

查看:
  matrix                 邻接矩阵
  adj                    邻接表
  edges                  边列表
  stats                  图统计信息

算法:
  run <算法> [起点] [终点]
    bfs <起点>           广度优先遍历
    dfs <起点>           深度优先遍历
    dijkstra <起点> <终点>
                         最短路径
    bipartite            二分图检测
    prim [起点]          最小生成树 (Prim)
    kruskal              最小生成树 (Kruskal)
    ford <源点> <汇点>   最大流 (Edmonds-Karp)
    fleury [起点]        欧拉路径 (Fleury)
    hierholzer [起点]    欧拉回路 (Hierholzer)

文件:
  save <file>            保存为 JSON 文档
  load <file>            加载 JSON 文档
  import <file>          导入 `u v [w]` 边列表

  help, h, ?             显示帮助
  quit, exit, q          退出程序

═══════════════════════════════════════════════════════════════
"#
        .to_string()
    }
}

fn kind_label(event: &TraceEvent) -> ColoredString {
    let kind = event.kind();
    match event {
        TraceEvent::Highlight { .. } => kind.yellow().bold(),
        TraceEvent::Current { .. } => kind.magenta(),
        TraceEvent::Traverse { .. } => kind.green(),
        TraceEvent::Relax { .. } => kind.blue(),
        TraceEvent::Color { color, .. } => paint_class(*color, kind.to_string()),
        TraceEvent::Path { .. } => kind.cyan().bold(),
        TraceEvent::Info { .. } => kind.white().dimmed(),
    }
}

fn event_detail(event: &TraceEvent) -> String {
    match event {
        TraceEvent::Highlight { nodes, description } | TraceEvent::Path { nodes, description } => {
            let ids: Vec<&str> = nodes.iter().map(|n| n.as_str()).collect();
            format!("[{}] {}", ids.join(", "), description)
        }
        TraceEvent::Current { node, description } => format!("{} {}", node, description),
        TraceEvent::Traverse { u, v, description } => format!("{}->{} {}", u, v, description),
        TraceEvent::Relax {
            u,
            v,
            new_cost,
            description,
        } => format!("{}->{} cost={} {}", u, v, new_cost, description),
        TraceEvent::Color {
            node,
            color,
            description,
        } => format!("{}={} {}", node, color.index(), description),
        TraceEvent::Info { description } => description.clone(),
    }
}

fn paint_class(class: ColorClass, text: String) -> ColoredString {
    match class {
        ColorClass::A => text.red(),
        ColorClass::B => text.blue(),
    }
}
