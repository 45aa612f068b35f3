//! REPL 命令处理
//!
//! 解析一行输入，作用在会话持有的图上，返回要显示的文本。

use super::printer::Printer;
use crate::algorithm::{Algorithm, AlgorithmArgs};
use crate::error::{Error, Result};
use crate::graph::{GraphStore, Weight};
use crate::import::EdgeList;
use tracing::debug;

/// 命令执行结果
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// 继续运行
    Continue,
    /// 退出程序
    Exit,
    /// 显示消息
    Message(String),
    /// 错误
    Error(String),
}

/// 交互会话
#[derive(Default)]
pub struct Session {
    graph: GraphStore,
    printer: Printer,
}

impl Session {
    pub fn new(graph: GraphStore) -> Self {
        Self {
            graph,
            printer: Printer::new(),
        }
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    /// 解析并执行一行命令
    pub fn execute(&mut self, input: &str) -> CommandResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some((&cmd, args)) = parts.split_first() else {
            return CommandResult::Continue;
        };
        let cmd = cmd.to_lowercase();
        debug!(command = %cmd, args = ?args, "执行命令");

        match self.dispatch(&cmd, args) {
            Ok(result) => result,
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }

    fn dispatch(&mut self, cmd: &str, args: &[&str]) -> Result<CommandResult> {
        let result = match cmd {
            "quit" | "exit" | "q" => CommandResult::Exit,
            "help" | "h" | "?" => CommandResult::Message(Printer::print_help()),

            "node" => {
                let id = arg(args, 0, "id")?;
                let (x, y) = coordinates(&args[1..])?;
                self.graph.add_node(id, x, y);
                CommandResult::Message(format!("顶点 {} 已添加", id))
            }
            "node+" => {
                let (x, y) = coordinates(args)?;
                let id = self.graph.next_node_id();
                self.graph.add_node(id.clone(), x, y);
                CommandResult::Message(format!("顶点 {} 已添加", id))
            }
            "edge" => {
                let (u, v) = (arg(args, 0, "u")?, arg(args, 1, "v")?);
                let weight = match args.get(2) {
                    Some(raw) => parse_number::<Weight>(raw)?,
                    None => 1,
                };
                self.graph.require_node(u)?;
                self.graph.require_node(v)?;
                self.graph.add_edge(u, v, weight);
                CommandResult::Message(format!("边 {} {} {} (w={}) 已添加", u, self.arrow(), v, weight))
            }
            "rmnode" => {
                let id = arg(args, 0, "id")?;
                if !self.graph.remove_node(id) {
                    return Err(Error::NodeNotFound(id.to_string()));
                }
                CommandResult::Message(format!("顶点 {} 已删除", id))
            }
            "rmedge" => {
                let (u, v) = (arg(args, 0, "u")?, arg(args, 1, "v")?);
                self.graph.remove_edge(u, v)?;
                CommandResult::Message(format!("边 {} {} {} 已删除", u, self.arrow(), v))
            }
            "mode" => {
                let directed = match arg(args, 0, "mode")? {
                    "directed" | "d" => true,
                    "undirected" | "u" => false,
                    other => {
                        return Err(Error::ParseError(format!(
                            "未知模式: {} (directed|undirected)",
                            other
                        )))
                    }
                };
                self.graph.set_mode(directed);
                CommandResult::Message(format!("模式: {}", mode_name(directed)))
            }
            "clear" => {
                self.graph.clear();
                CommandResult::Message("图已清空".to_string())
            }

            "matrix" => CommandResult::Message(self.printer.format_matrix(&self.graph.matrix())),
            "adj" => CommandResult::Message(self.printer.format_adjacency(&self.graph)),
            "edges" => CommandResult::Message(self.printer.format_edges(&self.graph)),
            "stats" | "info" => CommandResult::Message(self.printer.print_stats(&self.graph)),

            "run" => {
                let algorithm: Algorithm = arg(args, 0, "algorithm")?.parse()?;
                let algorithm_args = AlgorithmArgs::new(args.get(1).copied(), args.get(2).copied());
                let outcome = algorithm.run(&self.graph, &algorithm_args)?;
                CommandResult::Message(self.printer.format_outcome(&outcome))
            }

            "save" => {
                let path = arg(args, 0, "file")?;
                self.graph.save_to_file(path)?;
                CommandResult::Message(format!("已保存到 {}", path))
            }
            "load" => {
                let path = arg(args, 0, "file")?;
                self.graph = GraphStore::load_from_file(path)?;
                CommandResult::Message(format!(
                    "已加载 {}: {} 个顶点, {} 条边",
                    path,
                    self.graph.node_count(),
                    self.graph.edge_count()
                ))
            }
            "import" => {
                let path = arg(args, 0, "file")?;
                let stats = EdgeList::read(path)?.apply_to(&mut self.graph);
                CommandResult::Message(format!(
                    "已导入 {} 个顶点, {} 条边 (跳过 {} 行)",
                    stats.nodes_imported, stats.edges_imported, stats.skipped_lines
                ))
            }

            other => CommandResult::Error(format!("未知命令: {}。输入 'help' 查看帮助。", other)),
        };
        Ok(result)
    }

    fn arrow(&self) -> &'static str {
        if self.graph.is_directed() {
            "->"
        } else {
            "--"
        }
    }
}

fn mode_name(directed: bool) -> &'static str {
    if directed {
        "directed"
    } else {
        "undirected"
    }
}

fn arg<'a>(args: &[&'a str], index: usize, name: &'static str) -> Result<&'a str> {
    args.get(index).copied().ok_or(Error::MissingArgument(name))
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| Error::ParseError(format!("'{}': {}", raw, e)))
}

/// 可选的 `x y` 坐标，缺省为原点；只给一个坐标是错误
fn coordinates(args: &[&str]) -> Result<(f64, f64)> {
    match args {
        [] => Ok((0.0, 0.0)),
        [x] => Err(Error::ParseError(format!("坐标 '{}' 缺少 y 值", x))),
        [x, y, ..] => Ok((parse_number(x)?, parse_number(y)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn message(result: CommandResult) -> String {
        match result {
            CommandResult::Message(text) => text,
            other => panic!("unexpected result: {:?}", other),
        }
    }

    fn session_with_path() -> Session {
        let mut session = Session::default();
        for line in ["node 1", "node 2 10 20", "node 3", "edge 1 2 5", "edge 2 3"] {
            message(session.execute(line));
        }
        session
    }

    #[test]
    fn test_build_graph() {
        let session = session_with_path();
        let graph = session.graph();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.adjacency()["1"]["2"], 5);
        assert_eq!(graph.adjacency()["2"]["3"], 1);
        assert_eq!(graph.position("2").map(|p| (p.x, p.y)), Some((10.0, 20.0)));
    }

    #[test]
    fn test_auto_numbered_node() {
        let mut session = session_with_path();
        let text = message(session.execute("node+ 5 5"));

        assert!(text.contains('4'));
        assert!(session.graph().contains_node("4"));
    }

    #[test]
    fn test_errors() {
        let mut session = session_with_path();

        assert!(matches!(session.execute("edge 1 9"), CommandResult::Error(_)));
        assert!(matches!(session.execute("edge 1 2 x"), CommandResult::Error(_)));
        assert!(matches!(session.execute("rmedge 3 1"), CommandResult::Error(_)));
        assert!(matches!(session.execute("run astar"), CommandResult::Error(_)));
        assert!(matches!(session.execute("run bfs"), CommandResult::Error(_)));
        assert!(matches!(session.execute("mode sideways"), CommandResult::Error(_)));
        assert!(matches!(session.execute("frobnicate"), CommandResult::Error(_)));
        assert_eq!(session.execute("   "), CommandResult::Continue);
        assert_eq!(session.execute("quit"), CommandResult::Exit);
    }

    #[test]
    fn test_single_coordinate_rejected() {
        let mut session = session_with_path();

        assert!(matches!(session.execute("node 5 10"), CommandResult::Error(_)));
        assert!(matches!(session.execute("node+ 10"), CommandResult::Error(_)));
        assert!(!session.graph().contains_node("5"));
        assert_eq!(session.graph().node_count(), 3);
    }

    #[test]
    fn test_mode_and_remove() {
        let mut session = session_with_path();
        message(session.execute("mode undirected"));
        assert!(session.graph().adjacency()["2"].contains_key("1"));

        message(session.execute("rmedge 1 2"));
        assert!(!session.graph().adjacency()["2"].contains_key("1"));

        message(session.execute("rmnode 3"));
        assert_eq!(session.graph().node_count(), 2);
        assert_eq!(session.graph().edge_count(), 0);
    }

    #[test]
    fn test_run_algorithm() {
        colored::control::set_override(false);
        let mut session = session_with_path();
        let text = message(session.execute("run ford 1 3"));
        assert!(text.contains("最大流: 1"));
    }

    #[test]
    fn test_save_load_import() {
        let dir = tempdir().unwrap();
        let doc = dir.path().join("graph.json");
        let doc = doc.to_str().unwrap();

        let mut session = session_with_path();
        message(session.execute(&format!("save {}", doc)));
        message(session.execute("clear"));
        assert_eq!(session.graph().node_count(), 0);

        message(session.execute(&format!("load {}", doc)));
        assert_eq!(session.graph().node_count(), 3);
        assert_eq!(session.graph().adjacency()["1"]["2"], 5);

        let list = dir.path().join("edges.txt");
        std::fs::write(&list, "a b 2\nb c\n").unwrap();
        let text = message(session.execute(&format!("import {}", list.display())));
        assert!(text.contains("3 个顶点"));
        assert!(session.graph().contains_node("a"));
        assert!(!session.graph().contains_node("1"));
    }
}
