//! TraceGraph CLI 工具
//!
//! 交互式命令行界面

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::path::PathBuf;
use tracegraph::algorithm::{Algorithm, AlgorithmArgs};
use tracegraph::cli::{CommandCompleter, CommandResult, Printer, Session};
use tracegraph::graph::GraphStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tracegraph-cli")]
#[command(about = "TraceGraph 命令行工具")]
struct Args {
    /// 启动时加载的图文档
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// 执行单个算法后退出
    #[arg(short, long)]
    run: Option<String>,

    /// 算法起点
    #[arg(short, long)]
    start: Option<String>,

    /// 算法终点
    #[arg(short, long)]
    end: Option<String>,

    /// 以 JSON 输出单次执行结果
    #[arg(long)]
    json: bool,

    /// 空图的初始模式
    #[arg(long)]
    undirected: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tracegraph=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let graph = match &args.file {
        Some(path) => GraphStore::load_from_file(path)
            .with_context(|| format!("无法加载图文档 {}", path.display()))?,
        None => GraphStore::new(!args.undirected),
    };

    // 单次执行模式
    if let Some(name) = &args.run {
        let algorithm: Algorithm = name.parse()?;
        let algorithm_args = AlgorithmArgs {
            start: args.start.clone(),
            end: args.end.clone(),
        };
        let outcome = algorithm.run(&graph, &algorithm_args)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            print!("{}", Printer::new().format_outcome(&outcome));
        }
        return Ok(());
    }

    println!("TraceGraph CLI - 可回放的图算法引擎");
    println!("====================================");
    println!(
        "  顶点数: {}  边数: {}  模式: {}",
        graph.node_count(),
        graph.edge_count(),
        if graph.is_directed() { "directed" } else { "undirected" }
    );
    println!("\n输入 'help' 查看命令列表，'quit' 退出\n");

    let mut session = Session::new(graph);
    let mut editor: Editor<CommandCompleter, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(CommandCompleter::new()));

    let history = dirs::home_dir().map(|home| home.join(".tracegraph_history"));
    if let Some(path) = &history {
        // 首次运行时历史文件不存在
        let _ = editor.load_history(path);
    }

    loop {
        let line = match editor.readline("tracegraph> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        editor.add_history_entry(line)?;

        match session.execute(line) {
            CommandResult::Exit => break,
            CommandResult::Continue => {}
            CommandResult::Message(text) => print!("{}", ensure_newline(text)),
            CommandResult::Error(e) => println!("{} {}", "错误:".red().bold(), e),
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }

    println!("再见！");
    Ok(())
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
