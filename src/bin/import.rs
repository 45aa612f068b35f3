//! TraceGraph 数据导入工具
//!
//! 把 `u v [w]` 格式的边列表转换为 JSON 图文档

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracegraph::import::EdgeList;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tracegraph-import")]
#[command(about = "TraceGraph 边列表导入工具")]
struct Args {
    /// 输入文件路径
    #[arg(short, long)]
    input: PathBuf,

    /// 输出文档路径
    #[arg(short, long, default_value = "graph.json")]
    output: PathBuf,

    /// 作为有向图导入
    #[arg(short, long)]
    directed: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tracegraph=info")),
        )
        .init();

    let args = Args::parse();

    println!("TraceGraph 边列表导入工具");
    println!("========================");
    println!("输入文件: {}", args.input.display());
    println!("输出文档: {}", args.output.display());
    println!("模式: {}", if args.directed { "directed" } else { "undirected" });

    let list = EdgeList::read(&args.input)
        .with_context(|| format!("无法读取边列表 {}", args.input.display()))?;
    let (graph, stats) = list.into_graph(args.directed);

    graph
        .save_to_file(&args.output)
        .with_context(|| format!("无法写入 {}", args.output.display()))?;

    println!("\n导入完成!");
    println!("  顶点导入: {}", stats.nodes_imported);
    println!("  边导入: {}", stats.edges_imported);
    println!("  跳过行数: {}", stats.skipped_lines);
    println!("  耗时: {} ms", stats.duration_ms);

    Ok(())
}
