//! TraceGraph 服务器入口
//!
//! 启动 HTTP API 服务器

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracegraph::graph::GraphStore;
use tracegraph::server::{start_server, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tracegraph-server")]
#[command(about = "TraceGraph HTTP API 服务器")]
struct Args {
    /// 监听地址
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// 监听端口
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// 启动时加载的图文档
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// 空图的初始模式
    #[arg(long)]
    undirected: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tracegraph=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let graph = match &args.graph {
        Some(path) => GraphStore::load_from_file(path)
            .with_context(|| format!("无法加载图文档 {}", path.display()))?,
        None => GraphStore::new(!args.undirected),
    };
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        directed = graph.is_directed(),
        "图已就绪"
    );

    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };

    start_server(config, graph).await?;

    Ok(())
}
