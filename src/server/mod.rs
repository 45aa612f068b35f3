//! HTTP 服务器模块
//!
//! 提供图编辑和算法执行的 REST API，供浏览器端回放轨迹。
//! 整个服务共享一个 `GraphStore`；算法执行期间持有读锁，编辑无法穿插。

use crate::algorithm::{Algorithm, AlgorithmArgs};
use crate::error::{Error, Result};
use crate::graph::{GraphDocument, GraphStore, NodeId, Weight};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 应用状态
#[derive(Clone, Default)]
pub struct AppState {
    pub graph: Arc<RwLock<GraphStore>>,
}

impl AppState {
    pub fn new(graph: GraphStore) -> Self {
        Self {
            graph: Arc::new(RwLock::new(graph)),
        }
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // 整图
        .route("/graph", get(get_graph).put(put_graph).delete(clear_graph))
        .route("/mode", put(set_mode))
        .route("/matrix", get(get_matrix))
        // 顶点和边
        .route("/nodes", post(add_node))
        .route("/nodes/:id", axum::routing::delete(remove_node))
        .route("/edges", get(list_edges).post(add_edge))
        .route("/edges/:u/:v", axum::routing::delete(remove_edge))
        // 图算法
        .route("/algorithm/:name", post(run_algorithm))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 启动服务器
pub async fn start_server(config: ServerConfig, graph: GraphStore) -> Result<()> {
    let app = router(AppState::new(graph));

    let addr = config.addr();
    info!("TraceGraph 服务器启动于 http://{}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::ServerError(format!("绑定地址失败: {}", e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::ServerError(format!("服务器错误: {}", e)))?;

    Ok(())
}

// ==================== 处理器 ====================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 导出整图文档
async fn get_graph(State(state): State<AppState>) -> Response {
    let doc = state.graph.read().to_document();
    ok(doc)
}

/// 用文档替换整图
async fn put_graph(State(state): State<AppState>, Json(doc): Json<GraphDocument>) -> Response {
    let mut graph = state.graph.write();
    graph.load_document(&doc);
    ok(GraphStats::of(&graph))
}

/// 清空整图（保留模式）
async fn clear_graph(State(state): State<AppState>) -> Response {
    let mut graph = state.graph.write();
    graph.clear();
    ok(GraphStats::of(&graph))
}

/// 模式请求
#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub directed: bool,
}

async fn set_mode(State(state): State<AppState>, Json(req): Json<ModeRequest>) -> Response {
    let mut graph = state.graph.write();
    graph.set_mode(req.directed);
    ok(GraphStats::of(&graph))
}

async fn get_matrix(State(state): State<AppState>) -> Response {
    ok(state.graph.read().matrix())
}

/// 添加顶点请求；不给 id 时自动编号
#[derive(Debug, Deserialize)]
pub struct NodeRequest {
    #[serde(default)]
    pub id: Option<NodeId>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

async fn add_node(State(state): State<AppState>, Json(req): Json<NodeRequest>) -> Response {
    let mut graph = state.graph.write();
    let id = req.id.unwrap_or_else(|| graph.next_node_id());
    graph.add_node(id.clone(), req.x, req.y);
    (StatusCode::CREATED, Json(ApiResponse::success(id))).into_response()
}

async fn remove_node(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if state.graph.write().remove_node(&id) {
        ok(id)
    } else {
        error_response(Error::NodeNotFound(id))
    }
}

/// 添加边请求
#[derive(Debug, Deserialize)]
pub struct EdgeRequest {
    pub u: String,
    pub v: String,
    #[serde(default = "default_weight")]
    pub weight: Weight,
}

fn default_weight() -> Weight {
    1
}

async fn add_edge(State(state): State<AppState>, Json(req): Json<EdgeRequest>) -> Response {
    let mut graph = state.graph.write();
    let checked = graph
        .require_node(&req.u)
        .and_then(|_| graph.require_node(&req.v))
        .map(|_| ());
    match checked {
        Ok(()) => {
            graph.add_edge(&req.u, &req.v, req.weight);
            (StatusCode::CREATED, Json(ApiResponse::success(GraphStats::of(&graph)))).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn remove_edge(
    State(state): State<AppState>,
    Path((u, v)): Path<(String, String)>,
) -> Response {
    let mut graph = state.graph.write();
    match graph.remove_edge(&u, &v) {
        Ok(()) => ok(GraphStats::of(&graph)),
        Err(e) => error_response(e),
    }
}

async fn list_edges(State(state): State<AppState>) -> Response {
    ok(state.graph.read().edge_list())
}

/// 执行算法；请求体 `{start?, end?}` 可省略
async fn run_algorithm(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Option<Json<AlgorithmArgs>>,
) -> Response {
    let args = body.map(|Json(args)| args).unwrap_or_default();
    let result = name.parse::<Algorithm>().and_then(|algorithm| {
        let graph = state.graph.read();
        algorithm.run(&graph, &args)
    });

    match result {
        Ok(outcome) => ok(outcome),
        Err(e) => error_response(e),
    }
}

// ==================== 响应 ====================

/// 图统计信息
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub is_directed: bool,
}

impl GraphStats {
    fn of(graph: &GraphStore) -> Self {
        Self {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            is_directed: graph.is_directed(),
        }
    }
}

/// API 响应
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

fn status_of(error: &Error) -> StatusCode {
    match error {
        Error::NodeNotFound(_) | Error::EdgeNotFound(_, _) => StatusCode::NOT_FOUND,
        Error::UnknownAlgorithm(_)
        | Error::MissingArgument(_)
        | Error::ParseError(_)
        | Error::SerializationError(_) => StatusCode::BAD_REQUEST,
        Error::IoError(_) | Error::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: Error) -> Response {
    (
        status_of(&error),
        Json(ApiResponse::<()>::error(&error.to_string())),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn state_with_path() -> AppState {
        let mut graph = GraphStore::new(true);
        for id in ["1", "2", "3"] {
            graph.add_node(id, 0.0, 0.0);
        }
        graph.add_edge("1", "2", 5);
        graph.add_edge("2", "3", 3);
        AppState::new(graph)
    }

    fn send(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        tokio_test::block_on(async {
            let response = router(state.clone()).oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        })
    }

    #[test]
    fn test_health() {
        let (status, body) = send(&AppState::default(), Method::GET, "/health", None);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[test]
    fn test_run_dijkstra() {
        let state = state_with_path();
        let (status, body) = send(
            &state,
            Method::POST,
            "/algorithm/dijkstra",
            Some(json!({"start": "1", "end": "3"})),
        );

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let trace = body["data"]["trace"].as_array().unwrap();
        let last = trace.last().unwrap();
        assert_eq!(last["type"], "path");
        assert_eq!(last["desc"], "Shortest Path: 8");
        assert_eq!(last["nodes"], json!(["1", "2", "3"]));
    }

    #[test]
    fn test_run_without_body() {
        let state = state_with_path();
        let (status, body) = send(&state, Method::POST, "/algorithm/kruskal", None);

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["trace"][0]["type"], "info");
    }

    #[test]
    fn test_algorithm_errors() {
        let state = state_with_path();

        let (status, _) = send(&state, Method::POST, "/algorithm/astar", Some(json!({})));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&state, Method::POST, "/algorithm/bfs", Some(json!({})));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, _) = send(&state, Method::POST, "/algorithm/bfs", Some(json!({"start": "9"})));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_edit_graph() {
        let state = state_with_path();

        let (status, body) = send(&state, Method::POST, "/nodes", Some(json!({"x": 1.0, "y": 2.0})));
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"], "4");

        let (status, _) = send(&state, Method::POST, "/edges", Some(json!({"u": "3", "v": "4"})));
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(state.graph.read().adjacency()["3"]["4"], 1);

        let (status, _) = send(&state, Method::POST, "/edges", Some(json!({"u": "3", "v": "9"})));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&state, Method::DELETE, "/edges/1/2", None);
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&state, Method::DELETE, "/edges/1/2", None);
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&state, Method::DELETE, "/nodes/4", None);
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&state, Method::DELETE, "/nodes/4", None);
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_mode_and_views() {
        let state = state_with_path();

        let (status, body) = send(&state, Method::PUT, "/mode", Some(json!({"directed": false})));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_directed"], false);

        let (_, body) = send(&state, Method::GET, "/matrix", None);
        assert_eq!(body["data"]["weights"], json!([[0, 5, 0], [5, 0, 3], [0, 3, 0]]));

        let (_, body) = send(&state, Method::GET, "/edges", None);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_document_roundtrip() {
        let state = state_with_path();
        let (_, body) = send(&state, Method::GET, "/graph", None);
        let doc = body["data"].clone();
        assert_eq!(doc["is_directed"], true);

        let (status, body) = send(&state, Method::DELETE, "/graph", None);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["node_count"], 0);

        let (status, body) = send(&state, Method::PUT, "/graph", Some(doc));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["node_count"], 3);
        assert_eq!(body["data"]["edge_count"], 2);
    }
}
