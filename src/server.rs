//! HTTP surface over a shared [`Session`]. One session per process, access
//! serialized by a mutex: one user action runs to completion before the next.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::chart::ChartKind;
use crate::datatype::Value;
use crate::error::TabsiftError;
use crate::execute::{Answer, ResultTable};
use crate::session::{Session, Turn};
use crate::store::LoadOptions;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub preview_rows: usize,
}

#[derive(Deserialize)]
pub struct LoadRequest {
    pub name: String,
    pub csv: String,
    #[serde(default)]
    pub delimiter: Option<String>,
}

#[derive(Deserialize)]
pub struct AskRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct ChartRequest {
    pub x: String,
    #[serde(default)]
    pub y: Option<String>,
    pub kind: ChartKind,
}

#[derive(Deserialize)]
pub struct PreviewParams {
    pub rows: Option<usize>,
}

#[derive(Serialize)]
pub struct TablePayload {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub row_count: usize,
    pub limited: bool,
}

impl From<ResultTable> for TablePayload {
    fn from(t: ResultTable) -> Self {
        Self {
            columns: t.columns,
            rows: t
                .rows
                .into_iter()
                .map(|r| r.into_iter().map(json_value).collect())
                .collect(),
            row_count: t.row_count,
            limited: t.limited,
        }
    }
}

#[derive(Serialize)]
pub struct AskResponse {
    pub status: String,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scalar: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TablePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct LoadResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct TableResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TablePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub turns: Vec<Turn>,
}

fn json_value(v: Value) -> serde_json::Value {
    match v {
        Value::Int(i) => serde_json::Value::from(i),
        // non-finite floats have no JSON form
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Bool(b) => serde_json::Value::from(b),
        Value::Text(s) => serde_json::Value::from(s),
        Value::Null => serde_json::Value::Null,
    }
}

fn error_status(e: &TabsiftError) -> StatusCode {
    match e {
        TabsiftError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/v1/load", post(load))
        .route("/v1/ask", post(ask))
        .route("/v1/preview", get(preview))
        .route("/v1/profile/:kind", get(profile))
        .route("/v1/chart", post(chart))
        .route("/v1/history", get(history))
        .with_state(state)
        .layer(cors)
}

async fn load(
    State(state): State<AppState>,
    Json(req): Json<LoadRequest>,
) -> (StatusCode, Json<LoadResponse>) {
    let options = match parse_options(req.delimiter.as_deref()) {
        Ok(options) => options,
        Err(e) => return load_error(&e),
    };
    let mut session = state.session.lock().unwrap();
    match session.load(req.csv.as_bytes(), &req.name, &options) {
        Ok(message) => (
            StatusCode::OK,
            Json(LoadResponse {
                status: "ok".into(),
                message: Some(message),
                error: None,
            }),
        ),
        Err(e) => {
            warn!(error = %e, "load failed");
            load_error(&e)
        }
    }
}

fn load_error(e: &TabsiftError) -> (StatusCode, Json<LoadResponse>) {
    (
        error_status(e),
        Json(LoadResponse {
            status: "error".into(),
            message: None,
            error: Some(e.to_string()),
        }),
    )
}

fn parse_options(delimiter: Option<&str>) -> crate::error::Result<LoadOptions> {
    match delimiter {
        None | Some("") => Ok(LoadOptions::default()),
        Some(d) if d.len() == 1 => Ok(LoadOptions {
            delimiter: Some(d.as_bytes()[0]),
        }),
        Some(d) => Err(TabsiftError::Parse {
            message: format!("delimiter must be a single character, got '{}'", d),
        }),
    }
}

async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> (StatusCode, Json<AskResponse>) {
    let started = std::time::Instant::now();
    let result = state.session.lock().unwrap().ask(&req.text);
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    match result {
        Ok(answer) => {
            info!(ms = elapsed_ms, kind = answer.kind(), "ask complete");
            let mut body = AskResponse {
                status: "ok".into(),
                elapsed_ms,
                kind: Some(answer.kind().to_string()),
                scalar: None,
                values: None,
                table: None,
                message: None,
                error: None,
            };
            match answer {
                Answer::Scalar(v) => body.scalar = Some(json_value(v)),
                Answer::Values(vs) => {
                    body.values = Some(vs.into_iter().map(json_value).collect())
                }
                Answer::Table(t) => body.table = Some(t.into()),
                Answer::Message(m) => body.message = Some(m),
            }
            (StatusCode::OK, Json(body))
        }
        Err(e) => {
            warn!(error = %e, "ask failed");
            (
                error_status(&e),
                Json(AskResponse {
                    status: "error".into(),
                    elapsed_ms,
                    kind: None,
                    scalar: None,
                    values: None,
                    table: None,
                    message: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

async fn preview(
    State(state): State<AppState>,
    Query(params): Query<PreviewParams>,
) -> (StatusCode, Json<TableResponse>) {
    let rows = params.rows.unwrap_or(state.preview_rows);
    table_response(state.session.lock().unwrap().preview(rows))
}

async fn profile(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> (StatusCode, Json<TableResponse>) {
    let session = state.session.lock().unwrap();
    let result = match kind.as_str() {
        "schema" => session.schema(),
        "stats" => session.stats(),
        "missingness" => session.missingness(),
        "correlations" => session.correlations(),
        other => Err(TabsiftError::Parse {
            message: format!("unknown profile kind '{}'", other),
        }),
    };
    table_response(result)
}

async fn chart(
    State(state): State<AppState>,
    Json(req): Json<ChartRequest>,
) -> (StatusCode, Json<TableResponse>) {
    let session = state.session.lock().unwrap();
    let result = session
        .chart_data(&req.x, req.y.as_deref(), req.kind)
        .map(|c| c.table);
    table_response(result)
}

async fn history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        turns: state.session.lock().unwrap().history(),
    })
}

fn table_response(result: crate::error::Result<ResultTable>) -> (StatusCode, Json<TableResponse>) {
    match result {
        Ok(table) => (
            StatusCode::OK,
            Json(TableResponse {
                status: "ok".into(),
                table: Some(table.into()),
                error: None,
            }),
        ),
        Err(e) => {
            warn!(error = %e, "request failed");
            (
                error_status(&e),
                Json(TableResponse {
                    status: "error".into(),
                    table: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
