use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use remnant_optimizer::config::DEFAULT_TIME_LIMIT_MS;
use remnant_optimizer::error::CutError;
use remnant_optimizer::request::CutRequest;
use remnant_optimizer::scheme::{Scheme, Waste};
use remnant_optimizer::strategy::Strategy;
use remnant_optimizer::types::StockKey;
use serde::Serialize;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
struct OptimizeResponse {
    strategy: Strategy,
    stock: Vec<StockResponse>,
    unit_count: usize,
    waste: Waste,
    text: String,
}

#[derive(Serialize)]
struct StockResponse {
    length: f64,
    count: usize,
    cuts: Vec<CutResponse>,
}

#[derive(Serialize)]
struct CutResponse {
    pieces: Vec<f64>,
    total: f64,
    leftover: f64,
}

#[derive(Serialize, Default)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    partial: Option<Vec<StockResponse>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unassigned: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pieces: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stock: Vec<StockKey>,
}

fn stock_response(scheme: &Scheme) -> Vec<StockResponse> {
    scheme
        .entries()
        .map(|(key, cuts)| StockResponse {
            length: key.length,
            count: key.count,
            cuts: cuts
                .iter()
                .map(|c| CutResponse {
                    pieces: c.pieces.clone(),
                    total: c.total(),
                    leftover: c.leftover(key.length, scheme.kerf()),
                })
                .collect(),
        })
        .collect()
}

struct ApiError(CutError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0.to_string();
        let (status, body) = match self.0 {
            CutError::InsufficientStock {
                partial,
                unassigned,
                pieces,
                stock,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error,
                    partial: Some(stock_response(&partial)),
                    unassigned,
                    pieces,
                    stock,
                },
            ),
            CutError::InvalidRequest { .. } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error,
                    ..Default::default()
                },
            ),
            CutError::DeadlineExceeded { .. } | CutError::Cancelled => (
                StatusCode::REQUEST_TIMEOUT,
                ErrorResponse {
                    error,
                    ..Default::default()
                },
            ),
            CutError::WrongScheme {
                ref scheme,
                ref pieces,
                ref stock,
                ..
            } => {
                tracing::error!(error = %error, %scheme, ?pieces, ?stock, "inconsistent cutting scheme");
                let body = ErrorResponse {
                    error,
                    partial: Some(stock_response(scheme)),
                    pieces: pieces.clone(),
                    stock: stock.clone(),
                    ..Default::default()
                };
                sentry::with_scope(
                    |scope| {
                        scope.set_extra("scheme", scheme.to_string().into());
                        scope.set_extra("pieces", serde_json::json!(pieces));
                        scope.set_extra("stock", serde_json::json!(stock));
                    },
                    || sentry::capture_error(&self.0),
                );
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            err @ CutError::UnknownPiece { .. } => {
                tracing::error!(error = %err, "inconsistent cutting scheme");
                sentry::capture_error(&err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error,
                        ..Default::default()
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

async fn optimize(Json(mut req): Json<CutRequest>) -> Result<Json<OptimizeResponse>, Response> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );

    req.cap_time_limit(time_limit_ms());
    let strategy = req.strategy;

    let scheme = tokio::task::spawn_blocking(move || req.solve())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response())?
        .map_err(|e| ApiError(e).into_response())?;

    Ok(Json(OptimizeResponse {
        strategy,
        stock: stock_response(&scheme),
        unit_count: scheme.unit_count(),
        waste: scheme.waste(),
        text: scheme.to_string(),
    }))
}

fn time_limit_ms() -> u64 {
    std::env::var("TIME_LIMIT_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TIME_LIMIT_MS)
}

fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(serve());
}

async fn serve() {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
