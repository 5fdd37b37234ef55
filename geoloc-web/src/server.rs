//! Servidor web Axum com WebSocket para acompanhar a extração em tempo real

use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Instant;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use geoloc_core::{
    corpus::demo_texts, ExtractError, ExtractionEvent, LocationExtractor, LocationModels,
    LocationOccurrence,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Estado compartilhado da aplicação.
///
/// O extrator guarda estado adaptativo (`&mut self`), então o acesso é serializado
/// por um `Mutex` e a extração roda fora do runtime assíncrono.
pub struct AppState {
    extractor: Mutex<LocationExtractor>,
    max_document_bytes: usize,
}

impl AppState {
    pub fn new(models: &LocationModels, max_document_bytes: usize) -> Self {
        Self {
            extractor: Mutex::new(models.extractor()),
            max_document_bytes,
        }
    }
}

#[derive(Deserialize)]
struct ExtractRequest {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct ExtractResponse {
    occurrences: Vec<LocatedOccurrence>,
    processing_ms: u64,
}

/// Ocorrência como sai para os clientes: offset em bytes e também em caracteres.
#[derive(Debug, Serialize)]
pub struct LocatedOccurrence {
    text: String,
    position: usize,
    char_position: Option<usize>,
}

pub fn locate(document: &str, occurrences: &[LocationOccurrence]) -> Vec<LocatedOccurrence> {
    occurrences
        .iter()
        .map(|o| LocatedOccurrence {
            text: o.text().to_string(),
            position: o.position(),
            char_position: o.char_position(document),
        })
        .collect()
}

/// Erros devolvidos pela API HTTP.
#[derive(Debug)]
enum ApiError {
    Extract(ExtractError),
    TooLarge { size: usize, limit: usize },
    Internal(String),
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        ApiError::Extract(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Extract(err @ ExtractError::InvalidInput(_)) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Extract(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::TooLarge { size, limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("documento com {size} bytes excede o limite de {limit}"),
            ),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        if status.is_server_error() {
            warn!(%message, "falha na extração");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/extract", post(extract_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(bind: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Servidor de extração iniciado em http://{bind}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Extração via HTTP POST (sem streaming)
async fn extract_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    if let Some(text) = &req.text {
        check_size(text, state.max_document_bytes)?;
    }

    let (occurrences, processing_ms) = tokio::task::spawn_blocking(move || {
        let start = Instant::now();
        let mut extractor = state
            .extractor
            .lock()
            .map_err(|_| ApiError::Internal("extrator indisponível após falha anterior".into()))?;
        let document = req.text.as_deref();
        let occurrences = extractor.extract_opt(document)?;
        let located = locate(document.unwrap_or_default(), &occurrences);
        Ok::<_, ApiError>((located, start.elapsed().as_millis() as u64))
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    info!(occurrences = occurrences.len(), processing_ms, "documento extraído");
    Ok(Json(ExtractResponse {
        occurrences,
        processing_ms,
    }))
}

fn check_size(text: &str, limit: usize) -> Result<(), ApiError> {
    if text.len() > limit {
        return Err(ApiError::TooLarge {
            size: text.len(),
            limit,
        });
    }
    Ok(())
}

/// Retorna textos de demonstração
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_texts()
        .iter()
        .map(|(domain, text)| {
            serde_json::json!({
                "domain": domain,
                "text": text
            })
        })
        .collect();
    Json(texts)
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Recebe um documento (JSON `{"text": ...}` ou texto puro) e devolve os eventos da extração
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(raw) => {
                let text = match serde_json::from_str::<ExtractRequest>(&raw) {
                    Ok(ExtractRequest { text: Some(text) }) => text,
                    _ => raw.to_string(),
                };
                if text.trim().is_empty() {
                    continue;
                }

                let events = match check_size(&text, state.max_document_bytes) {
                    Ok(()) => run_streaming(Arc::clone(&state), text).await,
                    Err(ApiError::TooLarge { size, limit }) => vec![ExtractionEvent::Error {
                        message: format!("documento com {size} bytes excede o limite de {limit}"),
                    }],
                    Err(_) => Vec::new(),
                };

                for event in &events {
                    let Ok(json) = serde_json::to_string(event) else {
                        continue;
                    };
                    if socket.send(Message::Text(json.into())).await.is_err() {
                        return; // cliente desconectou
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

/// Roda a extração observável numa thread bloqueante e coleta os eventos.
async fn run_streaming(state: Arc<AppState>, text: String) -> Vec<ExtractionEvent> {
    info!(bytes = text.len(), "extraindo via WebSocket");
    let (tx, rx) = mpsc::channel::<ExtractionEvent>();

    let handle = tokio::task::spawn_blocking(move || match state.extractor.lock() {
        Ok(mut extractor) => {
            // Falhas já chegam ao cliente como `ExtractionEvent::Error`
            let _ = extractor.extract_streaming(&text, tx);
        }
        Err(_) => {
            let _ = tx.send(ExtractionEvent::Error {
                message: "extrator indisponível após falha anterior".into(),
            });
        }
    });

    if let Err(err) = handle.await {
        return vec![ExtractionEvent::Error {
            message: err.to_string(),
        }];
    }
    rx.try_iter().collect()
}
