//! HTTP server for the live preview panel.
//!
//! - `GET /` serves the current page
//! - `GET /ws` streams [`PanelMessage`]s to the page's script
//! - `POST /scroll` accepts a [`ScrollRequest`] from an editor integration
//! - `GET /health` reports status

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use yamlview_render::Page;

use crate::protocol::{PanelMessage, ScrollRequest};
use crate::session::{Panel, SessionEvent};

/// Messages buffered per websocket client before it counts as lagging.
const MESSAGE_BUFFER: usize = 64;

/// State shared between the session's panel and the HTTP handlers.
pub struct PreviewHub {
    /// Name shown by the health endpoint
    file_name: String,

    /// Page served to newly connecting clients
    latest: RwLock<Page>,

    /// Fan-out to connected websocket clients
    messages: broadcast::Sender<PanelMessage>,

    /// Events headed for the session (scroll requests from editors)
    events: mpsc::UnboundedSender<SessionEvent>,
}

pub type SharedHub = Arc<PreviewHub>;

impl PreviewHub {
    pub fn new(file_name: impl Into<String>, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        let (messages, _) = broadcast::channel(MESSAGE_BUFFER);
        Self {
            file_name: file_name.into(),
            latest: RwLock::new(Page::default()),
            messages,
            events,
        }
    }

    /// The page most recently shown by the session.
    pub fn latest(&self) -> Page {
        match self.latest.read() {
            Ok(page) => page.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_latest(&self, page: Page) {
        match self.latest.write() {
            Ok(mut latest) => *latest = page,
            Err(poisoned) => *poisoned.into_inner() = page,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelMessage> {
        self.messages.subscribe()
    }

    fn broadcast(&self, message: PanelMessage) {
        // No receivers just means no browser is connected right now.
        let receivers = self.messages.send(message).unwrap_or(0);
        debug!(receivers, "Broadcast panel message");
    }
}

/// The panel of a server-backed session: pages are stored for fresh loads
/// and pushed to every connected client.
pub struct BroadcastPanel {
    hub: SharedHub,
}

impl BroadcastPanel {
    pub fn new(hub: SharedHub) -> Self {
        Self { hub }
    }
}

impl Panel for BroadcastPanel {
    fn show(&mut self, page: Page) {
        let body = page.body.clone();
        self.hub.set_latest(page);
        self.hub.broadcast(PanelMessage::Content { body });
    }

    fn post_message(&mut self, message: PanelMessage) {
        self.hub.broadcast(message);
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    file: String,
    clients: usize,
}

async fn index(State(hub): State<SharedHub>) -> impl IntoResponse {
    Html(hub.latest().html)
}

async fn health(State(hub): State<SharedHub>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        file: hub.file_name.clone(),
        clients: hub.messages.receiver_count(),
    })
}

async fn scroll(State(hub): State<SharedHub>, Json(request): Json<ScrollRequest>) -> StatusCode {
    let event = SessionEvent::VisibleRangeChanged {
        top_line: request.top_line,
        line_count: request.line_count,
    };
    match hub.events.send(event) {
        Ok(()) => StatusCode::ACCEPTED,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<SharedHub>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_websocket(socket, hub))
}

/// Forward panel messages to one client until either side goes away.
async fn handle_websocket(mut socket: WebSocket, hub: SharedHub) {
    let mut messages = hub.subscribe();
    info!("Preview client connected");

    loop {
        tokio::select! {
            message = messages.recv() => {
                let message = match message {
                    Ok(message) => message,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Only the newest content matters; resend it.
                        warn!(skipped, "Preview client lagged");
                        PanelMessage::Content { body: hub.latest().body }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                let Ok(text) = serde_json::to_string(&message) else {
                    continue;
                };
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    info!("Preview client disconnected");
}

/// Build the axum router
pub fn build_router(hub: SharedHub) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/scroll", post(scroll))
        .route("/ws", get(ws_handler))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(hub)
}
