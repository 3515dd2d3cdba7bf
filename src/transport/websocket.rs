//! WebSocket channel server
//!
//! One warp server carries the chat channel at `/` alongside the health
//! routes. Each connection is served by a single task that takes one payload
//! at a time from a reader task; if the reader sees the client go away while
//! a turn is in flight, the turn future is dropped and its result discarded.

use crate::agent::driver::TurnDriver;
use crate::connection_span;
use crate::error::{ConciergeError, ConciergeResult};
use crate::frame_span;
use crate::observability::health::health_routes;
use crate::observability::metrics::metrics;
use crate::transport::session::ChatSession;
use futures::{SinkExt, StreamExt};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn, Instrument};
use warp::ws::{Message, WebSocket, Ws};
use warp::Filter;

/// Inbound payloads buffered per connection while a turn is running
const INBOUND_QUEUE: usize = 32;

/// Chat channel route: WebSocket upgrade at the root path
pub fn chat_route(
    driver: Arc<TurnDriver>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path::end()
        .and(warp::ws())
        .and(warp::any().map(move || driver.clone()))
        .map(|ws: Ws, driver: Arc<TurnDriver>| {
            ws.on_upgrade(move |socket| handle_connection(socket, driver))
        })
}

/// Every route the server exposes
pub fn routes(
    driver: Arc<TurnDriver>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    chat_route(driver)
        .or(health_routes())
        .with(warp::trace::request())
}

/// Serve the chat channel until `shutdown` resolves
pub struct ChannelServer {
    driver: Arc<TurnDriver>,
}

impl ChannelServer {
    pub fn new(driver: Arc<TurnDriver>) -> Self {
        Self { driver }
    }

    pub async fn serve<F>(self, addr: SocketAddr, shutdown: F) -> ConciergeResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (bound, server) = warp::serve(routes(self.driver))
            .try_bind_with_graceful_shutdown(addr, shutdown)
            .map_err(|e| ConciergeError::transport(format!("Failed to bind {addr}: {e}")))?;

        info!(addr = %bound, "Chat channel listening");
        server.await;
        info!("Chat channel stopped");
        Ok(())
    }
}

async fn handle_connection(socket: WebSocket, driver: Arc<TurnDriver>) {
    let session = ChatSession::new(driver);
    let span = connection_span!(connection_id = %session.id());
    serve_connection(socket, session).instrument(span).await;
}

async fn serve_connection(socket: WebSocket, mut session: ChatSession) {
    metrics().connection_opened();
    info!("Connection opened");

    let (mut sink, mut stream) = socket.split();
    let (inbound_tx, mut inbound_rx) = mpsc::channel::<Vec<u8>>(INBOUND_QUEUE);
    let (closed_tx, mut closed_rx) = watch::channel(false);

    let reader = tokio::spawn(
        async move {
            while let Some(result) = stream.next().await {
                match result {
                    Ok(message) if message.is_close() => break,
                    Ok(message) if message.is_text() || message.is_binary() => {
                        if inbound_tx.send(message.into_bytes()).await.is_err() {
                            break;
                        }
                    }
                    // ping/pong
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "WebSocket receive error");
                        break;
                    }
                }
            }
            let _ = closed_tx.send(true);
        }
        .in_current_span(),
    );

    while let Some(payload) = inbound_rx.recv().await {
        let frame = tokio::select! {
            frame = session
                .handle_payload(&payload)
                .instrument(frame_span!(bytes = payload.len())) => frame,
            _ = closed_rx.wait_for(|closed| *closed) => {
                metrics().turn_cancelled();
                info!("Client disconnected mid-turn, discarding turn");
                break;
            }
        };

        if let Err(e) = sink.send(Message::text(frame.to_json())).await {
            debug!(error = %e, "Failed to send reply, closing connection");
            break;
        }
    }

    reader.abort();
    let _ = sink.close().await;

    metrics().connection_closed();
    info!(
        turns = session.state().history.len() / 2,
        "Connection closed"
    );
}
