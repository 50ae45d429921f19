//! Stdio host — read loop, concurrent tool calls, single writer.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::sync::{mpsc, Mutex, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::host::codec::{self, read_message, write_message, RpcRequest};
use crate::host::handlers::{self, METHOD_CALL_TOOL, NOTIFICATION_CANCELLED};
use crate::tools::ToolRegistry;
use crate::types::{Error, HostConfig};

/// Cancellation handles of running `tools/call` requests, keyed by the
/// serialized request id.
type InFlight = Arc<Mutex<HashMap<String, CancellationToken>>>;

/// JSON-RPC host serving one registry over a line-delimited stream.
#[derive(Debug)]
pub struct StdioHost {
    registry: Arc<ToolRegistry>,
    config: HostConfig,
    cancel: CancellationToken,
}

impl StdioHost {
    pub fn new(registry: Arc<ToolRegistry>, config: HostConfig) -> Self {
        Self {
            registry,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Serve stdin/stdout until EOF or shutdown.
    pub async fn serve(&self) -> std::io::Result<()> {
        self.serve_io(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve an arbitrary reader/writer pair.
    ///
    /// Returns once input ends (or shutdown is requested) and every
    /// in-flight call has written its response.
    pub async fn serve_io<R, W>(&self, mut reader: R, writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Value>(self.config.response_channel_capacity);
        let writer_task = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(message) = rx.recv().await {
                write_message(&mut writer, &message).await?;
            }
            Ok::<(), std::io::Error>(())
        });

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_calls));
        let in_flight: InFlight = Arc::default();
        tracing::info!(
            "host serving {} tools (max_concurrent_calls={})",
            self.registry.len(),
            self.config.max_concurrent_calls,
        );

        loop {
            let line = tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("host shutting down");
                    for token in in_flight.lock().await.values() {
                        token.cancel();
                    }
                    break;
                }
                line = read_message(&mut reader, self.config.max_line_bytes) => line,
            };
            let Some(line) = line? else {
                tracing::debug!("input closed");
                break;
            };
            self.handle_line(&line, &tx, &semaphore, &in_flight).await;
        }

        // Spawned calls hold sender clones; the writer drains until the last one finishes.
        drop(tx);
        writer_task.await.map_err(std::io::Error::other)?
    }

    /// Request graceful shutdown. Running calls are cancelled.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    async fn handle_line(
        &self,
        line: &[u8],
        tx: &mpsc::Sender<Value>,
        semaphore: &Arc<Semaphore>,
        in_flight: &InFlight,
    ) {
        let message: Value = match serde_json::from_slice(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("unparseable message: {}", e);
                send(tx, codec::error_response(Value::Null, &Error::from(e))).await;
                return;
            }
        };
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: RpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                let err = Error::invalid_request(format!("malformed request: {}", e));
                send(tx, codec::error_response(id, &err)).await;
                return;
            }
        };

        let Some(id) = request.id else {
            self.handle_notification(&request.method, &request.params, in_flight)
                .await;
            return;
        };

        if request.method == METHOD_CALL_TOOL {
            self.spawn_call(id, request.params, tx, semaphore, in_flight)
                .await;
            return;
        }

        let response = match handlers::handle(
            &self.registry,
            &self.config,
            &request.method,
            &request.params,
        ) {
            Ok(result) => codec::response(id, result),
            Err(err) => codec::error_response(id, &err),
        };
        send(tx, response).await;
    }

    async fn spawn_call(
        &self,
        id: Value,
        params: Value,
        tx: &mpsc::Sender<Value>,
        semaphore: &Arc<Semaphore>,
        in_flight: &InFlight,
    ) {
        let key = id.to_string();
        let token = self.cancel.child_token();
        let registered = match in_flight.lock().await.entry(key.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(token.clone());
                true
            }
        };
        if !registered {
            tracing::debug!(request_id = %key, "duplicate in-flight request id");
            let err =
                Error::invalid_request(format!("request id {} is already in flight", key));
            send(tx, codec::error_response(id, &err)).await;
            return;
        }

        let registry = self.registry.clone();
        let semaphore = semaphore.clone();
        let in_flight = in_flight.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let response = match semaphore.acquire_owned().await {
                Ok(_permit) => match handlers::call_tool(&registry, &params, &token).await {
                    Ok(result) => codec::response(id, result),
                    Err(err) => codec::error_response(id, &err),
                },
                Err(_) => codec::error_response(id, &Error::internal("host is shutting down")),
            };
            in_flight.lock().await.remove(&key);
            send(&tx, response).await;
        });
    }

    async fn handle_notification(&self, method: &str, params: &Value, in_flight: &InFlight) {
        match method {
            NOTIFICATION_CANCELLED => {
                let Some(request_id) = params.get("requestId") else {
                    tracing::debug!("cancel notification without requestId");
                    return;
                };
                match in_flight.lock().await.get(&request_id.to_string()) {
                    Some(token) => {
                        tracing::info!(request_id = %request_id, "cancelling tool call");
                        token.cancel();
                    }
                    None => tracing::debug!(request_id = %request_id, "cancel for unknown request"),
                }
            }
            _ => tracing::debug!(method, "ignoring notification"),
        }
    }
}

async fn send(tx: &mpsc::Sender<Value>, message: Value) {
    if tx.send(message).await.is_err() {
        tracing::warn!("response dropped: writer closed");
    }
}
