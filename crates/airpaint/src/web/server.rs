//! Actix Web server exposing the painted feed.
//!
//! The server runs its own actix system on a dedicated thread so the producer
//! never touches async code. Handlers only read the latest published frame.

use std::net::SocketAddr;

use actix_web::{
    App, HttpResponse, HttpServer,
    http::header,
    web::{self, Bytes},
};
use anyhow::{Context, Result};
use async_stream::stream;
use tokio::sync::{oneshot, watch};
use tracing::{error, info};

use crate::{
    telemetry,
    web::{
        data::{FrameSink, StatusResponse},
        html::INDEX_HTML,
    },
};

pub const MJPEG_CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

/// Seconds a stopping server waits for open connections.
const SHUTDOWN_TIMEOUT_SECS: u64 = 1;

/// Shared state backing HTTP handlers.
pub struct ServerState {
    pub sink: FrameSink,
    closing: watch::Sender<bool>,
}

impl ServerState {
    pub fn new(sink: FrameSink) -> Self {
        let (closing, _) = watch::channel(false);
        Self { sink, closing }
    }

    /// End every open `/video_feed` stream, including ones opened later.
    pub fn close_streams(&self) {
        self.closing.send_replace(true);
    }
}

/// Handle for the server thread.
pub struct PreviewServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl PreviewServer {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal the server to stop and block until the thread exits.
    pub fn stop(self) {
        if let Some(tx) = self.shutdown {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle {
            let _ = handle.join();
        }
    }
}

/// Register every route; state is expected as `web::Data<ServerState>`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index_route))
        .route("/video_feed", web::get().to(video_feed))
        .route("/frame.jpg", web::get().to(frame_handler))
        .route("/status", web::get().to(status_handler))
        .route("/metrics", web::get().to(metrics_handler));
}

/// Bind `bind:port` and serve on a background thread. Returns once the
/// listener is bound, or with the bind error. Port 0 picks a free port.
pub fn spawn_preview_server(sink: FrameSink, bind: &str, port: u16) -> Result<PreviewServer> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let (ready_tx, ready_rx) = crossbeam_channel::bounded::<std::io::Result<SocketAddr>>(1);
    let address = (bind.to_string(), port);
    let handle = telemetry::spawn_thread("airpaint-http", move || {
        if let Err(err) = actix_web::rt::System::new().block_on(async move {
            let state = web::Data::new(ServerState::new(sink));
            let app_state = state.clone();
            let server = match HttpServer::new(move || {
                App::new().app_data(app_state.clone()).configure(routes)
            })
            .workers(2)
            .shutdown_timeout(SHUTDOWN_TIMEOUT_SECS)
            .bind(address)
            {
                Ok(server) => {
                    let bound = server.addrs().first().copied().ok_or_else(|| {
                        std::io::Error::new(std::io::ErrorKind::AddrNotAvailable, "no listener")
                    });
                    let failed = bound.is_err();
                    let _ = ready_tx.send(bound);
                    if failed {
                        return Ok(());
                    }
                    server.run()
                }
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    return Ok(());
                }
            };

            let srv_handle = server.handle();
            actix_web::rt::spawn(async move {
                let _ = shutdown_rx.await;
                state.close_streams();
                srv_handle.stop(true).await;
            });

            server.await
        }) {
            error!("HTTP server error: {err}");
        }
    })
    .context("failed to spawn HTTP server thread")?;

    let addr = match ready_rx.recv() {
        Ok(Ok(addr)) => {
            info!("serving on http://{addr}/ (stream at /video_feed)");
            addr
        }
        Ok(Err(err)) => {
            let _ = handle.join();
            return Err(err).with_context(|| format!("failed to bind {bind}:{port}"));
        }
        Err(_) => {
            let _ = handle.join();
            anyhow::bail!("HTTP server thread exited before binding {bind}:{port}");
        }
    };

    Ok(PreviewServer {
        addr,
        shutdown: Some(shutdown_tx),
        handle: Some(handle),
    })
}

/// One multipart part carrying a JPEG frame.
pub fn multipart_part(jpeg: &[u8]) -> Bytes {
    let mut payload = Vec::with_capacity(jpeg.len() + 48);
    payload.extend_from_slice(b"--frame\r\n");
    payload.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    payload.extend_from_slice(jpeg);
    payload.extend_from_slice(b"\r\n");
    Bytes::from(payload)
}

async fn index_route() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

/// MJPEG stream: one part per published frame, starting with the current one
/// when a frame already exists. Ends when the server starts closing.
async fn video_feed(state: web::Data<ServerState>) -> HttpResponse {
    let mut rx = state.sink.subscribe();
    let mut closing = state.closing.subscribe();
    let stream = stream! {
        loop {
            if *closing.borrow_and_update() {
                break;
            }
            let latest = rx.borrow_and_update().clone();
            if let Some(packet) = latest {
                yield Ok::<Bytes, actix_web::Error>(multipart_part(&packet.jpeg));
            }
            let more = tokio::select! {
                changed = rx.changed() => changed.is_ok(),
                _ = closing.changed() => false,
            };
            if !more {
                break;
            }
        }
    };

    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .insert_header((header::CONTENT_TYPE, MJPEG_CONTENT_TYPE))
        .streaming(stream)
}

async fn frame_handler(state: web::Data<ServerState>) -> HttpResponse {
    match state.sink.latest() {
        Some(packet) => HttpResponse::Ok()
            .content_type("image/jpeg")
            .body(packet.jpeg),
        None => HttpResponse::NoContent().finish(),
    }
}

async fn status_handler(state: web::Data<ServerState>) -> HttpResponse {
    match state.sink.latest() {
        Some(packet) => HttpResponse::Ok().json(StatusResponse::from(&packet)),
        None => HttpResponse::NoContent().finish(),
    }
}

async fn metrics_handler() -> HttpResponse {
    match telemetry::prometheus_handle() {
        Some(handle) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(handle.render()),
        None => HttpResponse::ServiceUnavailable().body("metrics recorder not installed"),
    }
}
