//! HTTP front-ends for the detection pipeline.
//!
//! One detection-service interface, two thin adapters sharing the same
//! handlers and the same initialize-once model barrier:
//!
//! - [`api_router`]: general REST API (CORS enabled)
//!   - `GET /`           service info + endpoint listing
//!   - `GET /health`     accelerator availability and active device
//!   - `POST /detect`    multipart upload, field `audio`
//!   - `POST /detect/url` fetch remote audio and detect
//! - [`local_router`]: single-user variant serving an embedded upload
//!   page at `/` and accepting `POST /upload` as an alias.
//!
//! Each upload lands in the configured upload directory under a
//! uuid-prefixed name and is removed on every exit path.

mod error;
mod page;
mod routes;
mod state;
mod upload;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;

use tracing::info;

pub use error::{ApiError, SetupError};
pub use routes::{api_router, local_router};
pub use state::AppState;
pub use upload::{allowed_extension, sanitize_filename, TempUpload, ALLOWED_EXTENSIONS};

/// Upload size ceiling enforced by the transport layer.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Binds and serves a router. Accepts `:8080`-style addresses.
pub async fn serve(addr: &str, app: axum::Router) -> Result<(), SetupError> {
    let addr = parse_addr(addr)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Parse address string to SocketAddr.
fn parse_addr(addr: &str) -> Result<SocketAddr, SetupError> {
    let addr = if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    };
    addr.parse()
        .map_err(|_| SetupError::Addr(addr))
}
