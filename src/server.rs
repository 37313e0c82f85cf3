//! HTTP front end: a form on `GET /`, a PNG on `POST /`.
//!
//! Endpoints:
//!   GET  /   → parameter form (HTML)
//!   POST /   → form-encoded tree parameters → `image/png`
//!
//! Every request renders on the blocking pool with its own canvas and RNG.

use std::io;
use std::net::SocketAddr;

use axum::{
    extract::{rejection::FormRejection, Form},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{BranchGuard, TreeParams};
use crate::error::{ConfigError, RenderError};
use crate::html::FORM_HTML;
use crate::tree;

/// Response header carrying the seed a tree was grown from
pub const SEED_HEADER: &str = "x-tree-seed";

// ── Entry point ───────────────────────────────────────────────────────────────

/// Run the server until Ctrl-C
pub fn run(addr: SocketAddr) -> io::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(serve(addr))
}

pub async fn serve(addr: SocketAddr) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "treegen listening");

    axum::serve(listener, router())
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for ctrl-c");
            }
            info!("shutting down");
        })
        .await
}

pub fn router() -> Router {
    Router::new().route("/", get(form).post(grow))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
enum ServeError {
    #[error(transparent)]
    BadForm(#[from] FormRejection),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        // Every failure of the rendering pass is reported as a server error;
        // the message says which field or stage was at fault.
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        match &self {
            ServeError::BadForm(_) | ServeError::Config(_) => {
                warn!(error = %self, "request rejected")
            }
            ServeError::Render(_) | ServeError::Task(_) => error!(error = %self, "request failed"),
        }
        (status, self.to_string()).into_response()
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn form() -> Html<&'static str> {
    Html(FORM_HTML)
}

async fn grow(form: Result<Form<TreeParams>, FormRejection>) -> Result<Response, ServeError> {
    let Form(params) = form?;
    let config = params.validate(BranchGuard::Enforce)?;
    let seed = params.seed.unwrap_or_else(tree::clock_seed);
    info!(seed, width = config.size_x, height = config.size_y, "growing tree");

    let png = tokio::task::spawn_blocking(move || {
        let mut rng = StdRng::seed_from_u64(seed);
        tree::render(&config, &mut rng).encode_png()
    })
    .await??;
    debug!(bytes = png.len(), "png encoded");

    let mut response = ([(header::CONTENT_TYPE, "image/png")], png).into_response();
    response
        .headers_mut()
        .insert(SEED_HEADER, HeaderValue::from(seed));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn post(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_serves_form() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("<form"));
        assert!(html.contains("name=\"branch_chance_mu\""));
    }

    #[tokio::test]
    async fn test_post_returns_png() {
        let response = router()
            .oneshot(post("size_x=64&size_y=48&starting_length=20&starting_width=6&seed=7"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(response.headers()[SEED_HEADER], "7");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[tokio::test]
    async fn test_same_seed_same_image() {
        let form = "size_x=80&size_y=60&starting_length=25&starting_width=8&seed=99";
        let first = router().oneshot(post(form)).await.unwrap();
        let second = router().oneshot(post(form)).await.unwrap();
        let a = to_bytes(first.into_body(), usize::MAX).await.unwrap();
        let b = to_bytes(second.into_body(), usize::MAX).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_blank_seed_is_accepted() {
        let response = router()
            .oneshot(post("size_x=32&size_y=32&starting_length=10&seed="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(SEED_HEADER));
    }

    #[tokio::test]
    async fn test_runaway_branching_is_500() {
        let response = router()
            .oneshot(post("branch_chance_mu=6"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_non_numeric_field_is_500() {
        let response = router().oneshot(post("size_x=wide")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_invalid_config_is_500() {
        let response = router()
            .oneshot(post("min_angle=300&max_angle=200"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = router()
            .oneshot(post("foreground_color=nope"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
