//! Localhost axum server for client tests.

use axum::Router;
use axum::http::{HeaderMap, header};
use axum::response::Html;
use axum::routing::get;
use tokio::net::TcpListener;

/// `path` answers 200 with an HTML body.
pub(crate) fn page(path: &str, body: &'static str) -> Router {
    Router::new().route(path, get(move || async move { Html(body) }))
}

/// `path` answers 200 with a PNG body.
pub(crate) fn image(path: &str, body: &'static [u8]) -> Router {
    Router::new().route(
        path,
        get(move || async move { ([(header::CONTENT_TYPE, "image/png")], body) }),
    )
}

/// `path` answers with the request's User-Agent header as the body.
pub(crate) fn user_agent_echo(path: &str) -> Router {
    Router::new().route(path, get(echo_user_agent))
}

async fn echo_user_agent(headers: HeaderMap) -> String {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Serve `app` on an ephemeral port until the test's runtime shuts down.
/// Unrouted paths get axum's 404. Returns the base URL, without a trailing
/// slash.
pub(crate) async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
