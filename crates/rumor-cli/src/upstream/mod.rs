//! HTTP clients for the services around the pipeline: the content feed,
//! the link shortener with its click analytics, and notification delivery.

pub mod bitly;
pub mod hacker_news;
pub mod notify;

use std::fmt;
use std::time::Duration;

pub use bitly::Bitly;
pub use hacker_news::{FeedItem, HackerNews};
pub use notify::{StdoutNotifier, WebhookNotifier};

const USER_AGENT: &str = concat!("rumor/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A collaborator answered with something other than success, or could not
/// be reached at all. Aborts the current stage.
#[derive(Debug)]
pub enum UpstreamError {
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },
    Transport(reqwest::Error),
    MissingGroup,
    Decode(String),
    Io(std::io::Error),
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Status {
                method,
                url,
                status,
            } => write!(f, "{method} {url} returned status code {status}"),
            UpstreamError::Transport(e) => write!(f, "upstream request failed: {e}"),
            UpstreamError::MissingGroup => write!(f, "no link group with role org-admin"),
            UpstreamError::Decode(msg) => write!(f, "unexpected upstream response: {msg}"),
            UpstreamError::Io(e) => write!(f, "failed to deliver notification: {e}"),
        }
    }
}

impl std::error::Error for UpstreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpstreamError::Transport(e) => Some(e),
            UpstreamError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            UpstreamError::Decode(e.to_string())
        } else {
            UpstreamError::Transport(e)
        }
    }
}

impl From<std::io::Error> for UpstreamError {
    fn from(e: std::io::Error) -> Self {
        UpstreamError::Io(e)
    }
}

pub(crate) fn http_client() -> Result<reqwest::Client, UpstreamError> {
    Ok(reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Fail with [`UpstreamError::Status`] unless the response status is one of
/// `accepted`.
pub(crate) fn check_status(
    method: &'static str,
    response: reqwest::Response,
    accepted: &[u16],
) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status().as_u16();
    if accepted.contains(&status) {
        return Ok(response);
    }
    let url = response.url().to_string();
    tracing::info!("{method} {url} returned status code {status}");
    Err(UpstreamError::Status {
        method,
        url,
        status,
    })
}

#[cfg(test)]
pub(crate) mod test_server {
    use axum::Router;

    /// Serve `app` on an ephemeral local port, returning its base URL.
    pub async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}
