//! Deadlines Source
//!
//! Fetches the static deadlines document over HTTP.

use gloo_net::http::Request;
use crate::models::DeadlinesDocument;

/// The only error message the block ever shows for a failed fetch
pub const FETCH_FAILED: &str = "Failed to fetch deadlines";

/// Fetch and decode the deadlines document.
///
/// Network errors, non-2xx responses and undecodable bodies all collapse into
/// [`FETCH_FAILED`]; the underlying cause only goes to the log.
pub async fn fetch_deadlines(url: &str) -> Result<DeadlinesDocument, String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| fetch_failed(url, e))?;

    check_status(response.status()).map_err(|e| fetch_failed(url, e))?;

    let body = response.text().await.map_err(|e| fetch_failed(url, e))?;
    DeadlinesDocument::from_json(&body).map_err(|e| fetch_failed(url, e))
}

/// Same rule as `Response.ok`: only 2xx counts as success
pub fn check_status(status: u16) -> Result<(), String> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(format!("HTTP status {}", status))
    }
}

fn fetch_failed(url: &str, cause: impl std::fmt::Display) -> String {
    log::error!("[DEADLINES] Fetching {} failed: {}", url, cause);
    FETCH_FAILED.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status() {
        assert!(check_status(200).is_ok());
        assert!(check_status(204).is_ok());
        assert_eq!(check_status(500), Err("HTTP status 500".to_string()));
        assert!(check_status(404).is_err());
        assert!(check_status(304).is_err());
    }

    #[test]
    fn test_fetch_failed_is_generic() {
        assert_eq!(fetch_failed("/DEADLINES.json", "HTTP status 500"), FETCH_FAILED);
    }
}
