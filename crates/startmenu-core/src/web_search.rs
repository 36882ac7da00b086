//! Web-search fallback for submitted queries that match no app.

use crate::surface::Launcher;
use crate::{Error, Result};
use tracing::debug;
use url::Url;

/// Build `<engine>?q=<query>` with the query percent-encoded.
///
/// # Errors
///
/// Returns an error if `engine` is not an absolute URL.
pub fn search_url(engine: &str, query: &str) -> Result<Url> {
    let mut url =
        Url::parse(engine).map_err(|e| Error::Config(format!("invalid engine URL: {e}")))?;
    url.query_pairs_mut().append_pair("q", query);
    Ok(url)
}

/// Try the platform web-search action, then a plain URL open.
///
/// Returns `true` if either attempt found a handler. Failures are never
/// surfaced to the user.
pub fn search_web(launcher: &mut dyn Launcher, engine: &str, query: &str) -> bool {
    match launcher.web_search(query) {
        Ok(()) => return true,
        Err(e) => debug!("Web search action unavailable: {}", e),
    }

    let url = match search_url(engine, query) {
        Ok(url) => url,
        Err(e) => {
            debug!("Skipping URL fallback: {}", e);
            return false;
        }
    };

    match launcher.open_url(&url) {
        Ok(()) => true,
        Err(e) => {
            debug!("No handler for {}: {}", url, e);
            false
        }
    }
}
