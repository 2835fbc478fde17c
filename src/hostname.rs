//! Hostname extraction from host tokens.

use log::debug;
use url::Url;

/// Extract the network location (host, plus `:port` when explicit) from a host token.
///
/// Tokens that do not start with `http` get an `http://` prefix so bare
/// domains and `domain/path` fragments parse as URLs. Unparseable tokens and
/// tokens without a host yield `None`.
pub fn extract_hostname(token: &str) -> Option<String> {
    let candidate = if token.starts_with("http") {
        token.to_string()
    } else {
        format!("http://{}", token)
    };

    let parsed = match Url::parse(&candidate) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Discarding unparseable host token {:?}: {}", token, e);
            return None;
        }
    };

    let host = parsed.host_str().filter(|h| !h.is_empty())?;
    match parsed.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

/// Extract hostnames from a sequence of tokens, dropping the ones without a host.
pub fn extract_hostnames<'a, I>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    tokens
        .into_iter()
        .filter_map(|token| extract_hostname(token))
        .collect()
}
