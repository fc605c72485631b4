// file: src/network/release.rs
// version: 1.1.0
// guid: 9f1b3d5e-7a8c-4da4-f6b8-0c2e4f6c8d0f

//! Release-artifact discovery against a plain directory-listing page
//!
//! The kiwix release index lists artifacts one per row in ascending release
//! order; that ordering is an external guarantee this module relies on but
//! does not verify. Selection is substring filtering over lines, nothing
//! more structured than that.

use tracing::debug;
use url::Url;

use crate::{Result, SetupError};

/// Select the last line containing `prefix`, preserving listing order
///
/// The index lists releases oldest-first, so the last match is the newest.
pub fn select_latest<'a, I>(lines: I, prefix: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().filter(|line| line.contains(prefix)).last()
}

/// Slice the artifact filename out of a matched listing line
///
/// The name starts at the prefix and runs to the first quote, angle bracket,
/// or whitespace, which handles both plain-text listings and HTML autoindex
/// rows without parsing markup.
pub fn extract_artifact_name<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let start = line.find(prefix)?;
    let rest = &line[start..];
    let end = rest
        .find(|c: char| c == '"' || c == '\'' || c == '<' || c == '>' || c.is_whitespace())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Finds the newest release artifact on an index page
pub struct ReleaseLocator {
    client: Option<reqwest::Client>,
    #[cfg(test)]
    mock: Option<std::sync::Mutex<std::collections::VecDeque<Result<String>>>>,
}

impl ReleaseLocator {
    pub fn new() -> Self {
        #[cfg(test)]
        {
            Self {
                client: None,
                mock: None,
            }
        }

        #[cfg(not(test))]
        {
            Self {
                client: Some(reqwest::Client::new()),
            }
        }
    }

    /// Create a locator returning queued canned results instead of fetching
    #[cfg(test)]
    pub fn mock(results: Vec<Result<String>>) -> Self {
        Self {
            client: None,
            mock: Some(std::sync::Mutex::new(results.into())),
        }
    }

    /// Fetch `index_url` and return the newest artifact name matching
    /// `prefix`, or an explicit not-found error for an empty listing
    pub async fn latest(&self, index_url: &str, prefix: &str) -> Result<String> {
        #[cfg(test)]
        if let Some(mock) = &self.mock {
            return mock
                .lock()
                .unwrap()
                .pop_front()
                .expect("mock latest result queued");
        }

        let client = self
            .client
            .as_ref()
            .expect("reqwest client available outside tests");

        let url = Url::parse(index_url)
            .map_err(|e| SetupError::config(format!("bad index URL {}: {}", index_url, e)))?;

        debug!("Fetching release index: {}", url);
        let body = client.get(url).send().await?.error_for_status()?.text().await?;

        let line = select_latest(body.lines(), prefix)
            .ok_or_else(|| SetupError::artifact_not_found(prefix, index_url))?;
        let name = extract_artifact_name(line, prefix)
            .ok_or_else(|| SetupError::artifact_not_found(prefix, index_url))?;

        debug!("Latest artifact for `{}`: {}", prefix, name);
        Ok(name.to_string())
    }
}

impl Default for ReleaseLocator {
    fn default() -> Self {
        Self::new()
    }
}
