// file: src/network/download.rs
// version: 1.2.0
// guid: 8e0a2c4d-6f7b-4c93-e5a7-9b1d3f5b7c9e

//! Streaming artifact download with progress reporting

use crate::Result;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::info;

#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(test)]
static MOCK_RESPONSES: OnceLock<Mutex<std::collections::VecDeque<Result<()>>>> = OnceLock::new();

#[cfg(test)]
fn mock_storage() -> &'static Mutex<std::collections::VecDeque<Result<()>>> {
    MOCK_RESPONSES.get_or_init(|| Mutex::new(std::collections::VecDeque::new()))
}

#[cfg(test)]
pub(crate) fn set_mock_download_with_progress(result: Result<()>) {
    mock_storage().lock().unwrap().push_back(result);
}

/// Downloads release artifacts, streaming them to disk
pub struct NetworkDownloader {
    client: Option<reqwest::Client>,
}

impl NetworkDownloader {
    /// Create a new network downloader
    pub fn new() -> Self {
        #[cfg(test)]
        {
            Self { client: None }
        }

        #[cfg(not(test))]
        {
            Self {
                client: Some(reqwest::Client::new()),
            }
        }
    }

    /// Stream `url` into `dest`, drawing a progress bar on the terminal
    ///
    /// The artifact tarball is tens of megabytes over whatever uplink the
    /// operator has during setup, so progress feedback matters here.
    pub async fn download_with_progress<P: AsRef<Path>>(&self, url: &str, dest: P) -> Result<()> {
        #[cfg(test)]
        if let Some(mock) = mock_storage().lock().unwrap().pop_front() {
            return mock;
        }

        let client = self
            .client
            .as_ref()
            .expect("reqwest client available outside tests");

        info!("Downloading: {}", url);

        let response = client.get(url).send().await?.error_for_status()?;

        let pb = ProgressBar::new(response.content_length().unwrap_or(0));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .unwrap()
                .progress_chars("=>-"),
        );

        let mut file = File::create(&dest).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            pb.inc(chunk.len() as u64);
        }
        file.flush().await?;
        pb.finish();

        info!("Downloaded to: {}", dest.as_ref().display());
        Ok(())
    }
}

impl Default for NetworkDownloader {
    fn default() -> Self {
        Self::new()
    }
}
