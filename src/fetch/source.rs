use std::io::Read;
use std::time::Duration;

use url::Url;

use crate::fetch::record::ComicRecord;
use crate::foundation::error::{CaptionError, CaptionResult};

/// Where comic metadata and images come from.
pub trait ComicSource {
    /// Metadata for comic `number`; `0` means the latest comic.
    fn fetch_record(&self, number: u32) -> CaptionResult<ComicRecord>;

    /// Open an image for streaming.
    fn open_image(&self, url: &Url) -> CaptionResult<ImageResponse<'_>>;
}

/// Answer to an image request.
pub enum ImageResponse<'a> {
    /// 200 OK with the body ready to stream.
    Body(Box<dyn Read + 'a>),
    /// Any other status.
    Unavailable { status: u16 },
}

/// Connection settings for [`HttpComicSource`].
#[derive(Clone, Debug)]
pub struct FetchConfig {
    /// Base of the metadata endpoint; `info.0.json` paths are joined onto it.
    pub endpoint: Url,
    pub timeout: Duration,
}

impl FetchConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://xkcd.com/";

    pub fn xkcd() -> CaptionResult<Self> {
        Self::with_endpoint(Self::DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: &str) -> CaptionResult<Self> {
        // A base without a trailing slash would have its last segment replaced by `join`.
        let normalized = if endpoint.ends_with('/') {
            endpoint.to_string()
        } else {
            format!("{endpoint}/")
        };
        let endpoint = Url::parse(&normalized)
            .map_err(|e| CaptionError::config(format!("endpoint '{endpoint}': {e}")))?;
        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(5),
        })
    }

    /// Metadata URL for comic `number` (`0` = latest).
    pub fn record_url(&self, number: u32) -> CaptionResult<Url> {
        let rel = if number == 0 {
            "info.0.json".to_string()
        } else {
            format!("{number}/info.0.json")
        };
        self.endpoint
            .join(&rel)
            .map_err(|e| CaptionError::config(format!("metadata url for {number}: {e}")))
    }
}

/// Blocking HTTP client for the xkcd JSON API.
pub struct HttpComicSource {
    client: reqwest::blocking::Client,
    config: FetchConfig,
}

impl HttpComicSource {
    pub fn new(config: FetchConfig) -> CaptionResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("xkcd-caption/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CaptionError::config(format!("build http client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

impl ComicSource for HttpComicSource {
    fn fetch_record(&self, number: u32) -> CaptionResult<ComicRecord> {
        let url = self.config.record_url(number)?;
        tracing::debug!(%url, "GET metadata");
        let resp = self.client.get(url.clone()).send()?;
        if !resp.status().is_success() {
            return Err(CaptionError::Http {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        let body = resp.bytes()?;
        ComicRecord::from_json_slice(&body)
    }

    fn open_image(&self, url: &Url) -> CaptionResult<ImageResponse<'_>> {
        tracing::debug!(%url, "GET image");
        let resp = self.client.get(url.clone()).send()?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            tracing::debug!(%url, status = status.as_u16(), "image not available");
            return Ok(ImageResponse::Unavailable {
                status: status.as_u16(),
            });
        }
        Ok(ImageResponse::Body(Box::new(resp)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/source.rs"]
mod tests;
