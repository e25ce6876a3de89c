pub type CaptionResult<T> = Result<T, CaptionError>;

#[derive(thiserror::Error, Debug)]
pub enum CaptionError {
    #[error("config error: {0}")]
    Config(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("http error: GET {url} returned {status}")]
    Http { url: String, status: u16 },

    #[error("layout error: {0}")]
    Layout(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptionError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// True for failures that only affect one comic and should not abort a batch.
    pub fn is_per_comic(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Http { .. })
    }
}

impl From<reqwest::Error> for CaptionError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
