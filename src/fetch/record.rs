use serde::Deserialize;
use url::Url;

use crate::foundation::error::{CaptionError, CaptionResult};

/// Comic number the upstream catalog deliberately leaves empty.
pub const RETRACTED_COMIC: u32 = 404;

/// Metadata of one comic as served by the `info.0.json` endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComicRecord {
    pub id: u32,
    /// The `safe_title` field, free of markup.
    pub title: String,
    pub alt_text: String,
    /// Standard resolution image. See [`ComicRecord::hires_url`] for the `_2x` variant.
    pub image_url: Url,
    /// Lower-cased file extension of the image, e.g. `png`.
    pub extension: String,
    /// Animated comics are downloaded but never captioned.
    pub is_gif: bool,
}

#[derive(Deserialize)]
struct InfoJson {
    num: u32,
    safe_title: String,
    alt: String,
    img: String,
}

impl ComicRecord {
    pub fn from_json_slice(bytes: &[u8]) -> CaptionResult<Self> {
        let info: InfoJson = serde_json::from_slice(bytes)
            .map_err(|e| CaptionError::fetch(format!("comic metadata json: {e}")))?;
        Self::new(info.num, info.safe_title, info.alt, &info.img)
    }

    pub fn new(
        id: u32,
        title: impl Into<String>,
        alt_text: impl Into<String>,
        image_url: &str,
    ) -> CaptionResult<Self> {
        let image_url = Url::parse(image_url)
            .map_err(|e| CaptionError::fetch(format!("image url '{image_url}': {e}")))?;
        let extension = image_url
            .path_segments()
            .and_then(|mut s| s.next_back())
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .ok_or_else(|| CaptionError::fetch(format!("image url '{image_url}' has no extension")))?;
        let is_gif = extension == "gif";

        Ok(Self {
            id,
            title: title.into(),
            alt_text: alt_text.into(),
            image_url,
            extension,
            is_gif,
        })
    }

    /// File name the image is stored under: `<id>.<ext>`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, self.extension)
    }

    /// URL of the double-resolution variant: `_2x` inserted before the extension.
    pub fn hires_url(&self) -> Url {
        let mut url = self.image_url.clone();
        let path = url.path().to_string();
        if let Some((stem, ext)) = path.rsplit_once('.') {
            url.set_path(&format!("{stem}_2x.{ext}"));
        }
        url
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/record.rs"]
mod tests;
