//! Download xkcd comics and burn their title and alt text into the image.
//!
//! The pipeline for one comic is:
//!
//! - fetch its [`ComicRecord`] from a [`ComicSource`]
//! - store the image with an [`ImageStore`], preferring the `_2x` variant
//! - caption it in place with a [`CaptionCompositor`]
//!
//! [`DownloadSession`] drives that pipeline over a [`Selection`] of comics.
#![forbid(unsafe_code)]

mod caption;
mod fetch;
mod foundation;
mod session;
mod text;

pub use crate::caption::compositor::{CanvasLayout, CaptionCompositor, CaptionOutcome, PlacedLine};
pub use crate::caption::style::CaptionStyle;
pub use crate::fetch::record::{ComicRecord, RETRACTED_COMIC};
pub use crate::fetch::source::{ComicSource, FetchConfig, HttpComicSource, ImageResponse};
pub use crate::fetch::store::{ImageStore, StoredImage};
pub use crate::foundation::error::{CaptionError, CaptionResult};
pub use crate::foundation::math::IdSampler;
pub use crate::session::download_session::{ComicOutcome, DownloadSession, RunStats, Selection};
pub use crate::text::font::{ParleyFont, TextMetrics, TextPainter};
pub use crate::text::wrap::{DEFAULT_FILL_RATIO, WrappedLine, split_word, wrap_text};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;
