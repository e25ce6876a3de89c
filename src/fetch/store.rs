use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use crate::fetch::record::ComicRecord;
use crate::fetch::source::{ComicSource, ImageResponse};
use crate::foundation::error::{CaptionError, CaptionResult};

/// A comic image written to the output directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredImage {
    pub path: PathBuf,
    /// 2 when the `_2x` variant was downloaded, 1 otherwise.
    pub scaling: u32,
    pub bytes: u64,
}

/// Output directory that downloaded comics are written into.
#[derive(Clone, Debug)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Open `dir` for writing. Fails unless it exists, is a directory, and accepts new files.
    pub fn open(dir: impl Into<PathBuf>) -> CaptionResult<Self> {
        let dir = dir.into();
        let meta = std::fs::metadata(&dir)
            .map_err(|_| CaptionError::config(format!("'{}', no such directory", dir.display())))?;
        if !meta.is_dir() {
            return Err(CaptionError::config(format!(
                "'{}', not a directory",
                dir.display()
            )));
        }
        tempfile::tempfile_in(&dir)
            .map_err(|_| CaptionError::config(format!("'{}', permission denied", dir.display())))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, record: &ComicRecord) -> PathBuf {
        self.dir.join(record.file_name())
    }

    /// Download the image for `record`, preferring the double-resolution variant.
    pub fn download<S: ComicSource + ?Sized>(
        &self,
        source: &S,
        record: &ComicRecord,
    ) -> CaptionResult<StoredImage> {
        let (mut body, scaling) = match source.open_image(&record.hires_url())? {
            ImageResponse::Body(body) => (body, 2),
            // Older comics only have the 1x image.
            ImageResponse::Unavailable { .. } => match source.open_image(&record.image_url)? {
                ImageResponse::Body(body) => (body, 1),
                ImageResponse::Unavailable { status } => {
                    return Err(CaptionError::Http {
                        url: record.image_url.to_string(),
                        status,
                    });
                }
            },
        };

        let path = self.path_for(record);
        let mut out = BufWriter::new(File::create(&path)?);
        let copied = std::io::copy(&mut body, &mut out).and_then(|n| out.flush().map(|_| n));
        drop(out);
        let bytes = match copied {
            Ok(n) => n,
            Err(e) => {
                // Never leave a truncated image under the comic's name.
                if let Err(rm) = std::fs::remove_file(&path) {
                    tracing::warn!(path = %path.display(), error = %rm, "could not remove partial download");
                }
                return Err(CaptionError::fetch(format!(
                    "download '{}': {e}",
                    path.display()
                )));
            }
        };
        tracing::debug!(path = %path.display(), bytes, scaling, "stored image");

        Ok(StoredImage {
            path,
            scaling,
            bytes,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/store.rs"]
mod tests;
