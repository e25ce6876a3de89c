use std::io::{BufWriter, Write as _};
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::caption::style::CaptionStyle;
use crate::foundation::error::{CaptionError, CaptionResult};
use crate::text::font::{TextMetrics, TextPainter};
use crate::text::wrap::wrap_text;

/// A wrapped caption line and where it is drawn on the extended canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Measured width in pixels at the caption's font size.
    pub width: f32,
    /// Left edge, centering the line on the canvas.
    pub x: i64,
    /// Top edge in canvas coordinates.
    pub y: i64,
}

/// Geometry of a captioned comic: the rows added above (title) and below (alt text) the
/// original image, and the origin of every caption line.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasLayout {
    pub width: u32,
    pub original_height: u32,
    /// Height of the tallest title line, rounded up. Zero without a title.
    pub title_line_height: u32,
    pub alt_line_height: u32,
    /// Rows inserted above the original image.
    pub added_top: u32,
    /// Rows appended below the original image.
    pub added_bottom: u32,
    pub title_lines: Vec<PlacedLine>,
    pub alt_lines: Vec<PlacedLine>,
}

impl CanvasLayout {
    /// Wrap both captions against `width` and place them around a `width x height` image.
    ///
    /// With `k` title lines of height `lh` and padding `p`, the title band is
    /// `k*(lh+p) + 4p` tall. With `m` alt lines the alt band is `m*lh + (m+3)p` tall.
    pub fn compute<M: TextMetrics + ?Sized>(
        metrics: &mut M,
        width: u32,
        height: u32,
        title: &str,
        alt: &str,
        style: &CaptionStyle,
        scaling: u32,
    ) -> Self {
        let pad = style.line_padding_px;
        let w = width as f32;

        let title_px = style.title_px(scaling);
        let title = measure_lines(metrics, title, title_px, w, style.wrap_fill_ratio);
        let title_lh = tallest(metrics, &title, title_px);
        let k = title.len() as u32;
        let added_top = k * (title_lh + pad) + 4 * pad;

        let alt_px = style.alt_px(scaling);
        let alt = measure_lines(metrics, alt, alt_px, w, style.wrap_fill_ratio);
        let alt_lh = tallest(metrics, &alt, alt_px);
        let m = alt.len() as u32;
        let added_bottom = m * alt_lh + (m + 3) * pad;

        let title_lines = place(title, width, i64::from(pad), title_lh + pad);
        let alt_lines = place(
            alt,
            width,
            i64::from(added_top) + i64::from(height) + i64::from(pad),
            alt_lh + pad,
        );

        Self {
            width,
            original_height: height,
            title_line_height: title_lh,
            alt_line_height: alt_lh,
            added_top,
            added_bottom,
            title_lines,
            alt_lines,
        }
    }

    pub fn total_height(&self) -> u32 {
        self.added_top + self.original_height + self.added_bottom
    }
}

fn measure_lines<M: TextMetrics + ?Sized>(
    metrics: &mut M,
    text: &str,
    size_px: f32,
    width: f32,
    fill_ratio: f32,
) -> Vec<(String, f32)> {
    wrap_text(metrics, text, size_px, width, fill_ratio)
        .into_iter()
        .map(|l| {
            let text = l.text();
            let w = metrics.text_width(&text, size_px);
            (text, w)
        })
        .collect()
}

fn tallest<M: TextMetrics + ?Sized>(metrics: &mut M, lines: &[(String, f32)], size_px: f32) -> u32 {
    lines
        .iter()
        .map(|(t, _)| metrics.line_height(t, size_px).ceil().max(0.0) as u32)
        .max()
        .unwrap_or(0)
}

fn place(lines: Vec<(String, f32)>, width: u32, first_y: i64, step: u32) -> Vec<PlacedLine> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, (text, w))| PlacedLine {
            x: (width as f32 / 2.0 - w / 2.0).floor() as i64,
            y: first_y + i as i64 * i64::from(step),
            text,
            width: w,
        })
        .collect()
}

/// Result of captioning one image file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptionOutcome {
    Applied {
        title_lines: usize,
        alt_lines: usize,
        added_top: u32,
        added_bottom: u32,
    },
    /// The file could not be opened or decoded as an image; it was left untouched.
    SkippedCorruptImage,
}

/// Burns title and alt-text captions into comic images.
pub struct CaptionCompositor<F> {
    font: F,
    style: CaptionStyle,
}

impl<F: TextPainter> CaptionCompositor<F> {
    pub fn new(font: F, style: CaptionStyle) -> CaptionResult<Self> {
        style.validate()?;
        Ok(Self { font, style })
    }

    pub fn style(&self) -> &CaptionStyle {
        &self.style
    }

    pub fn font_mut(&mut self) -> &mut F {
        &mut self.font
    }

    /// Extend `image` with caption bands and draw the wrapped captions into them.
    pub fn render(
        &mut self,
        image: &DynamicImage,
        title: &str,
        alt: &str,
        scaling: u32,
    ) -> CaptionResult<(RgbaImage, CanvasLayout)> {
        let src = image.to_rgba8();
        let layout = CanvasLayout::compute(
            &mut self.font,
            src.width(),
            src.height(),
            title,
            alt,
            &self.style,
            scaling,
        );

        let mut canvas = RgbaImage::from_pixel(
            layout.width,
            layout.total_height(),
            image::Rgba(self.style.background),
        );
        image::imageops::replace(&mut canvas, &src, 0, i64::from(layout.added_top));

        let fg = self.style.foreground;
        let title_px = self.style.title_px(scaling);
        for line in &layout.title_lines {
            self.font
                .paint_text(&mut canvas, &line.text, title_px, (line.x, line.y), fg)?;
        }
        let alt_px = self.style.alt_px(scaling);
        for line in layout.alt_lines.iter().filter(|l| !l.text.is_empty()) {
            self.font
                .paint_text(&mut canvas, &line.text, alt_px, (line.x, line.y), fg)?;
        }

        Ok((canvas, layout))
    }

    /// Caption the image at `path` in place.
    ///
    /// A file that cannot be opened or decoded is left as is and reported as
    /// [`CaptionOutcome::SkippedCorruptImage`]. The replacement is written to a sibling temp
    /// file carrying the original permissions and renamed over `path`, so a failed encode never
    /// truncates the original.
    pub fn apply_to_file(
        &mut self,
        path: &Path,
        title: &str,
        alt: &str,
        scaling: u32,
    ) -> CaptionResult<CaptionOutcome> {
        let (image, format) = match decode(path) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "not captioning unreadable image");
                return Ok(CaptionOutcome::SkippedCorruptImage);
            }
        };

        let (canvas, layout) = self.render(&image, title, alt, scaling)?;
        let out = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8()),
            _ => DynamicImage::ImageRgba8(canvas),
        };

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let permissions = std::fs::metadata(path)?.permissions();
        let tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.as_file().set_permissions(permissions)?;
        {
            let mut w = BufWriter::new(tmp.as_file());
            out.write_to(&mut w, format)?;
            w.flush()?;
        }
        tmp.persist(path).map_err(|e| CaptionError::Io(e.error))?;

        Ok(CaptionOutcome::Applied {
            title_lines: layout.title_lines.len(),
            alt_lines: layout.alt_lines.len(),
            added_top: layout.added_top,
            added_bottom: layout.added_bottom,
        })
    }
}

fn decode(path: &Path) -> CaptionResult<(DynamicImage, ImageFormat)> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .or_else(|| ImageFormat::from_path(path).ok())
        .ok_or_else(|| CaptionError::layout("unknown image format"))?;
    Ok((reader.decode()?, format))
}

#[cfg(test)]
#[path = "../../tests/unit/caption/compositor.rs"]
mod tests;
