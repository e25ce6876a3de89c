use std::path::Path;

use image::RgbaImage;

use crate::foundation::error::{CaptionError, CaptionResult};
use crate::foundation::math::mul_div255_u8;

/// Width and height queries for a font at a given pixel size.
pub trait TextMetrics {
    /// Rendered advance width of `text` on a single line.
    fn text_width(&mut self, text: &str, size_px: f32) -> f32;

    /// Height of the single-line box needed to draw `text`.
    fn line_height(&mut self, text: &str, size_px: f32) -> f32;
}

/// A font that can also draw a line of text onto a straight-alpha RGBA canvas.
pub trait TextPainter: TextMetrics {
    /// Draw `text` with the top-left of its line box at `origin`.
    /// Pixels falling outside `canvas` are clipped.
    fn paint_text(
        &mut self,
        canvas: &mut RgbaImage,
        text: &str,
        size_px: f32,
        origin: (i64, i64),
        color: [u8; 4],
    ) -> CaptionResult<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub(crate) struct TextBrushRgba8 {
    /// Red channel.
    pub(crate) r: u8,
    /// Green channel.
    pub(crate) g: u8,
    /// Blue channel.
    pub(crate) b: u8,
    /// Straight (non-premultiplied) alpha.
    pub(crate) a: u8,
}

impl From<[u8; 4]> for TextBrushRgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// TrueType/OpenType font shaped with Parley and rasterized with `vello_cpu`.
pub struct ParleyFont {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl ParleyFont {
    pub fn from_path(path: impl AsRef<Path>) -> CaptionResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| CaptionError::font(format!("read '{}': {e}", path.display())))?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(font_bytes: Vec<u8>) -> CaptionResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CaptionError::font("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CaptionError::font("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextMetrics for ParleyFont {
    fn text_width(&mut self, text: &str, size_px: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        self.layout_line(text, size_px, TextBrushRgba8::default())
            .width()
    }

    fn line_height(&mut self, text: &str, size_px: f32) -> f32 {
        self.layout_line(text, size_px, TextBrushRgba8::default())
            .height()
    }
}

impl TextPainter for ParleyFont {
    fn paint_text(
        &mut self,
        canvas: &mut RgbaImage,
        text: &str,
        size_px: f32,
        origin: (i64, i64),
        color: [u8; 4],
    ) -> CaptionResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let layout = self.layout_line(text, size_px, color.into());

        // One pixel of slack on each side for antialiased glyph edges.
        let w = u16::try_from(layout.width().ceil() as u32 + 2)
            .map_err(|_| CaptionError::layout("text line wider than 65535 px"))?;
        let h = u16::try_from(layout.height().ceil() as u32 + 2)
            .map_err(|_| CaptionError::layout("text line taller than 65535 px"))?;

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((1.0, 1.0)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        blend_premul_over(
            canvas,
            pixmap.data_as_u8_slice(),
            u32::from(w),
            u32::from(h),
            (origin.0 - 1, origin.1 - 1),
        );
        Ok(())
    }
}

/// Composite a premultiplied RGBA8 buffer over a straight-alpha canvas at `at`, clipping to
/// the canvas bounds.
pub(crate) fn blend_premul_over(
    canvas: &mut RgbaImage,
    src_premul: &[u8],
    src_w: u32,
    src_h: u32,
    at: (i64, i64),
) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    for sy in 0..src_h {
        let dy = at.1 + i64::from(sy);
        if dy < 0 || dy >= ch {
            continue;
        }
        for sx in 0..src_w {
            let dx = at.0 + i64::from(sx);
            if dx < 0 || dx >= cw {
                continue;
            }
            let idx = ((sy * src_w + sx) * 4) as usize;
            let Some(s) = src_premul.get(idx..idx + 4) else {
                return;
            };
            let sa = u16::from(s[3]);
            if sa == 0 {
                continue;
            }
            let d = canvas.get_pixel_mut(dx as u32, dy as u32);
            let da = u16::from(d.0[3]);
            let inv = 255 - sa;

            // Straight destination to premultiplied, source-over, back to straight.
            let out_a = u32::from(s[3]) + u32::from(mul_div255_u8(da, inv));
            for c in 0..3 {
                let dc = mul_div255_u8(u16::from(d.0[c]), da);
                let out_c = u32::from(s[c]) + u32::from(mul_div255_u8(u16::from(dc), inv));
                d.0[c] = if out_a == 0 {
                    0
                } else {
                    ((out_c * 255 + out_a / 2) / out_a).min(255) as u8
                };
            }
            d.0[3] = out_a.min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
