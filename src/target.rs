//! Render Targets
//!
//! The few raster operations the drawing surface needs from whatever it
//! draws onto: the visible frame, its own back-buffer, or a page device.

use tiny_skia::{
    BlendMode, FillRule, Paint, Path, Pixmap, PixmapPaint, PixmapRef, Rect, Stroke, Transform,
};

/// A pixel surface that shapes and whole images can be drawn onto
pub trait RenderTarget {
    /// Copy `source` to the origin, replacing destination pixels (no blending).
    /// Pixels outside the destination are clipped.
    fn blit(&mut self, source: PixmapRef<'_>);

    fn fill_rect(&mut self, rect: Rect, paint: &Paint<'_>);

    fn fill_path(&mut self, path: &Path, paint: &Paint<'_>, transform: Transform);

    fn stroke_path(&mut self, path: &Path, paint: &Paint<'_>, stroke: &Stroke);
}

impl RenderTarget for Pixmap {
    fn blit(&mut self, source: PixmapRef<'_>) {
        if source.width() == self.width() && source.height() == self.height() {
            self.data_mut().copy_from_slice(source.data());
            return;
        }
        let paint = PixmapPaint {
            blend_mode: BlendMode::Source,
            ..PixmapPaint::default()
        };
        self.draw_pixmap(0, 0, source, &paint, Transform::identity(), None);
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint<'_>) {
        Pixmap::fill_rect(self, rect, paint, Transform::identity(), None);
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint<'_>, transform: Transform) {
        Pixmap::fill_path(self, path, paint, FillRule::Winding, transform, None);
    }

    fn stroke_path(&mut self, path: &Path, paint: &Paint<'_>, stroke: &Stroke) {
        Pixmap::stroke_path(self, path, paint, stroke, Transform::identity(), None);
    }
}

/// Solid, aliased paint. Shapes are drawn without anti-aliasing so edges land
/// on whole pixels, the way a GDI device context draws.
pub(crate) fn solid_paint(color: crate::Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = false;
    paint
}
