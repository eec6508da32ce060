//! Draw Modes
//!
//! Each mode is one rendering rule applied to a stroke's anchor and current
//! points. The rule draws onto any [`RenderTarget`] using the style in effect
//! at the time of the call.

use tiny_skia::{PathBuilder, Rect, Stroke, Transform};

use crate::geometry::{CornerRect, Point};
use crate::style::Pen;
use crate::surface::StyleState;
use crate::target::{solid_paint, RenderTarget};

/// Placeholder drawn in text mode
pub const SAMPLE_TEXT: &str = "Sample Text";

/// Shape drawn by the next stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Straight segment from anchor to current with the current pen
    #[default]
    Line,
    /// Brush-filled box with corners at anchor and current, never outlined
    Rectangle,
    /// Fixed sample string with its baseline origin at the current point
    Text,
}

impl DrawMode {
    pub fn name(self) -> &'static str {
        match self {
            DrawMode::Line => "line",
            DrawMode::Rectangle => "rectangle",
            DrawMode::Text => "text",
        }
    }

    /// Draw this mode's shape for a stroke from `anchor` to `current`
    pub(crate) fn render<T>(self, target: &mut T, style: &StyleState, anchor: Point, current: Point)
    where
        T: RenderTarget + ?Sized,
    {
        match self {
            DrawMode::Line => render_line(target, style, anchor, current),
            DrawMode::Rectangle => render_rectangle(target, style, anchor, current),
            DrawMode::Text => render_text(target, style, current),
        }
    }
}

fn render_line<T: RenderTarget + ?Sized>(target: &mut T, style: &StyleState, anchor: Point, current: Point) {
    let pen = style.pen.get().copied().unwrap_or_else(Pen::hairline);

    let mut builder = PathBuilder::new();
    let (x0, y0) = anchor.center();
    let (x1, y1) = current.center();
    builder.move_to(x0, y0);
    builder.line_to(x1, y1);
    let Some(path) = builder.finish() else {
        return;
    };

    let stroke = Stroke {
        width: pen.width as f32,
        ..Stroke::default()
    };
    target.stroke_path(&path, &solid_paint(pen.color), &stroke);
}

fn render_rectangle<T: RenderTarget + ?Sized>(target: &mut T, style: &StyleState, anchor: Point, current: Point) {
    // Null outline: only the brush is visible. With no brush the fill is
    // hollow too, so nothing is drawn.
    let Some(brush) = style.brush.get() else {
        return;
    };

    // Without an outline the filled area stops one pixel short of the
    // right and bottom corner.
    let corners = CornerRect::from_corners(anchor, current);
    if corners.width() <= 1 || corners.height() <= 1 {
        return;
    }
    let Some(rect) = Rect::from_ltrb(
        corners.left as f32,
        corners.top as f32,
        (corners.right - 1) as f32,
        (corners.bottom - 1) as f32,
    ) else {
        return;
    };
    target.fill_rect(rect, &solid_paint(brush.color));
}

fn render_text<T: RenderTarget + ?Sized>(target: &mut T, style: &StyleState, current: Point) {
    let Some(font) = style.font.get() else {
        log::debug!("Text mode with no font selected, nothing drawn");
        return;
    };
    let run = match font.layout(SAMPLE_TEXT) {
        Ok(run) => run,
        Err(e) => {
            log::warn!("Failed to lay out sample text: {}", e);
            return;
        }
    };

    let x = current.x as f32;
    let baseline = current.y as f32;

    // Opaque background behind the text cell
    if let Some(cell) = Rect::from_xywh(
        x,
        baseline - run.ascent.ceil(),
        run.advance.ceil(),
        run.ascent.ceil() + run.descent.ceil(),
    ) {
        target.fill_rect(cell, &solid_paint(style.text.background));
    }

    if let Some(path) = &run.path {
        let mut paint = solid_paint(style.text.foreground);
        paint.anti_alias = true;
        target.fill_path(path, &paint, Transform::from_translate(x, baseline));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Brush, Slot};
    use crate::Color;
    use tiny_skia::{Paint, Path, Pixmap, PixmapRef};

    /// Records which drawing calls reach the target
    #[derive(Default)]
    struct CallLog {
        blits: usize,
        rects: Vec<Rect>,
        fills: usize,
        strokes: Vec<f32>,
    }

    impl RenderTarget for CallLog {
        fn blit(&mut self, _source: PixmapRef<'_>) {
            self.blits += 1;
        }
        fn fill_rect(&mut self, rect: Rect, _paint: &Paint<'_>) {
            self.rects.push(rect);
        }
        fn fill_path(&mut self, _path: &Path, _paint: &Paint<'_>, _transform: Transform) {
            self.fills += 1;
        }
        fn stroke_path(&mut self, _path: &Path, _paint: &Paint<'_>, stroke: &Stroke) {
            self.strokes.push(stroke.width);
        }
    }

    fn style() -> StyleState {
        StyleState::default()
    }

    #[test]
    fn test_line_uses_pen_width() {
        let mut style = style();
        style.pen.replace(Pen::solid(Color::BLACK));
        let mut log = CallLog::default();
        DrawMode::Line.render(&mut log, &style, Point::new(0, 0), Point::new(10, 10));
        assert_eq!(log.strokes, vec![2.0]);
    }

    #[test]
    fn test_line_without_pen_falls_back_to_hairline() {
        let mut log = CallLog::default();
        DrawMode::Line.render(&mut log, &style(), Point::new(0, 0), Point::new(10, 10));
        assert_eq!(log.strokes, vec![0.0]);
    }

    #[test]
    fn test_rectangle_ignores_pen_and_never_strokes() {
        let mut style = style();
        style.pen.replace(Pen::solid(Color::BLACK));
        style.brush.replace(Brush::solid(Color::rgb(255, 0, 0)));
        let mut log = CallLog::default();
        DrawMode::Rectangle.render(&mut log, &style, Point::new(40, 30), Point::new(10, 5));
        assert!(log.strokes.is_empty());
        assert_eq!(log.rects, vec![Rect::from_ltrb(10.0, 5.0, 39.0, 29.0).unwrap()]);
    }

    #[test]
    fn test_hollow_rectangle_draws_nothing() {
        let mut style = style();
        style.pen.replace(Pen::solid(Color::BLACK));
        style.brush = Slot::empty();
        let mut log = CallLog::default();
        DrawMode::Rectangle.render(&mut log, &style, Point::new(0, 0), Point::new(50, 50));
        assert!(log.rects.is_empty());
        assert!(log.strokes.is_empty());
    }

    #[test]
    fn test_text_without_font_draws_nothing() {
        let mut log = CallLog::default();
        DrawMode::Text.render(&mut log, &style(), Point::new(0, 0), Point::new(20, 40));
        assert!(log.rects.is_empty());
        assert_eq!(log.fills, 0);
    }

    #[test]
    fn test_line_pixels_land_on_the_diagonal() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        pixmap.fill(Color::WHITE.to_skia());
        let mut style = style();
        style.pen.replace(Pen::solid(Color::rgb(0, 0, 255)));

        DrawMode::Line.render(&mut pixmap, &style, Point::new(2, 2), Point::new(15, 15));

        let at = |x, y| Color::from_pixel(pixmap.pixel(x, y).unwrap());
        assert_eq!(at(8, 8), Color::rgb(0, 0, 255));
        assert_eq!(at(15, 2), Color::WHITE);
        assert_eq!(at(2, 15), Color::WHITE);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(DrawMode::default(), DrawMode::Line);
        assert_eq!(DrawMode::Rectangle.name(), "rectangle");
        assert_eq!(DrawMode::Text.name(), "text");
    }
}
