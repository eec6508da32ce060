//! Drawing Surface
//!
//! Owns the back-buffer holding the committed drawing and the style used to
//! draw into it. Strokes are previewed onto a caller-supplied target (the
//! visible frame) and only reach the back-buffer through [`DrawingSurface::commit`].

use tiny_skia::{Pixmap, PixmapRef, Rect};

use crate::color::Color;
use crate::export::PageDevice;
use crate::font::{FontBook, LoadedFont};
use crate::geometry::{Point, SurfaceSize};
use crate::mode::DrawMode;
use crate::style::{Brush, FontDescriptor, Pen, Slot, TextColors};
use crate::target::{solid_paint, RenderTarget};

/// Background every freshly initialised buffer is cleared to
pub const BACKGROUND: Color = Color::WHITE;

/// Settings applied each time the surface is (re)initialised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Color of the one-pixel border drawn around a fresh buffer
    pub border_color: Color,
    /// Fill of the opaque cell behind text
    pub text_background: Color,
    /// Family of the default font
    pub font_family: String,
    /// Point size of the default font, scaled by the display DPI
    pub font_point_size: u32,
    /// Document name handed to page devices on export
    pub document_name: String,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            border_color: Color::WHITE,
            text_background: Color::WHITE,
            font_family: "Arial".to_string(),
            font_point_size: 18,
            document_name: "Drawing Surface".to_string(),
        }
    }
}

/// Current pen, brush, font and text colors
#[derive(Debug, Default)]
pub struct StyleState {
    pub(crate) pen: Slot<Pen>,
    pub(crate) brush: Slot<Brush>,
    pub(crate) font: Slot<LoadedFont>,
    pub(crate) text: TextColors,
}

/// Double-buffered drawing canvas
pub struct DrawingSurface {
    /// Committed drawing; `None` until the first [`DrawingSurface::initialize`]
    buffer: Option<Pixmap>,
    mode: DrawMode,
    style: StyleState,
    fonts: FontBook,
    options: SurfaceOptions,
}

impl DrawingSurface {
    /// Create an uninitialised surface. Nothing can be committed until
    /// [`DrawingSurface::initialize`] reports a size.
    pub fn new(options: SurfaceOptions, fonts: FontBook) -> Self {
        let style = StyleState {
            text: TextColors {
                background: options.text_background,
                ..TextColors::default()
            },
            ..StyleState::default()
        };
        Self {
            buffer: None,
            mode: DrawMode::default(),
            style,
            fonts,
            options,
        }
    }

    /// Allocate a fresh `size` buffer and reset pen, brush and font to their
    /// defaults. Any previous drawing is discarded.
    ///
    /// `dpi_y` is the vertical resolution of the display the default font is
    /// sized for. Empty sizes are ignored and the current buffer is kept.
    pub fn initialize(&mut self, size: SurfaceSize, dpi_y: u32) {
        if size.is_empty() {
            log::warn!("Ignoring surface initialisation with empty size: {:?}", size);
            return;
        }
        let Some(mut buffer) = Pixmap::new(size.width, size.height) else {
            log::warn!("Failed to allocate {}x{} back-buffer", size.width, size.height);
            return;
        };

        buffer.fill(BACKGROUND.to_skia());
        draw_border(&mut buffer, self.options.border_color);
        self.buffer = Some(buffer);

        self.set_pen_color(Color::BLACK);
        self.set_brush_color(Color::BLACK);
        let font = FontDescriptor::for_dpi(
            self.options.font_family.clone(),
            self.options.font_point_size,
            dpi_y,
        );
        self.set_font(&font);

        log::info!(
            "Surface initialised: {}x{}, font {:?} {}px",
            size.width,
            size.height,
            font.family,
            font.pixel_size()
        );
    }

    /// Size of the back-buffer, zero before the first initialisation
    pub fn size(&self) -> SurfaceSize {
        self.buffer
            .as_ref()
            .map(|b| SurfaceSize::new(b.width(), b.height()))
            .unwrap_or_default()
    }

    /// Read-only view of the committed drawing
    pub fn buffer(&self) -> Option<PixmapRef<'_>> {
        self.buffer.as_ref().map(|b| b.as_ref())
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DrawMode) {
        log::debug!("Draw mode: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    pub fn pen(&self) -> Option<&Pen> {
        self.style.pen.get()
    }

    /// Select a solid 2px pen of `color`
    pub fn set_pen_color(&mut self, color: Color) {
        self.set_pen(Pen::solid(color));
    }

    pub fn set_pen(&mut self, pen: Pen) {
        self.style.pen.replace(pen);
    }

    /// Deselect the pen; lines fall back to a black hairline
    pub fn clear_pen(&mut self) {
        self.style.pen.clear();
    }

    pub fn brush(&self) -> Option<&Brush> {
        self.style.brush.get()
    }

    pub fn set_brush_color(&mut self, color: Color) {
        self.set_brush(Brush::solid(color));
    }

    pub fn set_brush(&mut self, brush: Brush) {
        self.style.brush.replace(brush);
    }

    /// Deselect the brush; rectangles become hollow
    pub fn clear_brush(&mut self) {
        self.style.brush.clear();
    }

    pub fn font(&self) -> Option<&LoadedFont> {
        self.style.font.get()
    }

    /// Select the face best matching `descriptor`. When nothing resolves the
    /// font slot is left empty and text mode draws nothing.
    pub fn set_font(&mut self, descriptor: &FontDescriptor) {
        match self.fonts.resolve(descriptor) {
            Ok(font) => self.style.font.replace(font),
            Err(e) => {
                log::warn!("Font {:?} unavailable: {}", descriptor.family, e);
                self.style.font.clear();
            }
        }
    }

    pub fn text_colors(&self) -> TextColors {
        self.style.text
    }

    /// Foreground color used for text
    pub fn set_text_color(&mut self, color: Color) {
        self.style.text.foreground = color;
    }

    /// Show the committed drawing on `target` with the in-progress stroke on
    /// top. The back-buffer is not modified.
    pub fn render_preview<T>(&self, target: &mut T, anchor: Point, current: Point)
    where
        T: RenderTarget + ?Sized,
    {
        if let Some(buffer) = &self.buffer {
            target.blit(buffer.as_ref());
        }
        self.mode.render(target, &self.style, anchor, current);
    }

    /// Draw the stroke permanently into the back-buffer using the mode active
    /// now. Call once per completed drag.
    pub fn commit(&mut self, anchor: Point, current: Point) {
        let Some(buffer) = self.buffer.as_mut() else {
            log::warn!("Commit before initialisation ignored");
            return;
        };
        self.mode.render(buffer, &self.style, anchor, current);
        log::debug!("Committed {} stroke {:?} -> {:?}", self.mode.name(), anchor, current);
    }

    /// Copy the committed drawing onto `target`
    pub fn repaint<T>(&self, target: &mut T)
    where
        T: RenderTarget + ?Sized,
    {
        if let Some(buffer) = &self.buffer {
            target.blit(buffer.as_ref());
        }
    }

    /// Emit the committed drawing as a single one-page document on `device`
    pub fn export<D>(&self, device: &mut D)
    where
        D: PageDevice + ?Sized,
    {
        device.begin_document(&self.options.document_name);
        device.begin_page();
        if let Some(buffer) = &self.buffer {
            device.blit(buffer.as_ref());
        }
        device.end_page();
        device.end_document();
        log::info!("Exported {}x{} page", self.size().width, self.size().height);
    }
}

/// One-pixel outline hugging the buffer edges
fn draw_border(buffer: &mut Pixmap, color: Color) {
    let (w, h) = (buffer.width() as f32, buffer.height() as f32);
    let paint = solid_paint(color);
    let edges = [
        Rect::from_xywh(0.0, 0.0, w, 1.0),
        Rect::from_xywh(0.0, h - 1.0, w, 1.0),
        Rect::from_xywh(0.0, 0.0, 1.0, h),
        Rect::from_xywh(w - 1.0, 0.0, 1.0, h),
    ];
    for edge in edges.into_iter().flatten() {
        RenderTarget::fill_rect(buffer, edge, &paint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::{Paint, Path, Stroke, Transform};

    const GRAY: Color = Color::rgb(128, 128, 128);
    const RED: Color = Color::rgb(255, 0, 0);

    fn surface(width: u32, height: u32) -> DrawingSurface {
        let options = SurfaceOptions {
            border_color: GRAY,
            ..SurfaceOptions::default()
        };
        let mut surface = DrawingSurface::new(options, FontBook::new());
        surface.initialize(SurfaceSize::new(width, height), 96);
        surface
    }

    fn pixel(surface: &DrawingSurface, x: u32, y: u32) -> Color {
        Color::from_pixel(surface.buffer().unwrap().pixel(x, y).unwrap())
    }

    fn front(surface: &DrawingSurface) -> Pixmap {
        let size = surface.size();
        Pixmap::new(size.width, size.height).unwrap()
    }

    fn is_border(x: u32, y: u32, w: u32, h: u32) -> bool {
        x == 0 || y == 0 || x == w - 1 || y == h - 1
    }

    #[test]
    fn initialize_fills_background_and_border() {
        let s = surface(40, 30);
        assert_eq!(s.size(), SurfaceSize::new(40, 30));
        for y in 0..30 {
            for x in 0..40 {
                let expected = if is_border(x, y, 40, 30) { GRAY } else { BACKGROUND };
                assert_eq!(pixel(&s, x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn initialize_sets_default_style() {
        let s = surface(10, 10);
        assert_eq!(s.pen(), Some(&Pen::solid(Color::BLACK)));
        assert_eq!(s.brush(), Some(&Brush::solid(Color::BLACK)));
        assert_eq!(s.mode(), DrawMode::Line);
        // The empty font book cannot resolve the default family
        assert!(s.font().is_none());
    }

    #[test]
    fn resize_discards_drawing() {
        let mut s = surface(50, 50);
        s.commit(Point::new(5, 25), Point::new(45, 25));
        assert_eq!(pixel(&s, 25, 25), Color::BLACK);

        s.initialize(SurfaceSize::new(60, 40), 96);
        assert_eq!(s.size(), SurfaceSize::new(60, 40));
        assert_eq!(pixel(&s, 25, 25), BACKGROUND);
    }

    #[test]
    fn empty_resize_keeps_buffer() {
        let mut s = surface(50, 50);
        s.initialize(SurfaceSize::new(0, 0), 96);
        assert_eq!(s.size(), SurfaceSize::new(50, 50));
    }

    #[test]
    fn uninitialised_surface_ignores_commit() {
        let mut s = DrawingSurface::new(SurfaceOptions::default(), FontBook::new());
        s.commit(Point::new(0, 0), Point::new(10, 10));
        assert!(s.buffer().is_none());
        assert_eq!(s.size(), SurfaceSize::default());
    }

    #[test]
    fn uninitialised_surface_exports_one_blank_page() {
        let s = DrawingSurface::new(SurfaceOptions::default(), FontBook::new());
        let mut document = crate::PngDocument::new();
        s.export(&mut document);
        assert!(document.is_finished());
        assert_eq!(document.page_count(), 1);
    }

    #[test]
    fn preview_does_not_touch_back_buffer() {
        let mut s = surface(80, 80);
        s.set_mode(DrawMode::Rectangle);
        s.set_brush_color(RED);
        let before = s.buffer().unwrap().data().to_vec();

        let mut visible = front(&s);
        s.render_preview(&mut visible, Point::new(10, 10), Point::new(60, 60));
        assert_eq!(Color::from_pixel(visible.pixel(30, 30).unwrap()), RED);

        s.repaint(&mut visible);
        assert_eq!(s.buffer().unwrap().data(), &before[..]);
        assert_eq!(visible.data(), &before[..]);
    }

    #[test]
    fn committed_rectangle_excludes_right_and_bottom_edge() {
        let mut s = surface(80, 80);
        s.set_mode(DrawMode::Rectangle);
        s.set_brush_color(RED);
        s.commit(Point::new(10, 10), Point::new(50, 50));

        assert_eq!(pixel(&s, 10, 10), RED);
        assert_eq!(pixel(&s, 48, 48), RED);
        assert_eq!(pixel(&s, 49, 49), BACKGROUND);
        assert_eq!(pixel(&s, 9, 9), BACKGROUND);
    }

    #[test]
    fn hollow_rectangle_leaves_buffer_unchanged() {
        let mut s = surface(80, 80);
        s.set_mode(DrawMode::Rectangle);
        s.clear_brush();
        let before = s.buffer().unwrap().data().to_vec();

        s.commit(Point::new(0, 0), Point::new(50, 50));
        assert_eq!(s.buffer().unwrap().data(), &before[..]);
    }

    /// Pixmap that counts the drawing calls reaching it
    struct Counting {
        pixmap: Pixmap,
        blits: usize,
        strokes: usize,
    }

    impl RenderTarget for Counting {
        fn blit(&mut self, source: PixmapRef<'_>) {
            self.blits += 1;
            self.pixmap.blit(source);
        }
        fn fill_rect(&mut self, rect: Rect, paint: &Paint<'_>) {
            RenderTarget::fill_rect(&mut self.pixmap, rect, paint);
        }
        fn fill_path(&mut self, path: &Path, paint: &Paint<'_>, transform: Transform) {
            RenderTarget::fill_path(&mut self.pixmap, path, paint, transform);
        }
        fn stroke_path(&mut self, path: &Path, paint: &Paint<'_>, stroke: &Stroke) {
            self.strokes += 1;
            RenderTarget::stroke_path(&mut self.pixmap, path, paint, stroke);
        }
    }

    #[test]
    fn repeated_stroke_draws_twice_with_same_result() {
        let mut s = surface(60, 60);
        let (anchor, current) = (Point::new(5, 5), Point::new(50, 40));
        let mut visible = Counting {
            pixmap: front(&s),
            blits: 0,
            strokes: 0,
        };

        s.render_preview(&mut visible, anchor, current);
        let once = visible.pixmap.clone();
        s.render_preview(&mut visible, anchor, current);
        assert_eq!(visible.strokes, 2);
        assert_eq!(visible.blits, 2);
        assert_eq!(visible.pixmap.data(), once.data());

        // Committing the same stroke twice lands exactly what the preview showed
        s.commit(anchor, current);
        s.commit(anchor, current);
        assert_eq!(s.buffer().unwrap().data(), once.data());
    }

    #[test]
    fn repeated_commit_is_visually_idempotent() {
        let mut once = surface(60, 60);
        once.commit(Point::new(5, 5), Point::new(50, 40));

        let mut twice = surface(60, 60);
        twice.commit(Point::new(5, 5), Point::new(50, 40));
        twice.commit(Point::new(5, 5), Point::new(50, 40));

        assert_eq!(once.buffer().unwrap().data(), twice.buffer().unwrap().data());
    }

    #[test]
    fn commit_uses_mode_active_at_commit_time() {
        let mut s = surface(80, 80);
        s.set_brush_color(RED);
        s.set_mode(DrawMode::Rectangle);
        // Mode changes between press and release
        s.set_mode(DrawMode::Line);
        s.commit(Point::new(10, 10), Point::new(60, 60));

        // A diagonal line, not a filled box
        assert_eq!(pixel(&s, 35, 35), Color::BLACK);
        assert_eq!(pixel(&s, 55, 15), BACKGROUND);
    }

    #[test]
    fn pen_color_change_applies_to_next_line() {
        let mut s = surface(60, 60);
        s.set_pen_color(Color::rgb(0, 0, 255));
        s.commit(Point::new(5, 30), Point::new(55, 30));
        assert_eq!(pixel(&s, 30, 30), Color::rgb(0, 0, 255));

        s.clear_pen();
        assert!(s.pen().is_none());
        s.commit(Point::new(30, 5), Point::new(30, 20));
        assert_eq!(pixel(&s, 30, 10), Color::BLACK);
    }

    #[test]
    fn text_color_is_kept_across_style_changes() {
        let mut s = surface(10, 10);
        s.set_text_color(RED);
        s.set_pen_color(Color::WHITE);
        assert_eq!(s.text_colors().foreground, RED);
        assert_eq!(s.text_colors().background, Color::WHITE);
    }
}
