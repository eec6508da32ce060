//! End-to-end drag scenarios driven through the public API

use drawing_surface::{
    App, CanvasConfig, Color, Command, CommandOutcome, DrawMode, DrawingSurface, FontBook,
    PageDevice, Point, PointerEvent, SurfaceOptions, SurfaceSize, BACKGROUND,
};
use tiny_skia::{Pixmap, PixmapRef};

const BORDER: Color = Color::rgb(128, 128, 128);

fn options() -> SurfaceOptions {
    SurfaceOptions {
        border_color: BORDER,
        ..SurfaceOptions::default()
    }
}

fn app(width: u32, height: u32) -> App {
    let mut config = CanvasConfig::default();
    config.canvas.border_color = BORDER;
    let mut app = App::new(&config, FontBook::new());
    app.resize(SurfaceSize::new(width, height), 96);
    app
}

fn drag(app: &mut App, from: (i32, i32), to: (i32, i32)) {
    app.handle_pointer(PointerEvent::down(from.0, from.1));
    app.handle_pointer(PointerEvent::moved((from.0 + to.0) / 2, (from.1 + to.1) / 2));
    app.handle_pointer(PointerEvent::moved(to.0, to.1));
    app.handle_pointer(PointerEvent::up(to.0, to.1));
}

fn pixel(image: PixmapRef<'_>, x: u32, y: u32) -> Color {
    Color::from_pixel(image.pixel(x, y).unwrap())
}

#[test]
fn line_drag_commits_single_diagonal() {
    let mut app = app(800, 600);
    app.command(Command::SetMode(DrawMode::Line));
    drag(&mut app, (10, 10), (100, 100));
    app.repaint();

    let buffer = app.surface().buffer().unwrap();
    assert_eq!((buffer.width(), buffer.height()), (800, 600));

    // The diagonal is drawn in the pen color
    for t in [10, 30, 55, 80, 99] {
        assert_eq!(pixel(buffer, t, t), Color::BLACK, "diagonal pixel ({t}, {t})");
    }
    // Border intact
    assert_eq!(pixel(buffer, 0, 0), BORDER);
    assert_eq!(pixel(buffer, 799, 300), BORDER);
    assert_eq!(pixel(buffer, 400, 599), BORDER);
    // Off the line stays background
    assert_eq!(pixel(buffer, 100, 10), BACKGROUND);
    assert_eq!(pixel(buffer, 10, 100), BACKGROUND);
    assert_eq!(pixel(buffer, 300, 300), BACKGROUND);

    // Only the diagonal differs from a fresh surface
    let fresh = app_buffer_copy(&self::app(800, 600));
    let changed = buffer
        .pixels()
        .iter()
        .zip(fresh.pixels())
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| ((i % 800) as i32, (i / 800) as i32))
        .collect::<Vec<_>>();
    assert!(!changed.is_empty());
    assert!(changed.iter().all(|&(x, y)| (x - y).abs() <= 2 && (9..=101).contains(&x)));

    // Visible frame matches the committed drawing once repainted
    assert_eq!(app.frame().unwrap().data(), buffer.data());
}

fn app_buffer_copy(app: &App) -> Pixmap {
    app.surface().buffer().unwrap().to_owned()
}

#[test]
fn hollow_rectangle_without_brush_changes_nothing() {
    let mut app = app(200, 200);
    app.command(Command::SetMode(DrawMode::Rectangle));
    app.command(Command::ClearBrush);
    let before = app_buffer_copy(&app);

    drag(&mut app, (0, 0), (50, 50));
    assert_eq!(app.surface().buffer().unwrap().data(), before.data());
}

#[test]
fn rectangle_preview_does_not_leak_into_buffer() {
    let mut app = app(200, 200);
    app.command(Command::SetMode(DrawMode::Rectangle));
    app.command(Command::NextBrushColor);
    let before = app_buffer_copy(&app);

    app.handle_pointer(PointerEvent::down(20, 20));
    app.handle_pointer(PointerEvent::moved(120, 90));
    // Preview is on screen
    assert_eq!(pixel(app.frame().unwrap(), 60, 60), Color::rgb(128, 0, 0));
    assert_eq!(app.surface().buffer().unwrap().data(), before.data());

    app.repaint();
    assert_eq!(app.surface().buffer().unwrap().data(), before.data());
    assert_eq!(app.frame().unwrap().data(), before.data());
}

#[test]
fn dragging_back_and_forth_leaves_only_final_shape() {
    let mut app = app(200, 200);
    app.command(Command::SetMode(DrawMode::Rectangle));
    app.command(Command::NextBrushColor);

    app.handle_pointer(PointerEvent::down(10, 10));
    app.handle_pointer(PointerEvent::moved(180, 180));
    app.handle_pointer(PointerEvent::moved(40, 40));
    app.handle_pointer(PointerEvent::up(40, 40));

    let buffer = app.surface().buffer().unwrap();
    assert_eq!(pixel(buffer, 20, 20), Color::rgb(128, 0, 0));
    assert_eq!(pixel(buffer, 100, 100), BACKGROUND);
    assert_eq!(pixel(app.frame().unwrap(), 100, 100), BACKGROUND);
}

#[test]
fn mode_switch_between_drags_keeps_earlier_commit() {
    let mut app = app(200, 200);
    drag(&mut app, (10, 100), (190, 100));
    let after_line = app_buffer_copy(&app);

    app.command(Command::SetMode(DrawMode::Rectangle));
    app.command(Command::ClearBrush);
    drag(&mut app, (10, 10), (190, 190));

    assert_eq!(app.surface().buffer().unwrap().data(), after_line.data());
    assert_eq!(pixel(app.surface().buffer().unwrap(), 100, 100), Color::BLACK);
}

#[test]
fn resize_wipes_drawing_and_tracks_window_size() {
    let mut app = app(200, 200);
    drag(&mut app, (10, 100), (190, 100));
    app.resize(SurfaceSize::new(320, 240), 96);

    let buffer = app.surface().buffer().unwrap();
    assert_eq!((buffer.width(), buffer.height()), (320, 240));
    assert_eq!(pixel(buffer, 100, 100), BACKGROUND);
    let frame = app.frame().unwrap();
    assert_eq!((frame.width(), frame.height()), (320, 240));
}

/// Page device that records the bracket calls it receives
#[derive(Default)]
struct Spool {
    calls: Vec<&'static str>,
    document: Option<String>,
    blitted: Vec<(u32, u32)>,
}

impl PageDevice for Spool {
    fn begin_document(&mut self, name: &str) {
        self.document = Some(name.to_string());
        self.calls.push("begin_document");
    }
    fn begin_page(&mut self) {
        self.calls.push("begin_page");
    }
    fn blit(&mut self, source: PixmapRef<'_>) {
        self.blitted.push((source.width(), source.height()));
        self.calls.push("blit");
    }
    fn end_page(&mut self) {
        self.calls.push("end_page");
    }
    fn end_document(&mut self) {
        self.calls.push("end_document");
    }
}

#[test]
fn export_brackets_exactly_one_page_per_call() {
    for (w, h) in [(1, 1), (64, 48), (1024, 768)] {
        let mut surface = DrawingSurface::new(options(), FontBook::new());
        surface.initialize(SurfaceSize::new(w, h), 96);

        let mut spool = Spool::default();
        surface.export(&mut spool);
        assert_eq!(
            spool.calls,
            ["begin_document", "begin_page", "blit", "end_page", "end_document"]
        );
        assert_eq!(spool.blitted, vec![(w, h)]);
        assert_eq!(spool.document.as_deref(), Some("Drawing Surface"));

        surface.export(&mut spool);
        assert_eq!(spool.calls.iter().filter(|c| **c == "begin_page").count(), 2);
    }
}

#[test]
fn print_command_writes_png_pages() {
    let mut app = app(120, 90);
    drag(&mut app, (5, 5), (100, 80));

    let CommandOutcome::Printed(document) = app.command(Command::Print) else {
        panic!("print should return a document");
    };
    let dir = tempfile::tempdir().unwrap();
    let written = document.write_pages(dir.path()).unwrap();
    assert_eq!(written.len(), 1);

    let page = Pixmap::load_png(&written[0]).unwrap();
    assert_eq!((page.width(), page.height()), (120, 90));
    assert_eq!(page.data(), app.surface().buffer().unwrap().data());

    // A later print after more drawing lands beside the first one
    drag(&mut app, (100, 5), (5, 80));
    let CommandOutcome::Printed(document) = app.command(Command::Print) else {
        panic!("print should return a document");
    };
    let second = document.write_pages(dir.path()).unwrap();
    assert_eq!(second.len(), 1);
    assert_ne!(second[0], written[0]);

    let first_again = Pixmap::load_png(&written[0]).unwrap();
    assert_eq!(first_again.data(), page.data());
    let second_page = Pixmap::load_png(&second[0]).unwrap();
    assert_eq!(second_page.data(), app.surface().buffer().unwrap().data());
    assert_ne!(second_page.data(), page.data());
}

#[test]
fn text_drag_without_fonts_leaves_buffer_unchanged() {
    let mut app = app(200, 100);
    app.command(Command::SetMode(DrawMode::Text));
    let before = app_buffer_copy(&app);
    drag(&mut app, (0, 0), (20, 60));
    assert_eq!(app.surface().buffer().unwrap().data(), before.data());
}

const FIXTURE_FONT: &[u8] = include_bytes!("../assets/fonts/Cantarell-Regular.ttf");
const YELLOW: Color = Color::rgb(255, 255, 0);
const BLUE: Color = Color::rgb(0, 0, 255);

fn text_surface() -> DrawingSurface {
    let mut fonts = FontBook::new();
    fonts.load_font_data(FIXTURE_FONT.to_vec());
    let options = SurfaceOptions {
        border_color: BORDER,
        text_background: YELLOW,
        font_family: "Cantarell".to_string(),
        ..SurfaceOptions::default()
    };
    let mut surface = DrawingSurface::new(options, fonts);
    surface.initialize(SurfaceSize::new(300, 120), 96);
    surface.set_mode(DrawMode::Text);
    surface.set_text_color(BLUE);
    surface
}

#[test]
fn text_commit_draws_sample_on_baseline_over_opaque_cell() {
    let mut surface = text_surface();
    let fresh = surface.buffer().unwrap().to_owned();
    assert!(surface.font().is_some());

    // Anchor is ignored; the current point is the baseline origin
    surface.commit(Point::new(5, 5), Point::new(50, 80));
    let buffer = surface.buffer().unwrap();

    // 24px Cantarell: cell spans ceil(ascent) = 26 above the baseline,
    // ceil(descent) = 7 below, and ceil(advance) = 133 across
    let in_cell = |x: u32, y: u32| (50..183).contains(&x) && (54..87).contains(&y);

    let mut ink = Vec::new();
    for y in 0..120 {
        for x in 0..300 {
            let c = pixel(buffer, x, y);
            if !in_cell(x, y) {
                assert_eq!(c, pixel(fresh.as_ref(), x, y), "outside cell at ({x}, {y})");
            } else if c != YELLOW {
                ink.push((x, y));
            }
        }
    }

    // Cell corners carry the text background
    for (x, y) in [(50, 54), (182, 54), (50, 86), (182, 86)] {
        assert_eq!(pixel(buffer, x, y), YELLOW, "cell corner ({x}, {y})");
    }
    // Just outside the cell is untouched
    for (x, y) in [(49, 70), (183, 70), (100, 53), (100, 87)] {
        assert_eq!(pixel(buffer, x, y), BACKGROUND, "beside cell ({x}, {y})");
    }

    assert!(!ink.is_empty());
    let min_x = ink.iter().map(|&(x, _)| x).min().unwrap();
    let min_y = ink.iter().map(|&(_, y)| y).min().unwrap();
    let max_y = ink.iter().map(|&(_, y)| y).max().unwrap();
    // Ink starts at the origin, never left of it
    assert!((50..=53).contains(&min_x), "first ink column {min_x}");
    // Cap height of ~17px above the baseline at y = 80
    assert!((62..=64).contains(&min_y), "top ink row {min_y}");
    // The tail of 'p' is the only ink well below the baseline
    assert!((84..=86).contains(&max_y), "bottom ink row {max_y}");
    for &(x, y) in ink.iter().filter(|&&(_, y)| y >= 82) {
        assert!((96..=108).contains(&x), "descender ink outside 'p' at ({x}, {y})");
    }
    // Text is drawn in the text color
    assert!(ink.iter().any(|&(x, y)| pixel(buffer, x, y) == BLUE));
}

#[test]
fn text_preview_shows_text_without_committing() {
    let surface = text_surface();
    let before = surface.buffer().unwrap().to_owned();

    let mut visible = before.clone();
    surface.render_preview(&mut visible, Point::new(0, 0), Point::new(50, 80));

    assert_eq!(pixel(visible.as_ref(), 50, 54), YELLOW);
    assert_eq!(surface.buffer().unwrap().data(), before.data());
}

#[test]
fn text_drag_with_bundled_font_draws_at_release_point() {
    let mut config = CanvasConfig::default();
    config.canvas.border_color = BORDER;
    let mut app = App::new(&config, FontBook::bundled());
    app.resize(SurfaceSize::new(300, 120), 96);
    app.command(Command::SetMode(DrawMode::Text));
    let before = app_buffer_copy(&app);

    drag(&mut app, (200, 10), (40, 90));
    let buffer = app.surface().buffer().unwrap();
    assert_ne!(buffer.data(), before.data());
    // Nothing near the press point
    assert_eq!(pixel(buffer, 200, 10), BACKGROUND);
    // Text ink sits right of the release point, above its baseline
    assert!((41..120).any(|x| pixel(buffer, x, 80) != BACKGROUND));
}
