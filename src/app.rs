//! Application State and Logic
//!
//! `App` owns the drawing surface, the visible frame it previews onto, and
//! the explicit input state (drag tracker, color palette, font cycle). It is
//! independent of the windowing system; the window layer feeds it events and
//! presents [`App::frame`].

use tiny_skia::{Pixmap, PixmapRef};

use crate::color::Palette;
use crate::command::Command;
use crate::config::CanvasConfig;
use crate::export::PngDocument;
use crate::font::{FontBook, LoadedFont};
use crate::geometry::SurfaceSize;
use crate::input::{PointerEvent, StrokeAction, StrokeTracker};
use crate::renderer::Renderer;
use crate::style::FontDescriptor;
use crate::surface::DrawingSurface;

/// Result of a command that the host has to act on
pub enum CommandOutcome {
    /// Style or mode changed; nothing to show until the next stroke
    Applied,
    /// A finished one-page document to hand to an output device
    Printed(PngDocument),
    Exit,
}

/// Point sizes offered by [`Command::NextFontSize`]
const FONT_SIZES: [u32; 8] = [8, 10, 12, 14, 18, 24, 36, 48];

/// Main application state
pub struct App {
    surface: DrawingSurface,
    /// Visible frame; previews are composited here, never into the surface
    frame: Option<Pixmap>,
    stroke: StrokeTracker,
    palette: Palette,
    font_families: Vec<String>,
    font_index: usize,
    default_point_size: u32,
    font_point_size: u32,
    bold: bool,
    italic: bool,
    dpi_y: u32,
}

impl App {
    pub fn new(config: &CanvasConfig, fonts: FontBook) -> Self {
        Self {
            surface: DrawingSurface::new(config.surface_options(), fonts),
            frame: None,
            stroke: StrokeTracker::new(),
            palette: Palette::default(),
            font_families: config.font_families(),
            font_index: 0,
            default_point_size: config.font.point_size,
            font_point_size: config.font.point_size,
            bold: false,
            italic: false,
            dpi_y: 96,
        }
    }

    /// Window size or DPI changed. Re-initialises the surface, which wipes
    /// the drawing and restores the default pen, brush and font.
    pub fn resize(&mut self, size: SurfaceSize, dpi_y: u32) {
        if size.is_empty() {
            log::warn!("Ignoring resize to empty size: {:?}", size);
            return;
        }
        self.dpi_y = dpi_y;
        self.surface.initialize(size, dpi_y);
        self.font_index = 0;
        self.font_point_size = self.default_point_size;
        self.bold = false;
        self.italic = false;
        self.frame = Pixmap::new(size.width, size.height);
        self.repaint();
    }

    /// Feed one pointer event. Returns true when the frame changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let Some(action) = self.stroke.handle(event) else {
            return false;
        };
        let Some(frame) = self.frame.as_mut() else {
            return false;
        };
        match action {
            StrokeAction::Preview { anchor, current } => {
                self.surface.render_preview(frame, anchor, current);
            }
            StrokeAction::Commit { anchor, current } => {
                self.surface.render_preview(frame, anchor, current);
                self.surface.commit(anchor, current);
            }
        }
        true
    }

    /// Drop an unfinished drag and restore the committed drawing on screen.
    /// Returns true when the frame changed.
    pub fn cancel_stroke(&mut self) -> bool {
        if !self.stroke.cancel() {
            return false;
        }
        log::debug!("Stroke abandoned");
        self.repaint();
        true
    }

    /// Show the committed drawing with no preview on top
    pub fn repaint(&mut self) {
        if let Some(frame) = self.frame.as_mut() {
            self.surface.repaint(frame);
        }
    }

    pub fn command(&mut self, command: Command) -> CommandOutcome {
        log::debug!("Command: {:?}", command);
        match command {
            Command::SetMode(mode) => self.surface.set_mode(mode),
            Command::NextPenColor => {
                let next = match self.surface.pen() {
                    Some(pen) => self.palette.next_after(pen.color),
                    None => self.palette.colors()[0],
                };
                self.surface.set_pen_color(next);
            }
            Command::NextBrushColor => {
                // A hollow brush restarts the cycle
                let next = match self.surface.brush() {
                    Some(brush) => self.palette.next_after(brush.color),
                    None => self.palette.colors()[0],
                };
                self.surface.set_brush_color(next);
            }
            Command::ClearBrush => self.surface.clear_brush(),
            Command::NextTextColor => {
                let current = self.surface.text_colors().foreground;
                self.surface.set_text_color(self.palette.next_after(current));
            }
            Command::NextFont => {
                self.font_index = (self.font_index + 1) % self.font_families.len().max(1);
                self.select_font();
            }
            Command::NextFontSize => {
                self.font_point_size = FONT_SIZES
                    .into_iter()
                    .find(|&size| size > self.font_point_size)
                    .unwrap_or(FONT_SIZES[0]);
                self.select_font();
            }
            Command::ToggleBold => {
                self.bold = !self.bold;
                self.select_font();
            }
            Command::ToggleItalic => {
                self.italic = !self.italic;
                self.select_font();
            }
            Command::Print => {
                let mut document = PngDocument::new();
                self.surface.export(&mut document);
                return CommandOutcome::Printed(document);
            }
            Command::Exit => return CommandOutcome::Exit,
        }
        CommandOutcome::Applied
    }

    /// Hand the surface the font described by the current family, size,
    /// weight and slant choices
    fn select_font(&mut self) {
        let Some(family) = self.font_families.get(self.font_index) else {
            return;
        };
        let weight = if self.bold {
            FontDescriptor::BOLD_WEIGHT
        } else {
            FontDescriptor::NORMAL_WEIGHT
        };
        let font = FontDescriptor {
            weight,
            italic: self.italic,
            ..FontDescriptor::for_dpi(family.clone(), self.font_point_size, self.dpi_y)
        };
        self.surface.set_font(&font);
        if let Some(selected) = self.surface.font().map(LoadedFont::descriptor) {
            log::info!(
                "Font: {:?} {}pt ({}px), weight {}, italic {}",
                selected.family,
                self.font_point_size,
                selected.pixel_size(),
                selected.weight,
                selected.italic
            );
        }
    }

    /// Present the visible frame
    pub fn render(&self, renderer: &mut Renderer) {
        if let Some(frame) = self.frame() {
            renderer.render(frame);
        }
    }

    /// The frame the host should show
    pub fn frame(&self) -> Option<PixmapRef<'_>> {
        self.frame.as_ref().map(|f| f.as_ref())
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_drawing()
    }
}
