//! Font Resolution and Glyph Outlines
//!
//! Text is drawn from vector glyph outlines:
//! - `FontBook` owns a `fontdb::Database` and resolves a [`FontDescriptor`]
//!   to a concrete face, falling back to the generic sans-serif family and
//!   then to the bundled Cantarell face.
//! - `LoadedFont` keeps the face bytes alive and lays out a string into a
//!   single `tiny_skia::Path` positioned relative to its baseline origin.

use std::sync::Arc;

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight, ID};
use tiny_skia::{Path, PathBuilder};

use crate::style::FontDescriptor;

/// Errors produced while resolving or reading a font face
#[derive(thiserror::Error, Debug)]
pub enum FontError {
    #[error("no font face available for family {0:?}")]
    NotFound(String),

    #[error("font face data is unavailable")]
    DataUnavailable,

    #[error("failed to parse font face")]
    ParseFailed,
}

/// Last-resort face compiled into the binary (SIL Open Font License 1.1)
pub const FALLBACK_FONT: &[u8] = include_bytes!("../assets/fonts/Cantarell-Regular.ttf");

/// Family name of [`FALLBACK_FONT`]
pub const FALLBACK_FAMILY: &str = "Cantarell";

/// Database of font faces the surface can draw text with
pub struct FontBook {
    db: Database,
    fallback: Option<ID>,
}

impl FontBook {
    /// An empty book; only faces added with [`FontBook::load_font_data`] resolve
    pub fn new() -> Self {
        Self {
            db: Database::new(),
            fallback: None,
        }
    }

    /// Only the bundled face. Used where no system fonts can be read (web).
    pub fn bundled() -> Self {
        let mut book = Self::new();
        book.load_fallback();
        book
    }

    /// A book populated with the fonts installed on this system, plus the
    /// bundled face for families none of them provide
    pub fn with_system_fonts() -> Self {
        let mut book = Self::new();
        book.db.load_system_fonts();
        log::info!("Loaded {} system font faces", book.db.len());
        book.load_fallback();
        book
    }

    fn load_fallback(&mut self) {
        let ids = self.db.load_font_source(Source::Binary(Arc::new(FALLBACK_FONT)));
        self.fallback = ids.first().copied();
        if self.fallback.is_none() {
            log::warn!("Bundled {} face failed to load", FALLBACK_FAMILY);
        }
    }

    /// Add an in-memory TTF/OTF/TTC file
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    /// Resolve a descriptor to a face.
    ///
    /// Tries the named family, then generic sans-serif, then the bundled
    /// face, then the first face in the database.
    pub fn resolve(&self, descriptor: &FontDescriptor) -> Result<LoadedFont, FontError> {
        let style = if descriptor.italic {
            Style::Italic
        } else {
            Style::Normal
        };
        let weight = Weight(descriptor.weight.clamp(1, 1000));
        let families = [Family::Name(descriptor.family.as_str()), Family::SansSerif];

        let id = self
            .db
            .query(&Query {
                families: &families,
                weight,
                stretch: Stretch::Normal,
                style,
            })
            .or(self.fallback)
            .or_else(|| self.db.faces().next().map(|face| face.id))
            .ok_or_else(|| FontError::NotFound(descriptor.family.clone()))?;

        let loaded = self
            .db
            .with_face_data(id, |data, index| {
                LoadedFont::from_bytes(descriptor.clone(), Arc::from(data), index)
            })
            .ok_or(FontError::DataUnavailable)??;

        log::debug!(
            "Resolved font {:?} ({}px) to face {:?}",
            descriptor.family,
            descriptor.pixel_size(),
            id
        );
        Ok(loaded)
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

/// A resolved face ready for text layout
#[derive(Debug, Clone)]
pub struct LoadedFont {
    descriptor: FontDescriptor,
    data: Arc<[u8]>,
    index: u32,
    units_per_em: f32,
    ascender: f32,
    descender: f32,
}

/// A laid-out string in pixels, relative to its left baseline origin
#[derive(Debug, Clone)]
pub struct TextRun {
    /// Filled glyph outlines; `None` when no glyph has an outline
    pub path: Option<Path>,
    /// Total horizontal advance
    pub advance: f32,
    /// Distance from baseline to top of the cell (positive)
    pub ascent: f32,
    /// Distance from baseline to bottom of the cell (positive)
    pub descent: f32,
}

impl LoadedFont {
    fn from_bytes(descriptor: FontDescriptor, data: Arc<[u8]>, index: u32) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&data, index).map_err(|_| FontError::ParseFailed)?;
        let units_per_em = face.units_per_em() as f32;
        let ascender = face.ascender() as f32;
        let descender = face.descender() as f32;

        Ok(Self {
            descriptor,
            data,
            index,
            units_per_em,
            ascender,
            descender,
        })
    }

    pub fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }

    /// Lay out `text` on a single line with no kerning or shaping
    pub fn layout(&self, text: &str) -> Result<TextRun, FontError> {
        let face = ttf_parser::Face::parse(&self.data, self.index).map_err(|_| FontError::ParseFailed)?;
        let scale = self.descriptor.pixel_size() / self.units_per_em;

        let mut builder = GlyphPathBuilder {
            path: PathBuilder::new(),
            scale,
            origin_x: 0.0,
        };
        let mut pen_x = 0.0;

        for ch in text.chars() {
            let Some(glyph) = face.glyph_index(ch) else {
                log::debug!("No glyph for {:?} in {:?}", ch, self.descriptor.family);
                continue;
            };
            builder.origin_x = pen_x;
            // Spaces have no outline; only their advance matters
            face.outline_glyph(glyph, &mut builder);
            pen_x += face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * scale;
        }

        Ok(TextRun {
            path: builder.path.finish(),
            advance: pen_x,
            ascent: self.ascender * scale,
            descent: -self.descender * scale,
        })
    }
}

/// Collects `ttf-parser` outline callbacks into a y-down pixel path
struct GlyphPathBuilder {
    path: PathBuilder,
    scale: f32,
    origin_x: f32,
}

impl GlyphPathBuilder {
    #[inline]
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, -y * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.path.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.path.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.path.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.path.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.path.close();
    }
}
