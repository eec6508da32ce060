//! Drawing Style State
//!
//! Pen, brush and font are held in [`Slot`]s. A slot owns at most one
//! resource; storing a new one drops the previous value, and dropping the
//! slot drops whatever it still holds. Nothing outside the slot can keep a
//! handle to a replaced resource.

/// Width of every pen created through the style API, in pixels
pub const PEN_WIDTH: u32 = 2;

/// Owning holder for one style resource
#[derive(Debug)]
pub struct Slot<T> {
    held: Option<T>,
}

impl<T> Slot<T> {
    pub const fn empty() -> Self {
        Self { held: None }
    }

    /// Store `value`, releasing the previously held resource
    pub fn replace(&mut self, value: T) {
        self.held = Some(value);
    }

    /// Release the held resource and leave the slot empty
    pub fn clear(&mut self) {
        self.held = None;
    }

    pub fn get(&self) -> Option<&T> {
        self.held.as_ref()
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Solid pen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    pub color: crate::Color,
    /// Stroke width in pixels; 0 draws a one-pixel hairline
    pub width: u32,
}

impl Pen {
    pub fn solid(color: crate::Color) -> Self {
        Self { color, width: PEN_WIDTH }
    }

    /// Pen used for lines when no pen is selected
    pub fn hairline() -> Self {
        Self {
            color: crate::Color::BLACK,
            width: 0,
        }
    }
}

/// Solid fill brush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    pub color: crate::Color,
}

impl Brush {
    pub fn solid(color: crate::Color) -> Self {
        Self { color }
    }
}

/// Logical font request, resolved to a face by [`crate::font::FontBook`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    pub family: String,
    /// Character height in pixels. Negative values follow the logical-font
    /// convention of "em height, not cell height"; only the magnitude is used.
    pub height: i32,
    /// CSS-style weight, 400 is regular
    pub weight: u16,
    pub italic: bool,
}

impl FontDescriptor {
    pub const NORMAL_WEIGHT: u16 = 400;
    pub const BOLD_WEIGHT: u16 = 700;

    /// Build a regular-weight descriptor for `point_size` on a display with
    /// `dpi_y` vertical dots per inch.
    pub fn for_dpi(family: impl Into<String>, point_size: u32, dpi_y: u32) -> Self {
        Self {
            family: family.into(),
            height: -point_size_to_pixels(point_size, dpi_y),
            weight: Self::NORMAL_WEIGHT,
            italic: false,
        }
    }

    /// Em size in pixels
    pub fn pixel_size(&self) -> f32 {
        self.height.unsigned_abs() as f32
    }
}

/// `round(point_size * dpi / 72)`, rounding halves away from zero
pub fn point_size_to_pixels(point_size: u32, dpi: u32) -> i32 {
    (point_size as f64 * dpi as f64 / 72.0).round() as i32
}

/// Foreground and background colors used for text output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextColors {
    pub foreground: crate::Color,
    pub background: crate::Color,
}

impl Default for TextColors {
    fn default() -> Self {
        Self {
            foreground: crate::Color::BLACK,
            background: crate::Color::WHITE,
        }
    }
}
