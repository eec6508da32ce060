//! Commands
//!
//! The menu/accelerator surface of the app. Every command is a one-shot
//! request with no payload beyond the selection itself.

use crate::mode::DrawMode;

/// A user command routed to [`crate::App::command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetMode(DrawMode),
    /// Pick the palette color after the current pen color
    NextPenColor,
    /// Pick the palette color after the current brush color
    NextBrushColor,
    /// Deselect the brush so rectangles are hollow
    ClearBrush,
    /// Pick the palette color after the current text color
    NextTextColor,
    /// Pick the next font family
    NextFont,
    /// Step up through the standard point sizes, wrapping to the smallest
    NextFontSize,
    ToggleBold,
    ToggleItalic,
    Print,
    Exit,
}

impl Command {
    /// Keyboard shortcut table.
    ///
    /// | Key      | Command          |
    /// |----------|------------------|
    /// | L / R / T| line / rectangle / text mode |
    /// | P        | next pen color   |
    /// | B        | next brush color |
    /// | H        | hollow brush     |
    /// | C        | next text color  |
    /// | F        | next font        |
    /// | S        | next font size   |
    /// | W        | bold on/off      |
    /// | I        | italic on/off    |
    /// | Ctrl+P   | print            |
    /// | Ctrl+Q   | exit             |
    pub fn from_shortcut(key: char, ctrl: bool) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        if ctrl {
            return match key {
                'p' => Some(Command::Print),
                'q' => Some(Command::Exit),
                _ => None,
            };
        }
        match key {
            'l' => Some(Command::SetMode(DrawMode::Line)),
            'r' => Some(Command::SetMode(DrawMode::Rectangle)),
            't' => Some(Command::SetMode(DrawMode::Text)),
            'p' => Some(Command::NextPenColor),
            'b' => Some(Command::NextBrushColor),
            'h' => Some(Command::ClearBrush),
            'c' => Some(Command::NextTextColor),
            'f' => Some(Command::NextFont),
            's' => Some(Command::NextFontSize),
            'w' => Some(Command::ToggleBold),
            'i' => Some(Command::ToggleItalic),
            _ => None,
        }
    }
}
