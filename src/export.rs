//! Hard-copy Output
//!
//! A [`PageDevice`] receives documents as a begin/end bracket around pages,
//! the shape a printer spool expects. [`PngDocument`] is the device used by
//! the desktop app's Print command: every page becomes one PNG image.

use std::path::{Path, PathBuf};

use tiny_skia::{Pixmap, PixmapRef};

use crate::color::Color;
use crate::target::RenderTarget;

/// Destination that accumulates pages of pixels
pub trait PageDevice {
    fn begin_document(&mut self, name: &str);
    fn begin_page(&mut self);
    /// Copy `source` onto the open page at its origin, pixel for pixel
    fn blit(&mut self, source: PixmapRef<'_>);
    fn end_page(&mut self);
    fn end_document(&mut self);
}

/// Errors writing an exported document
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("document has no pages")]
    EmptyDocument,

    #[error("failed to encode page {page} as PNG: {message}")]
    Encode { page: usize, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// In-memory document whose pages are encoded as PNG images
#[derive(Default)]
pub struct PngDocument {
    name: Option<String>,
    pages: Vec<Pixmap>,
    open_page: Option<Option<Pixmap>>,
    finished: bool,
}

impl PngDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name passed to `begin_document`
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Pixmap] {
        &self.pages
    }

    /// True once `end_document` has been called
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Encode every page as PNG bytes, in page order
    pub fn encode_pages(&self) -> Result<Vec<Vec<u8>>, ExportError> {
        if self.pages.is_empty() {
            return Err(ExportError::EmptyDocument);
        }
        self.pages
            .iter()
            .enumerate()
            .map(|(index, page)| {
                page.encode_png().map_err(|e| ExportError::Encode {
                    page: index + 1,
                    message: e.to_string(),
                })
            })
            .collect()
    }

    /// Write the pages into a new `print-NNN` directory under `dir`, as
    /// `page-001.png`, `page-002.png`, ... Earlier prints in `dir` are kept;
    /// `NNN` is one past the highest existing job number. Returns the written
    /// paths.
    pub fn write_pages(&self, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        let encoded = self.encode_pages()?;
        let job_dir = next_job_dir(dir)?;
        std::fs::create_dir_all(&job_dir)?;

        let mut written = Vec::with_capacity(encoded.len());
        for (index, bytes) in encoded.iter().enumerate() {
            let path = job_dir.join(format!("page-{:03}.png", index + 1));
            std::fs::write(&path, bytes)?;
            log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
            written.push(path);
        }
        Ok(written)
    }
}

/// Prefix of the per-print directories created by [`PngDocument::write_pages`]
const JOB_DIR_PREFIX: &str = "print-";

fn next_job_dir(dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let mut last = 0u32;
    for entry in std::fs::read_dir(dir)? {
        let name = entry?.file_name();
        let job = name
            .to_str()
            .and_then(|n| n.strip_prefix(JOB_DIR_PREFIX))
            .and_then(|n| n.parse::<u32>().ok());
        if let Some(job) = job {
            last = last.max(job);
        }
    }
    Ok(dir.join(format!("{}{:03}", JOB_DIR_PREFIX, last + 1)))
}

impl PageDevice for PngDocument {
    fn begin_document(&mut self, name: &str) {
        self.name = Some(name.to_string());
        self.finished = false;
    }

    fn begin_page(&mut self) {
        if self.open_page.is_some() {
            log::warn!("begin_page while a page is open, previous page discarded");
        }
        self.open_page = Some(None);
    }

    fn blit(&mut self, source: PixmapRef<'_>) {
        let Some(page) = self.open_page.as_mut() else {
            log::warn!("blit outside of a page ignored");
            return;
        };
        // A page takes the size of the first image drawn onto it
        if page.is_none() {
            *page = blank_page(source.width(), source.height());
        }
        if let Some(page) = page.as_mut() {
            RenderTarget::blit(page, source);
        }
    }

    fn end_page(&mut self) {
        match self.open_page.take() {
            Some(Some(page)) => self.pages.push(page),
            // Nothing was drawn; the page still counts, as a blank sheet
            Some(None) => self.pages.extend(blank_page(1, 1)),
            None => log::warn!("end_page without begin_page ignored"),
        }
    }

    fn end_document(&mut self) {
        self.finished = true;
        log::debug!("Document {:?} finished with {} pages", self.name, self.pages.len());
    }
}

fn blank_page(width: u32, height: u32) -> Option<Pixmap> {
    let mut page = Pixmap::new(width, height)?;
    page.fill(Color::WHITE.to_skia());
    Some(page)
}
