/// Font registration for figure text.
///
/// Text is rasterized with plotters' `ab_glyph` backend, which only draws
/// fonts registered at runtime. A configured font file is used when one is
/// readable; otherwise the DejaVu Sans copy compiled into the binary is
/// registered, so every figure carries its title and labels.

use plotters::style::{register_font, FontStyle};
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::logging::Stage;
use crate::model::{PageViewError, Result};

/// Family name every renderer requests. Plotters' mesh and legend defaults
/// ask for this family too.
pub const FONT_FAMILY: &str = "sans-serif";

static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Where the registered font came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    File(PathBuf),
    Bundled,
}

static REGISTERED: OnceLock<Option<FontSource>> = OnceLock::new();

/// Register a font for figure text, trying `candidates` in order and then
/// the bundled font.
///
/// Only the first call in a process registers anything; later calls report
/// that outcome.
pub fn load_font(candidates: &[PathBuf]) -> Result<FontSource> {
    REGISTERED
        .get_or_init(|| register_first_available(candidates))
        .clone()
        .ok_or_else(|| PageViewError::Render("no font could be registered for figure text".to_string()))
}

/// Make sure some font is registered before drawing text.
pub fn ensure_font() -> Result<FontSource> {
    load_font(&[])
}

fn register_first_available(candidates: &[PathBuf]) -> Option<FontSource> {
    for path in candidates {
        let Ok(bytes) = fs::read(path) else {
            log::debug!(target: Stage::System.target(), "Cannot read font {}", path.display());
            continue;
        };
        // plotters keeps a reference for the life of the process.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        if register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_ok() {
            log::debug!(target: Stage::System.target(), "Using font {}", path.display());
            return Some(FontSource::File(path.clone()));
        }
        log::debug!(target: Stage::System.target(), "Skipping invalid font {}", path.display());
    }

    if !candidates.is_empty() {
        log::warn!(
            target: Stage::System.target(),
            "None of {} configured fonts could be loaded; using bundled DejaVu Sans",
            candidates.len()
        );
    }
    match register_font(FONT_FAMILY, FontStyle::Normal, BUNDLED_FONT) {
        Ok(()) => Some(FontSource::Bundled),
        Err(_) => {
            log::error!(target: Stage::System.target(), "Bundled font is not a valid TrueType file");
            None
        }
    }
}
