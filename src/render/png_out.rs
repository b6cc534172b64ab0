/// PNG encoding for rendered figures.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::{PageViewError, Result};

/// Encode an RGB8 buffer as PNG into `out`.
pub fn encode_png<W: Write>(out: W, width: u32, height: u32, rgb: &[u8]) -> Result<()> {
    let mut encoder = png::Encoder::new(out, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgb)?;
    writer.finish()?;
    Ok(())
}

/// Write an RGB8 buffer to `path`, creating parent directories as needed.
pub fn write_png(path: &Path, width: u32, height: u32, rgb: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PageViewError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| PageViewError::io(path, e))?;
    let mut out = BufWriter::new(file);
    encode_png(&mut out, width, height, rgb)?;
    out.flush().map_err(|e| PageViewError::io(path, e))?;
    Ok(())
}
