//! Screenshot export
//!
//! Writes the framebuffer as a binary PPM (P6), which every image viewer
//! understands and needs no encoder.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use calc_display::{Color, Framebuffer, HEIGHT, WIDTH};
use log::info;

/// Encode `fb` as PPM into `out`
pub fn write_ppm<W: Write>(fb: &Framebuffer, mut out: W) -> io::Result<()> {
    write!(out, "P6\n{} {}\n255\n", WIDTH, HEIGHT)?;
    for row in fb.rows() {
        for &raw in row {
            let (r, g, b) = Color(raw).to_rgb();
            out.write_all(&[r, g, b])?;
        }
    }
    out.flush()
}

/// Save `fb` to `path`
pub fn save_screenshot(fb: &Framebuffer, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create screenshot {}", path.display()))?;
    write_ppm(fb, BufWriter::new(file))
        .with_context(|| format!("failed to write screenshot {}", path.display()))?;
    info!("Screenshot saved to {}", path.display());
    Ok(())
}
