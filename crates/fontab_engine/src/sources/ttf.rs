//! TrueType/OpenType glyph source backed by `fontdue`.

use std::fs;
use std::path::Path;

use crate::{FontContainer, FontError, RawMetrics, Result};

/// Pixels the rasterizer lights at or above this coverage value.
const COVERAGE_THRESHOLD: u8 = 128;

/// A loaded vector font ready to rasterize glyph ranges into a container.
pub struct TtfSource {
    font: fontdue::Font,
    px: f32,
}

impl TtfSource {
    /// Load a TTF/OTF file and fix the rasterization size.
    ///
    /// `size` is a point size; it is converted to pixels at 96 dpi so the
    /// output matches what desktop font tooling produces for the same value.
    pub fn load(path: &Path, size: u32) -> Result<Self> {
        let data = fs::read(path)?;
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|err| FontError::FontParse(err.to_string()))?;
        Ok(Self {
            font,
            px: size as f32 * 96.0 / 72.0,
        })
    }

    /// Container name for a font file: the file stem.
    pub fn font_name(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "font".to_string())
    }

    /// Rasterize the inclusive code point range `first..=last` into a fresh
    /// group of `font` and commit the container. Returns the group index.
    pub fn add_range(&self, font: &mut FontContainer, first: u32, last: u32) -> Result<usize> {
        let group = font.add_group();
        for code in first..=last {
            let ch = char::from_u32(code).ok_or(FontError::Rasterize { code })?;
            if self.font.lookup_glyph_index(ch) == 0 {
                return Err(FontError::Rasterize { code });
            }
            let (metrics, coverage) = self.font.rasterize(ch, self.px);
            let bitmap = (0..metrics.height)
                .map(|y| {
                    (0..metrics.width)
                        .map(|x| coverage[y * metrics.width + x] >= COVERAGE_THRESHOLD)
                        .collect()
                })
                .collect();
            font.add_char(
                group,
                code,
                bitmap,
                RawMetrics {
                    width: Some(metrics.width),
                    height: Some(metrics.height),
                    left: Some(metrics.xmin),
                    top: Some(metrics.ymin + metrics.height as i32),
                },
            )?;
        }
        font.commit();
        Ok(group)
    }
}
