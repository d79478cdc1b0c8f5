//! Fixed-field glyph record.
//!
//! A glyph owns a row-major 1-bit bitmap plus the signed bearings that
//! place it relative to the font's shared origin. The bitmap and the
//! `width`/`height` fields are always resized in lockstep; all editing
//! goes through the padding/cropping primitives below.

use std::fmt::Display;

/// Optional metadata supplied alongside a raw bitmap when adding a glyph.
///
/// Unset fields fall back to the bitmap's own dimensions, `left = 0` and
/// `top = height` (the glyph sits entirely above the implicit baseline).
#[derive(Debug, Clone, Copy, Default)]
pub struct RawMetrics {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub left: Option<i32>,
    pub top: Option<i32>,
}

/// One character's bitmap and placement metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Unicode code point
    pub code: u32,
    /// Bitmap width in pixels (equals every row's length)
    pub width: usize,
    /// Bitmap height in pixels (equals the row count)
    pub height: usize,
    /// Advance width before any horizontal padding (legacy format field)
    pub used_width: usize,
    /// Horizontal bearing: offset from the shared origin to the left bitmap edge
    pub left: i32,
    /// Vertical bearing: distance from the baseline up to the top bitmap edge
    pub top: i32,
    /// Row-major 1-bit pixels, `height` rows of `width` columns
    pub bitmap: Vec<Vec<bool>>,
}

impl Glyph {
    pub fn new(code: u32, bitmap: Vec<Vec<bool>>, metrics: RawMetrics) -> Self {
        let width = metrics.width.unwrap_or_else(|| bitmap.first().map_or(0, Vec::len));
        let height = metrics.height.unwrap_or(bitmap.len());
        let left = metrics.left.unwrap_or(0);
        let top = metrics.top.unwrap_or(height as i32);
        Self {
            code,
            width,
            height,
            used_width: width,
            left,
            top,
            bitmap,
        }
    }

    /// Insert `count` blank rows above the bitmap.
    pub fn pad_top(&mut self, count: usize) {
        for _ in 0..count {
            self.bitmap.insert(0, vec![false; self.width]);
        }
        self.height = self.bitmap.len();
    }

    /// Append `count` blank rows below the bitmap.
    pub fn pad_bottom(&mut self, count: usize) {
        for _ in 0..count {
            self.bitmap.push(vec![false; self.width]);
        }
        self.height = self.bitmap.len();
    }

    /// Insert `before` blank columns on the left and `after` on the right.
    pub fn pad_h(&mut self, before: usize, after: usize) {
        for row in &mut self.bitmap {
            for _ in 0..before {
                row.insert(0, false);
            }
            row.extend(std::iter::repeat(false).take(after));
        }
        self.width += before + after;
    }

    /// Remove `left` columns from the left edge and `right` from the right edge.
    pub fn crop_h(&mut self, left: usize, right: usize) {
        for row in &mut self.bitmap {
            row.drain(..left);
            row.truncate(row.len() - right);
        }
        self.width -= left + right;
        self.left = (self.left - left as i32).max(0);
    }

    /// Remove `top` rows from the top edge and `bottom` from the bottom edge.
    pub fn crop_v(&mut self, top: usize, bottom: usize) {
        self.bitmap.drain(..top);
        self.bitmap.truncate(self.bitmap.len() - bottom);
        self.height -= top + bottom;
        self.top = (self.top - top as i32).max(0);
    }

    /// Height with trailing all-blank rows dropped. The grouped table
    /// layout stores and packs only this many rows per glyph.
    pub fn trimmed_height(&self) -> usize {
        let mut height = self.height;
        while height > 0 && self.bitmap[height - 1].iter().all(|&px| !px) {
            height -= 1;
        }
        height
    }

    /// The character this glyph represents, if it is a valid scalar value.
    pub fn char(&self) -> Option<char> {
        char::from_u32(self.code)
    }
}

impl Display for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.bitmap {
            for &px in row {
                f.write_str(if px { "@" } else { "-" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bar_glyph() -> Glyph {
        // 2x3 block, all pixels set
        Glyph::new(b'|' as u32, vec![vec![true; 2]; 3], RawMetrics::default())
    }

    #[test]
    fn defaults_from_bitmap() {
        let g = bar_glyph();
        assert_eq!(g.width, 2);
        assert_eq!(g.height, 3);
        assert_eq!(g.used_width, 2);
        assert_eq!(g.left, 0);
        assert_eq!(g.top, 3);
    }

    #[test]
    fn pad_and_crop_keep_bitmap_in_lockstep() {
        let mut g = bar_glyph();
        g.pad_top(2);
        g.pad_bottom(1);
        g.pad_h(1, 3);
        assert_eq!(g.height, 6);
        assert_eq!(g.width, 6);
        assert!(g.bitmap.iter().all(|row| row.len() == 6));

        g.crop_v(2, 1);
        g.crop_h(1, 3);
        assert_eq!(g.height, 3);
        assert_eq!(g.width, 2);
        assert!(g.bitmap.iter().flatten().all(|&px| px));
    }

    #[test]
    fn trimmed_height_drops_trailing_blank_rows() {
        let mut g = bar_glyph();
        assert_eq!(g.trimmed_height(), 3);
        g.pad_bottom(4);
        assert_eq!(g.height, 7);
        assert_eq!(g.trimmed_height(), 3);
    }
}
