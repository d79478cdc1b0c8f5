//! ASCII-art preview of the normalized font model.
//!
//! Purely diagnostic, but the most effective manual check of the
//! container's baseline normalization: [`render_string`] walks the shared
//! coordinate frame exactly the way an embedded table consumer would.

use crate::FontContainer;

const ON: char = '@';
const OFF: char = '-';

/// Render one glyph's bitmap, one text line per bitmap row.
pub fn render_char(font: &FontContainer, code: u32) -> Option<String> {
    Some(font.find_glyph(code)?.to_string())
}

/// Render a string aligned at the shared baseline.
///
/// For each output row, every glyph maps the shared row index to its
/// local bitmap row via `y - baseline + top`; rows outside the local
/// extent render blank, and a blank spacer column follows each glyph.
pub fn render_string(font: &FontContainer, text: &str) -> String {
    let mut lines = Vec::with_capacity(font.height);
    for y in 0..font.height as i32 {
        let mut line = String::new();
        for ch in text.chars() {
            let Some(glyph) = font.find_glyph(ch as u32) else {
                continue;
            };
            let local = y - font.baseline + glyph.top;
            if local < 0 || local >= glyph.height as i32 {
                line.extend(std::iter::repeat(OFF).take(glyph.width + 1));
                continue;
            }
            for &px in &glyph.bitmap[local as usize] {
                line.push(if px { ON } else { OFF });
            }
            line.push(OFF);
        }
        lines.push(line);
    }
    lines.join("\n")
}
