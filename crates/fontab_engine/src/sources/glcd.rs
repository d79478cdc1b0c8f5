//! Scanner for GLCD C font headers (MikroElektronika-style exports).
//!
//! These headers carry one `const unsigned short <Name><W>x<H>[]` array
//! where every glyph is a run of hex bytes terminated by a `// ... char X`
//! comment. Byte 0 of each run is the proportional width and is skipped;
//! the rest is column-major, one byte per 8-row band.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::{FontContainer, FontError, RawMetrics, Result};

/// Parse a GLCD header file into a committed container.
pub fn load_glcd(path: &Path, size: u32) -> Result<FontContainer> {
    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "glcd".to_string());
    let content = fs::read_to_string(path)?;
    parse_glcd(&fallback, &content, size)
}

/// Parse GLCD header text. `fallback_name` is used until the array
/// declaration names the font.
pub fn parse_glcd(fallback_name: &str, content: &str, size: u32) -> Result<FontContainer> {
    let decl_re = Regex::new(r"const unsigned short\s+(.+?)(\d+)x(\d+)").unwrap();
    let char_re = Regex::new(r"char\s(.\w*)").unwrap();

    let mut font = FontContainer::new(fallback_name, size);
    let group = font.add_group();
    let mut width = 0usize;
    let mut height = 0usize;

    for (idx, line) in content.lines().enumerate() {
        let lineno = idx + 1;
        if let Some(caps) = decl_re.captures(line) {
            font.set_name(caps[1].trim());
            width = parse_dim(&caps[2], lineno)?;
            height = parse_dim(&caps[3], lineno)?;
            continue;
        }
        let fields: Vec<&str> = line.split(", ").collect();
        if fields.len() < 3 {
            continue;
        }
        if width == 0 || height == 0 {
            return Err(FontError::GlcdParse {
                line: lineno,
                message: "glyph data before the array declaration".to_string(),
            });
        }

        let mut bytes: Vec<u8> = Vec::new();
        let mut code: Option<u32> = None;
        for field in &fields {
            match field.find("//") {
                Some(comment) => {
                    if let Some(byte) = parse_byte(&field[..comment]) {
                        bytes.push(byte);
                    }
                    let name = char_re
                        .captures(&field[comment..])
                        .map(|caps| caps[1].to_string())
                        .ok_or_else(|| FontError::GlcdParse {
                            line: lineno,
                            message: "missing char annotation".to_string(),
                        })?;
                    let ch = match name.as_str() {
                        "BackSlash" => '\\',
                        other => other.chars().next().unwrap_or('\\'),
                    };
                    code = Some(ch as u32);
                }
                None => {
                    let byte = parse_byte(field).ok_or_else(|| FontError::GlcdParse {
                        line: lineno,
                        message: format!("invalid data byte {field:?}"),
                    })?;
                    bytes.push(byte);
                }
            }
        }
        let code = code.ok_or_else(|| FontError::GlcdParse {
            line: lineno,
            message: "missing char annotation".to_string(),
        })?;

        let bands = height.div_ceil(8);
        if bytes.len() < 1 + width * bands {
            return Err(FontError::GlcdParse {
                line: lineno,
                message: format!(
                    "expected {} data bytes for a {width}x{height} glyph, found {}",
                    1 + width * bands,
                    bytes.len()
                ),
            });
        }
        let bitmap = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        let byte = bytes[1 + x * bands + y / 8];
                        byte >> (y % 8) & 1 == 1
                    })
                    .collect()
            })
            .collect();
        font.add_char(
            group,
            code,
            bitmap,
            RawMetrics {
                width: Some(width),
                height: Some(height),
                ..RawMetrics::default()
            },
        )?;
    }

    if font.glyph_count() == 0 {
        return Err(FontError::NoGlyphs);
    }
    font.commit();
    Ok(font)
}

fn parse_dim(text: &str, line: usize) -> Result<usize> {
    text.parse().map_err(|_| FontError::GlcdParse {
        line,
        message: format!("invalid dimension {text:?}"),
    })
}

/// Parse one `0xNN` field, tolerating surrounding whitespace and a
/// trailing comma. Returns `None` when the field holds no hex literal.
fn parse_byte(field: &str) -> Option<u8> {
    let text = field.trim().trim_end_matches(',').trim();
    let hex = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))?;
    u8::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::parse_glcd;
    use crate::FontError;

    const HEADER: &str = "\
//GLCD FontName : TestFont3x5
const unsigned short TestFont3x5[] = {
        0x03, 0x1F, 0x11, 0x1F, // Code for char A
        0x02, 0x15, 0x0A, 0x00, // Code for char B
        0x03, 0x11, 0x0A, 0x04, // Code for char BackSlash
        };
";

    #[test]
    fn parses_declaration_and_glyphs() {
        let font = parse_glcd("fallback", HEADER, 5).unwrap();
        assert_eq!(font.origin_name(), "TestFont");
        assert_eq!(font.name, "TestFont3x5");
        assert_eq!(font.glyph_count(), 3);
        assert_eq!((font.width, font.height), (3, 5));

        let a = font.find_glyph('A' as u32).unwrap();
        assert_eq!(a.bitmap[0], vec![true, true, true]);
        assert_eq!(a.bitmap[2], vec![true, false, true]);
        assert_eq!(a.bitmap[4], vec![true, true, true]);
        // glyphs sit entirely above the baseline
        assert_eq!((a.top, a.left), (5, 0));

        assert!(font.find_glyph('\\' as u32).is_some());
    }

    #[test]
    fn scanned_font_survives_encode_and_decode() {
        let mut font = parse_glcd("fallback", HEADER, 5).unwrap();
        let a_bitmap = font.find_glyph('A' as u32).unwrap().bitmap.clone();

        let bytes = crate::generate_grouped(&mut font).unwrap().bytes();
        let decoded = crate::decode("TestFont", &bytes).unwrap();
        assert_eq!(decoded.find_glyph('A' as u32).unwrap().bitmap, a_bitmap);
        assert_eq!(decoded.glyph_count(), 3);
    }

    #[test]
    fn data_before_declaration_is_rejected() {
        let text = "0x03, 0x1F, 0x11, 0x1F, // Code for char A\n";
        let err = parse_glcd("x", text, 5).unwrap_err();
        assert!(matches!(err, FontError::GlcdParse { line: 1, .. }));
    }

    #[test]
    fn bad_hex_byte_is_reported_with_its_line() {
        let text = "\
const unsigned short Broken3x5[] = {
        0x03, 0xZZ, 0x11, 0x1F, // Code for char A
        };
";
        let err = parse_glcd("x", text, 5).unwrap_err();
        assert!(matches!(err, FontError::GlcdParse { line: 2, .. }));
    }

    #[test]
    fn short_glyph_run_is_rejected() {
        let text = "\
const unsigned short Short3x5[] = {
        0x03, 0x1F, 0x11, // Code for char A
        };
";
        let err = parse_glcd("x", text, 5).unwrap_err();
        assert!(matches!(err, FontError::GlcdParse { line: 2, .. }));
    }
}
