//! Font table decoders.
//!
//! Parses both wire layouts back into a [`FontContainer`], validating the
//! header tag, record framing, jump-table offsets and the terminator.
//! The wire formats do not store the baseline, so every decoded glyph is
//! cell-top aligned (`top` = font height); after a commit this reproduces
//! the same relative alignment the encoder emitted.

use crate::{
    table::{unpack_bands, TAG_FIXED, TAG_FIXED_UNICODE, TAG_GROUPED},
    FontContainer, FontError, RawMetrics, Result,
};

/// Decode a font table, auto-detecting the layout from its format tag.
pub fn decode(name: impl Into<String>, bytes: &[u8]) -> Result<FontContainer> {
    let Some(&tag) = bytes.first() else {
        return Err(FontError::Truncated { offset: 0 });
    };
    match tag {
        TAG_FIXED | TAG_FIXED_UNICODE => decode_fixed(name, bytes),
        TAG_GROUPED => decode_grouped(name, bytes),
        tag => Err(FontError::UnsupportedTableType { tag }),
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.pos + len > self.bytes.len() {
            return Err(FontError::Truncated { offset: self.bytes.len() });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16_be(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

fn cell_metrics(width: usize, height: usize, font_height: usize) -> RawMetrics {
    RawMetrics {
        width: Some(width),
        height: Some(height),
        left: Some(0),
        top: Some(font_height as i32),
    }
}

/// Decode the legacy fixed-cell layout (tags 0 and 1).
pub fn decode_fixed(name: impl Into<String>, bytes: &[u8]) -> Result<FontContainer> {
    let mut r = Reader::new(bytes);
    let tag = r.byte()?;
    let width = r.byte()? as usize;
    let height = r.byte()? as usize;
    let first_low = r.byte()? as u32;
    let span = width * height.div_ceil(8);
    if span == 0 {
        return Err(FontError::Malformed {
            offset: 1,
            message: "zero cell size".into(),
        });
    }

    let (first, count) = if tag == TAG_FIXED_UNICODE {
        let first = r.u16_be()? as u32;
        let count = r.byte()? as usize;
        (first, count)
    } else {
        let count = r.remaining() / span;
        if r.remaining() % span != 0 {
            return Err(FontError::Truncated { offset: bytes.len() });
        }
        (first_low, count)
    };

    let mut font = FontContainer::new(name, height as u32);
    let group = font.add_group();
    for index in 0..count {
        let data = r.take(span)?;
        font.add_char(
            group,
            first + index as u32,
            unpack_bands(data, width, height),
            cell_metrics(width, height, height),
        )?;
    }

    if tag == TAG_FIXED_UNICODE && r.take(3)? != [0, 0, 0] {
        return Err(FontError::Malformed {
            offset: r.pos - 3,
            message: "missing end-of-table record".into(),
        });
    }

    font.commit();
    Ok(font)
}

/// Decode the grouped variable-size layout (tag 2).
pub fn decode_grouped(name: impl Into<String>, bytes: &[u8]) -> Result<FontContainer> {
    let mut r = Reader::new(bytes);
    let tag = r.byte()?;
    if tag != TAG_GROUPED {
        return Err(FontError::UnsupportedTableType { tag });
    }
    let _width = r.byte()? as usize;
    let font_height = r.byte()? as usize;
    r.byte()?; // reserved

    let mut font = FontContainer::new(name, font_height as u32);
    loop {
        let first = r.u16_be()? as u32;
        let count = r.byte()? as usize;
        if first == 0 && count == 0 {
            break;
        }

        // jump table: per glyph a cumulative offset and trimmed extent
        let mut entries = Vec::with_capacity(count);
        let mut expected_offset = 0usize;
        for index in 0..count {
            let entry_pos = r.pos;
            let offset = r.u16_be()? as usize;
            let width = r.byte()? as usize;
            let height = r.byte()? as usize;
            if offset != expected_offset {
                return Err(FontError::Malformed {
                    offset: entry_pos,
                    message: format!("jump offset {offset} of glyph {index}, expected {expected_offset}"),
                });
            }
            expected_offset += height.div_ceil(8) * width;
            entries.push((width, height));
        }
        let total = r.u16_be()? as usize;
        if total != expected_offset {
            return Err(FontError::Malformed {
                offset: r.pos - 2,
                message: format!("group data total {total}, jump table spans {expected_offset}"),
            });
        }

        let group = font.add_group();
        let data = r.take(total)?;
        let mut offset = 0usize;
        for (index, &(width, height)) in entries.iter().enumerate() {
            let size = height.div_ceil(8) * width;
            font.add_char(
                group,
                first + index as u32,
                unpack_bands(&data[offset..offset + size], width, height),
                cell_metrics(width, height, font_height),
            )?;
            offset += size;
        }
    }

    font.commit();
    Ok(font)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate_fixed, generate_grouped, Glyph};
    use pretty_assertions::assert_eq;

    fn pattern(width: usize, height: usize, seed: usize) -> Vec<Vec<bool>> {
        (0..height).map(|y| (0..width).map(|x| (x + y * 3 + seed) % 2 == 0).collect()).collect()
    }

    fn raw(left: i32, top: i32) -> RawMetrics {
        RawMetrics {
            left: Some(left),
            top: Some(top),
            ..RawMetrics::default()
        }
    }

    #[test]
    fn grouped_round_trip_recovers_glyphs() {
        let mut font = FontContainer::new("pair", 8);
        let group = font.add_group();
        font.add_char(group, 'A' as u32, pattern(5, 7, 0), raw(0, 7)).unwrap();
        font.add_char(group, 'B' as u32, pattern(5, 6, 1), raw(0, 6)).unwrap();
        font.commit();

        let bytes = generate_grouped(&mut font).unwrap().bytes();
        let decoded = decode("pair", &bytes).unwrap();

        // the encoder left the container in its baseline-aligned state,
        // which the decoder must reproduce exactly
        let encoded: Vec<&Glyph> = font.glyphs().collect();
        let recovered: Vec<&Glyph> = decoded.glyphs().collect();
        assert_eq!(encoded, recovered);
        assert_eq!(decoded.height, 7);
        assert_eq!(decoded.baseline, 7);
    }

    #[test]
    fn fixed_round_trip_recovers_glyphs() {
        let mut font = FontContainer::new("pair", 8);
        let group = font.add_group();
        font.add_char(group, 'A' as u32, pattern(5, 7, 0), raw(0, 7)).unwrap();
        font.add_char(group, 'B' as u32, pattern(4, 6, 1), raw(0, 6)).unwrap();
        font.commit();

        let bytes = generate_fixed(&mut font, true).unwrap().bytes();
        let decoded = decode("pair", &bytes).unwrap();

        assert_eq!(decoded.first_char, Some('A' as u32));
        assert_eq!(decoded.width, 5);
        assert_eq!(decoded.height, 7);
        for (encoded, recovered) in font.glyphs().zip(decoded.glyphs()) {
            assert_eq!(encoded.code, recovered.code);
            assert_eq!(encoded.bitmap, recovered.bitmap);
            assert_eq!(encoded.top, recovered.top);
        }
    }

    #[test]
    fn sparse_groups_survive_a_round_trip() {
        let mut font = FontContainer::new("sparse", 8);
        let g0 = font.add_group();
        for code in 0x20..0x25 {
            font.add_char(g0, code, pattern(3, 4, code as usize), raw(0, 4)).unwrap();
        }
        let g1 = font.add_group();
        for code in 0x41..0x44 {
            font.add_char(g1, code, pattern(3, 4, code as usize), raw(0, 4)).unwrap();
        }
        font.commit();

        let bytes = generate_grouped(&mut font).unwrap().bytes();
        let decoded = decode("sparse", &bytes).unwrap();

        assert_eq!(decoded.groups().len(), 2);
        assert_eq!(decoded.groups()[0].first_code(), Some(0x20));
        assert_eq!(decoded.groups()[0].len(), 5);
        assert_eq!(decoded.groups()[1].first_code(), Some(0x41));
        assert_eq!(decoded.groups()[1].len(), 3);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = decode("bad", &[9, 5, 7, 0]).unwrap_err();
        assert!(matches!(err, FontError::UnsupportedTableType { tag: 9 }));
    }

    #[test]
    fn truncated_grouped_table_is_rejected() {
        let mut font = FontContainer::new("cut", 8);
        let group = font.add_group();
        font.add_char(group, 'A' as u32, pattern(5, 7, 0), raw(0, 7)).unwrap();
        font.commit();

        let mut bytes = generate_grouped(&mut font).unwrap().bytes();
        bytes.truncate(bytes.len() - 4); // lose data and terminator
        assert!(matches!(decode("cut", &bytes), Err(FontError::Truncated { .. })));
    }
}
