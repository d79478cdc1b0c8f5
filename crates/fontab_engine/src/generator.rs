//! Binary table encoders.
//!
//! Two wire-compatible layouts are produced from a committed
//! [`FontContainer`]:
//!
//! - the legacy fixed-cell layout (`[tag][width][height][first char]`
//!   plus uniformly sized packed glyphs), which needs
//!   [`FontContainer::expand`] so every glyph fills the shared cell;
//! - the grouped variable-size layout (`[2][width][height][0]`, then per
//!   group a unicode record, a jump table and packed glyph data), which
//!   only needs [`FontContainer::expand_top`] for baseline alignment.
//!
//! Format limits (single-byte width/height/count, 16-bit jump offsets)
//! are checked before any byte of the offending record is emitted.

use crate::{
    table::{pack_bands, TAG_FIXED, TAG_FIXED_UNICODE, TAG_GROUPED},
    FontContainer, FontError, FontTable, Result, TableRow,
};

fn char_comment(code: u32) -> String {
    let ch = char::from_u32(code).unwrap_or('?');
    format!("char '{ch}' (0x{code:04X}/{code})")
}

fn check_cell(dimension: &'static str, value: usize) -> Result<()> {
    if value > 255 {
        return Err(FontError::CellExceedsFormat { dimension, value });
    }
    Ok(())
}

/// Encode the legacy fixed-cell layout.
///
/// Expands every glyph to the uniform shared cell first. With `unicode`
/// set, the header carries tag 1 and is followed by a single 3-byte
/// unicode record covering all glyphs, and the table ends with a 3-byte
/// terminator; otherwise the header tag is 0 and the glyph data follows
/// the 4-byte header directly. No per-glyph size metadata is stored: a
/// decoder derives the `width * ceil(height / 8)` span of each glyph from
/// the header alone.
pub fn generate_fixed(font: &mut FontContainer, unicode: bool) -> Result<FontTable> {
    font.expand();
    let first = font.first_char.ok_or(FontError::NoGlyphs)?;
    check_cell("width", font.width)?;
    check_cell("height", font.height)?;
    let count = font.glyph_count();
    if unicode && count > 255 {
        return Err(FontError::GlyphCountExceedsFormat { count });
    }

    let tag = if unicode { TAG_FIXED_UNICODE } else { TAG_FIXED };
    let mut rows = vec![TableRow::new(
        vec![tag, font.width as u8, font.height as u8, (first & 0xFF) as u8],
        "type|width|height|first char",
    )];
    if unicode {
        rows.push(TableRow::new(
            vec![(first >> 8) as u8, (first & 0xFF) as u8, count as u8],
            "unicode record",
        ));
    }

    for glyph in font.glyphs() {
        let bytes = pack_bands(&glyph.bitmap, font.width, font.height);
        rows.push(TableRow::new(bytes, char_comment(glyph.code)));
    }

    if unicode {
        rows.push(TableRow::new(vec![0, 0, 0], "end of unicode tables"));
    }

    let table = FontTable {
        name: font.name.clone(),
        rows,
    };
    log::info!("encoded {} glyphs into fixed table {} ({} bytes)", count, table.name, table.len());
    Ok(table)
}

/// Encode the grouped variable-size layout.
///
/// Glyphs are baseline-aligned but keep their natural width, and trailing
/// all-blank rows are dropped from both the jump-table height and the
/// packed data. Jump-table offsets are cumulative byte offsets into the
/// group's data region, so a decoder can seek to any glyph without
/// scanning its predecessors. Each group is framed independently; a
/// 3-byte zero terminator follows the last group.
pub fn generate_grouped(font: &mut FontContainer) -> Result<FontTable> {
    font.expand_top();
    if font.glyph_count() == 0 {
        return Err(FontError::NoGlyphs);
    }
    check_cell("width", font.width)?;
    check_cell("height", font.height)?;

    let mut rows = vec![TableRow::new(
        vec![TAG_GROUPED, font.width as u8, font.height as u8, 0x00],
        "type|width|height|reserved",
    )];

    for (index, group) in font.groups().iter().enumerate() {
        let Some(first) = group.first_code() else {
            log::warn!("skipping empty glyph group {index}");
            continue;
        };
        let count = group.len();
        if count > 255 {
            return Err(FontError::GlyphCountExceedsFormat { count });
        }

        // Jump table sizes are fixed by the trimmed glyph extents, so the
        // 16-bit offset range can be validated before emitting the record.
        let sizes: Vec<usize> = group
            .glyphs()
            .iter()
            .map(|g| g.trimmed_height().div_ceil(8) * g.width)
            .collect();
        let total: usize = sizes.iter().sum();
        if total > 0xFFFF {
            return Err(FontError::GroupDataTooLarge { size: total });
        }

        rows.push(TableRow::new(
            vec![(first >> 8) as u8, (first & 0xFF) as u8, count as u8],
            format!("unicode record: first {}, {count} chars", char_comment(first)),
        ));

        let mut offset = 0usize;
        for (glyph, &size) in group.glyphs().iter().zip(&sizes) {
            rows.push(TableRow::new(
                vec![
                    (offset >> 8) as u8,
                    (offset & 0xFF) as u8,
                    glyph.width as u8,
                    glyph.trimmed_height() as u8,
                ],
                char_comment(glyph.code),
            ));
            offset += size;
        }
        rows.push(TableRow::plain(vec![(total >> 8) as u8, (total & 0xFF) as u8]));

        for (glyph, &size) in group.glyphs().iter().zip(&sizes) {
            let bytes = pack_bands(&glyph.bitmap, glyph.width, glyph.trimmed_height());
            if bytes.len() != size {
                return Err(FontError::InternalConsistency {
                    expected: size,
                    actual: bytes.len(),
                });
            }
            rows.push(TableRow::new(bytes, char_comment(glyph.code)));
        }
    }

    rows.push(TableRow::new(vec![0, 0, 0], "end of unicode tables"));

    let table = FontTable {
        name: format!("free_{}", font.name),
        rows,
    };
    log::info!(
        "encoded {} glyphs into grouped table {} ({} bytes)",
        font.glyph_count(),
        table.name,
        table.len()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawMetrics;
    use pretty_assertions::assert_eq;

    fn block_metrics(height: usize) -> RawMetrics {
        RawMetrics {
            top: Some(height as i32),
            ..RawMetrics::default()
        }
    }

    /// 95 printable ASCII glyphs, all 5x7 solid blocks.
    fn ascii_5x7() -> FontContainer {
        let mut font = FontContainer::new("ascii", 8);
        let group = font.add_group();
        for code in 0x20..0x7F {
            font.add_char(group, code, vec![vec![true; 5]; 7], block_metrics(7)).unwrap();
        }
        font.commit();
        font
    }

    #[test]
    fn fixed_table_byte_count() {
        // header 4 + 95 glyphs x 5 columns x ceil(7/8) bands
        let table = generate_fixed(&mut ascii_5x7(), false).unwrap();
        assert_eq!(table.len(), 4 + 95 * 5);

        // unicode variant adds the 3-byte record and 3-byte terminator
        let table = generate_fixed(&mut ascii_5x7(), true).unwrap();
        assert_eq!(table.len(), 4 + 3 + 95 * 5 + 3);
    }

    #[test]
    fn fixed_header_and_record() {
        let table = generate_fixed(&mut ascii_5x7(), true).unwrap();
        let bytes = table.bytes();
        assert_eq!(&bytes[..4], &[1, 5, 7, 0x20]);
        assert_eq!(&bytes[4..7], &[0x00, 0x20, 95]);
        assert_eq!(&bytes[bytes.len() - 3..], &[0, 0, 0]);
        assert_eq!(table.name, "ascii5x7");
    }

    #[test]
    fn fixed_ascii_header_has_no_record() {
        let table = generate_fixed(&mut ascii_5x7(), false).unwrap();
        let bytes = table.bytes();
        assert_eq!(&bytes[..4], &[0, 5, 7, 0x20]);
        // first glyph data follows the header directly: solid 5x7 columns
        assert_eq!(&bytes[4..9], &[0x7F, 0x7F, 0x7F, 0x7F, 0x7F]);
    }

    #[test]
    fn unicode_record_overflow_detected() {
        let mut font = FontContainer::new("big", 8);
        let group = font.add_group();
        for code in 0x100..0x201 {
            font.add_char(group, code, vec![vec![true]], block_metrics(1)).unwrap();
        }
        font.commit();
        let err = generate_fixed(&mut font, true).unwrap_err();
        assert!(matches!(err, FontError::GlyphCountExceedsFormat { count: 257 }));
    }

    #[test]
    fn grouped_sparse_groups_frame_independently() {
        let mut font = FontContainer::new("sparse", 8);
        let g0 = font.add_group();
        for code in 0x20..0x25 {
            font.add_char(g0, code, vec![vec![true; 2]; 2], block_metrics(2)).unwrap();
        }
        let g1 = font.add_group();
        for code in 0x41..0x44 {
            font.add_char(g1, code, vec![vec![true; 2]; 2], block_metrics(2)).unwrap();
        }
        font.commit();

        let bytes = generate_grouped(&mut font).unwrap().bytes();
        assert_eq!(&bytes[..4], &[2, 2, 2, 0]);

        // group 0: record, 5 jump entries restarting at offset 0, total, 5x2 data bytes
        assert_eq!(&bytes[4..7], &[0x00, 0x20, 5]);
        assert_eq!(&bytes[7..11], &[0x00, 0x00, 2, 2]);
        assert_eq!(&bytes[11..15], &[0x00, 0x02, 2, 2]);
        let g0_end = 7 + 5 * 4 + 2 + 5 * 2;
        assert_eq!(&bytes[g0_end - 12..g0_end - 10], &[0x00, 10]);

        // group 1: its own record, offsets restarting at 0
        assert_eq!(&bytes[g0_end..g0_end + 3], &[0x00, 0x41, 3]);
        assert_eq!(&bytes[g0_end + 3..g0_end + 7], &[0x00, 0x00, 2, 2]);

        // terminator after the last group
        assert_eq!(&bytes[bytes.len() - 3..], &[0, 0, 0]);
    }

    #[test]
    fn grouped_trims_trailing_blank_rows() {
        let mut font = FontContainer::new("trim", 8);
        let group = font.add_group();
        // 3 wide, 10 tall, only the top 2 rows set
        let mut bitmap = vec![vec![false; 3]; 10];
        bitmap[0] = vec![true; 3];
        bitmap[1] = vec![true; 3];
        font.add_char(group, 'T' as u32, bitmap, block_metrics(10)).unwrap();
        font.commit();

        let bytes = generate_grouped(&mut font).unwrap().bytes();
        // jump entry declares the trimmed 2-row height, one band of data
        assert_eq!(&bytes[7..11], &[0x00, 0x00, 3, 2]);
        assert_eq!(&bytes[11..13], &[0x00, 3]);
        assert_eq!(&bytes[13..16], &[0x03, 0x03, 0x03]);
    }

    #[test]
    fn empty_font_is_rejected() {
        let mut font = FontContainer::new("empty", 8);
        font.add_group();
        font.commit();
        assert!(matches!(generate_grouped(&mut font), Err(FontError::NoGlyphs)));
        assert!(matches!(generate_fixed(&mut font, false), Err(FontError::NoGlyphs)));
    }
}
