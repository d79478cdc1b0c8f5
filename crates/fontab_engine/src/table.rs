//! Binary font table representation.
//!
//! Encoders produce an annotated row stream: the wire format is the
//! flattened byte sequence, the row/comment structure only drives the
//! human-readable C-array rendering. Decoders consume plain bytes.

/// Format tag of the legacy fixed-cell layout without unicode records.
pub const TAG_FIXED: u8 = 0;
/// Format tag of the legacy fixed-cell layout with a unicode record.
pub const TAG_FIXED_UNICODE: u8 = 1;
/// Format tag of the grouped variable-size layout.
pub const TAG_GROUPED: u8 = 2;

/// A run of table bytes that belongs on one output line.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub bytes: Vec<u8>,
    pub comment: Option<String>,
}

impl TableRow {
    pub fn new(bytes: Vec<u8>, comment: impl Into<String>) -> Self {
        Self {
            bytes,
            comment: Some(comment.into()),
        }
    }

    pub fn plain(bytes: Vec<u8>) -> Self {
        Self { bytes, comment: None }
    }
}

/// An encoded font table: named byte stream plus line annotations.
#[derive(Debug, Clone)]
pub struct FontTable {
    /// Identifier the table is emitted under (C array name)
    pub name: String,
    pub rows: Vec<TableRow>,
}

impl FontTable {
    /// The wire format: all rows flattened in order.
    pub fn bytes(&self) -> Vec<u8> {
        self.rows.iter().flat_map(|r| r.bytes.iter().copied()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.iter().map(|r| r.bytes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pack `height` bitmap rows into column-major byte bands.
///
/// For each band of 8 rows, one byte per column; bit `i` (LSB origin) is
/// the pixel at row `band * 8 + i`, zero past `height`.
pub(crate) fn pack_bands(bitmap: &[Vec<bool>], width: usize, height: usize) -> Vec<u8> {
    let bands = height.div_ceil(8);
    let mut out = Vec::with_capacity(bands * width);
    for band in 0..bands {
        for x in 0..width {
            let mut data = 0u8;
            for bit in 0..8 {
                let y = band * 8 + bit;
                if y >= height {
                    break;
                }
                if bitmap[y][x] {
                    data |= 1 << bit;
                }
            }
            out.push(data);
        }
    }
    out
}

/// Inverse of [`pack_bands`]: rebuild `height` rows of `width` columns.
pub(crate) fn unpack_bands(bytes: &[u8], width: usize, height: usize) -> Vec<Vec<bool>> {
    let mut bitmap = vec![vec![false; width]; height];
    for (y, row) in bitmap.iter_mut().enumerate() {
        let band = y / 8;
        let bit = y % 8;
        for (x, px) in row.iter_mut().enumerate() {
            *px = (bytes[band * width + x] >> bit) & 1 != 0;
        }
    }
    bitmap
}
