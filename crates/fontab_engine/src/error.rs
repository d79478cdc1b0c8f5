//! Unified error types for fontab_engine

use thiserror::Error;

/// Main error type for font conversion operations
#[derive(Debug, Error)]
pub enum FontError {
    // === Source Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse font: {0}")]
    FontParse(String),

    #[error("Cannot rasterize code point U+{code:04X}")]
    Rasterize { code: u32 },

    #[error("GLCD parse error at line {line}: {message}")]
    GlcdParse { line: usize, message: String },

    // === Model Errors ===
    #[error("Code point U+{code:04X} was already added to this font")]
    DuplicateChar { code: u32 },

    #[error("Group index {group} out of range")]
    InvalidGroup { group: usize },

    #[error("Font contains no glyphs")]
    NoGlyphs,

    // === Format Limit Errors ===
    #[error("Font {dimension} {value} exceeds the format maximum of 255")]
    CellExceedsFormat { dimension: &'static str, value: usize },

    #[error("Glyph count {count} exceeds the 255 glyphs a unicode record can hold")]
    GlyphCountExceedsFormat { count: usize },

    #[error("Group bitmap data of {size} bytes exceeds the 16-bit jump table range")]
    GroupDataTooLarge { size: usize },

    // === Decoder Errors ===
    #[error("Unsupported font table type: {tag}")]
    UnsupportedTableType { tag: u8 },

    #[error("Font table truncated at offset {offset}")]
    Truncated { offset: usize },

    #[error("Malformed font table at offset {offset}: {message}")]
    Malformed { offset: usize, message: String },

    // === Internal Errors ===
    #[error("Packed glyph size mismatch: jump table says {expected} bytes, packed {actual} (encoder bug)")]
    InternalConsistency { expected: usize, actual: usize },
}

/// Result type alias for font conversion operations
pub type Result<T> = std::result::Result<T, FontError>;
