//! Glyph sources: adapters that fill a [`FontContainer`](crate::FontContainer)
//! from external font material.

mod glcd;
mod ttf;

pub use glcd::*;
pub use ttf::*;
