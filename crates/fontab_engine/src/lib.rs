#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::too_many_lines,
    clippy::cast_lossless,
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]
mod error;
pub use error::*;

mod glyph;
pub use glyph::*;

mod container;
pub use container::*;

mod table;
pub use table::*;

mod generator;
pub use generator::*;

mod decode;
pub use decode::*;

mod render;
pub use render::*;

pub mod sources;
pub use sources::*;
