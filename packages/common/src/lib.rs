pub mod color;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod result;
pub mod settings;

pub use color::*;
pub use error::*;
pub use geometry::*;
pub use palette::{nearest_named_color, palette, NamedColor};
pub use result::*;
pub use settings::*;
