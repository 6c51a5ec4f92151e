//! Data
//!
//! Input records, their normalization and the amino-acid class tables.
mod groups;
mod model;
mod normalize;

pub use groups::{AaGroup, ColorScheme};
pub use model::{Coupling, LogoColumn, LogoEntry, PositionMap, ZoomData};
pub use normalize::{check, normalize, prepare_couplings, prepare_logo};
