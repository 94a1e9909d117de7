//! Astronomical primitives and the astrological calculations built directly on them.

pub mod angles;
pub mod calculator;
pub mod houses;
pub mod points;

pub use angles::*;
pub use calculator::*;
pub use houses::*;
pub use points::*;
