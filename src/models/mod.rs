pub mod aspects;
pub mod objects;
pub mod zodiac;

pub use aspects::*;
pub use objects::*;
pub use zodiac::*;
