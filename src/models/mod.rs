pub mod statistics;
pub mod video;

pub use statistics::*;
pub use video::*;
