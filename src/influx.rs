mod convert;
mod point;

pub use convert::*;
pub use point::*;
