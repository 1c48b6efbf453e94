mod device_tag;
mod field;
mod measurement;

pub use device_tag::*;
pub use field::*;
pub use measurement::*;
