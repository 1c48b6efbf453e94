mod policy;
mod resolver;

pub use policy::*;
pub use resolver::*;
