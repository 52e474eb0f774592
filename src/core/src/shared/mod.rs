pub mod error;
pub mod names;

pub use error::*;
pub use names::*;
