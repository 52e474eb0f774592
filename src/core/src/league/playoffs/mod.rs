pub mod bracket;
pub mod mvp;
pub mod reveal;
pub mod types;

pub use bracket::*;
pub use mvp::*;
pub use reveal::*;
pub use types::*;
