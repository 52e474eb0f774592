pub mod acceptance;
pub mod gm;
pub mod preferences;
pub mod search;
pub mod valuation;

pub use acceptance::*;
pub use gm::*;
pub use preferences::*;
pub use search::*;
pub use valuation::*;
