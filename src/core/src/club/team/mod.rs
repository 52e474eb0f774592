pub mod leadership;
pub mod lineup;
pub mod numbers;
pub mod team;

pub use leadership::*;
pub use lineup::*;
pub use numbers::*;
pub use team::*;
