pub mod career;
pub mod contract;
pub mod health;
pub mod injury;
pub mod player;
pub mod position;
pub mod prospect;
pub mod skills;

pub use career::*;
pub use contract::*;
pub use health::*;
pub use injury::*;
pub use player::*;
pub use position::*;
pub use prospect::*;
pub use skills::*;
