pub mod club;
pub mod game;
pub mod league;
pub mod service;
pub mod shared;
pub mod trades;
pub mod utils;

pub use club::*;
pub use game::*;
pub use league::*;
pub use shared::*;
