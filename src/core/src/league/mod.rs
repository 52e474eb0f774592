pub mod clinch;
pub mod coaches;
pub mod history;
pub mod league;
pub mod needs;
pub mod offseason;
pub mod playoffs;
pub mod schedule;
pub mod table;

pub use clinch::*;
pub use coaches::*;
pub use history::*;
pub use league::*;
pub use needs::*;
pub use offseason::*;
pub use playoffs::*;
pub use schedule::*;
pub use table::*;
