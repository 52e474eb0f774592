pub mod coach;
pub mod decisions;
pub mod modifiers;

pub use coach::*;
pub use decisions::*;
pub use modifiers::*;
