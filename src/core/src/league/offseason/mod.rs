pub mod aging;
pub mod draft;
pub mod draft_session;
pub mod free_agency;
pub mod pipeline;
pub mod retirement;

pub use aging::*;
pub use draft::*;
pub use draft_session::*;
pub use free_agency::*;
pub use pipeline::*;
pub use retirement::*;
