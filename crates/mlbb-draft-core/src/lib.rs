// Library root for the MLBB draft engine: the ban/pick sequencer and the
// lane, player and validation rules around it.

pub mod draft;
pub mod error;
pub mod hero;
pub mod payload;

pub use error::DraftError;
