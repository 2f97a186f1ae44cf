// Listing Synthesizer: scrapes backend autoindex pages into FsEntry lists
// and renders them as FTP LIST output.

pub mod apache;
pub mod entry;
pub mod error;
pub mod html;
pub mod nginx;
pub mod render;
pub mod synthesizer;

pub use error::ListingError;
pub use synthesizer::Synthesizer;
