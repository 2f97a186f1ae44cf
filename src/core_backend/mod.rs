// HTTP side of the proxy: every remote byte comes through here.

pub mod error;
pub mod fetcher;

pub use error::BackendError;
pub use fetcher::BackendFetcher;
