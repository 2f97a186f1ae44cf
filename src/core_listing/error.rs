use crate::core_backend::BackendError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Could not retrieve index of {path}: {source}")]
    Fetch { path: String, source: BackendError },
}
