pub mod error;
pub mod executor;
pub mod page_count;

pub use error::UploadError;
pub use executor::{ExtractExecutor, ExtractSettings, UploadedFile};
