pub mod csv_provider;
pub mod openai_provider;
pub mod parser_service_provider;
pub mod registry;
pub mod response_shape;
pub mod schema;
pub mod types;

pub use registry::ProviderRegistry;
pub use types::{DocumentKind, ExtractionError, ExtractionProvider, SourceDocument};
