pub mod candidate;
pub mod normalizer;
pub mod reconciler;
pub mod service;

pub use candidate::CandidateRow;
