pub mod config;
pub mod data;
pub mod extraction;
pub mod format;
