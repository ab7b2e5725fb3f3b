pub mod api_utils;
pub mod result_store;
